use crate::axis::Axis;
use crate::composite::{sinc_table_for, sinqd_sum, CompositeHistogram, HistogramParams};
use crate::distance_histogram::DistanceHistogram;
use crate::distribution::GenericDistribution1D;
use crate::profile::ScatteringProfile;

/// Sinc sums of the plain partials, computed once per PDDF.
struct BaseProfiles {
    aa: Vec<f64>,
    aw: Vec<f64>,
    ww: Vec<f64>,
}

/// Plain composite distance histogram: atom-atom, atom-water and
/// water-water partials without form-factor resolution.
///
/// The transform damps every term with the exp(-q²) stand-in form factor,
/// like the total-histogram transform it refines. Only the hydration scale
/// applies; the excluded-volume parameters are inert for this variant.
pub struct CompositeDistanceHistogram {
    aa: Vec<f64>,
    aw: Vec<f64>,
    ww: Vec<f64>,
    total: DistanceHistogram,
    params: HistogramParams,
    base: Option<BaseProfiles>,
    cache: Option<(HistogramParams, ScatteringProfile)>,
}

impl CompositeDistanceHistogram {
    /// Bundles the three partials; the total fixes the bin centers.
    pub fn new<D: GenericDistribution1D>(aa: &D, aw: &D, ww: &D, total: &D, width: f64) -> Self {
        CompositeDistanceHistogram::from_total(
            aa,
            aw,
            ww,
            DistanceHistogram::from_distribution(total, width),
        )
    }

    /// Bundles the three partials accumulated on an arbitrary binning.
    pub fn new_binned<D, B>(aa: &D, aw: &D, ww: &D, total: &D, binning: &B) -> Self
    where
        D: GenericDistribution1D,
        B: crate::axis::Binning,
    {
        CompositeDistanceHistogram::from_total(
            aa,
            aw,
            ww,
            DistanceHistogram::from_distribution_binned(total, binning),
        )
    }

    fn from_total<D: GenericDistribution1D>(aa: &D, aw: &D, ww: &D, total: DistanceHistogram) -> Self {
        let n = total.size();
        let take = |d: &D| {
            let mut v = d.counts().to_vec();
            v.resize(n, 0.0);
            v
        };
        return CompositeDistanceHistogram {
            aa: take(aa),
            aw: take(aw),
            ww: take(ww),
            total,
            params: HistogramParams::default(),
            base: None,
            cache: None,
        };
    }

    /// The atom-atom partial
    pub fn aa(&self) -> &[f64] {
        &self.aa
    }

    /// The atom-water partial
    pub fn aw(&self) -> &[f64] {
        &self.aw
    }

    /// The water-water partial
    pub fn ww(&self) -> &[f64] {
        &self.ww
    }

    fn base(&mut self) -> &BaseProfiles {
        if self.base.is_none() {
            let q = Axis::default_q_axis().as_vector();
            let table = sinc_table_for(self.total.d_axis(), &q);
            let table = table.get();
            let mut base = BaseProfiles {
                aa: vec![0.0; q.len()],
                aw: vec![0.0; q.len()],
                ww: vec![0.0; q.len()],
            };
            for qi in 0..q.len() {
                let row = table.row(qi);
                base.aa[qi] = sinqd_sum(&self.aa, row);
                base.aw[qi] = sinqd_sum(&self.aw, row);
                base.ww[qi] = sinqd_sum(&self.ww, row);
            }
            self.base = Some(base);
        }
        return self.base.as_ref().unwrap();
    }
}

impl CompositeHistogram for CompositeDistanceHistogram {
    fn total(&self) -> &DistanceHistogram {
        &self.total
    }

    fn params(&self) -> HistogramParams {
        self.params
    }

    fn set_params(&mut self, params: HistogramParams) {
        self.params = params;
    }

    fn supports_exv(&self) -> bool {
        false
    }

    fn debye_transform(&mut self) -> ScatteringProfile {
        if let Some((tag, profile)) = &self.cache {
            if *tag == self.params {
                return profile.clone();
            }
        }
        let cw = self.params.cw;
        let q = Axis::default_q_axis().as_vector();
        let params = self.params;
        let base = self.base();
        let intensity: Vec<f64> = q
            .iter()
            .enumerate()
            .map(|(qi, &qv)| {
                let ff = (-qv * qv).exp();
                (base.aa[qi] + cw * base.aw[qi] + cw * cw * base.ww[qi]) * ff
            })
            .collect();
        let profile = ScatteringProfile::new(q, intensity);
        self.cache = Some((params, profile.clone()));
        return profile;
    }
}
