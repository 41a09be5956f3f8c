use saxskit_data::{FormFactorClass, FF_CLASS_COUNT};

use crate::axis::Axis;
use crate::composite::{sinc_table_for, sinqd_sum, CompositeHistogram, HistogramParams};
use crate::distance_histogram::DistanceHistogram;
use crate::distribution::{GenericDistribution1D, GenericDistribution2D};
use crate::form_factor::{atomic_table, displaced_volume, exv_factor, ExvFormFactor};
use crate::profile::ScatteringProfile;

/// Sinc sums and form-factor grids, computed once per PDDF.
struct BaseProfiles {
    /// per-class sinc sums of the atom-atom partial
    taa: Vec<Vec<f64>>,
    taw: Vec<f64>,
    tww: Vec<f64>,
    /// normalized atomic form factor per class and q
    ff: Vec<Vec<f64>>,
    /// per-electron excluded-volume amplitude per class and q
    fx: Vec<Vec<f64>>,
    fw: Vec<f64>,
}

/// Composite histogram with averaged form factors: the atom-atom partial is
/// class-resolved on one side only, and every class scatters against the
/// weight-averaged effective form factor of the whole molecule.
///
/// Excluded volume enters as a contrast subtraction from each atomic form
/// factor, which is the fastest physically meaningful model.
pub struct CompositeDistanceHistogramFFAvg {
    aa: Vec<Vec<f64>>, // per class
    aw: Vec<f64>,
    ww: Vec<f64>,
    d_axis_aa: Vec<f64>,
    class_weights: [f64; FF_CLASS_COUNT],
    total: DistanceHistogram,
    r0: f64,
    params: HistogramParams,
    base: Option<BaseProfiles>,
    cache: Option<(HistogramParams, ScatteringProfile)>,
}

impl CompositeDistanceHistogramFFAvg {
    pub fn new<D1, D2>(
        aa: &D2,
        aw: &D1,
        ww: &D1,
        total: &D1,
        class_weights: [f64; FF_CLASS_COUNT],
        width: f64,
    ) -> Self
    where
        D1: GenericDistribution1D,
        D2: GenericDistribution2D,
    {
        let aa2_centers = aa.bin_centers(width);
        let total = DistanceHistogram::from_distribution(total, width);
        let n = total.size();
        let take1 = |d: &[f64]| {
            let mut v = d.to_vec();
            v.resize(n, 0.0);
            v
        };
        let aa = (0..FF_CLASS_COUNT).map(|c| take1(aa.class_counts(c))).collect();

        // couple the exv length scale to the average displaced volume
        let mean_volume = mean_displaced_volume(&class_weights);
        let r0 = (3.0 * mean_volume / (4.0 * std::f64::consts::PI)).cbrt();

        let mut d_axis_aa = aa2_centers;
        d_axis_aa.truncate(n);
        return CompositeDistanceHistogramFFAvg {
            aa,
            aw: take1(aw.counts()),
            ww: take1(ww.counts()),
            d_axis_aa,
            class_weights,
            total,
            r0,
            params: HistogramParams::default(),
            base: None,
            cache: None,
        };
    }

    fn base(&mut self) -> &BaseProfiles {
        if self.base.is_none() {
            let q = Axis::default_q_axis().as_vector();
            let table = sinc_table_for(&self.d_axis_aa, &q);
            let table = table.get();
            let atomic = atomic_table();

            let mut taa = vec![vec![0.0; q.len()]; FF_CLASS_COUNT];
            let mut taw = vec![0.0; q.len()];
            let mut tww = vec![0.0; q.len()];
            for qi in 0..q.len() {
                let row = table.row(qi);
                for c in 0..FF_CLASS_COUNT {
                    taa[c][qi] = sinqd_sum(&self.aa[c], row);
                }
                taw[qi] = sinqd_sum(&self.aw, row);
                tww[qi] = sinqd_sum(&self.ww, row);
            }

            let mut ff = vec![vec![0.0; q.len()]; FF_CLASS_COUNT];
            let mut fx = vec![vec![0.0; q.len()]; FF_CLASS_COUNT];
            for c in 0..FF_CLASS_COUNT {
                let class = FormFactorClass::from_index(c).unwrap();
                let f = atomic.get(class);
                let x = ExvFormFactor::of_class(class);
                let z = class.electrons();
                for (qi, &qv) in q.iter().enumerate() {
                    ff[c][qi] = f.evaluate(qv);
                    fx[c][qi] = x.evaluate(qv) / z;
                }
            }
            let fw_factor = atomic.get(FormFactorClass::OH);
            let fw = q.iter().map(|&qv| fw_factor.evaluate(qv)).collect();

            self.base = Some(BaseProfiles { taa, taw, tww, ff, fx, fw });
        }
        return self.base.as_ref().unwrap();
    }
}

fn mean_displaced_volume(class_weights: &[f64; FF_CLASS_COUNT]) -> f64 {
    let total: f64 = class_weights.iter().sum();
    if total == 0.0 {
        return displaced_volume(FormFactorClass::C);
    }
    let weighted: f64 = class_weights
        .iter()
        .enumerate()
        .map(|(c, &w)| w * displaced_volume(FormFactorClass::from_index(c).unwrap()))
        .sum();
    return weighted / total;
}

impl CompositeHistogram for CompositeDistanceHistogramFFAvg {
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
        true
    }

    fn debye_transform(&mut self) -> ScatteringProfile {
        if let Some((tag, profile)) = &self.cache {
            if *tag == self.params {
                return profile.clone();
            }
        }
        let params = self.params;
        let class_weights = self.class_weights;
        let r0 = self.r0;
        let q = Axis::default_q_axis().as_vector();
        let base = self.base();

        let w_total: f64 = class_weights.iter().sum();
        let mut intensity = vec![0.0; q.len()];
        for (qi, &qv) in q.iter().enumerate() {
            let s = params.crho * exv_factor(qv, params.cx, r0);
            // effective contrast form factor of each class
            let g: Vec<f64> =
                (0..FF_CLASS_COUNT).map(|c| base.ff[c][qi] - s * base.fx[c][qi]).collect();
            let g_avg = if w_total == 0.0 {
                0.0
            } else {
                (0..FF_CLASS_COUNT).map(|c| class_weights[c] * g[c]).sum::<f64>() / w_total
            };

            let damp_aa = (-params.ba * qv * qv).exp();
            let mut aa_sum = 0.0;
            for c in 0..FF_CLASS_COUNT {
                aa_sum += base.taa[c][qi] * g[c] * g_avg;
            }
            intensity[qi] = damp_aa * aa_sum
                + params.cw * base.taw[qi] * base.fw[qi] * g_avg
                + params.cw * params.cw * base.tww[qi] * base.fw[qi] * base.fw[qi];
        }
        let profile = ScatteringProfile::new(q, intensity);
        self.cache = Some((params, profile.clone()));
        return profile;
    }
}
