use saxskit_data::{FormFactorClass, FF_CLASS_COUNT};

use crate::axis::Axis;
use crate::composite::{sinc_table_for, sinqd_sum, CompositeHistogram, HistogramParams};
use crate::distance_histogram::DistanceHistogram;
use crate::distribution::{GenericDistribution1D, GenericDistribution2D, GenericDistribution3D};
use crate::form_factor::{atomic_table, exv_factor, product_table, ExvFormFactor};
use crate::profile::ScatteringProfile;

/// Form-factor-weighted sinc sums of each partial, computed once per PDDF.
struct BaseProfiles {
    aa: Vec<f64>,
    ax: Vec<f64>,
    xx: Vec<f64>,
    aw: Vec<f64>,
    wx: Vec<f64>,
    ww: Vec<f64>,
}

/// Composite histogram with explicit per-class-pair form factors.
///
/// The atom-atom partial is resolved over unordered class pairs; the
/// excluded volume is modelled by a pseudo-atom at every atom position with
/// the Gaussian-sphere form factor of its class's displaced volume. The
/// atom-exv and exv-exv partials share the distance set of the atom-atom
/// partial and differ only in their weights.
pub struct CompositeDistanceHistogramFFExplicit {
    aa: Vec<Vec<f64>>, // per unordered class pair, row-major c1 <= c2
    ax: Vec<Vec<f64>>,
    xx: Vec<Vec<f64>>,
    aw: Vec<Vec<f64>>, // per atom class
    wx: Vec<Vec<f64>>,
    ww: Vec<f64>,
    d_axis_aa: Vec<f64>,
    d_axis_aw: Vec<f64>,
    d_axis_ww: Vec<f64>,
    total: DistanceHistogram,
    r0: f64,
    params: HistogramParams,
    base: Option<BaseProfiles>,
    cache: Option<(HistogramParams, ScatteringProfile)>,
}

fn pair_index(c1: usize, c2: usize) -> usize {
    debug_assert!(c1 <= c2);
    c1 * FF_CLASS_COUNT + c2
}

impl CompositeDistanceHistogramFFExplicit {
    #[allow(clippy::too_many_arguments)]
    pub fn new<D1, D2, D3>(
        aa: &D3,
        ax: &D3,
        xx: &D3,
        aw: &D2,
        wx: &D2,
        ww: &D1,
        total: &D1,
        width: f64,
    ) -> Self
    where
        D1: GenericDistribution1D,
        D2: GenericDistribution2D,
        D3: GenericDistribution3D,
    {
        let total = DistanceHistogram::from_distribution(total, width);
        let n = total.size();
        let take = |d: &[f64]| {
            let mut v = d.to_vec();
            v.resize(n, 0.0);
            v
        };
        let take3 = |d: &D3| {
            let mut out = vec![Vec::new(); FF_CLASS_COUNT * FF_CLASS_COUNT];
            for c1 in 0..FF_CLASS_COUNT {
                for c2 in c1..FF_CLASS_COUNT {
                    out[pair_index(c1, c2)] = take(d.pair_counts(c1, c2));
                }
            }
            out
        };
        let take2 = |d: &D2| {
            (0..FF_CLASS_COUNT).map(|c| take(d.class_counts(c))).collect::<Vec<_>>()
        };

        let truncate_axis = |mut axis: Vec<f64>| {
            axis.truncate(n);
            axis
        };
        return CompositeDistanceHistogramFFExplicit {
            aa: take3(aa),
            ax: take3(ax),
            xx: take3(xx),
            aw: take2(aw),
            wx: take2(wx),
            ww: take(ww.counts()),
            d_axis_aa: truncate_axis(aa.bin_centers(width)),
            d_axis_aw: truncate_axis(aw.bin_centers(width)),
            d_axis_ww: truncate_axis(ww.bin_centers(width)),
            total,
            r0: 1.58, // radius of the average displaced volume
            params: HistogramParams::default(),
            base: None,
            cache: None,
        };
    }

    fn base(&mut self) -> &BaseProfiles {
        if self.base.is_none() {
            let q = Axis::default_q_axis().as_vector();
            let table_aa = sinc_table_for(&self.d_axis_aa, &q);
            let table = table_aa.get();
            let products = product_table();
            let atomic = atomic_table();

            let nq = q.len();
            let mut base = BaseProfiles {
                aa: vec![0.0; nq],
                ax: vec![0.0; nq],
                xx: vec![0.0; nq],
                aw: vec![0.0; nq],
                wx: vec![0.0; nq],
                ww: vec![0.0; nq],
            };

            for c1 in 0..FF_CLASS_COUNT {
                for c2 in c1..FF_CLASS_COUNT {
                    let idx = pair_index(c1, c2);
                    if self.aa[idx].iter().all(|&v| v == 0.0)
                        && self.ax[idx].iter().all(|&v| v == 0.0)
                        && self.xx[idx].iter().all(|&v| v == 0.0)
                    {
                        continue;
                    }
                    let ff_aa = products.aa(c1, c2);
                    let ff_ax = products.ax(c1, c2);
                    let ff_xx = products.xx(c1, c2);
                    for qi in 0..nq {
                        let row = table.row(qi);
                        base.aa[qi] += sinqd_sum(&self.aa[idx], row) * ff_aa[qi];
                        base.ax[qi] += sinqd_sum(&self.ax[idx], row) * ff_ax[qi];
                        base.xx[qi] += sinqd_sum(&self.xx[idx], row) * ff_xx[qi];
                    }
                }
            }

            let table_aw = sinc_table_for(&self.d_axis_aw, &q);
            let table_aw = table_aw.get();
            let fw = atomic.get(FormFactorClass::OH);
            for c in 0..FF_CLASS_COUNT {
                if self.aw[c].iter().all(|&v| v == 0.0) && self.wx[c].iter().all(|&v| v == 0.0) {
                    continue;
                }
                let class = FormFactorClass::from_index(c).unwrap();
                let fa = atomic.get(class);
                let fx = ExvFormFactor::of_class(class);
                for (qi, &qv) in q.iter().enumerate() {
                    let row = table_aw.row(qi);
                    let fwq = fw.evaluate(qv);
                    base.aw[qi] += sinqd_sum(&self.aw[c], row) * fa.evaluate(qv) * fwq;
                    base.wx[qi] += sinqd_sum(&self.wx[c], row) * fx.evaluate(qv) * fwq;
                }
            }

            let table_ww = sinc_table_for(&self.d_axis_ww, &q);
            let table_ww = table_ww.get();
            for (qi, &qv) in q.iter().enumerate() {
                let f = fw.evaluate(qv);
                base.ww[qi] = sinqd_sum(&self.ww, table_ww.row(qi)) * f * f;
            }

            self.base = Some(base);
        }
        return self.base.as_ref().unwrap();
    }

    /// The excluded-volume scaling factor of this variant.
    pub fn exv_factor(&self, q: f64, cx: f64) -> f64 {
        exv_factor(q, cx, self.r0)
    }
}

impl CompositeHistogram for CompositeDistanceHistogramFFExplicit {
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
        let r0 = self.r0;
        let q = Axis::default_q_axis().as_vector();
        let base = self.base();

        let mut intensity = vec![0.0; q.len()];
        for (qi, &qv) in q.iter().enumerate() {
            let s = params.crho * exv_factor(qv, params.cx, r0);
            let damp_aa = (-params.ba * qv * qv).exp();
            let damp_xx = (-params.bx * qv * qv).exp();
            intensity[qi] = damp_aa * base.aa[qi] - s * base.ax[qi]
                + damp_xx * s * s * base.xx[qi]
                + params.cw * base.aw[qi]
                - params.cw * s * base.wx[qi]
                + params.cw * params.cw * base.ww[qi];
        }
        let profile = ScatteringProfile::new(q, intensity);
        self.cache = Some((params, profile.clone()));
        return profile;
    }
}
