use saxskit_data::{FormFactorClass, FF_CLASS_COUNT};

use crate::axis::Axis;
use crate::composite::{sinc_table_for, sinqd_sum, CompositeHistogram, HistogramParams};
use crate::debye::DebyeTable;
use crate::distance_histogram::DistanceHistogram;
use crate::distribution::{GenericDistribution1D, GenericDistribution2D, GenericDistribution3D};
use crate::form_factor::{atomic_table, exv_factor, product_table, ExvFormFactor};
use crate::profile::ScatteringProfile;

/// The excluded-volume partials produced by a grid-based histogram manager.
///
/// The grid's regular lattice makes these distributions highly ordered, so
/// each carries its own weighted distance axis and gets its own sinc table.
pub struct GridExvPartials<D1, D2> {
    /// atom-grid partial, class-resolved on the atom side
    pub ax: D2,
    /// grid-grid partial
    pub xx: D1,
    /// water-grid partial
    pub wx: D1,
}

/// The excluded-volume partials split into surface and interior grid points.
pub struct GridSurfaceExvPartials<D1, D2> {
    pub ax_interior: D2,
    pub ax_surface: D2,
    pub xx_ii: D1,
    pub xx_is: D1,
    pub xx_ss: D1,
    pub wx_interior: D1,
    pub wx_surface: D1,
}

/// The atomic (non-exv) part shared by the two grid variants.
struct AtomicPartials {
    aa: Vec<Vec<f64>>, // per unordered class pair
    aw: Vec<Vec<f64>>, // per atom class
    ww: Vec<f64>,
    d_axis_aa: Vec<f64>,
    d_axis_aw: Vec<f64>,
    d_axis_ww: Vec<f64>,
}

/// A class-resolved partial restricted to one excluded-volume point set,
/// together with its weighted distance axis.
struct AxisPartial2 {
    rows: Vec<Vec<f64>>,
    axis: Vec<f64>,
}

struct AxisPartial1 {
    counts: Vec<f64>,
    axis: Vec<f64>,
}

fn pair_index(c1: usize, c2: usize) -> usize {
    debug_assert!(c1 <= c2);
    c1 * FF_CLASS_COUNT + c2
}

fn take_atomic<D1, D2, D3>(aa: &D3, aw: &D2, ww: &D1, n: usize, width: f64) -> AtomicPartials
where
    D1: GenericDistribution1D,
    D2: GenericDistribution2D,
    D3: GenericDistribution3D,
{
    let take = |d: &[f64]| {
        let mut v = d.to_vec();
        v.resize(n, 0.0);
        v
    };
    let axis = |mut a: Vec<f64>| {
        a.truncate(n);
        a
    };
    let mut aa_rows = vec![Vec::new(); FF_CLASS_COUNT * FF_CLASS_COUNT];
    for c1 in 0..FF_CLASS_COUNT {
        for c2 in c1..FF_CLASS_COUNT {
            aa_rows[pair_index(c1, c2)] = take(aa.pair_counts(c1, c2));
        }
    }
    AtomicPartials {
        aa: aa_rows,
        aw: (0..FF_CLASS_COUNT).map(|c| take(aw.class_counts(c))).collect(),
        ww: take(ww.counts()),
        d_axis_aa: axis(aa.bin_centers(width)),
        d_axis_aw: axis(aw.bin_centers(width)),
        d_axis_ww: axis(ww.bin_centers(width)),
    }
}

fn take_partial2<D2: GenericDistribution2D>(d: &D2, width: f64) -> AxisPartial2 {
    AxisPartial2 {
        rows: (0..FF_CLASS_COUNT).map(|c| d.class_counts(c).to_vec()).collect(),
        axis: d.bin_centers(width),
    }
}

fn take_partial1<D1: GenericDistribution1D>(d: &D1, width: f64) -> AxisPartial1 {
    AxisPartial1 { counts: d.counts().to_vec(), axis: d.bin_centers(width) }
}

/// Sums an atomic-partials bundle into form-factor-weighted sinc profiles.
fn atomic_base(partials: &AtomicPartials, q: &[f64]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let products = product_table();
    let atomic = atomic_table();
    let nq = q.len();

    let mut aa = vec![0.0; nq];
    let mut aw = vec![0.0; nq];
    let mut ww = vec![0.0; nq];

    let table_aa = sinc_table_for(&partials.d_axis_aa, q);
    let table_aa = table_aa.get();
    for c1 in 0..FF_CLASS_COUNT {
        for c2 in c1..FF_CLASS_COUNT {
            let idx = pair_index(c1, c2);
            if partials.aa[idx].iter().all(|&v| v == 0.0) {
                continue;
            }
            let ff = products.aa(c1, c2);
            for qi in 0..nq {
                aa[qi] += sinqd_sum(&partials.aa[idx], table_aa.row(qi)) * ff[qi];
            }
        }
    }

    let table_aw = sinc_table_for(&partials.d_axis_aw, q);
    let table_aw = table_aw.get();
    let fw = atomic.get(FormFactorClass::OH);
    for c in 0..FF_CLASS_COUNT {
        if partials.aw[c].iter().all(|&v| v == 0.0) {
            continue;
        }
        let fa = atomic.get(FormFactorClass::from_index(c).unwrap());
        for (qi, &qv) in q.iter().enumerate() {
            aw[qi] += sinqd_sum(&partials.aw[c], table_aw.row(qi)) * fa.evaluate(qv) * fw.evaluate(qv);
        }
    }

    let table_ww = sinc_table_for(&partials.d_axis_ww, q);
    let table_ww = table_ww.get();
    for (qi, &qv) in q.iter().enumerate() {
        let f = fw.evaluate(qv);
        ww[qi] = sinqd_sum(&partials.ww, table_ww.row(qi)) * f * f;
    }

    return (aa, aw, ww);
}

/// Sinc profile of an atom-grid partial on its own axis.
fn ax_base(partial: &AxisPartial2, exv: &ExvFormFactor, q: &[f64]) -> Vec<f64> {
    let table = DebyeTable::new(q, &partial.axis);
    let atomic = atomic_table();
    let mut out = vec![0.0; q.len()];
    for c in 0..FF_CLASS_COUNT {
        if partial.rows[c].iter().all(|&v| v == 0.0) {
            continue;
        }
        let fa = atomic.get(FormFactorClass::from_index(c).unwrap());
        for (qi, &qv) in q.iter().enumerate() {
            out[qi] += sinqd_sum(&partial.rows[c], table.row(qi)) * fa.evaluate(qv) * exv.evaluate(qv);
        }
    }
    return out;
}

/// Sinc profile of a grid-grid partial on its own axis.
fn xx_base(partial: &AxisPartial1, exv: &ExvFormFactor, q: &[f64]) -> Vec<f64> {
    let table = DebyeTable::new(q, &partial.axis);
    q.iter()
        .enumerate()
        .map(|(qi, &qv)| {
            let f = exv.evaluate(qv);
            sinqd_sum(&partial.counts, table.row(qi)) * f * f
        })
        .collect()
}

/// Sinc profile of a water-grid partial on its own axis.
fn wx_base(partial: &AxisPartial1, exv: &ExvFormFactor, q: &[f64]) -> Vec<f64> {
    let table = DebyeTable::new(q, &partial.axis);
    let fw = atomic_table().get(FormFactorClass::OH);
    q.iter()
        .enumerate()
        .map(|(qi, &qv)| {
            sinqd_sum(&partial.counts, table.row(qi)) * fw.evaluate(qv) * exv.evaluate(qv)
        })
        .collect()
}

struct GridBase {
    aa: Vec<f64>,
    aw: Vec<f64>,
    ww: Vec<f64>,
    ax: Vec<f64>,
    xx: Vec<f64>,
    wx: Vec<f64>,
}

/// Composite histogram with the excluded volume modelled by a space-filling
/// grid of dummy scatterers.
///
/// The atomic partials behave like the explicit-form-factor variant; the
/// grid partials carry their own weighted distance axes because the regular
/// point lattice concentrates distances on a few exact values.
pub struct CompositeDistanceHistogramFFGrid {
    atomic: AtomicPartials,
    ax: AxisPartial2,
    xx: AxisPartial1,
    wx: AxisPartial1,
    exv_ff: ExvFormFactor,
    total: DistanceHistogram,
    r0: f64,
    params: HistogramParams,
    base: Option<GridBase>,
    cache: Option<(HistogramParams, ScatteringProfile)>,
}

impl CompositeDistanceHistogramFFGrid {
    #[allow(clippy::too_many_arguments)]
    pub fn new<D1, D2, D3>(
        aa: &D3,
        aw: &D2,
        ww: &D1,
        total: &D1,
        exv: &GridExvPartials<D1, D2>,
        point_volume: f64,
        r0: f64,
        width: f64,
    ) -> Self
    where
        D1: GenericDistribution1D,
        D2: GenericDistribution2D,
        D3: GenericDistribution3D,
    {
        let total = DistanceHistogram::from_distribution(total, width);
        let n = total.size();
        return CompositeDistanceHistogramFFGrid {
            atomic: take_atomic(aa, aw, ww, n, width),
            ax: take_partial2(&exv.ax, width),
            xx: take_partial1(&exv.xx, width),
            wx: take_partial1(&exv.wx, width),
            exv_ff: ExvFormFactor::new(point_volume),
            total,
            r0,
            params: HistogramParams::default(),
            base: None,
            cache: None,
        };
    }

    fn base(&mut self) -> &GridBase {
        if self.base.is_none() {
            let q = Axis::default_q_axis().as_vector();
            let (aa, aw, ww) = atomic_base(&self.atomic, &q);
            self.base = Some(GridBase {
                aa,
                aw,
                ww,
                ax: ax_base(&self.ax, &self.exv_ff, &q),
                xx: xx_base(&self.xx, &self.exv_ff, &q),
                wx: wx_base(&self.wx, &self.exv_ff, &q),
            });
        }
        return self.base.as_ref().unwrap();
    }
}

impl CompositeHistogram for CompositeDistanceHistogramFFGrid {
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

struct GridSurfaceBase {
    aa: Vec<f64>,
    aw: Vec<f64>,
    ww: Vec<f64>,
    ax_i: Vec<f64>,
    ax_s: Vec<f64>,
    xx_ii: Vec<f64>,
    xx_is: Vec<f64>,
    xx_ss: Vec<f64>,
    wx_i: Vec<f64>,
    wx_s: Vec<f64>,
}

/// Grid-based composite histogram with the excluded-volume points split into
/// surface and interior sets.
///
/// The excluded-volume scale acts on the surface amplitude only, so fitting
/// it reshapes the effective particle boundary instead of swelling the whole
/// volume.
pub struct CompositeDistanceHistogramFFGridSurface {
    atomic: AtomicPartials,
    ax_i: AxisPartial2,
    ax_s: AxisPartial2,
    xx_ii: AxisPartial1,
    xx_is: AxisPartial1,
    xx_ss: AxisPartial1,
    wx_i: AxisPartial1,
    wx_s: AxisPartial1,
    exv_ff: ExvFormFactor,
    total: DistanceHistogram,
    params: HistogramParams,
    base: Option<GridSurfaceBase>,
    cache: Option<(HistogramParams, ScatteringProfile)>,
}

impl CompositeDistanceHistogramFFGridSurface {
    #[allow(clippy::too_many_arguments)]
    pub fn new<D1, D2, D3>(
        aa: &D3,
        aw: &D2,
        ww: &D1,
        total: &D1,
        exv: &GridSurfaceExvPartials<D1, D2>,
        point_volume: f64,
        width: f64,
    ) -> Self
    where
        D1: GenericDistribution1D,
        D2: GenericDistribution2D,
        D3: GenericDistribution3D,
    {
        let total = DistanceHistogram::from_distribution(total, width);
        let n = total.size();
        return CompositeDistanceHistogramFFGridSurface {
            atomic: take_atomic(aa, aw, ww, n, width),
            ax_i: take_partial2(&exv.ax_interior, width),
            ax_s: take_partial2(&exv.ax_surface, width),
            xx_ii: take_partial1(&exv.xx_ii, width),
            xx_is: take_partial1(&exv.xx_is, width),
            xx_ss: take_partial1(&exv.xx_ss, width),
            wx_i: take_partial1(&exv.wx_interior, width),
            wx_s: take_partial1(&exv.wx_surface, width),
            exv_ff: ExvFormFactor::new(point_volume),
            total,
            params: HistogramParams::default(),
            base: None,
            cache: None,
        };
    }

    fn base(&mut self) -> &GridSurfaceBase {
        if self.base.is_none() {
            let q = Axis::default_q_axis().as_vector();
            let (aa, aw, ww) = atomic_base(&self.atomic, &q);
            self.base = Some(GridSurfaceBase {
                aa,
                aw,
                ww,
                ax_i: ax_base(&self.ax_i, &self.exv_ff, &q),
                ax_s: ax_base(&self.ax_s, &self.exv_ff, &q),
                xx_ii: xx_base(&self.xx_ii, &self.exv_ff, &q),
                xx_is: xx_base(&self.xx_is, &self.exv_ff, &q),
                xx_ss: xx_base(&self.xx_ss, &self.exv_ff, &q),
                wx_i: wx_base(&self.wx_i, &self.exv_ff, &q),
                wx_s: wx_base(&self.wx_s, &self.exv_ff, &q),
            });
        }
        return self.base.as_ref().unwrap();
    }
}

impl CompositeHistogram for CompositeDistanceHistogramFFGridSurface {
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
        let q = Axis::default_q_axis().as_vector();
        let base = self.base();

        let mut intensity = vec![0.0; q.len()];
        for (qi, &qv) in q.iter().enumerate() {
            let s = params.crho;
            let t = params.cx; // surface amplitude scale
            let damp_aa = (-params.ba * qv * qv).exp();
            let damp_xx = (-params.bx * qv * qv).exp();
            let ax = base.ax_i[qi] + t * base.ax_s[qi];
            let xx = base.xx_ii[qi] + t * base.xx_is[qi] + t * t * base.xx_ss[qi];
            let wx = base.wx_i[qi] + t * base.wx_s[qi];
            intensity[qi] = damp_aa * base.aa[qi] - s * ax + damp_xx * s * s * xx
                + params.cw * base.aw[qi]
                - params.cw * s * wx
                + params.cw * params.cw * base.ww[qi];
        }
        let profile = ScatteringProfile::new(q, intensity);
        self.cache = Some((params, profile.clone()));
        return profile;
    }
}
