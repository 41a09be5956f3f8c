//! Composite distance histograms: bundles of per-interaction partials plus
//! the parameter application and Debye-transform machinery.
//!
//! Two caches are kept separate in every variant: the *sinqd cache* (the
//! form-factor-weighted sinc sums of each partial, invalidated only when the
//! underlying PDDF changes) and the *intensity cache* (the combined profile,
//! tagged with the parameter vector and recombined from the sinqd cache when
//! a parameter changes).

mod ff_avg;
mod ff_explicit;
mod ff_grid;
mod plain;

pub use ff_avg::CompositeDistanceHistogramFFAvg;
pub use ff_explicit::CompositeDistanceHistogramFFExplicit;
pub use ff_grid::{
    CompositeDistanceHistogramFFGrid, CompositeDistanceHistogramFFGridSurface, GridExvPartials,
    GridSurfaceExvPartials,
};
pub use plain::CompositeDistanceHistogram;

use log::{debug, warn};

use crate::axis::Axis;
use crate::debye::{default_table, DebyeTable};
use crate::distance_histogram::DistanceHistogram;
use crate::profile::ScatteringProfile;

/// The tunable parameters of a composite histogram.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistogramParams {
    /// hydration scale, applied to the water partials
    pub cw: f64,
    /// excluded-volume scale, applied through the distance-dependent exv factor
    pub cx: f64,
    /// solvent density scale, multiplying the excluded-volume partials
    pub crho: f64,
    /// atomic Debye-Waller B factor, damping the atom-atom term
    pub ba: f64,
    /// excluded-volume Debye-Waller B factor, damping the exv-exv term
    pub bx: f64,
}

impl Default for HistogramParams {
    fn default() -> Self {
        HistogramParams { cw: 1.0, cx: 1.0, crho: 1.0, ba: 0.0, bx: 0.0 }
    }
}

/// A composite distance histogram: the common surface the fitter works with.
///
/// All variants transform on the default q axis and interpolate onto
/// experimental q grids; parameter application is uniform, with the
/// excluded-volume parameters taking effect only on variants for which
/// [`CompositeHistogram::supports_exv`] holds.
pub trait CompositeHistogram: Send {
    /// The total PDDF this composite was built from
    fn total(&self) -> &DistanceHistogram;

    /// The current parameter vector
    fn params(&self) -> HistogramParams;

    /// Replaces the parameter vector; the intensity cache is recombined on
    /// the next transform
    fn set_params(&mut self, params: HistogramParams);

    /// Whether this variant carries excluded-volume partials
    fn supports_exv(&self) -> bool;

    /// The Debye transform under the current parameters, on the default q axis
    fn debye_transform(&mut self) -> ScatteringProfile;

    /// The Debye transform evaluated on arbitrary q values.
    ///
    /// Values inside the default axis are interpolated; out-of-range values
    /// are clamped to the axis limits and logged.
    fn debye_transform_on(&mut self, q: &[f64]) -> Vec<f64> {
        let axis = Axis::default_q_axis();
        if let (Some(&lo), Some(&hi)) = (q.first(), q.last()) {
            if lo < axis.min || axis.max < hi {
                warn!("q range [{lo}, {hi}] clamped to the axis limits [{}, {}]", axis.min, axis.max);
            }
        }
        return self.debye_transform().interpolate(q);
    }

    fn apply_water_scaling_factor(&mut self, cw: f64) {
        let mut p = self.params();
        p.cw = cw;
        self.set_params(p);
    }

    fn apply_excluded_volume_scaling_factor(&mut self, cx: f64) {
        let mut p = self.params();
        p.cx = cx;
        self.set_params(p);
    }

    fn apply_solvent_density_scaling_factor(&mut self, crho: f64) {
        let mut p = self.params();
        p.crho = crho;
        self.set_params(p);
    }

    fn apply_atomic_debye_waller_factor(&mut self, ba: f64) {
        let mut p = self.params();
        p.ba = ba;
        self.set_params(p);
    }

    fn apply_exv_debye_waller_factor(&mut self, bx: f64) {
        let mut p = self.params();
        p.bx = bx;
        self.set_params(p);
    }

    fn water_scaling_limits(&self) -> (f64, f64) {
        (0.5, 1.5)
    }

    fn exv_scaling_limits(&self) -> (f64, f64) {
        (0.8, 1.2)
    }

    fn solvent_density_limits(&self) -> (f64, f64) {
        (0.95, 1.05)
    }

    fn debye_waller_limits(&self) -> (f64, f64) {
        (0.0, 5.0)
    }
}

/// A sinc table: the shared default when the axes match, a bespoke one otherwise.
pub(crate) enum SincTable {
    Shared(&'static DebyeTable),
    Owned(Box<DebyeTable>),
}

impl SincTable {
    pub(crate) fn get(&self) -> &DebyeTable {
        match self {
            SincTable::Shared(t) => t,
            SincTable::Owned(t) => t,
        }
    }
}

/// Selects the sinc table for a distance axis on the default q grid.
pub(crate) fn sinc_table_for(d_axis: &[f64], q: &[f64]) -> SincTable {
    let table = default_table();
    let matches_default = q == table.q_values()
        && d_axis.len() <= table.size_d()
        && d_axis
            .iter()
            .enumerate()
            .all(|(i, &d)| (d - i as f64 * crate::axis::BIN_WIDTH).abs() < 1e-12);
    if matches_default {
        return SincTable::Shared(table);
    }
    debug!("building a bespoke sinc table for {} distance bins", d_axis.len());
    return SincTable::Owned(Box::new(DebyeTable::new(q, d_axis)));
}

/// Inner product of a partial with a sinc-table row, over the partial's bins.
#[inline]
pub(crate) fn sinqd_sum(p: &[f64], row: &[f64]) -> f64 {
    p.iter().zip(row.iter()).map(|(a, b)| a * b).sum()
}
