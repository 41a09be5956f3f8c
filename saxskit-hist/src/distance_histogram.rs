use log::{debug, warn};

use crate::axis::{Axis, Binning, BIN_WIDTH};
use crate::debye::{default_table, DebyeTable};
use crate::distribution::GenericDistribution1D;
use crate::profile::ScatteringProfile;

/// The total pair-distance distribution of a structure.
///
/// Carries the binned weights together with the representative distance of
/// each bin: bin centers for unweighted distributions, per-bin mean distances
/// for weighted ones. Bin 0 always represents distance 0, the
/// self-correlation.
#[derive(Clone, Debug)]
pub struct DistanceHistogram {
    p: Vec<f64>,
    width: f64,
    d_axis: Vec<f64>,
}

impl DistanceHistogram {
    /// Creates a histogram from an accumulated distribution, trimming the
    /// unused tail of the distance axis.
    pub fn from_distribution<D: GenericDistribution1D>(dist: &D, width: f64) -> DistanceHistogram {
        let mut d_axis = dist.bin_centers(width);
        let mut p = dist.counts().to_vec();
        let max_bin = trimmed_size(&p);
        p.truncate(max_bin);
        d_axis.truncate(max_bin);
        if !d_axis.is_empty() {
            d_axis[0] = 0.0; // the first bin holds self-correlation terms only
        }
        return DistanceHistogram { p, width, d_axis };
    }

    /// Creates a histogram from a distribution accumulated on an arbitrary
    /// binning; the binning supplies the fallback bin centers.
    pub fn from_distribution_binned<D, B>(dist: &D, binning: &B) -> DistanceHistogram
    where
        D: GenericDistribution1D,
        B: Binning,
    {
        let centers = binning.centers();
        let width = if centers.len() > 1 { centers[1] - centers[0] } else { 0.0 };
        let mut d_axis = dist.tracked_centers(centers);
        let mut p = dist.counts().to_vec();
        let max_bin = trimmed_size(&p);
        p.truncate(max_bin);
        d_axis.truncate(max_bin);
        if !d_axis.is_empty() {
            d_axis[0] = 0.0;
        }
        return DistanceHistogram { p, width, d_axis };
    }

    /// Creates a histogram from raw counts on the default bin centers
    pub fn from_counts(p: Vec<f64>, width: f64) -> DistanceHistogram {
        let d_axis = (0..p.len()).map(|i| i as f64 * width).collect();
        DistanceHistogram { p, width, d_axis }
    }

    /// The binned weights
    pub fn counts(&self) -> &[f64] {
        &self.p
    }

    /// The representative distance of each bin
    pub fn d_axis(&self) -> &[f64] {
        &self.d_axis
    }

    /// The bin width
    pub fn width(&self) -> f64 {
        self.width
    }

    /// The number of bins
    pub fn size(&self) -> usize {
        self.p.len()
    }

    /// Whether the underlying d-axis matches the shared default table axis
    fn matches_default_axis(&self) -> bool {
        if (self.width - BIN_WIDTH).abs() > 1e-12 || self.p.len() > default_table().size_d() {
            return false;
        }
        return self
            .d_axis
            .iter()
            .enumerate()
            .all(|(i, &d)| (d - i as f64 * BIN_WIDTH).abs() < 1e-12);
    }

    /// Debye transform of this histogram onto the default q axis.
    ///
    /// The transform damps every term with exp(-q²), a Gaussian stand-in for
    /// the average atomic form factor; the class-resolved composites replace
    /// it with real form factors.
    pub fn debye_transform(&self) -> ScatteringProfile {
        let q = Axis::default_q_axis().as_vector();
        if self.p.is_empty() {
            return ScatteringProfile::new(q.clone(), vec![0.0; q.len()]);
        }
        let intensity = if self.matches_default_axis() {
            self.transform_with(default_table(), &q)
        } else {
            let table = DebyeTable::new(&q, &self.d_axis);
            self.transform_with(&table, &q)
        };
        return ScatteringProfile::new(q, intensity);
    }

    fn transform_with(&self, table: &DebyeTable, q: &[f64]) -> Vec<f64> {
        let mut intensity = vec![0.0; q.len()];
        for (qi, qv) in q.iter().enumerate() {
            let row = table.row(qi);
            let mut sum = 0.0;
            for (di, &pv) in self.p.iter().enumerate() {
                sum += pv * row[di];
            }
            intensity[qi] = sum * (-qv * qv).exp();
        }
        return intensity;
    }

    /// Debye transform evaluated on arbitrary q values.
    ///
    /// Values inside the default axis range are interpolated from the default
    /// grid; values outside force a bespoke lookup table.
    pub fn debye_transform_on(&self, q: &[f64]) -> Vec<f64> {
        if q.is_empty() || self.p.is_empty() {
            return vec![0.0; q.len()];
        }
        let axis = Axis::default_q_axis();
        let (qmin, qmax) = (q.first().copied().unwrap_or(0.0), q.last().copied().unwrap_or(0.0));
        if axis.min <= qmin && qmax <= axis.max {
            debug!("interpolating Debye transform onto {} q points", q.len());
            return self.debye_transform().interpolate(q);
        }
        warn!("q range [{qmin}, {qmax}] outside the default axis, building a bespoke sinc table");
        let table = DebyeTable::new(q, &self.d_axis);
        return self.transform_with(&table, q);
    }

    /// Whether the distribution is dominated by sharp spikes.
    ///
    /// Counts bins that are at least 50% larger than both neighbours; when
    /// these make up over a quarter of the non-zero bins the structure is
    /// considered highly ordered, and grid-based excluded-volume terms
    /// should use weighted bin centers.
    pub fn is_highly_ordered(&self) -> bool {
        if self.p.len() < 3 {
            return false;
        }
        let mut peaks = 0usize;
        let mut non_zero = 0usize;
        for i in 1..self.p.len() - 1 {
            if self.p[i] == 0.0 {
                continue;
            }
            if self.p[i] > 1.5 * self.p[i - 1] && self.p[i] > 1.5 * self.p[i + 1] {
                peaks += 1;
            }
            non_zero += 1;
        }
        return peaks * 4 > non_zero;
    }
}

/// The number of leading bins worth keeping: everything up to the last
/// non-zero bin, but never fewer than 10.
fn trimmed_size(p: &[f64]) -> usize {
    let mut max_bin = 10.min(p.len());
    for i in (10.min(p.len())..p.len()).rev() {
        if p[i] != 0.0 {
            max_bin = i + 1;
            break;
        }
    }
    return max_bin;
}
