//! Binned pair-distance distributions.
//!
//! Distributions come in three ranks (distance only; form-factor class ×
//! distance; class × class × distance) and two variants each: *unweighted*
//! (counts only, bin represented by its center) and *weighted* (each bin also
//! accumulates the actual distances that landed in it, so the Debye transform
//! can use per-bin mean distances). Bin 0 is reserved for self-correlation;
//! cross-pair accumulation never touches it for distinct positions.

use saxskit_data::FF_CLASS_COUNT;

/// Per-bin tracker of the distances accumulated into a weighted distribution.
#[derive(Clone, Debug, Default)]
struct BinContent {
    count: Vec<u32>,
    content: Vec<f64>,
}

impl BinContent {
    fn with_bins(bins: usize) -> BinContent {
        BinContent { count: vec![0; bins], content: vec![0.0; bins] }
    }

    #[inline(always)]
    fn add(&mut self, bin: usize, distance: f64) {
        self.count[bin] += 1;
        self.content[bin] += distance;
    }

    fn merge(&mut self, other: &BinContent) {
        for i in 0..self.count.len().min(other.count.len()) {
            self.count[i] += other.count[i];
            self.content[i] += other.content[i];
        }
    }

    fn resize(&mut self, bins: usize) {
        self.count.resize(bins, 0);
        self.content.resize(bins, 0.0);
    }

    /// Mean accumulated distance per bin; empty bins degrade to the bin center.
    fn weighted_axis(&self, width: f64) -> Vec<f64> {
        let fallback: Vec<f64> = (0..self.count.len()).map(|i| i as f64 * width).collect();
        return self.weighted_axis_with(fallback);
    }

    /// Mean accumulated distance per bin; empty bins degrade to the fallback.
    fn weighted_axis_with(&self, fallback: Vec<f64>) -> Vec<f64> {
        let mut axis = fallback;
        for i in 0..self.count.len().min(axis.len()) {
            if self.count[i] > 0 {
                axis[i] = self.content[i] / self.count[i] as f64;
            }
        }
        if !axis.is_empty() {
            axis[0] = 0.0; // the first bin holds self-correlation only
        }
        return axis;
    }
}

/// Common interface of the 1D distribution variants.
///
/// The histogram kernels are monomorphized over the implementor, so the
/// unweighted variant pays nothing for the distance tracking it lacks.
pub trait GenericDistribution1D: Clone + Send + Sync {
    fn with_bins(bins: usize) -> Self;
    fn size(&self) -> usize;
    /// Adds a pair contribution: `weight` into `bin`, tracking `distance` when weighted
    fn add(&mut self, bin: usize, distance: f64, weight: f64);
    /// Adds a weight without distance tracking (self-correlation into bin 0)
    fn add_count(&mut self, bin: usize, weight: f64);
    fn counts(&self) -> &[f64];
    fn merge(&mut self, other: &Self);
    fn resize(&mut self, bins: usize);
    /// Representative distance of each bin given a uniform bin width
    fn bin_centers(&self, width: f64) -> Vec<f64>;
    /// Representative distances given explicit fallback centers, e.g. for a
    /// non-uniform binning; the weighted variant overrides the fallback with
    /// the tracked per-bin means
    fn tracked_centers(&self, fallback: Vec<f64>) -> Vec<f64>;
}

/// Unweighted 1D distribution: weight per distance bin.
#[derive(Clone, Debug, Default)]
pub struct Distribution1D {
    data: Vec<f64>,
}

impl Distribution1D {
    pub fn new(data: Vec<f64>) -> Distribution1D {
        Distribution1D { data }
    }

    pub fn index(&self, bin: usize) -> f64 {
        self.data[bin]
    }

    pub fn into_counts(self) -> Vec<f64> {
        self.data
    }
}

impl GenericDistribution1D for Distribution1D {
    fn with_bins(bins: usize) -> Self {
        Distribution1D { data: vec![0.0; bins] }
    }

    fn size(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    fn add(&mut self, bin: usize, _distance: f64, weight: f64) {
        let bin = bin.min(self.data.len() - 1);
        self.data[bin] += weight;
    }

    #[inline(always)]
    fn add_count(&mut self, bin: usize, weight: f64) {
        let bin = bin.min(self.data.len() - 1);
        self.data[bin] += weight;
    }

    fn counts(&self) -> &[f64] {
        &self.data
    }

    fn merge(&mut self, other: &Self) {
        for i in 0..self.data.len().min(other.data.len()) {
            self.data[i] += other.data[i];
        }
    }

    fn resize(&mut self, bins: usize) {
        self.data.resize(bins, 0.0);
    }

    fn bin_centers(&self, width: f64) -> Vec<f64> {
        (0..self.data.len()).map(|i| i as f64 * width).collect()
    }

    fn tracked_centers(&self, fallback: Vec<f64>) -> Vec<f64> {
        fallback
    }
}

/// Weighted 1D distribution: weight per bin plus per-bin distance tracking.
#[derive(Clone, Debug, Default)]
pub struct WeightedDistribution1D {
    data: Vec<f64>,
    tracker: BinContent,
}

impl WeightedDistribution1D {
    pub fn index(&self, bin: usize) -> f64 {
        self.data[bin]
    }

    /// The unweighted view of this distribution
    pub fn as_unweighted(&self) -> Distribution1D {
        Distribution1D::new(self.data.clone())
    }
}

impl GenericDistribution1D for WeightedDistribution1D {
    fn with_bins(bins: usize) -> Self {
        WeightedDistribution1D { data: vec![0.0; bins], tracker: BinContent::with_bins(bins) }
    }

    fn size(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    fn add(&mut self, bin: usize, distance: f64, weight: f64) {
        let bin = bin.min(self.data.len() - 1);
        self.data[bin] += weight;
        self.tracker.add(bin, distance);
    }

    #[inline(always)]
    fn add_count(&mut self, bin: usize, weight: f64) {
        let bin = bin.min(self.data.len() - 1);
        self.data[bin] += weight;
    }

    fn counts(&self) -> &[f64] {
        &self.data
    }

    fn merge(&mut self, other: &Self) {
        for i in 0..self.data.len().min(other.data.len()) {
            self.data[i] += other.data[i];
        }
        self.tracker.merge(&other.tracker);
    }

    fn resize(&mut self, bins: usize) {
        self.data.resize(bins, 0.0);
        self.tracker.resize(bins);
    }

    fn bin_centers(&self, width: f64) -> Vec<f64> {
        self.tracker.weighted_axis(width)
    }

    fn tracked_centers(&self, fallback: Vec<f64>) -> Vec<f64> {
        self.tracker.weighted_axis_with(fallback)
    }
}

/// Common interface of the 2D (class × distance) distribution variants.
pub trait GenericDistribution2D: Clone + Send + Sync {
    fn with_bins(bins: usize) -> Self;
    fn size(&self) -> usize;
    fn add(&mut self, class: usize, bin: usize, distance: f64, weight: f64);
    fn add_count(&mut self, class: usize, bin: usize, weight: f64);
    /// The distance row of one class
    fn class_counts(&self, class: usize) -> &[f64];
    /// Sum over all classes, yielding the plain distance distribution
    fn project(&self) -> Vec<f64>;
    fn merge(&mut self, other: &Self);
    fn resize(&mut self, bins: usize);
    fn bin_centers(&self, width: f64) -> Vec<f64>;
}

/// Unweighted (form-factor class × distance) distribution.
#[derive(Clone, Debug, Default)]
pub struct Distribution2D {
    bins: usize,
    data: Vec<f64>, // row-major: class * bins + bin
}

impl GenericDistribution2D for Distribution2D {
    fn with_bins(bins: usize) -> Self {
        Distribution2D { bins, data: vec![0.0; FF_CLASS_COUNT * bins] }
    }

    fn size(&self) -> usize {
        self.bins
    }

    #[inline(always)]
    fn add(&mut self, class: usize, bin: usize, _distance: f64, weight: f64) {
        self.data[class * self.bins + bin.min(self.bins - 1)] += weight;
    }

    #[inline(always)]
    fn add_count(&mut self, class: usize, bin: usize, weight: f64) {
        self.data[class * self.bins + bin.min(self.bins - 1)] += weight;
    }

    fn class_counts(&self, class: usize) -> &[f64] {
        &self.data[class * self.bins..(class + 1) * self.bins]
    }

    fn project(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.bins];
        for class in 0..FF_CLASS_COUNT {
            for (i, v) in self.class_counts(class).iter().enumerate() {
                out[i] += v;
            }
        }
        return out;
    }

    fn merge(&mut self, other: &Self) {
        for i in 0..self.data.len().min(other.data.len()) {
            self.data[i] += other.data[i];
        }
    }

    fn resize(&mut self, bins: usize) {
        let mut data = vec![0.0; FF_CLASS_COUNT * bins];
        let keep = self.bins.min(bins);
        for class in 0..FF_CLASS_COUNT {
            for bin in 0..keep {
                data[class * bins + bin] = self.data[class * self.bins + bin];
            }
        }
        self.bins = bins;
        self.data = data;
    }

    fn bin_centers(&self, width: f64) -> Vec<f64> {
        (0..self.bins).map(|i| i as f64 * width).collect()
    }
}

/// Weighted (form-factor class × distance) distribution.
///
/// Distance tracking is shared across classes: the weighted axis describes
/// the distance bins, not the class axis.
#[derive(Clone, Debug, Default)]
pub struct WeightedDistribution2D {
    inner: Distribution2D,
    tracker: BinContent,
}

impl GenericDistribution2D for WeightedDistribution2D {
    fn with_bins(bins: usize) -> Self {
        WeightedDistribution2D {
            inner: Distribution2D::with_bins(bins),
            tracker: BinContent::with_bins(bins),
        }
    }

    fn size(&self) -> usize {
        self.inner.size()
    }

    #[inline(always)]
    fn add(&mut self, class: usize, bin: usize, distance: f64, weight: f64) {
        let bin = bin.min(self.inner.bins - 1);
        self.inner.add(class, bin, distance, weight);
        self.tracker.add(bin, distance);
    }

    #[inline(always)]
    fn add_count(&mut self, class: usize, bin: usize, weight: f64) {
        self.inner.add_count(class, bin, weight);
    }

    fn class_counts(&self, class: usize) -> &[f64] {
        self.inner.class_counts(class)
    }

    fn project(&self) -> Vec<f64> {
        self.inner.project()
    }

    fn merge(&mut self, other: &Self) {
        self.inner.merge(&other.inner);
        self.tracker.merge(&other.tracker);
    }

    fn resize(&mut self, bins: usize) {
        self.inner.resize(bins);
        self.tracker.resize(bins);
    }

    fn bin_centers(&self, width: f64) -> Vec<f64> {
        self.tracker.weighted_axis(width)
    }
}

/// Common interface of the 3D (class × class × distance) distribution variants.
///
/// The class pair is unordered: `add` normalizes `(c1, c2)` to `(min, max)`,
/// so each unordered pair occupies exactly one slot and consumers iterate
/// `c1 <= c2` only. The ordered-pair multiplicity is folded into the weights
/// at accumulation time.
pub trait GenericDistribution3D: Clone + Send + Sync {
    fn with_bins(bins: usize) -> Self;
    fn size(&self) -> usize;
    fn add(&mut self, c1: usize, c2: usize, bin: usize, distance: f64, weight: f64);
    fn add_count(&mut self, c1: usize, c2: usize, bin: usize, weight: f64);
    /// The distance row of one unordered class pair; requires `c1 <= c2`
    fn pair_counts(&self, c1: usize, c2: usize) -> &[f64];
    /// Sum over all class pairs, yielding the plain distance distribution
    fn project(&self) -> Vec<f64>;
    fn merge(&mut self, other: &Self);
    fn resize(&mut self, bins: usize);
    fn bin_centers(&self, width: f64) -> Vec<f64>;
}

/// Unweighted (class × class × distance) distribution.
#[derive(Clone, Debug, Default)]
pub struct Distribution3D {
    bins: usize,
    data: Vec<f64>, // row-major: (c1 * FF_CLASS_COUNT + c2) * bins + bin, c1 <= c2
}

impl Distribution3D {
    #[inline(always)]
    fn offset(&self, c1: usize, c2: usize) -> usize {
        debug_assert!(c1 <= c2, "class pair must be unordered");
        (c1 * FF_CLASS_COUNT + c2) * self.bins
    }
}

impl GenericDistribution3D for Distribution3D {
    fn with_bins(bins: usize) -> Self {
        Distribution3D { bins, data: vec![0.0; FF_CLASS_COUNT * FF_CLASS_COUNT * bins] }
    }

    fn size(&self) -> usize {
        self.bins
    }

    #[inline(always)]
    fn add(&mut self, c1: usize, c2: usize, bin: usize, _distance: f64, weight: f64) {
        let (lo, hi) = if c1 <= c2 { (c1, c2) } else { (c2, c1) };
        let off = self.offset(lo, hi);
        self.data[off + bin.min(self.bins - 1)] += weight;
    }

    #[inline(always)]
    fn add_count(&mut self, c1: usize, c2: usize, bin: usize, weight: f64) {
        let (lo, hi) = if c1 <= c2 { (c1, c2) } else { (c2, c1) };
        let off = self.offset(lo, hi);
        self.data[off + bin.min(self.bins - 1)] += weight;
    }

    fn pair_counts(&self, c1: usize, c2: usize) -> &[f64] {
        let off = self.offset(c1, c2);
        &self.data[off..off + self.bins]
    }

    fn project(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.bins];
        for c1 in 0..FF_CLASS_COUNT {
            for c2 in c1..FF_CLASS_COUNT {
                for (i, v) in self.pair_counts(c1, c2).iter().enumerate() {
                    out[i] += v;
                }
            }
        }
        return out;
    }

    fn merge(&mut self, other: &Self) {
        for i in 0..self.data.len().min(other.data.len()) {
            self.data[i] += other.data[i];
        }
    }

    fn resize(&mut self, bins: usize) {
        let mut data = vec![0.0; FF_CLASS_COUNT * FF_CLASS_COUNT * bins];
        let keep = self.bins.min(bins);
        for c1 in 0..FF_CLASS_COUNT {
            for c2 in c1..FF_CLASS_COUNT {
                let old = (c1 * FF_CLASS_COUNT + c2) * self.bins;
                let new = (c1 * FF_CLASS_COUNT + c2) * bins;
                data[new..new + keep].copy_from_slice(&self.data[old..old + keep]);
            }
        }
        self.bins = bins;
        self.data = data;
    }

    fn bin_centers(&self, width: f64) -> Vec<f64> {
        (0..self.bins).map(|i| i as f64 * width).collect()
    }
}

/// Weighted (class × class × distance) distribution with shared distance tracking.
#[derive(Clone, Debug, Default)]
pub struct WeightedDistribution3D {
    inner: Distribution3D,
    tracker: BinContent,
}

impl GenericDistribution3D for WeightedDistribution3D {
    fn with_bins(bins: usize) -> Self {
        WeightedDistribution3D {
            inner: Distribution3D::with_bins(bins),
            tracker: BinContent::with_bins(bins),
        }
    }

    fn size(&self) -> usize {
        self.inner.size()
    }

    #[inline(always)]
    fn add(&mut self, c1: usize, c2: usize, bin: usize, distance: f64, weight: f64) {
        let bin = bin.min(self.inner.bins - 1);
        self.inner.add(c1, c2, bin, distance, weight);
        self.tracker.add(bin, distance);
    }

    #[inline(always)]
    fn add_count(&mut self, c1: usize, c2: usize, bin: usize, weight: f64) {
        self.inner.add_count(c1, c2, bin, weight);
    }

    fn pair_counts(&self, c1: usize, c2: usize) -> &[f64] {
        self.inner.pair_counts(c1, c2)
    }

    fn project(&self) -> Vec<f64> {
        self.inner.project()
    }

    fn merge(&mut self, other: &Self) {
        self.inner.merge(&other.inner);
        self.tracker.merge(&other.tracker);
    }

    fn resize(&mut self, bins: usize) {
        self.inner.resize(bins);
        self.tracker.resize(bins);
    }

    fn bin_centers(&self, width: f64) -> Vec<f64> {
        self.tracker.weighted_axis(width)
    }
}
