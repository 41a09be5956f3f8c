use crate::HistError;

/// Default distance bin width in Å.
pub const BIN_WIDTH: f64 = 0.1;

/// Default number of distance bins; together with [`BIN_WIDTH`] this caps the
/// largest representable pair distance at 200 Å.
pub const D_BINS: usize = 2000;

/// Default scattering-vector axis, in Å⁻¹.
pub const Q_MIN: f64 = 1e-4;
pub const Q_MAX: f64 = 1.0;
pub const Q_BINS: usize = 400;

/// Number of outer-loop rows processed per parallel work unit.
pub const JOB_SIZE: usize = 512;

/// A uniform binning axis.
///
/// # Example
/// ```
/// use saxskit_hist::Axis;
/// let axis = Axis::new(0.0, 10.0, 100).unwrap();
/// assert_eq!(axis.width(), 0.1);
/// assert_eq!(axis.get_bin(0.55), 5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub bins: usize,
}

impl Axis {
    /// Creates an axis; fails when the bin width would be zero or negative
    pub fn new(min: f64, max: f64, bins: usize) -> Result<Axis, HistError> {
        if bins == 0 || max <= min {
            return Err(HistError::InvalidAxis { min, max, bins });
        }
        return Ok(Axis { min, max, bins });
    }

    /// The default distance axis: [`D_BINS`] bins of [`BIN_WIDTH`] Å each
    pub fn default_d_axis() -> Axis {
        Axis { min: 0.0, max: D_BINS as f64 * BIN_WIDTH, bins: D_BINS }
    }

    /// The default scattering-vector axis
    pub fn default_q_axis() -> Axis {
        Axis { min: Q_MIN, max: Q_MAX, bins: Q_BINS }
    }

    /// Width of a single bin
    pub fn width(&self) -> f64 {
        (self.max - self.min) / self.bins as f64
    }

    /// The bin holding a given value, clamped to the axis range
    pub fn get_bin(&self, value: f64) -> usize {
        if value <= self.min {
            return 0;
        }
        let bin = ((value - self.min) / self.width()).floor() as usize;
        return bin.min(self.bins - 1);
    }

    /// The representative values of all bins: `min + i * width`
    pub fn as_vector(&self) -> Vec<f64> {
        let w = self.width();
        (0..self.bins).map(|i| self.min + i as f64 * w).collect()
    }

    /// The sub-axis spanning `[min, max]`, clamped to this axis' range
    pub fn sub_axis(&self, min: f64, max: f64) -> Axis {
        let min = min.max(self.min);
        let max = max.min(self.max);
        let first = self.get_bin(min);
        let last = self.get_bin(max);
        let w = self.width();
        return Axis {
            min: self.min + first as f64 * w,
            max: self.min + (last + 1) as f64 * w,
            bins: last + 1 - first,
        };
    }
}

/// Maps a pair distance to a bin index.
///
/// The histogram kernels are monomorphized over the implementor so the
/// common uniform case compiles down to one multiply and one round.
pub trait Binning: Clone + Send + Sync {
    /// The bin holding a given distance
    fn bin(&self, distance: f64) -> usize;

    /// The number of bins
    fn bins(&self) -> usize;

    /// The representative distance of each bin
    fn centers(&self) -> Vec<f64>;
}

/// Uniform bins of constant width; bin `i` is centred on `i * width`.
///
/// Distances are assigned by rounding `d / width`, so a distance lying
/// exactly on a bin's representative value maps to that bin.
#[derive(Clone, Debug)]
pub struct UniformBinning {
    inv_width: f64,
    width: f64,
    bins: usize,
}

impl UniformBinning {
    pub fn new(width: f64, bins: usize) -> Result<UniformBinning, HistError> {
        if width <= 0.0 || bins == 0 {
            return Err(HistError::InvalidAxis { min: 0.0, max: width * bins as f64, bins });
        }
        return Ok(UniformBinning { inv_width: 1.0 / width, width, bins });
    }

    /// The default binning: [`D_BINS`] bins of [`BIN_WIDTH`] Å
    pub fn default_d() -> UniformBinning {
        UniformBinning { inv_width: 1.0 / BIN_WIDTH, width: BIN_WIDTH, bins: D_BINS }
    }

    pub fn width(&self) -> f64 {
        self.width
    }
}

impl Binning for UniformBinning {
    #[inline(always)]
    fn bin(&self, distance: f64) -> usize {
        let bin = (distance * self.inv_width).round() as usize;
        return bin.min(self.bins - 1);
    }

    fn bins(&self) -> usize {
        self.bins
    }

    fn centers(&self) -> Vec<f64> {
        (0..self.bins).map(|i| i as f64 * self.width).collect()
    }
}

/// Non-uniform bins described by their edges; bin `i` spans
/// `edges[i]..edges[i+1]` and is represented by the interval midpoint.
#[derive(Clone, Debug)]
pub struct VariableBinning {
    edges: Vec<f64>,
}

impl VariableBinning {
    /// Creates a variable binning from strictly increasing bin edges
    pub fn new(edges: Vec<f64>) -> Result<VariableBinning, HistError> {
        if edges.len() < 2 || edges.windows(2).any(|w| w[1] <= w[0]) {
            return Err(HistError::InvalidBinEdges);
        }
        return Ok(VariableBinning { edges });
    }
}

impl Binning for VariableBinning {
    fn bin(&self, distance: f64) -> usize {
        match self.edges.binary_search_by(|e| e.partial_cmp(&distance).unwrap_or(std::cmp::Ordering::Less)) {
            Ok(i) => i.min(self.edges.len() - 2),
            Err(0) => 0,
            Err(i) => (i - 1).min(self.edges.len() - 2),
        }
    }

    fn bins(&self) -> usize {
        self.edges.len() - 1
    }

    fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }
}
