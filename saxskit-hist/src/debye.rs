//! The sinc(qd) lookup table backing the Debye transform.

use once_cell::sync::Lazy;

use crate::axis::Axis;

/// sin(x)/x with a Taylor-series fallback near the pole.
///
/// For `x < 1e-3` the two-term series `1 - x²/6 + x⁴/120` is exact to well
/// below machine precision, and avoids the 0/0 division at x = 0.
///
/// # Example
/// ```
/// use saxskit_hist::sinc;
/// assert_eq!(sinc(0.0), 1.0);
/// assert!((sinc(std::f64::consts::PI)).abs() < 1e-15);
/// ```
#[inline(always)]
pub fn sinc(x: f64) -> f64 {
    if x < 1e-3 {
        let x2 = x * x;
        return 1.0 - x2 / 6.0 + x2 * x2 / 120.0;
    }
    return x.sin() / x;
}

/// Precomputed sinc(q·d) lookup indexed by (q bin, d bin).
///
/// Look-ups are constant time; a row holds all d values of one q, so the
/// Debye sum over a PDDF is an inner product with a table row.
pub struct DebyeTable {
    q: Vec<f64>,
    d: Vec<f64>,
    table: Vec<f64>, // row-major: q_index * d.len() + d_index
}

impl DebyeTable {
    /// Builds a table for the given q and d value grids
    pub fn new(q: &[f64], d: &[f64]) -> DebyeTable {
        let mut table = vec![0.0; q.len() * d.len()];
        for (qi, qv) in q.iter().enumerate() {
            let row = &mut table[qi * d.len()..(qi + 1) * d.len()];
            for (di, dv) in d.iter().enumerate() {
                row[di] = sinc(qv * dv);
            }
        }
        return DebyeTable { q: q.to_vec(), d: d.to_vec(), table };
    }

    /// Constant-time lookup of sinc(q·d) by indices
    #[inline(always)]
    pub fn lookup(&self, q_index: usize, d_index: usize) -> f64 {
        self.table[q_index * self.d.len() + d_index]
    }

    /// The full d-row for a given q index
    #[inline(always)]
    pub fn row(&self, q_index: usize) -> &[f64] {
        &self.table[q_index * self.d.len()..(q_index + 1) * self.d.len()]
    }

    pub fn size_q(&self) -> usize {
        self.q.len()
    }

    pub fn size_d(&self) -> usize {
        self.d.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty() || self.d.is_empty()
    }

    /// The q values this table was built for
    pub fn q_values(&self) -> &[f64] {
        &self.q
    }
}

static DEFAULT_TABLE: Lazy<DebyeTable> = Lazy::new(|| {
    let q = Axis::default_q_axis().as_vector();
    let d = Axis::default_d_axis().as_vector();
    DebyeTable::new(&q, &d)
});

/// The shared table over the default q and d axes, built on first use.
pub fn default_table() -> &'static DebyeTable {
    &DEFAULT_TABLE
}
