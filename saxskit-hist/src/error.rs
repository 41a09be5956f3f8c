use thiserror::Error;

/// Errors raised by the histogram engine.
#[derive(Debug, Error)]
pub enum HistError {
    #[error("invalid axis: min {min}, max {max}, {bins} bins")]
    InvalidAxis { min: f64, max: f64, bins: usize },
    #[error("bin edges must be strictly increasing")]
    InvalidBinEdges,
}
