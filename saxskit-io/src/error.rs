use thiserror::Error;

/// Errors raised while reading or writing files.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },
    #[error("dataset q values must increase monotonically (data row {row})")]
    NonMonotonicQ { row: usize },
    #[error("dataset has no usable data rows")]
    EmptyDataset,
    #[error("CCP4 header must be exactly 1024 bytes, got {0}")]
    ShortCcp4Header(usize),
    #[error("unsupported CCP4 mode {0}")]
    UnsupportedCcp4Mode(i32),
    #[error("CCP4 voxel payload truncated: expected {expected} values, got {got}")]
    TruncatedCcp4Data { expected: usize, got: usize },
    #[error("invalid setting on line {line}: {reason}")]
    InvalidSetting { line: usize, reason: String },
    #[error("structure file contains no atoms")]
    EmptyStructure,
}
