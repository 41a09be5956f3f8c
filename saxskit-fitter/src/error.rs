use thiserror::Error;

/// Errors raised when a fit cannot be set up or run.
#[derive(Debug, Error)]
pub enum FitError {
    #[error("dataset is empty")]
    EmptyData,
    #[error("dataset contains zero or negative measurement errors")]
    InvalidSigma,
    #[error("the {0} parameter requires a histogram variant with excluded-volume partials")]
    IncompatibleParameter(&'static str),
    #[error("the {0} minimizer supports at most {1} parameters")]
    TooManyParameters(&'static str, usize),
    #[error("no fit parameters are enabled")]
    NothingToFit,
}
