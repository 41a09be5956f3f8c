//! Fitting of composite scattering models against experimental data.
//!
//! The fitter is two-layered: an inner closed-form least squares solves for
//! the linear scale and offset at every trial point, while an outer
//! [`Minimizer`] walks the nonlinear histogram parameters (hydration scale,
//! excluded-volume scale, solvent density, Debye-Waller factors). The
//! [`SmartFitter`] wires the two layers together.

#![allow(clippy::needless_return)]

mod error;
mod least_squares;
mod minimizer;
mod smart_fitter;

pub use error::FitError;
pub use least_squares::SimpleLeastSquares;
pub use minimizer::{Bfgs, LimitedScan, Minimizer, MinimizerResult, Parameter, Scan};
pub use smart_fitter::{EnabledFitParameters, FitResult, SmartFitter};
