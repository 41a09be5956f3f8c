//! Small numerical toolbox for the saxskit package.
//!
//! Provides the [`Vec3`] type used to store atomic positions, a [`Matrix3x3`]
//! for linear transformations, and the [`Rototranslation`] rigid-body
//! transformation applied to bodies and their symmetry copies.

#![allow(clippy::needless_return)]

mod vec3;
mod matrix;
mod rototranslation;

pub use vec3::Vec3;
pub use matrix::Matrix3x3;
pub use rototranslation::Rototranslation;

/// Asserts that two floating point values differ by no more than a given delta.
///
/// # Example
/// ```
/// use saxskit_numerical::assert_delta;
/// assert_delta!(1.0, 1.0000001, 0.001);
/// ```
#[macro_export]
macro_rules! assert_delta {
    ($x:expr, $y:expr, $d:expr) => {
        assert!(
            ($x as f64 - $y as f64).abs() < $d,
            "assert_delta failed: |{} - {}| >= {}", $x, $y, $d
        );
    };
}
