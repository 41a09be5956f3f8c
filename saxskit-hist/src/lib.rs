//! The distance-histogram engine: pair-distance distributions, the Debye
//! transform and the composite intensity models built on them.
//!
//! The pipeline runs leaves-first: atoms are packed into
//! [`CompactCoordinates`], the SIMD kernels accumulate binned
//! [distributions](crate::Distribution1D), a [histogram
//! manager](crate::HistogramManager) orchestrates the kernels into a
//! [`DistanceHistogram`] or a composite carrying all partials, and the
//! composite applies form factors and the [`sinc`] transform to produce a
//! [`ScatteringProfile`].
//!
//! # Example
//! ```
//! use saxskit_data::{Atom, FormFactorClass, Molecule};
//! use saxskit_hist::{Distribution1D, HistogramManager};
//! use saxskit_numerical::Vec3;
//!
//! let molecule = Molecule::from_atoms(vec![
//!     Atom::of_class(Vec3::new(0.0, 0.0, 0.0), FormFactorClass::C),
//!     Atom::of_class(Vec3::new(0.0, 0.0, 2.0), FormFactorClass::O),
//! ]).unwrap();
//! let profile = HistogramManager::<Distribution1D>::new(&molecule)
//!     .calculate()
//!     .debye_transform();
//! assert!(profile.intensity()[0] > 0.0);
//! ```

#![allow(clippy::needless_return)]

mod axis;
mod compact;
mod composite;
mod debye;
mod distance_histogram;
mod distribution;
mod error;
mod form_factor;
mod manager;
mod profile;

pub use axis::{Axis, Binning, UniformBinning, VariableBinning, BIN_WIDTH, D_BINS, JOB_SIZE, Q_BINS, Q_MAX, Q_MIN};
pub use compact::{CompactCoordinates, CompactCoordinatesData, CompactCoordinatesFF};
pub use composite::{
    CompositeDistanceHistogram, CompositeDistanceHistogramFFAvg,
    CompositeDistanceHistogramFFExplicit, CompositeDistanceHistogramFFGrid,
    CompositeDistanceHistogramFFGridSurface, CompositeHistogram, GridExvPartials,
    GridSurfaceExvPartials, HistogramParams,
};
pub use debye::{default_table, sinc, DebyeTable};
pub use distance_histogram::DistanceHistogram;
pub use distribution::{
    Distribution1D, Distribution2D, Distribution3D, GenericDistribution1D, GenericDistribution2D,
    GenericDistribution3D, WeightedDistribution1D, WeightedDistribution2D, WeightedDistribution3D,
};
pub use error::HistError;
pub use form_factor::{
    atomic_table, displaced_volume, exv_factor, product_table, ExvFormFactor, FormFactor,
    FormFactorProductTable, FormFactorTable, RHO_WATER,
};
pub use manager::{
    HistogramManager, HistogramManagerFFAvg, HistogramManagerFFExplicit, HistogramManagerFFGrid,
    HistogramManagerFFGridSurface, PartialHistogramManager,
};
pub use profile::ScatteringProfile;
