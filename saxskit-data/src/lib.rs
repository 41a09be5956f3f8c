//! Data model for SAXS intensity calculations.
//!
//! A [`Molecule`] owns an ordered, nonempty sequence of [`Body`] objects;
//! each body is a rigid group of [`Atom`]s, optionally carrying a hydration
//! shell and a list of [`Symmetry`] descriptors. Bodies announce their
//! mutations through a [`Signaller`] so that a [`StateManager`] can keep
//! track of which parts of a pair-distance histogram must be recomputed.
//!
//! # Example
//! ```
//! use saxskit_data::{Atom, Body, FormFactorClass, Molecule};
//! use saxskit_numerical::Vec3;
//!
//! let atoms = vec![
//!     Atom::new(Vec3::new(0.0, 0.0, 0.0), 6.0, FormFactorClass::C),
//!     Atom::new(Vec3::new(0.0, 0.0, 1.5), 8.0, FormFactorClass::O),
//! ];
//! let molecule = Molecule::new(vec![Body::new(0, atoms)]).unwrap();
//! assert_eq!(molecule.atom_count(), 2);
//! ```

#![allow(clippy::needless_return)]

mod atom;
mod body;
mod error;
mod form_factor_class;
mod molecule;
mod state;
mod symmetry;

pub use atom::Atom;
pub use body::Body;
pub use error::DataError;
pub use form_factor_class::{FormFactorClass, FF_CLASS_COUNT};
pub use molecule::Molecule;
pub use state::{Signaller, StateManager};
pub use symmetry::{Symmetry, SymmetryRelation};
