//! Uniform occupancy grid used for hydration-layer generation and
//! excluded-volume modelling.
//!
//! A [`Grid`] covers a molecule's bounding box with cubic cells; each cell
//! carries a [`CellState`]. The grid is filled once per molecule
//! configuration and rebuilt when a body moves. On top of it,
//! [`generate_hydration`] places surface waters and
//! [`excluded_volume`] enumerates the grid cells that act as
//! excluded-volume pseudo-atoms, optionally split into surface and interior
//! points by radial line probes.

#![allow(clippy::needless_return)]

mod grid;
mod hydration;
mod surface;

pub use grid::{CellState, Grid, GridConfig};
pub use hydration::generate_hydration;
pub use surface::{excluded_volume, GridExcludedVolume};
