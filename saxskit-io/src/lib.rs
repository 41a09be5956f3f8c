//! File formats consumed and produced by the saxskit tools: experimental
//! SAXS datasets, PDB structures, CCP4/MRC density maps and the settings
//! text format.

#![allow(clippy::needless_return)]

mod ccp4;
mod dat;
mod error;
mod pdb;
mod settings;

pub use ccp4::{read_ccp4, read_ccp4_reader, DensityMap};
pub use dat::{read_saxs_data, write_saxs_data, SimpleDataset};
pub use error::IoError;
pub use pdb::{read_pdb, read_pdb_reader, write_pdb};
pub use settings::{ExvModel, RunConfig, Settings};
