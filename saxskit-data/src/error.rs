use thiserror::Error;

/// Errors raised when assembling molecules and bodies.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("a molecule must own at least one body")]
    EmptyMolecule,
    #[error("duplicate body identifier {0}")]
    DuplicateBodyId(u32),
}
