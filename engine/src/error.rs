//! Error taxonomy for the engine.
//!
//! Classification never fails; only evolutions do, and only for structural
//! reasons that will not change on re-invocation. Callers should treat an
//! ineligibility as "skip this input for this evolution," not as a batch
//! abort. Mapping validity is a caller contract enforced at construction.

use thiserror::Error;

/// A domain failure raised by an evolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvolutionError {
    /// A stored property's presence varies by build configuration and no
    /// explicit initializer covers the gap, so a memberwise initializer's
    /// parameter list cannot be well-defined.
    #[error(
        "memberwise initializer cannot be synthesized: stored property `{name}` is only conditionally compiled"
    )]
    IneligibleForSynthesis { name: String },
}

/// Rejection of a would-be shuffle mapping that is not a permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("mapping index {index} is out of range for a permutation of length {len}")]
    OutOfRange { index: usize, len: usize },
    #[error("mapping assigns position {index} more than once")]
    Duplicate { index: usize },
}
