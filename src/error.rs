//! Error types for scanner fusion.

use thiserror::Error;

use crate::atlas::ScannerId;

/// Errors surfaced by the fusion core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FusionError {
    /// A full pass placed no new scanner while some remain unresolved.
    #[error(
        "alignment failed: {} scanner(s) share no overlap with the resolved set (resolved: {resolved:?}, unresolved: {unresolved:?})",
        .unresolved.len()
    )]
    AlignmentFailed {
        resolved: Vec<ScannerId>,
        unresolved: Vec<ScannerId>,
    },

    #[error("reference scanner {0} not present in input")]
    MissingReference(ScannerId),

    #[error("scanner {0} appears more than once in input")]
    DuplicateScanner(ScannerId),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, FusionError>;
