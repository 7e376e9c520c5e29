//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the store's invariants.
/// These are independent of input/output concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid identifier: {0} (must be non-negative)")]
    InvalidIdentifier(i64),

    #[error("identifier already present: {0}")]
    DuplicateIdentifier(i64),

    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("cycle detected: {child} is already an ancestor of {parent}")]
    CycleDetected { parent: i64, child: i64 },

    #[error("node does not belong to this store")]
    UnknownNode,
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
