//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent malformed category records.
/// The sorter itself never fails; these come from record construction
/// and tree rendering.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("category #{index} has no id")]
    MissingId { index: usize },

    #[error("category #{index} is invalid: {message}")]
    InvalidRecord { index: usize, message: String },

    #[error("hierarchy is {depth} levels deep, tree output supports at most {limit}")]
    TooDeep { depth: usize, limit: usize },

    #[error("unsupported document shape: {0}")]
    UnsupportedShape(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
