//! Domain-level errors (no external dependencies)

use std::num::ParseFloatError;
use thiserror::Error;

/// Domain errors are the fatal conditions of parsing and building a tree.
/// Recoverable anomalies are reported, not raised, at this layer.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid split value on line {line}: {value:?}")]
    InvalidSplitValue {
        line: usize,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("missing root: no record named \"Root\"")]
    MissingRoot,
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
