//! Application-level errors (wraps domain errors)

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Recoverable treelog anomalies subject to a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyKind {
    DuplicateNames,
    UnreachableRecords,
    UnterminatedBlock,
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyKind::DuplicateNames => write!(f, "duplicate node names, last record kept"),
            AnomalyKind::UnreachableRecords => write!(f, "records unreachable from Root dropped"),
            AnomalyKind::UnterminatedBlock => {
                write!(f, "trailing block without closing blank line dropped")
            }
        }
    }
}

/// One anomaly occurrence with the node names involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    pub names: Vec<String>,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.names.join(", "))
    }
}

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Anomaly(Anomaly),

    #[error("treelog not found: {0}")]
    TreelogNotFound(PathBuf),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
