//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::Comment;

/// Domain errors represent violations of the forest reconstruction rules.
/// Each variant carries the offending comment; no partial forest is ever returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown parent for comment {node}")]
    UnknownParent { node: Comment },

    #[error("corrupt ancestor chain at comment {node}")]
    CorruptChain { node: Comment },

    #[error("malformed record: {reason}")]
    MalformedRecord { reason: String },

    #[error("duplicate comment id: {node}")]
    DuplicateId { node: Comment },
}

impl DomainError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            reason: reason.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
