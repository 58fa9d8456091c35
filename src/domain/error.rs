//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid requests against the census model.
/// Malformed records never produce one: they are absorbed into sentinels.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown {kind} attribute: {value}")]
    UnknownAttribute { kind: &'static str, value: String },

    #[error("no node at path: {0}")]
    UnknownNode(String),

    #[error("node cannot be focused: {0}")]
    NotFocusable(String),
}
