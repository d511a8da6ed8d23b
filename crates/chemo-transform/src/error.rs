//! Error types for table transformations.

use chemo_model::{ModelError, RowId};
use thiserror::Error;

/// Errors raised by collaborator services or their contract checks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The backing service could not answer.
    #[error("{service} lookup unavailable: {message}")]
    Unavailable { service: String, message: String },

    /// The service answered keys that were never requested.
    #[error("{service} lookup returned {} unrequested key(s): {}", .keys.len(), .keys.join(", "))]
    UnexpectedKeys { service: String, keys: Vec<String> },

    /// The service left requested keys unanswered where a 1:1 mapping is required.
    #[error("{service} lookup did not resolve {} key(s): {}", .keys.len(), .keys.join(", "))]
    MissingKeys { service: String, keys: Vec<String> },
}

/// Errors that can occur while deriving columns.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// The residue at the declared position differs from the token's original residue.
    #[error(
        "mutation {token}: expected '{expected}' at position {position}, found '{found}' (context: {context})"
    )]
    MutationMismatch {
        token: String,
        position: usize,
        expected: char,
        found: char,
        context: String,
    },

    /// The declared position lies outside the sequence.
    #[error("mutation {token}: position {position} outside sequence of length {length}")]
    MutationOutOfRange {
        token: String,
        position: usize,
        length: usize,
    },

    #[error(transparent)]
    InvalidMutation(#[from] ModelError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Row-scoped wrapper so callers can tell which record failed.
    #[error("row {row}: {source}")]
    Row {
        row: RowId,
        #[source]
        source: Box<TransformError>,
    },

    /// No alignment hit exists for a row that must carry one.
    #[error("row {row}: no alignment result for its mutated sequence")]
    MissingAlignment { row: RowId },
}

impl TransformError {
    pub fn at_row(self, row: RowId) -> Self {
        Self::Row {
            row,
            source: Box::new(self),
        }
    }

    /// The underlying error with any row wrapper removed.
    pub fn root(&self) -> &TransformError {
        match self {
            Self::Row { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
