//! Form engine error types

use thiserror::Error;

use crate::domain::FieldPath;

/// Errors from addressed form operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// The path leaves the schema (unknown field, or a segment of the wrong kind)
    #[error("Path '{path}' does not exist in the schema")]
    PathNotInSchema { path: FieldPath },

    /// An array operation addressed a non-array shape
    #[error("Field '{path}' is a {found}, not an array")]
    NotAnArray { path: FieldPath, found: String },

    /// Strict addressing found a container of the wrong kind on the path
    #[error("Expected {expected} at '{path}' but found {found}")]
    KindMismatch {
        path: FieldPath,
        expected: &'static str,
        found: &'static str,
    },
}
