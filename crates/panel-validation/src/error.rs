//! Error types for schemas and form submission.

use thiserror::Error;

/// Result type alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while building a schema or preparing a candidate.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The same field was declared twice.
    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),

    /// A field has an empty name.
    #[error("field at index {0} has an empty name")]
    EmptyField(usize),

    /// A `matches` rule carries an invalid regular expression.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Why it failed to compile.
        reason: String,
    },

    /// The candidate does not serialize to a JSON object.
    #[error("candidate must serialize to an object, got {0}")]
    NotAnObject(&'static str),

    /// Serialization of the candidate or schema failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised when a form refuses to submit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Dirty fields still carry validation errors.
    #[error("{0} field(s) have validation errors")]
    Blocked(usize),

    /// A previous save has not finished yet.
    #[error("a save is already in progress")]
    SaveInFlight,
}
