//! Error types for grid configuration.

use thiserror::Error;

/// Result type alias for grid operations.
pub type GridResult<T> = Result<T, GridError>;

/// Errors raised while building a grid configuration.
#[derive(Debug, Error)]
pub enum GridError {
    /// Two column specs share the same name.
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    /// A column spec has an empty name.
    #[error("column at index {0} has an empty name")]
    EmptyName(usize),

    /// Column specs could not be parsed.
    #[error("failed to parse column specs: {0}")]
    Parse(#[from] serde_json::Error),
}
