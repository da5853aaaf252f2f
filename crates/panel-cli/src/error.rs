//! CLI error types.

use std::path::PathBuf;

use panel_grid::GridError;
use panel_i18n::I18nError;
use panel_validation::SchemaError;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A file is not valid JSON of the expected shape.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Column specs were rejected.
    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    /// Schema was rejected.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Catalog could not be loaded.
    #[error("catalog error: {0}")]
    Catalog(#[from] I18nError),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The candidate failed validation.
    #[error("{0} field(s) failed validation")]
    Invalid(usize),

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
