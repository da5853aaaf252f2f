//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Panel CLI - admin grids and form validation.
#[derive(Parser, Debug, Clone)]
#[command(name = "panel")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON).
    #[arg(short, long, env = "PANEL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Translation catalog (JSON). Overrides the configured one.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Output format. Defaults to the configured one, then `table`.
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render a grid: its configuration, or rows filtered and sorted.
    Grid(GridArgs),

    /// Validate a form candidate and show per-field errors.
    Validate(ValidateArgs),

    /// List the built-in pages.
    Pages,
}

/// Built-in grid pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GridPage {
    /// Banned songs.
    BannedSongs,
    /// Bot commands.
    BotCommands,
}

/// Built-in forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormPage {
    /// Poll editor.
    Poll,
}

/// Arguments for the grid command.
#[derive(Args, Debug, Clone)]
pub struct GridArgs {
    /// Column specs (JSON array).
    #[arg(long, required_unless_present = "page", conflicts_with = "page")]
    pub columns: Option<PathBuf>,

    /// Built-in page whose columns to use.
    #[arg(short, long, value_enum)]
    pub page: Option<GridPage>,

    /// Rows (JSON array of objects). Without rows only the configuration is shown.
    #[arg(short, long)]
    pub rows: Option<PathBuf>,

    /// Filter as `column=value` or `column:operation=value`.
    #[arg(long = "filter", value_name = "COLUMN[:OP]=VALUE")]
    pub filters: Vec<String>,

    /// Sort as `column` or `column:desc`. Repeat for secondary keys.
    #[arg(short, long = "sort", value_name = "COLUMN[:DIR]")]
    pub sorts: Vec<String>,

    /// Include hidden columns.
    #[arg(long)]
    pub all_columns: bool,
}

/// Arguments for the validate command.
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Schema (JSON array of `{field, rules}`).
    #[arg(long, required_unless_present = "page", conflicts_with = "page")]
    pub schema: Option<PathBuf>,

    /// Built-in form whose schema to use.
    #[arg(short, long, value_enum)]
    pub page: Option<FormPage>,

    /// Candidate object (JSON).
    #[arg(required = true)]
    pub candidate: PathBuf,

    /// Mark a field as touched. Repeatable.
    #[arg(short, long = "dirty", value_name = "FIELD")]
    pub dirty: Vec<String>,

    /// Mark every schema field as touched.
    #[arg(long, conflicts_with = "dirty")]
    pub all_dirty: bool,

    /// Server response body to ingest after local validation (JSON).
    #[arg(long)]
    pub response: Option<PathBuf>,
}
