//! # panel-cli
//!
//! Command-line front end for the admin panel's grid and form adapters.
//!
//! Provides commands for:
//! - Rendering a grid configuration, or rows filtered and sorted through it
//! - Validating a form candidate with dirty-field gating
//! - Listing the built-in pages (banned songs, bot commands, poll form)
//!
//! Inputs are JSON files: column specs, rows, schemas, candidates and
//! server response bodies. An optional [`config::PanelConfig`] names the
//! translation catalog and label overrides.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod pages;

pub use cli::{Cli, Commands, Format, FormPage, GridArgs, GridPage, ValidateArgs};
pub use commands::Context;
pub use config::PanelConfig;
pub use error::CliError;
pub use output::OutputFormat;
