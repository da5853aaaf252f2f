//! Panel CLI binary entrypoint.
//!
//! This is the main entry point for the `panel` command-line tool.

use std::io;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use panel_cli::cli::{Cli, Commands};
use panel_cli::commands::{Context, GridCommand, PagesCommand, ValidateCommand};
use panel_cli::config::PanelConfig;
use panel_cli::output::OutputFormat;

/// Log filter when neither `RUST_LOG` nor the config sets one.
const DEFAULT_LOG_FILTER: &str = "warn";

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    let config = match PanelConfig::load_optional(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: &PanelConfig) -> anyhow::Result<()> {
    let format = OutputFormat::new(cli.format.or(config.format).unwrap_or_default());
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Grid(args) => {
            let ctx = Context::from_config(config, cli.catalog.as_deref())
                .context("failed to prepare translations")?;
            GridCommand::new(ctx).execute(&mut stdout, &format, &args)?;
        }
        Commands::Validate(args) => {
            let ctx = Context::from_config(config, cli.catalog.as_deref())
                .context("failed to prepare translations")?;
            ValidateCommand::new(ctx).execute(&mut stdout, &format, &args)?;
        }
        Commands::Pages => {
            PagesCommand.execute(&mut stdout, &format)?;
        }
    }

    Ok(())
}
