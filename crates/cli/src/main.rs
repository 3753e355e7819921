//! pkg-fingerprint CLI entry point

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod args;
mod commands;
mod config;

use args::{Cli, Commands};
use config::AppConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref());

    // Initialize logging
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| config.as_ref().ok().map(|c| c.general.log_level.clone()))
        .unwrap_or_else(|| "warn".to_string());
    init_logging(&log_level)?;

    // Execute command
    match cli.command {
        Commands::Hash(args) => commands::hash::execute(args, config?),
        Commands::Config(args) => commands::config::execute(args),
        Commands::Doctor(args) => commands::doctor::execute(args, config),
    }
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}
