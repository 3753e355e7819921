//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// pkg-fingerprint: deterministic content fingerprints for filesystem packages
#[derive(Parser, Debug)]
#[command(name = "pkg-fingerprint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the fingerprint of one or more packages
    Hash(HashArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Check configuration, diff capability and self identity
    Doctor(DoctorArgs),
}

#[derive(Args, Debug)]
pub struct HashArgs {
    /// Package directories or manifest files, in digest order
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Salt given as plain text
    #[arg(long, conflicts_with_all = ["salt_json", "salt_file"])]
    pub salt: Option<String>,

    /// Salt given as a JSON object or array
    #[arg(long, conflicts_with = "salt_file")]
    pub salt_json: Option<String>,

    /// Salt read as raw bytes from a file
    #[arg(long)]
    pub salt_file: Option<PathBuf>,

    /// Override the manifest file name
    #[arg(long)]
    pub manifest: Option<String>,

    /// Never run the diff command
    #[arg(long)]
    pub no_diff: bool,

    /// Output a JSON report with every fragment
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init {
        /// Path to write config file
        #[arg(long, default_value = "./pkg-fingerprint.toml")]
        path: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
