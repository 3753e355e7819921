//! Config command - write a starter pkg-fingerprint.toml

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::args::{ConfigArgs, ConfigCommands};
use crate::config::AppConfig;

pub fn execute(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Init { path, force } => {
            write_example(&path, force)?;

            println!("Wrote {}", path.display());
            println!();
            println!("Set [general] manifest_name if packages are not described by package.json.");
            println!("Check the diff tool with: pkg-fingerprint doctor");
            println!("Fingerprint a package with: pkg-fingerprint hash <path>");
            Ok(())
        }
    }
}

fn write_example(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists, pass --force to replace it",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    fs::write(path, AppConfig::example_toml())
        .with_context(|| format!("Failed to write {}", path.display()))
}
