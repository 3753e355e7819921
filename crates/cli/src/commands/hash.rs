//! Hash command - fingerprint one or more packages

use anyhow::{Context, Result};
use pkg_fingerprint_adapters::diff::GitDiffRunner;
use pkg_fingerprint_adapters::fs::LocalFileSystem;
use pkg_fingerprint_adapters::identity::{ExecutableIdentity, algorithm_identity};
use pkg_fingerprint_domain::{
    HasherConfig, MemoizedIdentity, PackageHasher, Salt, SelfIdentity, Targets,
};
use std::sync::Arc;

use crate::args::HashArgs;
use crate::config::{AppConfig, IdentitySource};

pub fn execute(args: HashArgs, config: AppConfig) -> Result<()> {
    // Salt problems surface before any package is read
    let salt = salt_from_args(&args)?;

    let diff = if args.no_diff || !config.diff.enabled {
        GitDiffRunner::disabled()
    } else {
        GitDiffRunner::detect(config.diff.to_runner_config())
    };
    let hasher_config = HasherConfig {
        manifest_name: args
            .manifest
            .clone()
            .unwrap_or_else(|| config.general.manifest_name.clone()),
    };

    let hasher = PackageHasher::new(
        Arc::new(LocalFileSystem),
        Arc::new(diff),
        build_identity(config.general.identity),
        hasher_config,
    );

    let targets = Targets::new(args.paths);
    let report = hasher
        .report(targets, salt)
        .context("Failed to compute fingerprint")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.fingerprint);
    }

    Ok(())
}

/// Memoized self identity for the configured source
pub fn build_identity(source: IdentitySource) -> Arc<MemoizedIdentity<dyn SelfIdentity>> {
    match source {
        IdentitySource::Sources => algorithm_identity(),
        IdentitySource::Executable => {
            Arc::new(MemoizedIdentity::new(ExecutableIdentity::current()))
        }
    }
}

fn salt_from_args(args: &HashArgs) -> Result<Salt> {
    if let Some(text) = &args.salt {
        return Ok(Salt::Text(text.clone()));
    }

    if let Some(json) = &args.salt_json {
        let value: serde_json::Value =
            serde_json::from_str(json).context("Failed to parse --salt-json")?;
        return Ok(Salt::from_value(value)?);
    }

    if let Some(path) = &args.salt_file {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read salt file: {}", path.display()))?;
        return Ok(Salt::Bytes(bytes));
    }

    Ok(Salt::Absent)
}
