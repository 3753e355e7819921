//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use pkg_fingerprint_adapters::diff::{GitDiffConfig, default_diff_args};
use pkg_fingerprint_domain::DEFAULT_MANIFEST_NAME;

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "./pkg-fingerprint.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub diff: DiffConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_manifest_name")]
    pub manifest_name: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub identity: IdentitySource,
}

/// What the self fingerprint is computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySource {
    /// Algorithm sources embedded at build time
    #[default]
    Sources,
    /// The running executable
    Executable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_diff_command")]
    pub command: String,

    #[serde(default = "default_diff_args")]
    pub args: Vec<String>,

    /// 0 disables the timeout
    #[serde(default = "default_diff_timeout")]
    pub timeout_secs: u64,
}

// Default value functions
fn default_manifest_name() -> String {
    DEFAULT_MANIFEST_NAME.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

fn default_diff_command() -> String {
    "git".to_string()
}

fn default_diff_timeout() -> u64 {
    10
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            manifest_name: default_manifest_name(),
            log_level: default_log_level(),
            identity: IdentitySource::default(),
        }
    }
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            command: default_diff_command(),
            args: default_diff_args(),
            timeout_secs: default_diff_timeout(),
        }
    }
}

impl DiffConfig {
    /// Adapter configuration for the diff runner
    pub fn to_runner_config(&self) -> GitDiffConfig {
        GitDiffConfig {
            command: self.command.clone(),
            args: self.args.clone(),
            timeout: (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs)),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Add environment variable overrides
        builder = builder.add_source(
            config::Environment::with_prefix("PKG_FINGERPRINT")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# pkg-fingerprint configuration

[general]
manifest_name = "package.json"
log_level = "warn"
identity = "sources"  # sources, executable

[diff]
enabled = true
command = "git"
args = ["--no-pager", "diff", "HEAD", "--no-color", "--no-ext-diff"]
# 0 disables the timeout
timeout_secs = 10
"#
        .to_string()
    }
}
