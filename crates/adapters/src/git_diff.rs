//! `git diff` adapter for capturing uncommitted changes

use pkg_fingerprint_domain::{DiffCapability, DiffError, DiffRunner};
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::time::Duration;

/// Configuration for the diff command
#[derive(Debug, Clone)]
pub struct GitDiffConfig {
    /// Executable to run
    pub command: String,
    /// Arguments; the command runs inside the package directory
    pub args: Vec<String>,
    /// Upper bound on a single invocation (None = wait forever)
    pub timeout: Option<Duration>,
}

impl Default for GitDiffConfig {
    fn default() -> Self {
        Self {
            command: "git".to_string(),
            args: default_diff_args(),
            timeout: Some(Duration::from_secs(10)),
        }
    }
}

/// Arguments producing a plain diff of the working tree against `HEAD`
pub fn default_diff_args() -> Vec<String> {
    ["--no-pager", "diff", "HEAD", "--no-color", "--no-ext-diff"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Diff runner that shells out to git
///
/// Availability is probed once at construction. The child's standard error is
/// discarded so diagnostics never reach the caller's error stream.
pub struct GitDiffRunner {
    config: GitDiffConfig,
    capability: DiffCapability,
}

impl GitDiffRunner {
    /// Build a runner, probing whether the command can be spawned
    pub fn detect(config: GitDiffConfig) -> Self {
        let capability = probe(&config.command);
        tracing::debug!(
            command = %config.command,
            capability = ?capability,
            "Detected diff capability"
        );
        Self { config, capability }
    }

    /// Runner that never produces a diff
    pub fn disabled() -> Self {
        Self {
            config: GitDiffConfig::default(),
            capability: DiffCapability::Unavailable,
        }
    }

    pub fn config(&self) -> &GitDiffConfig {
        &self.config
    }
}

fn probe(command: &str) -> DiffCapability {
    let status = Command::new(command)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(_) => DiffCapability::Available,
        Err(_) => DiffCapability::Unavailable,
    }
}

impl DiffRunner for GitDiffRunner {
    fn capability(&self) -> DiffCapability {
        self.capability
    }

    fn run_diff(&self, directory: &Path) -> Result<Vec<u8>, DiffError> {
        if !self.capability.is_available() {
            return Err(DiffError::Unavailable);
        }

        let mut child = Command::new(&self.config.command)
            .args(&self.config.args)
            .current_dir(directory)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| DiffError::Spawn {
                command: self.config.command.clone(),
                source,
            })?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| DiffError::Failed("stdout not captured".to_string()))?;

        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let result = stdout.read_to_end(&mut buf).map(|_| buf);
            let _ = tx.send(result);
        });

        let output = match self.config.timeout {
            Some(timeout) => match rx.recv_timeout(timeout) {
                Ok(output) => output?,
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    tracing::warn!(
                        directory = %directory.display(),
                        timeout = ?timeout,
                        "Diff command timed out"
                    );
                    return Err(DiffError::Timeout(timeout));
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(DiffError::Failed("output reader disconnected".to_string()));
                }
            },
            None => rx
                .recv()
                .map_err(|_| DiffError::Failed("output reader disconnected".to_string()))??,
        };

        let status = child.wait()?;
        if !status.success() {
            return Err(DiffError::Failed(status.to_string()));
        }

        Ok(output)
    }
}
