//! pkg-fingerprint adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `fs`: Local filesystem access
//! - `diff`: `git diff` subprocess runner with one-time capability detection
//! - `identity`: Self identity over the algorithm sources or the executable
//!
//! It also wires the real adapters into the process-wide [`fingerprint`] entry point.

mod fs_local;
mod git_diff;
mod identity_exe;
mod identity_sources;

use pkg_fingerprint_domain::{FingerprintError, HasherConfig, PackageHasher, Salt, Targets};
use std::sync::{Arc, OnceLock};

/// Re-exports for filesystem adapters
pub mod fs {
    pub use crate::fs_local::LocalFileSystem;
}

/// Re-exports for diff adapters
pub mod diff {
    pub use crate::git_diff::{GitDiffConfig, GitDiffRunner, default_diff_args};
}

/// Re-exports for identity adapters
pub mod identity {
    pub use crate::identity_exe::ExecutableIdentity;
    pub use crate::identity_sources::{AlgorithmSources, algorithm_identity};
}

static DEFAULT_DIFF_RUNNER: OnceLock<Arc<git_diff::GitDiffRunner>> = OnceLock::new();

/// Diff runner with the default configuration, detected once per process
pub fn default_diff_runner() -> Arc<git_diff::GitDiffRunner> {
    DEFAULT_DIFF_RUNNER
        .get_or_init(|| {
            Arc::new(git_diff::GitDiffRunner::detect(
                git_diff::GitDiffConfig::default(),
            ))
        })
        .clone()
}

/// Fingerprint local packages with the default collaborators
///
/// Uses the local filesystem, `git diff` when available, and the domain and
/// adapter sources as self identity.
pub fn fingerprint(
    targets: impl Into<Targets>,
    salt: impl Into<Salt>,
) -> Result<String, FingerprintError> {
    PackageHasher::new(
        Arc::new(fs_local::LocalFileSystem),
        default_diff_runner(),
        identity_sources::algorithm_identity(),
        HasherConfig::default(),
    )
    .fingerprint(targets, salt)
}
