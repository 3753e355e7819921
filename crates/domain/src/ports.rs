//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Message carried by every salt rejection
pub const INVALID_SALT_MESSAGE: &str = "Salt must be an Array, Buffer, Object or string";

/// Error type for a fingerprint computation
#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("Not found: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}", INVALID_SALT_MESSAGE)]
    InvalidSalt,
    #[error("Self fingerprint unavailable: {0}")]
    SelfFingerprint(#[from] IdentityError),
}

impl FingerprintError {
    /// Filesystem error kind for I/O failures on required inputs
    pub fn kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::NotFound { source, .. } | Self::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }

    /// OS error code of the underlying filesystem failure, if any
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Self::NotFound { source, .. } | Self::Io { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn from_read(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_path_buf(),
                source,
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Port for reading package contents
pub trait FileSystem: Send + Sync {
    /// Read a whole file
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Whether the path names an existing directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Whether the path names an existing regular file
    fn is_file(&self, path: &Path) -> bool;

    /// Absolute, symlink-free form of the path
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// Whether the external diff mechanism exists on this system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffCapability {
    Available,
    Unavailable,
}

impl DiffCapability {
    pub fn is_available(self) -> bool {
        self == Self::Available
    }
}

/// Error type for diff invocations. Always absorbed by the domain.
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("Diff capability unavailable")]
    Unavailable,
    #[error("Failed to spawn diff command {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("Diff command exited with {0}")]
    Failed(String),
    #[error("Diff command timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Port for capturing uncommitted working-tree changes
///
/// Implementations must never let the diff tool's standard error reach the
/// caller's error stream.
pub trait DiffRunner: Send + Sync {
    /// Capability resolved once, when the runner was built
    fn capability(&self) -> DiffCapability;

    /// Diff of the working tree containing `directory`; empty when clean
    fn run_diff(&self, directory: &Path) -> Result<Vec<u8>, DiffError>;
}

/// Error type for self identity providers
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Failed to locate implementation: {0}")]
    Locate(String),
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Port for the bytes identifying the hashing tool's own implementation
pub trait SelfIdentity: Send + Sync {
    fn source(&self) -> Result<Vec<u8>, IdentityError>;
}
