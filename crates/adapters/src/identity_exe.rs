//! Self identity backed by the running executable

use pkg_fingerprint_domain::{IdentityError, SelfIdentity};
use std::path::PathBuf;

/// Identity whose source is the bytes of an executable file
///
/// Every rebuild of the binary invalidates every fingerprint it produced.
#[derive(Debug, Clone, Default)]
pub struct ExecutableIdentity {
    path: Option<PathBuf>,
}

impl ExecutableIdentity {
    /// Identity of the current process's executable
    pub fn current() -> Self {
        Self { path: None }
    }

    /// Identity of a specific file
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

impl SelfIdentity for ExecutableIdentity {
    fn source(&self) -> Result<Vec<u8>, IdentityError> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => std::env::current_exe().map_err(|e| IdentityError::Locate(e.to_string()))?,
        };

        std::fs::read(&path).map_err(|source| IdentityError::Read { path, source })
    }
}
