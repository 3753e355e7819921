//! Port fakes shared by the domain unit tests

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ports::{
    DiffCapability, DiffError, DiffRunner, FileSystem, IdentityError, SelfIdentity,
};

/// In-memory filesystem. Parent directories of every file exist implicitly.
#[derive(Default)]
pub struct FakeFileSystem {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
    read_errors: BTreeMap<PathBuf, io::ErrorKind>,
    reads: AtomicUsize,
}

impl FakeFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: &[u8]) -> Self {
        let path = path.into();
        for ancestor in path.ancestors().skip(1) {
            if !ancestor.as_os_str().is_empty() {
                self.dirs.insert(ancestor.to_path_buf());
            }
        }
        self.files.insert(path, contents.to_vec());
        self
    }

    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                self.dirs.insert(ancestor.to_path_buf());
            }
        }
        self
    }

    /// Reads of `path` fail with `kind` even when the file exists
    pub fn failing_read(mut self, path: impl Into<PathBuf>, kind: io::ErrorKind) -> Self {
        self.read_errors.insert(path.into(), kind);
        self
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl FileSystem for FakeFileSystem {
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(kind) = self.read_errors.get(path) {
            return Err(io::Error::from(*kind));
        }
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        let mut normalized = PathBuf::new();
        for component in path.components() {
            match component {
                Component::ParentDir => {
                    normalized.pop();
                }
                Component::CurDir => {}
                other => normalized.push(other),
            }
        }
        if self.is_dir(&normalized) || self.is_file(&normalized) {
            Ok(normalized)
        } else {
            Err(io::Error::from(io::ErrorKind::NotFound))
        }
    }
}

/// Diff runner returning a fixed diff and recording where it ran
pub struct FakeDiffRunner {
    capability: DiffCapability,
    diff: Vec<u8>,
    fail: bool,
    pub calls: Mutex<Vec<PathBuf>>,
}

impl FakeDiffRunner {
    pub fn available(diff: &[u8]) -> Self {
        Self {
            capability: DiffCapability::Available,
            diff: diff.to_vec(),
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            capability: DiffCapability::Unavailable,
            ..Self::available(b"")
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::available(b"")
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }
}

impl DiffRunner for FakeDiffRunner {
    fn capability(&self) -> DiffCapability {
        self.capability
    }

    fn run_diff(&self, directory: &Path) -> Result<Vec<u8>, DiffError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(directory.to_path_buf());
        }
        if self.fail {
            return Err(DiffError::Failed("exit status: 128".to_string()));
        }
        Ok(self.diff.clone())
    }
}

/// Identity with fixed source bytes
pub struct FixedIdentity(pub &'static [u8]);

impl SelfIdentity for FixedIdentity {
    fn source(&self) -> Result<Vec<u8>, IdentityError> {
        Ok(self.0.to_vec())
    }
}

/// Identity whose source cannot be read
pub struct UnreadableIdentity;

impl SelfIdentity for UnreadableIdentity {
    fn source(&self) -> Result<Vec<u8>, IdentityError> {
        Err(IdentityError::Read {
            path: PathBuf::from("/proc/self/exe"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        })
    }
}
