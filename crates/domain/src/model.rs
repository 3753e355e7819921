//! Domain models and value objects

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Caller-supplied auxiliary entropy mixed into a fingerprint
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Salt {
    /// No salt; contributes nothing
    #[default]
    Absent,
    /// Raw bytes, used verbatim
    Bytes(Vec<u8>),
    /// Plain text, used as its UTF-8 bytes
    Text(String),
    /// Object or array, serialized to compact JSON in insertion order
    Structured(serde_json::Value),
}

impl From<&str> for Salt {
    fn from(value: &str) -> Self {
        Salt::Text(value.to_string())
    }
}

impl From<String> for Salt {
    fn from(value: String) -> Self {
        Salt::Text(value)
    }
}

impl From<Vec<u8>> for Salt {
    fn from(value: Vec<u8>) -> Self {
        Salt::Bytes(value)
    }
}

impl From<&[u8]> for Salt {
    fn from(value: &[u8]) -> Self {
        Salt::Bytes(value.to_vec())
    }
}

impl<T: Into<Salt>> From<Option<T>> for Salt {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Ordered list of paths to fingerprint
///
/// Order is significant and is never sorted or deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Targets(Vec<PathBuf>);

impl Targets {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self(paths)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(PathBuf::as_path)
    }
}

impl From<&Path> for Targets {
    fn from(path: &Path) -> Self {
        Self(vec![path.to_path_buf()])
    }
}

impl From<PathBuf> for Targets {
    fn from(path: PathBuf) -> Self {
        Self(vec![path])
    }
}

impl From<&PathBuf> for Targets {
    fn from(path: &PathBuf) -> Self {
        Self(vec![path.clone()])
    }
}

impl From<&str> for Targets {
    fn from(path: &str) -> Self {
        Self(vec![PathBuf::from(path)])
    }
}

impl<P: Into<PathBuf>> From<Vec<P>> for Targets {
    fn from(paths: Vec<P>) -> Self {
        paths.into_iter().collect()
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for Targets {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// A target resolved to its package directory and manifest contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Package directory, as given or derived from the manifest path
    pub directory: PathBuf,
    /// Raw manifest bytes
    pub manifest: Vec<u8>,
}

/// Version-control metadata attached to a target
///
/// Every field is independently optional; absent fields contribute no bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepositoryState {
    pub head: Option<Vec<u8>>,
    pub packed_refs: Option<Vec<u8>>,
    pub branch_ref: Option<Vec<u8>>,
    pub diff: Option<Vec<u8>>,
}

impl RepositoryState {
    /// Present fields in digest order: head, packed refs, branch ref, diff
    pub fn into_fragments(self, target: usize) -> Vec<Fragment> {
        [
            (FragmentKind::Head { target }, self.head),
            (FragmentKind::PackedRefs { target }, self.packed_refs),
            (FragmentKind::BranchRef { target }, self.branch_ref),
            (FragmentKind::Diff { target }, self.diff),
        ]
        .into_iter()
        .filter_map(|(kind, bytes)| bytes.map(|bytes| Fragment::new(kind, bytes)))
        .collect()
    }
}

/// Where a fragment came from. Never part of the digest input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FragmentKind {
    SelfFingerprint,
    Salt,
    Directory { target: usize },
    Manifest { target: usize },
    Head { target: usize },
    PackedRefs { target: usize },
    BranchRef { target: usize },
    Diff { target: usize },
}

/// One ordered byte contribution to the digest input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub kind: FragmentKind,
    pub bytes: Vec<u8>,
}

impl Fragment {
    pub fn new(kind: FragmentKind, bytes: Vec<u8>) -> Self {
        Self { kind, bytes }
    }
}

/// Summary entry for a fragment in a report
#[derive(Debug, Clone, Serialize)]
pub struct FragmentSummary {
    #[serde(flatten)]
    pub kind: FragmentKind,
    pub len: usize,
}

/// Fingerprint together with the fragments that produced it
#[derive(Debug, Clone, Serialize)]
pub struct FingerprintReport {
    pub fingerprint: String,
    pub targets: Vec<PathBuf>,
    pub fragments: Vec<FragmentSummary>,
}
