//! Target resolution: path to package directory and manifest bytes

use std::path::{Path, PathBuf};

use crate::{
    model::ResolvedTarget,
    ports::{FileSystem, FingerprintError},
};

/// Manifest file name used when none is configured
pub const DEFAULT_MANIFEST_NAME: &str = "package.json";

/// Resolve a directory or manifest path
///
/// A directory is expected to hold `manifest_name` directly. Any other path is
/// read as the manifest itself, and its parent becomes the directory. The
/// directory is normalized lexically, so `pkg/` and `pkg/package.json` agree.
pub fn resolve_target<F: FileSystem + ?Sized>(
    fs: &F,
    path: &Path,
    manifest_name: &str,
) -> Result<ResolvedTarget, FingerprintError> {
    let (directory, manifest_path) = if fs.is_dir(path) {
        (normalize(path), path.join(manifest_name))
    } else {
        (parent_directory(path), path.to_path_buf())
    };

    let manifest = fs
        .read_file(&manifest_path)
        .map_err(|e| FingerprintError::from_read(&manifest_path, e))?;

    tracing::debug!(
        directory = %directory.display(),
        manifest = %manifest_path.display(),
        manifest_len = manifest.len(),
        "Resolved target"
    );

    Ok(ResolvedTarget {
        directory,
        manifest,
    })
}

fn parent_directory(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => normalize(parent),
        _ => PathBuf::from("."),
    }
}

// Drops trailing separators and interior `.` without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    path.components().collect()
}
