//! Repository metadata collection
//!
//! Everything here degrades silently: a missing repository, a missing
//! reference file or a failing diff only removes the matching fragment.

use std::path::{Component, Path, PathBuf};

use crate::{
    model::RepositoryState,
    ports::{DiffRunner, FileSystem},
};

const GIT_DIR_NAME: &str = ".git";
const GITDIR_PREFIX: &str = "gitdir:";
const SYMBOLIC_REF_PREFIX: &str = "ref:";

/// Location of a repository's metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitLocation {
    /// Per-worktree metadata directory (holds `HEAD`)
    pub git_dir: PathBuf,
    /// Shared metadata directory (holds `packed-refs` and `refs/`)
    pub common_dir: PathBuf,
}

/// Collects version-control metadata for package directories
pub struct RepositoryCollector<'a, F: ?Sized, D: ?Sized> {
    fs: &'a F,
    diff: &'a D,
}

impl<'a, F, D> RepositoryCollector<'a, F, D>
where
    F: FileSystem + ?Sized,
    D: DiffRunner + ?Sized,
{
    pub fn new(fs: &'a F, diff: &'a D) -> Self {
        Self { fs, diff }
    }

    /// Repository state for `directory`, or `None` outside a repository
    pub fn collect(&self, directory: &Path) -> Option<RepositoryState> {
        let location = self.locate(directory)?;
        tracing::debug!(
            directory = %directory.display(),
            git_dir = %location.git_dir.display(),
            "Found repository"
        );

        let head = self.read_optional(&location.git_dir.join("HEAD"));
        let packed_refs = self.read_optional(&location.common_dir.join("packed-refs"));
        let branch_ref = head
            .as_deref()
            .and_then(symbolic_ref)
            .and_then(|name| self.read_optional(&location.common_dir.join(name)));
        let diff = self.capture_diff(directory);

        Some(RepositoryState {
            head,
            packed_refs,
            branch_ref,
            diff,
        })
    }

    /// Walk upward from `directory` to the nearest `.git`
    pub fn locate(&self, directory: &Path) -> Option<GitLocation> {
        let start = self
            .fs
            .canonicalize(directory)
            .unwrap_or_else(|_| directory.to_path_buf());

        for ancestor in start.ancestors() {
            let candidate = ancestor.join(GIT_DIR_NAME);
            if self.fs.is_dir(&candidate) {
                return Some(self.with_common_dir(candidate));
            }
            if self.fs.is_file(&candidate) {
                let git_dir = self.follow_gitdir_file(&candidate, ancestor);
                if git_dir.is_none() {
                    tracing::debug!(path = %candidate.display(), "Unusable .git file");
                }
                return git_dir.map(|git_dir| self.with_common_dir(git_dir));
            }
        }

        tracing::debug!(directory = %directory.display(), "No repository found");
        None
    }

    fn follow_gitdir_file(&self, file: &Path, base: &Path) -> Option<PathBuf> {
        let contents = self.fs.read_file(file).ok()?;
        let text = String::from_utf8(contents).ok()?;
        let pointer = text.trim().strip_prefix(GITDIR_PREFIX)?.trim();
        if pointer.is_empty() {
            return None;
        }

        let git_dir = self.fs.canonicalize(&base.join(pointer)).ok()?;
        self.fs.is_dir(&git_dir).then_some(git_dir)
    }

    fn with_common_dir(&self, git_dir: PathBuf) -> GitLocation {
        let common_dir = self
            .fs
            .read_file(&git_dir.join("commondir"))
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .and_then(|text| self.fs.canonicalize(&git_dir.join(text.trim())).ok())
            .filter(|dir| self.fs.is_dir(dir))
            .unwrap_or_else(|| git_dir.clone());

        GitLocation {
            git_dir,
            common_dir,
        }
    }

    fn read_optional(&self, path: &Path) -> Option<Vec<u8>> {
        match self.fs.read_file(path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Repository artifact absent");
                None
            }
        }
    }

    fn capture_diff(&self, directory: &Path) -> Option<Vec<u8>> {
        if !self.diff.capability().is_available() {
            tracing::debug!("Diff capability unavailable");
            return None;
        }

        match self.diff.run_diff(directory) {
            Ok(diff) if diff.is_empty() => None,
            Ok(diff) => {
                tracing::debug!(diff_len = diff.len(), "Working tree is dirty");
                Some(diff)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Diff unavailable for this call");
                None
            }
        }
    }
}

/// Reference name from a symbolic `HEAD` such as `ref: refs/heads/main`
///
/// Names that could leave the metadata directory are ignored.
fn symbolic_ref(head: &[u8]) -> Option<PathBuf> {
    let text = std::str::from_utf8(head).ok()?;
    let name = text.trim().strip_prefix(SYMBOLIC_REF_PREFIX)?.trim();
    if name.is_empty() {
        return None;
    }

    let path = PathBuf::from(name);
    path.components()
        .all(|c| matches!(c, Component::Normal(_)))
        .then_some(path)
}
