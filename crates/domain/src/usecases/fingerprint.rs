//! Fingerprint use case - orchestrates salt, targets and repository metadata

use std::sync::Arc;

use crate::{
    accumulate,
    identity::MemoizedIdentity,
    model::{FingerprintReport, Fragment, FragmentKind, FragmentSummary, Salt, Targets},
    ports::{DiffRunner, FileSystem, FingerprintError, SelfIdentity},
    usecases::{
        repository::RepositoryCollector,
        resolve::{DEFAULT_MANIFEST_NAME, resolve_target},
    },
};

/// Configuration for the fingerprint use case
#[derive(Debug, Clone)]
pub struct HasherConfig {
    /// File name of the manifest expected inside a package directory
    pub manifest_name: String,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
        }
    }
}

/// Computes package fingerprints
pub struct PackageHasher<F, D, I>
where
    F: FileSystem + ?Sized,
    D: DiffRunner + ?Sized,
    I: SelfIdentity + ?Sized,
{
    fs: Arc<F>,
    diff: Arc<D>,
    identity: Arc<MemoizedIdentity<I>>,
    config: HasherConfig,
}

impl<F, D, I> PackageHasher<F, D, I>
where
    F: FileSystem + ?Sized,
    D: DiffRunner + ?Sized,
    I: SelfIdentity + ?Sized,
{
    pub fn new(
        fs: Arc<F>,
        diff: Arc<D>,
        identity: Arc<MemoizedIdentity<I>>,
        config: HasherConfig,
    ) -> Self {
        Self {
            fs,
            diff,
            identity,
            config,
        }
    }

    /// Fingerprint of the targets under the given salt
    pub fn fingerprint(
        &self,
        targets: impl Into<Targets>,
        salt: impl Into<Salt>,
    ) -> Result<String, FingerprintError> {
        let fragments = self.fragments(targets, salt)?;
        let fingerprint = accumulate(fragments.iter().map(|f| Some(&f.bytes)));

        tracing::info!(
            fingerprint = %fingerprint,
            fragments = fragments.len(),
            "Computed fingerprint"
        );

        Ok(fingerprint)
    }

    /// Fingerprint plus a summary of every fragment that went into it
    pub fn report(
        &self,
        targets: impl Into<Targets>,
        salt: impl Into<Salt>,
    ) -> Result<FingerprintReport, FingerprintError> {
        let targets = targets.into();
        let fragments = self.fragments(targets.clone(), salt)?;

        Ok(FingerprintReport {
            fingerprint: accumulate(fragments.iter().map(|f| Some(&f.bytes))),
            targets: targets.iter().map(|p| p.to_path_buf()).collect(),
            fragments: fragments
                .iter()
                .map(|f| FragmentSummary {
                    kind: f.kind,
                    len: f.bytes.len(),
                })
                .collect(),
        })
    }

    /// Ordered digest input: self fingerprint, salt, then each target
    pub fn fragments(
        &self,
        targets: impl Into<Targets>,
        salt: impl Into<Salt>,
    ) -> Result<Vec<Fragment>, FingerprintError> {
        let targets = targets.into();
        let salt = salt.into();

        // Reject bad salt before touching the filesystem
        let salt = salt.to_fragment()?;
        tracing::debug!(targets = ?targets, salted = salt.is_some(), "Collecting fragments");

        let mut fragments = vec![Fragment::new(
            FragmentKind::SelfFingerprint,
            self.identity.get()?.to_vec(),
        )];
        if let Some(salt) = salt {
            fragments.push(Fragment::new(FragmentKind::Salt, salt));
        }

        let collector = RepositoryCollector::new(self.fs.as_ref(), self.diff.as_ref());
        for (index, path) in targets.iter().enumerate() {
            let resolved = resolve_target(self.fs.as_ref(), path, &self.config.manifest_name)?;

            fragments.push(Fragment::new(
                FragmentKind::Directory { target: index },
                resolved.directory.to_string_lossy().into_owned().into_bytes(),
            ));
            fragments.push(Fragment::new(
                FragmentKind::Manifest { target: index },
                resolved.manifest,
            ));

            if let Some(state) = collector.collect(&resolved.directory) {
                fragments.extend(state.into_fragments(index));
            }
        }

        Ok(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::INVALID_SALT_MESSAGE;
    use crate::testing::{FakeDiffRunner, FakeFileSystem, FixedIdentity, UnreadableIdentity};
    use serde_json::json;
    use sha2::{Digest, Sha256};
    use std::path::{Path, PathBuf};

    const IDENTITY: &[u8] = b"hasher implementation v1";

    fn hasher(
        fs: FakeFileSystem,
        diff: FakeDiffRunner,
    ) -> PackageHasher<FakeFileSystem, FakeDiffRunner, FixedIdentity> {
        hasher_with_identity(fs, diff, IDENTITY)
    }

    fn hasher_with_identity(
        fs: FakeFileSystem,
        diff: FakeDiffRunner,
        identity: &'static [u8],
    ) -> PackageHasher<FakeFileSystem, FakeDiffRunner, FixedIdentity> {
        PackageHasher::new(
            Arc::new(fs),
            Arc::new(diff),
            Arc::new(MemoizedIdentity::new(FixedIdentity(identity))),
            HasherConfig::default(),
        )
    }

    fn sample_fs() -> FakeFileSystem {
        FakeFileSystem::new()
            .with_file("/pkgs/a/package.json", br#"{"name":"a"}"#)
            .with_file("/pkgs/b/package.json", br#"{"name":"b"}"#)
    }

    fn repo_fs(with_packed_refs: bool) -> FakeFileSystem {
        let fs = FakeFileSystem::new()
            .with_file("/repo/.git/HEAD", b"ref: refs/heads/main\n")
            .with_file("/repo/.git/refs/heads/main", b"def456\n")
            .with_file("/repo/pkg/package.json", br#"{"name":"pkg"}"#);
        if with_packed_refs {
            fs.with_file("/repo/.git/packed-refs", b"abc123 refs/heads/old\n")
        } else {
            fs
        }
    }

    fn expected(parts: &[&[u8]]) -> String {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        format!("{:x}", hasher.finalize())
    }

    fn self_digest() -> Vec<u8> {
        Sha256::digest(IDENTITY).to_vec()
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let hasher = hasher(sample_fs(), FakeDiffRunner::unavailable());
        let first = hasher.fingerprint("/pkgs/a", Salt::Absent).unwrap();
        let second = hasher.fingerprint("/pkgs/a", Salt::Absent).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_plain_package_matches_concatenation_contract() {
        let hasher = hasher(sample_fs(), FakeDiffRunner::available(b"ignored"));
        let actual = hasher.fingerprint("/pkgs/a", Salt::Absent).unwrap();

        assert_eq!(
            actual,
            expected(&[&self_digest(), b"/pkgs/a", br#"{"name":"a"}"#])
        );
    }

    #[test]
    fn test_self_identity_changes_every_fingerprint() {
        let v1 = hasher_with_identity(sample_fs(), FakeDiffRunner::unavailable(), b"v1");
        let v2 = hasher_with_identity(sample_fs(), FakeDiffRunner::unavailable(), b"v2");

        assert_ne!(
            v1.fingerprint("/pkgs/a", Salt::Absent).unwrap(),
            v2.fingerprint("/pkgs/a", Salt::Absent).unwrap()
        );
    }

    #[test]
    fn test_unreadable_identity_is_fatal() {
        let hasher = PackageHasher::new(
            Arc::new(sample_fs()),
            Arc::new(FakeDiffRunner::unavailable()),
            Arc::new(MemoizedIdentity::new(UnreadableIdentity)),
            HasherConfig::default(),
        );

        let err = hasher.fingerprint("/pkgs/a", Salt::Absent).unwrap_err();
        assert!(matches!(err, FingerprintError::SelfFingerprint(_)));
    }

    #[test]
    fn test_invalid_salt_fails_before_any_io() {
        let hasher = hasher(sample_fs(), FakeDiffRunner::available(b"diff"));

        for salt in [json!(42), json!(false), json!(null)] {
            let err = hasher
                .fingerprint("/pkgs/a", Salt::Structured(salt))
                .unwrap_err();
            assert!(matches!(err, FingerprintError::InvalidSalt));
            assert_eq!(err.to_string(), INVALID_SALT_MESSAGE);
        }

        assert_eq!(hasher.fs.reads(), 0);
        assert_eq!(hasher.diff.call_count(), 0);
        assert!(!hasher.identity.is_cached());
    }

    #[test]
    fn test_absent_salt_equals_omitted_and_empty_salt() {
        let hasher = hasher(sample_fs(), FakeDiffRunner::unavailable());
        let omitted = hasher.fingerprint("/pkgs/a", None::<String>).unwrap();

        assert_eq!(omitted, hasher.fingerprint("/pkgs/a", Salt::Absent).unwrap());
        assert_eq!(omitted, hasher.fingerprint("/pkgs/a", "").unwrap());
    }

    #[test]
    fn test_salt_shapes_hash_their_serialized_bytes() {
        let hasher = hasher(sample_fs(), FakeDiffRunner::unavailable());
        let structured = hasher
            .fingerprint("/pkgs/a", Salt::from_value(json!({"foo": "bar"})).unwrap())
            .unwrap();
        let text = hasher.fingerprint("/pkgs/a", r#"{"foo":"bar"}"#).unwrap();
        let bytes = hasher
            .fingerprint("/pkgs/a", br#"{"foo":"bar"}"#.to_vec())
            .unwrap();

        let direct = expected(&[
            &self_digest(),
            br#"{"foo":"bar"}"#,
            b"/pkgs/a",
            br#"{"name":"a"}"#,
        ]);
        assert_eq!(structured, direct);
        assert_eq!(text, direct);
        assert_eq!(bytes, direct);
    }

    #[test]
    fn test_directory_and_manifest_path_agree() {
        let hasher = hasher(sample_fs(), FakeDiffRunner::unavailable());

        assert_eq!(
            hasher.fingerprint("/pkgs/a", Salt::Absent).unwrap(),
            hasher
                .fingerprint("/pkgs/a/package.json", Salt::Absent)
                .unwrap()
        );
    }

    #[test]
    fn test_trailing_separator_matches_manifest_path() {
        let hasher = hasher(sample_fs(), FakeDiffRunner::unavailable());
        let manifest = hasher
            .fingerprint("/pkgs/a/package.json", Salt::Absent)
            .unwrap();

        assert_eq!(hasher.fingerprint("/pkgs/a/", Salt::Absent).unwrap(), manifest);
        assert_eq!(hasher.fingerprint("/pkgs/./a", Salt::Absent).unwrap(), manifest);
    }

    #[test]
    fn test_unreadable_manifest_is_fatal_io_error() {
        let fs = sample_fs()
            .failing_read("/pkgs/a/package.json", std::io::ErrorKind::PermissionDenied);
        let hasher = hasher(fs, FakeDiffRunner::unavailable());

        let err = hasher.fingerprint("/pkgs/a", Salt::Absent).unwrap_err();
        assert!(matches!(err, FingerprintError::Io { .. }));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_target_order_is_significant() {
        let hasher = hasher(sample_fs(), FakeDiffRunner::unavailable());
        let ab = hasher
            .fingerprint(vec!["/pkgs/a", "/pkgs/b"], Salt::Absent)
            .unwrap();
        let ba = hasher
            .fingerprint(vec!["/pkgs/b", "/pkgs/a"], Salt::Absent)
            .unwrap();

        assert_ne!(ab, ba);
        assert_eq!(
            ab,
            expected(&[
                &self_digest(),
                b"/pkgs/a",
                br#"{"name":"a"}"#,
                b"/pkgs/b",
                br#"{"name":"b"}"#,
            ])
        );
    }

    #[test]
    fn test_duplicate_targets_are_kept() {
        let hasher = hasher(sample_fs(), FakeDiffRunner::unavailable());
        let once = hasher.fingerprint("/pkgs/a", Salt::Absent).unwrap();
        let twice = hasher
            .fingerprint(vec!["/pkgs/a", "/pkgs/a"], Salt::Absent)
            .unwrap();

        assert_ne!(once, twice);
    }

    #[test]
    fn test_missing_targets_are_not_found() {
        let hasher = hasher(
            sample_fs().with_dir("/pkgs/empty"),
            FakeDiffRunner::unavailable(),
        );

        let err = hasher.fingerprint("/pkgs/nope", Salt::Absent).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.kind(), Some(std::io::ErrorKind::NotFound));

        let err = hasher.fingerprint("/pkgs/empty", Salt::Absent).unwrap_err();
        assert!(err.is_not_found());

        let err = hasher
            .fingerprint(vec!["/pkgs/a", "/pkgs/nope"], Salt::Absent)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_repository_fragments_follow_manifest() {
        let hasher = hasher(repo_fs(true), FakeDiffRunner::available(b"+dirty\n"));
        let actual = hasher.fingerprint("/repo/pkg", "salt").unwrap();

        assert_eq!(
            actual,
            expected(&[
                &self_digest(),
                b"salt",
                b"/repo/pkg",
                br#"{"name":"pkg"}"#,
                b"ref: refs/heads/main\n",
                b"abc123 refs/heads/old\n",
                b"def456\n",
                b"+dirty\n",
            ])
        );
        assert_eq!(
            hasher.diff.calls.lock().unwrap().as_slice(),
            &[PathBuf::from("/repo/pkg")]
        );
    }

    #[test]
    fn test_missing_packed_refs_is_omitted() {
        let hasher = hasher(repo_fs(false), FakeDiffRunner::unavailable());
        let actual = hasher.fingerprint("/repo/pkg", Salt::Absent).unwrap();

        assert_eq!(
            actual,
            expected(&[
                &self_digest(),
                b"/repo/pkg",
                br#"{"name":"pkg"}"#,
                b"ref: refs/heads/main\n",
                b"def456\n",
            ])
        );
    }

    #[test]
    fn test_diff_gating() {
        let dirty_without_capability = hasher(repo_fs(true), FakeDiffRunner::unavailable())
            .fingerprint("/repo/pkg", Salt::Absent)
            .unwrap();
        let clean_with_capability = hasher(repo_fs(true), FakeDiffRunner::available(b""))
            .fingerprint("/repo/pkg", Salt::Absent)
            .unwrap();
        let dirty_with_capability =
            hasher(repo_fs(true), FakeDiffRunner::available(b"+change\n"))
                .fingerprint("/repo/pkg", Salt::Absent)
                .unwrap();

        assert_eq!(dirty_without_capability, clean_with_capability);
        assert_ne!(dirty_without_capability, dirty_with_capability);
    }

    #[test]
    fn test_failing_diff_degrades() {
        let failing = hasher(repo_fs(true), FakeDiffRunner::failing())
            .fingerprint("/repo/pkg", Salt::Absent)
            .unwrap();
        let unavailable = hasher(repo_fs(true), FakeDiffRunner::unavailable())
            .fingerprint("/repo/pkg", Salt::Absent)
            .unwrap();

        assert_eq!(failing, unavailable);
    }

    #[test]
    fn test_report_lists_fragments_in_order() {
        let hasher = hasher(repo_fs(false), FakeDiffRunner::available(b"+x\n"));
        let report = hasher.report(Path::new("/repo/pkg"), "s").unwrap();

        let kinds: Vec<_> = report.fragments.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![
                FragmentKind::SelfFingerprint,
                FragmentKind::Salt,
                FragmentKind::Directory { target: 0 },
                FragmentKind::Manifest { target: 0 },
                FragmentKind::Head { target: 0 },
                FragmentKind::BranchRef { target: 0 },
                FragmentKind::Diff { target: 0 },
            ]
        );
        assert_eq!(report.fragments[0].len, 32);
        assert_eq!(
            report.fingerprint,
            hasher.fingerprint("/repo/pkg", "s").unwrap()
        );
        assert_eq!(report.targets, vec![PathBuf::from("/repo/pkg")]);
    }
}
