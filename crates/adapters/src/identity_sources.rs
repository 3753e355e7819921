//! Default self identity: domain sources plus the adapters that shape fragments

use pkg_fingerprint_domain::{EmbeddedSources, IdentityError, MemoizedIdentity, SelfIdentity};
use std::sync::{Arc, OnceLock};

/// Adapter sources whose behavior decides fragment bytes
const ADAPTER_SOURCES: &[(&str, &str)] = &[
    ("adapters/lib.rs", include_str!("lib.rs")),
    ("adapters/fs_local.rs", include_str!("fs_local.rs")),
    ("adapters/git_diff.rs", include_str!("git_diff.rs")),
];

/// Every source file of the fingerprint algorithm, domain first
#[derive(Debug, Clone, Copy, Default)]
pub struct AlgorithmSources;

impl SelfIdentity for AlgorithmSources {
    fn source(&self) -> Result<Vec<u8>, IdentityError> {
        let mut bytes = EmbeddedSources.source()?;
        for (name, contents) in ADAPTER_SOURCES {
            bytes.extend_from_slice(name.as_bytes());
            bytes.extend_from_slice(contents.as_bytes());
        }
        Ok(bytes)
    }
}

static ALGORITHM_IDENTITY: OnceLock<Arc<MemoizedIdentity<AlgorithmSources>>> = OnceLock::new();

/// Process-wide memoized identity over [`AlgorithmSources`]
pub fn algorithm_identity() -> Arc<MemoizedIdentity<AlgorithmSources>> {
    ALGORITHM_IDENTITY
        .get_or_init(|| Arc::new(MemoizedIdentity::new(AlgorithmSources)))
        .clone()
}
