//! Self fingerprint: a digest of the hashing implementation itself
//!
//! Mixing this digest into every fingerprint means a change to the algorithm
//! invalidates every key produced by an earlier build.

use sha2::{Digest, Sha256};
use std::sync::OnceLock;

use crate::ports::{IdentityError, SelfIdentity};

/// Source files of the fingerprint algorithm, embedded at compile time
const ALGORITHM_SOURCES: &[(&str, &str)] = &[
    ("lib.rs", include_str!("lib.rs")),
    ("model.rs", include_str!("model.rs")),
    ("ports.rs", include_str!("ports.rs")),
    ("identity.rs", include_str!("identity.rs")),
    ("usecases/mod.rs", include_str!("usecases/mod.rs")),
    ("usecases/salt.rs", include_str!("usecases/salt.rs")),
    ("usecases/resolve.rs", include_str!("usecases/resolve.rs")),
    ("usecases/repository.rs", include_str!("usecases/repository.rs")),
    ("usecases/fingerprint.rs", include_str!("usecases/fingerprint.rs")),
];

/// Identity backed by the embedded algorithm sources
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSources;

impl SelfIdentity for EmbeddedSources {
    fn source(&self) -> Result<Vec<u8>, IdentityError> {
        let mut bytes = Vec::new();
        for (name, contents) in ALGORITHM_SOURCES {
            bytes.extend_from_slice(name.as_bytes());
            bytes.extend_from_slice(contents.as_bytes());
        }
        Ok(bytes)
    }
}

/// Lazily computed, process-lifetime digest of a [`SelfIdentity`]
///
/// Concurrent first calls may each compute the digest; they agree, and only
/// one value is stored.
pub struct MemoizedIdentity<I: ?Sized> {
    digest: OnceLock<Vec<u8>>,
    provider: I,
}

impl<I: SelfIdentity> MemoizedIdentity<I> {
    pub fn new(provider: I) -> Self {
        Self {
            digest: OnceLock::new(),
            provider,
        }
    }
}

impl<I: SelfIdentity + ?Sized> MemoizedIdentity<I> {
    /// Raw SHA-256 digest of the provider's source
    pub fn get(&self) -> Result<&[u8], IdentityError> {
        if let Some(digest) = self.digest.get() {
            return Ok(digest);
        }

        let source = self.provider.source()?;
        let digest = Sha256::digest(&source).to_vec();
        tracing::debug!(source_len = source.len(), "Computed self fingerprint");

        Ok(self.digest.get_or_init(|| digest))
    }

    pub fn is_cached(&self) -> bool {
        self.digest.get().is_some()
    }
}
