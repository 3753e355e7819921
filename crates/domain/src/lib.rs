//! pkg-fingerprint domain crate
//!
//! This crate contains the core fingerprint algorithm following hexagonal architecture:
//! - `model`: Salt, targets, repository state and digest fragments
//! - `ports`: Trait definitions for the filesystem, diff tool and self identity
//! - `identity`: Memoized digest of this implementation
//! - `usecases`: Target resolution, repository collection and the fingerprint itself

pub mod identity;
pub mod model;
pub mod ports;
pub mod usecases;

#[cfg(test)]
pub(crate) mod testing;

pub use identity::{EmbeddedSources, MemoizedIdentity};
pub use model::*;
pub use ports::*;
pub use usecases::{DEFAULT_MANIFEST_NAME, HasherConfig, PackageHasher};

use sha2::{Digest, Sha256};

/// Fold ordered fragments into a lowercase hex SHA-256 digest
///
/// Absent fragments are skipped without leaving a marker, so `[a, None, b]`
/// and `[a, b]` agree.
pub fn accumulate<I, B>(fragments: I) -> String
where
    I: IntoIterator<Item = Option<B>>,
    B: AsRef<[u8]>,
{
    let mut hasher = Sha256::new();
    for fragment in fragments.into_iter().flatten() {
        hasher.update(fragment.as_ref());
    }
    format!("{:x}", hasher.finalize())
}
