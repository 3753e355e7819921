//! Application use cases / business logic

pub mod fingerprint;
pub mod repository;
pub mod resolve;
pub mod salt;

pub use fingerprint::{HasherConfig, PackageHasher};
pub use repository::{GitLocation, RepositoryCollector};
pub use resolve::{DEFAULT_MANIFEST_NAME, resolve_target};
