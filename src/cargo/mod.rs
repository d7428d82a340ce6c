//! Cargo metadata reading.
//!
//! Thin serde wrappers over `Cargo.toml` and `Cargo.lock`. License strings
//! are normalized to SPDX syntax as they are read, so nothing downstream
//! sees the legacy `/` separator.

mod lock;
mod manifest;

pub use lock::{get_crates, Crate, SUPPORTED_LOCK_VERSION};
pub use manifest::{get_package_metadata, PackageMetadata};

/// Manifest file name inside a package directory and inside crate archives.
pub const MANIFEST_FILE: &str = "Cargo.toml";

/// Lockfile name inside a package directory.
pub const LOCK_FILE: &str = "Cargo.lock";
