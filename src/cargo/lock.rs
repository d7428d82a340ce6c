//! `Cargo.lock` crate list.

use crate::error::{ParseErrorKind, RecipeError, Result};
use serde::Deserialize;

/// The only lockfile format version understood.
pub const SUPPORTED_LOCK_VERSION: i64 = 3;

/// A locked package entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Crate {
    pub name: String,
    pub version: String,
    /// SHA-256 of the `.crate` archive, absent for workspace and path members
    pub checksum: Option<String>,
}

impl Crate {
    /// Archive file name, `<name>-<version>.crate`.
    pub fn filename(&self) -> String {
        format!("{}-{}.crate", self.name, self.version)
    }
}

#[derive(Debug, Deserialize)]
struct RawLock {
    version: Option<i64>,
    #[serde(default)]
    package: Vec<RawLockPackage>,
}

#[derive(Debug, Deserialize)]
struct RawLockPackage {
    name: String,
    version: String,
    source: Option<String>,
    checksum: Option<String>,
}

/// Read the vendored crate list from the contents of a `Cargo.lock`.
///
/// Entries named in `exclude` are dropped, as are workspace and path
/// members, which have no `source`. Any other entry without a checksum
/// (a git dependency, for instance) has no archive to read a license from
/// and fails with `MissingChecksum`.
pub fn get_crates(content: &str, exclude: &[String]) -> Result<Vec<Crate>> {
    let raw: RawLock = toml::from_str(content)?;

    let found = raw
        .version
        .ok_or_else(|| RecipeError::missing_field("version", "Cargo.lock"))?;
    if found != SUPPORTED_LOCK_VERSION {
        return Err(RecipeError::parse(
            "reading Cargo.lock",
            ParseErrorKind::LockVersionMismatch {
                found,
                expected: SUPPORTED_LOCK_VERSION,
            },
        ));
    }

    let mut crates = Vec::with_capacity(raw.package.len());
    for pkg in raw.package {
        if exclude.iter().any(|name| *name == pkg.name) {
            tracing::debug!("Excluding {} {}", pkg.name, pkg.version);
            continue;
        }

        if let Err(e) = semver::Version::parse(&pkg.version) {
            return Err(RecipeError::parse(
                "reading Cargo.lock",
                ParseErrorKind::InvalidVersion {
                    name: pkg.name,
                    version: pkg.version,
                    reason: e.to_string(),
                },
            ));
        }

        if pkg.checksum.is_none() {
            let Some(source_id) = pkg.source else {
                tracing::debug!("Skipping {} {}: local package", pkg.name, pkg.version);
                continue;
            };
            return Err(RecipeError::parse(
                "reading Cargo.lock",
                ParseErrorKind::MissingChecksum {
                    name: pkg.name,
                    version: pkg.version,
                    source_id,
                },
            ));
        }

        crates.push(Crate {
            name: pkg.name,
            version: pkg.version,
            checksum: pkg.checksum,
        });
    }

    Ok(crates)
}
