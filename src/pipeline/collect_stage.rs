//! Reading a package directory and its vendored crates.

use crate::cargo::{get_crates, get_package_metadata, Crate, PackageMetadata, LOCK_FILE, MANIFEST_FILE};
use crate::collector::collect_crates;
use crate::config::AppConfig;
use crate::license::LicenseExpr;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Everything read from a package before rendering.
#[derive(Debug, Clone)]
pub struct PackageInputs {
    /// Metadata of the top-level package
    pub metadata: PackageMetadata,
    /// Vendored crates, sorted by name then version
    pub crates: Vec<Crate>,
    /// Declared license of every vendored crate, keyed by stem
    pub licenses: BTreeMap<String, LicenseExpr>,
}

impl PackageInputs {
    /// `<name>-<version>` stems in `CRATES` order.
    #[must_use]
    pub fn crate_stems(&self) -> Vec<String> {
        self.crates
            .iter()
            .map(|c| format!("{}-{}", c.name, c.version))
            .collect()
    }
}

/// Read `Cargo.toml`, `Cargo.lock` and the archives they name.
pub fn read_package(
    package_dir: &Path,
    distdir: &Path,
    config: &AppConfig,
    quiet: bool,
) -> Result<PackageInputs> {
    let manifest_path = package_dir.join(MANIFEST_FILE);
    let metadata = get_package_metadata(&manifest_path)
        .with_context(|| format!("Failed to read {}", manifest_path.display()))?;

    let lock_path = package_dir.join(LOCK_FILE);
    let lock = std::fs::read_to_string(&lock_path)
        .with_context(|| format!("Failed to read {}", lock_path.display()))?;
    let mut crates = get_crates(&lock, &config.crates.exclude)
        .with_context(|| format!("Failed to parse {}", lock_path.display()))?;
    crates.sort();

    if !quiet {
        tracing::info!(
            "Collecting licenses of {} crates from {}",
            crates.len(),
            distdir.display()
        );
    }

    let licenses = collect_crates(distdir, &crates, config.crates.verify_checksums)
        .context("Failed to collect crate licenses")?;

    Ok(PackageInputs {
        metadata,
        crates,
        licenses,
    })
}
