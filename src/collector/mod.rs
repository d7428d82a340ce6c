//! Crate license collection.
//!
//! Each `.crate` archive is a gzip tarball with a single top-level
//! `<name>-<version>/` directory holding the crate's normalized
//! `Cargo.toml`. The declared license of every archive is read and parsed
//! into a [`LicenseExpr`]; the per-crate results are independent, so archives
//! are processed in parallel and gathered into a name-sorted map.

use crate::cargo::{Crate, PackageMetadata, MANIFEST_FILE};
use crate::error::{ArchiveErrorKind, ErrorContext, LicenseErrorKind, RecipeError, Result};
use crate::license::LicenseExpr;
use flate2::read::GzDecoder;
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tar::Archive;

/// Archive suffix of downloaded crates.
pub const CRATE_SUFFIX: &str = ".crate";

/// The `<name>-<version>` stem of a crate archive path.
pub fn crate_stem(path: &Path) -> Result<&str> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    file_name
        .strip_suffix(CRATE_SUFFIX)
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| {
            RecipeError::archive(
                format!("at {}", path.display()),
                ArchiveErrorKind::InvalidArchiveName(file_name.to_string()),
            )
        })
}

/// Read the embedded `Cargo.toml` of a crate archive.
fn read_manifest(path: &Path, stem: &str) -> Result<String> {
    let file = File::open(path).map_err(|e| RecipeError::io(path, e))?;
    let mut archive = Archive::new(GzDecoder::new(file));
    let manifest = PathBuf::from(stem).join(MANIFEST_FILE);

    for entry in archive.entries().map_err(|e| RecipeError::io(path, e))? {
        let mut entry = entry.map_err(|e| RecipeError::io(path, e))?;
        let is_manifest = *entry.path().map_err(|e| RecipeError::io(path, e))? == *manifest;
        if is_manifest {
            let mut content = String::new();
            entry
                .read_to_string(&mut content)
                .map_err(|e| RecipeError::io(path, e))?;
            return Ok(content);
        }
    }

    Err(RecipeError::archive(
        format!("reading {}", path.display()),
        ArchiveErrorKind::MissingManifest(manifest.display().to_string()),
    ))
}

/// Read the declared license of one crate archive.
///
/// Returns the archive stem together with the parsed expression.
pub fn read_crate_license(path: &Path) -> Result<(String, LicenseExpr)> {
    let stem = crate_stem(path)?;
    tracing::debug!("Reading license of {}", stem);

    let manifest = read_manifest(path, stem)?;
    let metadata =
        PackageMetadata::parse(&manifest).with_context(|| format!("reading {}", path.display()))?;
    let license = metadata.license.ok_or_else(|| {
        RecipeError::license(
            format!("reading {}", path.display()),
            LicenseErrorKind::MissingLicense(stem.to_string()),
        )
    })?;
    let expr = LicenseExpr::parse(&license).with_context(|| format!("crate {stem}"))?;

    Ok((stem.to_string(), expr))
}

/// Collect the declared license of every archive, keyed by crate stem.
///
/// The first failing archive aborts the whole collection.
pub fn collect(paths: &[PathBuf]) -> Result<BTreeMap<String, LicenseExpr>> {
    let licenses: Vec<(String, LicenseExpr)> = paths
        .par_iter()
        .map(|path| read_crate_license(path))
        .collect::<Result<_>>()?;
    Ok(licenses.into_iter().collect())
}

/// Compute the SHA-256 of a file as lowercase hex.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| RecipeError::io(path, e))?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher).map_err(|e| RecipeError::io(path, e))?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Check an archive against its `Cargo.lock` checksum.
pub fn verify_checksum(path: &Path, expected: &str) -> Result<()> {
    let found = sha256_file(path)?;
    if !found.eq_ignore_ascii_case(expected) {
        return Err(RecipeError::archive(
            format!("verifying {}", path.display()),
            ArchiveErrorKind::ChecksumMismatch {
                expected: expected.to_string(),
                found,
            },
        ));
    }
    Ok(())
}

/// Archive paths for locked crates inside `distdir`.
pub fn crate_paths(distdir: &Path, crates: &[Crate]) -> Vec<PathBuf> {
    crates.iter().map(|c| distdir.join(c.filename())).collect()
}

/// Verify (optionally) and collect the licenses of locked crates.
pub fn collect_crates(
    distdir: &Path,
    crates: &[Crate],
    verify_checksums: bool,
) -> Result<BTreeMap<String, LicenseExpr>> {
    let paths = crate_paths(distdir, crates);

    if verify_checksums {
        crates
            .par_iter()
            .zip(paths.par_iter())
            .try_for_each(|(krate, path)| match &krate.checksum {
                Some(expected) => verify_checksum(path, expected),
                None => Ok(()),
            })?;
    }

    collect(&paths)
}
