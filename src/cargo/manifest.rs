//! `Cargo.toml` package metadata.

use crate::error::{ErrorContext, LicenseErrorKind, RecipeError, Result};
use crate::license::normalize;
use serde::Deserialize;
use std::path::Path;

/// Package metadata read from a `Cargo.toml` `[package]` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    /// SPDX license expression, already normalized from the legacy `/` form
    pub license: Option<String>,
    pub description: Option<String>,
    pub homepage: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    package: Option<RawPackage>,
}

#[derive(Debug, Deserialize)]
struct RawPackage {
    name: Option<String>,
    version: Option<String>,
    license: Option<String>,
    #[serde(rename = "license-file")]
    license_file: Option<String>,
    #[serde(rename = "license_file")]
    license_file_underscore: Option<String>,
    description: Option<String>,
    homepage: Option<String>,
}

impl PackageMetadata {
    /// Parse package metadata from the contents of a `Cargo.toml`.
    ///
    /// A `license-file` key aborts the parse: file-referenced licenses
    /// cannot be expressed in a recipe `LICENSE` value.
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawManifest = toml::from_str(content)?;
        let pkg = raw
            .package
            .ok_or_else(|| RecipeError::missing_field("package", "Cargo.toml"))?;

        for (key, value) in [
            ("license-file", &pkg.license_file),
            ("license_file", &pkg.license_file_underscore),
        ] {
            if value.is_some() {
                return Err(RecipeError::license(
                    "reading [package]",
                    LicenseErrorKind::UnsupportedLicenseDeclaration {
                        key: key.to_string(),
                    },
                ));
            }
        }

        let name = pkg
            .name
            .ok_or_else(|| RecipeError::missing_field("name", "[package]"))?;
        let version = pkg
            .version
            .ok_or_else(|| RecipeError::missing_field("version", "[package]"))?;

        Ok(Self {
            name,
            version,
            license: pkg.license.as_deref().map(normalize),
            description: pkg.description,
            homepage: pkg.homepage,
        })
    }
}

/// Read package metadata from a `Cargo.toml` on disk.
pub fn get_package_metadata(path: &Path) -> Result<PackageMetadata> {
    let content = std::fs::read_to_string(path).map_err(|e| RecipeError::io(path, e))?;
    PackageMetadata::parse(&content).with_context(|| format!("reading {}", path.display()))
}
