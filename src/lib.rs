//! **Ebuild recipes for Rust packages, generated from Cargo metadata.**
//!
//! `crate-recipe` reads a package's `Cargo.toml` and `Cargo.lock`, opens
//! every vendored `.crate` archive the lockfile names, and produces the two
//! values of an ebuild that track the dependency tree: the `CRATES` list and
//! the combined license of all crates (`LICENSE+=`). It can render a fresh
//! recipe or refresh just those two values in an existing, hand-maintained
//! one.
//!
//! ## Core Concepts & Modules
//!
//! - **[`license`]**: SPDX expressions as an algebraic [`LicenseExpr`]. Legacy
//!   `A/B` declarations are normalized, expressions are combined with AND,
//!   simplified by absorption, and translated into Gentoo license names.
//! - **[`collector`]**: reads the declared license out of each `.crate`
//!   archive, optionally verifying the `Cargo.lock` checksum first.
//! - **[`recipe`]**: renders variable values and fresh recipes, and patches
//!   existing recipes so that only the generated regions change.
//! - **[`pipeline`]**: the read, collect and render workflow behind the CLI.
//! - **[`cargo`]**: `Cargo.toml` and `Cargo.lock` reading.
//!
//! ## Combining crate licenses
//!
//! ```
//! use crate_recipe::license::{combine_and, translate, GentooVocabulary, LicenseExpr};
//! use crate_recipe::recipe::{crate_license_value, RenderStyle};
//!
//! fn main() -> crate_recipe::Result<()> {
//!     let licenses = [
//!         LicenseExpr::parse("MIT")?,
//!         LicenseExpr::parse("MIT OR Apache-2.0")?,
//!     ];
//!     let combined = combine_and(licenses).simplify();
//!     let rendered = translate(&combined, &GentooVocabulary::new())?;
//!     assert_eq!(crate_license_value(&rendered, &RenderStyle::default()), " MIT");
//!     Ok(())
//! }
//! ```
//!
//! ## Updating an existing recipe
//!
//! ```
//! use crate_recipe::recipe::update_recipe;
//!
//! let recipe = "CRATES=\"\"\n# Dependent crate licenses\nLICENSE+=\"\"\n";
//! let patched = update_recipe(recipe, "\n\tfoo-1.0.0\n", " MIT").unwrap();
//! assert_eq!(
//!     patched,
//!     "CRATES=\"\n\tfoo-1.0.0\n\"\n# Dependent crate licenses\nLICENSE+=\" MIT\"\n"
//! );
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod cargo;
pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod license;
pub mod pipeline;
pub mod recipe;

// Re-export main types for convenience
pub use cargo::{Crate, PackageMetadata};
pub use config::{AppConfig, AppConfigBuilder, ConfigError, Validatable};
pub use error::{ErrorContext, RecipeError, Result};
pub use license::{combine_and, normalize, GentooVocabulary, LicenseExpr, LicenseVocabulary};
pub use pipeline::{generate_recipe, patch_recipe, read_package, PackageInputs};
pub use recipe::{update_recipe, Patcher, RenderStyle};
