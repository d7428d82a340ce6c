//! Configuration module for crate-recipe.
//!
//! This module provides:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//!
//! # Configuration File
//!
//! Place a `.crate-recipe.yaml` file in your project root or
//! `~/.config/crate-recipe/`:
//!
//! ```yaml
//! render:
//!   line_width: 72
//! licenses:
//!   mappings:
//!     LicenseRef-ring: openssl
//! crates:
//!   exclude: [my-app-macros]
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{DEFAULT_INDENT, DEFAULT_KEYWORDS, DEFAULT_LINE_WIDTH, MIN_LINE_WIDTH};
pub use types::{AppConfig, AppConfigBuilder, CrateConfig, LicenseConfig, RecipeConfig, RenderConfig};
pub use validation::{ConfigError, Validatable};

pub use file::{
    default_config_path, discover_config_file, generate_example_config, load_config_file,
    load_or_default, ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.crate-recipe.yaml` config files. It can be used by editors for
/// validation and autocompletion.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).expect("schema serialization should not fail")
}
