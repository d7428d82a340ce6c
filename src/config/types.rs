//! Configuration types for crate-recipe.

use super::defaults::{DEFAULT_INDENT, DEFAULT_KEYWORDS, DEFAULT_LINE_WIDTH};
use crate::license::GentooVocabulary;
use crate::recipe::RenderStyle;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration, loaded from a config file and then
/// adjusted by CLI arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Layout of generated variable values
    pub render: RenderConfig,
    /// License translation settings
    pub licenses: LicenseConfig,
    /// Crate selection and verification
    pub crates: CrateConfig,
    /// Fixed values of fresh recipes
    pub recipe: RecipeConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Layout settings for the renderer.
    #[must_use]
    pub fn render_style(&self) -> RenderStyle {
        RenderStyle {
            line_width: self.render.line_width,
            indent: self.render.indent.clone(),
        }
    }

    /// Target license vocabulary including configured overrides.
    #[must_use]
    pub fn vocabulary(&self) -> GentooVocabulary {
        GentooVocabulary::with_overrides(self.licenses.mappings.clone())
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Start from an existing configuration, e.g. one loaded from a file.
    pub fn from_config(config: AppConfig) -> Self {
        Self { config }
    }

    /// Set the maximum line width.
    pub const fn line_width(mut self, width: usize) -> Self {
        self.config.render.line_width = width;
        self
    }

    /// Set the continuation indent.
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.config.render.indent = indent.into();
        self
    }

    /// Add a license name override.
    pub fn mapping(mut self, spdx: impl Into<String>, name: impl Into<String>) -> Self {
        self.config.licenses.mappings.insert(spdx.into(), name.into());
        self
    }

    /// Exclude additional crates by name.
    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.config.crates.exclude.contains(&name) {
                self.config.crates.exclude.push(name);
            }
        }
        self
    }

    /// Enable or disable checksum verification.
    pub const fn verify_checksums(mut self, verify: bool) -> Self {
        self.config.crates.verify_checksums = verify;
        self
    }

    /// Set the keywords of fresh recipes.
    pub fn keywords(mut self, keywords: impl Into<String>) -> Self {
        self.config.recipe.keywords = keywords.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Layout of generated values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RenderConfig {
    /// Longest line before a license value is split (tabs count as 8)
    pub line_width: usize,
    /// Indentation unit of continuation lines
    pub indent: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
            indent: DEFAULT_INDENT.to_string(),
        }
    }
}

/// License translation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LicenseConfig {
    /// SPDX leaf (e.g. `LicenseRef-ring`) to recipe license name
    pub mappings: BTreeMap<String, String>,
}

/// Crate selection and verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CrateConfig {
    /// Lockfile package names left out of CRATES and license collection
    pub exclude: Vec<String>,
    /// Compare each archive against its `Cargo.lock` checksum
    pub verify_checksums: bool,
}

impl Default for CrateConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            verify_checksums: true,
        }
    }
}

/// Fixed values written into fresh recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RecipeConfig {
    /// `KEYWORDS` value
    pub keywords: String,
}

impl Default for RecipeConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.to_string(),
        }
    }
}
