//! Configuration validation for crate-recipe.

use super::defaults::MIN_LINE_WIDTH;
use super::types::*;
use crate::license::LicenseExpr;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.render.validate());
        errors.extend(self.licenses.validate());
        errors.extend(self.crates.validate());
        errors.extend(self.recipe.validate());
        errors
    }
}

impl Validatable for RenderConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.line_width < MIN_LINE_WIDTH {
            errors.push(ConfigError {
                field: "render.line_width".to_string(),
                message: format!(
                    "Line width must be at least {}, got {}",
                    MIN_LINE_WIDTH, self.line_width
                ),
            });
        }

        if self.indent.is_empty() || !self.indent.chars().all(|c| c == ' ' || c == '\t') {
            errors.push(ConfigError {
                field: "render.indent".to_string(),
                message: format!(
                    "Indent must be one or more spaces or tabs, got {:?}",
                    self.indent
                ),
            });
        }
        errors
    }
}

impl Validatable for LicenseConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        for (spdx, name) in &self.mappings {
            match LicenseExpr::parse(spdx) {
                Ok(expr) if expr.is_leaf() => {}
                Ok(_) => errors.push(ConfigError {
                    field: format!("licenses.mappings.{spdx}"),
                    message: "Key must be a single license, optionally WITH an exception"
                        .to_string(),
                }),
                Err(e) => errors.push(ConfigError {
                    field: format!("licenses.mappings.{spdx}"),
                    message: e.to_string(),
                }),
            }

            if name.is_empty() || name.chars().any(char::is_whitespace) {
                errors.push(ConfigError {
                    field: format!("licenses.mappings.{spdx}"),
                    message: format!("Invalid license name {name:?}"),
                });
            }
        }
        errors
    }
}

impl Validatable for CrateConfig {
    fn validate(&self) -> Vec<ConfigError> {
        self.exclude
            .iter()
            .filter(|name| name.trim().is_empty())
            .map(|_| ConfigError {
                field: "crates.exclude".to_string(),
                message: "Crate names must not be empty".to_string(),
            })
            .collect()
    }
}

impl Validatable for RecipeConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.keywords.contains(|c| c == '"' || c == '\n') {
            errors.push(ConfigError {
                field: "recipe.keywords".to_string(),
                message: "Keywords must be a single line without quotes".to_string(),
            });
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_empty());
    }

    #[test]
    fn test_line_width_too_small() {
        let config = AppConfig::builder().line_width(10).build();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "render.line_width");
    }

    #[test]
    fn test_indent() {
        assert!(!AppConfig::builder().indent("").build().validate().is_empty());
        assert!(!AppConfig::builder().indent("--").build().validate().is_empty());
        assert!(AppConfig::builder().indent("    ").build().validate().is_empty());
    }

    #[test]
    fn test_mapping_keys_must_be_known_leaves() {
        let config = AppConfig::builder()
            .mapping("LicenseRef-ring", "openssl")
            .mapping("Apache-2.0 WITH LLVM-exception", "Apache-2.0-with-LLVM-exceptions")
            .build();
        assert!(config.validate().is_empty());

        let config = AppConfig::builder().mapping("Not-A-License", "foo").build();
        assert_eq!(config.validate().len(), 1);

        let config = AppConfig::builder().mapping("MIT OR ISC", "foo").build();
        assert_eq!(config.validate().len(), 1);
    }

    #[test]
    fn test_mapping_values() {
        let config = AppConfig::builder().mapping("MIT", "").build();
        assert!(!config.validate().is_empty());
        let config = AppConfig::builder().mapping("MIT", "MIT license").build();
        assert!(!config.validate().is_empty());
    }

    #[test]
    fn test_empty_exclude_name() {
        let config = AppConfig::builder().exclude([" "]).build();
        let errors = config.validate();
        assert_eq!(errors[0].field, "crates.exclude");
    }

    #[test]
    fn test_keywords() {
        assert!(!AppConfig::builder().keywords("~amd64\"").build().validate().is_empty());
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError {
            field: "render.indent".to_string(),
            message: "bad".to_string(),
        };
        assert_eq!(err.to_string(), "render.indent: bad");
    }
}
