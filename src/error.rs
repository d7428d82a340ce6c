//! Unified error types for crate-recipe.
//!
//! Every failure here is terminal for the conversion being attempted: the
//! inputs are malformed, not temporarily unavailable, so nothing is retried
//! and no partial recipe is written.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for crate-recipe operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RecipeError {
    /// Malformed Cargo manifest or lockfile
    #[error("Failed to parse Cargo metadata: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// License declaration could not be turned into a recipe value
    #[error("License error: {context}")]
    License {
        context: String,
        #[source]
        source: LicenseErrorKind,
    },

    /// Crate archive could not be introspected
    #[error("Crate archive error: {context}")]
    Archive {
        context: String,
        #[source]
        source: ArchiveErrorKind,
    },

    /// Existing recipe is not in an automatable state
    #[error("Cannot patch recipe: {context}")]
    Patch {
        context: String,
        #[source]
        source: PatchErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {}: {message}", path.display())]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Specific Cargo metadata parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Invalid TOML: {0}")]
    InvalidToml(String),

    #[error("Missing required field: {field} in {context}")]
    MissingField { field: String, context: String },

    #[error("Unsupported Cargo.lock version: {found} (expected {expected})")]
    LockVersionMismatch { found: i64, expected: i64 },

    #[error("Invalid version '{version}' for {name}: {reason}")]
    InvalidVersion {
        name: String,
        version: String,
        reason: String,
    },

    #[error("{name} {version} from {source_id} has no checksum")]
    MissingChecksum {
        name: String,
        version: String,
        source_id: String,
    },
}

/// Specific license error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LicenseErrorKind {
    #[error("Invalid license expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },

    #[error("License declared via '{key}' is not supported, an SPDX `license` is required")]
    UnsupportedLicenseDeclaration { key: String },

    #[error("No license declared for {0}")]
    MissingLicense(String),

    #[error("No recipe license name for '{0}'")]
    UnmappableLicense(String),
}

/// Specific crate archive error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ArchiveErrorKind {
    #[error("Archive name '{0}' does not end with .crate")]
    InvalidArchiveName(String),

    #[error("Manifest {0} not found in archive")]
    MissingManifest(String),

    #[error("Checksum mismatch: expected {expected}, found {found}")]
    ChecksumMismatch { expected: String, found: String },
}

/// Specific recipe patch error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PatchErrorKind {
    #[error("{0} not found in recipe")]
    RegionNotFound(String),

    #[error("Multiple {region} found in recipe ({count} matches)")]
    DuplicateRegion { region: String, count: usize },

    #[error("{first} and {second} overlap")]
    OverlappingRegions { first: String, second: String },
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for crate-recipe operations
pub type Result<T> = std::result::Result<T, RecipeError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl RecipeError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create a parse error for missing field
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::parse(
            "missing required field",
            ParseErrorKind::MissingField {
                field: field.into(),
                context: context.into(),
            },
        )
    }

    /// Create a license error with context
    pub fn license(context: impl Into<String>, source: LicenseErrorKind) -> Self {
        Self::License {
            context: context.into(),
            source,
        }
    }

    /// Create a license error for a malformed expression
    pub fn invalid_expression(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::license(
            "parsing license expression",
            LicenseErrorKind::InvalidExpression {
                expression: expression.into(),
                reason: reason.into(),
            },
        )
    }

    /// Create an archive error with context
    pub fn archive(context: impl Into<String>, source: ArchiveErrorKind) -> Self {
        Self::Archive {
            context: context.into(),
            source,
        }
    }

    /// Create a patch error with context
    pub fn patch(context: impl Into<String>, source: PatchErrorKind) -> Self {
        Self::Patch {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
            source,
        }
    }

    /// The license error kind, if this is a license error.
    pub fn license_kind(&self) -> Option<&LicenseErrorKind> {
        match self {
            Self::License { source, .. } => Some(source),
            _ => None,
        }
    }

    /// The archive error kind, if this is an archive error.
    pub fn archive_kind(&self) -> Option<&ArchiveErrorKind> {
        match self {
            Self::Archive { source, .. } => Some(source),
            _ => None,
        }
    }

    /// The patch error kind, if this is a patch error.
    pub fn patch_kind(&self) -> Option<&PatchErrorKind> {
        match self {
            Self::Patch { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<toml::de::Error> for RecipeError {
    fn from(err: toml::de::Error) -> Self {
        Self::parse(
            "TOML deserialization",
            ParseErrorKind::InvalidToml(err.message().to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to the error's existing context, so a
/// failure deep inside one archive reads as
/// `reading foo-1.0.0.crate: parsing license expression`.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (lazy evaluation).
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<RecipeError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: RecipeError, new_ctx: &str) -> RecipeError {
    match err {
        RecipeError::Parse {
            context: existing,
            source,
        } => RecipeError::Parse {
            context: chain_context(new_ctx, &existing),
            source,
        },
        RecipeError::License {
            context: existing,
            source,
        } => RecipeError::License {
            context: chain_context(new_ctx, &existing),
            source,
        },
        RecipeError::Archive {
            context: existing,
            source,
        } => RecipeError::Archive {
            context: chain_context(new_ctx, &existing),
            source,
        },
        RecipeError::Patch {
            context: existing,
            source,
        } => RecipeError::Patch {
            context: chain_context(new_ctx, &existing),
            source,
        },
        RecipeError::Io {
            path,
            message,
            source,
        } => RecipeError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
