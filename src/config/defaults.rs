//! Default configuration values for crate-recipe.

// ============================================================================
// Default Value Constants
// ============================================================================

/// Default maximum line width of generated values.
pub const DEFAULT_LINE_WIDTH: usize = 72;

/// Default continuation indent.
pub const DEFAULT_INDENT: &str = "\t";

/// Default `KEYWORDS` of fresh recipes.
pub const DEFAULT_KEYWORDS: &str = "~amd64";

/// Narrowest accepted line width.
pub const MIN_LINE_WIDTH: usize = 20;
