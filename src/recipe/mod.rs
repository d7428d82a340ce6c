//! Recipe generation and in-place update.
//!
//! A recipe carries two generated regions: the `CRATES` list and the crate
//! license addition that follows [`MARKER_COMMENT`]. Fresh recipes are
//! rendered from a template; existing ones are patched so that only those
//! two values change.

mod patch;
mod region;
mod render;
mod template;

pub use patch::{update_recipe, Patcher, Scanned, Validated, CRATES_REGION, CRATE_LICENSE_REGION};
pub use region::{Region, RegionMatcher, Span};
pub use render::{
    crate_license_value, package_license_value, render_crate_licenses, render_license,
    render_name_list, RenderStyle, CRATE_LICENSE_PREFIX, PACKAGE_LICENSE_PREFIX,
};
pub use template::{render_recipe, RecipeInputs};

/// Comment line that must directly precede the crate `LICENSE+=` assignment.
pub const MARKER_COMMENT: &str = "# Dependent crate licenses";
