//! Pipeline orchestration for recipe operations.
//!
//! Shared read -> collect -> render workflows used by the `generate` and
//! `update` command handlers.

mod collect_stage;
mod output;
mod recipe_stage;

pub use collect_stage::{read_package, PackageInputs};
pub use output::{write_output, OutputTarget};
pub use recipe_stage::{generate_recipe, patch_recipe, recipe_file_name};

/// Distfiles directory used when neither `--distdir` nor `DISTDIR` is set.
pub const DEFAULT_DISTDIR: &str = "/var/cache/distfiles";
