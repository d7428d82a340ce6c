//! Update command handler.
//!
//! Implements the `update` subcommand, which refreshes the generated regions
//! of an existing recipe and leaves everything else untouched.

use super::{check_config, RecipeJob};
use crate::pipeline::{patch_recipe, read_package, write_output, OutputTarget};
use anyhow::{Context, Result};
use std::path::Path;

/// Run the update command on `input`.
///
/// Without an explicit output the input recipe is rewritten in place.
pub fn run_update(job: RecipeJob, input: &Path) -> Result<()> {
    check_config(&job.config)?;

    let existing = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read recipe {}", input.display()))?;

    let inputs = read_package(&job.package_dir, &job.distdir, &job.config, job.quiet)?;
    let patched = patch_recipe(&existing, &inputs, &job.config)
        .with_context(|| format!("Failed to update {}", input.display()))?;

    let target = OutputTarget::File(job.output.unwrap_or_else(|| input.to_path_buf()));
    write_output(&patched, &target, job.quiet)
}
