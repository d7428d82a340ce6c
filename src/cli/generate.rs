//! Generate command handler.
//!
//! Implements the `generate` subcommand, which renders a fresh recipe.

use super::{check_config, RecipeJob};
use crate::pipeline::{generate_recipe, read_package, recipe_file_name, write_output, OutputTarget};
use anyhow::Result;

/// Run the generate command.
///
/// An output path naming an existing directory receives
/// `<name>-<version>.ebuild` inside it.
pub fn run_generate(job: RecipeJob, year: i32) -> Result<()> {
    check_config(&job.config)?;

    let inputs = read_package(&job.package_dir, &job.distdir, &job.config, job.quiet)?;
    let recipe = generate_recipe(&inputs, &job.config, year)?;

    let target = match job.output {
        Some(dir) if dir.is_dir() => OutputTarget::File(dir.join(recipe_file_name(&inputs))),
        other => OutputTarget::from_option(other),
    };
    write_output(&recipe, &target, job.quiet)
}
