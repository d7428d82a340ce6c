//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand.

mod generate;
mod update;

pub use generate::run_generate;
pub use update::run_update;

use crate::config::{AppConfig, Validatable};
use std::path::PathBuf;

/// Inputs shared by the `generate` and `update` subcommands.
#[derive(Debug, Clone)]
pub struct RecipeJob {
    /// Directory holding `Cargo.toml` and `Cargo.lock`
    pub package_dir: PathBuf,
    /// Directory holding the downloaded `.crate` archives
    pub distdir: PathBuf,
    /// Output path; `None` means the handler's default target
    pub output: Option<PathBuf>,
    /// Effective configuration (file settings plus CLI overrides)
    pub config: AppConfig,
    pub quiet: bool,
}

/// Refuse to run with an invalid configuration.
fn check_config(config: &AppConfig) -> anyhow::Result<()> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
    anyhow::bail!("Invalid configuration:\n  {}", details.join("\n  "))
}
