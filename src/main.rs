//! crate-recipe: ebuild recipes for Rust packages
//!
//! Generates and updates the `CRATES` list and the combined crate license of
//! an ebuild from `Cargo.toml`, `Cargo.lock` and the downloaded crates.

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use crate_recipe::{
    cli::{self, RecipeJob},
    config::{self, AppConfigBuilder},
    pipeline::DEFAULT_DISTDIR,
};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "crate-recipe")]
#[command(version)]
#[command(about = "Generate and update ebuild recipes for Rust packages", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Fresh recipe for the package in the current directory
    crate-recipe generate . -O app-0.1.0.ebuild

    # Refresh CRATES and crate licenses of an existing recipe in place
    crate-recipe update . -i app-0.1.1.ebuild

    # Use crates downloaded somewhere else
    crate-recipe generate . -d ~/distfiles")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Arguments shared by `generate` and `update`
#[derive(Args)]
struct PackageArgs {
    /// Package directory containing Cargo.toml and Cargo.lock
    #[arg(default_value = ".")]
    directory: PathBuf,

    /// Directory holding the downloaded .crate archives
    #[arg(short, long, env = "DISTDIR", default_value = DEFAULT_DISTDIR)]
    distdir: PathBuf,

    /// Leave a crate out of CRATES and license collection (repeatable)
    #[arg(long = "exclude", value_name = "NAME")]
    exclude: Vec<String>,

    /// Skip checking archives against Cargo.lock checksums
    #[arg(long)]
    no_verify: bool,
}

/// Arguments for the `generate` subcommand
#[derive(Args)]
struct GenerateArgs {
    #[command(flatten)]
    package: PackageArgs,

    /// Output file, or a directory to receive <name>-<version>.ebuild (stdout if omitted)
    #[arg(short = 'O', long)]
    output: Option<PathBuf>,

    /// Copyright year (defaults to the current year)
    #[arg(long)]
    year: Option<i32>,
}

/// Arguments for the `update` subcommand
#[derive(Args)]
struct UpdateArgs {
    #[command(flatten)]
    package: PackageArgs,

    /// Existing recipe to update
    #[arg(short, long)]
    input: PathBuf,

    /// Output file (defaults to rewriting the input recipe)
    #[arg(short = 'O', long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a fresh recipe
    Generate(GenerateArgs),

    /// Refresh CRATES and crate licenses of an existing recipe
    Update(UpdateArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (defaults merged with file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .crate-recipe.yaml in the current directory
    Init,
}

/// Combine the loaded config file with command line overrides.
fn build_job(
    config_path: Option<&Path>,
    quiet: bool,
    args: PackageArgs,
    output: Option<PathBuf>,
) -> RecipeJob {
    let (loaded, loaded_from) = config::load_or_default(config_path);
    if let Some(path) = &loaded_from {
        tracing::debug!("Using config file {}", path.display());
    }

    let mut builder = AppConfigBuilder::from_config(loaded).exclude(args.exclude);
    if args.no_verify {
        builder = builder.verify_checksums(false);
    }

    RecipeJob {
        package_dir: args.directory,
        distdir: args.distdir,
        output,
        config: builder.build(),
        quiet,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    match cli.command {
        Commands::Generate(args) => {
            let year = args.year.unwrap_or_else(|| chrono::Local::now().year());
            let job = build_job(cli.config.as_deref(), cli.quiet, args.package, args.output);
            cli::run_generate(job, year)
        }

        Commands::Update(args) => {
            let job = build_job(cli.config.as_deref(), cli.quiet, args.package, args.output);
            cli::run_update(job, &args.input)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "crate-recipe", &mut io::stdout());
            Ok(())
        }

        Commands::ConfigSchema { output } => {
            let schema = config::generate_json_schema();
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) = config::load_or_default(cli.config.as_deref());
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(())
            }
            ConfigAction::Path => {
                let search_paths: [Option<String>; 3] = [
                    std::env::current_dir()
                        .ok()
                        .map(|p| p.display().to_string()),
                    dirs::config_dir().map(|p| p.join("crate-recipe").display().to_string()),
                    dirs::home_dir().map(|p| p.display().to_string()),
                ];
                eprintln!("Config file search paths (in order, git root after the first):");
                for path in search_paths.into_iter().flatten() {
                    eprintln!("  {path}");
                }
                eprintln!();
                match config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(())
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(config::default_config_path());
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                std::fs::write(&target, config::generate_example_config())
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_update_requires_input() {
        assert!(Cli::try_parse_from(["crate-recipe", "update", "."]).is_err());
        assert!(Cli::try_parse_from(["crate-recipe", "update", ".", "-i", "a.ebuild"]).is_ok());
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::try_parse_from(["crate-recipe", "generate", "--exclude", "app"]).unwrap();
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.package.directory, PathBuf::from("."));
                assert_eq!(args.package.exclude, vec!["app"]);
                assert!(args.output.is_none());
            }
            _ => panic!("Expected generate"),
        }
    }
}
