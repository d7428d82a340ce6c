//! End-to-end tests for recipe generation and update.
//!
//! Each test builds a package directory and a distdir of real gzip'd tar
//! archives in a temporary directory, then runs the pipeline over them.

use crate_recipe::cli::{run_generate, run_update, RecipeJob};
use crate_recipe::collector::sha256_file;
use crate_recipe::error::{ArchiveErrorKind, LicenseErrorKind, ParseErrorKind, RecipeError};
use crate_recipe::pipeline::{generate_recipe, patch_recipe, read_package};
use crate_recipe::AppConfig;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Fixtures
// ============================================================================

struct Fixture {
    _tmp: TempDir,
    package: PathBuf,
    distdir: PathBuf,
}

/// A locked dependency: name, version and declared license (if any).
type Dep<'a> = (&'a str, &'a str, Option<&'a str>);

fn write_crate(distdir: &Path, name: &str, version: &str, license: Option<&str>) -> PathBuf {
    let stem = format!("{name}-{version}");
    let mut manifest = format!("[package]\nname = \"{name}\"\nversion = \"{version}\"\n");
    if let Some(license) = license {
        manifest.push_str(&format!("license = \"{license}\"\n"));
    }

    let path = distdir.join(format!("{stem}.crate"));
    let file = File::create(&path).unwrap();
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    for (entry, content) in [("Cargo.toml", manifest.as_str()), ("src/lib.rs", "")] {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, format!("{stem}/{entry}"), content.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
    path
}

fn fixture(package_license: Option<&str>, deps: &[Dep<'_>]) -> Fixture {
    let tmp = TempDir::new().unwrap();
    let package = tmp.path().join("app");
    let distdir = tmp.path().join("distfiles");
    std::fs::create_dir_all(&package).unwrap();
    std::fs::create_dir_all(&distdir).unwrap();

    let mut manifest = String::from(
        "[package]\nname = \"app\"\nversion = \"0.1.0\"\ndescription = \"An app\"\nhomepage = \"https://example.org/app\"\n",
    );
    if let Some(license) = package_license {
        manifest.push_str(&format!("license = \"{license}\"\n"));
    }
    std::fs::write(package.join("Cargo.toml"), manifest).unwrap();

    let mut lock = String::from(
        "# This file is automatically @generated by Cargo.\nversion = 3\n\n[[package]]\nname = \"app\"\nversion = \"0.1.0\"\n",
    );
    for (name, version, license) in deps {
        let path = write_crate(&distdir, name, version, *license);
        let checksum = sha256_file(&path).unwrap();
        lock.push_str(&format!(
            "\n[[package]]\nname = \"{name}\"\nversion = \"{version}\"\nsource = \"registry+https://github.com/rust-lang/crates.io-index\"\nchecksum = \"{checksum}\"\n"
        ));
    }
    std::fs::write(package.join("Cargo.lock"), lock).unwrap();

    Fixture {
        _tmp: tmp,
        package,
        distdir,
    }
}

fn job(fx: &Fixture, output: Option<PathBuf>) -> RecipeJob {
    RecipeJob {
        package_dir: fx.package.clone(),
        distdir: fx.distdir.clone(),
        output,
        config: AppConfig::default(),
        quiet: true,
    }
}

fn generate(fx: &Fixture, config: &AppConfig) -> anyhow::Result<String> {
    let inputs = read_package(&fx.package, &fx.distdir, config, true)?;
    generate_recipe(&inputs, config, 2024)
}

fn root_cause(err: &anyhow::Error) -> &RecipeError {
    err.chain()
        .find_map(|e| e.downcast_ref::<RecipeError>())
        .unwrap_or_else(|| panic!("no RecipeError in {err:?}"))
}

// ============================================================================
// Generation
// ============================================================================

mod generation {
    use super::*;

    #[test]
    fn absorbed_license_disappears() {
        let fx = fixture(
            Some("MIT"),
            &[("a", "1.0.0", Some("MIT")), ("b", "2.0.0", Some("MIT OR Apache-2.0"))],
        );
        let recipe = generate(&fx, &AppConfig::default()).unwrap();

        assert!(recipe.contains("CRATES=\"\n\ta-1.0.0\n\tb-2.0.0\n\"\n"));
        assert!(recipe.contains("LICENSE=\"MIT\"\n# Dependent crate licenses\nLICENSE+=\" MIT\"\n"));
        assert!(recipe.contains("DESCRIPTION=\"An app\"\n"));
        assert!(recipe.contains("HOMEPAGE=\"https://example.org/app\"\n"));
        assert!(recipe.starts_with("# Copyright 2024 Gentoo Authors\n"));
    }

    #[test]
    fn legacy_slash_syntax_is_normalized() {
        let fx = fixture(None, &[("a", "1.0.0", Some("MIT/Apache-2.0"))]);
        let recipe = generate(&fx, &AppConfig::default()).unwrap();
        assert!(recipe.contains("LICENSE+=\" || ( Apache-2.0 MIT )\"\n"), "{recipe}");
        assert!(recipe.contains("LICENSE=\"\"\n"));
    }

    #[test]
    fn deprecated_gpl_plus_is_translated() {
        let fx = fixture(
            Some("GPL-2.0+"),
            &[
                ("a", "1.0.0", Some("GPL-2.0+ OR MIT")),
                ("b", "1.0.0", Some("MIT OR GPL-2.0-or-later")),
            ],
        );
        let recipe = generate(&fx, &AppConfig::default()).unwrap();
        assert!(recipe.contains("LICENSE=\"GPL-2+\"\n"), "{recipe}");
        assert!(recipe.contains("LICENSE+=\" || ( GPL-2+ MIT )\"\n"), "{recipe}");
    }

    #[test]
    fn duplicate_declarations_collapse() {
        let fx = fixture(
            Some("MIT"),
            &[
                ("a", "1.0.0", Some("MIT OR Apache-2.0")),
                ("b", "1.0.0", Some("Apache-2.0 OR MIT")),
                ("c", "1.0.0", Some("Unicode-DFS-2016")),
            ],
        );
        let recipe = generate(&fx, &AppConfig::default()).unwrap();
        assert!(
            recipe.contains("LICENSE+=\" Unicode-DFS-2016 || ( Apache-2.0 MIT )\"\n"),
            "{recipe}"
        );
    }

    #[test]
    fn no_dependencies() {
        let fx = fixture(Some("MIT"), &[]);
        let recipe = generate(&fx, &AppConfig::default()).unwrap();
        assert!(recipe.contains("CRATES=\"\"\n"));
        assert!(recipe.contains("LICENSE+=\"\"\n"));
    }

    #[test]
    fn excluded_crates_are_skipped() {
        let fx = fixture(None, &[("a", "1.0.0", Some("MIT")), ("b", "1.0.0", Some("ISC"))]);
        let config = AppConfig::builder().exclude(["b"]).build();
        let recipe = generate(&fx, &config).unwrap();
        assert!(recipe.contains("CRATES=\"\n\ta-1.0.0\n\"\n"));
        assert!(recipe.contains("LICENSE+=\" MIT\"\n"));
    }

    #[test]
    fn long_license_wraps() {
        let fx = fixture(
            None,
            &[
                ("a", "1.0.0", Some("MIT")),
                ("b", "1.0.0", Some("ISC")),
                ("c", "1.0.0", Some("Apache-2.0 OR BSL-1.0")),
                ("d", "1.0.0", Some("Unlicense OR MIT-0")),
            ],
        );
        let config = AppConfig::builder().line_width(40).build();
        let recipe = generate(&fx, &config).unwrap();
        assert!(
            recipe.contains("LICENSE+=\"\n\tISC MIT\n\t|| ( Apache-2.0 Boost-1.0 )\n\t|| ( MIT-0 Unlicense )\n\"\n"),
            "{recipe}"
        );
    }

    #[test]
    fn license_override_from_config() {
        let fx = fixture(None, &[("ring", "0.17.0", Some("LicenseRef-ring"))]);
        let err = generate(&fx, &AppConfig::default()).unwrap_err();
        assert!(matches!(
            root_cause(&err).license_kind(),
            Some(LicenseErrorKind::UnmappableLicense(_))
        ));

        let config = AppConfig::builder().mapping("LicenseRef-ring", "openssl").build();
        let recipe = generate(&fx, &config).unwrap();
        assert!(recipe.contains("LICENSE+=\" openssl\"\n"));
    }

    #[test]
    fn run_generate_writes_into_directory() {
        let fx = fixture(Some("MIT"), &[("a", "1.0.0", Some("MIT"))]);
        let out_dir = fx.package.join("out");
        std::fs::create_dir_all(&out_dir).unwrap();

        run_generate(job(&fx, Some(out_dir.clone())), 2024).unwrap();
        let recipe = std::fs::read_to_string(out_dir.join("app-0.1.0.ebuild")).unwrap();
        assert!(recipe.contains("\ta-1.0.0\n"));
    }
}

// ============================================================================
// Failures
// ============================================================================

mod failures {
    use super::*;

    #[test]
    fn missing_license_aborts() {
        let fx = fixture(None, &[("a", "1.0.0", Some("MIT")), ("b", "1.0.0", None)]);
        let err = generate(&fx, &AppConfig::default()).unwrap_err();
        assert!(matches!(
            root_cause(&err).license_kind(),
            Some(LicenseErrorKind::MissingLicense(stem)) if stem == "b-1.0.0"
        ));
    }

    #[test]
    fn invalid_expression_aborts() {
        let fx = fixture(None, &[("a", "1.0.0", Some("MIT AND"))]);
        let err = generate(&fx, &AppConfig::default()).unwrap_err();
        assert!(matches!(
            root_cause(&err).license_kind(),
            Some(LicenseErrorKind::InvalidExpression { .. })
        ));
    }

    #[test]
    fn missing_archive_names_path() {
        let fx = fixture(None, &[("a", "1.0.0", Some("MIT"))]);
        std::fs::remove_file(fx.distdir.join("a-1.0.0.crate")).unwrap();
        let err = generate(&fx, &AppConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("a-1.0.0.crate"), "{err:#}");
    }

    #[test]
    fn tampered_archive_fails_checksum() {
        let fx = fixture(None, &[("a", "1.0.0", Some("MIT"))]);
        write_crate(&fx.distdir, "a", "1.0.0", Some("ISC"));

        let err = generate(&fx, &AppConfig::default()).unwrap_err();
        assert!(matches!(
            root_cause(&err).archive_kind(),
            Some(ArchiveErrorKind::ChecksumMismatch { .. })
        ));

        let config = AppConfig::builder().verify_checksums(false).build();
        let recipe = generate(&fx, &config).unwrap();
        assert!(recipe.contains("LICENSE+=\" ISC\"\n"));
    }

    #[test]
    fn unsupported_lock_version() {
        let fx = fixture(None, &[]);
        let lock = fx.package.join("Cargo.lock");
        let content = std::fs::read_to_string(&lock).unwrap();
        std::fs::write(&lock, content.replace("version = 3", "version = 4")).unwrap();

        let err = generate(&fx, &AppConfig::default()).unwrap_err();
        assert!(matches!(
            root_cause(&err),
            RecipeError::Parse {
                source: ParseErrorKind::LockVersionMismatch { found: 4, expected: 3 },
                ..
            }
        ));
    }

    #[test]
    fn git_dependency_aborts() {
        let fx = fixture(None, &[("a", "1.0.0", Some("MIT"))]);
        let lock = fx.package.join("Cargo.lock");
        let mut content = std::fs::read_to_string(&lock).unwrap();
        content.push_str(
            "\n[[package]]\nname = \"gitdep\"\nversion = \"0.3.0\"\nsource = \"git+https://example.com/gitdep.git#0123abc\"\n",
        );
        std::fs::write(&lock, content).unwrap();

        let err = generate(&fx, &AppConfig::default()).unwrap_err();
        assert!(matches!(
            root_cause(&err),
            RecipeError::Parse {
                source: ParseErrorKind::MissingChecksum { name, .. },
                ..
            } if name == "gitdep"
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let fx = fixture(None, &[]);
        let mut job = job(&fx, None);
        job.config = AppConfig::builder().line_width(5).build();
        assert!(run_generate(job, 2024).is_err());
    }
}

// ============================================================================
// Update
// ============================================================================

mod update {
    use super::*;

    const HAND_WRITTEN: &str = r#"# Copyright 2023 Gentoo Authors
# Distributed under the terms of the GNU General Public License v2

EAPI=8

CRATES="
	old-0.1.0
"

inherit cargo

DESCRIPTION="Hand maintained"
HOMEPAGE="https://example.org/app"
SRC_URI="$(cargo_crate_uris)"

LICENSE="MIT"
# Dependent crate licenses
LICENSE+=" BSD"
SLOT="0"
KEYWORDS="~amd64 ~arm64"

src_install() {
	cargo_src_install
}
"#;

    #[test]
    fn only_generated_regions_change() {
        let fx = fixture(Some("MIT"), &[("a", "1.0.0", Some("ISC")), ("b", "1.0.0", Some("MIT"))]);
        let inputs = read_package(&fx.package, &fx.distdir, &AppConfig::default(), true).unwrap();
        let patched = patch_recipe(HAND_WRITTEN, &inputs, &AppConfig::default()).unwrap();

        let expected = HAND_WRITTEN
            .replace("\told-0.1.0\n", "\ta-1.0.0\n\tb-1.0.0\n")
            .replace("LICENSE+=\" BSD\"", "LICENSE+=\" ISC MIT\"");
        assert_eq!(patched, expected);
    }

    #[test]
    fn update_in_place_is_idempotent() {
        let fx = fixture(Some("MIT"), &[("a", "1.0.0", Some("ISC"))]);
        let recipe = fx.package.join("app-0.1.0.ebuild");
        std::fs::write(&recipe, HAND_WRITTEN).unwrap();

        run_update(job(&fx, None), &recipe).unwrap();
        let first = std::fs::read_to_string(&recipe).unwrap();
        assert!(first.contains("src_install()"));
        assert!(first.contains("CRATES=\"\n\ta-1.0.0\n\"\n"));

        run_update(job(&fx, None), &recipe).unwrap();
        assert_eq!(std::fs::read_to_string(&recipe).unwrap(), first);
    }

    #[test]
    fn update_to_separate_output_keeps_input() {
        let fx = fixture(Some("MIT"), &[("a", "1.0.0", Some("ISC"))]);
        let input = fx.package.join("app-0.1.0.ebuild");
        let output = fx.package.join("app-0.1.1.ebuild");
        std::fs::write(&input, HAND_WRITTEN).unwrap();

        run_update(job(&fx, Some(output.clone())), &input).unwrap();
        assert_eq!(std::fs::read_to_string(&input).unwrap(), HAND_WRITTEN);
        assert!(std::fs::read_to_string(&output).unwrap().contains("LICENSE+=\" ISC\""));
    }

    #[test]
    fn recipe_without_marker_is_rejected() {
        let fx = fixture(Some("MIT"), &[("a", "1.0.0", Some("ISC"))]);
        let input = fx.package.join("app-0.1.0.ebuild");
        let broken = HAND_WRITTEN.replace("# Dependent crate licenses\n", "");
        std::fs::write(&input, &broken).unwrap();

        assert!(run_update(job(&fx, None), &input).is_err());
        assert_eq!(std::fs::read_to_string(&input).unwrap(), broken);
    }

    #[test]
    fn generated_recipe_round_trips_through_update() {
        let fx = fixture(Some("MIT OR Apache-2.0"), &[("a", "1.0.0", Some("Zlib"))]);
        let config = AppConfig::default();
        let recipe = generate(&fx, &config).unwrap();
        let inputs = read_package(&fx.package, &fx.distdir, &config, true).unwrap();
        assert_eq!(patch_recipe(&recipe, &inputs, &config).unwrap(), recipe);
    }
}
