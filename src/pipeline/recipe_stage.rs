//! Rendering fresh recipes and patching existing ones.

use super::collect_stage::PackageInputs;
use crate::config::AppConfig;
use crate::recipe::{
    package_license_value, render_crate_licenses, render_name_list, render_recipe, update_recipe,
    RecipeInputs,
};
use anyhow::{Context, Result};

/// The two generated values shared by fresh and patched recipes.
struct GeneratedValues {
    crates: String,
    crate_licenses: String,
}

fn generated_values(inputs: &PackageInputs, config: &AppConfig) -> Result<GeneratedValues> {
    let style = config.render_style();
    let vocabulary = config.vocabulary();

    let crates = render_name_list(&inputs.crate_stems(), &style);
    let crate_licenses = render_crate_licenses(&inputs.licenses, &vocabulary, &style)
        .context("Failed to render crate licenses")?;

    Ok(GeneratedValues {
        crates,
        crate_licenses,
    })
}

/// Render a complete recipe for `inputs`.
pub fn generate_recipe(inputs: &PackageInputs, config: &AppConfig, year: i32) -> Result<String> {
    let values = generated_values(inputs, config)?;
    let package_license =
        package_license_value(&inputs.metadata, &config.vocabulary(), &config.render_style())
            .context("Failed to render package license")?;

    Ok(render_recipe(&RecipeInputs {
        year,
        description: inputs.metadata.description.clone().unwrap_or_default(),
        homepage: inputs.metadata.homepage.clone().unwrap_or_default(),
        crates: values.crates,
        package_license,
        crate_licenses: values.crate_licenses,
        keywords: config.recipe.keywords.clone(),
    }))
}

/// Patch the generated regions of an existing recipe for `inputs`.
pub fn patch_recipe(existing: &str, inputs: &PackageInputs, config: &AppConfig) -> Result<String> {
    let values = generated_values(inputs, config)?;
    let patched = update_recipe(existing, &values.crates, &values.crate_licenses)
        .context("Failed to update recipe")?;
    if patched == existing {
        tracing::debug!("Recipe already up to date");
    }
    Ok(patched)
}

/// Recipe file name for a package, `<name>-<version>.ebuild`.
#[must_use]
pub fn recipe_file_name(inputs: &PackageInputs) -> String {
    format!(
        "{}-{}.ebuild",
        inputs.metadata.name, inputs.metadata.version
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cargo::{Crate, PackageMetadata};
    use crate::license::LicenseExpr;
    use std::collections::BTreeMap;

    fn inputs() -> PackageInputs {
        PackageInputs {
            metadata: PackageMetadata {
                name: "app".to_string(),
                version: "0.1.0".to_string(),
                license: Some("MIT".to_string()),
                description: Some("An app".to_string()),
                homepage: Some("https://example.org".to_string()),
            },
            crates: vec![
                Crate {
                    name: "a".to_string(),
                    version: "1.0.0".to_string(),
                    checksum: None,
                },
                Crate {
                    name: "b".to_string(),
                    version: "2.0.0".to_string(),
                    checksum: None,
                },
            ],
            licenses: BTreeMap::from([
                ("a-1.0.0".to_string(), LicenseExpr::parse("MIT").unwrap()),
                (
                    "b-2.0.0".to_string(),
                    LicenseExpr::parse("MIT OR Apache-2.0").unwrap(),
                ),
            ]),
        }
    }

    #[test]
    fn test_generate_recipe() {
        let recipe = generate_recipe(&inputs(), &AppConfig::default(), 2024).unwrap();
        assert!(recipe.contains("CRATES=\"\n\ta-1.0.0\n\tb-2.0.0\n\"\n"));
        assert!(recipe.contains("LICENSE=\"MIT\"\n# Dependent crate licenses\nLICENSE+=\" MIT\"\n"));
        assert!(recipe.contains("DESCRIPTION=\"An app\""));
        assert_eq!(recipe_file_name(&inputs()), "app-0.1.0.ebuild");
    }

    #[test]
    fn test_patch_recipe_is_idempotent() {
        let config = AppConfig::default();
        let recipe = generate_recipe(&inputs(), &config, 2024).unwrap();
        assert_eq!(patch_recipe(&recipe, &inputs(), &config).unwrap(), recipe);
    }

    #[test]
    fn test_patch_recipe_keeps_hand_edits() {
        let config = AppConfig::default();
        let recipe = generate_recipe(&inputs(), &config, 2024)
            .unwrap()
            .replace("SLOT=\"0\"", "SLOT=\"0\"\nRESTRICT=\"test\"");

        let mut updated = inputs();
        updated.crates.pop();
        updated.licenses.remove("b-2.0.0");
        let patched = patch_recipe(&recipe, &updated, &config).unwrap();

        assert!(patched.contains("CRATES=\"\n\ta-1.0.0\n\"\n"));
        assert!(patched.contains("RESTRICT=\"test\""));
    }
}
