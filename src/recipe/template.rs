//! Fresh recipe template.

use super::MARKER_COMMENT;

/// Values substituted into a fresh recipe.
///
/// `crates`, `package_license` and `crate_licenses` are already rendered
/// values; `description` and `homepage` are raw and get escaped here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeInputs {
    pub year: i32,
    pub description: String,
    pub homepage: String,
    pub crates: String,
    pub package_license: String,
    pub crate_licenses: String,
    pub keywords: String,
}

/// Escape a value for a double-quoted shell string.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Collapse a possibly multi-line manifest description onto one line.
fn one_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render a complete recipe.
pub fn render_recipe(inputs: &RecipeInputs) -> String {
    format!(
        r#"# Copyright {year} Gentoo Authors
# Distributed under the terms of the GNU General Public License v2

# Autogenerated by crate-recipe {version}

EAPI=8

CRATES="{crates}"

inherit cargo

DESCRIPTION="{description}"
HOMEPAGE="{homepage}"
SRC_URI="
	$(cargo_crate_uris)
"

LICENSE="{package_license}"
{marker}
LICENSE+="{crate_licenses}"
SLOT="0"
KEYWORDS="{keywords}"
"#,
        year = inputs.year,
        version = env!("CARGO_PKG_VERSION"),
        crates = inputs.crates,
        description = escape(&one_line(&inputs.description)),
        homepage = escape(&inputs.homepage),
        package_license = inputs.package_license,
        marker = MARKER_COMMENT,
        crate_licenses = inputs.crate_licenses,
        keywords = inputs.keywords,
    )
}
