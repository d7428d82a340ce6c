//! In-place update of the generated regions of an existing recipe.
//!
//! The document moves through three states: [`Patcher::scan`] locates the
//! `CRATES` and crate `LICENSE+=` regions, [`Scanned::validate`] checks that
//! they do not overlap, and [`Validated::splice`] builds the new document.
//! Only the captured values change; every other byte is carried over.

use super::region::{Region, RegionMatcher};
use super::MARKER_COMMENT;
use crate::error::{PatchErrorKind, RecipeError, Result};
use regex::Regex;
use std::sync::LazyLock;

static CRATES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?ms)^CRATES="(.*?)"$"#).expect("static regex"));

static CRATE_LICENSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"(?ms)^{}\nLICENSE\+="(.*?)"$"#,
        regex::escape(MARKER_COMMENT)
    ))
    .expect("static regex")
});

/// Region name of the crate list.
pub const CRATES_REGION: &str = "CRATES";

/// Region name of the crate license addition.
pub const CRATE_LICENSE_REGION: &str = "crate LICENSE+=";

/// Locates the generated regions of a recipe.
#[derive(Debug, Clone)]
pub struct Patcher {
    crates: RegionMatcher,
    license: RegionMatcher,
}

impl Default for Patcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Patcher {
    pub fn new() -> Self {
        Self {
            crates: RegionMatcher::new(CRATES_REGION, &CRATES_RE),
            license: RegionMatcher::new(CRATE_LICENSE_REGION, &CRATE_LICENSE_RE),
        }
    }

    /// Find exactly one of each region in `doc`.
    pub fn scan<'d>(&self, doc: &'d str) -> Result<Scanned<'d>> {
        let crates = self.crates.find_unique(doc)?;
        let license = self.license.find_unique(doc)?;
        tracing::debug!(
            "Found {} at {:?} and {} at {:?}",
            crates.name,
            crates.span,
            license.name,
            license.span
        );
        Ok(Scanned {
            doc,
            crates,
            license,
        })
    }
}

/// Both regions located, not yet checked against each other.
#[derive(Debug, Clone)]
pub struct Scanned<'d> {
    doc: &'d str,
    crates: Region,
    license: Region,
}

impl<'d> Scanned<'d> {
    pub fn crates(&self) -> &Region {
        &self.crates
    }

    pub fn license(&self) -> &Region {
        &self.license
    }

    /// Reject documents whose regions share any text.
    ///
    /// Whole matches are compared, delimiters and the marker comment
    /// included, so the check holds whichever region comes first.
    pub fn validate(self) -> Result<Validated<'d>> {
        if self.crates.span.overlaps(&self.license.span) {
            let (first, second) = if self.crates.span.start <= self.license.span.start {
                (&self.crates, &self.license)
            } else {
                (&self.license, &self.crates)
            };
            return Err(RecipeError::patch(
                "validating recipe",
                PatchErrorKind::OverlappingRegions {
                    first: first.name.to_string(),
                    second: second.name.to_string(),
                },
            ));
        }

        Ok(Validated {
            doc: self.doc,
            crates: self.crates,
            license: self.license,
        })
    }
}

/// Regions located and known to be disjoint.
#[derive(Debug, Clone)]
pub struct Validated<'d> {
    doc: &'d str,
    crates: Region,
    license: Region,
}

impl Validated<'_> {
    /// Current `CRATES` value.
    pub fn crates_value(&self) -> &str {
        self.crates.value_in(self.doc)
    }

    /// Current crate `LICENSE+=` value.
    pub fn license_value(&self) -> &str {
        self.license.value_in(self.doc)
    }

    /// Build the patched document.
    ///
    /// Regions are spliced in document order, each receiving its own new
    /// value.
    pub fn splice(&self, crates_value: &str, license_value: &str) -> String {
        let mut edits = [
            (&self.crates, crates_value),
            (&self.license, license_value),
        ];
        edits.sort_by_key(|(region, _)| region.value.start);

        let mut out = String::with_capacity(self.doc.len() + crates_value.len() + license_value.len());
        let mut cursor = 0;
        for (region, value) in edits {
            out.push_str(&self.doc[cursor..region.value.start]);
            out.push_str(value);
            cursor = region.value.end;
        }
        out.push_str(&self.doc[cursor..]);
        out
    }
}

/// Replace the `CRATES` and crate `LICENSE+=` values of `doc`.
pub fn update_recipe(doc: &str, crates_value: &str, license_value: &str) -> Result<String> {
    let validated = Patcher::new().scan(doc)?.validate()?;
    Ok(validated.splice(crates_value, license_value))
}
