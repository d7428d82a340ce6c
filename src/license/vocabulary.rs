//! Translation from SPDX identifiers to recipe license names.

use super::expression::{LicenseExpr, LicenseId};
use crate::error::{LicenseErrorKind, RecipeError, Result};
use std::collections::BTreeMap;

/// SPDX identifier to Gentoo license name.
const SPDX_TO_GENTOO: &[(&str, &str)] = &[
    ("0BSD", "0BSD"),
    ("AGPL-3.0", "AGPL-3"),
    ("AGPL-3.0-only", "AGPL-3"),
    ("AGPL-3.0-or-later", "AGPL-3+"),
    ("Apache-1.1", "Apache-1.1"),
    ("Apache-2.0", "Apache-2.0"),
    ("Artistic-2.0", "Artistic-2"),
    ("BSD-1-Clause", "BSD-1"),
    ("BSD-2-Clause", "BSD-2"),
    ("BSD-3-Clause", "BSD"),
    ("BSD-4-Clause", "BSD-4"),
    ("BSL-1.0", "Boost-1.0"),
    ("BlueOak-1.0.0", "BlueOak-1.0.0"),
    ("CC-BY-3.0", "CC-BY-3.0"),
    ("CC-BY-4.0", "CC-BY-4.0"),
    ("CC-BY-SA-4.0", "CC-BY-SA-4.0"),
    ("CC0-1.0", "CC0-1.0"),
    ("CDDL-1.0", "CDDL"),
    ("CDLA-Permissive-2.0", "CDLA-Permissive-2.0"),
    ("EPL-1.0", "EPL-1.0"),
    ("EPL-2.0", "EPL-2.0"),
    ("EUPL-1.2", "EUPL-1.2"),
    ("GPL-2.0", "GPL-2"),
    ("GPL-2.0-only", "GPL-2"),
    ("GPL-2.0-or-later", "GPL-2+"),
    ("GPL-3.0", "GPL-3"),
    ("GPL-3.0-only", "GPL-3"),
    ("GPL-3.0-or-later", "GPL-3+"),
    ("ISC", "ISC"),
    ("LGPL-2.0", "LGPL-2"),
    ("LGPL-2.0-only", "LGPL-2"),
    ("LGPL-2.0-or-later", "LGPL-2+"),
    ("LGPL-2.1", "LGPL-2.1"),
    ("LGPL-2.1-only", "LGPL-2.1"),
    ("LGPL-2.1-or-later", "LGPL-2.1+"),
    ("LGPL-3.0", "LGPL-3"),
    ("LGPL-3.0-only", "LGPL-3"),
    ("LGPL-3.0-or-later", "LGPL-3+"),
    ("MIT", "MIT"),
    ("MIT-0", "MIT-0"),
    ("MPL-1.1", "MPL-1.1"),
    ("MPL-2.0", "MPL-2.0"),
    ("NCSA", "UoI-NCSA"),
    ("OFL-1.1", "OFL-1.1"),
    ("OpenSSL", "openssl"),
    ("PSF-2.0", "PSF-2"),
    ("Python-2.0", "PSF-2"),
    ("Unicode-3.0", "Unicode-3.0"),
    ("Unicode-DFS-2016", "Unicode-DFS-2016"),
    ("Unlicense", "Unlicense"),
    ("WTFPL", "WTFPL-2"),
    ("X11", "X11"),
    ("Zlib", "ZLIB"),
    ("bzip2-1.0.6", "BZIP2"),
    ("curl", "curl"),
];

/// (SPDX license, SPDX exception) to Gentoo license name.
const SPDX_EXCEPTIONS_TO_GENTOO: &[(&str, &str, &str)] = &[
    ("Apache-2.0", "LLVM-exception", "Apache-2.0-with-LLVM-exceptions"),
    ("GPL-2.0", "Classpath-exception-2.0", "GPL-2-with-classpath-exception"),
    ("GPL-2.0-only", "Classpath-exception-2.0", "GPL-2-with-classpath-exception"),
    ("GPL-3.0-or-later", "GCC-exception-3.1", "GPL-3+-with-gcc-runtime-exception"),
];

/// A target-side license vocabulary.
pub trait LicenseVocabulary {
    /// Name for a plain license, `None` if it has no accepted equivalent.
    fn map_license(&self, license: &LicenseId) -> Option<String>;

    /// Name for a license with an exception applied.
    fn map_exception(&self, license: &LicenseId, exception: &str) -> Option<String>;
}

/// Gentoo `licenses/` names, with user overrides taking precedence.
///
/// Override keys are SPDX leaves as written in an expression, for example
/// `LicenseRef-ring` or `Apache-2.0 WITH LLVM-exception`.
#[derive(Debug, Clone, Default)]
pub struct GentooVocabulary {
    overrides: BTreeMap<String, String>,
}

impl GentooVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys that parse as SPDX leaves are stored in parsed form, so
    /// `GPL-2.0-or-later` and `GPL-2.0+` name the same override.
    pub fn with_overrides(overrides: BTreeMap<String, String>) -> Self {
        let overrides = overrides
            .into_iter()
            .map(|(key, name)| match LicenseExpr::parse(&key) {
                Ok(leaf) if leaf.is_leaf() => (leaf.to_string(), name),
                _ => (key, name),
            })
            .collect();
        Self { overrides }
    }

    fn builtin(id: &str) -> Option<&'static str> {
        SPDX_TO_GENTOO
            .iter()
            .find(|(spdx_id, _)| *spdx_id == id)
            .map(|(_, name)| *name)
    }
}

impl LicenseVocabulary for GentooVocabulary {
    fn map_license(&self, license: &LicenseId) -> Option<String> {
        if let Some(name) = self.overrides.get(&license.to_string()) {
            return Some(name.clone());
        }

        Self::builtin(&spdx_name(license)).map(str::to_string)
    }

    fn map_exception(&self, license: &LicenseId, exception: &str) -> Option<String> {
        if let Some(name) = self.overrides.get(&format!("{license} WITH {exception}")) {
            return Some(name.clone());
        }
        let id = spdx_name(license);
        SPDX_EXCEPTIONS_TO_GENTOO
            .iter()
            .find(|(spdx_id, exc, _)| *spdx_id == id && *exc == exception)
            .map(|(_, _, name)| (*name).to_string())
    }
}

/// Table key for a license: `or_later` selects the `-or-later` identifier,
/// so `GPL-2.0+` and `GPL-2.0-only+` both read as `GPL-2.0-or-later`. Other
/// licenses have no such identifier and stay unmapped.
fn spdx_name(license: &LicenseId) -> String {
    if license.or_later {
        let base = license.id.strip_suffix("-only").unwrap_or(&license.id);
        format!("{base}-or-later")
    } else {
        license.id.clone()
    }
}

/// A license expression in the target vocabulary, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedExpression {
    Name(String),
    /// Every operand is required; empty means no license at all
    AllOf(Vec<RenderedExpression>),
    /// Any one operand suffices
    AnyOf(Vec<RenderedExpression>),
}

impl RenderedExpression {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::AllOf(operands) if operands.is_empty())
    }
}

/// Map every leaf of `expr` into `vocabulary`.
///
/// Distinct SPDX identifiers can share a target name (`PSF-2.0` and
/// `Python-2.0`), so repeated names within one group are dropped.
pub fn translate(expr: &LicenseExpr, vocabulary: &dyn LicenseVocabulary) -> Result<RenderedExpression> {
    match expr {
        LicenseExpr::License(license) => vocabulary
            .map_license(license)
            .map(RenderedExpression::Name)
            .ok_or_else(|| unmappable(expr)),
        LicenseExpr::With(license, exception) => vocabulary
            .map_exception(license, exception)
            .map(RenderedExpression::Name)
            .ok_or_else(|| unmappable(expr)),
        LicenseExpr::And(operands) => {
            translate_group(operands, vocabulary, RenderedExpression::AllOf)
        }
        LicenseExpr::Or(operands) => {
            translate_group(operands, vocabulary, RenderedExpression::AnyOf)
        }
    }
}

fn translate_group(
    operands: &[LicenseExpr],
    vocabulary: &dyn LicenseVocabulary,
    make: fn(Vec<RenderedExpression>) -> RenderedExpression,
) -> Result<RenderedExpression> {
    let mut translated: Vec<RenderedExpression> = Vec::with_capacity(operands.len());
    for operand in operands {
        let item = translate(operand, vocabulary)?;
        if !translated.contains(&item) {
            translated.push(item);
        }
    }

    if translated.len() == 1 {
        return Ok(translated.remove(0));
    }
    Ok(make(translated))
}

fn unmappable(expr: &LicenseExpr) -> RecipeError {
    RecipeError::license(
        "translating license",
        LicenseErrorKind::UnmappableLicense(expr.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::combine_and;

    fn name(s: &str) -> RenderedExpression {
        RenderedExpression::Name(s.to_string())
    }

    fn translate_str(s: &str) -> Result<RenderedExpression> {
        translate(&LicenseExpr::parse(s)?, &GentooVocabulary::new())
    }

    #[test]
    fn test_builtin_names() {
        assert_eq!(translate_str("MIT").unwrap(), name("MIT"));
        assert_eq!(translate_str("BSD-3-Clause").unwrap(), name("BSD"));
        assert_eq!(translate_str("Zlib").unwrap(), name("ZLIB"));
        assert_eq!(translate_str("BSL-1.0").unwrap(), name("Boost-1.0"));
        assert_eq!(translate_str("GPL-2.0-or-later").unwrap(), name("GPL-2+"));
    }

    #[test]
    fn test_gnu_plus_suffix() {
        assert_eq!(translate_str("GPL-2.0+").unwrap(), name("GPL-2+"));
        assert_eq!(translate_str("GPL-2.0-only").unwrap(), name("GPL-2"));
        assert_eq!(translate_str("LGPL-2.1+").unwrap(), name("LGPL-2.1+"));
        assert_eq!(
            translate_str("GPL-2.0+ OR GPL-2.0-or-later").unwrap(),
            name("GPL-2+")
        );
    }

    #[test]
    fn test_or_later_exception() {
        assert_eq!(
            translate_str("GPL-3.0-or-later WITH GCC-exception-3.1").unwrap(),
            name("GPL-3+-with-gcc-runtime-exception")
        );
        assert_eq!(
            translate_str("GPL-2.0-only WITH Classpath-exception-2.0").unwrap(),
            name("GPL-2-with-classpath-exception")
        );
    }

    #[test]
    fn test_override_key_spellings() {
        let overrides = BTreeMap::from([("GPL-2.0-or-later".to_string(), "GPL-2-custom".to_string())]);
        let vocab = GentooVocabulary::with_overrides(overrides);
        let expr = LicenseExpr::parse("GPL-2.0+").unwrap();
        assert_eq!(translate(&expr, &vocab).unwrap(), name("GPL-2-custom"));
    }

    #[test]
    fn test_or_later_operator() {
        let vocab = GentooVocabulary::new();
        let gpl = LicenseId {
            id: "GPL-2.0-only".to_string(),
            or_later: true,
        };
        assert_eq!(vocab.map_license(&gpl).as_deref(), Some("GPL-2+"));

        let mit = LicenseId {
            id: "MIT".to_string(),
            or_later: true,
        };
        assert_eq!(vocab.map_license(&mit), None);
    }

    #[test]
    fn test_exception() {
        assert_eq!(
            translate_str("Apache-2.0 WITH LLVM-exception").unwrap(),
            name("Apache-2.0-with-LLVM-exceptions")
        );
    }

    #[test]
    fn test_structure_is_preserved() {
        assert_eq!(
            translate_str("MIT AND (Apache-2.0 OR Zlib)").unwrap(),
            RenderedExpression::AllOf(vec![
                name("MIT"),
                RenderedExpression::AnyOf(vec![name("Apache-2.0"), name("ZLIB")]),
            ])
        );
    }

    #[test]
    fn test_duplicate_target_names_collapse() {
        let overrides = BTreeMap::from([("MIT-0".to_string(), "MIT".to_string())]);
        let vocab = GentooVocabulary::with_overrides(overrides);
        let expr = LicenseExpr::parse("MIT OR MIT-0").unwrap();
        assert_eq!(translate(&expr, &vocab).unwrap(), name("MIT"));
    }

    #[test]
    fn test_unmappable() {
        let err = translate_str("LicenseRef-Proprietary").unwrap_err();
        assert!(matches!(
            err.license_kind(),
            Some(LicenseErrorKind::UnmappableLicense(id)) if id == "LicenseRef-Proprietary"
        ));

        let err = translate_str("MIT AND LicenseRef-Proprietary").unwrap_err();
        assert!(matches!(
            err.license_kind(),
            Some(LicenseErrorKind::UnmappableLicense(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let overrides = BTreeMap::from([
            ("LicenseRef-ring".to_string(), "openssl".to_string()),
            ("MIT".to_string(), "MIT-custom".to_string()),
        ]);
        let vocab = GentooVocabulary::with_overrides(overrides);
        let expr = LicenseExpr::parse("LicenseRef-ring AND MIT").unwrap();
        assert_eq!(
            translate(&expr, &vocab).unwrap(),
            RenderedExpression::AllOf(vec![name("openssl"), name("MIT-custom")])
        );
    }

    #[test]
    fn test_empty_stays_empty() {
        let rendered = translate(&combine_and(Vec::new()), &GentooVocabulary::new()).unwrap();
        assert!(rendered.is_empty());
    }
}
