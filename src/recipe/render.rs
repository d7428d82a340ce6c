//! Rendering of generated variable values.
//!
//! Values are returned without the surrounding `NAME="` and `"` so the same
//! strings serve fresh recipes and in-place patches.

use crate::cargo::PackageMetadata;
use crate::error::{ErrorContext, Result};
use crate::license::{combine_and, translate, LicenseExpr, LicenseVocabulary, RenderedExpression};
use std::collections::BTreeMap;

/// Assignment prefix of the package's own license.
pub const PACKAGE_LICENSE_PREFIX: &str = "LICENSE=\"";

/// Assignment prefix of the crate license addition, including the
/// separating space a single-line value needs.
pub const CRATE_LICENSE_PREFIX: &str = "LICENSE+=\" ";

/// Width assumed for a tab when measuring line length.
const TAB_WIDTH: usize = 8;

/// Layout settings for multi-line values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderStyle {
    /// Longest line, in columns, before a value is split over lines
    pub line_width: usize,
    /// Indentation unit for continuation lines
    pub indent: String,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            line_width: 72,
            indent: "\t".to_string(),
        }
    }
}

impl RenderStyle {
    fn indent(&self, depth: usize) -> String {
        self.indent.repeat(depth)
    }

    fn columns(s: &str) -> usize {
        s.chars().map(|c| if c == '\t' { TAB_WIDTH } else { 1 }).sum()
    }

    fn fits(&self, line: &str) -> bool {
        Self::columns(line) <= self.line_width
    }
}

/// Render the `CRATES` value: one indented name per line, wrapped in
/// newlines, or empty when there are no crates.
pub fn render_name_list<S: AsRef<str>>(names: &[S], style: &RenderStyle) -> String {
    if names.is_empty() {
        return String::new();
    }
    let mut out = String::from("\n");
    for name in names {
        out.push_str(&style.indent);
        out.push_str(name.as_ref());
        out.push('\n');
    }
    out
}

/// Serialize on one line. Top-level operands of an all-of are simply
/// juxtaposed; nested groups are parenthesized.
fn flat(expr: &RenderedExpression, top: bool) -> String {
    match expr {
        RenderedExpression::Name(name) => name.clone(),
        RenderedExpression::AllOf(operands) => {
            let inner = join_flat(operands);
            if top {
                inner
            } else {
                format!("( {inner} )")
            }
        }
        RenderedExpression::AnyOf(operands) => format!("|| ( {} )", join_flat(operands)),
    }
}

fn join_flat(operands: &[RenderedExpression]) -> String {
    operands
        .iter()
        .map(|o| flat(o, false))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render a license value for an assignment starting with `prefix`.
///
/// Values that fit on the assignment line are returned as is. Longer ones
/// become a block: plain names share the first indented line(s), and every
/// group gets its own line, opened one operand per line if it is still too
/// long.
pub fn render_license(expr: &RenderedExpression, prefix: &str, style: &RenderStyle) -> String {
    if expr.is_empty() {
        return String::new();
    }

    let single = flat(expr, true);
    if style.fits(&format!("{prefix}{single}\"")) {
        return single;
    }

    let operands: Vec<&RenderedExpression> = match expr {
        RenderedExpression::AllOf(operands) => operands.iter().collect(),
        other => vec![other],
    };

    let mut out = String::from("\n");
    let names: Vec<&str> = operands
        .iter()
        .filter_map(|o| match o {
            RenderedExpression::Name(name) => Some(name.as_str()),
            _ => None,
        })
        .collect();
    push_wrapped_names(&mut out, &names, 1, style);

    for operand in operands {
        if !matches!(operand, RenderedExpression::Name(_)) {
            push_group(&mut out, operand, 1, style);
        }
    }
    out
}

fn push_wrapped_names(out: &mut String, names: &[&str], depth: usize, style: &RenderStyle) {
    let indent = style.indent(depth);
    let mut line = String::new();
    for name in names {
        if !line.is_empty() && !style.fits(&format!("{indent}{line} {name}")) {
            out.push_str(&format!("{indent}{line}\n"));
            line.clear();
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(name);
    }
    if !line.is_empty() {
        out.push_str(&format!("{indent}{line}\n"));
    }
}

fn push_group(out: &mut String, expr: &RenderedExpression, depth: usize, style: &RenderStyle) {
    let indent = style.indent(depth);
    let line = format!("{indent}{}", flat(expr, false));
    let (open, operands) = match expr {
        RenderedExpression::AnyOf(operands) if !style.fits(&line) => ("|| (", operands),
        RenderedExpression::AllOf(operands) if !style.fits(&line) => ("(", operands),
        _ => {
            out.push_str(&line);
            out.push('\n');
            return;
        }
    };

    out.push_str(&format!("{indent}{open}\n"));
    for operand in operands {
        push_group(out, operand, depth + 1, style);
    }
    out.push_str(&format!("{indent})\n"));
}

/// Value of the crate `LICENSE+=` assignment.
///
/// A single-line value is preceded by a space so that the assignment
/// appends to the package license as a separate token.
pub fn crate_license_value(expr: &RenderedExpression, style: &RenderStyle) -> String {
    let value = render_license(expr, CRATE_LICENSE_PREFIX, style);
    if value.is_empty() || value.starts_with('\n') {
        value
    } else {
        format!(" {value}")
    }
}

/// Combine, simplify and translate per-crate licenses into the crate
/// `LICENSE+=` value.
pub fn render_crate_licenses(
    licenses: &BTreeMap<String, LicenseExpr>,
    vocabulary: &dyn LicenseVocabulary,
    style: &RenderStyle,
) -> Result<String> {
    let combined = combine_and(licenses.values().cloned()).simplify();
    tracing::debug!("Combined crate license: {}", combined);

    let rendered = translate(&combined, vocabulary).with_context(|| {
        let crates: Vec<&str> = licenses
            .iter()
            .filter(|(_, expr)| translate(expr, vocabulary).is_err())
            .map(|(name, _)| name.as_str())
            .collect();
        format!("declared by {}", crates.join(", "))
    })?;
    Ok(crate_license_value(&rendered, style))
}

/// Value of the package's own `LICENSE=` assignment, empty if the manifest
/// declares none.
pub fn package_license_value(
    metadata: &PackageMetadata,
    vocabulary: &dyn LicenseVocabulary,
    style: &RenderStyle,
) -> Result<String> {
    let Some(license) = metadata.license.as_deref() else {
        return Ok(String::new());
    };
    let expr = LicenseExpr::parse(license).with_context(|| format!("package {}", metadata.name))?;
    let rendered = translate(&expr, vocabulary).with_context(|| format!("package {}", metadata.name))?;
    Ok(render_license(&rendered, PACKAGE_LICENSE_PREFIX, style))
}
