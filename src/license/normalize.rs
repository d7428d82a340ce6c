//! Legacy Cargo license syntax.

/// Convert a deprecated Cargo license string (`MIT/Apache-2.0`) to SPDX
/// syntax (`MIT OR Apache-2.0`).
///
/// Purely textual: every `/` becomes ` OR `. Input that is already SPDX
/// passes through unchanged.
pub fn normalize(license: &str) -> String {
    license.replace('/', " OR ")
}
