#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz license expression parsing and simplification.
///
/// Anything that parses must simplify to an equivalent expression and
/// survive a display/parse round trip.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let normalized = crate_recipe::license::normalize(s);
        if let Ok(expr) = crate_recipe::license::LicenseExpr::parse(&normalized) {
            let simplified = expr.simplify();
            assert!(expr.is_equivalent(&simplified));
            let _ = crate_recipe::license::LicenseExpr::parse(&expr.to_string());
        }
    }
});
