#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz region discovery and splicing on arbitrary recipes.
///
/// A successful update followed by writing back the old values must restore
/// the input byte for byte.
fuzz_target!(|data: &[u8]| {
    if let Ok(doc) = std::str::from_utf8(data) {
        let Ok(scanned) = crate_recipe::recipe::Patcher::new().scan(doc) else {
            return;
        };
        let Ok(validated) = scanned.validate() else {
            return;
        };
        let restored = validated.splice(validated.crates_value(), validated.license_value());
        assert_eq!(restored, doc);
    }
});
