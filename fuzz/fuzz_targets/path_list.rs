#![no_main]

//! Fuzz target for plain-text path list parsing.

use libfuzzer_sys::fuzz_target;
use packwatch_patch::parse_path_list;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(paths) = parse_path_list(s, "fuzz.txt") {
        assert!(!paths.is_empty());
        for path in &paths {
            assert!(!path.is_empty());
            assert!(!path.starts_with('#'));
            assert_eq!(path.trim(), path);
        }
    }
});
