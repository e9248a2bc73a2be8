#![no_main]

//! Fuzz target for diff header parsing.
//!
//! Feeds arbitrary bytes through `extract_diff_paths` to make sure hostile
//! patch content can never panic the parser, and checks the output
//! invariants the matcher relies on.

use libfuzzer_sys::fuzz_target;
use packwatch_patch::extract_diff_paths;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // Must never panic; Ok output must be usable as-is by the matcher.
    if let Ok(paths) = extract_diff_paths(s, "fuzz.patch") {
        assert!(!paths.is_empty());
        for path in &paths {
            assert!(!path.is_empty());
        }
        let mut sorted = paths.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(paths.len(), sorted.len());
    }
});
