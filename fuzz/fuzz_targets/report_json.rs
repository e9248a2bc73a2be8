#![no_main]

//! Fuzz target for report and result JSON parsing.
//!
//! Issue reports and validation results travel across process boundaries,
//! so their deserializers see untrusted bytes.

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let _ = serde_json::from_str::<packwatch_types::IssueReport>(s);
    let _ = serde_json::from_str::<packwatch_types::ValidationResult>(s);
    let _ = serde_json::from_str::<packwatch_types::Commit>(s);
    let _ = serde_json::from_str::<packwatch_types::PatchFile>(s);

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(s) {
        let _ = serde_json::from_value::<packwatch_types::IssueReport>(value);
    }
});
