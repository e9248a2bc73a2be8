#![no_main]

//! Fuzz target for repository locator parsing.

use libfuzzer_sys::fuzz_target;
use packwatch_types::RepoLocator;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // Accepting or rejecting is fine; panicking is not. Accepted locators
    // must carry both halves of the slug.
    if let Some(locator) = RepoLocator::parse(s) {
        assert!(!locator.owner.is_empty());
        assert!(!locator.repo.is_empty());
        assert_eq!(locator.slug(), format!("{}/{}", locator.owner, locator.repo));
    }
});
