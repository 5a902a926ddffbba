//! Fuzz target: filename validation.
//!
//! Verifies that the filename predicates never panic on arbitrary input
//! and never accept a string carrying a separator or parent reference.

#![no_main]

use libfuzzer_sys::fuzz_target;
use workbench_core::validate;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    if validate::file_name(s).is_ok() {
        assert!(!s.contains('/'), "accepted filename contains a separator");
        assert!(!s.contains('\\'), "accepted filename contains a separator");
        assert!(!s.contains(".."), "accepted filename contains a parent reference");
    }

    // The upload variant must be at least as strict.
    if validate::upload_filename(s).is_ok() {
        assert!(validate::file_name(s).is_ok());
    }
});
