//! Fuzz target: workspace identifier parsing.
//!
//! Verifies that `WorkspaceId::parse` never panics and that anything it
//! accepts round-trips to the identical canonical string.

#![no_main]

use libfuzzer_sys::fuzz_target;
use workbench_core::WorkspaceId;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(id) = WorkspaceId::parse(s) {
        let rendered = id.to_string();
        assert_eq!(
            rendered.to_lowercase(),
            s.to_lowercase(),
            "accepted identifier must round-trip"
        );
        assert_eq!(rendered.len(), 36);
    }
});
