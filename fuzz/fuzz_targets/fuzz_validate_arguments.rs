//! Fuzz target: argument list validation.
//!
//! Verifies that the argument predicate never panics and never accepts
//! an element carrying a shell metacharacter or an escaping path.

#![no_main]

use libfuzzer_sys::fuzz_target;
use workbench_core::validate;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let args: Vec<String> = s.split('\u{1f}').map(str::to_owned).collect();

    if validate::arguments(&args).is_ok() {
        for arg in &args {
            assert!(
                !arg.chars().any(|c| [';', '&', '|', '`', '$', '\n', '\r'].contains(&c)),
                "accepted argument contains a metacharacter"
            );
            assert!(!arg.starts_with('/'), "accepted argument is an absolute path");
            assert!(!arg.contains(".."), "accepted argument escapes the workspace");
        }
    }
});
