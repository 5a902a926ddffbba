//! Fuzz target: upload request body handling.
//!
//! Feeds arbitrary bytes through the JSON parser and the base64 decoder
//! used by the upload endpoint. Errors are expected; panics are not.

#![no_main]

use base64::Engine as _;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = serde_json::from_slice::<serde_json::Value>(data);
    let _ = base64::engine::general_purpose::STANDARD.decode(data);
});
