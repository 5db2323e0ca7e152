//! Fuzz target for observation sequence parsing.
//!
//! Any text either yields a chain whose symbols round-trip, or an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use um_core::observations::{parse_observations, strip_whitespace};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(chain) = parse_observations(text) {
        assert_eq!(chain.to_symbols(), strip_whitespace(text));
    }
});
