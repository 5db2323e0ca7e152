//! Fuzz target for model.json parsing and validation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use um_config::validate::validate_model;
use um_config::ModelParams;

fuzz_target!(|data: &[u8]| {
    // Parse and validation may fail, never panic
    if let Ok(model) = serde_json::from_slice::<ModelParams>(data) {
        let _ = validate_model(&model);
    }
});
