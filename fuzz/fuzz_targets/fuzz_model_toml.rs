//! Fuzz target for model.toml parsing and validation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use um_config::validate::validate_model;
use um_config::ModelParams;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(model) = toml::from_str::<ModelParams>(text) {
        let _ = validate_model(&model);
    }
});
