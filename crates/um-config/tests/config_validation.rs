//! Integration tests for model/sampling config parsing, validation and lookup.

use std::fs;

use um_config::resolve::find_model_file;
use um_config::validate::{validate_model, validate_sampling};
use um_config::{ModelParams, SamplingConfig, ValidationError, WeightingMode};

const SAMPLE_MODEL: &str = r#"{
    "schema_version": "1.0.0",
    "description": "sticky weather",
    "initial": { "p_true": 0.5, "p_false": 0.5 },
    "transition": {
        "from_true":  { "p_true": 0.95, "p_false": 0.05, "_comment": "rain persists" },
        "from_false": { "p_true": 0.05, "p_false": 0.95 }
    },
    "emission": {
        "given_true":  { "p_true": 0.9, "p_false": 0.1 },
        "given_false": { "p_true": 0.2, "p_false": 0.8 }
    }
}"#;

#[test]
fn parses_and_validates_custom_model() {
    let model: ModelParams = serde_json::from_str(SAMPLE_MODEL).expect("parse model");
    validate_model(&model).expect("valid model");
    assert_eq!(model.description.as_deref(), Some("sticky weather"));
    assert_eq!(model.transition(true, true), 0.95);
    assert_eq!(model.initial(false), 0.5);
}

#[test]
fn default_model_serializes_and_reloads() {
    let model = ModelParams::default();
    let json = serde_json::to_string_pretty(&model).expect("serialize");
    let back: ModelParams = serde_json::from_str(&json).expect("reparse");
    assert_eq!(back, model);
}

#[test]
fn missing_table_is_a_parse_error() {
    let json = r#"{ "schema_version": "1.0.0", "initial": { "p_true": 0.2, "p_false": 0.8 } }"#;
    let err = serde_json::from_str::<ModelParams>(json).unwrap_err();
    assert!(err.to_string().contains("transition"), "{err}");
}

#[test]
fn row_that_does_not_sum_to_one_is_rejected() {
    let bad = SAMPLE_MODEL.replace(r#""p_true": 0.9, "p_false": 0.1"#, r#""p_true": 0.9, "p_false": 0.2"#);
    let model: ModelParams = serde_json::from_str(&bad).expect("parse model");
    match validate_model(&model) {
        Err(ValidationError::InvalidValue { field, .. }) => {
            assert_eq!(field, "emission.given_true");
        }
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}

#[test]
fn sampling_config_from_json() {
    let cfg: SamplingConfig = serde_json::from_str(
        r#"{ "likelihood_samples": 500, "gibbs_samples": 800, "gibbs_burn_in": 100,
             "weighting": "first_seen", "seed": 42 }"#,
    )
    .expect("parse sampling");
    validate_sampling(&cfg).expect("valid sampling");
    assert_eq!(cfg.weighting, WeightingMode::FirstSeen);
    assert_eq!(cfg.seed, Some(42));
}

#[test]
fn find_model_file_prefers_json_over_toml() {
    let dir = tempfile::tempdir().expect("tempdir");
    assert!(find_model_file(dir.path()).is_none());

    fs::write(dir.path().join("model.toml"), "").expect("write toml");
    assert_eq!(
        find_model_file(dir.path()),
        Some(dir.path().join("model.toml"))
    );

    fs::write(dir.path().join("model.json"), "{}").expect("write json");
    assert_eq!(
        find_model_file(dir.path()),
        Some(dir.path().join("model.json"))
    );
}
