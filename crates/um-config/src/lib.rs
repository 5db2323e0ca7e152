//! Umbrella inference configuration types and validation.
//!
//! This crate provides:
//! - Typed Rust structs for the model parameter file (model.json / model.toml)
//! - Sampling run configuration (sample counts, weighting mode, seed)
//! - Config path resolution (CLI → env → XDG → defaults)
//! - Semantic validation

pub mod model;
pub mod resolve;
pub mod sampling;
pub mod validate;

pub use model::{BernoulliRow, EmissionTable, ModelParams, TransitionTable};
pub use resolve::{resolve_model_path, ConfigSource, ModelPath};
pub use sampling::{SamplingConfig, WeightingMode};
pub use validate::{ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
