//! Configuration loading and validation for um-core.
//!
//! This module handles:
//! - Loading the model parameter file (JSON or TOML, by extension)
//! - Loading an optional sampling configuration file
//! - Model file resolution (CLI > env > XDG > system > defaults)
//! - Semantic validation of both
//! - A provenance snapshot (path, source, SHA-256) for reports

pub use um_config::resolve::{resolve_model_path, ConfigSource, ModelPath};
pub use um_config::validate::ValidationError;
pub use um_config::{ModelParams, SamplingConfig, WeightingMode};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;
use um_config::validate::{validate_model, validate_sampling};

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in config file {path}: {source}")]
    JsonError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid TOML in config file {path}: {source}")]
    TomlError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid model parameters: {0}")]
    InvalidModel(#[source] ValidationError),

    #[error("Invalid sampling configuration: {0}")]
    InvalidSampling(#[source] ValidationError),

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ConfigError> for um_common::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidModel(_) => um_common::Error::InvalidModel(err.to_string()),
            ConfigError::InvalidSampling(_) => um_common::Error::InvalidSampling(err.to_string()),
            _ => um_common::Error::Config(err.to_string()),
        }
    }
}

/// Configuration resolution options.
#[derive(Debug, Default, Clone)]
pub struct ConfigOptions {
    /// Explicit model file path (highest priority).
    pub model_path: Option<PathBuf>,
    /// Optional sampling configuration file.
    pub sampling_path: Option<PathBuf>,
}

/// Resolved configuration with provenance information.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The loaded model parameters.
    pub model: ModelParams,
    /// Path to the model file (None if using defaults).
    pub model_path: Option<PathBuf>,
    /// SHA-256 of the model file content (None if using defaults).
    pub model_hash: Option<String>,
    /// Where the model file was found.
    pub model_source: ConfigSource,

    /// Sampling configuration before CLI overrides.
    pub sampling: SamplingConfig,
    pub sampling_path: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Provenance snapshot for reports.
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            model_path: self.model_path.clone(),
            model_hash: self.model_hash.clone(),
            model_source: self.model_source.to_string(),
            schema_version: self.model.schema_version.clone(),
            sampling_path: self.sampling_path.clone(),
        }
    }
}

/// Config snapshot embedded in reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub model_path: Option<PathBuf>,
    pub model_hash: Option<String>,
    pub model_source: String,
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampling_path: Option<PathBuf>,
}

/// Validate sampling settings after command-line overrides were applied.
pub fn validate_effective_sampling(sampling: &SamplingConfig) -> Result<(), ConfigError> {
    validate_sampling(sampling).map_err(ConfigError::InvalidSampling)
}

/// Load configuration with the standard resolution order.
///
/// The model file follows [`resolve_model_path`]; the sampling file is only
/// read when given explicitly. Both are validated before returning.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    let resolved = resolve_model_path(options.model_path.as_deref());

    let (model, model_hash) = match &resolved.path {
        Some(path) => {
            let (model, hash) = load_file::<ModelParams>(path)?;
            (model, Some(hash))
        }
        None => (ModelParams::default(), None),
    };
    validate_model(&model).map_err(ConfigError::InvalidModel)?;

    let sampling = match &options.sampling_path {
        Some(path) => load_file::<SamplingConfig>(path)?.0,
        None => SamplingConfig::default(),
    };
    validate_sampling(&sampling).map_err(ConfigError::InvalidSampling)?;

    Ok(ResolvedConfig {
        model,
        model_path: resolved.path,
        model_hash,
        model_source: resolved.source,
        sampling,
        sampling_path: options.sampling_path.clone(),
    })
}

/// Read and deserialize a JSON or TOML file, returning its SHA-256 as well.
pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<(T, String), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let hash = compute_hash(&content);

    let value = if is_toml(path) {
        toml::from_str(&content).map_err(|e| ConfigError::TomlError {
            path: path.to_path_buf(),
            source: e,
        })?
    } else {
        serde_json::from_str(&content).map_err(|e| ConfigError::JsonError {
            path: path.to_path_buf(),
            source: e,
        })?
    };

    Ok((value, hash))
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

/// Hex-encoded SHA-256 of `content`.
pub fn compute_hash(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
