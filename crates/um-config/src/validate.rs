//! Configuration validation errors and semantic validation.

use crate::model::{BernoulliRow, ModelParams};
use crate::sampling::SamplingConfig;
use thiserror::Error;
use um_math::bernoulli::{is_valid_row, ROW_SUM_TOLERANCE};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate model parameters semantically.
pub fn validate_model(model: &ModelParams) -> ValidationResult<()> {
    if model.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: model.schema_version.clone(),
        });
    }

    validate_row("initial", &model.initial)?;
    validate_row("transition.from_true", &model.transition.from_true)?;
    validate_row("transition.from_false", &model.transition.from_false)?;
    validate_row("emission.given_true", &model.emission.given_true)?;
    validate_row("emission.given_false", &model.emission.given_false)?;

    Ok(())
}

/// Validate a sampling configuration.
pub fn validate_sampling(config: &SamplingConfig) -> ValidationResult<()> {
    if config.likelihood_samples == 0 {
        return Err(ValidationError::InvalidValue {
            field: "likelihood_samples".to_string(),
            message: "Must be positive, got 0".to_string(),
        });
    }
    if config.gibbs_samples == 0 {
        return Err(ValidationError::InvalidValue {
            field: "gibbs_samples".to_string(),
            message: "Must be positive, got 0".to_string(),
        });
    }
    if config.gibbs_burn_in >= config.gibbs_samples {
        return Err(ValidationError::InvalidValue {
            field: "gibbs_burn_in".to_string(),
            message: format!(
                "Must be smaller than gibbs_samples ({}), got {}",
                config.gibbs_samples, config.gibbs_burn_in
            ),
        });
    }
    Ok(())
}

/// Validate one conditional probability row.
fn validate_row(field: &str, row: &BernoulliRow) -> ValidationResult<()> {
    for (name, p) in [("p_true", row.p_true), ("p_false", row.p_false)] {
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.{}", field, name),
                message: format!("Must be in [0, 1], got {}", p),
            });
        }
    }

    if !is_valid_row(row.p_true, row.p_false, ROW_SUM_TOLERANCE) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!(
                "p_true + p_false must equal 1.0, got {} (p_true={}, p_false={})",
                row.p_true + row.p_false,
                row.p_true,
                row.p_false
            ),
        });
    }

    Ok(())
}
