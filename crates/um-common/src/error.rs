//! Error types for umbrella inference.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Remediation suggestions for humans
//! - Suggested actions for scripted callers
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Invalid Observation
//!   Reason: invalid observation symbol 'x' at position 3
//!   Fix: Observation files may only contain '0', '1' and whitespace.
//! ```
//!
//! # Machine-Facing Output
//!
//! ```json
//! {
//!   "code": 21,
//!   "category": "input",
//!   "message": "invalid observation symbol 'x' at position 3",
//!   "recoverable": true,
//!   "suggested_action": "fix_input",
//!   "context": { "position": 3, "symbol": "x" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for umbrella inference operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Model parameter and sampling configuration errors.
    Config,
    /// Observation sequence errors.
    Input,
    /// Sampling and numerical errors.
    Inference,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Inference => write!(f, "inference"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Suggested actions for callers to take in response to errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Correct the observation input.
    FixInput,
    /// Reset configuration to defaults.
    ResetConfig,
    /// Run the check command.
    RunCheck,
    /// Retry the operation.
    Retry,
    /// Abort the operation.
    Abort,
}

impl std::fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestedAction::FixInput => write!(f, "fix_input"),
            SuggestedAction::ResetConfig => write!(f, "reset_config"),
            SuggestedAction::RunCheck => write!(f, "run_check"),
            SuggestedAction::Retry => write!(f, "retry"),
            SuggestedAction::Abort => write!(f, "abort"),
        }
    }
}

/// Unified error type for umbrella inference.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid model file: {0}")]
    InvalidModel(String),

    #[error("invalid sampling configuration: {0}")]
    InvalidSampling(String),

    // Input errors (20-29)
    #[error("observation sequence is empty")]
    EmptyObservations,

    #[error("invalid observation symbol {symbol:?} at position {position}")]
    InvalidSymbol { position: usize, symbol: char },

    // Inference errors (30-39)
    #[error("{algorithm} sampler requires a positive sample count")]
    ZeroSamples { algorithm: String },

    #[error("degenerate model: {0}")]
    Degenerate(String),

    #[error("internal error: {0}")]
    Internal(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Input errors
    /// - 30-39: Inference errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidModel(_) => 11,
            Error::InvalidSampling(_) => 12,
            Error::EmptyObservations => 20,
            Error::InvalidSymbol { .. } => 21,
            Error::ZeroSamples { .. } => 30,
            Error::Degenerate(_) => 31,
            Error::Internal(_) => 39,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidModel(_) | Error::InvalidSampling(_) => {
                ErrorCategory::Config
            }
            Error::EmptyObservations | Error::InvalidSymbol { .. } => ErrorCategory::Input,
            Error::ZeroSamples { .. } | Error::Degenerate(_) | Error::Internal(_) => {
                ErrorCategory::Inference
            }
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable by the caller.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) | Error::InvalidModel(_) | Error::InvalidSampling(_) => true,
            Error::EmptyObservations | Error::InvalidSymbol { .. } => true,
            Error::ZeroSamples { .. } => true,
            // The model cannot explain the evidence; retrying changes nothing.
            Error::Degenerate(_) => false,
            Error::Internal(_) => false,
            Error::Io(_) => true,
            Error::Json(_) => false,
        }
    }

    /// Returns the suggested action for scripted callers.
    pub fn suggested_action(&self) -> SuggestedAction {
        match self {
            Error::Config(_) => SuggestedAction::RunCheck,
            Error::InvalidModel(_) => SuggestedAction::ResetConfig,
            Error::InvalidSampling(_) => SuggestedAction::RunCheck,
            Error::EmptyObservations | Error::InvalidSymbol { .. } => SuggestedAction::FixInput,
            Error::ZeroSamples { .. } => SuggestedAction::RunCheck,
            Error::Degenerate(_) => SuggestedAction::ResetConfig,
            Error::Internal(_) => SuggestedAction::Abort,
            Error::Io(_) => SuggestedAction::Retry,
            Error::Json(_) => SuggestedAction::Abort,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => "Run 'um-core check' to validate configuration.",
            Error::InvalidModel(_) => {
                "Each row needs p_true and p_false in [0, 1] summing to 1. Print the defaults with 'um-core model'."
            }
            Error::InvalidSampling(_) => {
                "Sample counts must be positive and the burn-in smaller than the Gibbs sample count."
            }
            Error::EmptyObservations => {
                "Provide at least one observation ('0' or '1') in the input file."
            }
            Error::InvalidSymbol { .. } => {
                "Observation files may only contain '0', '1' and whitespace."
            }
            Error::ZeroSamples { .. } => {
                "Pass a positive count with --likelihood-samples / --gibbs-samples."
            }
            Error::Degenerate(_) => {
                "The model assigns zero probability to the observations. Check the emission table."
            }
            Error::Internal(_) => "Please report this as a bug.",
            Error::Io(_) => "Check that the file exists and is readable.",
            Error::Json(_) => "Internal serialization failure. Please report this as a bug.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidModel(_) => "Invalid Model Parameters",
            Error::InvalidSampling(_) => "Invalid Sampling Configuration",
            Error::EmptyObservations => "Empty Observation Sequence",
            Error::InvalidSymbol { .. } => "Invalid Observation",
            Error::ZeroSamples { .. } => "Invalid Sample Count",
            Error::Degenerate(_) => "Degenerate Model",
            Error::Internal(_) => "Internal Error",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Suggested action for scripted callers.
    pub suggested_action: SuggestedAction,

    /// Additional structured context (e.g., symbol position).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::InvalidSymbol { position, symbol } => {
                context.insert("position".to_string(), serde_json::json!(position));
                context.insert("symbol".to_string(), serde_json::json!(symbol.to_string()));
            }
            Error::ZeroSamples { algorithm } => {
                context.insert("algorithm".to_string(), serde_json::json!(algorithm));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
