//! Umbrella inference common types and errors.
//!
//! This crate provides foundational types shared across um-core modules:
//! - Common error types with stable codes
//! - Output format specifications

pub mod error;
pub mod output;

pub use error::{Error, ErrorCategory, Result, StructuredError, SuggestedAction};
pub use output::OutputFormat;

/// Schema version for JSON reports.
pub const SCHEMA_VERSION: &str = "1.0.0";
