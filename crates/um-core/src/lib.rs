//! Umbrella Inference Core Library
//!
//! Approximate posterior inference over the rain/umbrella hidden Markov model:
//! - Observation chain construction
//! - Likelihood-weighted and Gibbs samplers, plus an exact forward filter
//! - Model file loading with provenance
//! - Structured logging and stable exit codes
//! - Report rendering
//!
//! The binary entry point is in `main.rs`.

pub mod config;
pub mod exit_codes;
pub mod inference;
pub mod logging;
pub mod observations;
pub mod report;

pub use inference::{Chain, InferenceError, Posterior, TimeStep};
