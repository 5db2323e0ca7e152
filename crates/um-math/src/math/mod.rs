//! Core math modules.

pub mod bernoulli;
pub mod ess;
pub mod stable;
