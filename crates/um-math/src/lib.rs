//! Umbrella inference math utilities.

pub mod math;

pub use math::bernoulli;
pub use math::ess;
pub use math::stable::*;
