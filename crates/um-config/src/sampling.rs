//! Sampling run configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of samples for each algorithm.
pub const DEFAULT_SAMPLES: usize = 20_000;

/// How likelihood-weighted trials contribute to the final-step estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightingMode {
    /// Every trial contributes its own weight.
    #[default]
    PerTrial,
    /// Trials are tallied per distinct sample sequence and every occurrence
    /// reuses the weight of the first one seen.
    FirstSeen,
}

impl WeightingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightingMode::PerTrial => "per_trial",
            WeightingMode::FirstSeen => "first_seen",
        }
    }
}

impl fmt::Display for WeightingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for WeightingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "per_trial" | "trial" | "standard" => Ok(WeightingMode::PerTrial),
            "first_seen" | "legacy" | "dedup" => Ok(WeightingMode::FirstSeen),
            _ => Err(format!(
                "unknown weighting mode: {} (expected per_trial or first_seen)",
                s
            )),
        }
    }
}

/// Sample counts and randomness for one inference run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Trials drawn by the likelihood-weighted sampler.
    #[serde(default = "default_samples")]
    pub likelihood_samples: usize,

    /// Recorded samples for the Gibbs sampler, including the initial one.
    #[serde(default = "default_samples")]
    pub gibbs_samples: usize,

    /// Leading Gibbs samples excluded from the final-step count.
    #[serde(default)]
    pub gibbs_burn_in: usize,

    /// Whether the Gibbs conditional at the first step includes P(R_0).
    /// Disabling it reproduces estimators that leave the head unconstrained.
    #[serde(default = "default_head_prior")]
    pub gibbs_head_prior: bool,

    #[serde(default)]
    pub weighting: WeightingMode,

    /// Seed for the random source; None draws one from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_samples() -> usize {
    DEFAULT_SAMPLES
}

fn default_head_prior() -> bool {
    true
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            likelihood_samples: DEFAULT_SAMPLES,
            gibbs_samples: DEFAULT_SAMPLES,
            gibbs_burn_in: 0,
            gibbs_head_prior: true,
            weighting: WeightingMode::default(),
            seed: None,
        }
    }
}
