//! Posterior inference over the final hidden state.
//!
//! All samplers take an explicit `&mut R: Rng`; a run driven by a generator
//! seeded with the same value reproduces the same posteriors bit for bit.

pub mod chain;
pub mod exact;
pub mod gibbs;
pub mod likelihood;

pub use chain::{Chain, TimeStep};
pub use gibbs::{GibbsRun, GibbsSampler};
pub use likelihood::{LikelihoodRun, LikelihoodWeighting, WeightedSample};

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use um_config::{ModelParams, SamplingConfig};

/// Errors raised while building a chain or running a sampler.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("observation sequence is empty")]
    EmptyObservations,

    #[error("invalid observation symbol {symbol:?} at position {position}")]
    InvalidSymbol { position: usize, symbol: char },

    #[error("{algorithm} sampler needs at least one sample")]
    ZeroSamples { algorithm: &'static str },

    #[error("burn-in of {burn_in} leaves no Gibbs samples out of {samples}")]
    BurnInTooLarge { burn_in: usize, samples: usize },

    #[error("every likelihood weight is zero; the evidence is impossible under the model")]
    DegenerateWeights,

    #[error("full conditional at step {index} has zero mass")]
    DegenerateConditional { index: usize },

    #[error("evidence at step {index} has zero probability under the model")]
    ImpossibleEvidence { index: usize },

    #[error("step {index} is outside an assignment of {states} states over {observations} observations")]
    StepOutOfRange {
        index: usize,
        observations: usize,
        states: usize,
    },
}

impl From<InferenceError> for um_common::Error {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::EmptyObservations => um_common::Error::EmptyObservations,
            InferenceError::InvalidSymbol { position, symbol } => {
                um_common::Error::InvalidSymbol { position, symbol }
            }
            InferenceError::ZeroSamples { algorithm } => um_common::Error::ZeroSamples {
                algorithm: algorithm.to_string(),
            },
            InferenceError::BurnInTooLarge { .. } => {
                um_common::Error::InvalidSampling(err.to_string())
            }
            InferenceError::DegenerateWeights
            | InferenceError::DegenerateConditional { .. }
            | InferenceError::ImpossibleEvidence { .. } => {
                um_common::Error::Degenerate(err.to_string())
            }
            InferenceError::StepOutOfRange { .. } => um_common::Error::Internal(err.to_string()),
        }
    }
}

/// Normalized distribution of the final hidden state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Posterior {
    pub p_true: f64,
    pub p_false: f64,
}

impl Posterior {
    /// Normalize two non-negative masses. None when both are zero.
    pub fn from_masses(mass_true: f64, mass_false: f64) -> Option<Self> {
        um_math::normalize_pair(mass_true, mass_false).map(|(p_true, p_false)| Posterior {
            p_true,
            p_false,
        })
    }

    /// Normalize two log-masses with log-sum-exp. None when both are -inf.
    pub fn from_log_masses(log_true: f64, log_false: f64) -> Option<Self> {
        um_math::normalize_log_pair(log_true, log_false).map(|(p_true, p_false)| Posterior {
            p_true,
            p_false,
        })
    }

    pub fn as_pair(&self) -> (f64, f64) {
        (self.p_true, self.p_false)
    }
}

impl fmt::Display for Posterior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.p_true, self.p_false)
    }
}

/// One full assignment of the hidden states, `true` meaning rain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sample(Vec<bool>);

impl Sample {
    pub fn new(states: Vec<bool>) -> Self {
        Sample(states)
    }

    pub fn states(&self) -> &[bool] {
        &self.0
    }

    /// State of the final step. Samples are never empty.
    pub fn last(&self) -> bool {
        self.0.last().copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Renders as `t`/`f` characters, one per step.
impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &state in &self.0 {
            f.write_str(if state { "t" } else { "f" })?;
        }
        Ok(())
    }
}

/// Results of one full inference pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceSummary {
    pub likelihood: LikelihoodRun,
    pub gibbs: GibbsRun,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact: Option<Posterior>,
}

/// Reject sample counts and burn-in that would make either sampler fail.
pub fn check_sampling(sampling: &SamplingConfig) -> Result<(), InferenceError> {
    if sampling.likelihood_samples == 0 {
        return Err(InferenceError::ZeroSamples {
            algorithm: "likelihood",
        });
    }
    if sampling.gibbs_samples == 0 {
        return Err(InferenceError::ZeroSamples { algorithm: "gibbs" });
    }
    if sampling.gibbs_burn_in >= sampling.gibbs_samples {
        return Err(InferenceError::BurnInTooLarge {
            burn_in: sampling.gibbs_burn_in,
            samples: sampling.gibbs_samples,
        });
    }
    Ok(())
}

/// Run likelihood weighting, then Gibbs, drawing from the same generator.
///
/// Sample counts are checked before either sampler draws. The exact forward
/// filter is computed only when `with_exact` is set.
pub fn infer<R: Rng + ?Sized>(
    chain: &Chain,
    model: &ModelParams,
    sampling: &SamplingConfig,
    with_exact: bool,
    rng: &mut R,
) -> Result<InferenceSummary, InferenceError> {
    check_sampling(sampling)?;

    let likelihood = LikelihoodWeighting::new(model, sampling.weighting).run(
        chain,
        sampling.likelihood_samples,
        rng,
    )?;
    let gibbs = GibbsSampler::new(model)
        .with_burn_in(sampling.gibbs_burn_in)
        .with_head_prior(sampling.gibbs_head_prior)
        .run(chain, sampling.gibbs_samples, rng)?;
    let exact = if with_exact {
        Some(exact::filter(chain, model)?)
    } else {
        None
    };

    Ok(InferenceSummary {
        likelihood,
        gibbs,
        exact,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sample_renders_as_t_and_f() {
        let s = Sample::new(vec![true, false, false, true]);
        assert_eq!(s.to_string(), "tfft");
        assert!(s.last());
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn posterior_from_masses() {
        let p = Posterior::from_masses(1.0, 3.0).unwrap();
        assert_eq!(p.as_pair(), (0.25, 0.75));
        assert!(Posterior::from_masses(0.0, 0.0).is_none());
    }

    #[test]
    fn posterior_from_tiny_log_masses() {
        let p = Posterior::from_log_masses(-2000.0, -2000.0 + 3f64.ln()).unwrap();
        assert!((p.p_true - 0.25).abs() < 1e-12);
        assert!(Posterior::from_log_masses(f64::NEG_INFINITY, f64::NEG_INFINITY).is_none());
    }

    #[test]
    fn infer_runs_both_samplers() {
        let chain = Chain::from_symbols("0101").unwrap();
        let sampling = SamplingConfig {
            likelihood_samples: 500,
            gibbs_samples: 400,
            ..SamplingConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let summary = infer(&chain, &ModelParams::default(), &sampling, true, &mut rng).unwrap();
        assert_eq!(summary.likelihood.samples, 500);
        assert_eq!(summary.gibbs.samples, 400);
        assert!(summary.exact.is_some());
    }

    #[test]
    fn rejected_counts_leave_the_generator_untouched() {
        let chain = Chain::from_symbols("0101").unwrap();
        let model = ModelParams::default();
        let cases = [
            (
                SamplingConfig {
                    gibbs_samples: 0,
                    ..SamplingConfig::default()
                },
                InferenceError::ZeroSamples { algorithm: "gibbs" },
            ),
            (
                SamplingConfig {
                    likelihood_samples: 0,
                    ..SamplingConfig::default()
                },
                InferenceError::ZeroSamples {
                    algorithm: "likelihood",
                },
            ),
            (
                SamplingConfig {
                    gibbs_samples: 100,
                    gibbs_burn_in: 100,
                    ..SamplingConfig::default()
                },
                InferenceError::BurnInTooLarge {
                    burn_in: 100,
                    samples: 100,
                },
            ),
        ];

        for (sampling, expected) in cases {
            let mut rng = StdRng::seed_from_u64(21);
            let mut fresh = rng.clone();
            let err = infer(&chain, &model, &sampling, false, &mut rng).unwrap_err();
            assert_eq!(err, expected);
            assert_eq!(rng.random::<u64>(), fresh.random::<u64>());
        }
    }

    #[test]
    fn head_prior_setting_reaches_gibbs() {
        let chain = Chain::from_symbols("1").unwrap();
        let sampling = SamplingConfig {
            likelihood_samples: 10,
            gibbs_samples: 10,
            gibbs_head_prior: false,
            ..SamplingConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let summary = infer(&chain, &ModelParams::default(), &sampling, false, &mut rng).unwrap();
        assert!(!summary.gibbs.head_prior);
    }

    #[test]
    fn errors_map_to_common_codes() {
        let err: um_common::Error = InferenceError::ZeroSamples { algorithm: "gibbs" }.into();
        assert!(matches!(err, um_common::Error::ZeroSamples { .. }));

        let err: um_common::Error = InferenceError::DegenerateWeights.into();
        assert!(matches!(err, um_common::Error::Degenerate(_)));

        let err: um_common::Error = InferenceError::StepOutOfRange {
            index: 3,
            observations: 2,
            states: 2,
        }
        .into();
        assert!(matches!(err, um_common::Error::Internal(_)));
    }
}
