//! Gibbs sampling over the hidden chain.
//!
//! Starts from an independent fair-coin assignment and resamples one position
//! per iteration from its full conditional given the Markov blanket: the
//! previous state (or the initial prior at the head), the step's own
//! evidence, and the next state. Positions are visited cyclically.
//!
//! [`GibbsSampler::without_head_prior`] drops P(R_0) from the head
//! conditional. The chain then targets a different distribution: for a
//! single step "1" it converges to 0.9 / (0.9 + 0.2) rather than the
//! posterior 0.18 / 0.34.
//!
//! Only the final-step trace is kept; the estimate is the fraction of
//! recorded samples, the initial one included, whose final state is rain.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;
use um_config::ModelParams;
use um_math::bernoulli;
use um_math::ess::{summarize_indicator_trace, TraceSummary};

use super::{Chain, InferenceError, Posterior, Sample};

/// Probability of `t` when initializing each position.
const INITIAL_P_TRUE: f64 = 0.5;

/// Outcome of a Gibbs run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GibbsRun {
    pub posterior: Posterior,
    /// Recorded samples, including the initial assignment.
    pub samples: usize,
    /// Leading samples excluded from the count.
    pub burn_in: usize,
    /// Samples that entered the estimate.
    pub counted: usize,
    /// Whether the head conditional included P(R_0).
    pub head_prior: bool,
    /// Full passes over the chain (`(samples - 1) / chain length`).
    pub sweeps: f64,
    /// Final-step indicator trace over the counted samples.
    pub trace: TraceSummary,
}

/// Gibbs sampler over a fixed model.
#[derive(Debug, Clone, Copy)]
pub struct GibbsSampler<'m> {
    model: &'m ModelParams,
    burn_in: usize,
    head_prior: bool,
}

impl<'m> GibbsSampler<'m> {
    pub fn new(model: &'m ModelParams) -> Self {
        Self {
            model,
            burn_in: 0,
            head_prior: true,
        }
    }

    /// Exclude the first `burn_in` recorded samples from the estimate.
    pub fn with_burn_in(mut self, burn_in: usize) -> Self {
        self.burn_in = burn_in;
        self
    }

    /// Include or drop the P(R_0) factor at the first step.
    pub fn with_head_prior(mut self, enabled: bool) -> Self {
        self.head_prior = enabled;
        self
    }

    /// Leave the first step without a backward factor.
    pub fn without_head_prior(self) -> Self {
        self.with_head_prior(false)
    }

    /// Random starting assignment, each position `t` with probability 0.5.
    pub fn initial_sample<R: Rng + ?Sized>(&self, chain: &Chain, rng: &mut R) -> Sample {
        Sample::new(
            chain
                .iter()
                .map(|_| bernoulli::draw(rng.random::<f64>(), INITIAL_P_TRUE))
                .collect(),
        )
    }

    /// P(R_index = true | Markov blanket) under the current assignment.
    ///
    /// `observations` and `states` must have the same length and `index`
    /// must fall inside them.
    pub fn conditional_p_true(
        &self,
        observations: &[bool],
        states: &[bool],
        index: usize,
    ) -> Result<f64, InferenceError> {
        if observations.len() != states.len() || index >= states.len() {
            return Err(InferenceError::StepOutOfRange {
                index,
                observations: observations.len(),
                states: states.len(),
            });
        }

        let factor = |state: bool| {
            let backward = match index.checked_sub(1) {
                Some(prev) => self.model.transition(states[prev], state),
                None if self.head_prior => self.model.initial(state),
                None => 1.0,
            };
            let forward = match states.get(index + 1) {
                Some(&next) => self.model.transition(state, next),
                None => 1.0,
            };
            self.model.emission(state, observations[index]) * backward * forward
        };

        um_math::normalize_pair(factor(true), factor(false))
            .map(|(p_true, _)| p_true)
            .ok_or(InferenceError::DegenerateConditional { index })
    }

    /// Estimate P(R_T | u_0..u_T) from `num_samples` recorded samples.
    pub fn run<R: Rng + ?Sized>(
        &self,
        chain: &Chain,
        num_samples: usize,
        rng: &mut R,
    ) -> Result<GibbsRun, InferenceError> {
        if num_samples == 0 {
            return Err(InferenceError::ZeroSamples { algorithm: "gibbs" });
        }
        if self.burn_in >= num_samples {
            return Err(InferenceError::BurnInTooLarge {
                burn_in: self.burn_in,
                samples: num_samples,
            });
        }

        let observations = chain.observations();
        let mut states = self.initial_sample(chain, rng).states().to_vec();
        let tail = states.len() - 1;

        let mut final_trace = Vec::with_capacity(num_samples);
        final_trace.push(states[tail]);

        let mut pointer = 0;
        for _ in 1..num_samples {
            let p_true = self.conditional_p_true(&observations, &states, pointer)?;
            states[pointer] = bernoulli::draw(rng.random::<f64>(), p_true);
            final_trace.push(states[tail]);
            pointer = (pointer + 1) % states.len();
        }

        let counted = &final_trace[self.burn_in..];
        let count_true = counted.iter().filter(|&&s| s).count();
        let count_false = counted.len() - count_true;
        trace!(count_true, count_false, "gibbs final-step counts");

        let posterior = Posterior::from_masses(count_true as f64, count_false as f64)
            .ok_or(InferenceError::ZeroSamples { algorithm: "gibbs" })?;

        Ok(GibbsRun {
            posterior,
            samples: num_samples,
            burn_in: self.burn_in,
            counted: counted.len(),
            head_prior: self.head_prior,
            sweeps: (num_samples - 1) as f64 / chain.len() as f64,
            trace: summarize_indicator_trace(counted),
        })
    }
}
