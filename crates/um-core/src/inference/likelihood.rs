//! Likelihood-weighted sampling.
//!
//! Each trial walks the chain from head to tail, drawing every hidden state
//! from the initial prior or the transition row of the previous draw. The
//! evidence never influences a draw; it only multiplies the trial weight by
//! P(observed | state). Weights are carried as log-weights so long chains do
//! not underflow.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;
use um_config::{ModelParams, WeightingMode};
use um_math::bernoulli;
use um_math::ess::{kish_ess_log, kish_ess_log_counted};
use um_math::{log_add_exp, log_sum_exp};

use super::{Chain, InferenceError, Posterior, Sample};

/// A single trial and its log-weight.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedSample {
    pub sample: Sample,
    pub log_weight: f64,
}

impl WeightedSample {
    pub fn weight(&self) -> f64 {
        self.log_weight.exp()
    }
}

/// Outcome of a likelihood-weighting run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikelihoodRun {
    pub posterior: Posterior,
    pub mode: WeightingMode,
    /// Trials drawn.
    pub samples: usize,
    /// Distinct hidden-state sequences among the trials.
    pub distinct_samples: usize,
    /// Kish effective sample size of the weights that entered the estimate.
    pub effective_sample_size: f64,
}

/// Likelihood-weighting sampler over a fixed model.
#[derive(Debug, Clone, Copy)]
pub struct LikelihoodWeighting<'m> {
    model: &'m ModelParams,
    mode: WeightingMode,
}

impl<'m> LikelihoodWeighting<'m> {
    pub fn new(model: &'m ModelParams, mode: WeightingMode) -> Self {
        Self { model, mode }
    }

    pub fn mode(&self) -> WeightingMode {
        self.mode
    }

    /// Draw one trial.
    pub fn draw<R: Rng + ?Sized>(&self, chain: &Chain, rng: &mut R) -> WeightedSample {
        let mut states = Vec::with_capacity(chain.len());
        let mut log_weight = 0.0;
        let mut prev = None;

        for step in chain {
            let p_true = self.model.p_true_after(prev);
            let state = bernoulli::draw(rng.random::<f64>(), p_true);
            log_weight += self.model.log_emission(state, step.observed);
            states.push(state);
            prev = Some(state);
        }

        WeightedSample {
            sample: Sample::new(states),
            log_weight,
        }
    }

    /// Estimate P(R_T | u_0..u_T) from `num_samples` trials.
    pub fn run<R: Rng + ?Sized>(
        &self,
        chain: &Chain,
        num_samples: usize,
        rng: &mut R,
    ) -> Result<LikelihoodRun, InferenceError> {
        if num_samples == 0 {
            return Err(InferenceError::ZeroSamples {
                algorithm: "likelihood",
            });
        }

        let mut distinct = DistinctTally::default();
        let mut log_true = f64::NEG_INFINITY;
        let mut log_false = f64::NEG_INFINITY;
        let mut trial_weights = Vec::with_capacity(match self.mode {
            WeightingMode::PerTrial => num_samples,
            WeightingMode::FirstSeen => 0,
        });

        for _ in 0..num_samples {
            let trial = self.draw(chain, rng);
            if self.mode == WeightingMode::PerTrial {
                if trial.sample.last() {
                    log_true = log_add_exp(log_true, trial.log_weight);
                } else {
                    log_false = log_add_exp(log_false, trial.log_weight);
                }
                trial_weights.push(trial.log_weight);
            }
            distinct.record(trial);
        }

        let effective_sample_size = match self.mode {
            WeightingMode::PerTrial => kish_ess_log(&trial_weights),
            WeightingMode::FirstSeen => {
                (log_true, log_false) = distinct.first_seen_log_masses();
                let (weights, counts) = distinct.weights_and_counts();
                kish_ess_log_counted(&weights, &counts)
            }
        };

        trace!(
            log_true,
            log_false,
            distinct = distinct.len(),
            "likelihood weighting accumulated"
        );

        let posterior =
            Posterior::from_log_masses(log_true, log_false).ok_or(InferenceError::DegenerateWeights)?;

        Ok(LikelihoodRun {
            posterior,
            mode: self.mode,
            samples: num_samples,
            distinct_samples: distinct.len(),
            effective_sample_size,
        })
    }
}

/// Per-sequence tally in first-seen order.
#[derive(Debug, Default)]
struct DistinctTally {
    index: HashMap<Sample, usize>,
    entries: Vec<DistinctEntry>,
}

#[derive(Debug)]
struct DistinctEntry {
    last: bool,
    first_log_weight: f64,
    count: u64,
}

impl DistinctTally {
    fn record(&mut self, trial: WeightedSample) {
        if let Some(&i) = self.index.get(&trial.sample) {
            self.entries[i].count += 1;
            return;
        }
        self.entries.push(DistinctEntry {
            last: trial.sample.last(),
            first_log_weight: trial.log_weight,
            count: 1,
        });
        self.index.insert(trial.sample, self.entries.len() - 1);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    /// Log of `Σ count × first weight` per final state, summed in the order
    /// the sequences were first seen.
    fn first_seen_log_masses(&self) -> (f64, f64) {
        let mut terms_true = Vec::new();
        let mut terms_false = Vec::new();
        for entry in &self.entries {
            let term = entry.first_log_weight + (entry.count as f64).ln();
            if entry.last {
                terms_true.push(term);
            } else {
                terms_false.push(term);
            }
        }
        (log_sum_exp(&terms_true), log_sum_exp(&terms_false))
    }

    fn weights_and_counts(&self) -> (Vec<f64>, Vec<u64>) {
        self.entries
            .iter()
            .map(|e| (e.first_log_weight, e.count))
            .unzip()
    }
}
