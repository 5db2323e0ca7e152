//! Rain/umbrella model parameters.
//!
//! The model shape is fixed: a boolean hidden chain R_0..R_T ("raining") with
//! first-order transitions, and one boolean evidence variable U_t ("umbrella
//! seen") per step. Only the ten table entries are configurable.

use serde::{Deserialize, Serialize};

/// One row of a boolean conditional probability table: P(x=true), P(x=false).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BernoulliRow {
    pub p_true: f64,
    pub p_false: f64,

    #[serde(rename = "_comment", default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl BernoulliRow {
    pub const fn new(p_true: f64, p_false: f64) -> Self {
        Self {
            p_true,
            p_false,
            comment: None,
        }
    }

    /// Probability of `outcome` under this row.
    #[inline]
    pub fn prob(&self, outcome: bool) -> f64 {
        um_math::bernoulli::pmf(outcome, self.p_true, self.p_false)
    }

    /// Log probability of `outcome`; -inf for an impossible outcome.
    #[inline]
    pub fn log_prob(&self, outcome: bool) -> f64 {
        um_math::bernoulli::log_pmf(outcome, self.p_true, self.p_false)
    }
}

/// P(R_t | R_{t-1}), one row per value of the previous state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionTable {
    /// Distribution of R_t when R_{t-1} = true.
    pub from_true: BernoulliRow,
    /// Distribution of R_t when R_{t-1} = false.
    pub from_false: BernoulliRow,
}

/// P(U_t | R_t), one row per value of the hidden state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionTable {
    /// Distribution of U_t when R_t = true.
    pub given_true: BernoulliRow,
    /// Distribution of U_t when R_t = false.
    pub given_false: BernoulliRow,
}

/// Complete model parameter file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    pub schema_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// P(R_0).
    pub initial: BernoulliRow,

    pub transition: TransitionTable,

    pub emission: EmissionTable,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            description: Some("Rain/umbrella world".to_string()),
            initial: BernoulliRow::new(0.2, 0.8),
            transition: TransitionTable {
                from_true: BernoulliRow::new(0.7, 0.3),
                from_false: BernoulliRow::new(0.3, 0.7),
            },
            emission: EmissionTable {
                given_true: BernoulliRow::new(0.9, 0.1),
                given_false: BernoulliRow::new(0.2, 0.8),
            },
        }
    }
}

impl ModelParams {
    /// P(R_0 = state).
    #[inline]
    pub fn initial(&self, state: bool) -> f64 {
        self.initial.prob(state)
    }

    /// Row of P(R_t | R_{t-1} = prev).
    #[inline]
    pub fn transition_row(&self, prev: bool) -> &BernoulliRow {
        if prev {
            &self.transition.from_true
        } else {
            &self.transition.from_false
        }
    }

    /// P(R_t = next | R_{t-1} = prev).
    #[inline]
    pub fn transition(&self, prev: bool, next: bool) -> f64 {
        self.transition_row(prev).prob(next)
    }

    /// P(U_t = observed | R_t = state).
    #[inline]
    pub fn emission(&self, state: bool, observed: bool) -> f64 {
        if state {
            self.emission.given_true.prob(observed)
        } else {
            self.emission.given_false.prob(observed)
        }
    }

    /// ln P(U_t = observed | R_t = state).
    #[inline]
    pub fn log_emission(&self, state: bool, observed: bool) -> f64 {
        if state {
            self.emission.given_true.log_prob(observed)
        } else {
            self.emission.given_false.log_prob(observed)
        }
    }

    /// P(R_t = true) given the previous state, or the initial prior when
    /// there is no previous step.
    #[inline]
    pub fn p_true_after(&self, prev: Option<bool>) -> f64 {
        match prev {
            None => self.initial.p_true,
            Some(prev) => self.transition_row(prev).p_true,
        }
    }
}
