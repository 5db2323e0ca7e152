//! Exact posterior of the final state by forward filtering.
//!
//! `α_0 ∝ P(R_0)·P(u_0 | R_0)`, `α_t ∝ P(u_t | R_t)·Σ P(R_t | r)·α_{t-1}(r)`,
//! normalized at every step.

use um_config::ModelParams;

use super::{Chain, InferenceError, Posterior};

/// Forward-filtered P(R_T | u_0..u_T).
pub fn filter(chain: &Chain, model: &ModelParams) -> Result<Posterior, InferenceError> {
    let mut belief: Option<Posterior> = None;

    for step in chain {
        let (prior_true, prior_false) = match belief {
            None => (model.initial(true), model.initial(false)),
            Some(b) => (
                b.p_true * model.transition(true, true) + b.p_false * model.transition(false, true),
                b.p_true * model.transition(true, false) + b.p_false * model.transition(false, false),
            ),
        };
        let next = Posterior::from_masses(
            prior_true * model.emission(true, step.observed),
            prior_false * model.emission(false, step.observed),
        )
        .ok_or(InferenceError::ImpossibleEvidence { index: step.index })?;
        belief = Some(next);
    }

    belief.ok_or(InferenceError::EmptyObservations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use um_config::BernoulliRow;

    #[test]
    fn single_step_matches_bayes_rule() {
        let chain = Chain::from_symbols("1").unwrap();
        let p = filter(&chain, &ModelParams::default()).unwrap();
        assert!((p.p_true - 0.18 / 0.34).abs() < 1e-12);
        assert!((p.p_true + p.p_false - 1.0).abs() < 1e-12);
    }

    #[test]
    fn two_steps_by_hand() {
        let chain = Chain::from_symbols("11").unwrap();
        let p = filter(&chain, &ModelParams::default()).unwrap();
        let a0 = 0.18 / 0.34;
        let pred_true = a0 * 0.7 + (1.0 - a0) * 0.3;
        let t = pred_true * 0.9;
        let f = (1.0 - pred_true) * 0.2;
        assert!((p.p_true - t / (t + f)).abs() < 1e-12);
    }

    #[test]
    fn long_alternating_chain_stays_finite() {
        let symbols: String = (0..50).map(|i| if i % 2 == 0 { '0' } else { '1' }).collect();
        let chain = Chain::from_symbols(&symbols).unwrap();
        let p = filter(&chain, &ModelParams::default()).unwrap();
        assert!((p.p_true - 0.717_086_67).abs() < 1e-6);
    }

    #[test]
    fn impossible_evidence_names_the_step() {
        let mut m = ModelParams::default();
        m.emission.given_true = BernoulliRow::new(1.0, 0.0);
        m.emission.given_false = BernoulliRow::new(1.0, 0.0);
        let chain = Chain::from_symbols("10").unwrap();
        assert_eq!(
            filter(&chain, &m),
            Err(InferenceError::ImpossibleEvidence { index: 1 })
        );
    }
}
