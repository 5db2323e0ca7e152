//! Property-based tests for um-math numerical functions.
//!
//! Uses proptest to verify mathematical properties hold across many random inputs.

use proptest::prelude::*;
use um_math::ess::{batch_means_ess, kish_ess_log};
use um_math::{log_add_exp, log_sum_exp, normalize_log_pair, normalize_pair};

/// Tolerance for floating point comparisons.
const TOL: f64 = 1e-10;

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() <= tol.max(tol * a.abs().max(b.abs()))
}

// ============================================================================
// log_sum_exp / log_add_exp
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// log_sum_exp is commutative: order doesn't matter.
    #[test]
    fn log_sum_exp_commutative(a in -100.0..100.0f64, b in -100.0..100.0f64) {
        let ab = log_sum_exp(&[a, b]);
        let ba = log_sum_exp(&[b, a]);
        prop_assert!(approx_eq(ab, ba, TOL), "lse([{},{}])={} != {}", a, b, ab, ba);
    }

    /// log_add_exp matches log_sum_exp for 2 elements.
    #[test]
    fn log_add_exp_matches_log_sum_exp(a in -100.0..100.0f64, b in -100.0..100.0f64) {
        let lae = log_add_exp(a, b);
        let lse = log_sum_exp(&[a, b]);
        prop_assert!(approx_eq(lae, lse, TOL), "log_add_exp({},{})={} != {}", a, b, lae, lse);
    }

    /// No overflow with very large log-masses.
    #[test]
    fn log_sum_exp_no_overflow(a in 500.0..700.0f64, b in 500.0..700.0f64) {
        let result = log_sum_exp(&[a, b]);
        prop_assert!(result.is_finite());
        prop_assert!(result >= a.max(b) - TOL);
    }
}

// ============================================================================
// Pair normalization
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Normalized pairs are probabilities summing to one.
    #[test]
    fn normalize_pair_sums_to_one(a in 0.0..1e6f64, b in 1e-9..1e6f64) {
        let (p, q) = normalize_pair(a, b).expect("positive total");
        prop_assert!(p >= 0.0 && q >= 0.0);
        prop_assert!((p + q - 1.0).abs() < 1e-12, "p={} q={}", p, q);
    }

    /// Log-domain normalization agrees with linear normalization where both work.
    #[test]
    fn normalize_log_pair_matches_linear(a in 1e-6..1e3f64, b in 1e-6..1e3f64) {
        let (p_lin, _) = normalize_pair(a, b).expect("positive total");
        let (p_log, q_log) = normalize_log_pair(a.ln(), b.ln()).expect("finite logs");
        prop_assert!(approx_eq(p_lin, p_log, 1e-9), "{} vs {}", p_lin, p_log);
        prop_assert!((p_log + q_log - 1.0).abs() < 1e-12);
    }

    /// Shifting both log-masses by a constant does not change the pair.
    #[test]
    fn normalize_log_pair_shift_invariant(a in -50.0..50.0f64, b in -50.0..50.0f64, shift in -5000.0..5000.0f64) {
        let (p, _) = normalize_log_pair(a, b).expect("finite");
        let (p_shift, _) = normalize_log_pair(a + shift, b + shift).expect("finite");
        prop_assert!(approx_eq(p, p_shift, 1e-9), "{} vs {}", p, p_shift);
    }
}

// ============================================================================
// Effective sample size
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Kish ESS lies in [1, n] for any non-degenerate weights.
    #[test]
    fn kish_ess_bounded(weights in prop::collection::vec(-30.0..0.0f64, 1..200)) {
        let ess = kish_ess_log(&weights);
        let n = weights.len() as f64;
        prop_assert!(ess >= 1.0 - 1e-9, "ess={}", ess);
        prop_assert!(ess <= n + 1e-9, "ess={} n={}", ess, n);
    }

    /// Batch-means ESS lies in [1, n].
    #[test]
    fn batch_means_ess_bounded(trace in prop::collection::vec(prop::bool::ANY, 4..2000)) {
        let values: Vec<f64> = trace.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect();
        let ess = batch_means_ess(&values);
        prop_assert!(ess >= 1.0);
        prop_assert!(ess <= values.len() as f64);
    }
}
