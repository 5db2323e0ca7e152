//! Bernoulli rows for boolean conditional probability tables.
//!
//! A row stores both outcome probabilities explicitly, `P(x=true)` and
//! `P(x=false)`, rather than deriving one as `1 - p`. Literal table values
//! such as 0.3 and 0.7 stay bit-exact that way (`1.0 - 0.7 != 0.3` in f64).

use super::stable::ln_or_neg_inf;

/// Default tolerance for a row's outcome probabilities summing to one.
pub const ROW_SUM_TOLERANCE: f64 = 1e-6;

/// Probability of `outcome` under a row `(p_true, p_false)`.
#[inline]
pub fn pmf(outcome: bool, p_true: f64, p_false: f64) -> f64 {
    if outcome {
        p_true
    } else {
        p_false
    }
}

/// Log probability of `outcome` under a row `(p_true, p_false)`.
///
/// Zero-probability outcomes map to -inf.
#[inline]
pub fn log_pmf(outcome: bool, p_true: f64, p_false: f64) -> f64 {
    ln_or_neg_inf(pmf(outcome, p_true, p_false))
}

/// Inverse-CDF draw: `true` iff the uniform variate `u` in [0, 1) falls below `p_true`.
///
/// # Example
/// ```
/// use um_math::bernoulli::draw;
///
/// assert!(draw(0.19, 0.2));
/// assert!(!draw(0.2, 0.2));
/// ```
#[inline]
pub fn draw(u: f64, p_true: f64) -> bool {
    u < p_true
}

/// Check that a row holds two probabilities summing to one within `tol`.
pub fn is_valid_row(p_true: f64, p_false: f64, tol: f64) -> bool {
    let in_unit = |p: f64| p.is_finite() && (0.0..=1.0).contains(&p);
    in_unit(p_true) && in_unit(p_false) && (p_true + p_false - 1.0).abs() <= tol
}
