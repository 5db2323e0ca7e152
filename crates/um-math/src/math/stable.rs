//! Numerically stable primitives for log-domain probability math.

/// Stable log(sum(exp(values))).
///
/// Returns NEG_INFINITY for empty input or all -inf inputs.
pub fn log_sum_exp(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NEG_INFINITY;
    }
    if values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    if max == f64::INFINITY {
        return f64::INFINITY;
    }
    let mut sum = 0.0;
    for v in values {
        sum += (*v - max).exp();
    }
    max + sum.ln()
}

/// Stable log(exp(a) + exp(b)).
pub fn log_add_exp(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        return f64::NAN;
    }
    if a == f64::NEG_INFINITY {
        return b;
    }
    if b == f64::NEG_INFINITY {
        return a;
    }
    if a == f64::INFINITY || b == f64::INFINITY {
        return f64::INFINITY;
    }
    let m = a.max(b);
    let diff = (a - b).abs();
    m + (-diff).exp().ln_1p()
}

/// Natural log that maps 0 to -inf instead of producing a NaN for negatives.
///
/// Negative or NaN inputs return NaN.
pub fn ln_or_neg_inf(x: f64) -> f64 {
    if x.is_nan() || x < 0.0 {
        return f64::NAN;
    }
    if x == 0.0 {
        return f64::NEG_INFINITY;
    }
    x.ln()
}

/// Normalize two non-negative masses into a probability pair.
///
/// Returns None when the total is zero, non-finite, or either mass is negative.
pub fn normalize_pair(a: f64, b: f64) -> Option<(f64, f64)> {
    if a.is_nan() || b.is_nan() || a < 0.0 || b < 0.0 {
        return None;
    }
    let total = a + b;
    if total <= 0.0 || !total.is_finite() {
        return None;
    }
    Some((a / total, b / total))
}

/// Normalize two log-masses into a probability pair.
///
/// Works when both masses would underflow in linear space. Returns None if
/// both are -inf or either is NaN.
pub fn normalize_log_pair(log_a: f64, log_b: f64) -> Option<(f64, f64)> {
    if log_a.is_nan() || log_b.is_nan() {
        return None;
    }
    let log_total = log_add_exp(log_a, log_b);
    if !log_total.is_finite() {
        return None;
    }
    let a = (log_a - log_total).exp();
    let b = (log_b - log_total).exp();
    Some((a, b))
}
