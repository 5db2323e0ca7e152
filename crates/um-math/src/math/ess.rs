//! Effective sample size diagnostics.
//!
//! Two estimators:
//! - Kish ESS for importance weights: `(Σw)² / Σw²`, computed in log-space.
//! - Batch-means ESS for correlated MCMC traces: `n · σ² / (b · Var(batch means))`.

use super::stable::log_sum_exp;
use serde::{Deserialize, Serialize};

/// Summary of a scalar MCMC trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceSummary {
    /// Number of trace entries.
    pub n: usize,
    /// Sample mean.
    pub mean: f64,
    /// Batch-means effective sample size, clamped to [1, n].
    pub ess: f64,
}

/// Kish effective sample size of importance weights given as log-weights.
///
/// Entries equal to -inf (zero weight) are ignored. Returns 0.0 when every
/// weight is zero or the input is empty.
pub fn kish_ess_log(log_weights: &[f64]) -> f64 {
    let doubled: Vec<f64> = log_weights.iter().map(|w| 2.0 * w).collect();
    let log_sum = log_sum_exp(log_weights);
    let log_sum_sq = log_sum_exp(&doubled);
    if !log_sum.is_finite() || !log_sum_sq.is_finite() {
        return 0.0;
    }
    (2.0 * log_sum - log_sum_sq).exp()
}

/// Kish ESS where each log-weight occurs `counts[i]` times.
///
/// `(Σ cᵢwᵢ)² / Σ cᵢwᵢ²`. Slices must have equal length; extra entries in the
/// longer slice are ignored.
pub fn kish_ess_log_counted(log_weights: &[f64], counts: &[u64]) -> f64 {
    let mut first = Vec::with_capacity(log_weights.len());
    let mut second = Vec::with_capacity(log_weights.len());
    for (w, &c) in log_weights.iter().zip(counts) {
        if c == 0 {
            continue;
        }
        let log_c = (c as f64).ln();
        first.push(w + log_c);
        second.push(2.0 * w + log_c);
    }
    let log_sum = log_sum_exp(&first);
    let log_sum_sq = log_sum_exp(&second);
    if !log_sum.is_finite() || !log_sum_sq.is_finite() {
        return 0.0;
    }
    (2.0 * log_sum - log_sum_sq).exp()
}

/// Batch-means effective sample size of a scalar trace.
///
/// Uses `floor(sqrt(n))` as the batch length. A constant trace has no
/// estimable autocorrelation and reports `n`. Traces shorter than 4 entries
/// also report `n`.
pub fn batch_means_ess(trace: &[f64]) -> f64 {
    let n = trace.len();
    if n < 4 {
        return n as f64;
    }
    let mean = trace.iter().sum::<f64>() / n as f64;
    let variance = trace.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    if variance <= f64::EPSILON {
        return n as f64;
    }

    let batch_len = (n as f64).sqrt().floor() as usize;
    let batches = n / batch_len;
    if batches < 2 {
        return n as f64;
    }
    let used = batches * batch_len;
    let used_mean = trace[..used].iter().sum::<f64>() / used as f64;
    let batch_var = trace[..used]
        .chunks_exact(batch_len)
        .map(|chunk| {
            let m = chunk.iter().sum::<f64>() / batch_len as f64;
            (m - used_mean).powi(2)
        })
        .sum::<f64>()
        / (batches - 1) as f64;

    if batch_var <= 0.0 {
        return n as f64;
    }
    let tau = batch_len as f64 * batch_var / variance;
    (n as f64 / tau).clamp(1.0, n as f64)
}

/// Summarize a boolean indicator trace (true = 1.0).
pub fn summarize_indicator_trace(trace: &[bool]) -> TraceSummary {
    let values: Vec<f64> = trace.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect();
    let n = values.len();
    let mean = if n == 0 {
        0.0
    } else {
        values.iter().sum::<f64>() / n as f64
    };
    TraceSummary {
        n,
        mean,
        ess: batch_means_ess(&values),
    }
}
