//! Report rendering: text, JSON and markdown.
//!
//! The text format is one line per algorithm, `<pTrue> <pFalse> <Label>`,
//! likelihood weighting first, then Gibbs, then the exact filter when it
//! was requested.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use um_common::OutputFormat;

use crate::config::ConfigSnapshot;
use crate::inference::{GibbsRun, InferenceSummary, LikelihoodRun, Posterior};

pub const LIKELIHOOD_LABEL: &str = "Likelihood";
pub const GIBBS_LABEL: &str = "Gibbs";
pub const EXACT_LABEL: &str = "Exact";

/// Complete result of one `run` invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceReport {
    pub schema_version: String,
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub chain_length: usize,
    /// Seed of the random source; rerunning with it reproduces the report.
    pub seed: u64,
    pub likelihood: LikelihoodRun,
    pub gibbs: GibbsRun,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact: Option<Posterior>,
    pub config: ConfigSnapshot,
}

impl InferenceReport {
    pub fn new(
        run_id: impl Into<String>,
        chain_length: usize,
        seed: u64,
        summary: InferenceSummary,
        config: ConfigSnapshot,
    ) -> Self {
        InferenceReport {
            schema_version: um_common::SCHEMA_VERSION.to_string(),
            run_id: run_id.into(),
            generated_at: Utc::now(),
            chain_length,
            seed,
            likelihood: summary.likelihood,
            gibbs: summary.gibbs,
            exact: summary.exact,
            config,
        }
    }

    /// Labelled posteriors in report order.
    pub fn posteriors(&self) -> Vec<(&'static str, Posterior)> {
        let mut rows = vec![
            (LIKELIHOOD_LABEL, self.likelihood.posterior),
            (GIBBS_LABEL, self.gibbs.posterior),
        ];
        if let Some(exact) = self.exact {
            rows.push((EXACT_LABEL, exact));
        }
        rows
    }

    pub fn render(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Json => serde_json::to_string_pretty(self).map(|s| s + "\n"),
            OutputFormat::Md => Ok(self.render_markdown()),
        }
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        for (label, posterior) in self.posteriors() {
            let _ = writeln!(out, "{} {}", posterior, label);
        }
        out
    }

    fn render_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Umbrella inference `{}`\n", self.run_id);
        let _ = writeln!(
            out,
            "Chain length {}, seed {}, weighting `{}`.\n",
            self.chain_length, self.seed, self.likelihood.mode
        );
        let _ = writeln!(out, "| Algorithm | P(rain) | P(no rain) |");
        let _ = writeln!(out, "|---|---|---|");
        for (label, p) in self.posteriors() {
            let _ = writeln!(out, "| {} | {:.6} | {:.6} |", label, p.p_true, p.p_false);
        }

        let _ = writeln!(out, "\n## Diagnostics\n");
        let _ = writeln!(out, "| Algorithm | Samples | Effective | Notes |");
        let _ = writeln!(out, "|---|---|---|---|");
        let _ = writeln!(
            out,
            "| {} | {} | {:.1} | {} distinct sequences |",
            LIKELIHOOD_LABEL,
            self.likelihood.samples,
            self.likelihood.effective_sample_size,
            self.likelihood.distinct_samples
        );
        let _ = writeln!(
            out,
            "| {} | {} | {:.1} | burn-in {}, {:.1} sweeps{} |",
            GIBBS_LABEL,
            self.gibbs.counted,
            self.gibbs.trace.ess,
            self.gibbs.burn_in,
            self.gibbs.sweeps,
            if self.gibbs.head_prior { "" } else { ", no head prior" }
        );

        if let Some(path) = &self.config.model_path {
            let _ = writeln!(
                out,
                "\nModel: `{}` ({}, sha256 `{}`)",
                path.display(),
                self.config.model_source,
                self.config.model_hash.as_deref().unwrap_or("-")
            );
        } else {
            let _ = writeln!(out, "\nModel: built-in defaults");
        }
        out
    }
}
