//! Dataset record and result types for smcgen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Verdict from the external verifier for one formal query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The premises entail the hypothesis.
    Entailed,
    /// The premises do not entail the hypothesis.
    NotEntailed,
    /// The query is degenerate (commonly an always-true hypothesis).
    Tautology,
    /// The verifier could not parse the query.
    SyntaxError,
}

impl Verdict {
    /// Whether this verdict is a usable dataset label.
    pub fn is_label(self) -> bool {
        matches!(self, Self::Entailed | Self::NotEntailed)
    }
}

/// One labeled training example.
///
/// Carries both surface forms of the same problem: the formal query that was
/// sent to the verifier and the natural-language premises/hypothesis pair
/// stored as training data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemRecord {
    /// Unique identifier for this record
    pub id: String,

    /// Formal query as submitted to the verifier
    pub formal: String,

    /// Natural-language premises (law, observations, announcements)
    pub premises: String,

    /// Natural-language hypothesis sentence
    pub hypothesis: String,

    /// Verifier verdict
    pub label: Verdict,

    /// Sanity-check regeneration attempts consumed before acceptance
    pub sanity_retries: u32,

    /// RNG seed that produced this problem
    pub seed: u64,

    /// Generation timestamp
    pub generated_at: DateTime<Utc>,

    /// Generation time in milliseconds, verifier calls included
    pub generation_time_ms: u64,
}

/// Statistics for a generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Records requested
    pub total_requested: usize,

    /// Records written to the output
    pub total_written: usize,

    /// Records labeled entailed
    pub entailed: usize,

    /// Records labeled not entailed
    pub not_entailed: usize,

    /// Degenerate (tautology) queries encountered
    pub degenerate: usize,

    /// Duplicates skipped
    pub duplicates: usize,

    /// Problems that failed generation or labeling
    pub failed: usize,

    /// Total runtime in seconds
    pub runtime_secs: f64,

    /// Written records per hour
    pub throughput_per_hour: f64,
}

impl RunStats {
    /// Calculate derived stats.
    pub fn finalize(&mut self) {
        if self.runtime_secs > 0.0 {
            self.throughput_per_hour = self.total_written as f64 / self.runtime_secs * 3600.0;
        }
    }
}
