//! smcgen - Labeled epistemic-entailment dataset generation via SMCDEL.
//!
//! ## Architecture
//!
//! smcgen builds random dynamic epistemic logic problems and renders each one
//! twice from a single syntax tree:
//! - **Formal**: the SMCDEL query language (`VARS .. LAW .. OBS .. VALID? ..`)
//! - **Natural**: English premises and hypothesis for training data
//!
//! ## Pipeline
//!
//! Seeds → Worker Pool → Sanity Check → Verifier Label → Dedup → JSONL
//!
//! Every candidate problem is sanity-checked before labeling: a probe query
//! asks the verifier whether the announcements entail a variable no premise
//! mentions. An entailed probe means the announcement set is contradictory,
//! and the announcements are regenerated under a bounded retry budget.

pub mod gen;
pub mod logic;
pub mod models;
pub mod pipeline;
pub mod pool;
pub mod verifier;

// Re-exports for convenience
pub use gen::{sample_agents, CheckedProblem, ProblemGenerator};
pub use logic::{Expr, Knowledge, Law, Problem, Render, RenderMode, Statement};
pub use models::{Config, ProblemRecord, Result, RunStats, SmcgenError, Verdict};
pub use pipeline::DatasetPipeline;
pub use pool::WorkerPool;
pub use verifier::{CommandVerifier, HttpVerifier, Verifier};
