//! Worker pool for parallel problem generation and labeling.
//!
//! Independent problems share no mutable state, so generation is
//! embarrassingly parallel: each task owns its own seeded RNG, making every
//! record reproducible from its seed alone. The verifier is the only
//! suspension point.

use crate::gen::ProblemGenerator;
use crate::logic::{Render, RenderMode};
use crate::models::{ProblemRecord, Result, SmcgenError};
use crate::verifier::Verifier;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::warn;
use uuid::Uuid;

/// Worker pool for parallel problem generation.
#[derive(Clone)]
pub struct WorkerPool {
    /// Verifier client (shared)
    verifier: Arc<dyn Verifier>,
    /// Problem generator (shared, stateless)
    generator: Arc<ProblemGenerator>,
    /// Semaphore for concurrency control
    semaphore: Arc<Semaphore>,
}

impl WorkerPool {
    /// Create a new worker pool.
    pub fn new(
        verifier: Arc<dyn Verifier>,
        generator: Arc<ProblemGenerator>,
        pool_size: usize,
    ) -> Self {
        Self {
            verifier,
            generator,
            semaphore: Arc::new(Semaphore::new(pool_size)),
        }
    }

    /// Generate and label a single record from a seed.
    pub async fn generate(&self, seed: u64) -> Result<ProblemRecord> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| SmcgenError::Internal("Semaphore closed".to_string()))?;

        let mut rng = StdRng::seed_from_u64(seed);
        let start = Instant::now();

        let checked = self
            .generator
            .generate_checked(&mut rng, self.verifier.as_ref())
            .await?;

        let formal = checked.problem.render(RenderMode::Formal);
        let label = self.verifier.verify(&formal).await?;

        Ok(ProblemRecord {
            id: Uuid::new_v4().to_string(),
            formal,
            premises: checked.problem.premises(RenderMode::Natural),
            hypothesis: checked.problem.hypothesis_text(RenderMode::Natural),
            label,
            sanity_retries: checked.sanity_retries,
            seed,
            generated_at: Utc::now(),
            generation_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Generate records for a batch of seeds in parallel.
    ///
    /// Returns (successful_records, failed_seeds).
    pub async fn generate_batch(&self, seeds: Vec<u64>) -> (Vec<ProblemRecord>, Vec<u64>) {
        let mut handles = Vec::with_capacity(seeds.len());

        for seed in seeds {
            let pool = self.clone();
            let handle = tokio::spawn(async move {
                let result = pool.generate(seed).await;
                (seed, result)
            });
            handles.push(handle);
        }

        let mut records = Vec::new();
        let mut failed = Vec::new();

        for handle in handles {
            match handle.await {
                Ok((_seed, Ok(record))) => records.push(record),
                Ok((seed, Err(e))) => {
                    warn!(seed = seed, error = %e, "Generation failed");
                    failed.push(seed);
                }
                Err(e) => {
                    warn!(error = %e, "Task panicked");
                }
            }
        }

        (records, failed)
    }
}
