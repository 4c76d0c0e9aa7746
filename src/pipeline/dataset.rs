//! Dataset generation pipeline.
//!
//! Pipeline flow:
//! Seeds → Worker Pool → Labeled Records → Dedup → JSONL

use crate::gen::ProblemGenerator;
use crate::models::{Config, Result, RunStats, SmcgenError, Verdict};
use crate::pool::WorkerPool;
use crate::verifier::Verifier;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Extra generation attempts allowed per requested record before the run
/// gives up. Guards against configurations where almost every draw is a
/// duplicate or degenerate.
const ATTEMPT_FACTOR: usize = 20;

/// Pipeline for generating a labeled entailment dataset.
pub struct DatasetPipeline {
    worker_pool: WorkerPool,
    config: Config,
}

impl DatasetPipeline {
    /// Create a new pipeline from configuration.
    pub fn new(config: Config, verifier: Arc<dyn Verifier>, agents: Vec<String>) -> Self {
        let generator = Arc::new(ProblemGenerator::new(&config.generator, agents));
        let worker_pool = WorkerPool::new(verifier, generator, config.workers.size);
        Self {
            worker_pool,
            config,
        }
    }

    /// Generate `count` records and write them to `output_path` as JSONL.
    ///
    /// Duplicate problems (same formal query text) are dropped, as are
    /// tautology-labeled records unless the output config keeps them, so the
    /// pipeline keeps drawing fresh seeds until `count` records are written
    /// or the attempt budget runs out.
    pub async fn run(&self, count: usize, output_path: &Path, base_seed: u64) -> Result<RunStats> {
        let start = Instant::now();

        info!(
            count = count,
            workers = self.config.workers.size,
            base_seed = base_seed,
            "Starting dataset pipeline"
        );

        // Setup progress bar
        let pb = ProgressBar::new(count as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({percent}%) {msg}")
                .unwrap()
                .progress_chars("##-"),
        );

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| SmcgenError::io("creating output directory", e))?;
            }
        }
        let output_file =
            File::create(output_path).map_err(|e| SmcgenError::io("creating output file", e))?;
        let mut writer = BufWriter::new(output_file);

        let mut stats = RunStats {
            total_requested: count,
            ..RunStats::default()
        };

        let mut seen: HashSet<String> = HashSet::new();
        let mut next_seed = base_seed;
        let batch_size = (self.config.workers.size * 2).max(10);
        let max_attempts = count.saturating_mul(ATTEMPT_FACTOR);
        let mut attempts = 0;

        while stats.total_written < count && attempts < max_attempts {
            let remaining = count - stats.total_written;
            let batch: Vec<u64> = (0..remaining.min(batch_size))
                .map(|i| next_seed + i as u64)
                .collect();
            next_seed += batch.len() as u64;
            attempts += batch.len();

            let (records, failed) = self.worker_pool.generate_batch(batch).await;
            stats.failed += failed.len();

            if !failed.is_empty() {
                warn!(count = failed.len(), "Some seeds failed generation");
            }

            for record in records {
                if !seen.insert(record.formal.clone()) {
                    stats.duplicates += 1;
                    continue;
                }

                match record.label {
                    Verdict::Entailed => stats.entailed += 1,
                    Verdict::NotEntailed => stats.not_entailed += 1,
                    Verdict::Tautology => {
                        stats.degenerate += 1;
                        if !self.config.output.include_degenerate {
                            continue;
                        }
                    }
                    Verdict::SyntaxError => {
                        warn!(formal = %record.formal, "Verifier rejected query syntax");
                        stats.failed += 1;
                        continue;
                    }
                }

                let json = serde_json::to_string(&record).map_err(|e| {
                    SmcgenError::Internal(format!("Failed to serialize record: {}", e))
                })?;
                writeln!(writer, "{}", json)
                    .map_err(|e| SmcgenError::io("writing output", e))?;
                stats.total_written += 1;
            }

            writer
                .flush()
                .map_err(|e| SmcgenError::io("flushing output", e))?;

            pb.set_position(stats.total_written.min(count) as u64);
            pb.set_message(format!(
                "entailed: {}, not entailed: {}, dupes: {}",
                stats.entailed, stats.not_entailed, stats.duplicates
            ));
        }

        writer
            .flush()
            .map_err(|e| SmcgenError::io("flushing output", e))?;
        pb.finish_with_message(format!("Done! {} records written", stats.total_written));

        if stats.total_written < count {
            warn!(
                written = stats.total_written,
                requested = count,
                "Attempt budget exhausted before reaching requested count"
            );
        }

        stats.runtime_secs = start.elapsed().as_secs_f64();
        stats.finalize();

        info!(
            written = stats.total_written,
            entailed = stats.entailed,
            not_entailed = stats.not_entailed,
            duplicates = stats.duplicates,
            degenerate = stats.degenerate,
            failed = stats.failed,
            throughput = format!("{:.0}/hr", stats.throughput_per_hour),
            "Dataset pipeline complete"
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Verdict;
    use async_trait::async_trait;
    use std::fs;
    use std::io::BufRead;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Verifier that probes pass and that labels queries alternately.
    struct AlternatingVerifier {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Verifier for AlternatingVerifier {
        async fn verify(&self, query: &str) -> Result<Verdict> {
            // Sanity-check probes declare the fresh variable 3 (the default
            // config has variables 1 and 2) and must come back unentailed for
            // the candidate problem to be kept.
            if query.starts_with("VARS 1,2,3") {
                return Ok(Verdict::NotEntailed);
            }
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(if n % 2 == 0 {
                Verdict::Entailed
            } else {
                Verdict::NotEntailed
            })
        }
    }

    fn test_pipeline() -> DatasetPipeline {
        let config = Config::default();
        let verifier = Arc::new(AlternatingVerifier {
            calls: AtomicUsize::new(0),
        });
        let agents = vec!["Alice".to_string(), "Bob".to_string()];
        DatasetPipeline::new(config, verifier, agents)
    }

    #[tokio::test]
    async fn writes_requested_number_of_unique_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");

        let stats = test_pipeline().run(5, &path, 1000).await.unwrap();
        assert_eq!(stats.total_written, 5);
        assert_eq!(stats.total_requested, 5);
        assert_eq!(stats.entailed + stats.not_entailed, stats.total_written);

        let file = fs::File::open(&path).unwrap();
        let lines: Vec<String> = std::io::BufReader::new(file)
            .lines()
            .map(|l| l.unwrap())
            .filter(|l| !l.trim().is_empty())
            .collect();
        assert_eq!(lines.len(), 5);

        let mut formals = HashSet::new();
        for line in &lines {
            let record: crate::models::ProblemRecord = serde_json::from_str(line).unwrap();
            assert!(record.label.is_label());
            assert!(formals.insert(record.formal));
        }
    }

    #[tokio::test]
    async fn creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.jsonl");

        let stats = test_pipeline().run(2, &path, 7).await.unwrap();
        assert_eq!(stats.total_written, 2);
        assert!(path.exists());
    }
}
