//! Subprocess adapter for a local `smcdel` binary.
//!
//! The query is piped to `smcdel -` on stdin; the checker prints `True` or
//! `False` for decidable queries and complains on stderr otherwise. This
//! transport cannot distinguish tautologies from plain entailment.

use crate::models::{Result, SmcgenError, Verdict, VerifierError};
use crate::verifier::Verifier;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Verifier backed by a local smcdel binary.
pub struct CommandVerifier {
    binary: PathBuf,
    timeout: Duration,
    max_retries: u32,
}

impl CommandVerifier {
    /// Create a new subprocess verifier.
    pub fn new(binary: impl Into<PathBuf>, timeout_secs: u64, max_retries: u32) -> Self {
        Self {
            binary: binary.into(),
            timeout: Duration::from_secs(timeout_secs),
            max_retries,
        }
    }

    fn parse_output(stdout: &str) -> Verdict {
        if stdout.contains("True") {
            Verdict::Entailed
        } else if stdout.contains("False") {
            Verdict::NotEntailed
        } else {
            Verdict::SyntaxError
        }
    }

    async fn run_once(&self, query: &str) -> Result<Verdict> {
        let mut child = Command::new(&self.binary)
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                SmcgenError::Verifier(VerifierError::Spawn {
                    binary: self.binary.display().to_string(),
                    source: e,
                })
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(query.as_bytes())
                .await
                .map_err(|e| SmcgenError::io("writing query to smcdel stdin", e))?;
            stdin
                .write_all(b"\n")
                .await
                .map_err(|e| SmcgenError::io("writing query to smcdel stdin", e))?;
            // Dropping stdin closes the pipe so smcdel sees EOF.
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| SmcgenError::Timeout(self.timeout))?
            .map_err(|e| SmcgenError::io("waiting for smcdel", e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(Self::parse_output(&stdout))
    }
}

#[async_trait]
impl Verifier for CommandVerifier {
    async fn verify(&self, query: &str) -> Result<Verdict> {
        let mut last_error: Option<SmcgenError> = None;

        for attempt in 0..self.max_retries {
            match self.run_once(query).await {
                Ok(verdict) => return Ok(verdict),
                Err(e) if e.is_retryable() && attempt < self.max_retries - 1 => {
                    let backoff = Duration::from_secs(2u64.pow(attempt));
                    debug!(
                        attempt = attempt,
                        backoff_secs = backoff.as_secs(),
                        error = %e,
                        "Retrying smcdel invocation"
                    );
                    last_error = Some(e);
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            SmcgenError::Verifier(VerifierError::MaxRetriesExceeded {
                attempts: self.max_retries,
                last_error: "Unknown error".to_string(),
            })
        }))
    }
}
