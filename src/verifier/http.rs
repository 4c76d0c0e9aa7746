//! HTTP adapter for the smcdelweb checker.
//!
//! The endpoint answers an `smcinput` form post with an HTML fragment; the
//! verdict is carried by LaTeX markers inside the result paragraph.

use crate::models::{Result, SmcgenError, Verdict, VerifierError};
use crate::verifier::Verifier;
use async_trait::async_trait;
use regex::Regex;
use std::time::Duration;
use tracing::debug;

const TAUTOLOGY: &str = r"\top";
const ENTAILMENT: &str = r"\vDash";
const NOT_ENTAILMENT: &str = r"\not\vDash";

/// Verifier backed by an smcdelweb endpoint.
pub struct HttpVerifier {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
    result_re: Regex,
}

impl HttpVerifier {
    /// Create a new HTTP verifier.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64, max_retries: u32) -> Result<Self> {
        let timeout = Duration::from_secs(timeout_secs);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SmcgenError::Network)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            max_retries,
            result_re: Regex::new(r"(?s)<p>.*</p>").unwrap(),
        })
    }

    /// Map the HTML fragment to a verdict.
    ///
    /// Marker order matters: the not-entailment marker contains the
    /// entailment marker as a substring. A response without a result
    /// paragraph or without any marker means the checker rejected the query.
    fn parse_response(&self, body: &str) -> Verdict {
        let Some(result) = self.result_re.find(body) else {
            return Verdict::SyntaxError;
        };
        let result = result.as_str();

        if result.contains(TAUTOLOGY) {
            Verdict::Tautology
        } else if result.contains(NOT_ENTAILMENT) {
            Verdict::NotEntailed
        } else if result.contains(ENTAILMENT) {
            Verdict::Entailed
        } else {
            Verdict::SyntaxError
        }
    }
}

#[async_trait]
impl Verifier for HttpVerifier {
    async fn verify(&self, query: &str) -> Result<Verdict> {
        let url = format!("{}/check", self.base_url);
        let mut last_error: Option<SmcgenError> = None;

        for attempt in 0..self.max_retries {
            let response = self
                .client
                .post(&url)
                .form(&[("smcinput", query)])
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(if e.is_timeout() {
                        SmcgenError::Timeout(self.timeout)
                    } else {
                        SmcgenError::Network(e)
                    });
                    if attempt < self.max_retries - 1 {
                        let backoff = Duration::from_secs(2u64.pow(attempt));
                        debug!(
                            attempt = attempt,
                            backoff_secs = backoff.as_secs(),
                            "Retrying verifier call after transport error"
                        );
                        tokio::time::sleep(backoff).await;
                    }
                    continue;
                }
            };

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                let error = SmcgenError::Verifier(VerifierError::Endpoint {
                    status: status.as_u16(),
                    message,
                });

                // Client errors will not improve on retry.
                if status.is_client_error() {
                    return Err(error);
                }

                last_error = Some(error);
                if attempt < self.max_retries - 1 {
                    tokio::time::sleep(Duration::from_secs(2u64.pow(attempt))).await;
                }
                continue;
            }

            let body = response.text().await.map_err(SmcgenError::Network)?;
            return Ok(self.parse_response(&body));
        }

        Err(last_error.unwrap_or_else(|| {
            SmcgenError::Verifier(VerifierError::MaxRetriesExceeded {
                attempts: self.max_retries,
                last_error: "Unknown error".to_string(),
            })
        }))
    }
}
