//! Error types for smcgen.

use thiserror::Error;

/// Top-level error type for smcgen.
#[derive(Debug, Error)]
pub enum SmcgenError {
    // --- Expected failures ---
    #[error("Configuration error: {0}")]
    Config(#[from] super::ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    /// The verifier rejected a generated query as malformed. The query is
    /// embedded so the offending rendering can be inspected.
    #[error("Verifier rejected query as malformed: {0}")]
    InvalidQuery(String),

    /// The sanity-check loop exhausted its retry budget without producing a
    /// non-contradictory announcement set. Fatal for that problem instance.
    #[error("Sanity check failed after {attempts} attempts: announcements keep entailing an unmentioned variable")]
    SanityCheckExhausted { attempts: u32 },

    // --- Infrastructure failures ---
    #[error("Verifier error: {0}")]
    Verifier(#[from] VerifierError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // --- Invariant violations (bugs) ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Verifier transport errors.
#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("Verifier endpoint error (status {status}): {message}")]
    Endpoint { status: u16, message: String },

    #[error("Unrecognized verifier response: {0}")]
    InvalidResponse(String),

    #[error("Failed to launch verifier binary {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Verifier call failed after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

impl SmcgenError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Check if this error is a transient transport failure.
    ///
    /// Transient failures warrant a verifier retry; they are never a signal
    /// to regenerate the problem.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Network(_))
    }
}

/// Result type alias for smcgen.
pub type Result<T> = std::result::Result<T, SmcgenError>;
