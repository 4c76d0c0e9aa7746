//! External verifier adapters.
//!
//! Truth evaluation is delegated entirely to SMCDEL. The core talks to it
//! through the `Verifier` trait; two transports are provided, a local
//! subprocess and the public smcdelweb HTTP endpoint. Both wrap the call with
//! an explicit timeout and a bounded retry policy for transient transport
//! failures, distinct from the generator's sanity-check regeneration loop.

mod command;
mod http;

pub use command::*;
pub use http::*;

use crate::models::{Result, Verdict};
use async_trait::async_trait;

/// External entailment checker.
#[async_trait]
pub trait Verifier: Send + Sync {
    /// Decide a formal query.
    ///
    /// Malformed queries come back as `Verdict::SyntaxError`, not as an
    /// error: transport errors are reserved for infrastructure failures.
    async fn verify(&self, query: &str) -> Result<Verdict>;
}
