//! Core data models for smcgen: configuration, errors, and dataset records.

mod config;
mod error;
mod record;

pub use config::*;
pub use error::*;
pub use record::*;
