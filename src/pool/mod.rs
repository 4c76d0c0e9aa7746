//! Pool module - parallel problem generation workers.

mod worker;

pub use worker::*;
