//! Random problem generation.

mod generator;
mod names;

pub use generator::*;
pub use names::*;
