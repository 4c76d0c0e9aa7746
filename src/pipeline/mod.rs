//! Pipeline module - dataset generation orchestration.

mod dataset;

pub use dataset::*;
