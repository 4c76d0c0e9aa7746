//! Logic module - formula model, dual-format renderer, and problem aggregate.

mod expr;
mod problem;
mod render;

pub use expr::*;
pub use problem::*;
pub use render::*;
