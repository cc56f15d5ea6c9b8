//! Clausola Report: savings estimate and report assembly.

pub mod assemble;
pub mod cost;

pub use assemble::{assemble, summarize};
pub use cost::{estimate_cost, CostEstimate};
