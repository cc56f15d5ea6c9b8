//! Clausola Core: shared report types, configuration, errors.

pub mod config;
pub mod error;
pub mod types;

pub use config::{ClausolaConfig, CostParams, DataPaths, Strategy};
pub use error::{Error, Result};
pub use types::*;
