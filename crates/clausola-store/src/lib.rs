//! Clausola Store: SQLite persistence of document status and reports.

pub mod schema;
pub mod sqlite;
pub mod types;

pub use sqlite::{ReportStore, STATUS_UPLOADED};
pub use types::*;
