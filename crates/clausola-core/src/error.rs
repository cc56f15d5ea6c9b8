//! Error types for Clausola.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// PDF unreadable, or a page read failed.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// LLM call failed or its answer did not match the report shape.
    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
