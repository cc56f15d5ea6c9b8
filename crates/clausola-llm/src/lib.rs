//! LLM-backed contract analysis.
//!
//! One non-streaming request per document to Gemini, OpenAI or Anthropic.
//! The answer is expected to be a JSON report; fences are stripped and the
//! clause list is validated before it reaches the report assembler.

pub mod analyzer;
pub mod config;
pub mod parse;
pub mod prompt;
pub mod providers;
pub mod types;

pub use analyzer::{CompletionBackend, LlmAnalysis, LlmAnalyzer};
pub use config::LlmConfig;
pub use providers::HttpBackend;
pub use types::*;
