//! LLM analysis service handle.

use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{info, warn};

use crate::config::LlmConfig;
use crate::parse::parse_analysis;
use crate::prompt::build_prompt;
use crate::providers::HttpBackend;
use clausola_core::{Clause, Error, Result};

/// Anything that turns a prompt into generated text.
pub trait CompletionBackend: Send + Sync {
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>>;

    /// Identifier used in logs.
    fn name(&self) -> String;
}

/// Clauses and opinion returned by the model, before summary/cost assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmAnalysis {
    pub clauses: Vec<Clause>,
    pub ai_opinion: Option<String>,
}

/// Built once at startup and shared across documents.
#[derive(Clone)]
pub struct LlmAnalyzer {
    backend: Arc<dyn CompletionBackend>,
}

impl LlmAnalyzer {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Build an HTTP-backed analyzer from the resolved provider.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let selection = config.resolve_provider().ok_or_else(|| {
            Error::Config(
                "No LLM provider configured: set GEMINI_API_KEY, ANTHROPIC_API_KEY or OPENAI_API_KEY"
                    .into(),
            )
        })?;
        info!("LLM analyzer using {} ({})", selection.provider, selection.model);
        let backend = HttpBackend::new(selection, config.temperature, config.max_tokens);
        Ok(Self::new(Arc::new(backend)))
    }

    pub fn backend_name(&self) -> String {
        self.backend.name()
    }

    /// Send the document to the model and parse its report.
    ///
    /// Transport and parse failures both surface as [`Error::Analysis`].
    pub async fn analyze(&self, document_text: &str) -> Result<LlmAnalysis> {
        let prompt = build_prompt(document_text);
        let raw = self.backend.complete(&prompt).await.map_err(|e| {
            warn!("LLM call via {} failed: {}", self.backend.name(), e);
            match e {
                Error::Analysis(msg) => Error::Analysis(msg),
                other => Error::Analysis(other.to_string()),
            }
        })?;
        let analysis = parse_analysis(&raw).map_err(|e| {
            warn!("LLM answer from {} rejected: {}", self.backend.name(), e);
            e
        })?;
        info!(
            "LLM analysis via {}: {} clauses",
            self.backend.name(),
            analysis.clauses.len()
        );
        Ok(analysis)
    }
}
