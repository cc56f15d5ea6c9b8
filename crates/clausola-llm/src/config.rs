//! LLM configuration loading and provider selection.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::types::{LlmProvider, ProviderSelection};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-20241022";

/// LLM configuration read from `llm-config.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// `auto`, `gemini`, `openai` or `anthropic`.
    #[serde(default = "default_preferred")]
    pub preferred_provider: String,
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

fn default_preferred() -> String {
    "auto".into()
}
fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.into()
}
fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.into()
}
fn default_anthropic_model() -> String {
    DEFAULT_ANTHROPIC_MODEL.into()
}
fn default_temperature() -> f64 {
    0.2
}
fn default_max_tokens() -> usize {
    8192
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            preferred_provider: default_preferred(),
            gemini_api_key: None,
            openai_api_key: None,
            anthropic_api_key: None,
            gemini_model: default_gemini_model(),
            openai_model: default_openai_model(),
            anthropic_model: default_anthropic_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl LlmConfig {
    /// Load config from file, falling back to env vars and defaults.
    pub fn load(config_path: &Path) -> Self {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// Same as [`load`](Self::load) with an explicit env lookup.
    pub fn load_with(config_path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config: LlmConfig = match std::fs::read_to_string(config_path)
            .ok()
            .and_then(|s| serde_json::from_str::<LlmConfig>(&s).ok())
        {
            Some(config) => {
                info!("Loaded LLM config from {}", config_path.display());
                config
            }
            None => LlmConfig::default(),
        };

        // Env vars as fallback for API keys
        if config.gemini_api_key.is_none() {
            config.gemini_api_key = lookup("GEMINI_API_KEY");
        }
        if config.openai_api_key.is_none() {
            config.openai_api_key = lookup("OPENAI_API_KEY");
        }
        if config.anthropic_api_key.is_none() {
            config.anthropic_api_key = lookup("ANTHROPIC_API_KEY");
        }

        config
    }

    /// Resolve which provider and model to use.
    pub fn resolve_provider(&self) -> Option<ProviderSelection> {
        let pick = |provider: LlmProvider, model: &str, key: &Option<String>| {
            key.as_ref()
                .filter(|k| !k.trim().is_empty())
                .map(|k| ProviderSelection {
                    provider,
                    model: model.to_string(),
                    api_key: k.clone(),
                })
        };

        // Explicit preference
        if self.preferred_provider != "auto" {
            return match self.preferred_provider.as_str() {
                "gemini" => pick(LlmProvider::Gemini, &self.gemini_model, &self.gemini_api_key),
                "openai" => pick(LlmProvider::OpenAI, &self.openai_model, &self.openai_api_key),
                "anthropic" => pick(
                    LlmProvider::Anthropic,
                    &self.anthropic_model,
                    &self.anthropic_api_key,
                ),
                _ => None,
            };
        }

        // Auto mode: Gemini > Anthropic > OpenAI
        pick(LlmProvider::Gemini, &self.gemini_model, &self.gemini_api_key)
            .or_else(|| {
                pick(
                    LlmProvider::Anthropic,
                    &self.anthropic_model,
                    &self.anthropic_api_key,
                )
            })
            .or_else(|| pick(LlmProvider::OpenAI, &self.openai_model, &self.openai_api_key))
    }
}
