//! External LLM provider calls.
//!
//! One non-streaming request per prompt. Gemini and Anthropic
//! have their own request/response formats; OpenAI uses chat completions.

use futures::future::BoxFuture;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::analyzer::CompletionBackend;
use crate::types::{LlmProvider, ProviderSelection};
use clausola_core::{Error, Result};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";

/// HTTP completion backend for one configured provider.
pub struct HttpBackend {
    client: Client,
    selection: ProviderSelection,
    temperature: f64,
    max_tokens: usize,
}

impl HttpBackend {
    pub fn new(selection: ProviderSelection, temperature: f64, max_tokens: usize) -> Self {
        Self {
            client: Client::new(),
            selection,
            temperature,
            max_tokens,
        }
    }

    async fn send(&self, prompt: &str) -> Result<String> {
        let sel = &self.selection;
        let request = match sel.provider {
            LlmProvider::Gemini => self
                .client
                .post(format!("{}/{}:generateContent", GEMINI_BASE_URL, sel.model))
                .header("x-goog-api-key", &sel.api_key)
                .json(&json!({
                    "contents": [{"role": "user", "parts": [{"text": prompt}]}],
                    "generationConfig": {
                        "temperature": self.temperature,
                        "maxOutputTokens": self.max_tokens,
                    },
                })),
            LlmProvider::OpenAI => self
                .client
                .post(OPENAI_URL)
                .header("Authorization", format!("Bearer {}", sel.api_key))
                .json(&json!({
                    "model": sel.model,
                    "messages": [{"role": "user", "content": prompt}],
                    "temperature": self.temperature,
                    "max_tokens": self.max_tokens,
                })),
            LlmProvider::Anthropic => self
                .client
                .post(ANTHROPIC_URL)
                .header("x-api-key", &sel.api_key)
                .header("anthropic-version", "2023-06-01")
                .json(&json!({
                    "model": sel.model,
                    "messages": [{"role": "user", "content": prompt}],
                    "temperature": self.temperature,
                    "max_tokens": self.max_tokens,
                })),
        };

        debug!("Requesting analysis from {} with model {}", sel.provider, sel.model);

        let response = request
            .send()
            .await
            .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("{} API error {}: {}", sel.provider, status, body);
            return Err(Error::Http(format!("API error {}: {}", status, body)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::Http(format!("Unreadable response body: {}", e)))?;

        response_text(sel.provider, &body).ok_or_else(|| {
            Error::Analysis(format!("{} response carried no text", sel.provider))
        })
    }
}

impl CompletionBackend for HttpBackend {
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>> {
        Box::pin(self.send(prompt))
    }

    fn name(&self) -> String {
        format!("{}:{}", self.selection.provider, self.selection.model)
    }
}

/// Pull the generated text out of a provider response body.
pub fn response_text(provider: LlmProvider, body: &Value) -> Option<String> {
    let text = match provider {
        LlmProvider::Gemini => body["candidates"][0]["content"]["parts"]
            .as_array()?
            .iter()
            .filter_map(|p| p["text"].as_str())
            .collect::<String>(),
        LlmProvider::OpenAI => body["choices"][0]["message"]["content"].as_str()?.to_string(),
        LlmProvider::Anthropic => body["content"]
            .as_array()?
            .iter()
            .filter(|block| block["type"] == "text")
            .filter_map(|block| block["text"].as_str())
            .collect::<String>(),
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_response_text() {
        let body = json!({
            "candidates": [{"content": {"parts": [{"text": "{\"clauses\":"}, {"text": " []}"}]}}]
        });
        assert_eq!(
            response_text(LlmProvider::Gemini, &body).as_deref(),
            Some("{\"clauses\": []}")
        );
    }

    #[test]
    fn test_openai_response_text() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "{}"}}]});
        assert_eq!(response_text(LlmProvider::OpenAI, &body).as_deref(), Some("{}"));
    }

    #[test]
    fn test_anthropic_response_text() {
        let body = json!({
            "content": [
                {"type": "thinking", "thinking": "..."},
                {"type": "text", "text": "{\"clauses\": []}"}
            ]
        });
        assert_eq!(
            response_text(LlmProvider::Anthropic, &body).as_deref(),
            Some("{\"clauses\": []}")
        );
    }

    #[test]
    fn test_missing_text_is_none() {
        assert!(response_text(LlmProvider::Gemini, &json!({"candidates": []})).is_none());
        assert!(response_text(LlmProvider::OpenAI, &json!({"error": "quota"})).is_none());
        assert!(response_text(LlmProvider::Anthropic, &json!({"content": []})).is_none());
    }
}
