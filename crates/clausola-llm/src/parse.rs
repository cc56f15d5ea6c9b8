//! Parsing and validation of the LLM's JSON answer.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::analyzer::LlmAnalysis;
use clausola_core::{Clause, Error, Result};

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\s*```[A-Za-z0-9_-]*\s*\n?(.*?)\s*```\s*$").unwrap());

/// The subset of the model's answer we rely on. Summary counts the model
/// may send are ignored; they are recomputed from the clause list.
#[derive(Debug, Deserialize)]
struct RawAnswer {
    #[serde(default)]
    status: Option<String>,
    #[serde(rename = "AI_opinion", default)]
    ai_opinion: Option<String>,
    clauses: Vec<Clause>,
}

/// Remove a surrounding Markdown code fence, if any.
pub fn strip_code_fence(raw: &str) -> &str {
    match CODE_FENCE.captures(raw).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => raw.trim(),
    }
}

/// Parse the model's answer into clauses and an optional opinion.
pub fn parse_analysis(raw: &str) -> Result<LlmAnalysis> {
    let body = strip_code_fence(raw);
    let answer: RawAnswer = match serde_json::from_str(body) {
        Ok(a) => a,
        Err(first_err) => {
            // Some models wrap the JSON in prose; retry on the outermost object.
            match (body.find('{'), body.rfind('}')) {
                (Some(start), Some(end)) if start < end => serde_json::from_str(&body[start..=end])
                    .map_err(|e| Error::Analysis(format!("Malformed JSON answer: {}", e)))?,
                _ => {
                    return Err(Error::Analysis(format!(
                        "Malformed JSON answer: {}",
                        first_err
                    )))
                }
            }
        }
    };

    if answer.status.as_deref() == Some("failed") {
        return Err(Error::Analysis("Model reported a failed analysis".into()));
    }

    let total = answer.clauses.len();
    let clauses: Vec<Clause> = answer
        .clauses
        .into_iter()
        .filter(|c| !c.text.trim().is_empty())
        .collect();
    if clauses.len() < total {
        warn!("Dropped {} clauses with empty text", total - clauses.len());
    }
    debug!("Parsed {} clauses from LLM answer", clauses.len());

    Ok(LlmAnalysis {
        clauses,
        ai_opinion: answer.ai_opinion.filter(|o| !o.trim().is_empty()),
    })
}
