//! Heuristic profile: keywords, risk triggers and minimum clause length,
//! loadable from a JSON file.
//!
//! ```json
//! {
//!   "keywords": ["garanzia", "recesso"],
//!   "min_words": 6,
//!   "rules": { "HIGH": ["illimitato"], "MEDIUM": ["obblighi onerosi"], "LOW": [] }
//! }
//! ```
//! Missing fields fall back to the built-in defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clauses::{ClauseFinder, DEFAULT_KEYWORDS, DEFAULT_MIN_WORDS};
use crate::scoring::RiskRuleSet;
use clausola_core::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicProfile {
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    #[serde(default = "default_min_words")]
    pub min_words: usize,
    #[serde(default)]
    pub rules: RiskRuleSet,
}

fn default_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

fn default_min_words() -> usize {
    DEFAULT_MIN_WORDS
}

impl Default for HeuristicProfile {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            min_words: DEFAULT_MIN_WORDS,
            rules: RiskRuleSet::default(),
        }
    }
}

impl HeuristicProfile {
    /// Load a profile from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read profile {}: {}", path.display(), e))
        })?;
        let profile: HeuristicProfile = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid profile {}: {}", path.display(), e)))?;
        info!(
            "Loaded heuristic profile {}: {} keywords, min_words={}",
            path.display(),
            profile.keywords.len(),
            profile.min_words
        );
        Ok(profile)
    }

    /// Load from `path` when given, otherwise use the built-in profile.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn clause_finder(&self) -> ClauseFinder {
        ClauseFinder::new(&self.keywords, self.min_words)
    }
}
