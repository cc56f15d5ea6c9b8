//! Rule-based risk scoring.
//!
//! A clause is lower-cased and tested against the HIGH triggers, then the
//! MEDIUM triggers; the first substring hit decides the tier. Anything that
//! matches neither is LOW.

use serde::{Deserialize, Serialize};
use tracing::debug;

use clausola_core::{Clause, RiskLevel};

/// Built-in HIGH triggers.
pub const DEFAULT_HIGH_TRIGGERS: &[&str] = &[
    "illimitato",
    "senza limiti",
    "nessuna responsabilità per",
    "penale x%",
];

/// Built-in MEDIUM triggers.
pub const DEFAULT_MEDIUM_TRIGGERS: &[&str] = &["limitazioni forti", "obblighi onerosi"];

/// Tier → ordered substring triggers. LOW is the fallback and has none.
///
/// Triggers are stored lower-cased so they compare against lower-cased text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RuleSetFile")]
pub struct RiskRuleSet {
    #[serde(rename = "HIGH")]
    high: Vec<String>,
    #[serde(rename = "MEDIUM")]
    medium: Vec<String>,
}

/// On-disk shape: `{"HIGH": [...], "MEDIUM": [...], "LOW": []}`.
#[derive(Deserialize)]
struct RuleSetFile {
    #[serde(rename = "HIGH", default)]
    high: Vec<String>,
    #[serde(rename = "MEDIUM", default)]
    medium: Vec<String>,
}

impl From<RuleSetFile> for RiskRuleSet {
    fn from(file: RuleSetFile) -> Self {
        Self::new(file.high, file.medium)
    }
}

impl RiskRuleSet {
    pub fn new<S: AsRef<str>>(
        high: impl IntoIterator<Item = S>,
        medium: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            high: normalize(high),
            medium: normalize(medium),
        }
    }

    pub fn triggers(&self, risk: RiskLevel) -> &[String] {
        match risk {
            RiskLevel::High => &self.high,
            RiskLevel::Medium => &self.medium,
            RiskLevel::Low => &[],
        }
    }

    /// Classify one clause. HIGH wins over MEDIUM; LOW is the default.
    pub fn score(&self, clause_text: &str) -> RiskLevel {
        let lowered = clause_text.to_lowercase();
        for tier in [RiskLevel::High, RiskLevel::Medium] {
            if let Some(trigger) = self.triggers(tier).iter().find(|t| lowered.contains(t.as_str())) {
                debug!("Trigger {:?} -> {}", trigger, tier);
                return tier;
            }
        }
        RiskLevel::Low
    }

    /// Attach a risk tier to every candidate, preserving order.
    pub fn score_all<S: AsRef<str>>(&self, candidates: &[S]) -> Vec<Clause> {
        candidates
            .iter()
            .map(|text| Clause::new(text.as_ref(), self.score(text.as_ref())))
            .collect()
    }
}

impl Default for RiskRuleSet {
    fn default() -> Self {
        Self::new(
            DEFAULT_HIGH_TRIGGERS.iter().copied(),
            DEFAULT_MEDIUM_TRIGGERS.iter().copied(),
        )
    }
}

fn normalize<S: AsRef<str>>(triggers: impl IntoIterator<Item = S>) -> Vec<String> {
    triggers
        .into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_trigger() {
        let rules = RiskRuleSet::default();
        assert_eq!(
            rules.score("Il fornitore assume una responsabilità ILLIMITATA verso terzi."),
            RiskLevel::High
        );
    }

    #[test]
    fn test_high_takes_precedence_over_medium() {
        let rules = RiskRuleSet::default();
        let text = "Il cliente accetta obblighi onerosi e una garanzia senza limiti di durata.";
        assert_eq!(rules.score(text), RiskLevel::High);
    }

    #[test]
    fn test_medium_trigger() {
        let rules = RiskRuleSet::default();
        assert_eq!(
            rules.score("Sono previste limitazioni forti alla cessione del contratto."),
            RiskLevel::Medium
        );
    }

    #[test]
    fn test_default_is_low() {
        let rules = RiskRuleSet::default();
        assert_eq!(
            rules.score("La garanzia è valida per 12 mesi dalla data di acquisto."),
            RiskLevel::Low
        );
        assert_eq!(rules.score(""), RiskLevel::Low);
    }

    #[test]
    fn test_triggers_are_lowercased() {
        let rules = RiskRuleSet::new(["Penale X%"], []);
        assert_eq!(rules.triggers(RiskLevel::High), ["penale x%"]);
        assert_eq!(rules.score("Si applica una PENALE X% sul totale."), RiskLevel::High);
        assert!(rules.triggers(RiskLevel::Low).is_empty());
    }

    #[test]
    fn test_rules_from_json() {
        let rules: RiskRuleSet = serde_json::from_str(
            r#"{"HIGH": ["Esclusiva"], "MEDIUM": ["rinnovo tacito"], "LOW": []}"#,
        )
        .unwrap();
        assert_eq!(rules.score("Patto di esclusiva decennale."), RiskLevel::High);
        assert_eq!(
            rules.score("È previsto il rinnovo tacito annuale."),
            RiskLevel::Medium
        );
    }

    #[test]
    fn test_score_all_preserves_order() {
        let rules = RiskRuleSet::default();
        let clauses = rules.score_all(&["testo illimitato", "testo normale"]);
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].risk, RiskLevel::High);
        assert_eq!(clauses[1].text, "testo normale");
        assert_eq!(clauses[1].risk, RiskLevel::Low);
    }
}
