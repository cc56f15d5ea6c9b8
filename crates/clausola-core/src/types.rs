//! Report types shared by every analysis strategy.
//!
//! The JSON field names (`tempo_risparmiato_min`, `AI_opinion`, ...) are the
//! wire contract consumed by the front end and stored in the database.

use serde::{Deserialize, Serialize};

/// Detail returned when no text can be pulled out of the uploaded PDF.
pub const EXTRACTION_FAILED_DETAIL: &str = "Testo non estraibile.";
/// Detail returned when the LLM call or its JSON answer fails.
pub const ANALYSIS_FAILED_DETAIL: &str = "Errore di analisi con l'IA.";

/// Estimated legal/financial exposure of a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "HIGH", alias = "high", alias = "High")]
    High,
    #[serde(rename = "MEDIUM", alias = "medium", alias = "Medium")]
    Medium,
    #[serde(rename = "LOW", alias = "low", alias = "Low")]
    Low,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HIGH" => Ok(Self::High),
            "MEDIUM" => Ok(Self::Medium),
            "LOW" => Ok(Self::Low),
            other => Err(crate::Error::Config(format!("Unknown risk level: {}", other))),
        }
    }
}

/// A span of contract text flagged as legally significant, with its risk tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    pub text: String,
    pub risk: RiskLevel,
    /// Why the clause is risky. Only the LLM strategy fills this in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Clause {
    pub fn new(text: impl Into<String>, risk: RiskLevel) -> Self {
        Self {
            text: text.into(),
            risk,
            explanation: None,
        }
    }
}

/// Per-tier counts plus the estimated savings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub n_clauses: usize,
    pub n_high: usize,
    pub n_medium: usize,
    pub n_low: usize,
    #[serde(rename = "tempo_risparmiato_min", default)]
    pub saved_time_min: u64,
    #[serde(rename = "costo_risparmiato_eur", default)]
    pub saved_cost_eur: f64,
}

/// Structured risk report for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub summary: Summary,
    #[serde(rename = "AI_opinion", default, skip_serializing_if = "Option::is_none")]
    pub ai_opinion: Option<String>,
    #[serde(default)]
    pub clauses: Vec<Clause>,
}

impl Report {
    /// Count clauses in a given tier.
    pub fn count(&self, risk: RiskLevel) -> usize {
        self.clauses.iter().filter(|c| c.risk == risk).count()
    }

    /// Whether the summary counts agree with the clause list.
    pub fn is_consistent(&self) -> bool {
        let s = &self.summary;
        s.n_clauses == self.clauses.len()
            && s.n_high == self.count(RiskLevel::High)
            && s.n_medium == self.count(RiskLevel::Medium)
            && s.n_low == self.count(RiskLevel::Low)
            && s.n_high + s.n_medium + s.n_low == s.n_clauses
    }
}

/// Result handed back to callers: a full report or a failure sentinel.
/// Never a partial report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalysisOutcome {
    Ready(Report),
    Failed { detail: String },
}

impl AnalysisOutcome {
    pub fn failed(detail: impl Into<String>) -> Self {
        Self::Failed {
            detail: detail.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn report(&self) -> Option<&Report> {
        match self {
            Self::Ready(report) => Some(report),
            Self::Failed { .. } => None,
        }
    }

    /// Status string as stored alongside the report.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Ready(_) => "ready",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Document-level processing stage.
///
/// `Uploaded → TextExtracted → ClausesFound → RiskScored → ReportReady`,
/// with `Failed` reachable from any non-terminal stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStage {
    Uploaded,
    TextExtracted,
    ClausesFound,
    RiskScored,
    ReportReady,
    Failed,
}

impl DocumentStage {
    /// The stage that follows on success, `None` once terminal.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Uploaded => Some(Self::TextExtracted),
            Self::TextExtracted => Some(Self::ClausesFound),
            Self::ClausesFound => Some(Self::RiskScored),
            Self::RiskScored => Some(Self::ReportReady),
            Self::ReportReady | Self::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::ReportReady | Self::Failed)
    }
}

impl std::fmt::Display for DocumentStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Uploaded => "uploaded",
            Self::TextExtracted => "text_extracted",
            Self::ClausesFound => "clauses_found",
            Self::RiskScored => "risk_scored",
            Self::ReportReady => "report_ready",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_outcome_shape() {
        let outcome = AnalysisOutcome::failed(EXTRACTION_FAILED_DETAIL);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "failed", "detail": "Testo non estraibile."})
        );
    }

    #[test]
    fn test_ready_outcome_shape() {
        let report = Report {
            summary: Summary {
                n_clauses: 1,
                n_high: 1,
                saved_time_min: 12,
                saved_cost_eur: 20.0,
                ..Default::default()
            },
            ai_opinion: None,
            clauses: vec![Clause::new("Responsabilità illimitata del fornitore.", RiskLevel::High)],
        };
        let json = serde_json::to_value(AnalysisOutcome::Ready(report)).unwrap();

        assert_eq!(json["status"], "ready");
        assert_eq!(json["summary"]["tempo_risparmiato_min"], 12);
        assert_eq!(json["summary"]["costo_risparmiato_eur"], 20.0);
        assert_eq!(json["clauses"][0]["risk"], "HIGH");
        assert!(json["clauses"][0].get("explanation").is_none());
        assert!(json.get("AI_opinion").is_none());
    }

    #[test]
    fn test_risk_level_accepts_lowercase() {
        let clause: Clause =
            serde_json::from_str(r#"{"text": "x", "risk": "medium"}"#).unwrap();
        assert_eq!(clause.risk, RiskLevel::Medium);
        assert_eq!("low".parse::<RiskLevel>().unwrap(), RiskLevel::Low);
        assert!("severe".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn test_stage_progression() {
        let mut stage = DocumentStage::Uploaded;
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            stage = next;
            seen.push(stage);
        }
        assert_eq!(seen.len(), 5);
        assert_eq!(stage, DocumentStage::ReportReady);
        assert!(DocumentStage::Failed.is_terminal());
        assert_eq!(DocumentStage::ClausesFound.to_string(), "clauses_found");
    }
}
