//! Store types.

use serde::{Deserialize, Serialize};

use clausola_core::AnalysisOutcome;

/// A persisted document row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub document_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<serde_json::Value>,
    /// RFC 3339 timestamp of the first write.
    pub uploaded_at: String,
}

impl StoredDocument {
    /// Decode the stored report as an outcome, if it has one.
    pub fn outcome(&self) -> Option<AnalysisOutcome> {
        self.report
            .as_ref()
            .and_then(|r| serde_json::from_value(r.clone()).ok())
    }
}
