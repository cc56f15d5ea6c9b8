//! Runtime types.

use serde::Serialize;
use tracing::{info, warn};

use clausola_core::DocumentStage;

/// Follows one document through its processing stages.
#[derive(Debug, Clone, Serialize)]
pub struct StageTracker {
    label: String,
    stage: DocumentStage,
    history: Vec<DocumentStage>,
}

impl StageTracker {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            stage: DocumentStage::Uploaded,
            history: vec![DocumentStage::Uploaded],
        }
    }

    pub fn stage(&self) -> DocumentStage {
        self.stage
    }

    /// Every stage visited so far, in order.
    pub fn history(&self) -> &[DocumentStage] {
        &self.history
    }

    /// Move to the next stage. Terminal stages stay where they are.
    pub fn advance(&mut self) -> DocumentStage {
        if let Some(next) = self.stage.next() {
            info!("{}: {} -> {}", self.label, self.stage, next);
            self.stage = next;
            self.history.push(next);
        }
        self.stage
    }

    pub fn fail(&mut self, reason: &str) {
        if self.stage.is_terminal() {
            return;
        }
        warn!("{}: {} -> failed ({})", self.label, self.stage, reason);
        self.stage = DocumentStage::Failed;
        self.history.push(DocumentStage::Failed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_run() {
        let mut tracker = StageTracker::new("doc");
        while !tracker.stage().is_terminal() {
            tracker.advance();
        }
        assert_eq!(tracker.stage(), DocumentStage::ReportReady);
        assert_eq!(tracker.history().len(), 5);
        assert_eq!(tracker.advance(), DocumentStage::ReportReady);
    }

    #[test]
    fn test_fail_is_terminal() {
        let mut tracker = StageTracker::new("doc");
        tracker.advance();
        tracker.fail("boom");
        tracker.fail("again");
        tracker.advance();
        assert_eq!(
            tracker.history(),
            &[
                DocumentStage::Uploaded,
                DocumentStage::TextExtracted,
                DocumentStage::Failed
            ]
        );
    }
}
