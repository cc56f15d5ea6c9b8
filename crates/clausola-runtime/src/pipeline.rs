//! Analysis pipeline: PDF → text → clauses → risk tiers → report.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::types::StageTracker;
use clausola_core::{
    AnalysisOutcome, ClausolaConfig, CostParams, Error, Result, Strategy,
    ANALYSIS_FAILED_DETAIL, EXTRACTION_FAILED_DETAIL,
};
use clausola_ingest::{
    ClauseFinder, HeuristicProfile, PdfExtractor, RiskRuleSet, RuleSegmenter, SentenceSegmenter,
    TextExtractor,
};
use clausola_llm::{LlmAnalyzer, LlmConfig};
use clausola_report::assemble;

/// How clauses get found and scored.
#[derive(Clone)]
enum Engine {
    Heuristic,
    Llm(LlmAnalyzer),
}

/// Shared analysis handle. Construct once, reuse for every document.
#[derive(Clone)]
pub struct Pipeline {
    extractor: Arc<dyn TextExtractor>,
    segmenter: Arc<dyn SentenceSegmenter>,
    finder: ClauseFinder,
    rules: RiskRuleSet,
    cost: CostParams,
    engine: Engine,
}

impl Pipeline {
    /// Heuristic pipeline with the PDF extractor and the rule-based segmenter.
    pub fn new(profile: HeuristicProfile, cost: CostParams) -> Self {
        Self {
            extractor: Arc::new(PdfExtractor::new()),
            segmenter: Arc::new(RuleSegmenter::new()),
            finder: profile.clause_finder(),
            rules: profile.rules,
            cost,
            engine: Engine::Heuristic,
        }
    }

    /// Build from configuration. The LLM client is only created for the LLM strategy.
    pub fn from_config(config: &ClausolaConfig) -> Result<Self> {
        config.cost.validate()?;
        let profile = HeuristicProfile::load_or_default(config.profile_path.as_deref())?;
        let mut pipeline = Self::new(profile, config.cost);

        if config.strategy == Strategy::Llm {
            let llm_config = LlmConfig::load(&config.data_paths.llm_config_file);
            pipeline = pipeline.with_llm(LlmAnalyzer::from_config(&llm_config)?);
        }

        info!(
            "Pipeline ready: strategy={}, {} keywords, efficiency={}, hourly_rate={}",
            pipeline.strategy(),
            pipeline.finder.keywords().len(),
            pipeline.cost.efficiency,
            pipeline.cost.hourly_rate
        );
        Ok(pipeline)
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_segmenter(mut self, segmenter: Arc<dyn SentenceSegmenter>) -> Self {
        self.segmenter = segmenter;
        self
    }

    /// Switch to the LLM strategy.
    pub fn with_llm(mut self, analyzer: LlmAnalyzer) -> Self {
        self.engine = Engine::Llm(analyzer);
        self
    }

    fn strategy(&self) -> Strategy {
        match self.engine {
            Engine::Heuristic => Strategy::Heuristic,
            Engine::Llm(_) => Strategy::Llm,
        }
    }

    pub fn cost_params(&self) -> &CostParams {
        &self.cost
    }

    /// Extract a PDF and analyze its text.
    ///
    /// Extraction failures, including a document with no text at all, end in
    /// the failed sentinel without running clause finding or cost estimation.
    /// Text made only of whitespace is not a failure.
    pub async fn analyze_path(&self, path: &Path) -> Result<AnalysisOutcome> {
        let mut tracker = StageTracker::new(path.display().to_string());

        let extractor = Arc::clone(&self.extractor);
        let owned = path.to_path_buf();
        let extracted = tokio::task::spawn_blocking(move || extractor.extract(&owned))
            .await
            .map_err(|e| Error::Internal(format!("Extraction task failed: {}", e)))?;

        let text = match extracted {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => {
                tracker.fail("no extractable text");
                return Ok(AnalysisOutcome::failed(EXTRACTION_FAILED_DETAIL));
            }
            Err(e) => {
                error!("Text extraction failed for {}: {}", path.display(), e);
                tracker.fail("extraction error");
                return Ok(AnalysisOutcome::failed(EXTRACTION_FAILED_DETAIL));
            }
        };
        tracker.advance();

        Ok(self.run(&text, &mut tracker).await)
    }

    /// Analyze already-extracted text with the configured strategy.
    pub async fn analyze_text(&self, text: &str) -> AnalysisOutcome {
        let mut tracker = StageTracker::new("text");
        if text.is_empty() {
            tracker.fail("empty text");
            return AnalysisOutcome::failed(EXTRACTION_FAILED_DETAIL);
        }
        tracker.advance();
        self.run(text, &mut tracker).await
    }

    async fn run(&self, text: &str, tracker: &mut StageTracker) -> AnalysisOutcome {
        debug!("Analyzing {} chars with {} strategy", text.len(), self.strategy());
        match &self.engine {
            Engine::Heuristic => self.run_heuristic(text, tracker),
            Engine::Llm(analyzer) => self.run_llm(analyzer, text, tracker).await,
        }
    }

    fn run_heuristic(&self, text: &str, tracker: &mut StageTracker) -> AnalysisOutcome {
        let candidates = self.finder.find(self.segmenter.as_ref(), text);
        tracker.advance();

        let clauses = self.rules.score_all(&candidates);
        tracker.advance();

        let report = assemble(clauses, &self.cost);
        tracker.advance();
        AnalysisOutcome::Ready(report)
    }

    async fn run_llm(
        &self,
        analyzer: &LlmAnalyzer,
        text: &str,
        tracker: &mut StageTracker,
    ) -> AnalysisOutcome {
        let analysis = match analyzer.analyze(text).await {
            Ok(analysis) => analysis,
            Err(e) => {
                error!("LLM analysis via {} failed: {}", analyzer.backend_name(), e);
                tracker.fail("analysis error");
                return AnalysisOutcome::failed(ANALYSIS_FAILED_DETAIL);
            }
        };
        tracker.advance();
        tracker.advance();

        let mut report = assemble(analysis.clauses, &self.cost);
        report.ai_opinion = analysis.ai_opinion;
        tracker.advance();
        AnalysisOutcome::Ready(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clausola_core::RiskLevel;
    use clausola_llm::CompletionBackend;
    use futures::future::BoxFuture;

    const CONTRACT: &str = "Art. 1 Oggetto. Il fornitore si impegna a consegnare i beni entro trenta giorni.\n\n\
        Il fornitore non assume nessuna responsabilità per ritardi dovuti a forza maggiore.\n\n\
        La garanzia è valida.\n\n\
        In caso di recesso anticipato il cliente deve rispettare obblighi onerosi di preavviso.\n\n\
        La garanzia copre i difetti di fabbricazione per ventiquattro mesi dalla consegna.";

    struct Canned(&'static str);

    impl CompletionBackend for Canned {
        fn complete<'a>(&'a self, _prompt: &'a str) -> BoxFuture<'a, Result<String>> {
            let reply = self.0.to_string();
            Box::pin(async move { Ok(reply) })
        }

        fn name(&self) -> String {
            "canned".into()
        }
    }

    fn heuristic() -> Pipeline {
        Pipeline::new(HeuristicProfile::default(), CostParams::default())
    }

    #[tokio::test]
    async fn test_heuristic_report() {
        let outcome = heuristic().analyze_text(CONTRACT).await;
        let report = outcome.report().unwrap();

        assert_eq!(report.summary.n_clauses, 3);
        assert_eq!(report.clauses[0].risk, RiskLevel::High);
        assert_eq!(report.clauses[1].risk, RiskLevel::Medium);
        assert_eq!(report.clauses[2].risk, RiskLevel::Low);
        assert_eq!(report.summary.saved_time_min, 36);
        assert_eq!(report.summary.saved_cost_eur, 60.0);
        assert!(report.is_consistent());
        assert!(report.ai_opinion.is_none());
    }

    #[tokio::test]
    async fn test_no_clauses_is_still_ready() {
        let outcome = heuristic()
            .analyze_text("Il presente documento descrive la consegna dei beni al cliente finale.")
            .await;
        let report = outcome.report().unwrap();
        assert_eq!(report.summary.n_clauses, 0);
        assert_eq!(report.summary.saved_time_min, 0);
        assert_eq!(report.summary.saved_cost_eur, 0.0);
    }

    #[tokio::test]
    async fn test_empty_text_fails_extraction() {
        let outcome = heuristic().analyze_text("").await;
        assert_eq!(outcome, AnalysisOutcome::failed(EXTRACTION_FAILED_DETAIL));
    }

    #[tokio::test]
    async fn test_whitespace_text_is_ready_without_clauses() {
        let outcome = heuristic().analyze_text("  \n ").await;
        let report = outcome.report().unwrap();
        assert_eq!(report.summary.n_clauses, 0);
        assert!(report.clauses.is_empty());
    }

    #[test]
    fn test_strategy_follows_analyzer() {
        assert_eq!(heuristic().strategy(), Strategy::Heuristic);
        let llm = heuristic().with_llm(LlmAnalyzer::new(Arc::new(Canned("{}"))));
        assert_eq!(llm.strategy(), Strategy::Llm);
    }

    #[tokio::test]
    async fn test_llm_report_recomputes_summary() {
        let answer = r#"{
            "summary": {"n_clauses": 7, "n_high": 7, "n_medium": 0, "n_low": 0},
            "AI_opinion": "Contratto sbilanciato.",
            "clauses": [
                {"risk": "HIGH", "text": "Nessuna responsabilità per il fornitore."},
                {"risk": "LOW", "text": "Garanzia di ventiquattro mesi."}
            ]
        }"#;
        let pipeline = heuristic().with_llm(LlmAnalyzer::new(Arc::new(Canned(answer))));

        let outcome = pipeline.analyze_text(CONTRACT).await;
        let report = outcome.report().unwrap();
        assert_eq!(report.summary.n_clauses, 2);
        assert_eq!(report.summary.n_high, 1);
        assert_eq!(report.summary.n_low, 1);
        assert_eq!(report.summary.saved_time_min, 24);
        assert_eq!(report.ai_opinion.as_deref(), Some("Contratto sbilanciato."));
        assert!(report.is_consistent());
    }

    #[tokio::test]
    async fn test_llm_garbage_is_failed_sentinel() {
        let pipeline = heuristic().with_llm(LlmAnalyzer::new(Arc::new(Canned("non è JSON"))));

        let outcome = pipeline.analyze_text(CONTRACT).await;
        assert_eq!(outcome, AnalysisOutcome::failed(ANALYSIS_FAILED_DETAIL));
        assert_eq!(outcome.status(), "failed");
    }
}
