//! Document service: upload copy, analysis, persistence.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::pipeline::Pipeline;
use clausola_core::{
    AnalysisOutcome, ClausolaConfig, Error, Report, Result, EXTRACTION_FAILED_DETAIL,
};
use clausola_report::summarize;
use clausola_store::{ReportStore, StoredDocument, STATUS_UPLOADED};

pub struct DocumentService {
    pipeline: Pipeline,
    uploads: PathBuf,
    store: Option<Arc<ReportStore>>,
}

impl DocumentService {
    pub fn new(
        pipeline: Pipeline,
        uploads: impl Into<PathBuf>,
        store: Option<ReportStore>,
    ) -> Self {
        Self {
            pipeline,
            uploads: uploads.into(),
            store: store.map(Arc::new),
        }
    }

    /// Pipeline plus, when `persist` is set, the SQLite store under `data/db/`.
    pub fn from_config(config: &ClausolaConfig, persist: bool) -> Result<Self> {
        let pipeline = Pipeline::from_config(config)?;
        let store = if persist {
            Some(ReportStore::open(&config.data_paths.db)?)
        } else {
            None
        };
        Ok(Self::new(pipeline, &config.data_paths.uploads, store))
    }

    pub fn store(&self) -> Option<&ReportStore> {
        self.store.as_deref()
    }

    /// Copy a PDF into the uploads directory under a fresh id, analyze it
    /// and persist the outcome.
    ///
    /// Returns the document id with the outcome. Failed analyses are still
    /// `Ok`; only I/O, persistence and internal errors are `Err`. A document
    /// whose analysis errors out is stored as failed before the error returns.
    pub async fn submit(&self, source: &Path) -> Result<(String, AnalysisOutcome)> {
        let document_id = Uuid::new_v4().to_string();

        let stored_path = {
            let uploads = self.uploads.clone();
            let source = source.to_path_buf();
            let store = self.store.clone();
            let id = document_id.clone();
            run_blocking(move || {
                std::fs::create_dir_all(&uploads)?;
                let stored_path = uploads.join(format!("{}.pdf", id));
                std::fs::copy(&source, &stored_path)?;
                if let Some(store) = &store {
                    store.upsert(&id, STATUS_UPLOADED, None)?;
                }
                Ok(stored_path)
            })
            .await?
        };
        info!(
            "Document {} uploaded from {}",
            document_id,
            source.display()
        );

        let outcome = match self.pipeline.analyze_path(&stored_path).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Analysis of document {} aborted: {}", document_id, e);
                let failed = AnalysisOutcome::failed(EXTRACTION_FAILED_DETAIL);
                if let Err(save_err) = self.persist(&document_id, failed).await {
                    warn!(
                        "Could not mark document {} as failed: {}",
                        document_id, save_err
                    );
                }
                return Err(e);
            }
        };

        self.persist(&document_id, outcome.clone()).await?;
        info!("Document {} finished with status {}", document_id, outcome.status());
        Ok((document_id, outcome))
    }

    async fn persist(&self, document_id: &str, outcome: AnalysisOutcome) -> Result<()> {
        let Some(store) = self.store.clone() else {
            return Ok(());
        };
        let id = document_id.to_string();
        run_blocking(move || store.save_outcome(&id, &outcome)).await
    }

    /// Look up a stored document.
    pub fn get(&self, document_id: &str) -> Result<StoredDocument> {
        self.require_store()?
            .get(document_id)?
            .ok_or_else(|| Error::NotFound(format!("Document {}", document_id)))
    }

    /// Store a manually prepared report for a document and mark it ready.
    ///
    /// Summary counts that disagree with the clause list are recomputed,
    /// together with the savings estimate.
    pub fn import_report(&self, document_id: &str, mut report: Report) -> Result<Report> {
        let store = self.require_store()?;
        if !report.is_consistent() {
            warn!(
                "Imported report for {} has inconsistent summary, recomputing",
                document_id
            );
            report.summary = summarize(&report.clauses, self.pipeline.cost_params());
        }
        store.update_report(document_id, &report)?;
        Ok(report)
    }

    fn require_store(&self) -> Result<&ReportStore> {
        self.store()
            .ok_or_else(|| Error::Config("No report store configured".into()))
    }
}

/// Run file and database work off the async executor.
async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| Error::Internal(format!("Blocking task failed: {}", e)))?
}
