//! SQLite-backed report store.

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::schema::SCHEMA_SQL;
use crate::types::StoredDocument;
use clausola_core::{AnalysisOutcome, Error, Report, Result};

/// Status written when a document is stored before analysis finishes.
pub const STATUS_UPLOADED: &str = "uploaded";

/// Document status + report persistence.
pub struct ReportStore {
    conn: Mutex<Connection>,
}

impl ReportStore {
    /// Open or create the store.
    ///
    /// `db_dir` is the directory (e.g., `data/db/`). The file will be `db_dir/clausola.db`.
    pub fn open(db_dir: impl AsRef<Path>) -> Result<Self> {
        let db_dir = db_dir.as_ref();
        std::fs::create_dir_all(db_dir).map_err(|e| Error::Persistence(e.to_string()))?;
        let db_path = db_dir.join("clausola.db");

        let conn = Connection::open(&db_path).map_err(db_err)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(db_err)?;

        let store = Self::with_connection(conn)?;
        info!(
            "ReportStore initialized: {} documents, path={}",
            store.count_documents()?,
            db_path.display()
        );
        Ok(store)
    }

    /// In-memory store, mostly for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Persistence(format!("Schema init failed: {}", e)))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert or overwrite the status and report of a document.
    ///
    /// `uploaded_at` is set on first insert and kept on later updates.
    pub fn upsert(
        &self,
        document_id: &str,
        status: &str,
        report: Option<&serde_json::Value>,
    ) -> Result<()> {
        let report_json = report.map(serde_json::to_string).transpose()?;
        let now = chrono::Utc::now().to_rfc3339();

        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT INTO documents (document_id, status, report_data, uploaded_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(document_id) DO UPDATE SET
                status = excluded.status,
                report_data = excluded.report_data",
        )
        .map_err(db_err)?
        .execute(params![document_id, status, report_json, now])
        .map_err(db_err)?;

        debug!("Stored document {} with status {}", document_id, status);
        Ok(())
    }

    /// Persist an analysis outcome under its own status.
    pub fn save_outcome(&self, document_id: &str, outcome: &AnalysisOutcome) -> Result<()> {
        let value = serde_json::to_value(outcome)?;
        self.upsert(document_id, outcome.status(), Some(&value))
    }

    /// Replace a document's report and mark it ready.
    pub fn update_report(&self, document_id: &str, report: &Report) -> Result<()> {
        self.save_outcome(document_id, &AnalysisOutcome::Ready(report.clone()))?;
        info!("Report for document {} saved, status set to ready", document_id);
        Ok(())
    }

    /// Fetch one document.
    pub fn get(&self, document_id: &str) -> Result<Option<StoredDocument>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached(
                "SELECT document_id, status, report_data, uploaded_at
                 FROM documents WHERE document_id = ?1",
            )
            .map_err(db_err)?
            .query_row(params![document_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .optional()
            .map_err(db_err)?;

        let Some((document_id, status, report_data, uploaded_at)) = row else {
            return Ok(None);
        };
        let report = report_data
            .map(|json| serde_json::from_str(&json))
            .transpose()?;

        Ok(Some(StoredDocument {
            document_id,
            status,
            report,
            uploaded_at,
        }))
    }

    pub fn count_documents(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))
            .map_err(db_err)?;
        Ok(count as usize)
    }
}

fn db_err(e: rusqlite::Error) -> Error {
    Error::Persistence(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clausola_core::{Clause, RiskLevel, Summary};
    use tempfile::TempDir;

    fn test_store() -> (ReportStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn sample_report() -> Report {
        Report {
            summary: Summary {
                n_clauses: 1,
                n_low: 1,
                saved_time_min: 12,
                saved_cost_eur: 20.0,
                ..Default::default()
            },
            ai_opinion: None,
            clauses: vec![Clause::new(
                "La garanzia è valida per 12 mesi dalla data di acquisto.",
                RiskLevel::Low,
            )],
        }
    }

    #[test]
    fn test_upsert_and_get() {
        let (store, _dir) = test_store();
        store.upsert("doc-1", STATUS_UPLOADED, None).unwrap();

        let doc = store.get("doc-1").unwrap().unwrap();
        assert_eq!(doc.status, "uploaded");
        assert!(doc.report.is_none());
        assert!(doc.outcome().is_none());
        assert_eq!(store.count_documents().unwrap(), 1);
    }

    #[test]
    fn test_upsert_overwrites_and_keeps_timestamp() {
        let (store, _dir) = test_store();
        store.upsert("doc-1", STATUS_UPLOADED, None).unwrap();
        let first = store.get("doc-1").unwrap().unwrap();

        store.update_report("doc-1", &sample_report()).unwrap();
        let second = store.get("doc-1").unwrap().unwrap();

        assert_eq!(second.status, "ready");
        assert_eq!(second.uploaded_at, first.uploaded_at);
        assert_eq!(
            second.outcome(),
            Some(AnalysisOutcome::Ready(sample_report()))
        );
        assert_eq!(store.count_documents().unwrap(), 1);
    }

    #[test]
    fn test_failed_outcome_round_trip() {
        let store = ReportStore::open_in_memory().unwrap();
        let outcome = AnalysisOutcome::failed("Testo non estraibile.");
        store.save_outcome("doc-2", &outcome).unwrap();

        let doc = store.get("doc-2").unwrap().unwrap();
        assert_eq!(doc.status, "failed");
        assert_eq!(doc.report.as_ref().unwrap()["detail"], "Testo non estraibile.");
        assert_eq!(doc.outcome(), Some(outcome));
    }

    #[test]
    fn test_get_missing() {
        let (store, _dir) = test_store();
        assert!(store.get("nope").unwrap().is_none());
    }

    #[test]
    fn test_reopen_persists() {
        let dir = TempDir::new().unwrap();
        {
            let store = ReportStore::open(dir.path()).unwrap();
            store.update_report("doc-3", &sample_report()).unwrap();
        }
        let store = ReportStore::open(dir.path()).unwrap();
        assert_eq!(store.get("doc-3").unwrap().unwrap().status, "ready");
    }
}
