//! Database schema SQL.

/// One row per uploaded document; `report_data` holds the outcome JSON.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    document_id TEXT PRIMARY KEY,
    status TEXT NOT NULL,
    report_data TEXT,
    uploaded_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_status ON documents(status);
"#;
