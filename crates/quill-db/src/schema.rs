use rusqlite::Connection;
use quill_core::QuillResult;

pub fn run_migrations(conn: &Connection) -> QuillResult<()> {
    conn.execute_batch(SCHEMA_V1)
        .map_err(|e| quill_core::QuillError::Database(e.to_string()))?;
    Ok(())
}

const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    label TEXT NOT NULL,
    source TEXT NOT NULL,
    added_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS analyses (
    id TEXT PRIMARY KEY,
    score INTEGER NOT NULL,
    max_score INTEGER NOT NULL,
    confidence REAL NOT NULL,
    label TEXT NOT NULL,
    features_json TEXT NOT NULL,
    analyzed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_label ON documents(label);
CREATE INDEX IF NOT EXISTS idx_analyses_analyzed_at ON analyses(analyzed_at);
"#;
