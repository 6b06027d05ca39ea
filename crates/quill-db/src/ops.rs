use std::str::FromStr;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use quill_core::{
    AnalysisRecord, Label, QuillError, QuillResult, ReferenceDocument, ScoreResult,
};
use rusqlite::{params, Connection};
use serde::Serialize;
use uuid::Uuid;

pub struct QuillDb {
    conn: Arc<Mutex<Connection>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DbStats {
    pub document_count: usize,
    pub ai_document_count: usize,
    pub human_document_count: usize,
    pub analysis_count: usize,
}

impl QuillDb {
    pub fn open(path: &str) -> QuillResult<Self> {
        let conn = Connection::open(path).map_err(|e| QuillError::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA busy_timeout=5000;",
        )
        .map_err(|e| QuillError::Database(e.to_string()))?;
        crate::schema::run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> QuillResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| QuillError::Database(e.to_string()))?;
        crate::schema::run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn clone_handle(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }

    fn with_conn<F, T>(&self, f: F) -> QuillResult<T>
    where
        F: FnOnce(&Connection) -> Result<T, rusqlite::Error>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| QuillError::Database(e.to_string()))?;
        f(&conn).map_err(|e| QuillError::Database(e.to_string()))
    }

    pub fn insert_document(&self, content: &str, label: Label, source: &str) -> QuillResult<String> {
        let id = Uuid::new_v4().to_string();
        let added_at = Utc::now().to_rfc3339();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO documents (id, content, label, source, added_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, content, label.as_str(), source, added_at],
            )?;
            Ok(())
        })?;
        Ok(id)
    }

    pub fn get_documents(&self, limit: usize) -> QuillResult<Vec<ReferenceDocument>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, content, label, source, added_at FROM documents ORDER BY added_at DESC LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit as i64], |row| {
                let label_str: String = row.get(2)?;
                let added_str: String = row.get(4)?;
                Ok(ReferenceDocument {
                    id: row.get(0)?,
                    content: row.get(1)?,
                    label: Label::from_str(&label_str).unwrap_or(Label::Human),
                    source: row.get(3)?,
                    added_at: chrono::DateTime::parse_from_rfc3339(&added_str)
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or_else(|_| Utc::now()),
                })
            })?;
            rows.collect()
        })
    }

    pub fn insert_analysis(&self, result: &ScoreResult) -> QuillResult<String> {
        let id = Uuid::new_v4().to_string();
        let features_json = serde_json::to_string(&result.features)
            .map_err(|e| QuillError::Database(e.to_string()))?;
        let analyzed_at = Utc::now().to_rfc3339();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO analyses (id, score, max_score, confidence, label, features_json, analyzed_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id,
                    result.score,
                    result.max_score,
                    result.confidence,
                    result.label.as_str(),
                    features_json,
                    analyzed_at
                ],
            )?;
            Ok(())
        })?;
        Ok(id)
    }

    pub fn get_analyses(&self, limit: usize) -> QuillResult<Vec<AnalysisRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, score, max_score, confidence, label, features_json, analyzed_at FROM analyses ORDER BY analyzed_at DESC LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit as i64], |row| {
                let label_str: String = row.get(4)?;
                let features_str: String = row.get(5)?;
                let analyzed_str: String = row.get(6)?;
                let features = serde_json::from_str(&features_str).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        5,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
                Ok(AnalysisRecord {
                    id: row.get(0)?,
                    score: row.get(1)?,
                    max_score: row.get(2)?,
                    confidence: row.get(3)?,
                    label: Label::from_str(&label_str).unwrap_or(Label::Human),
                    features,
                    analyzed_at: chrono::DateTime::parse_from_rfc3339(&analyzed_str)
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or_else(|_| Utc::now()),
                })
            })?;
            rows.collect()
        })
    }

    pub fn stats(&self) -> QuillResult<DbStats> {
        self.with_conn(|conn| {
            let document_count: i64 =
                conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
            let ai_document_count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM documents WHERE label = 'AI'",
                [],
                |row| row.get(0),
            )?;
            let human_document_count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM documents WHERE label = 'Human'",
                [],
                |row| row.get(0),
            )?;
            let analysis_count: i64 =
                conn.query_row("SELECT COUNT(*) FROM analyses", [], |row| row.get(0))?;
            Ok(DbStats {
                document_count: document_count as usize,
                ai_document_count: ai_document_count as usize,
                human_document_count: human_document_count as usize,
                analysis_count: analysis_count as usize,
            })
        })
    }
}
