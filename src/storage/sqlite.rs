//! SQLite storage implementation

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use tracing::{debug, info};

use super::schema;
use crate::question::Question;
use crate::{Error, Result};

/// How long a writer waits on a lock held by another process (CLI vs. server)
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed storage for submitted questions.
///
/// Cloning is cheap: every clone shares one connection, and the mutex
/// around it serializes writers so inserts never collide on ids.
#[derive(Clone)]
pub struct QuestionStore {
    conn: Arc<Mutex<Connection>>,
}

impl QuestionStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| Error::StorageUnavailable(format!("{}: {}", path.display(), e)))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| Error::StorageUnavailable(e.to_string()))?;

        let store = Self::from_connection(conn);
        store.initialize()?;
        info!("Opened question store at {}", path.display());
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::StorageUnavailable(e.to_string()))?;
        let store = Self::from_connection(conn);
        store.initialize()?;
        Ok(store)
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create the schema if absent. Safe to call on every start.
    pub fn initialize(&self) -> Result<()> {
        let conn = self.conn()?;
        for stmt in schema::all_schema_statements() {
            conn.execute(stmt, [])
                .map_err(|e| Error::StorageUnavailable(format!("schema setup failed: {}", e)))?;
        }
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::StorageUnavailable("connection lock poisoned".to_string()))
    }

    // ========== Question Operations ==========

    /// Insert a question and return its new id.
    ///
    /// The text is stored verbatim; only whitespace-only input is rejected.
    pub fn add_question(&self, text: &str) -> Result<i64> {
        if text.trim().is_empty() {
            return Err(Error::InvalidInput("question text is empty".to_string()));
        }

        let conn = self.conn()?;
        // Stamped under the lock so timestamp order follows id order.
        let created_at = Utc::now().timestamp_millis();
        conn.execute(
            "INSERT INTO questions (question_text, created_at) VALUES (?1, ?2)",
            params![text, created_at],
        )?;
        let id = conn.last_insert_rowid();
        debug!("Stored question {}", id);
        Ok(id)
    }

    /// All question texts, newest first
    pub fn list_questions(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT question_text FROM questions ORDER BY created_at DESC, id DESC",
        )?;
        let texts = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(texts)
    }

    /// The `limit` most recent question texts, newest first
    pub fn recent(&self, limit: usize) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT question_text FROM questions ORDER BY created_at DESC, id DESC LIMIT ?1",
        )?;
        let texts = stmt
            .query_map([limit as i64], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(texts)
    }

    /// Full records, newest first
    pub fn list_records(&self) -> Result<Vec<Question>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, question_text, created_at FROM questions ORDER BY created_at DESC, id DESC",
        )?;
        let questions = stmt
            .query_map([], Self::row_to_question)?
            .collect::<rusqlite::Result<Vec<Question>>>()?;
        Ok(questions)
    }

    /// Count all questions
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Delete every question. Returns how many were removed.
    pub fn clear_all(&self) -> Result<usize> {
        let removed = self.conn()?.execute("DELETE FROM questions", [])?;
        info!("Cleared {} question(s)", removed);
        Ok(removed)
    }

    /// Helper to convert a row to a Question
    fn row_to_question(row: &rusqlite::Row) -> rusqlite::Result<Question> {
        let millis: i64 = row.get(2)?;
        let created_at = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Integer,
                format!("timestamp out of range: {}", millis).into(),
            )
        })?;

        Ok(Question {
            id: row.get(0)?,
            text: row.get(1)?,
            created_at,
        })
    }
}
