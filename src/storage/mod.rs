//! Storage Layer - SQLite-backed persistence
//!
//! System of record is a single SQLite table:
//! - questions(id, question_text, created_at)

pub mod schema;
pub mod sqlite;

pub use sqlite::QuestionStore;
