//! Question records
//!
//! A question is created once by the store and never mutated afterwards.
//! The only way a question leaves the store is a full clear.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single submitted question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Store-assigned id, unique and never reused
    pub id: i64,
    /// Submitted text, kept verbatim
    pub text: String,
    /// Insert time, used for newest-first ordering
    pub created_at: DateTime<Utc>,
}

impl Question {
    /// Creation time formatted for display
    pub fn created_at_display(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
