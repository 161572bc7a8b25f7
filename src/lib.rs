//! # Seminar QA - shared question queue for live seminars
//!
//! Attendees submit free-text questions; an admin reviews the queue, clears
//! it, and can ask a chat-completion model for a categorized summary.
//!
//! Seminar QA provides:
//! - SQLite-backed question storage shared safely across concurrent callers
//! - A one-shot summary request against an OpenAI-compatible endpoint
//! - A small JSON API and CLI that drive both

pub mod auth;
pub mod config;
pub mod question;
pub mod server;
pub mod storage;
pub mod summary;
pub mod ui;

// Re-exports for convenient access
pub use question::Question;
pub use storage::QuestionStore;
pub use summary::SummaryRequester;

/// Result type alias for Seminar QA operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Seminar QA operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing API key: enter an API key to generate a summary")]
    MissingCredential,

    #[error("Summary request failed: {0}")]
    SummaryRequestFailed(String),
}

impl Error {
    /// Stable category name shown alongside the message
    pub fn kind(&self) -> &'static str {
        match self {
            Error::StorageUnavailable(_) => "storage_unavailable",
            Error::Storage(_) => "storage",
            Error::InvalidInput(_) => "invalid_input",
            Error::MissingCredential => "missing_credential",
            Error::SummaryRequestFailed(_) => "summary_request_failed",
        }
    }
}
