//! Database schema definitions

/// SQL to create the questions table
///
/// `AUTOINCREMENT` keeps ids from being reused after a clear.
/// `created_at` holds Unix milliseconds (UTC).
pub const CREATE_QUESTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS questions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    question_text TEXT NOT NULL CHECK (length(trim(question_text)) > 0),
    created_at INTEGER NOT NULL
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_questions_created ON questions(created_at)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_QUESTIONS_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
