use tabled::{settings::Style, Table, Tabled};

use crate::question::Question;

#[derive(Tabled)]
struct QuestionRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Submitted")]
    submitted: String,
    #[tabled(rename = "Question")]
    text: String,
}

/// Render stored records as a rounded table; empty input renders nothing
pub fn questions_table(questions: &[Question]) -> String {
    if questions.is_empty() {
        return String::new();
    }

    let rows: Vec<QuestionRow> = questions
        .iter()
        .map(|q| QuestionRow {
            id: q.id,
            submitted: q.created_at_display(),
            text: q.text.clone(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}
