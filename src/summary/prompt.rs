//! Prompt contract for the categorized summary

/// System instruction sent ahead of every summary request
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant designed to summarize and categorize questions from a seminar for educators.";

/// Fixed instruction that precedes the question list in the user message
pub const USER_INSTRUCTION: &str = "Analyze the following questions from a teachers' seminar on AI. \
Group them into logical categories (e.g., 'Classroom Implementation', 'Ethical Concerns'). \
Under each category, list the full, original questions as bullet points. \
Ensure the full context of every question is preserved. Here are the questions:";

/// One `- question` line per question, in the order given.
pub fn question_list(questions: &[String]) -> String {
    questions
        .iter()
        .map(|q| format!("- {}", q))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the user message: instruction, blank line, then the bullet list
pub fn user_prompt(questions: &[String]) -> String {
    format!("{}\n\n{}", USER_INSTRUCTION, question_list(questions))
}
