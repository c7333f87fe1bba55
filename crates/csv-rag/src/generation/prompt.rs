//! Prompt templates for CSV queries

use crate::types::Row;

/// Prompt builder for CSV queries
///
/// The whole table goes into one prompt. There is no chunking or
/// retrieval, so very large files can exceed the model's context window.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Render rows as text, one JSON object per line
    pub fn render_rows(rows: &[Row]) -> String {
        rows.iter()
            .map(Row::to_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Build the full query prompt
    pub fn build_query_prompt(rows: &[Row], question: &str) -> String {
        format!(
            "CSV Data:\n{}\n\nQuery: {}",
            Self::render_rows(rows),
            question
        )
    }
}
