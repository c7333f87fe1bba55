//! Prompt construction for completion requests

pub mod prompt;

pub use prompt::PromptBuilder;
