//! Prompt templates and the text-generation backends.

pub mod ollama;
pub mod openai;
pub mod prompt;
pub mod summarizer;

pub use ollama::OllamaSummarizer;
pub use openai::OpenAiSummarizer;
pub use prompt::{Mood, MoodPrompts, prompts_for, render_user_prompt};
pub use summarizer::{NOTHING_TO_SUMMARIZE, Summarizer};
