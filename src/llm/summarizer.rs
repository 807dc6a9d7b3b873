//! Backend selection.

use tracing::info;

use crate::config::{Config, Provider};
use crate::error::ConfigError;
use crate::git::CommitRecord;

use super::ollama::OllamaSummarizer;
use super::openai::OpenAiSummarizer;
use super::prompt::Mood;

/// Returned for empty input without contacting any backend.
pub const NOTHING_TO_SUMMARIZE: &str = "No commits to summarize.";

/// Sampling temperature shared by both backends.
pub(crate) const TEMPERATURE: f32 = 0.7;

/// Output length bound shared by both backends.
pub(crate) const MAX_OUTPUT_TOKENS: u32 = 500;

/// The configured generation backend.
#[derive(Debug, Clone)]
pub enum Summarizer {
    OpenAi(OpenAiSummarizer),
    Ollama(OllamaSummarizer),
}

impl Summarizer {
    /// Build the backend named by `config.provider`.
    ///
    /// Fails on an unknown provider identifier; the API key is checked by
    /// [`Config::validate`] beforehand.
    pub fn from_config(config: &Config, mood: Mood) -> Result<Self, ConfigError> {
        let prompts = mood.prompts();

        let summarizer = match config.provider()? {
            Provider::OpenAi => Summarizer::OpenAi(OpenAiSummarizer::new(
                config.openai_api_key.clone(),
                config.openai_model.clone(),
                prompts,
            )?),
            Provider::Ollama => Summarizer::Ollama(OllamaSummarizer::new(
                config.ollama_base_url.clone(),
                config.ollama_model.clone(),
                prompts,
            )?),
        };

        info!(
            "Using {} ({}) in {} mood",
            summarizer.provider(),
            summarizer.model(),
            mood
        );
        Ok(summarizer)
    }

    pub fn provider(&self) -> Provider {
        match self {
            Summarizer::OpenAi(_) => Provider::OpenAi,
            Summarizer::Ollama(_) => Provider::Ollama,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Summarizer::OpenAi(s) => s.model(),
            Summarizer::Ollama(s) => s.model(),
        }
    }

    /// Summarize `commits`.
    ///
    /// Always produces text: backend failures come back as a readable error
    /// message in place of the summary.
    pub async fn summarize(&self, commits: &[CommitRecord]) -> String {
        match self {
            Summarizer::OpenAi(s) => s.summarize(commits).await,
            Summarizer::Ollama(s) => s.summarize(commits).await,
        }
    }
}
