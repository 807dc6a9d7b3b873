//! Client for a local Ollama daemon's `/api/generate` endpoint.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, SummarizeError};
use crate::git::{CommitRecord, format_commits};

use super::prompt::MoodPrompts;
use super::summarizer::{MAX_OUTPUT_TOKENS, NOTHING_TO_SUMMARIZE, TEMPERATURE};

/// Request timeout for a single generation.
pub const OLLAMA_TIMEOUT_SECS: u64 = 60;

const BACKEND: &str = "Ollama";

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Summarizes commits through a locally running Ollama.
///
/// Ollama's generate API has no role channels, so the system instruction and
/// the user message are joined into one prompt.
#[derive(Debug, Clone)]
pub struct OllamaSummarizer {
    client: Client,
    base_url: String,
    model: String,
    prompts: MoodPrompts,
}

impl OllamaSummarizer {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        prompts: MoodPrompts,
    ) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(OLLAMA_TIMEOUT_SECS))
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            prompts,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Summarize `commits`, returning the generated text or a readable error.
    pub async fn summarize(&self, commits: &[CommitRecord]) -> String {
        if commits.is_empty() {
            return NOTHING_TO_SUMMARIZE.to_string();
        }

        let user_prompt = self.prompts.render_user(&format_commits(commits));
        let prompt = format!("{}\n\n{}", self.prompts.system, user_prompt);

        match self.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Ollama summary failed: {}", e);
                describe_error(&e)
            }
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, SummarizeError> {
        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));

        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: TEMPERATURE,
                num_predict: MAX_OUTPUT_TOKENS,
            },
        };

        debug!("POST {} (model {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    SummarizeError::OllamaUnreachable {
                        base_url: self.base_url.clone(),
                    }
                } else {
                    SummarizeError::Http(e)
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(SummarizeError::BadStatus {
                backend: BACKEND,
                status: status.as_u16(),
            });
        }

        let body: GenerateResponse = response.json().await?;
        Ok(body.response.trim().to_string())
    }
}

/// Turn a backend failure into the text shown in place of a summary.
fn describe_error(err: &SummarizeError) -> String {
    match err {
        SummarizeError::OllamaUnreachable { base_url } => format!(
            "Error: Cannot connect to Ollama. Make sure Ollama is running ({}) \
             or switch to OpenAI by setting LLM_PROVIDER=openai in .env",
            base_url
        ),
        SummarizeError::BadStatus { .. } => format!("Error: {}", err),
        _ => format!("Error generating summary: {}", err),
    }
}
