//! Chat-completions client for the hosted OpenAI API.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, SummarizeError};
use crate::git::{CommitRecord, format_commits};

use super::prompt::MoodPrompts;
use super::summarizer::{MAX_OUTPUT_TOKENS, NOTHING_TO_SUMMARIZE, TEMPERATURE};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Request timeout for a single completion, matching the official SDK default.
pub const OPENAI_TIMEOUT_SECS: u64 = 600;

const BACKEND: &str = "OpenAI";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Summarizes commits through `POST {base_url}/chat/completions`.
#[derive(Clone)]
pub struct OpenAiSummarizer {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    prompts: MoodPrompts,
}

impl fmt::Debug for OpenAiSummarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiSummarizer")
            .field("client", &self.client)
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenAiSummarizer {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        prompts: MoodPrompts,
    ) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(OPENAI_TIMEOUT_SECS))
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            prompts,
        })
    }

    /// Point the client at an OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Summarize `commits`, returning the generated text or a readable error.
    pub async fn summarize(&self, commits: &[CommitRecord]) -> String {
        if commits.is_empty() {
            return NOTHING_TO_SUMMARIZE.to_string();
        }

        let user_prompt = self.prompts.render_user(&format_commits(commits));

        match self.complete(&user_prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("OpenAI summary failed: {}", e);
                format!("Error generating summary: {}", e)
            }
        }
    }

    async fn complete(&self, user_prompt: &str) -> Result<String, SummarizeError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: self.prompts.system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_OUTPUT_TOKENS,
        };

        debug!("POST {} (model {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SummarizeError::BadStatus {
                backend: BACKEND,
                status: status.as_u16(),
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default().trim().to_string())
            .ok_or(SummarizeError::EmptyResponse(BACKEND))
    }
}
