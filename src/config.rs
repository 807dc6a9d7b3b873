//! Runtime configuration read from the environment.
//!
//! Variables (defaults in parentheses):
//! - `LLM_PROVIDER` (`ollama`): `openai` or `ollama`
//! - `OPENAI_API_KEY` (empty): required when the provider is `openai`
//! - `OPENAI_MODEL` (`gpt-3.5-turbo`)
//! - `OLLAMA_BASE_URL` (`http://localhost:11434`)
//! - `OLLAMA_MODEL` (`llama2`)
//! - `DEFAULT_MOOD` (`neutral`): unknown values mean `neutral`
//! - `DEFAULT_HOURS` (`24`)

use std::env;
use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use tracing::warn;

use crate::error::ConfigError;
use crate::llm::Mood;

pub const DEFAULT_PROVIDER: &str = "ollama";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama2";
pub const DEFAULT_HOURS: u32 = 24;

const PROVIDER_ENV_VAR: &str = "LLM_PROVIDER";
const OPENAI_API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";
const OPENAI_MODEL_ENV_VAR: &str = "OPENAI_MODEL";
const OLLAMA_BASE_URL_ENV_VAR: &str = "OLLAMA_BASE_URL";
const OLLAMA_MODEL_ENV_VAR: &str = "OLLAMA_MODEL";
const MOOD_ENV_VAR: &str = "DEFAULT_MOOD";
const HOURS_ENV_VAR: &str = "DEFAULT_HOURS";

/// Supported generation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    #[value(name = "openai")]
    OpenAi,
    Ollama,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Ollama => "ollama",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "ollama" => Ok(Provider::Ollama),
            _ => Err(ConfigError::UnknownProvider(s.to_string())),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Raw provider identifier; checked by [`Config::validate`].
    pub provider: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub default_mood: Mood,
    pub default_hours: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            openai_api_key: String::new(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            ollama_base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            default_mood: Mood::Neutral,
            default_hours: DEFAULT_HOURS,
        }
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Read `DEFAULT_HOURS`, warning on values that are not a whole number.
fn hours_from_env() -> u32 {
    match env::var(HOURS_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.trim().parse::<u32>() {
            Ok(hours) => hours,
            Err(_) => {
                warn!(
                    "Invalid {} value '{}', using default {}",
                    HOURS_ENV_VAR, v, DEFAULT_HOURS
                );
                DEFAULT_HOURS
            }
        },
        _ => DEFAULT_HOURS,
    }
}

impl Config {
    /// Build a configuration from environment variables.
    ///
    /// Never fails; problems surface later through [`Config::validate`].
    pub fn from_env() -> Self {
        Self {
            provider: var_or(PROVIDER_ENV_VAR, DEFAULT_PROVIDER).to_lowercase(),
            openai_api_key: var_or(OPENAI_API_KEY_ENV_VAR, ""),
            openai_model: var_or(OPENAI_MODEL_ENV_VAR, DEFAULT_OPENAI_MODEL),
            ollama_base_url: var_or(OLLAMA_BASE_URL_ENV_VAR, DEFAULT_OLLAMA_BASE_URL),
            ollama_model: var_or(OLLAMA_MODEL_ENV_VAR, DEFAULT_OLLAMA_MODEL),
            default_mood: Mood::from_name_lossy(&var_or(MOOD_ENV_VAR, "neutral")),
            default_hours: hours_from_env(),
        }
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider.as_str().to_string();
        self
    }

    pub fn provider(&self) -> Result<Provider, ConfigError> {
        self.provider.parse()
    }

    /// Every configuration problem, in a stable order.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        match self.provider() {
            Ok(Provider::OpenAi) if self.openai_api_key.trim().is_empty() => {
                problems.push(ConfigError::MissingApiKey.to_string());
            }
            Ok(_) => {}
            Err(e) => problems.push(e.to_string()),
        }

        problems
    }

    /// Fail with all problems at once if the configuration is unusable.
    pub fn validate(&self) -> Result<Provider, ConfigError> {
        let problems = self.problems();
        if !problems.is_empty() {
            return Err(ConfigError::Invalid(problems));
        }
        self.provider()
    }
}
