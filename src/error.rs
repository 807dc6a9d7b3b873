//! Error types for dev-standup modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid LLM_PROVIDER: {0}. Must be 'openai' or 'ollama'")]
    UnknownProvider(String),

    #[error(
        "OpenAI API key not found. Set OPENAI_API_KEY in .env file or switch to Ollama by setting LLM_PROVIDER=ollama"
    )]
    MissingApiKey,

    #[error("Invalid configuration:\n{}", .0.join("\n"))]
    Invalid(Vec<String>),

    #[error("Failed to initialize LLM client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Errors from git operations.
///
/// These never leave the commit extractor: a repository that fails to scan
/// contributes no commits.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to walk commit history: {0}")]
    RevwalkError(#[source] git2::Error),

    #[error("Failed to parse commit: {0}")]
    ParseCommit(#[source] git2::Error),

    #[error("Commit {hash} has invalid timestamp (seconds={seconds})")]
    InvalidTimestamp { hash: String, seconds: i64 },
}

/// Errors from the text-generation backends.
///
/// Rendered into the summary text by `Summarizer::summarize`, never returned
/// to the caller.
#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("Cannot connect to Ollama at {base_url}")]
    OllamaUnreachable { base_url: String },

    #[error("{backend} returned status {status}")]
    BadStatus { backend: &'static str, status: u16 },

    #[error("{0} returned no choices")]
    EmptyResponse(&'static str),

    #[error("{0}")]
    Http(#[from] reqwest::Error),
}

/// Errors from cloning a hosted repository.
#[derive(Error, Debug)]
pub enum CloneError {
    #[error("git executable not found on PATH")]
    GitNotInstalled,

    #[error("Failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),

    #[error("Failed to spawn git: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Git clone failed: {0}")]
    Failed(String),

    #[error("Git clone timed out after {0} seconds")]
    Timeout(u64),
}

/// Fatal errors from a standup run.
#[derive(Error, Debug)]
pub enum StandupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("Failed to clone repository: {0}")]
    Clone(#[from] CloneError),

    #[error("Failed to resolve current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}
