//! dev-standup - A CLI tool that turns recent git commits into a standup summary.
//!
//! # Overview
//!
//! dev-standup walks one repository (or every repository under a directory),
//! collects the commits made in the last few hours, and asks a text-generation
//! backend (the OpenAI API or a local Ollama daemon) to summarize them in a
//! chosen mood.

pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod standup;

// Re-export commonly used types
pub use config::{Config, Provider};
pub use error::{CloneError, ConfigError, GitError, StandupError, SummarizeError};
pub use git::{CommitRecord, RepositoryTarget, ScanWindow};
pub use llm::{Mood, Summarizer};
pub use standup::{StandupOptions, StandupReport, run_standup};
