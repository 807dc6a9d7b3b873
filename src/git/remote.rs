//! Hosted repository targets: URL detection and scoped shallow clones.
//!
//! Clones shell out to the system `git` binary, inheriting the user's
//! credential helpers and SSH agent. The clone lives in a temporary
//! directory owned by [`ClonedRepository`] and is removed when it drops.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex_lite::Regex;
use tempfile::TempDir;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::error::CloneError;

use super::walker::RepositoryTarget;

/// Upper bound on a single `git clone`.
pub const CLONE_TIMEOUT_SECS: u64 = 120;

static GITHUB_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^https?://github\.com/[\w-]+/[\w.-]+",
        r"^git@github\.com:[\w-]+/[\w.-]+\.git$",
        r"^github\.com/[\w-]+/[\w.-]+",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Whether `target` names a GitHub repository rather than a local path.
pub fn is_github_url(target: &str) -> bool {
    GITHUB_PATTERNS.iter().any(|re| re.is_match(target))
}

/// Rewrite SSH and scheme-less forms to `https://github.com/<owner>/<repo>.git`.
pub fn normalize_github_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    let https = if let Some(rest) = trimmed.strip_prefix("git@github.com:") {
        format!("https://github.com/{rest}")
    } else if trimmed.starts_with("github.com/") {
        format!("https://{trimmed}")
    } else {
        trimmed.to_string()
    };

    format!("{https}.git")
}

/// Last URL segment without its `.git` suffix.
pub fn repository_name_from_url(url: &str) -> String {
    let last = url
        .trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(url);
    let name = last.strip_suffix(".git").unwrap_or(last);

    if name.is_empty() {
        "repository".to_string()
    } else {
        name.to_string()
    }
}

/// Runs the actual clone.
///
/// This abstraction allows the orchestrator to be tested without network
/// access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CloneExecutor: Send + Sync {
    /// Clone `url` into `dest`, which does not exist yet.
    async fn clone_into(&self, url: &str, dest: &Path) -> Result<(), CloneError>;
}

/// Executor that runs `git clone --depth 1`.
pub struct GitCloneExecutor {
    timeout: Duration,
}

impl GitCloneExecutor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for GitCloneExecutor {
    fn default() -> Self {
        Self::new(Duration::from_secs(CLONE_TIMEOUT_SECS))
    }
}

#[async_trait]
impl CloneExecutor for GitCloneExecutor {
    async fn clone_into(&self, url: &str, dest: &Path) -> Result<(), CloneError> {
        if which::which("git").is_err() {
            return Err(CloneError::GitNotInstalled);
        }

        debug!("Running git clone --depth 1 {} {}", url, dest.display());

        let output = timeout(
            self.timeout,
            Command::new("git")
                .arg("clone")
                .arg("--depth")
                .arg("1")
                .arg(url)
                .arg(dest)
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| CloneError::Timeout(self.timeout.as_secs()))?
        .map_err(CloneError::SpawnFailed)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let detail = if stderr.is_empty() {
                format!("git exited with {}", output.status)
            } else {
                stderr
            };
            return Err(CloneError::Failed(detail));
        }

        Ok(())
    }
}

/// A clone that is deleted, together with its temporary directory, on drop.
#[derive(Debug)]
pub struct ClonedRepository {
    target: RepositoryTarget,
    dir: TempDir,
}

impl ClonedRepository {
    pub fn target(&self) -> &RepositoryTarget {
        &self.target
    }

    /// Directory that holds the clone and is removed on drop.
    pub fn temp_root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self) -> PathBuf {
        self.target.path.clone()
    }
}

/// Clone a GitHub repository into a fresh temporary directory.
pub async fn clone_repository(url: &str) -> Result<ClonedRepository, CloneError> {
    clone_repository_with(&GitCloneExecutor::default(), url).await
}

/// Clone with a caller-supplied executor.
///
/// The temporary directory is created first and dropped on any failure, so a
/// failed clone leaves nothing behind.
pub async fn clone_repository_with<E: CloneExecutor + ?Sized>(
    executor: &E,
    url: &str,
) -> Result<ClonedRepository, CloneError> {
    let normalized = normalize_github_url(url);
    let name = repository_name_from_url(&normalized);

    let dir = tempfile::Builder::new()
        .prefix("dev-standup-")
        .tempdir()
        .map_err(CloneError::TempDir)?;
    let path = dir.path().join(&name);

    executor.clone_into(&normalized, &path).await?;

    info!("Cloned {} into {}", normalized, path.display());

    Ok(ClonedRepository {
        target: RepositoryTarget::with_name(path, name),
        dir,
    })
}
