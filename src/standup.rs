//! End-to-end standup run: validate, resolve the target, scan, summarize.

use std::path::PathBuf;

use tracing::info;

use crate::config::{Config, Provider};
use crate::error::StandupError;
use crate::git::commits::{AuthorFilter, RepositoryCommits, ScanWindow};
use crate::git::remote::{CloneExecutor, ClonedRepository, GitCloneExecutor, clone_repository_with};
use crate::git::walker::DEFAULT_MAX_DEPTH;
use crate::git::{RepositoryTarget, is_github_url, scan_repository, scan_search_root};
use crate::llm::{Mood, Summarizer};

/// Per-run choices, usually from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandupOptions {
    pub mood: Mood,
    pub hours: u32,
    /// Discover and scan every repository under the target.
    pub all_repos: bool,
    /// Local path or GitHub URL; the working directory when `None`.
    pub repo: Option<String>,
    pub all_authors: bool,
}

impl StandupOptions {
    /// Options using the configured mood and lookback.
    pub fn from_config(config: &Config) -> Self {
        Self {
            mood: config.default_mood,
            hours: config.default_hours,
            all_repos: false,
            repo: None,
            all_authors: false,
        }
    }

    pub fn window(&self) -> ScanWindow {
        ScanWindow::last_hours(self.hours, AuthorFilter::from_all_authors(self.all_authors))
    }
}

/// Where a run looks for commits.
#[derive(Debug)]
pub enum ScanTarget {
    Local(RepositoryTarget),
    /// Removed from disk when dropped.
    Cloned(ClonedRepository),
}

impl ScanTarget {
    pub fn repository(&self) -> &RepositoryTarget {
        match self {
            ScanTarget::Local(target) => target,
            ScanTarget::Cloned(cloned) => cloned.target(),
        }
    }

    pub fn is_clone(&self) -> bool {
        matches!(self, ScanTarget::Cloned(_))
    }
}

/// Generated text for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSummary {
    pub name: String,
    pub commit_count: usize,
    pub summary: String,
}

/// Outcome of a run. `summaries` is in discovery order and empty when no
/// commits were found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandupReport {
    pub target_name: String,
    pub provider: Provider,
    pub summaries: Vec<RepoSummary>,
}

impl StandupReport {
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}

/// Resolve `repo` into something scannable, cloning GitHub URLs.
pub async fn resolve_target<E: CloneExecutor + ?Sized>(
    repo: Option<&str>,
    executor: &E,
) -> Result<ScanTarget, StandupError> {
    match repo {
        Some(url) if is_github_url(url) => {
            info!("Cloning {}", url);
            let cloned = clone_repository_with(executor, url).await?;
            Ok(ScanTarget::Cloned(cloned))
        }
        Some(path) => {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(StandupError::PathNotFound(path));
            }
            Ok(ScanTarget::Local(RepositoryTarget::new(path)))
        }
        None => {
            let cwd = std::env::current_dir().map_err(StandupError::CurrentDir)?;
            Ok(ScanTarget::Local(RepositoryTarget::new(cwd)))
        }
    }
}

/// Scan the target alone, or every repository beneath it.
///
/// Only repositories with at least one commit are returned.
pub fn collect_commits(
    target: &RepositoryTarget,
    all_repos: bool,
    window: &ScanWindow,
) -> Vec<RepositoryCommits> {
    if all_repos {
        return scan_search_root(&target.path, DEFAULT_MAX_DEPTH, window);
    }

    let commits = scan_repository(target, window);
    if commits.is_empty() {
        Vec::new()
    } else {
        vec![RepositoryCommits {
            target: target.clone(),
            commits,
        }]
    }
}

/// Summarize each repository in order with one backend instance.
pub async fn summarize_all(
    summarizer: &Summarizer,
    repositories: &[RepositoryCommits],
) -> Vec<RepoSummary> {
    let mut summaries = Vec::with_capacity(repositories.len());

    for repo in repositories {
        info!(
            "Summarizing {} commits from {}",
            repo.commits.len(),
            repo.target.name
        );
        let summary = summarizer.summarize(&repo.commits).await;
        summaries.push(RepoSummary {
            name: repo.target.name.clone(),
            commit_count: repo.commits.len(),
            summary,
        });
    }

    summaries
}

/// Run a standup with the default `git` clone executor.
pub async fn run_standup(
    config: &Config,
    options: &StandupOptions,
) -> Result<StandupReport, StandupError> {
    run_standup_with(config, options, &GitCloneExecutor::default()).await
}

/// Run a standup.
///
/// Configuration is validated before any filesystem or network work. A
/// cloned target is deleted when this returns, whether it succeeded or not.
pub async fn run_standup_with<E: CloneExecutor + ?Sized>(
    config: &Config,
    options: &StandupOptions,
    executor: &E,
) -> Result<StandupReport, StandupError> {
    let provider = config.validate()?;

    let target = resolve_target(options.repo.as_deref(), executor).await?;
    let repository = target.repository();

    let window = options.window();
    let repositories = collect_commits(repository, options.all_repos, &window);

    let mut report = StandupReport {
        target_name: repository.name.clone(),
        provider,
        summaries: Vec::new(),
    };

    if repositories.is_empty() {
        info!("No commits in the last {} hours", options.hours);
        return Ok(report);
    }

    let summarizer = Summarizer::from_config(config, options.mood)?;
    report.summaries = summarize_all(&summarizer, &repositories).await;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use git2::{Repository, Signature};

    use super::*;
    use crate::error::CloneError;
    use crate::git::remote::MockCloneExecutor;

    fn options(repo: Option<String>) -> StandupOptions {
        StandupOptions {
            repo,
            ..StandupOptions::from_config(&Config::default())
        }
    }

    /// Initialize `dest` as a repository with one fresh commit.
    fn init_with_commit(dest: &std::path::Path) {
        let repo = Repository::init(dest).expect("failed to init repo");
        std::fs::write(dest.join("README.md"), "hello").expect("failed to write file");

        let mut index = repo.index().expect("failed to open index");
        index
            .add_path(std::path::Path::new("README.md"))
            .expect("failed to add file");
        index.write().expect("failed to write index");
        let tree_id = index.write_tree().expect("failed to write tree");
        let tree = repo.find_tree(tree_id).expect("failed to find tree");
        let sig = Signature::now("Test User", "test@example.com").expect("failed to create sig");

        repo.commit(Some("HEAD"), &sig, &sig, "docs: add readme", &tree, &[])
            .expect("failed to commit");
    }

    #[test]
    fn test_options_from_config() {
        let config = Config {
            default_mood: Mood::Heroic,
            default_hours: 72,
            ..Config::default()
        };
        let options = StandupOptions::from_config(&config);
        assert_eq!(options.mood, Mood::Heroic);
        assert_eq!(options.hours, 72);
        assert!(!options.all_repos);
        assert!(!options.all_authors);
    }

    #[tokio::test]
    async fn test_missing_local_path_is_fatal() {
        let executor = MockCloneExecutor::new();
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let missing = dir.path().join("gone");
        let missing_arg = missing.display().to_string();

        let result = resolve_target(Some(missing_arg.as_str()), &executor).await;
        assert!(matches!(result, Err(StandupError::PathNotFound(p)) if p == missing));
    }

    #[tokio::test]
    async fn test_no_repo_uses_current_directory() {
        let executor = MockCloneExecutor::new();
        let target = resolve_target(None, &executor).await.expect("cwd resolves");

        assert!(!target.is_clone());
        assert_eq!(
            target.repository().path,
            std::env::current_dir().expect("cwd")
        );
    }

    #[tokio::test]
    async fn test_invalid_config_stops_before_clone() {
        let mut executor = MockCloneExecutor::new();
        executor.expect_clone_into().times(0);

        let config = Config {
            provider: "unknown".to_string(),
            ..Config::default()
        };
        let options = options(Some("https://github.com/owner/widgets".to_string()));

        let result = run_standup_with(&config, &options, &executor).await;
        assert!(matches!(result, Err(StandupError::Config(_))));
    }

    #[tokio::test]
    async fn test_clone_failure_is_fatal() {
        let mut executor = MockCloneExecutor::new();
        executor
            .expect_clone_into()
            .times(1)
            .returning(|_, _| Err(CloneError::Timeout(120)));

        let options = options(Some("github.com/owner/widgets".to_string()));
        let result = run_standup_with(&Config::default(), &options, &executor).await;

        assert!(matches!(
            result,
            Err(StandupError::Clone(CloneError::Timeout(120)))
        ));
    }

    #[tokio::test]
    async fn test_cloned_target_removed_after_run() {
        let clone_root = std::sync::Arc::new(std::sync::Mutex::new(None::<PathBuf>));
        let seen = std::sync::Arc::clone(&clone_root);

        let mut executor = MockCloneExecutor::new();
        executor.expect_clone_into().returning(move |_, dest| {
            init_with_commit(dest);
            *seen.lock().unwrap() = dest.parent().map(|p| p.to_path_buf());
            Ok(())
        });

        // Nothing listens on port 9, so the summary call fails after the scan.
        let config = Config {
            ollama_base_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        let options = StandupOptions {
            all_authors: true,
            ..options(Some("https://github.com/owner/widgets".to_string()))
        };

        let report = run_standup_with(&config, &options, &executor)
            .await
            .expect("run should succeed even when the backend fails");

        assert_eq!(report.target_name, "widgets");
        assert_eq!(report.summaries.len(), 1);
        assert!(report.summaries[0].summary.starts_with("Error"));

        let root = clone_root.lock().unwrap().clone().expect("clone happened");
        assert!(!root.exists(), "clone should be cleaned up");
    }
}
