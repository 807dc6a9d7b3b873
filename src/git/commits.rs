//! Recent commit extraction with recency and author filtering.

use std::path::Path;

use chrono::{DateTime, Duration, FixedOffset, Offset, TimeZone, Utc};
use git2::{Commit, ErrorCode, Repository, Sort};
use tracing::{debug, warn};

use crate::error::GitError;

use super::walker::{RepositoryTarget, discover_repositories};

/// Hard ceiling on commits visited per repository, whatever their age.
pub const MAX_COMMITS_PER_REPO: usize = 200;

/// Length of the abbreviated commit id.
const SHORT_ID_LEN: usize = 8;

/// A commit that passed the scan window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub short_id: String,
    pub message: String,
    pub author: String,
    /// Only used for identity filtering.
    pub author_email: String,
    /// Author time in the author's own UTC offset.
    pub timestamp: DateTime<FixedOffset>,
    pub files_changed: Vec<String>,
    pub repo_name: String,
}

/// Whose commits a scan keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorFilter {
    /// Only commits whose author email matches the repository's `user.email`.
    /// Falls back to everyone when `user.email` is not set.
    CurrentUser,
    All,
}

impl AuthorFilter {
    pub fn from_all_authors(all_authors: bool) -> Self {
        if all_authors {
            AuthorFilter::All
        } else {
            AuthorFilter::CurrentUser
        }
    }
}

/// Parameters shared by every repository in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    pub cutoff: DateTime<Utc>,
    pub author_filter: AuthorFilter,
}

impl ScanWindow {
    pub fn since(cutoff: DateTime<Utc>, author_filter: AuthorFilter) -> Self {
        Self {
            cutoff,
            author_filter,
        }
    }

    /// Window covering the last `hours` hours up to now.
    pub fn last_hours(hours: u32, author_filter: AuthorFilter) -> Self {
        let now = Utc::now();
        let cutoff = now
            .checked_sub_signed(Duration::hours(i64::from(hours)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self::since(cutoff, author_filter)
    }

    pub fn contains<Tz: TimeZone>(&self, timestamp: &DateTime<Tz>) -> bool {
        timestamp.with_timezone(&Utc) >= self.cutoff
    }
}

/// Commits found in one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryCommits {
    pub target: RepositoryTarget,
    pub commits: Vec<CommitRecord>,
}

/// Read `user.email` from the repository's configuration.
pub fn current_identity(repo: &Repository) -> Option<String> {
    let config = repo.config().ok()?;
    identity_from_config(&config)
}

fn identity_from_config(config: &git2::Config) -> Option<String> {
    config
        .get_string("user.email")
        .ok()
        .filter(|email| !email.trim().is_empty())
}

/// Exact, case-sensitive match. No identity means no filtering.
fn keep_author(identity: Option<&str>, author_email: Option<&str>) -> bool {
    match identity {
        Some(identity) => author_email == Some(identity),
        None => true,
    }
}

fn author_timestamp(commit: &Commit) -> Result<DateTime<FixedOffset>, GitError> {
    let when = commit.author().when();
    let offset = FixedOffset::east_opt(when.offset_minutes() * 60).unwrap_or(Utc.fix());

    offset
        .timestamp_opt(when.seconds(), 0)
        .single()
        .ok_or_else(|| GitError::InvalidTimestamp {
            hash: commit.id().to_string(),
            seconds: when.seconds(),
        })
}

/// Paths touched by `commit` relative to its first parent.
fn changed_files(repo: &Repository, commit: &Commit) -> Result<Vec<String>, git2::Error> {
    let tree = commit.tree()?;
    let parent_tree = if commit.parent_count() > 0 {
        Some(commit.parent(0)?.tree()?)
    } else {
        None
    };

    let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

    Ok(diff
        .deltas()
        .filter_map(|delta| delta.new_file().path().or_else(|| delta.old_file().path()))
        .map(|path| path.display().to_string())
        .collect())
}

fn to_record(
    repo: &Repository,
    commit: &Commit,
    timestamp: DateTime<FixedOffset>,
    repo_name: &str,
) -> CommitRecord {
    let mut short_id = commit.id().to_string();
    short_id.truncate(SHORT_ID_LEN);

    let author = commit.author();
    let files_changed = changed_files(repo, commit).unwrap_or_else(|e| {
        debug!("Could not list files for commit {}: {}", short_id, e);
        Vec::new()
    });

    CommitRecord {
        message: String::from_utf8_lossy(commit.message_bytes()).trim().to_string(),
        author: author.name().unwrap_or("Unknown").to_string(),
        author_email: author.email().unwrap_or("").to_string(),
        timestamp,
        files_changed,
        repo_name: repo_name.to_string(),
        short_id,
    }
}

/// Push every ref that peels to a commit, plus HEAD when it is detached.
fn push_all_refs(repo: &Repository, revwalk: &mut git2::Revwalk) -> Result<(), GitError> {
    for reference in repo.references().map_err(GitError::RevwalkError)? {
        let reference = match reference {
            Ok(reference) => reference,
            Err(e) => {
                debug!("Skipping unreadable reference: {}", e);
                continue;
            }
        };
        if let Ok(commit) = reference.peel_to_commit() {
            revwalk.push(commit.id()).map_err(GitError::RevwalkError)?;
        }
    }

    if let Ok(head) = repo.head() {
        if let Some(oid) = head.target() {
            revwalk.push(oid).map_err(GitError::RevwalkError)?;
        }
    }

    Ok(())
}

fn try_scan(target: &RepositoryTarget, window: &ScanWindow) -> Result<Vec<CommitRecord>, GitError> {
    let repo = Repository::open(&target.path).map_err(GitError::OpenRepository)?;

    if repo.is_bare() {
        debug!("Skipping bare repository {}", target.path.display());
        return Ok(Vec::new());
    }

    let identity = match window.author_filter {
        AuthorFilter::All => None,
        AuthorFilter::CurrentUser => {
            let identity = current_identity(&repo);
            if identity.is_none() {
                debug!(
                    "No user.email for {}, including all authors",
                    target.path.display()
                );
            }
            identity
        }
    };

    let mut revwalk = repo.revwalk().map_err(GitError::RevwalkError)?;
    revwalk
        .set_sorting(Sort::TIME)
        .map_err(GitError::RevwalkError)?;
    push_all_refs(&repo, &mut revwalk)?;

    let mut commits = Vec::new();

    // Merged branches are not globally ordered by author time, so old
    // commits are skipped rather than ending the walk.
    for oid_result in revwalk.take(MAX_COMMITS_PER_REPO) {
        let oid = oid_result.map_err(GitError::RevwalkError)?;
        let commit = repo.find_commit(oid).map_err(GitError::ParseCommit)?;

        let timestamp = author_timestamp(&commit)?;
        if !window.contains(&timestamp) {
            continue;
        }

        if !keep_author(identity.as_deref(), commit.author().email()) {
            continue;
        }

        commits.push(to_record(&repo, &commit, timestamp, &target.name));
    }

    commits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(commits)
}

/// Scan one repository for commits inside `window`, newest first.
///
/// Never fails: a path that is not a repository, a bare repository, or a
/// repository that errors mid-scan all yield an empty list.
pub fn scan_repository(target: &RepositoryTarget, window: &ScanWindow) -> Vec<CommitRecord> {
    match try_scan(target, window) {
        Ok(commits) => commits,
        Err(GitError::OpenRepository(e)) if e.code() == ErrorCode::NotFound => {
            debug!("Not a git repository: {}", target.path.display());
            Vec::new()
        }
        Err(e) => {
            warn!("Error scanning {}: {}", target.path.display(), e);
            Vec::new()
        }
    }
}

/// Scan each target in order, keeping only repositories with commits.
pub fn scan_repositories(
    targets: &[RepositoryTarget],
    window: &ScanWindow,
) -> Vec<RepositoryCommits> {
    targets
        .iter()
        .filter_map(|target| {
            let commits = scan_repository(target, window);
            if commits.is_empty() {
                None
            } else {
                Some(RepositoryCommits {
                    target: target.clone(),
                    commits,
                })
            }
        })
        .collect()
}

/// Discover repositories under `root` and scan them.
pub fn scan_search_root(
    root: &Path,
    max_depth: usize,
    window: &ScanWindow,
) -> Vec<RepositoryCommits> {
    let targets = discover_repositories(root, max_depth);
    scan_repositories(&targets, window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_includes_cutoff_instant() {
        let cutoff = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let window = ScanWindow::since(cutoff, AuthorFilter::All);

        assert!(window.contains(&cutoff));
        assert!(window.contains(&(cutoff + Duration::seconds(1))));
        assert!(!window.contains(&(cutoff - Duration::seconds(1))));
    }

    #[test]
    fn test_window_compares_instants_across_offsets() {
        let cutoff = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let window = ScanWindow::since(cutoff, AuthorFilter::All);

        // 13:30 in UTC+2 is 11:30 UTC, before the cutoff.
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = plus_two.with_ymd_and_hms(2024, 3, 1, 13, 30, 0).unwrap();
        assert!(!window.contains(&local));

        // 08:30 in UTC-5 is 13:30 UTC, after the cutoff.
        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
        let local = minus_five.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        assert!(window.contains(&local));
    }

    #[test]
    fn test_last_hours_cutoff() {
        let before = Utc::now();
        let window = ScanWindow::last_hours(24, AuthorFilter::CurrentUser);
        let after = Utc::now();

        assert!(window.cutoff <= after - Duration::hours(24));
        assert!(window.cutoff >= before - Duration::hours(24));
        assert_eq!(window.author_filter, AuthorFilter::CurrentUser);
    }

    #[test]
    fn test_last_hours_saturates() {
        let window = ScanWindow::last_hours(u32::MAX, AuthorFilter::All);
        assert!(window.cutoff < Utc::now());
    }

    #[test]
    fn test_author_filter_from_flag() {
        assert_eq!(AuthorFilter::from_all_authors(true), AuthorFilter::All);
        assert_eq!(
            AuthorFilter::from_all_authors(false),
            AuthorFilter::CurrentUser
        );
    }

    #[test]
    fn test_keep_author_exact_match() {
        assert!(keep_author(Some("me@example.com"), Some("me@example.com")));
        assert!(!keep_author(Some("me@example.com"), Some("Me@example.com")));
        assert!(!keep_author(Some("me@example.com"), Some("you@example.com")));
        assert!(!keep_author(Some("me@example.com"), None));
    }

    #[test]
    fn test_keep_author_without_identity_keeps_everyone() {
        assert!(keep_author(None, Some("you@example.com")));
        assert!(keep_author(None, None));
    }

    #[test]
    fn test_identity_missing_from_empty_config() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = dir.path().join("config");
        std::fs::write(&path, "[core]\n\tbare = false\n").expect("failed to write config");

        let config = git2::Config::open(&path).expect("failed to open config");
        assert_eq!(identity_from_config(&config), None);
    }

    #[test]
    fn test_identity_read_from_config() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = dir.path().join("config");
        std::fs::write(&path, "[user]\n\temail = dev@example.com\n")
            .expect("failed to write config");

        let config = git2::Config::open(&path).expect("failed to open config");
        assert_eq!(
            identity_from_config(&config),
            Some("dev@example.com".to_string())
        );
    }

    #[test]
    fn test_blank_identity_is_ignored() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = dir.path().join("config");
        std::fs::write(&path, "[user]\n\temail = \"  \"\n").expect("failed to write config");

        let config = git2::Config::open(&path).expect("failed to open config");
        assert_eq!(identity_from_config(&config), None);
    }
}
