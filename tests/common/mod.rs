//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::cell::Cell;
use std::path::{Path, PathBuf};

use chrono::Utc;
use dev_standup::git::RepositoryTarget;
use git2::{Oid, Repository, Signature, Time};

pub const HOUR: i64 = 3600;

pub const DEFAULT_NAME: &str = "Test User";
pub const DEFAULT_EMAIL: &str = "test@example.com";

/// Create a temporary directory for test output.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// A test git repository builder for integration tests.
///
/// Commits are dated relative to now so they land inside or outside a scan
/// window predictably.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
    counter: Cell<u64>,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        Self {
            dir,
            repo,
            counter: Cell::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn target(&self) -> RepositoryTarget {
        RepositoryTarget::new(self.path())
    }

    /// Set `user.email` in the repository's own config.
    pub fn set_user_email(&self, email: &str) {
        let mut config = self.repo.config().expect("Failed to open config");
        config
            .set_str("user.email", email)
            .expect("Failed to set user.email");
    }

    /// Commit on HEAD as the default author, `secs_ago` seconds in the past.
    pub fn commit_at(&self, message: &str, secs_ago: i64) -> Oid {
        self.commit_as(message, secs_ago, DEFAULT_NAME, DEFAULT_EMAIL)
    }

    /// Commit on HEAD as a specific author.
    pub fn commit_as(&self, message: &str, secs_ago: i64, name: &str, email: &str) -> Oid {
        self.write_commit("HEAD", message, secs_ago, name, email, &["test.txt"])
    }

    /// Commit on HEAD touching every path in `files`.
    pub fn commit_files(&self, message: &str, secs_ago: i64, files: &[&str]) -> Oid {
        self.write_commit("HEAD", message, secs_ago, DEFAULT_NAME, DEFAULT_EMAIL, files)
    }

    /// Commit on `refs/heads/<branch>` without moving HEAD.
    ///
    /// The first commit on a new branch is parented on HEAD.
    pub fn commit_on_branch(&self, branch: &str, message: &str, secs_ago: i64) -> Oid {
        let file = format!("{}.txt", branch);
        self.write_commit(
            &format!("refs/heads/{}", branch),
            message,
            secs_ago,
            DEFAULT_NAME,
            DEFAULT_EMAIL,
            &[file.as_str()],
        )
    }

    fn write_commit(
        &self,
        update_ref: &str,
        message: &str,
        secs_ago: i64,
        name: &str,
        email: &str,
        files: &[&str],
    ) -> Oid {
        let n = self.counter.get() + 1;
        self.counter.set(n);

        let mut index = self.repo.index().expect("Failed to get index");
        for file in files {
            let file_path = self.path().join(file);
            if let Some(parent) = file_path.parent() {
                std::fs::create_dir_all(parent).expect("Failed to create parent dir");
            }
            std::fs::write(&file_path, format!("{}\n{}", message, n))
                .expect("Failed to write test file");
            index
                .add_path(Path::new(file))
                .expect("Failed to add file");
        }
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let time = Time::new(Utc::now().timestamp() - secs_ago, 0);
        let sig = Signature::new(name, email, &time).expect("Failed to create signature");

        let parent = self
            .repo
            .refname_to_id(update_ref)
            .or_else(|_| self.repo.refname_to_id("HEAD"))
            .ok()
            .and_then(|oid| self.repo.find_commit(oid).ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some(update_ref), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }
}

/// Initialize a repository at `path` (creating directories) with one recent commit.
pub fn init_repo_with_commit(path: &Path, message: &str) -> PathBuf {
    init_repo_with_commit_at(path, message, 0)
}

/// Initialize a repository at `path` with one commit `secs_ago` seconds in the past.
pub fn init_repo_with_commit_at(path: &Path, message: &str, secs_ago: i64) -> PathBuf {
    std::fs::create_dir_all(path).expect("Failed to create repo dir");
    let repo = Repository::init(path).expect("Failed to init git repo");

    std::fs::write(path.join("README.md"), message).expect("Failed to write file");
    let mut index = repo.index().expect("Failed to get index");
    index
        .add_path(Path::new("README.md"))
        .expect("Failed to add file");
    index.write().expect("Failed to write index");
    let tree_id = index.write_tree().expect("Failed to write tree");
    let tree = repo.find_tree(tree_id).expect("Failed to find tree");
    let time = Time::new(Utc::now().timestamp() - secs_ago, 0);
    let sig =
        Signature::new(DEFAULT_NAME, DEFAULT_EMAIL, &time).expect("Failed to create signature");

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &[])
        .expect("Failed to create commit");

    path.to_path_buf()
}

/// Initialize an empty repository (no commits) at `path`.
pub fn init_empty_repo(path: &Path) -> PathBuf {
    std::fs::create_dir_all(path).expect("Failed to create repo dir");
    Repository::init(path).expect("Failed to init git repo");
    path.to_path_buf()
}
