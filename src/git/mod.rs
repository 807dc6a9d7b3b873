//! Git operations using git2-rs.

pub mod commits;
pub mod format;
pub mod remote;
pub mod walker;

pub use commits::{
    AuthorFilter, CommitRecord, RepositoryCommits, ScanWindow, scan_repositories, scan_repository,
    scan_search_root,
};
pub use format::format_commits;
pub use remote::{ClonedRepository, clone_repository, is_github_url};
pub use walker::{RepositoryTarget, discover_repositories};
