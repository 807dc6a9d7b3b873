//! Discovery of repository roots under a directory.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Default recursion bound for [`discover_repositories`].
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// A repository to scan: its path plus the name shown in the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryTarget {
    pub path: PathBuf,
    pub name: String,
}

impl RepositoryTarget {
    /// Target named after the last segment of `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = display_name(&path);
        Self { path, name }
    }

    pub fn with_name(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// Last path segment, resolving `.` and friends through the filesystem.
fn display_name(path: &Path) -> String {
    let segment = |p: &Path| p.file_name().map(|n| n.to_string_lossy().into_owned());

    segment(path)
        .or_else(|| path.canonicalize().ok().and_then(|p| segment(&p)))
        .unwrap_or_else(|| path.display().to_string())
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn has_git_marker(path: &Path) -> bool {
    path.join(".git").exists()
}

/// Find repository roots under `root`, depth-first.
///
/// `root` itself is depth 0. A directory holding a `.git` entry is recorded
/// and not descended into, so no returned path is nested inside another.
/// Hidden directories are skipped, and so are directories that cannot be
/// read. Symlinked directories are not followed.
pub fn discover_repositories(root: &Path, max_depth: usize) -> Vec<RepositoryTarget> {
    let mut targets = Vec::new();

    let mut entries = WalkDir::new(root)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || (e.file_type().is_dir() && !is_hidden(e)));

    while let Some(entry) = entries.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!("Skipping unreadable directory: {}", err);
                continue;
            }
        };

        if entry.file_type().is_dir() && has_git_marker(entry.path()) {
            targets.push(RepositoryTarget::new(entry.path()));
            entries.skip_current_dir();
        }
    }

    info!(
        "Discovered {} repositories under {}",
        targets.len(),
        root.display()
    );
    targets
}
