//! Plain-text rendering of commits for the generation prompt.

use super::commits::CommitRecord;

/// Rendered in place of the commit list when there is nothing to show.
pub const NO_COMMITS_MESSAGE: &str = "No commits found.";

/// File names listed per commit before the rest are counted.
const MAX_FILES_SHOWN: usize = 3;

/// Render commits as `[YYYY-MM-DD HH:MM] message` lines.
///
/// Commits that touched files get a second `  Files: ...` line listing the
/// first three paths, with `... and N more` when there are others.
pub fn format_commits(commits: &[CommitRecord]) -> String {
    if commits.is_empty() {
        return NO_COMMITS_MESSAGE.to_string();
    }

    let mut lines = Vec::with_capacity(commits.len() * 2);

    for commit in commits {
        lines.push(format!(
            "[{}] {}",
            commit.timestamp.format("%Y-%m-%d %H:%M"),
            commit.message
        ));

        if !commit.files_changed.is_empty() {
            let mut preview: Vec<String> = commit
                .files_changed
                .iter()
                .take(MAX_FILES_SHOWN)
                .cloned()
                .collect();

            if commit.files_changed.len() > MAX_FILES_SHOWN {
                preview.push(format!(
                    "... and {} more",
                    commit.files_changed.len() - MAX_FILES_SHOWN
                ));
            }

            lines.push(format!("  Files: {}", preview.join(", ")));
        }
    }

    lines.join("\n")
}
