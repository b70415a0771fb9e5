//! Changelog generation: one line per commit since the last release tag.

use serde::Serialize;
use std::path::Path;

use crate::error::Result;
use crate::git::CommitInfo;
use crate::utils::io;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangelogWrite {
    pub path: String,
    pub entries: usize,
}

/// Format a single entry as `- <subject> (<author>)`.
pub fn format_entry(commit: &CommitInfo) -> String {
    format!("- {} ({})", commit.subject.trim(), commit.author.trim())
}

/// Render the whole document. Commits are expected newest first and keep that order.
/// No commits renders an empty document.
pub fn render(commits: &[CommitInfo]) -> String {
    let mut out = String::new();
    for commit in commits {
        out.push_str(&format_entry(commit));
        out.push('\n');
    }
    out
}

/// Overwrite the changelog with the rendered commits.
pub fn write(path: &Path, commits: &[CommitInfo]) -> Result<ChangelogWrite> {
    io::write_file_atomic(path, &render(commits), "write changelog")?;
    Ok(ChangelogWrite {
        path: path.display().to_string(),
        entries: commits.len(),
    })
}
