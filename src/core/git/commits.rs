use glob_match::glob_match;
use serde::Serialize;
use std::path::Path;

use crate::error::{Error, Result};
use crate::utils::command;

use super::path_str;
use super::primitives::detail_text;

// Unit separator keeps subjects with `|` or spaces intact.
const FIELD_SEP: char = '\u{1f}';
const LOG_FORMAT: &str = "--format=%h%x1f%s%x1f%an";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitInfo {
    pub hash: String,
    pub subject: String,
    pub author: String,
}

fn parse_log_line(line: &str) -> Option<CommitInfo> {
    let mut fields = line.splitn(3, FIELD_SEP);
    let hash = fields.next()?;
    let subject = fields.next()?;
    let author = fields.next()?;
    if hash.is_empty() {
        return None;
    }
    Some(CommitInfo {
        hash: hash.to_string(),
        subject: subject.to_string(),
        author: author.to_string(),
    })
}

fn parse_log(stdout: &str) -> Vec<CommitInfo> {
    stdout.lines().filter_map(parse_log_line).collect()
}

/// Get commits since a given tag (or all commits if tag is None).
/// Returns commits in reverse chronological order (newest first).
/// The tagged commit itself is excluded; HEAD is included.
pub fn get_commits_since_tag(path: &Path, tag: Option<&str>) -> Result<Vec<CommitInfo>> {
    let range = tag
        .map(|t| format!("{}..HEAD", t))
        .unwrap_or_else(|| "HEAD".to_string());
    let stdout = command::run_in(&path_str(path), "git", &["log", &range, LOG_FORMAT], "git log")
        .map_err(|e| Error::git_command_failed(detail_text(&e)))?;

    Ok(parse_log(&stdout))
}

/// Get the list of files changed by a specific commit.
pub fn get_commit_files(path: &Path, commit_hash: &str) -> Result<Vec<String>> {
    let stdout = command::run_in(
        &path_str(path),
        "git",
        &[
            "diff-tree",
            "--no-commit-id",
            "--name-only",
            "--root",
            "-r",
            commit_hash,
        ],
        "git diff-tree",
    )
    .map_err(|e| Error::git_command_failed(detail_text(&e)))?;

    Ok(stdout
        .lines()
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect())
}

/// Check if a file path matches any of the ignore globs.
pub fn is_ignored_path(file_path: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| glob_match(pattern, file_path))
}

/// Check if a commit only touches ignored (documentation) paths.
/// A commit with no file changes does not count.
pub fn is_ignored_only_commit(path: &Path, commit: &CommitInfo, patterns: &[String]) -> bool {
    let files = match get_commit_files(path, &commit.hash) {
        Ok(f) => f,
        Err(_) => return false,
    };

    if files.is_empty() {
        return false;
    }

    files.iter().all(|f| is_ignored_path(f, patterns))
}

/// True when there is at least one commit and every commit is ignored-only.
pub fn all_commits_ignored(path: &Path, commits: &[CommitInfo], patterns: &[String]) -> bool {
    !commits.is_empty()
        && commits
            .iter()
            .all(|commit| is_ignored_only_commit(path, commit, patterns))
}
