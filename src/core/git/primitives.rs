use std::path::Path;

use crate::error::{Error, Result};
use crate::utils::command;

use super::path_str;

pub fn is_git_repo(path: &Path) -> bool {
    command::succeeded_in(&path_str(path), "git", &["rev-parse", "--git-dir"])
}

/// Fail early with a readable error when `path` is not inside a work tree.
pub fn require_git_repo(path: &Path) -> Result<()> {
    if is_git_repo(path) {
        return Ok(());
    }
    Err(Error::validation_invalid_argument(
        "path",
        format!("Not a git repository: {}", path.display()),
    )
    .with_hint("Run from the repository root or pass --path <repo>"))
}

/// True when the clone has truncated history (e.g. a CI checkout with depth 1).
pub fn is_shallow_repository(path: &Path) -> bool {
    command::run_in_optional(
        &path_str(path),
        "git",
        &["rev-parse", "--is-shallow-repository"],
    )
    .map(|s| s == "true")
    .unwrap_or(false)
}

/// Get the current HEAD commit SHA.
pub fn get_head_commit(path: &Path) -> Result<String> {
    command::run_in(&path_str(path), "git", &["rev-parse", "HEAD"], "get HEAD commit")
        .map_err(|e| Error::git_command_failed(detail_text(&e)))
}

/// Get the commit SHA a tag points to.
pub fn get_tag_commit(path: &Path, tag_name: &str) -> Result<String> {
    command::run_in(
        &path_str(path),
        "git",
        &["rev-list", "-n", "1", tag_name],
        &format!("get commit for tag '{}'", tag_name),
    )
    .map_err(|e| Error::git_command_failed(detail_text(&e)))
}

/// Pull the human-readable cause out of an internal_io error from `command`.
pub(crate) fn detail_text(err: &Error) -> String {
    err.details
        .get("error")
        .and_then(|v| v.as_str())
        .map(String::from)
        .unwrap_or_else(|| err.message.clone())
}
