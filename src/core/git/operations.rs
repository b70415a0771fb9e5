use serde::Serialize;
use std::path::Path;

use crate::error::{Error, Result};

use super::auth::GitAuth;
use super::primitives::is_shallow_repository;
use super::{execute_git, execute_git_authed, path_str};

/// Fallback reported when a commit step finds nothing staged.
pub const NOTHING_TO_COMMIT: &str = "Nothing to commit, working tree clean";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitOutput {
    pub path: String,
    pub action: String,
    pub success: bool,
    pub exit_code: i32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

impl GitOutput {
    fn from_output(path: &Path, action: &str, output: std::process::Output) -> Self {
        Self {
            path: path_str(path),
            action: action.to_string(),
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(1),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    fn skipped(path: &Path, action: &str, message: &str) -> Self {
        Self {
            path: path_str(path),
            action: action.to_string(),
            success: true,
            exit_code: 0,
            stdout: message.to_string(),
            stderr: String::new(),
        }
    }

    /// Turn a failed git invocation into an error carrying its output.
    pub fn require_success(self) -> Result<Self> {
        if self.success {
            return Ok(self);
        }
        let text = if self.stderr.is_empty() {
            &self.stdout
        } else {
            &self.stderr
        };
        let mut err = Error::git_command_failed(format!("git {} failed: {}", self.action, text));
        err.details = serde_json::json!({
            "action": self.action,
            "path": self.path,
            "exitCode": self.exit_code,
            "stderr": self.stderr,
        });
        Err(err)
    }
}

fn run(path: &Path, action: &str, args: &[&str]) -> Result<GitOutput> {
    let output = execute_git(path, args)
        .map_err(|e| Error::git_command_failed(format!("Failed to run git {}: {}", action, e)))?;
    Ok(GitOutput::from_output(path, action, output))
}

fn run_authed(path: &Path, auth: &GitAuth, action: &str, args: &[&str]) -> Result<GitOutput> {
    let output = execute_git_authed(path, auth, args)
        .map_err(|e| Error::git_command_failed(format!("Failed to run git {}: {}", action, e)))?;
    Ok(GitOutput::from_output(path, action, output))
}

/// Fetch full history and all tags from the remote.
/// Shallow clones are unshallowed so the changelog range is complete.
pub fn fetch(path: &Path, remote: &str, auth: &GitAuth) -> Result<GitOutput> {
    let mut args = vec!["fetch", remote, "--tags", "--force"];
    if is_shallow_repository(path) {
        args.push("--unshallow");
    }
    run_authed(path, auth, "fetch", &args)
}

/// Stage the given paths and commit only them.
///
/// When none of the paths has a staged change, nothing is committed and the
/// result carries `NOTHING_TO_COMMIT`. This is a success, not an error.
pub fn commit_paths(path: &Path, files: &[&str], message: &str) -> Result<GitOutput> {
    if message.trim().is_empty() {
        return Err(Error::validation_invalid_argument(
            "message",
            "Missing commit message",
        ));
    }

    let mut add_args = vec!["add", "--"];
    add_args.extend_from_slice(files);
    let add = run(path, "commit", &add_args)?;
    if !add.success {
        return Ok(add);
    }

    let mut diff_args = vec!["diff", "--cached", "--quiet", "--"];
    diff_args.extend_from_slice(files);
    let diff = run(path, "commit", &diff_args)?;
    if diff.success {
        return Ok(GitOutput::skipped(path, "commit", NOTHING_TO_COMMIT));
    }

    let mut commit_args = vec!["commit", "-m", message, "--"];
    commit_args.extend_from_slice(files);
    run(path, "commit", &commit_args)
}

/// Create an annotated tag at HEAD.
pub fn create_annotated_tag(path: &Path, tag_name: &str, message: &str) -> Result<GitOutput> {
    run(path, "tag", &["tag", "-a", tag_name, "-m", message])
}

/// Push the current branch to the remote, together with any annotated tags
/// reachable from it that the remote is missing (e.g. a bootstrap tag whose
/// own push failed on an earlier run).
pub fn push_head(path: &Path, remote: &str, auth: &GitAuth) -> Result<GitOutput> {
    run_authed(path, auth, "push", &["push", "--follow-tags", remote, "HEAD"])
}

/// Push a single tag to the remote.
pub fn push_tag(path: &Path, remote: &str, tag_name: &str, auth: &GitAuth) -> Result<GitOutput> {
    let refspec = format!("refs/tags/{}", tag_name);
    run_authed(path, auth, "push", &["push", remote, &refspec])
}
