mod auth;
mod commits;
mod operations;
mod primitives;
mod tags;

pub use auth::*;
pub use commits::*;
pub use operations::*;
pub use primitives::*;
pub use tags::*;

use std::path::Path;
use std::process::Command;

fn execute_git(path: &Path, args: &[&str]) -> std::io::Result<std::process::Output> {
    Command::new("git").args(args).current_dir(path).output()
}

/// Like `execute_git`, with `-c` auth options placed before the subcommand.
fn execute_git_authed(
    path: &Path,
    auth: &GitAuth,
    args: &[&str],
) -> std::io::Result<std::process::Output> {
    let prefix = auth.config_args();
    let mut full: Vec<&str> = prefix.iter().map(String::as_str).collect();
    full.extend_from_slice(args);
    execute_git(path, &full)
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
