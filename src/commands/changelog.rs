use clap::Args;
use std::path::PathBuf;

use momentum_ops::{changelog, git};

#[derive(Args)]
pub struct ChangelogArgs {
    /// Repository to inspect
    #[arg(long, default_value = ".")]
    path: PathBuf,
}

/// Render the entries the next release would write, without writing them.
pub fn run_markdown(
    args: ChangelogArgs,
    _global: &crate::commands::GlobalArgs,
) -> momentum_ops::Result<(String, i32)> {
    git::require_git_repo(&args.path)?;

    let latest = git::get_latest_version_tag(&args.path)?;
    let commits = match &latest {
        Some(tag) => git::get_commits_since_tag(&args.path, Some(&tag.name))?,
        None => Vec::new(),
    };

    Ok((changelog::render(&commits), 0))
}
