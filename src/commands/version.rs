use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use momentum_ops::git;
use momentum_ops::version::{self, VersionInfo};

use super::CmdResult;

#[derive(Args)]
pub struct VersionArgs {
    /// Repository to inspect
    #[arg(long, default_value = ".")]
    path: PathBuf,
}

#[derive(Serialize)]
pub struct VersionOutput {
    command: String,
    path: String,
    #[serde(flatten)]
    info: VersionInfo,
}

pub fn run(args: VersionArgs, global: &crate::commands::GlobalArgs) -> CmdResult<VersionOutput> {
    let loaded = global.load_config()?;
    git::require_git_repo(&args.path)?;

    let info = version::read_version(&args.path, &loaded.config.release.initial_version)?;

    Ok((
        VersionOutput {
            command: "version.show".to_string(),
            path: args.path.display().to_string(),
            info,
        },
        0,
    ))
}
