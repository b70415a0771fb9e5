use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use momentum_ops::release::{self, ReleaseOptions, ReleasePlan, ReleaseRun};

use super::CmdResult;

#[derive(Args)]
pub struct ReleaseArgs {
    #[command(subcommand)]
    command: ReleaseCommand,
}

#[derive(Subcommand)]
enum ReleaseCommand {
    /// Regenerate the changelog, bump the patch version, commit, tag and push
    Run {
        /// Repository to release
        #[arg(long, default_value = ".")]
        path: PathBuf,
        /// Skip fetching history and tags first
        #[arg(long)]
        no_fetch: bool,
        /// Commit and tag locally without pushing
        #[arg(long)]
        no_push: bool,
        /// Skip the release when every new commit only touches ignored paths
        #[arg(long)]
        skip_docs_only: bool,
    },
    /// Show what a release would do without changing the repository
    Plan {
        /// Repository to inspect
        #[arg(long, default_value = ".")]
        path: PathBuf,
        /// Skip fetching history and tags first
        #[arg(long)]
        no_fetch: bool,
        /// Report whether the run would be skipped for ignored-only changes
        #[arg(long)]
        skip_docs_only: bool,
    },
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum ReleaseOutput {
    #[serde(rename = "release.run")]
    Run { run: ReleaseRun },
    #[serde(rename = "release.plan")]
    Plan { plan: ReleasePlan },
}

pub fn run(args: ReleaseArgs, global: &crate::commands::GlobalArgs) -> CmdResult<ReleaseOutput> {
    let loaded = global.load_config()?;
    let config = &loaded.config.release;

    match args.command {
        ReleaseCommand::Run {
            path,
            no_fetch,
            no_push,
            skip_docs_only,
        } => {
            let options = ReleaseOptions {
                fetch: !no_fetch,
                push: !no_push,
                skip_ignored: skip_docs_only,
            };
            let run = release::run(&path, config, &options)?;
            Ok((ReleaseOutput::Run { run }, 0))
        }
        ReleaseCommand::Plan {
            path,
            no_fetch,
            skip_docs_only,
        } => {
            let options = ReleaseOptions {
                fetch: !no_fetch,
                skip_ignored: skip_docs_only,
                ..ReleaseOptions::default()
            };
            let plan = release::plan(&path, config, &options)?;
            Ok((ReleaseOutput::Plan { plan }, 0))
        }
    }
}
