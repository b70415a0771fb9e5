use clap::Args;
use serde::Serialize;

use momentum_ops::deploy::{self, DeployAction, DeployPlan, DeployResult};

use super::CmdResult;

#[derive(Args)]
pub struct ActionArgs {
    /// Print the command that would run without executing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum DeployOutput {
    Plan {
        command: String,
        #[serde(rename = "dryRun")]
        dry_run: bool,
        plan: DeployPlan,
    },
    Executed {
        command: String,
        result: DeployResult,
    },
}

pub fn run(
    action: DeployAction,
    args: ActionArgs,
    global: &crate::commands::GlobalArgs,
) -> CmdResult<DeployOutput> {
    let loaded = global.load_config()?;
    let app = &loaded.config.app;
    let command = action.as_str().to_string();

    if args.dry_run {
        return Ok((
            DeployOutput::Plan {
                command,
                dry_run: true,
                plan: deploy::plan(action, app),
            },
            0,
        ));
    }

    let result = deploy::execute(action, app)?;
    let exit_code = result.exit_code;
    Ok((DeployOutput::Executed { command, result }, exit_code))
}
