use clap::{Args, Subcommand};
use serde::Serialize;

use momentum_ops::defaults::{self, OpsConfig};

use super::CmdResult;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Display the effective configuration and where it came from
    Show,
    /// Show the path to the global config.json
    Path,
}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<OpsConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exists: Option<bool>,
}

pub fn run(args: ConfigArgs, global: &crate::commands::GlobalArgs) -> CmdResult<ConfigOutput> {
    match args.command {
        ConfigCommand::Show => show(global),
        ConfigCommand::Path => path(),
    }
}

fn show(global: &crate::commands::GlobalArgs) -> CmdResult<ConfigOutput> {
    let loaded = global.load_config()?;
    Ok((
        ConfigOutput {
            command: "config.show".to_string(),
            config: Some(loaded.config),
            // None means built-in defaults
            source: Some(loaded.source.unwrap_or_else(|| "builtin".to_string())),
            path: None,
            exists: None,
        },
        0,
    ))
}

fn path() -> CmdResult<ConfigOutput> {
    let path = defaults::global_config_path()?;
    Ok((
        ConfigOutput {
            command: "config.path".to_string(),
            config: None,
            source: None,
            exists: Some(path.exists()),
            path: Some(path.display().to_string()),
        },
        0,
    ))
}
