use momentum_ops::defaults::{self, LoadedConfig};
use momentum_ops::deploy::DeployAction;

pub type CmdResult<T> = momentum_ops::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    pub config: Option<String>,
}

impl GlobalArgs {
    pub fn load_config(&self) -> momentum_ops::Result<LoadedConfig> {
        defaults::load(self.config.as_deref())
    }
}

pub mod changelog;
pub mod config;
pub mod deploy;
pub mod release;
pub mod version;

pub(crate) fn run_markdown(
    command: crate::Commands,
    global: &GlobalArgs,
) -> momentum_ops::Result<(String, i32)> {
    match command {
        crate::Commands::Changelog(args) => changelog::run_markdown(args, global),
        _ => Err(momentum_ops::Error::validation_invalid_argument(
            "output_mode",
            "Command does not support markdown output",
        )),
    }
}

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
    ($action:expr, $args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($action, $args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (momentum_ops::Result<serde_json::Value>, i32) {
    crate::tty::status("momentum-ops is working...");

    match command {
        crate::Commands::Deploy(args) => dispatch!(DeployAction::Deploy, args, global, deploy),
        crate::Commands::Delete(args) => dispatch!(DeployAction::Delete, args, global, deploy),
        crate::Commands::Status(args) => dispatch!(DeployAction::Status, args, global, deploy),
        crate::Commands::Release(args) => dispatch!(args, global, release),
        crate::Commands::Version(args) => dispatch!(args, global, version),
        crate::Commands::Config(args) => dispatch!(args, global, config),

        // Changelog preview uses raw output mode
        crate::Commands::Changelog(_) => {
            let err = momentum_ops::Error::validation_invalid_argument(
                "output_mode",
                "Changelog command uses markdown output mode",
            );
            crate::output::map_cmd_result_to_json::<serde_json::Value>(Err(err))
        }
    }
}
