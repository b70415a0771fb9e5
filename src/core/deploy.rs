//! Helm/kubectl wrapper for the deploy, delete and status operations.
//!
//! Each operation is exactly one external process. The tool's exit code is the
//! result; nothing is retried or interpreted.

use serde::Serialize;

use crate::defaults::AppConfig;
use crate::error::Result;
use crate::utils::{command, shell};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployAction {
    /// Install or upgrade the release, creating the namespace if absent.
    Deploy,
    /// Uninstall the release from the namespace.
    Delete,
    /// List every resource in the namespace. Read-only.
    Status,
}

impl DeployAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeployAction::Deploy => "deploy",
            DeployAction::Delete => "delete",
            DeployAction::Status => "status",
        }
    }

    pub fn mutates_cluster(&self) -> bool {
        !matches!(self, DeployAction::Status)
    }
}

/// A fully resolved external command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolInvocation {
    pub fn command_line(&self) -> String {
        shell::command_line(&self.program, &self.args)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployPlan {
    pub action: DeployAction,
    pub app: String,
    pub namespace: String,
    pub program: String,
    pub args: Vec<String>,
    pub command_line: String,
    pub mutates_cluster: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployResult {
    pub action: DeployAction,
    pub command_line: String,
    pub success: bool,
    pub exit_code: i32,
}

/// Translate an action into its single tool invocation.
pub fn build_invocation(action: DeployAction, app: &AppConfig) -> ToolInvocation {
    let (program, args): (&str, Vec<&str>) = match action {
        DeployAction::Deploy => (
            app.helm_bin.as_str(),
            vec![
                "upgrade",
                "--install",
                app.name.as_str(),
                app.chart.as_str(),
                "--namespace",
                app.namespace.as_str(),
                "--create-namespace",
            ],
        ),
        DeployAction::Delete => (
            app.helm_bin.as_str(),
            vec!["uninstall", app.name.as_str(), "--namespace", app.namespace.as_str()],
        ),
        DeployAction::Status => (
            app.kubectl_bin.as_str(),
            vec!["get", "all", "--namespace", app.namespace.as_str()],
        ),
    };

    ToolInvocation {
        program: program.to_string(),
        args: args.into_iter().map(String::from).collect(),
    }
}

/// Describe what `execute` would run, without running it.
pub fn plan(action: DeployAction, app: &AppConfig) -> DeployPlan {
    let invocation = build_invocation(action, app);
    DeployPlan {
        action,
        app: app.name.clone(),
        namespace: app.namespace.clone(),
        command_line: invocation.command_line(),
        mutates_cluster: action.mutates_cluster(),
        program: invocation.program,
        args: invocation.args,
    }
}

/// Run the action's tool with inherited stdio.
///
/// A non-zero exit is reported through `DeployResult`, not as an error; only a
/// tool that cannot be launched at all is an error.
pub fn execute(action: DeployAction, app: &AppConfig) -> Result<DeployResult> {
    let invocation = build_invocation(action, app);
    let command_line = invocation.command_line();

    crate::log_status!("deploy", "{}", command_line);

    let exit_code = command::run_passthrough(&invocation.program, &invocation.args)?;

    if exit_code != 0 {
        crate::log_status!(
            "deploy",
            "{} failed with exit code {}",
            action.as_str(),
            exit_code
        );
    }

    Ok(DeployResult {
        action,
        command_line,
        success: exit_code == 0,
        exit_code,
    })
}
