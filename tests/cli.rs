mod common;

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use common::TestRepo;
use serde_json::Value;
use tempfile::TempDir;

fn cli(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_momentum-ops"))
        .args(args)
        .current_dir(cwd)
        .env("HOME", cwd)
        .env_remove("GITHUB_TOKEN")
        .output()
        .unwrap()
}

fn json_stdout(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({}): {}",
            e,
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

fn write_config(dir: &TempDir, body: &str) -> String {
    let path = dir.path().join("ops.json");
    fs::write(&path, body).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn deploy_dry_run_prints_plan() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "{}");

    let output = cli(dir.path(), &["--config", &config, "deploy", "--dry-run"]);

    assert_eq!(output.status.code(), Some(0));
    let json = json_stdout(&output);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["command"], "deploy");
    assert_eq!(json["data"]["dryRun"], true);
    assert_eq!(
        json["data"]["plan"]["commandLine"],
        concat!(
            "helm upgrade --install momentum-indicator ./helm/momentum-indicator ",
            "--namespace momentum --create-namespace"
        )
    );
}

#[test]
fn status_dry_run_targets_configured_namespace() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, r#"{"app": {"namespace": "staging"}}"#);

    let output = cli(dir.path(), &["--config", &config, "status", "--dry-run"]);

    let json = json_stdout(&output);
    assert_eq!(json["data"]["plan"]["commandLine"], "kubectl get all --namespace staging");
    assert_eq!(json["data"]["plan"]["mutatesCluster"], false);
}

#[test]
fn passthrough_forwards_tool_exit_code() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        r#"{"app": {"helm_bin": "false", "kubectl_bin": "true"}}"#,
    );

    let status = cli(dir.path(), &["--config", &config, "status"]);
    assert_eq!(status.status.code(), Some(0));
    assert!(status.stdout.is_empty());

    let delete = cli(dir.path(), &["--config", &config, "delete"]);
    assert_eq!(delete.status.code(), Some(1));
    assert!(delete.stdout.is_empty());
}

#[test]
fn missing_tool_reports_launch_failure() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, r#"{"app": {"helm_bin": "/nonexistent/bin/helm"}}"#);

    let output = cli(dir.path(), &["--config", &config, "deploy"]);

    assert_eq!(output.status.code(), Some(20));
    let json = json_stdout(&output);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "tool.launch_failed");
}

#[test]
fn malformed_config_exits_with_two() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "{ not json");

    let output = cli(dir.path(), &["--config", &config, "deploy", "--dry-run"]);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(json_stdout(&output)["error"]["code"], "config.invalid_json");
}

#[test]
fn empty_namespace_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, r#"{"app": {"namespace": " "}}"#);

    let output = cli(dir.path(), &["--config", &config, "status", "--dry-run"]);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(json_stdout(&output)["error"]["code"], "config.invalid_value");
}

#[test]
fn missing_explicit_config_is_an_error() {
    let dir = TempDir::new().unwrap();

    let output = cli(dir.path(), &["--config", "absent.json", "config", "show"]);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(
        json_stdout(&output)["error"]["code"],
        "validation.invalid_argument"
    );
}

#[test]
fn config_show_reports_source() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, r#"{"release": {"remote": "upstream"}}"#);

    let output = cli(dir.path(), &["--config", &config, "config", "show"]);

    let json = json_stdout(&output);
    assert_eq!(json["data"]["source"], config.as_str());
    assert_eq!(json["data"]["config"]["release"]["remote"], "upstream");
    assert_eq!(json["data"]["config"]["app"]["name"], "momentum-indicator");
}

#[test]
fn release_plan_outside_repository_exits_with_two() {
    let dir = TempDir::new().unwrap();

    let output = cli(dir.path(), &["release", "plan", "--no-fetch"]);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(
        json_stdout(&output)["error"]["code"],
        "validation.invalid_argument"
    );
}

#[test]
fn version_reports_bootstrap_on_untagged_repo() {
    let repo = TestRepo::new();

    let output = cli(repo.path(), &["version"]);

    assert_eq!(output.status.code(), Some(0));
    let json = json_stdout(&output);
    assert_eq!(json["data"]["command"], "version.show");
    assert_eq!(json["data"]["currentVersion"], "0.1.0");
    assert_eq!(json["data"]["nextTag"], "v0.1.1");
    assert_eq!(json["data"]["needsBootstrap"], true);
}

#[test]
fn release_run_then_changelog_preview() {
    let repo = TestRepo::new();

    let output = cli(repo.path(), &["release", "run", "--no-push"]);
    assert_eq!(output.status.code(), Some(0));
    let json = json_stdout(&output);
    assert_eq!(json["data"]["command"], "release.run");
    assert_eq!(json["data"]["run"]["newTag"], "v0.1.1");
    assert_eq!(json["data"]["run"]["bootstrapTag"], "v0.1.0");

    repo.commit_file("src/rsi.py", "WINDOW = 14\n", "Add RSI window");
    let preview = cli(repo.path(), &["changelog"]);
    assert_eq!(preview.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&preview.stdout),
        "- Add RSI window (Tester)\n"
    );
    // Preview never writes.
    assert_eq!(repo.read("CHANGELOG.md"), "");
}
