use std::path::Path;

use crate::defaults::ReleaseConfig;
use crate::error::Result;
use crate::git::{self, GitAuth};
use crate::version;

use super::executor::ReleaseStepExecutor;
use super::types::{
    ReleaseOptions, ReleasePlan, ReleasePlanStatus, ReleasePlanStep, ReleaseRun,
    ReleaseRunStatus, ReleaseStepType,
};

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Execute the release pipeline.
///
/// Steps run strictly in order and the first failure aborts the run. Nothing
/// is rolled back. The patch bump is unconditional: a run with no new commits
/// still produces a new tag.
pub fn run(repo: &Path, config: &ReleaseConfig, options: &ReleaseOptions) -> Result<ReleaseRun> {
    git::require_git_repo(repo)?;
    let started_at = now();

    let auth = GitAuth::from_env(&config.token_env);
    if options.push && !auth.is_configured() {
        crate::log_status!(
            "release",
            "{} is not set, pushing with ambient git credentials",
            config.token_env
        );
    }
    let mut executor = ReleaseStepExecutor::new(repo, config, options, auth);

    executor.run_fetch()?;

    let latest = git::get_latest_version_tag(repo)?;
    let previous_tag = latest.as_ref().map(|t| t.name.clone());
    let pending = git::get_commits_since_tag(repo, previous_tag.as_deref())?;

    if options.skip_ignored && git::all_commits_ignored(repo, &pending, &config.ignore_paths) {
        crate::log_status!("release", "Only ignored paths changed, skipping release");
        return Ok(ReleaseRun {
            status: ReleaseRunStatus::Skipped,
            path: repo.display().to_string(),
            bootstrap_tag: None,
            previous_tag,
            new_tag: None,
            new_version: None,
            changelog: None,
            reason: Some(format!(
                "all {} commit(s) since the last tag only touch ignored paths",
                pending.len()
            )),
            steps: executor.steps,
            started_at,
            finished_at: now(),
        });
    }

    let (latest, bootstrapped) = executor.run_bootstrap(latest)?;
    let commits = if bootstrapped {
        git::get_commits_since_tag(repo, Some(&latest.name))?
    } else {
        pending
    };

    let changelog = executor.run_changelog(&commits)?;
    let next = executor.run_version(&latest)?;
    let new_tag = git::tag_name(&next);

    executor.run_commit()?;
    executor.run_tag(&new_tag)?;
    executor.run_push(&new_tag)?;

    Ok(ReleaseRun {
        status: ReleaseRunStatus::Released,
        path: repo.display().to_string(),
        bootstrap_tag: bootstrapped.then(|| latest.name.clone()),
        previous_tag: Some(latest.name),
        new_tag: Some(new_tag),
        new_version: Some(next.to_string()),
        changelog: Some(changelog),
        reason: None,
        steps: executor.steps,
        started_at,
        finished_at: now(),
    })
}

/// Describe what `run` would do without touching the working tree.
///
/// Only the optional fetch talks to the remote; it updates refs, never files.
pub fn plan(repo: &Path, config: &ReleaseConfig, options: &ReleaseOptions) -> Result<ReleasePlan> {
    git::require_git_repo(repo)?;

    if options.fetch {
        let auth = GitAuth::from_env(&config.token_env);
        git::fetch(repo, &config.remote, &auth)?.require_success()?;
    }

    let info = version::read_version(repo, &config.initial_version)?;
    let commits = match &info.current_tag {
        Some(tag) => git::get_commits_since_tag(repo, Some(tag))?,
        // The bootstrap tag lands on HEAD, so the first changelog is empty.
        None => Vec::new(),
    };

    let mut hints = Vec::new();
    if info.needs_bootstrap {
        hints.push(format!(
            "No version tag found: v{} will be created at HEAD first",
            config.initial_version
        ));
    }
    if commits.is_empty() {
        hints.push("No commits since the last tag: the version is bumped anyway".to_string());
    }
    if options.skip_ignored && git::all_commits_ignored(repo, &commits, &config.ignore_paths) {
        hints.push("Only ignored paths changed: the run would be skipped".to_string());
    }

    let steps = build_plan_steps(config, options, &info, commits.len());

    Ok(ReleasePlan {
        path: repo.display().to_string(),
        current_tag: info.current_tag,
        current_version: info.current_version,
        next_version: info.next_version,
        next_tag: info.next_tag,
        bootstrap: info.needs_bootstrap,
        commits,
        steps,
        hints,
    })
}

fn build_plan_steps(
    config: &ReleaseConfig,
    options: &ReleaseOptions,
    info: &version::VersionInfo,
    commit_count: usize,
) -> Vec<ReleasePlanStep> {
    let step = |step_type: ReleaseStepType, label: String, enabled: bool| ReleasePlanStep {
        id: step_type.as_str().to_string(),
        label,
        status: if enabled {
            ReleasePlanStatus::Ready
        } else {
            ReleasePlanStatus::Disabled
        },
    };

    let version_label = match &config.version_file {
        Some(file) => format!(
            "Bump version {} -> {} (patch) in {}",
            info.current_version, info.next_version, file
        ),
        None => format!(
            "Bump version {} -> {} (patch)",
            info.current_version, info.next_version
        ),
    };

    vec![
        step(
            ReleaseStepType::Fetch,
            format!("Fetch history and tags from {}", config.remote),
            options.fetch,
        ),
        step(
            ReleaseStepType::Bootstrap,
            format!("Create initial tag v{}", config.initial_version),
            info.needs_bootstrap,
        ),
        step(
            ReleaseStepType::Changelog,
            format!(
                "Write {} entries to {}",
                commit_count, config.changelog_path
            ),
            true,
        ),
        step(ReleaseStepType::Version, version_label, true),
        step(
            ReleaseStepType::Commit,
            format!("Commit: {}", config.commit_message),
            true,
        ),
        step(
            ReleaseStepType::Tag,
            format!("Tag {}", info.next_tag),
            true,
        ),
        step(
            ReleaseStepType::Push,
            format!("Push HEAD and {} to {}", info.next_tag, config.remote),
            options.push,
        ),
    ]
}
