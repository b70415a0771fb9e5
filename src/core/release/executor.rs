use semver::Version;
use std::path::{Path, PathBuf};

use crate::changelog::{self, ChangelogWrite};
use crate::defaults::ReleaseConfig;
use crate::error::{Error, Result};
use crate::git::{self, CommitInfo, GitAuth, GitOutput, VersionTag};
use crate::utils::io;
use crate::version;

use super::types::{ReleaseOptions, ReleaseStepResult, ReleaseStepStatus, ReleaseStepType};

/// Runs the individual pipeline steps against one repository and records each outcome.
pub(crate) struct ReleaseStepExecutor<'a> {
    repo: &'a Path,
    config: &'a ReleaseConfig,
    options: &'a ReleaseOptions,
    auth: GitAuth,
    pub(crate) steps: Vec<ReleaseStepResult>,
}

impl<'a> ReleaseStepExecutor<'a> {
    pub fn new(
        repo: &'a Path,
        config: &'a ReleaseConfig,
        options: &'a ReleaseOptions,
        auth: GitAuth,
    ) -> Self {
        Self {
            repo,
            config,
            options,
            auth,
            steps: Vec::new(),
        }
    }

    fn record(
        &mut self,
        step: ReleaseStepType,
        status: ReleaseStepStatus,
        message: Option<String>,
        data: Option<serde_json::Value>,
    ) {
        self.steps.push(ReleaseStepResult {
            id: step.as_str().to_string(),
            status,
            message,
            data,
        });
    }

    fn record_git(&mut self, step: ReleaseStepType, output: &GitOutput) -> Result<()> {
        let data = serde_json::to_value(output).map_err(|e| {
            Error::internal_json(e.to_string(), Some(format!("{} output", step.as_str())))
        })?;
        self.record(step, ReleaseStepStatus::Success, None, Some(data));
        Ok(())
    }

    fn skip(&mut self, step: ReleaseStepType, reason: &str) {
        self.record(step, ReleaseStepStatus::Skipped, Some(reason.to_string()), None);
    }

    pub fn run_fetch(&mut self) -> Result<()> {
        if !self.options.fetch {
            self.skip(ReleaseStepType::Fetch, "fetch disabled");
            return Ok(());
        }

        crate::log_status!("release", "Fetching history and tags from {}", self.config.remote);
        let output = git::fetch(self.repo, &self.config.remote, &self.auth)?
            .require_success()
            .map_err(|e| e.with_retryable(true))?;
        self.record_git(ReleaseStepType::Fetch, &output)
    }

    /// Create (and push) the initial tag when the repository has none.
    /// Returns the tag that the rest of the run treats as the latest.
    pub fn run_bootstrap(&mut self, latest: Option<VersionTag>) -> Result<(VersionTag, bool)> {
        if let Some(tag) = latest {
            self.skip(ReleaseStepType::Bootstrap, "version tag already exists");
            return Ok((tag, false));
        }

        let initial = version::parse(&self.config.initial_version)?;
        let tag_name = git::tag_name(&initial);

        if git::tag_exists_locally(self.repo, &tag_name) {
            return Err(Error::validation_invalid_argument(
                "tag",
                format!(
                    "Bootstrap tag '{}' exists but is not reachable from HEAD",
                    tag_name
                ),
            )
            .with_hint(format!("Delete the stray tag: git tag -d {}", tag_name)));
        }

        crate::log_status!("release", "No version tag found, creating {}", tag_name);
        let message = format!("Initial version {}", tag_name);
        let tag_output =
            git::create_annotated_tag(self.repo, &tag_name, &message)?.require_success()?;

        let mut data = serde_json::json!({ "tag": tag_name, "pushed": false });
        if self.options.push {
            git::push_tag(self.repo, &self.config.remote, &tag_name, &self.auth)?
                .require_success()
                .map_err(|e| e.with_retryable(true))?;
            data["pushed"] = serde_json::Value::Bool(true);
        }
        data["output"] = serde_json::Value::String(tag_output.stdout);
        self.record(
            ReleaseStepType::Bootstrap,
            ReleaseStepStatus::Success,
            None,
            Some(data),
        );

        Ok((
            VersionTag {
                name: tag_name,
                version: initial.to_string(),
            },
            true,
        ))
    }

    pub fn run_changelog(&mut self, commits: &[CommitInfo]) -> Result<ChangelogWrite> {
        let path = self.changelog_path();
        let written = changelog::write(&path, commits)?;
        crate::log_status!(
            "release",
            "Wrote {} changelog entries to {}",
            written.entries,
            written.path
        );
        let data = serde_json::to_value(&written).map_err(|e| {
            Error::internal_json(e.to_string(), Some("changelog output".to_string()))
        })?;
        self.record(ReleaseStepType::Changelog, ReleaseStepStatus::Success, None, Some(data));
        Ok(written)
    }

    pub fn run_version(&mut self, latest: &VersionTag) -> Result<Version> {
        let current = version::tag_version(latest)?;
        let next = version::bump_patch(&current);

        if let Some(path) = self.version_file_path() {
            version::write_version_file(&path, &next)?;
        }

        crate::log_status!("release", "Version {} -> {}", current, next);
        self.record(
            ReleaseStepType::Version,
            ReleaseStepStatus::Success,
            None,
            Some(serde_json::json!({
                "bump": "patch",
                "from": current.to_string(),
                "to": next.to_string(),
            })),
        );
        Ok(next)
    }

    /// Commit changelog and version file. An empty commit is tolerated.
    pub fn run_commit(&mut self) -> Result<()> {
        let mut files = vec![self.config.changelog_path.clone()];
        if let Some(version_file) = &self.config.version_file {
            files.push(version_file.clone());
        }
        let file_refs: Vec<&str> = files.iter().map(String::as_str).collect();

        let output = git::commit_paths(self.repo, &file_refs, &self.config.commit_message)?
            .require_success()?;

        if output.stdout == git::NOTHING_TO_COMMIT {
            crate::log_status!("release", "{}", git::NOTHING_TO_COMMIT);
            self.skip(ReleaseStepType::Commit, git::NOTHING_TO_COMMIT);
            return Ok(());
        }
        self.record_git(ReleaseStepType::Commit, &output)
    }

    /// Tag HEAD with the new version.
    ///
    /// The new tag is one patch above the highest tag reachable from HEAD, so an
    /// existing tag with that name always lives on another line of history.
    pub fn run_tag(&mut self, tag_name: &str) -> Result<()> {
        if git::tag_exists_locally(self.repo, tag_name) {
            let tag_commit = git::get_tag_commit(self.repo, tag_name)?;
            let head_commit = git::get_head_commit(self.repo)?;

            return Err(Error::validation_invalid_argument(
                "tag",
                format!(
                    "Tag '{}' already exists on another commit ({}, HEAD is {})",
                    tag_name,
                    short_sha(&tag_commit),
                    short_sha(&head_commit)
                ),
            )
            .with_hint(format!("Delete stale tag: git tag -d {}", tag_name)));
        }

        let message = format!("Release {}", tag_name);
        let output =
            git::create_annotated_tag(self.repo, tag_name, &message)?.require_success()?;
        crate::log_status!("release", "Tagged {}", tag_name);
        self.record_git(ReleaseStepType::Tag, &output)
    }

    pub fn run_push(&mut self, tag_name: &str) -> Result<()> {
        if !self.options.push {
            self.skip(ReleaseStepType::Push, "push disabled");
            return Ok(());
        }

        crate::log_status!("release", "Pushing HEAD and {} to {}", tag_name, self.config.remote);
        let head = git::push_head(self.repo, &self.config.remote, &self.auth)?
            .require_success()
            .map_err(|e| e.with_retryable(true))?;
        let tag = git::push_tag(self.repo, &self.config.remote, tag_name, &self.auth)?
            .require_success()
            .map_err(|e| e.with_retryable(true))?;

        self.record(
            ReleaseStepType::Push,
            ReleaseStepStatus::Success,
            None,
            Some(serde_json::json!({
                "remote": self.config.remote,
                "head": head.stderr,
                "tag": tag.stderr,
            })),
        );
        Ok(())
    }

    pub fn changelog_path(&self) -> PathBuf {
        io::resolve_path(self.repo, &self.config.changelog_path)
    }

    fn version_file_path(&self) -> Option<PathBuf> {
        self.config
            .version_file
            .as_deref()
            .map(|file| io::resolve_path(self.repo, file))
    }
}

fn short_sha(sha: &str) -> &str {
    &sha[..8.min(sha.len())]
}
