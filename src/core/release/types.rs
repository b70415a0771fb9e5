use serde::Serialize;

use crate::changelog::ChangelogWrite;
use crate::git::CommitInfo;

/// Steps of the release pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReleaseStepType {
    Fetch,
    Bootstrap,
    Changelog,
    Version,
    Commit,
    Tag,
    Push,
}

impl ReleaseStepType {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            ReleaseStepType::Fetch => "git.fetch",
            ReleaseStepType::Bootstrap => "git.bootstrap_tag",
            ReleaseStepType::Changelog => "changelog",
            ReleaseStepType::Version => "version",
            ReleaseStepType::Commit => "git.commit",
            ReleaseStepType::Tag => "git.tag",
            ReleaseStepType::Push => "git.push",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    /// Fetch history and tags from the remote first.
    pub fetch: bool,
    /// Push the bootstrap tag, the release commit and the release tag.
    pub push: bool,
    /// Do nothing when every new commit only touches ignored paths.
    pub skip_ignored: bool,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        Self {
            fetch: true,
            push: true,
            skip_ignored: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleasePlanStatus {
    Ready,
    Disabled,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleasePlanStep {
    pub id: String,
    pub label: String,
    pub status: ReleasePlanStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleasePlan {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_tag: Option<String>,
    pub current_version: String,
    pub next_version: String,
    pub next_tag: String,
    pub bootstrap: bool,
    pub commits: Vec<CommitInfo>,
    pub steps: Vec<ReleasePlanStep>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseStepStatus {
    Success,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseStepResult {
    pub id: String,
    pub status: ReleaseStepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseRunStatus {
    Released,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseRun {
    pub status: ReleaseRunStatus,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changelog: Option<ChangelogWrite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub steps: Vec<ReleaseStepResult>,
    pub started_at: String,
    pub finished_at: String,
}
