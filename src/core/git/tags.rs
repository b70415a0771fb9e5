use regex::Regex;
use semver::Version;
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::utils::command;

use super::path_str;
use super::primitives::detail_text;

fn version_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^v(\d+\.\d+\.\d+)$").expect("version tag regex is valid")
    })
}

/// A `vMAJOR.MINOR.PATCH` tag and its parsed version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionTag {
    pub name: String,
    pub version: String,
}

/// Parse a tag name as a release version. Pre-release and non-`v` tags are ignored.
pub fn parse_version_tag(tag: &str) -> Option<Version> {
    let caps = version_tag_regex().captures(tag.trim())?;
    Version::parse(caps.get(1)?.as_str()).ok()
}

/// Canonical tag name for a version.
pub fn tag_name(version: &Version) -> String {
    format!("v{}", version)
}

/// Pick the highest version among tag names.
pub fn highest_version_tag<'a, I>(tags: I) -> Option<VersionTag>
where
    I: IntoIterator<Item = &'a str>,
{
    tags.into_iter()
        .filter_map(|t| parse_version_tag(t).map(|v| (v, t)))
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(version, name)| VersionTag {
            name: name.trim().to_string(),
            version: version.to_string(),
        })
}

/// List `v*` tags reachable from HEAD.
pub fn list_reachable_tags(path: &Path) -> Result<Vec<String>> {
    let stdout = command::run_in(
        &path_str(path),
        "git",
        &["tag", "--merged", "HEAD", "--list", "v*"],
        "git tag --merged",
    )
    .map_err(|e| Error::git_command_failed(detail_text(&e)))?;

    Ok(stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect())
}

/// Get the most recent version tag: the highest semver among tags reachable from HEAD.
/// Returns None if no version tags exist.
pub fn get_latest_version_tag(path: &Path) -> Result<Option<VersionTag>> {
    let tags = list_reachable_tags(path)?;
    Ok(highest_version_tag(tags.iter().map(String::as_str)))
}

/// Check if a tag exists locally.
pub fn tag_exists_locally(path: &Path, tag_name: &str) -> bool {
    command::run_in_optional(&path_str(path), "git", &["tag", "-l", tag_name])
        .map(|s| !s.is_empty())
        .unwrap_or(false)
}
