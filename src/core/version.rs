use semver::Version;
use serde::Serialize;
use std::path::Path;

use crate::error::{Error, Result};
use crate::git::{self, VersionTag};
use crate::utils::io;

/// Increment the patch component, clearing any pre-release or build metadata.
pub fn bump_patch(version: &Version) -> Version {
    Version::new(version.major, version.minor, version.patch + 1)
}

/// Parse a bare `MAJOR.MINOR.PATCH` string.
pub fn parse(version: &str) -> Result<Version> {
    Version::parse(version.trim())
        .map_err(|e| Error::release_version_invalid(version, e.to_string()))
}

/// Version of a resolved tag.
pub fn tag_version(tag: &VersionTag) -> Result<Version> {
    git::parse_version_tag(&tag.name)
        .ok_or_else(|| Error::release_version_invalid(&tag.name, "expected vMAJOR.MINOR.PATCH"))
}

/// Rewrite the version file with the bare version string.
pub fn write_version_file(path: &Path, version: &Version) -> Result<()> {
    io::write_file_atomic(path, &format!("{}\n", version), "write version file")
}

/// Current and next version as seen from the repository's tags.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_tag: Option<String>,
    pub current_version: String,
    pub next_version: String,
    pub next_tag: String,
    /// True when no tag exists yet and the pipeline would bootstrap one first.
    pub needs_bootstrap: bool,
}

/// Resolve the current version (latest reachable tag, or the initial version).
pub fn read_version(repo: &Path, initial_version: &str) -> Result<VersionInfo> {
    let latest = git::get_latest_version_tag(repo)?;
    let (current_tag, current) = match &latest {
        Some(tag) => (Some(tag.name.clone()), tag_version(tag)?),
        None => (None, parse(initial_version)?),
    };
    let next = bump_patch(&current);

    Ok(VersionInfo {
        needs_bootstrap: current_tag.is_none(),
        current_tag,
        current_version: current.to_string(),
        next_tag: git::tag_name(&next),
        next_version: next.to_string(),
    })
}
