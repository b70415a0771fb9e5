use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::paths;
use crate::utils::io;

/// Root configuration structure for momentum-ops.json
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OpsConfig {
    #[serde(default)]
    pub app: AppConfig,

    #[serde(default)]
    pub release: ReleaseConfig,
}

/// Identity of the cluster-managed release and the tools that address it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_chart")]
    pub chart: String,

    #[serde(default = "default_helm_bin")]
    pub helm_bin: String,

    #[serde(default = "default_kubectl_bin")]
    pub kubectl_bin: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            namespace: default_namespace(),
            chart: default_chart(),
            helm_bin: default_helm_bin(),
            kubectl_bin: default_kubectl_bin(),
        }
    }
}

/// Settings for the tag/changelog/bump pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_initial_version")]
    pub initial_version: String,

    #[serde(default = "default_changelog_path")]
    pub changelog_path: String,

    /// Plain-text file holding the bare version. `null` keeps the version in tags only.
    #[serde(default = "default_version_file")]
    pub version_file: Option<String>,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    /// Commits touching only these paths don't trigger a release (with skip_ignored).
    #[serde(default = "default_ignore_paths")]
    pub ignore_paths: Vec<String>,

    /// Environment variable holding the push token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            initial_version: default_initial_version(),
            changelog_path: default_changelog_path(),
            version_file: default_version_file(),
            commit_message: default_commit_message(),
            remote: default_remote(),
            ignore_paths: default_ignore_paths(),
            token_env: default_token_env(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_app_name() -> String {
    "momentum-indicator".to_string()
}

fn default_namespace() -> String {
    "momentum".to_string()
}

fn default_chart() -> String {
    "./helm/momentum-indicator".to_string()
}

fn default_helm_bin() -> String {
    "helm".to_string()
}

fn default_kubectl_bin() -> String {
    "kubectl".to_string()
}

fn default_initial_version() -> String {
    "0.1.0".to_string()
}

fn default_changelog_path() -> String {
    "CHANGELOG.md".to_string()
}

fn default_version_file() -> Option<String> {
    Some("VERSION".to_string())
}

fn default_commit_message() -> String {
    "chore(release): update changelog and bump version".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_ignore_paths() -> Vec<String> {
    vec!["docs/**".to_string(), "**/*.md".to_string(), "*.md".to_string()]
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

// =============================================================================
// Loading functions
// =============================================================================

/// A loaded config together with the file it came from (None = built-in defaults).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub config: OpsConfig,
}

/// Load configuration.
///
/// An explicit path must exist. Otherwise `./momentum-ops.json`, then the global
/// config.json, then built-in defaults. A file that exists but does not parse is
/// always an error.
pub fn load(explicit: Option<&str>) -> Result<LoadedConfig> {
    if let Some(raw) = explicit {
        let path = paths::expand(raw)?;
        if !path.exists() {
            return Err(Error::validation_invalid_argument(
                "config",
                format!("Config file not found: {}", path.display()),
            ));
        }
        return load_from(&path);
    }

    let local = paths::local_config();
    if local.exists() {
        return load_from(&local);
    }

    if let Ok(global) = paths::global_config() {
        if global.exists() {
            return load_from(&global);
        }
    }

    Ok(LoadedConfig {
        source: None,
        config: OpsConfig::default(),
    })
}

/// Load and validate a config file at a known path.
pub fn load_from(path: &Path) -> Result<LoadedConfig> {
    let content = io::read_file(path, &format!("read {}", path.display()))?;

    let config = parse(&content, path)?;

    Ok(LoadedConfig {
        source: Some(path.display().to_string()),
        config,
    })
}

fn parse(content: &str, path: &Path) -> Result<OpsConfig> {
    let config: OpsConfig = serde_json::from_str(content)
        .map_err(|e| Error::config_invalid_json(path.display().to_string(), e))?;
    validate(&config)?;
    Ok(config)
}

/// Reject configs the wrapper or pipeline could not act on.
pub fn validate(config: &OpsConfig) -> Result<()> {
    let required = [
        ("app.name", &config.app.name),
        ("app.namespace", &config.app.namespace),
        ("app.chart", &config.app.chart),
        ("release.changelog_path", &config.release.changelog_path),
        ("release.remote", &config.release.remote),
    ];
    for (key, value) in required {
        if value.trim().is_empty() {
            return Err(Error::config_invalid_value(
                key,
                Some(value.clone()),
                "must not be empty",
            ));
        }
    }

    if semver::Version::parse(&config.release.initial_version).is_err() {
        return Err(Error::config_invalid_value(
            "release.initial_version",
            Some(config.release.initial_version.clone()),
            "must be MAJOR.MINOR.PATCH",
        ));
    }

    Ok(())
}

/// Get the path of the global config file (for display purposes)
pub fn global_config_path() -> Result<PathBuf> {
    paths::global_config()
}
