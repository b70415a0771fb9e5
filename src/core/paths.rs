use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Project-local config file name, looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "momentum-ops.json";

/// Base config directory (~/.config/momentum-ops/ on all platforms)
pub fn momentum_ops() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("momentum-ops"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("momentum-ops"))
    }
}

/// Global config.json path
pub fn global_config() -> Result<PathBuf> {
    Ok(momentum_ops()?.join("config.json"))
}

/// Project-local config path relative to the current directory
pub fn local_config() -> PathBuf {
    PathBuf::from(LOCAL_CONFIG_FILE)
}

/// Expand `~` and environment variables in a user-supplied path.
pub fn expand(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path).map_err(|e| {
        Error::validation_invalid_argument(
            "path",
            format!("Cannot expand '{}': {}", path, e),
        )
    })?;
    Ok(PathBuf::from(expanded.as_ref()))
}
