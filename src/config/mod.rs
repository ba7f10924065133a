use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const STATE_DIR_NAME: &str = ".gatherbot";
pub const CONFIG_FILE_NAME: &str = "settings.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to resolve home directory for state root")]
    HomeDirectoryUnavailable,
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Process-level knobs of the polling loop. The bot token stays in the
/// `TELEGRAM_TOKEN` env var and the per-chat settings (locale, timezone,
/// cursor) live in the database; neither belongs in this file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u64,
    #[serde(default)]
    pub run_budget_seconds: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_seconds: default_poll_interval_seconds(),
            run_budget_seconds: None,
        }
    }
}

fn default_poll_interval_seconds() -> u64 {
    15
}

impl Config {
    /// Read `settings.yaml` under the state root; a missing file means
    /// defaults.
    pub fn load(state_root: &Path) -> Result<Self, ConfigError> {
        let path = state_root.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

pub fn default_state_root() -> Result<PathBuf, ConfigError> {
    if let Ok(root) = std::env::var("GATHERBOT_STATE_ROOT") {
        if !root.trim().is_empty() {
            return Ok(PathBuf::from(root));
        }
    }
    let home = std::env::var("HOME")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(PathBuf::from(home).join(STATE_DIR_NAME))
}

pub fn database_path(state_root: &Path) -> PathBuf {
    state_root.join("gatherbot.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempdir().expect("tempdir");
        let config = Config::load(temp.path()).expect("load");
        assert_eq!(config, Config::default());
        assert_eq!(config.poll_interval_seconds, 15);
        assert_eq!(config.run_budget_seconds, None);
    }

    #[test]
    fn file_values_override_defaults() {
        let temp = tempdir().expect("tempdir");
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "poll_interval_seconds: 5\nrun_budget_seconds: 600\n",
        )
        .expect("write");
        let config = Config::load(temp.path()).expect("load");
        assert_eq!(config.poll_interval_seconds, 5);
        assert_eq!(config.run_budget_seconds, Some(600));
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join(CONFIG_FILE_NAME), "poll_interval_seconds: 30\n")
            .expect("write");
        let config = Config::load(temp.path()).expect("load");
        assert_eq!(config.poll_interval_seconds, 30);
        assert_eq!(config.run_budget_seconds, None);
    }
}
