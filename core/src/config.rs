use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::repository::file::default_data_dir;

pub const DATA_DIR_ENV: &str = "DIETLOG_DATA_DIR";
pub const LOG_ENV: &str = "DIETLOG_LOG";

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {}", .0.display(), .1)]
    Read(PathBuf, #[source] std::io::Error),
    #[error("Failed to parse config file '{}': {}", .0.display(), .1)]
    Parse(PathBuf, #[source] serde_yaml::Error),
}

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding `diet.json` and the TUI log
    pub data_dir: PathBuf,
    /// `tracing` env-filter directive
    pub log_filter: String,
    /// Config file that was read, if any
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    log_filter: Option<String>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    pub fn load_with_env<F>(config_path: Option<PathBuf>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config {
            data_dir: default_data_dir().unwrap_or_else(|_| PathBuf::from(".dietlog")),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            config_file: None,
        };

        let path = match config_path {
            Some(p) => Some(p),
            None => Self::default_config_path(),
        };
        if let Some(path) = path.filter(|p| p.exists()) {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::Read(path.clone(), e))?;
            let file: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::Parse(path.clone(), e))?;

            if let Some(dir) = file.data_dir {
                // Relative paths are taken from the config file's directory
                config.data_dir = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
            }
            if let Some(filter) = file.log_filter {
                config.log_filter = filter;
            }
            config.config_file = Some(path);
        }

        if let Some(dir) = env(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(filter) = env(LOG_ENV) {
            config.log_filter = filter;
        }

        Ok(config)
    }

    /// ~/.config/dietlog/config.yaml
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("dietlog").join("config.yaml"))
    }
}
