use crate::catalog::GenreId;
use crate::format::DEFAULT_DATE_FORMAT;
use crate::view::SortKey;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = "podcast-explorer.log";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid date_format \"{0}\"")]
    InvalidDateFormat(String),
}

/// User preferences, read from `config.json`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Alternate catalog JSON; the embedded data set is used when unset.
    pub data_path: Option<PathBuf>,
    /// Genre selected at startup, `None` for all genres.
    pub default_genre: Option<GenreId>,
    pub default_sort: SortKey,
    /// strftime pattern for dates older than 30 days.
    pub date_format: String,
    pub mouse: bool,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            default_genre: None,
            default_sort: SortKey::Updated,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            mouse: true,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "podcast-explorer", "podcast-explorer")
}

/// Platform location of `config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join(CONFIG_FILE_NAME))
}

impl ExplorerConfig {
    /// Load from `explicit` (must exist) or the platform location (may be absent).
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };
        Self::from_path(&path)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidDateFormat(self.date_format.clone()));
        }
        Ok(())
    }

    /// Log file used while the TUI owns the terminal.
    pub fn log_path(&self) -> PathBuf {
        if let Some(path) = &self.log_file {
            return path.clone();
        }
        project_dirs()
            .map(|d| d.cache_dir().join(LOG_FILE_NAME))
            .unwrap_or_else(|| std::env::temp_dir().join(LOG_FILE_NAME))
    }
}
