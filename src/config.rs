//! Configuration loading and management
//!
//! Handles parsing of `motiva.toml` configuration files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::achievements::counted_categories;
use crate::error::{Error, Result};
use crate::task::{DEFAULT_CATEGORY, KNOWN_CATEGORIES};
use crate::undo::DEFAULT_HISTORY_LIMIT;

/// Name of the configuration file inside the data directory
pub const CONFIG_FILE: &str = "motiva.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where state and backups are written
    #[serde(default)]
    pub storage: StorageConfig,

    /// Undo/redo history
    #[serde(default)]
    pub history: HistoryConfig,

    /// Task categories offered to the user
    #[serde(default)]
    pub categories: CategoriesConfig,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// State document, relative to the data directory unless absolute
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Backup directory, relative to the data directory unless absolute
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,

    /// Write a timestamped backup on every save
    #[serde(default = "default_true")]
    pub backups: bool,

    /// Number of newest backups to keep (0 keeps all)
    #[serde(default = "default_keep_backups")]
    pub keep_backups: usize,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("motiva_data.json")
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from("backups")
}

fn default_true() -> bool {
    true
}

fn default_keep_backups() -> usize {
    20
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            backup_dir: default_backup_dir(),
            backups: true,
            keep_backups: default_keep_backups(),
        }
    }
}

/// Undo/redo history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of undo steps kept
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: default_history_limit(),
        }
    }
}

/// Category configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesConfig {
    /// Categories listed in help and accepted without a warning
    #[serde(default = "default_known_categories")]
    pub known: Vec<String>,

    /// Category used when none is given
    #[serde(default = "default_category")]
    pub default: String,
}

fn default_known_categories() -> Vec<String> {
    KNOWN_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            known: default_known_categories(),
            default: default_category(),
        }
    }
}

impl CategoriesConfig {
    /// Case-insensitive lookup returning the configured spelling.
    pub fn canonical(&self, category: &str) -> Option<&str> {
        let trimmed = category.trim();
        self.known
            .iter()
            .find(|known| known.eq_ignore_ascii_case(trimmed))
            .map(String::as_str)
    }

    /// Categories counted by achievements that this list leaves out. The
    /// match is exact because tasks are stored with the configured spelling.
    pub fn missing_counted(&self) -> Vec<&'static str> {
        counted_categories()
            .filter(|counted| !self.known.iter().any(|known| known == counted))
            .collect()
    }
}

impl Config {
    /// Load configuration from a `motiva.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults
    pub fn load_from_dir(data_dir: &Path) -> Self {
        let config_path = data_dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Absolute path of the state document
    pub fn data_file(&self, data_dir: &Path) -> PathBuf {
        resolve(data_dir, &self.storage.data_file)
    }

    /// Absolute path of the backup directory
    pub fn backup_dir(&self, data_dir: &Path) -> PathBuf {
        resolve(data_dir, &self.storage.backup_dir)
    }

    fn validate(&self) -> Result<()> {
        if self.storage.data_file.as_os_str().is_empty() {
            return Err(Error::InvalidConfig(
                "storage.data_file cannot be empty".to_string(),
            ));
        }
        if self.storage.backup_dir.as_os_str().is_empty() {
            return Err(Error::InvalidConfig(
                "storage.backup_dir cannot be empty".to_string(),
            ));
        }
        if self.history.limit == 0 {
            return Err(Error::InvalidConfig(
                "history.limit must be >= 1".to_string(),
            ));
        }
        if self.categories.known.is_empty() {
            return Err(Error::InvalidConfig(
                "categories.known cannot be empty".to_string(),
            ));
        }
        if self
            .categories
            .known
            .iter()
            .any(|category| category.trim().is_empty())
        {
            return Err(Error::InvalidConfig(
                "categories.known cannot contain empty names".to_string(),
            ));
        }
        if self.categories.canonical(&self.categories.default).is_none() {
            return Err(Error::InvalidConfig(format!(
                "categories.default '{}' is not in categories.known",
                self.categories.default
            )));
        }
        Ok(())
    }
}

/// Platform data directory for motiva, falling back to the working directory
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "motiva")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
