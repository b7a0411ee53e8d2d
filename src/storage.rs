//! Storage layer for motiva
//!
//! Persists the whole application state as one JSON document and keeps
//! timestamped copies next to it.
//!
//! # Directory Structure
//!
//! ```text
//! <data dir>/
//!   motiva.toml                     # Optional configuration
//!   motiva_data.json                # Tasks, stats, name, achievements, history
//!   backups/
//!     backup_<YYYYmmdd_HHMMSS>.json # Copy written after every save
//! ```
//!
//! Reading never fails from the caller's point of view: a missing or corrupt
//! document yields an empty state. `save` logs failures instead of returning
//! them; `try_save` is the fallible variant.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::Checkpoint;
use crate::stats::Stats;
use crate::task::Task;
use crate::undo::UndoLog;

const BACKUP_PREFIX: &str = "backup_";
const BACKUP_SUFFIX: &str = ".json";
const BACKUP_TIMESTAMP: &str = "%Y%m%d_%H%M%S";

/// The persisted application state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedState {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub stats: Stats,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Unlocked achievement keys
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub achievements: Vec<String>,
    /// Undo/redo checkpoints, newest last
    #[serde(default)]
    pub history: UndoLog<Checkpoint>,
}

/// Storage manager for the state document and its backups
#[derive(Debug, Clone)]
pub struct Storage {
    data_file: PathBuf,
    backup_dir: PathBuf,
    backups: bool,
    keep_backups: usize,
}

impl Storage {
    /// Create a storage manager with backups enabled and no pruning
    pub fn new(data_file: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            backup_dir: backup_dir.into(),
            backups: true,
            keep_backups: 0,
        }
    }

    /// Create storage from configuration, resolving paths against `data_dir`
    pub fn from_config(config: &Config, data_dir: &Path) -> Self {
        Self::new(config.data_file(data_dir), config.backup_dir(data_dir))
            .with_backups(config.storage.backups)
            .keep_backups(config.storage.keep_backups)
    }

    pub fn with_backups(mut self, enabled: bool) -> Self {
        self.backups = enabled;
        self
    }

    /// Keep only the newest `count` backups (0 keeps all)
    pub fn keep_backups(mut self, count: usize) -> Self {
        self.keep_backups = count;
        self
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Whether a state document exists yet
    pub fn exists(&self) -> bool {
        self.data_file.exists()
    }

    // =========================================================================
    // Load
    // =========================================================================

    /// Load the state, falling back to an empty state on any failure
    pub fn load(&self) -> SavedState {
        match self.try_load() {
            Ok(state) => state,
            Err(err) => {
                warn!(
                    path = %self.data_file.display(),
                    error = %err,
                    "unreadable state document, starting empty"
                );
                SavedState::default()
            }
        }
    }

    /// Load the state; a missing document is an empty state
    pub fn try_load(&self) -> Result<SavedState> {
        if !self.data_file.exists() {
            debug!(path = %self.data_file.display(), "no state document yet");
            return Ok(SavedState::default());
        }
        read_json(&self.data_file)
    }

    /// Move an unreadable state document aside so the next save starts
    /// fresh. Returns the new location.
    pub fn quarantine(&self) -> Result<PathBuf> {
        let mut name = self
            .data_file
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".corrupt");
        let target = self.data_file.with_file_name(name);
        fs::rename(&self.data_file, &target)?;
        warn!(
            from = %self.data_file.display(),
            to = %target.display(),
            "moved unreadable state document aside"
        );
        Ok(target)
    }

    // =========================================================================
    // Save
    // =========================================================================

    /// Save the state, logging rather than returning failures
    pub fn save(&self, state: &SavedState, now: NaiveDateTime) {
        if let Err(err) = self.try_save(state, now) {
            error!(path = %self.data_file.display(), error = %err, "failed to save state");
        }
    }

    /// Save the state and write a backup copy. Returns the backup path if
    /// one was written. A failed backup is logged; the main write still
    /// counts as saved.
    pub fn try_save(&self, state: &SavedState, now: NaiveDateTime) -> Result<Option<PathBuf>> {
        let json = serde_json::to_string_pretty(state)?;
        write_atomic(&self.data_file, json.as_bytes())?;
        debug!(path = %self.data_file.display(), tasks = state.tasks.len(), "state saved");

        if !self.backups {
            return Ok(None);
        }

        let backup = self.backup_dir.join(backup_name(now));
        match write_atomic(&backup, json.as_bytes()) {
            Ok(()) => {
                if let Err(err) = self.prune_backups() {
                    warn!(error = %err, "failed to prune backups");
                }
                Ok(Some(backup))
            }
            Err(err) => {
                error!(path = %backup.display(), error = %err, "failed to write backup");
                Ok(None)
            }
        }
    }

    // =========================================================================
    // Backups
    // =========================================================================

    /// Backup file names, oldest first
    pub fn list_backups(&self) -> Result<Vec<String>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.backup_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if is_backup_name(&name) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Read a backup by file name
    pub fn restore_backup(&self, name: &str) -> Result<SavedState> {
        let name = name.trim();
        if !is_backup_name(name) || name.contains(['/', '\\']) {
            return Err(Error::InvalidArgument(format!(
                "'{name}' is not a backup file name (expected {BACKUP_PREFIX}<timestamp>{BACKUP_SUFFIX})"
            )));
        }

        let path = self.backup_dir.join(name);
        if !path.exists() {
            return Err(Error::BackupNotFound(name.to_string()));
        }
        read_json(&path)
    }

    fn prune_backups(&self) -> Result<()> {
        if self.keep_backups == 0 {
            return Ok(());
        }
        let names = self.list_backups()?;
        let excess = names.len().saturating_sub(self.keep_backups);
        for name in &names[..excess] {
            fs::remove_file(self.backup_dir.join(name))?;
            debug!(backup = %name, "pruned backup");
        }
        Ok(())
    }
}

pub fn backup_name(now: NaiveDateTime) -> String {
    format!(
        "{BACKUP_PREFIX}{}{BACKUP_SUFFIX}",
        now.format(BACKUP_TIMESTAMP)
    )
}

fn is_backup_name(name: &str) -> bool {
    name.starts_with(BACKUP_PREFIX) && name.ends_with(BACKUP_SUFFIX)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    let data: T = serde_json::from_str(&content)?;
    Ok(data)
}

/// Write data atomically using a temp file in the same directory + rename
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(&parent)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| Error::Io(err.error))?;
    Ok(())
}
