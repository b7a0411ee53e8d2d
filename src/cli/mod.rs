//! Command-line interface for motiva
//!
//! This module defines the CLI structure using clap derive macros.
//! Each group of subcommands is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::clock::SystemClock;
use crate::config::{default_data_dir, Config};
use crate::error::{Error, Result};
use crate::session::Session;
use crate::storage::{SavedState, Storage};

mod backup;
mod profile;
mod stats;
mod task;

/// motiva - a to-do list that keeps score
///
/// Plan tasks by day, earn points for finishing them, keep a streak going
/// and unlock achievements along the way.
#[derive(Parser, Debug)]
#[command(name = "motiva")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the state document, backups and motiva.toml
    #[arg(long, global = true, env = "MOTIVA_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Configuration file (defaults to motiva.toml in the data directory)
    #[arg(long, global = true, env = "MOTIVA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task
    Add {
        /// Task title
        title: String,

        /// Longer description (earns bonus points)
        #[arg(short, long)]
        description: Option<String>,

        /// Category (Study, Health, Work, Home, Exercise, Projects, Personal, Other)
        #[arg(short, long)]
        category: Option<String>,

        /// Priority from 1 (low) to 5 (high)
        #[arg(short, long)]
        priority: Option<u8>,

        /// Day to schedule the task on (YYYY-MM-DD)
        #[arg(long, conflicts_with_all = ["today", "unscheduled"])]
        date: Option<String>,

        /// Schedule the task for today (the default)
        #[arg(long, conflicts_with = "unscheduled")]
        today: bool,

        /// Do not schedule the task on any day
        #[arg(long)]
        unscheduled: bool,
    },

    /// List tasks (today's agenda by default)
    #[command(visible_alias = "ls")]
    List {
        /// Show the agenda for a day (YYYY-MM-DD)
        #[arg(long, conflicts_with_all = ["today", "all"])]
        date: Option<String>,

        /// Show today's agenda
        #[arg(long, conflicts_with = "all")]
        today: bool,

        /// Show every task in insertion order
        #[arg(long)]
        all: bool,

        /// Only tasks in this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Complete a task and collect its points
    Done {
        /// Task id or unique id prefix
        id: String,
    },

    /// Edit a task's title, description, category or priority
    Edit {
        /// Task id or unique id prefix
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long)]
        priority: Option<u8>,
    },

    /// Delete a task (a completed task's points are taken back)
    #[command(visible_alias = "delete")]
    Rm {
        /// Task id or unique id prefix
        id: String,
    },

    /// Undo the last change to the task list
    Undo,

    /// Redo the last undone change
    Redo,

    /// Show per-day completion summaries
    Calendar,

    /// Show points, streaks and completion counts
    Stats,

    /// Show unlocked achievements
    Achievements {
        /// Include locked achievements
        #[arg(long)]
        all: bool,
    },

    /// Show or set your display name
    Name {
        /// New display name
        name: Option<String>,
    },

    /// Greeting plus today's agenda
    Today,

    /// Backup management
    #[command(subcommand)]
    Backup(BackupCommands),
}

/// Backup subcommands
#[derive(Subcommand, Debug)]
pub enum BackupCommands {
    /// List backups, oldest first
    List,

    /// Replace the current state with a backup
    Restore {
        /// Backup file name (backup_YYYYmmdd_HHMMSS.json)
        name: String,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let global = Global {
            data_dir: self.data_dir,
            config: self.config,
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Add {
                title,
                description,
                category,
                priority,
                date,
                today: _,
                unscheduled,
            } => task::run_add(task::AddOptions {
                title,
                description,
                category,
                priority,
                date,
                unscheduled,
                global,
            }),
            Commands::List {
                date,
                today: _,
                all,
                category,
            } => task::run_list(task::ListOptions {
                date,
                all,
                category,
                global,
            }),
            Commands::Done { id } => task::run_done(task::DoneOptions { id, global }),
            Commands::Edit {
                id,
                title,
                description,
                category,
                priority,
            } => task::run_edit(task::EditOptions {
                id,
                title,
                description,
                category,
                priority,
                global,
            }),
            Commands::Rm { id } => task::run_rm(task::RmOptions { id, global }),
            Commands::Undo => task::run_undo(global),
            Commands::Redo => task::run_redo(global),
            Commands::Calendar => task::run_calendar(global),
            Commands::Today => task::run_today(global),
            Commands::Stats => stats::run_stats(global),
            Commands::Achievements { all } => {
                stats::run_achievements(stats::AchievementsOptions { all, global })
            }
            Commands::Name { name } => profile::run_name(profile::NameOptions { name, global }),
            Commands::Backup(cmd) => match cmd {
                BackupCommands::List => backup::run_list(global),
                BackupCommands::Restore { name } => {
                    backup::run_restore(backup::RestoreOptions { name, global })
                }
            },
        }
    }
}

// =============================================================================
// Shared command plumbing
// =============================================================================

/// Flags every command receives.
#[derive(Debug, Clone)]
pub struct Global {
    pub data_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

impl Global {
    pub fn output(&self) -> crate::output::OutputOptions {
        crate::output::OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }
}

fn session_from(config: &Config, state: SavedState) -> Session {
    Session::from_state(state, config.history.limit, SystemClock)
        .with_categories(config.categories.known.clone())
}

/// Loaded configuration, storage and session for one command.
pub struct Context {
    pub config: Config,
    pub storage: Storage,
    pub session: Session,
    /// Problems found while loading that the user should hear about
    pub warnings: Vec<String>,
}

impl Context {
    pub fn load(global: &Global) -> Result<Self> {
        let data_dir = global.data_dir.clone().unwrap_or_else(default_data_dir);
        let config = match &global.config {
            Some(path) => Config::load(path).map_err(|err| match err {
                Error::InvalidConfig(_) => err,
                other => Error::InvalidConfig(format!("{}: {other}", path.display())),
            })?,
            None => Config::load_from_dir(&data_dir),
        };

        let storage = Storage::from_config(&config, &data_dir);
        debug!(data_file = %storage.data_file().display(), "loading state");

        let mut warnings = Vec::new();
        let state = match storage.try_load() {
            Ok(state) => state,
            Err(Error::Json(err)) => {
                let moved = storage.quarantine()?;
                warnings.push(format!(
                    "state document was unreadable ({err}); moved to {} and started empty",
                    moved.display()
                ));
                SavedState::default()
            }
            Err(err) => return Err(err),
        };

        let missing = config.categories.missing_counted();
        if !missing.is_empty() {
            warnings.push(format!(
                "categories.known leaves out {}; their achievements cannot unlock",
                missing.join(", ")
            ));
        }

        let session = session_from(&config, state);
        Ok(Self {
            config,
            storage,
            session,
            warnings,
        })
    }

    /// Persist the session. The returned path is the backup written, if any.
    pub fn save(&self) -> Result<Option<PathBuf>> {
        self.storage
            .try_save(&self.session.to_state(), self.session.now())
    }

    /// Replace the session with one built from `state`.
    pub fn replace_state(&mut self, state: SavedState) {
        self.session = session_from(&self.config, state);
    }

    /// Canonical spelling of a category, or the configured default. Unknown
    /// categories are kept as typed and reported.
    pub fn category(&mut self, raw: Option<&str>) -> String {
        let categories = &self.config.categories;
        let Some(raw) = raw else {
            return categories
                .canonical(&categories.default)
                .unwrap_or(&categories.default)
                .to_string();
        };
        match self.config.categories.canonical(raw) {
            Some(known) => known.to_string(),
            None => {
                let trimmed = raw.trim().to_string();
                if !trimmed.is_empty() {
                    self.warnings.push(format!(
                        "'{trimmed}' is not one of: {}",
                        self.config.categories.known.join(", ")
                    ));
                }
                trimmed
            }
        }
    }
}
