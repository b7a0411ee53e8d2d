//! motiva - Gamified To-Do Library
//!
//! This library provides the core of the motiva to-do tracker: tasks with an
//! undo/redo history, points and streaks for finished work, one-time
//! achievements and motivational messages.
//!
//! # Core Concepts
//!
//! - **Tasks**: titled, categorized, prioritized items scheduled on a day
//! - **Points**: `priority * 10`, plus a bonus for a written description
//! - **Streaks**: consecutive calendar days with at least one completion
//! - **Achievements**: milestones that unlock once and stay unlocked
//! - **History**: linear undo/redo over the task list and its stats
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `clock`: Injectable source of the current local time
//! - `config`: Configuration loading from `motiva.toml`
//! - `error`: Error types and result aliases
//! - `task`: Task entity and input validation
//! - `undo`: Bounded undo/redo log
//! - `store`: Task list and date queries
//! - `stats`: Points, completion counts and streaks
//! - `achievements`: Achievement registry and unlock tracking
//! - `messages`: Motivational message selection
//! - `session`: One user's state wired together, with undo/redo
//! - `storage`: JSON state document and backups
//! - `output`: Human and JSON command output

pub mod achievements;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod messages;
pub mod output;
pub mod session;
pub mod stats;
pub mod storage;
pub mod store;
pub mod task;
pub mod undo;

pub use error::{Error, Result};
