//! Application session.
//!
//! Wires one user action through the store, the stats engine, the
//! achievement tracker and the message selector. The clock is read once per
//! action so every component sees the same instant.
//!
//! The session also owns the undo history. Each entry holds the task list
//! and the stats together, so undo and redo never leave points booked for a
//! completion that is no longer there.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::achievements::{Achievement, AchievementTracker};
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::messages::MessageSelector;
use crate::stats::{Stats, StatsEngine};
use crate::storage::SavedState;
use crate::store::{CompleteOutcome, TaskStore};
use crate::task::{Task, TaskDraft, TaskEdit, TaskId};
use crate::undo::UndoLog;

/// Task list and stats as they stood before one change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub stats: Stats,
}

/// What completing a task produced.
#[derive(Debug, Clone, Serialize)]
pub struct Completion {
    pub task: Task,
    pub points: u32,
    pub total_points: u32,
    pub current_streak: u32,
    pub message: &'static str,
    pub unlocked: Vec<&'static Achievement>,
}

#[derive(Debug, Clone)]
pub enum TaskCompletion {
    NotFound,
    AlreadyCompleted(Task),
    Completed(Completion),
}

#[derive(Debug)]
pub struct Session<C: Clock = SystemClock> {
    store: TaskStore,
    stats: StatsEngine,
    history: UndoLog<Checkpoint>,
    achievements: AchievementTracker,
    messages: MessageSelector,
    username: Option<String>,
    clock: C,
}

impl Session<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for Session<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Session<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            store: TaskStore::new(),
            stats: StatsEngine::new(),
            history: UndoLog::default(),
            achievements: AchievementTracker::new(),
            messages: MessageSelector::new(),
            username: None,
            clock,
        }
    }

    /// Resume a session from persisted state.
    pub fn from_state(state: SavedState, history_limit: usize, clock: C) -> Self {
        let SavedState {
            tasks,
            stats,
            username,
            achievements,
            mut history,
        } = state;
        history.set_limit(history_limit);
        Self {
            store: TaskStore::from_tasks(tasks),
            stats: StatsEngine::from_stats(stats),
            history,
            achievements: AchievementTracker::with_unlocked(achievements),
            messages: MessageSelector::new(),
            username: username.filter(|name| !name.trim().is_empty()),
            clock,
        }
    }

    pub fn with_messages(mut self, messages: MessageSelector) -> Self {
        self.messages = messages;
        self
    }

    /// Categories the every-category achievement checks.
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.achievements = self.achievements.with_categories(categories);
        self
    }

    pub fn to_state(&self) -> SavedState {
        SavedState {
            tasks: self.store.tasks().to_vec(),
            stats: self.stats.snapshot().clone(),
            username: self.username.clone(),
            achievements: self
                .achievements
                .unlocked_keys()
                .map(str::to_string)
                .collect(),
            history: self.history.clone(),
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn stats(&self) -> &Stats {
        self.stats.snapshot()
    }

    pub fn history(&self) -> &UndoLog<Checkpoint> {
        &self.history
    }

    pub fn achievements(&self) -> &AchievementTracker {
        &self.achievements
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn set_username(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("name cannot be empty".to_string()));
        }
        self.username = Some(name.to_string());
        Ok(())
    }

    pub fn greeting(&mut self) -> String {
        let now = self.clock.now();
        let name = self.username.clone().unwrap_or_default();
        self.messages.greeting(&name, now)
    }

    // =========================================================================
    // Actions
    // =========================================================================

    pub fn add_task(&mut self, draft: TaskDraft) -> Result<Task> {
        let now = self.clock.now();
        let before = self.checkpoint();
        let task = self.store.add(draft, now)?;
        self.history.record(before);
        Ok(task)
    }

    pub fn complete_task(&mut self, id: &TaskId) -> TaskCompletion {
        let now = self.clock.now();
        let before = self.checkpoint();
        let task = match self.store.complete(id, now) {
            CompleteOutcome::NotFound => return TaskCompletion::NotFound,
            CompleteOutcome::AlreadyCompleted(task) => {
                return TaskCompletion::AlreadyCompleted(task)
            }
            CompleteOutcome::Completed(task) => task,
        };
        self.history.record(before);

        let points = self.stats.record_completion(&task, now);
        let stats = self.stats.snapshot();
        let message = self.messages.pick(Some(&task), Some(stats), now);
        let unlocked = self
            .achievements
            .check_newly_unlocked(stats, Some(&task), now);

        info!(
            id = %task.id,
            points,
            unlocked = unlocked.len(),
            "task completed"
        );

        TaskCompletion::Completed(Completion {
            points,
            total_points: stats.total_points,
            current_streak: stats.current_streak,
            message,
            unlocked,
            task,
        })
    }

    pub fn edit_task(&mut self, id: &TaskId, edit: TaskEdit) -> Result<Option<Task>> {
        let before = self.checkpoint();
        let edited = self.store.edit(id, edit)?;
        if edited.is_some() {
            self.history.record(before);
        }
        Ok(edited)
    }

    /// Delete a task; a completed task's points are taken back out.
    pub fn delete_task(&mut self, id: &TaskId) -> Option<Task> {
        let before = self.checkpoint();
        let task = self.store.delete(id)?;
        self.history.record(before);
        if task.completed {
            self.stats.remove_completion_points(&task);
        }
        Some(task)
    }

    /// Step back one change, restoring the task list and the stats.
    /// Unlocked achievements stay unlocked.
    pub fn undo(&mut self) -> bool {
        let current = self.checkpoint();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                debug!(depth = self.history.undo_depth(), "undo");
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.checkpoint();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                debug!(depth = self.history.redo_depth(), "redo");
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            tasks: self.store.tasks().to_vec(),
            stats: self.stats.snapshot().clone(),
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.store.replace_tasks(checkpoint.tasks);
        self.stats = StatsEngine::from_stats(checkpoint.stats);
    }
}
