//! In-memory task store.
//!
//! The store owns the ordered task list. Lookups by an unknown id return
//! `None` instead of failing. Undo history lives one level up in the
//! session, which snapshots the list together with the stats.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::task::{Task, TaskDraft, TaskEdit, TaskId};

/// Result of asking the store to complete a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompleteOutcome {
    NotFound,
    /// The task was already complete; nothing changed.
    AlreadyCompleted(Task),
    Completed(Task),
}

/// Completion state of all tasks scheduled on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Done,
    Partial,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub total: usize,
    pub completed: usize,
    pub high_priority: usize,
    pub status: DayStatus,
}

impl DaySummary {
    /// Unfinished work on this day includes a high priority task.
    pub fn is_urgent(&self) -> bool {
        self.status != DayStatus::Done && self.high_priority > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Swap in a whole task list, as undo and redo do.
    pub fn replace_tasks(&mut self, tasks: Vec<Task>) -> Vec<Task> {
        std::mem::replace(&mut self.tasks, tasks)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create and append a task. A rejected draft leaves the store untouched.
    pub fn add(&mut self, draft: TaskDraft, now: NaiveDateTime) -> Result<Task> {
        let task = Task::from_draft(draft, now)?;
        self.tasks.push(task.clone());
        debug!(id = %task.id, title = %task.title, "task added");
        Ok(task)
    }

    pub fn complete(&mut self, id: &TaskId, now: NaiveDateTime) -> CompleteOutcome {
        let Some(index) = self.position(id) else {
            return CompleteOutcome::NotFound;
        };
        if self.tasks[index].completed {
            return CompleteOutcome::AlreadyCompleted(self.tasks[index].clone());
        }

        let task = &mut self.tasks[index];
        task.complete(now);
        debug!(id = %task.id, "task completed");
        CompleteOutcome::Completed(task.clone())
    }

    /// Overwrite the editable fields. Scheduled date and completion state
    /// are kept.
    pub fn edit(&mut self, id: &TaskId, edit: TaskEdit) -> Result<Option<Task>> {
        edit.validate()?;
        let Some(index) = self.position(id) else {
            return Ok(None);
        };

        let task = &mut self.tasks[index];
        task.apply_edit(edit);
        debug!(id = %task.id, "task edited");
        Ok(Some(task.clone()))
    }

    /// Remove a task, handing it back so the caller can reverse its points.
    pub fn delete(&mut self, id: &TaskId) -> Option<Task> {
        let index = self.position(id)?;
        let task = self.tasks.remove(index);
        debug!(id = %task.id, "task deleted");
        Some(task)
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| &task.id == id)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    /// Resolve a full id or a unique id prefix.
    pub fn resolve(&self, id_or_prefix: &str) -> Result<&Task> {
        let needle = id_or_prefix.trim();
        if needle.is_empty() {
            return Err(Error::InvalidArgument("task id cannot be empty".to_string()));
        }
        if let Some(task) = self.tasks.iter().find(|task| task.id.as_str() == needle) {
            return Ok(task);
        }

        let mut matches = self
            .tasks
            .iter()
            .filter(|task| task.id.as_str().starts_with(needle));
        match (matches.next(), matches.count()) {
            (Some(task), 0) => Ok(task),
            (Some(_), rest) => Err(Error::AmbiguousId {
                prefix: needle.to_string(),
                matches: rest + 1,
            }),
            (None, _) => Err(Error::TaskNotFound(needle.to_string())),
        }
    }

    pub fn tasks_by_category(&self, category: &str) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.category == category)
            .collect()
    }

    /// Tasks scheduled on `date`, in list order.
    pub fn tasks_for_date(&self, date: NaiveDate) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.scheduled_date == Some(date))
            .collect()
    }

    /// Scheduled tasks grouped by day. Unscheduled tasks are left out.
    pub fn tasks_grouped_by_date(&self) -> BTreeMap<NaiveDate, Vec<&Task>> {
        let mut grouped: BTreeMap<NaiveDate, Vec<&Task>> = BTreeMap::new();
        for task in &self.tasks {
            if let Some(date) = task.scheduled_date {
                grouped.entry(date).or_default().push(task);
            }
        }
        grouped
    }

    /// Tasks for a day, open ones first, then by descending priority.
    pub fn agenda(&self, date: NaiveDate) -> Vec<&Task> {
        let mut tasks = self.tasks_for_date(date);
        tasks.sort_by(|left, right| {
            left.completed
                .cmp(&right.completed)
                .then_with(|| right.priority.cmp(&left.priority))
        });
        tasks
    }

    pub fn day_summaries(&self) -> Vec<DaySummary> {
        self.tasks_grouped_by_date()
            .into_iter()
            .map(|(date, tasks)| {
                let total = tasks.len();
                let completed = tasks.iter().filter(|task| task.completed).count();
                let high_priority = tasks.iter().filter(|task| task.is_high_priority()).count();
                let status = if completed == total {
                    DayStatus::Done
                } else if completed > 0 {
                    DayStatus::Partial
                } else {
                    DayStatus::Pending
                };
                DaySummary {
                    date,
                    total,
                    completed,
                    high_priority,
                    status,
                }
            })
            .collect()
    }
}
