//! Task entity for motiva.
//!
//! A task is a plain record: the store owns the list, the stats engine only
//! reads tasks it is handed.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 5;
pub const DEFAULT_PRIORITY: u8 = 3;
/// Priorities at or above this count as high priority.
pub const HIGH_PRIORITY: u8 = 4;

pub const DEFAULT_CATEGORY: &str = "Other";
pub const KNOWN_CATEGORIES: [&str; 8] = [
    "Study", "Health", "Work", "Home", "Exercise", "Projects", "Personal", "Other",
];

/// Opaque task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, enough to address a task on the command line.
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map(|(idx, _)| idx)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub priority: u8,
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
}

impl Task {
    /// Build a task from a validated draft.
    pub fn from_draft(draft: TaskDraft, now: NaiveDateTime) -> Result<Self> {
        draft.validate()?;
        Ok(Self {
            id: TaskId::new(),
            title: draft.title.trim().to_string(),
            description: draft.description,
            category: draft.category,
            priority: draft.priority,
            scheduled_date: draft.scheduled_date,
            created_at: now,
            completed: false,
            completed_at: None,
        })
    }

    /// Mark the task complete. Returns false if it already was.
    pub fn complete(&mut self, now: NaiveDateTime) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        self.completed_at = Some(now);
        true
    }

    pub fn apply_edit(&mut self, edit: TaskEdit) {
        self.title = edit.title.trim().to_string();
        self.description = edit.description;
        self.category = edit.category;
        self.priority = edit.priority;
    }

    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }

    pub fn is_high_priority(&self) -> bool {
        self.priority >= HIGH_PRIORITY
    }

    /// Calendar day a completion is booked under: the scheduled date if set,
    /// otherwise the day it was completed.
    pub fn completion_day(&self) -> Option<NaiveDate> {
        self.scheduled_date
            .or_else(|| self.completed_at.map(|at| at.date()))
    }
}

/// Input for creating a task.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: u8,
    pub scheduled_date: Option<NaiveDate>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            priority: DEFAULT_PRIORITY,
            scheduled_date: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn scheduled(mut self, date: NaiveDate) -> Self {
        self.scheduled_date = Some(date);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_category(&self.category)?;
        validate_priority(self.priority)
    }
}

/// Replacement values for the editable fields of a task.
#[derive(Debug, Clone)]
pub struct TaskEdit {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: u8,
}

impl TaskEdit {
    /// Start an edit from the task's current values.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            category: task.category.clone(),
            priority: task.priority,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_category(&self.category)?;
        validate_priority(self.priority)
    }
}

pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::Validation("title cannot be empty".to_string()));
    }
    Ok(())
}

pub fn validate_category(category: &str) -> Result<()> {
    if category.trim().is_empty() {
        return Err(Error::Validation("category cannot be empty".to_string()));
    }
    Ok(())
}

pub fn validate_priority(priority: u8) -> Result<()> {
    if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
        return Err(Error::Validation(format!(
            "priority must be between {MIN_PRIORITY} and {MAX_PRIORITY}, got {priority}"
        )));
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| Error::Validation(format!("invalid date '{raw}': {err}")))
}
