//! Points, completion counts and streak bookkeeping.
//!
//! The engine only ever moves forward on streaks. Removing a completed task
//! takes its points and counts back out (clamped at zero) but leaves the
//! streak history alone.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::task::Task;

/// Points per priority level.
pub const POINTS_PER_PRIORITY: u32 = 10;
/// Flat bonus for tasks that carry a description.
pub const DESCRIPTION_BONUS: u32 = 5;

/// Running aggregates for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub total_points: u32,
    pub daily_points: BTreeMap<NaiveDate, u32>,
    pub category_points: BTreeMap<String, u32>,
    pub tasks_by_category: BTreeMap<String, u32>,
    pub total_tasks_completed: u32,
    pub completed_by_date: BTreeMap<NaiveDate, u32>,
    pub current_streak: u32,
    pub best_streak: u32,
    /// Day of the most recent completion that advanced the streak.
    pub last_completion_date: Option<NaiveDate>,
}

impl Stats {
    pub fn category_count(&self, category: &str) -> u32 {
        self.tasks_by_category.get(category).copied().unwrap_or(0)
    }

    pub fn completed_on(&self, date: NaiveDate) -> u32 {
        self.completed_by_date.get(&date).copied().unwrap_or(0)
    }

    /// Highest number of completions booked on a single day.
    pub fn best_day(&self) -> u32 {
        self.completed_by_date.values().copied().max().unwrap_or(0)
    }

    /// Completions booked on days in `start..=end`.
    pub fn completed_between(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        if start > end {
            return 0;
        }
        self.completed_by_date
            .range(start..=end)
            .map(|(_, count)| *count)
            .sum()
    }
}

/// Points a completed task is worth.
pub fn points_for(task: &Task) -> u32 {
    let mut points = u32::from(task.priority) * POINTS_PER_PRIORITY;
    if task.has_description() {
        points += DESCRIPTION_BONUS;
    }
    points
}

#[derive(Debug, Clone, Default)]
pub struct StatsEngine {
    stats: Stats,
}

impl StatsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from saved stats.
    pub fn from_stats(mut stats: Stats) -> Self {
        stats.best_streak = stats.best_streak.max(stats.current_streak);
        Self { stats }
    }

    pub fn snapshot(&self) -> &Stats {
        &self.stats
    }

    /// Book a completion and return the points it earned.
    pub fn record_completion(&mut self, task: &Task, now: NaiveDateTime) -> u32 {
        let today = now.date();
        let day = task.completion_day().unwrap_or(today);
        let points = points_for(task);
        let stats = &mut self.stats;

        stats.total_points = stats.total_points.saturating_add(points);
        stats.total_tasks_completed = stats.total_tasks_completed.saturating_add(1);
        increment(&mut stats.daily_points, day, points);
        increment(&mut stats.completed_by_date, day, 1);
        increment(&mut stats.category_points, task.category.clone(), points);
        increment(&mut stats.tasks_by_category, task.category.clone(), 1);

        if stats.last_completion_date != Some(today) {
            self.advance_streak(today);
        }

        debug!(
            id = %task.id,
            points,
            streak = self.stats.current_streak,
            "completion recorded"
        );
        points
    }

    /// Take a completed task's points and counts back out. Returns the points
    /// removed; incomplete tasks are ignored.
    pub fn remove_completion_points(&mut self, task: &Task) -> u32 {
        if !task.completed {
            return 0;
        }

        let points = points_for(task);
        let stats = &mut self.stats;

        stats.total_points = stats.total_points.saturating_sub(points);
        stats.total_tasks_completed = stats.total_tasks_completed.saturating_sub(1);

        if let Some(day) = task.completion_day() {
            decrement(&mut stats.daily_points, &day, points);
            decrement(&mut stats.completed_by_date, &day, 1);
        }
        decrement(&mut stats.category_points, &task.category, points);
        decrement(&mut stats.tasks_by_category, &task.category, 1);

        debug!(id = %task.id, points, "completion points removed");
        points
    }

    fn advance_streak(&mut self, today: NaiveDate) {
        let stats = &mut self.stats;
        stats.current_streak = match stats.last_completion_date {
            None => 1,
            Some(last) => match (today - last).num_days() {
                1 => stats.current_streak.saturating_add(1),
                0 => stats.current_streak,
                _ => 1,
            },
        };
        stats.last_completion_date = Some(today);
        stats.best_streak = stats.best_streak.max(stats.current_streak);
    }
}

fn increment<K: Ord>(map: &mut BTreeMap<K, u32>, key: K, amount: u32) {
    let value = map.entry(key).or_insert(0);
    *value = value.saturating_add(amount);
}

fn decrement<K: Ord>(map: &mut BTreeMap<K, u32>, key: &K, amount: u32) {
    if let Some(value) = map.get_mut(key) {
        *value = value.saturating_sub(amount);
    }
}
