//! Achievement registry and unlock tracking.
//!
//! The registry is a fixed table evaluated in order. An achievement unlocks
//! at most once; the tracker's unlocked set only grows.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;
use tracing::info;

use crate::stats::Stats;
use crate::task::{Task, KNOWN_CATEGORIES};

/// Condition under which an achievement unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    TotalCompleted(u32),
    TotalPoints(u32),
    CategoryCompleted(&'static str, u32),
    Streak(u32),
    /// At least one completion in every configured category.
    EveryCategory,
    /// This many completions booked on a single day.
    BestDay(u32),
    /// This many completions booked in the seven days ending today.
    LastSevenDays(u32),
    /// A completion at or after this local hour.
    CompletedAfterHour(u32),
    /// A completion before this local hour.
    CompletedBeforeHour(u32),
    CompletedOnWeekend,
}

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub stats: &'a Stats,
    pub task: Option<&'a Task>,
    pub now: NaiveDateTime,
    /// Categories the user works with.
    pub categories: &'a [String],
}

impl Rule {
    pub fn is_satisfied(&self, ctx: &RuleContext<'_>) -> bool {
        let stats = ctx.stats;
        match *self {
            Rule::TotalCompleted(n) => stats.total_tasks_completed >= n,
            Rule::TotalPoints(n) => stats.total_points >= n,
            Rule::CategoryCompleted(category, n) => stats.category_count(category) >= n,
            Rule::Streak(n) => stats.current_streak >= n,
            Rule::EveryCategory => {
                !ctx.categories.is_empty()
                    && ctx
                        .categories
                        .iter()
                        .all(|category| stats.category_count(category) > 0)
            }
            Rule::BestDay(n) => stats.best_day() >= n,
            Rule::LastSevenDays(n) => {
                let today = ctx.now.date();
                stats.completed_between(today - Duration::days(6), today) >= n
            }
            Rule::CompletedAfterHour(hour) => ctx.task.is_some() && ctx.now.hour() >= hour,
            Rule::CompletedBeforeHour(hour) => ctx.task.is_some() && ctx.now.hour() < hour,
            Rule::CompletedOnWeekend => ctx.task.is_some() && is_weekend(ctx.now),
        }
    }
}

pub fn is_weekend(now: NaiveDateTime) -> bool {
    matches!(now.weekday(), Weekday::Sat | Weekday::Sun)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip)]
    pub rule: Rule,
}

const fn achievement(
    key: &'static str,
    name: &'static str,
    description: &'static str,
    rule: Rule,
) -> Achievement {
    Achievement {
        key,
        name,
        description,
        rule,
    }
}

pub const REGISTRY: &[Achievement] = &[
    // Basics
    achievement("first_task", "First Step 🌱", "Complete your first task", Rule::TotalCompleted(1)),
    achievement("ten_tasks", "Getting Going 🚶", "Complete 10 tasks", Rule::TotalCompleted(10)),
    achievement("points_master", "Points Master 🏆", "Reach 100 total points", Rule::TotalPoints(100)),
    // Categories
    achievement("study_expert", "Study Expert 📚", "Complete 10 study tasks", Rule::CategoryCompleted("Study", 10)),
    achievement("health_guru", "Health Guru ❤️", "Complete 20 health tasks", Rule::CategoryCompleted("Health", 20)),
    achievement("exercise_champion", "Exercise Champion 🏃", "Complete 15 exercise tasks", Rule::CategoryCompleted("Exercise", 15)),
    achievement("work_master", "Work Master 💼", "Complete 25 work tasks", Rule::CategoryCompleted("Work", 25)),
    achievement("home_expert", "Home Expert 🏠", "Complete 30 home tasks", Rule::CategoryCompleted("Home", 30)),
    achievement("project_wizard", "Project Wizard 🎯", "Complete 20 project tasks", Rule::CategoryCompleted("Projects", 20)),
    // Streaks
    achievement("streak_master", "Streak Master 🔥", "Keep a 7 day streak", Rule::Streak(7)),
    achievement("streak_warrior", "Streak Warrior ⚔️", "Keep a 14 day streak", Rule::Streak(14)),
    achievement("streak_legend", "Streak Legend 👑", "Keep a 30 day streak", Rule::Streak(30)),
    // Volume
    achievement("task_centurion", "Task Centurion 🛡️", "Complete 100 tasks", Rule::TotalCompleted(100)),
    achievement("task_master", "Task Master 🎓", "Complete 500 tasks", Rule::TotalCompleted(500)),
    achievement("task_legend", "Task Legend 🏅", "Complete 1000 tasks", Rule::TotalCompleted(1000)),
    // Versatility
    achievement("category_master", "All-Rounder 🌟", "Complete a task in every category", Rule::EveryCategory),
    achievement("daily_champion", "Daily Champion 🌞", "Complete 5 tasks on a single day", Rule::BestDay(5)),
    achievement("weekly_legend", "Weekly Legend 📅", "Complete 25 tasks within a week", Rule::LastSevenDays(25)),
    // Time of day
    achievement("night_owl", "Night Owl 🦉", "Complete a task after 22:00", Rule::CompletedAfterHour(22)),
    achievement("early_bird", "Early Bird 🌅", "Complete a task before 8:00", Rule::CompletedBeforeHour(8)),
    achievement("weekend_warrior", "Weekend Warrior 🎮", "Complete a task on the weekend", Rule::CompletedOnWeekend),
];

pub fn find(key: &str) -> Option<&'static Achievement> {
    REGISTRY.iter().find(|achievement| achievement.key == key)
}

/// Category names that per-category achievements count, in registry order.
pub fn counted_categories() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().filter_map(|achievement| match achievement.rule {
        Rule::CategoryCompleted(category, _) => Some(category),
        _ => None,
    })
}

/// An achievement together with whether it is unlocked.
#[derive(Debug, Clone, Serialize)]
pub struct AchievementStatus {
    #[serde(flatten)]
    pub achievement: &'static Achievement,
    pub unlocked: bool,
}

/// Tracks which achievements have been unlocked.
#[derive(Debug, Clone)]
pub struct AchievementTracker {
    unlocked: BTreeSet<String>,
    categories: Vec<String>,
}

impl Default for AchievementTracker {
    fn default() -> Self {
        Self {
            unlocked: BTreeSet::new(),
            categories: KNOWN_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl AchievementTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume with previously unlocked keys. Unknown keys are kept so they
    /// are written back unchanged.
    pub fn with_unlocked<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            unlocked: keys.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Use the configured category list for the every-category rule.
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    /// Unlock every locked achievement whose rule now holds, in registry
    /// order.
    pub fn check_newly_unlocked(
        &mut self,
        stats: &Stats,
        task: Option<&Task>,
        now: NaiveDateTime,
    ) -> Vec<&'static Achievement> {
        let ctx = RuleContext {
            stats,
            task,
            now,
            categories: &self.categories,
        };
        let mut newly = Vec::new();
        for achievement in REGISTRY {
            if self.unlocked.contains(achievement.key) {
                continue;
            }
            if achievement.rule.is_satisfied(&ctx) {
                self.unlocked.insert(achievement.key.to_string());
                info!(key = achievement.key, "achievement unlocked");
                newly.push(achievement);
            }
        }
        newly
    }

    pub fn is_unlocked(&self, key: &str) -> bool {
        self.unlocked.contains(key)
    }

    /// Unlocked keys, including ones not in the current registry.
    pub fn unlocked_keys(&self) -> impl Iterator<Item = &str> {
        self.unlocked.iter().map(String::as_str)
    }

    /// Unlocked registry entries in registry order.
    pub fn unlocked(&self) -> Vec<&'static Achievement> {
        REGISTRY
            .iter()
            .filter(|achievement| self.is_unlocked(achievement.key))
            .collect()
    }

    pub fn progress(&self) -> Vec<AchievementStatus> {
        REGISTRY
            .iter()
            .map(|achievement| AchievementStatus {
                achievement,
                unlocked: self.is_unlocked(achievement.key),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::task::TaskDraft;

    // 2024-01-03 is a Wednesday, 2024-01-06 a Saturday.
    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn task() -> Task {
        Task::from_draft(TaskDraft::new("t"), at(3, 12)).unwrap()
    }

    fn keys(list: &[&Achievement]) -> Vec<&'static str> {
        list.iter().map(|achievement| achievement.key).collect()
    }

    #[test]
    fn registry_keys_are_unique() {
        let keys: BTreeSet<_> = REGISTRY.iter().map(|a| a.key).collect();
        assert_eq!(keys.len(), REGISTRY.len());
    }

    #[test]
    fn first_task_unlocks_once() {
        let mut tracker = AchievementTracker::new();
        let stats = Stats {
            total_tasks_completed: 1,
            ..Stats::default()
        };
        let first = tracker.check_newly_unlocked(&stats, Some(&task()), at(3, 12));
        assert_eq!(keys(&first), vec!["first_task"]);

        let again = tracker.check_newly_unlocked(&stats, Some(&task()), at(3, 12));
        assert!(again.is_empty());
        assert!(tracker.is_unlocked("first_task"));
    }

    #[test]
    fn results_follow_registry_order() {
        let mut tracker = AchievementTracker::new();
        let mut stats = Stats {
            total_tasks_completed: 12,
            total_points: 150,
            current_streak: 7,
            best_streak: 7,
            ..Stats::default()
        };
        stats.tasks_by_category.insert("Study".to_string(), 10);
        let unlocked = tracker.check_newly_unlocked(&stats, None, at(3, 12));
        assert_eq!(
            keys(&unlocked),
            vec!["first_task", "ten_tasks", "points_master", "study_expert", "streak_master"]
        );
    }

    #[test]
    fn time_rules_need_a_task() {
        let mut tracker = AchievementTracker::new();
        let stats = Stats::default();
        assert!(tracker.check_newly_unlocked(&stats, None, at(6, 23)).is_empty());

        let unlocked = tracker.check_newly_unlocked(&stats, Some(&task()), at(6, 23));
        assert_eq!(keys(&unlocked), vec!["night_owl", "weekend_warrior"]);

        let morning = tracker.check_newly_unlocked(&stats, Some(&task()), at(3, 7));
        assert_eq!(keys(&morning), vec!["early_bird"]);
    }

    #[test]
    fn weekly_window_counts_last_seven_days() {
        let mut stats = Stats::default();
        stats
            .completed_by_date
            .insert(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 20);
        stats
            .completed_by_date
            .insert(NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(), 5);
        let ctx = RuleContext {
            stats: &stats,
            task: None,
            now: at(7, 12),
            categories: &[],
        };
        assert!(Rule::LastSevenDays(25).is_satisfied(&ctx));

        let later = RuleContext {
            now: at(8, 12),
            ..ctx
        };
        assert!(!Rule::LastSevenDays(25).is_satisfied(&later));
    }

    #[test]
    fn every_category_rule() {
        let categories: Vec<String> = KNOWN_CATEGORIES.iter().map(|c| c.to_string()).collect();
        let mut stats = Stats::default();
        for category in KNOWN_CATEGORIES {
            stats.tasks_by_category.insert(category.to_string(), 1);
        }
        let ctx = RuleContext {
            stats: &stats,
            task: None,
            now: at(3, 12),
            categories: &categories,
        };
        assert!(Rule::EveryCategory.is_satisfied(&ctx));

        stats.tasks_by_category.insert("Home".to_string(), 0);
        let ctx = RuleContext {
            stats: &stats,
            task: None,
            now: at(3, 12),
            categories: &categories,
        };
        assert!(!Rule::EveryCategory.is_satisfied(&ctx));
    }

    #[test]
    fn every_category_follows_configured_list() {
        let categories = vec!["Garden".to_string(), "Music".to_string()];
        let mut stats = Stats::default();
        stats.tasks_by_category.insert("Garden".to_string(), 2);

        let mut tracker = AchievementTracker::new().with_categories(categories);
        let unlocked = tracker.check_newly_unlocked(&stats, None, at(3, 12));
        assert!(!keys(&unlocked).contains(&"category_master"));

        stats.tasks_by_category.insert("Music".to_string(), 1);
        let unlocked = tracker.check_newly_unlocked(&stats, None, at(3, 12));
        assert_eq!(keys(&unlocked), vec!["category_master"]);
    }

    #[test]
    fn counted_categories_are_built_in() {
        let counted: Vec<_> = counted_categories().collect();
        assert_eq!(
            counted,
            vec!["Study", "Health", "Exercise", "Work", "Home", "Projects"]
        );
        assert!(counted.iter().all(|c| KNOWN_CATEGORIES.contains(c)));
    }

    #[test]
    fn restored_keys_stay_unlocked() {
        let mut tracker = AchievementTracker::with_unlocked(["first_task", "legacy_key"]);
        let stats = Stats {
            total_tasks_completed: 1,
            ..Stats::default()
        };
        assert!(tracker
            .check_newly_unlocked(&stats, None, at(3, 12))
            .is_empty());
        assert_eq!(keys(&tracker.unlocked()), vec!["first_task"]);
        assert_eq!(tracker.unlocked_keys().count(), 2);
        assert_eq!(
            tracker.progress().iter().filter(|status| status.unlocked).count(),
            1
        );
        assert!(find("night_owl").is_some());
    }
}
