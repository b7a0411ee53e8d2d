//! Motivational messages.
//!
//! The bucket is chosen deterministically from context; the message within a
//! bucket is drawn uniformly at random.

use chrono::{NaiveDateTime, Timelike};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use serde::Serialize;

use crate::achievements::is_weekend;
use crate::stats::Stats;
use crate::task::{Task, HIGH_PRIORITY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Morning,
    Evening,
    Weekend,
    Streak,
    Achievement,
    Mastery,
    Intrinsic,
}

const MORNING: &[&str] = &[
    "Starting the day with energy! 🌅",
    "What a way to kick off the morning! ☀️",
    "Your morning productivity is inspiring! 🌄",
    "Making the most of the early hours! 🌞",
];

const EVENING: &[&str] = &[
    "A great way to close out the day! 🌙",
    "Finishing the day on a high note! ✨",
    "Your dedication keeps no schedule! 🌠",
    "Productive right to the end! 🌆",
];

const WEEKEND: &[&str] = &[
    "Making the most of the weekend! 🎯",
    "Your commitment never takes a day off! 💪",
    "Making every day count! 📅",
    "Success doesn't know about days off! 🌟",
];

const STREAK: &[&str] = &[
    "Your streak shows your commitment! 🔥",
    "Keep the momentum going! ⚡",
    "Consistency is your superpower! 💫",
    "Every day adds up on the road to success! 📅",
    "Your streak is unstoppable! 🚀",
    "Your daily dedication is paying off! 🌱",
    "Building success one day at a time! ⚡",
    "Keep that fire burning! 🔥",
];

const ACHIEVEMENT: &[&str] = &[
    "Another victory in the books! 🏆",
    "One more goal reached on your way to success! ⭐",
    "Celebrate this one, you earned it! 🎉",
    "Incredible work! Keep breaking your own records 🎯",
    "Another win for your collection! 🌟",
    "Victory after victory, you are building a legacy! 👑",
    "Brilliant execution! 💫",
    "Your determination takes you to new heights! 🦅",
];

const MASTERY: &[&str] = &[
    "Excellent work! You're mastering your responsibilities 💪",
    "Your consistency is producing extraordinary results 🚀",
    "Getting better every day! 📈",
    "Your progress is inspiring 🌈",
    "You're getting more efficient with every task! ⚡",
    "Your mastery grows with each completed task 📚",
    "Your skills keep improving! 🌟",
    "You're reaching new levels of excellence 🏆",
];

const INTRINSIC: &[&str] = &[
    "One more step toward your personal goals! 🎯",
    "Your dedication shows your commitment to growth 🌱",
    "Every completed task brings you closer to your best self 💫",
    "You're building positive habits! 🌟",
    "Today's effort builds tomorrow's success 🌅",
    "Every small step counts on your journey! 👣",
    "Your determination is inspiring 💪",
    "Keep moving forward, that's what matters! 🚀",
];

const ENCOURAGEMENTS: &[&str] = &[
    "today is a great day to reach your goals!",
    "get ready to conquer the day!",
    "your determination will take you far!",
    "every small step counts!",
    "your potential has no limits!",
    "today is the perfect day to shine!",
];

impl Bucket {
    pub fn messages(self) -> &'static [&'static str] {
        match self {
            Bucket::Morning => MORNING,
            Bucket::Evening => EVENING,
            Bucket::Weekend => WEEKEND,
            Bucket::Streak => STREAK,
            Bucket::Achievement => ACHIEVEMENT,
            Bucket::Mastery => MASTERY,
            Bucket::Intrinsic => INTRINSIC,
        }
    }
}

/// Pick the message bucket for a completion. First match wins.
pub fn bucket_for(task: Option<&Task>, stats: Option<&Stats>, now: NaiveDateTime) -> Bucket {
    let hour = now.hour();
    if hour < 8 {
        Bucket::Morning
    } else if hour >= 22 {
        Bucket::Evening
    } else if is_weekend(now) {
        Bucket::Weekend
    } else if stats.is_some_and(|stats| stats.current_streak > 3) {
        Bucket::Streak
    } else if task.is_some_and(|task| task.priority >= HIGH_PRIORITY) {
        Bucket::Achievement
    } else if stats.is_some_and(|stats| stats.total_points > 50) {
        Bucket::Mastery
    } else {
        Bucket::Intrinsic
    }
}

/// Time-of-day salutation used by the greeting.
pub fn salutation(now: NaiveDateTime) -> &'static str {
    match now.hour() {
        5..=11 => "Good morning",
        12..=19 => "Good afternoon",
        _ => "Good evening",
    }
}

pub struct MessageSelector {
    rng: Box<dyn RngCore>,
}

impl std::fmt::Debug for MessageSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageSelector").finish_non_exhaustive()
    }
}

impl Default for MessageSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageSelector {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Reproducible selection for tests.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: impl RngCore + 'static) -> Self {
        Self { rng: Box::new(rng) }
    }

    pub fn pick(
        &mut self,
        task: Option<&Task>,
        stats: Option<&Stats>,
        now: NaiveDateTime,
    ) -> &'static str {
        self.choose(bucket_for(task, stats, now).messages())
    }

    /// "Good morning, Ana - today is a great day to reach your goals!"
    pub fn greeting(&mut self, name: &str, now: NaiveDateTime) -> String {
        let phrase = self.choose(ENCOURAGEMENTS);
        let name = name.trim();
        if name.is_empty() {
            format!("{} - {phrase}", salutation(now))
        } else {
            format!("{}, {name} - {phrase}", salutation(now))
        }
    }

    fn choose(&mut self, pool: &'static [&'static str]) -> &'static str {
        pool.choose(&mut self.rng).copied().unwrap_or_default()
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
            .and_hms_opt(h, 30, 0)
            .unwrap()
    }

    fn task(priority: u8) -> Task {
        Task::from_draft(TaskDraft::new("t").priority(priority), at(3, 12)).unwrap()
    }

    #[test]
    fn time_of_day_wins_first() {
        let stats = Stats {
            current_streak: 10,
            ..Stats::default()
        };
        assert_eq!(bucket_for(None, Some(&stats), at(3, 7)), Bucket::Morning);
        assert_eq!(bucket_for(None, Some(&stats), at(3, 22)), Bucket::Evening);
        assert_eq!(bucket_for(None, Some(&stats), at(6, 12)), Bucket::Weekend);
    }

    #[test]
    fn weekday_priority_order() {
        let streaky = Stats {
            current_streak: 4,
            total_points: 100,
            ..Stats::default()
        };
        let rich = Stats {
            current_streak: 3,
            total_points: 51,
            ..Stats::default()
        };
        let noon = at(3, 12);
        assert_eq!(bucket_for(Some(&task(5)), Some(&streaky), noon), Bucket::Streak);
        assert_eq!(bucket_for(Some(&task(4)), Some(&rich), noon), Bucket::Achievement);
        assert_eq!(bucket_for(Some(&task(3)), Some(&rich), noon), Bucket::Mastery);
        assert_eq!(bucket_for(Some(&task(3)), None, noon), Bucket::Intrinsic);
        assert_eq!(bucket_for(None, None, noon), Bucket::Intrinsic);
    }

    #[test]
    fn every_bucket_has_messages() {
        for bucket in [
            Bucket::Morning,
            Bucket::Evening,
            Bucket::Weekend,
            Bucket::Streak,
            Bucket::Achievement,
            Bucket::Mastery,
            Bucket::Intrinsic,
        ] {
            assert!(!bucket.messages().is_empty());
        }
    }

    #[test]
    fn pick_draws_from_the_bucket() {
        let mut selector = MessageSelector::seeded(7);
        for _ in 0..20 {
            let message = selector.pick(None, None, at(3, 6));
            assert!(MORNING.contains(&message));
        }
    }

    #[test]
    fn greeting_uses_salutation_and_name() {
        let mut selector = MessageSelector::seeded(1);
        let greeting = selector.greeting("Ana", at(3, 13));
        assert!(greeting.starts_with("Good afternoon, Ana - "));
        assert!(selector.greeting("", at(3, 4)).starts_with("Good evening - "));
    }
}
