//! motiva stats and achievements commands.

use chrono::NaiveDate;
use serde::Serialize;

use crate::achievements::{AchievementStatus, REGISTRY};
use crate::cli::task::{days, push_warnings};
use crate::cli::{Context, Global};
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::stats::Stats;

pub struct AchievementsOptions {
    pub all: bool,
    pub global: Global,
}

#[derive(Serialize)]
struct StatsOutput<'a> {
    #[serde(flatten)]
    stats: &'a Stats,
    today: NaiveDate,
    completed_today: u32,
    points_today: u32,
    best_day: u32,
    open_tasks: usize,
}

#[derive(Serialize)]
struct AchievementsOutput {
    unlocked: usize,
    total: usize,
    achievements: Vec<AchievementStatus>,
}

pub fn run_stats(global: Global) -> Result<()> {
    let ctx = Context::load(&global)?;
    let today = ctx.session.now().date();
    let stats = ctx.session.stats();

    let output = StatsOutput {
        stats,
        today,
        completed_today: stats.completed_on(today),
        points_today: stats.daily_points.get(&today).copied().unwrap_or(0),
        best_day: stats.best_day(),
        open_tasks: ctx
            .session
            .store()
            .tasks()
            .iter()
            .filter(|task| !task.completed)
            .count(),
    };

    let mut human = HumanOutput::new("Stats");
    push_warnings(&mut human, &ctx.warnings);
    human.push_summary("Total points", stats.total_points.to_string());
    human.push_summary("Tasks completed", stats.total_tasks_completed.to_string());
    human.push_summary("Completed today", output.completed_today.to_string());
    human.push_summary("Points today", output.points_today.to_string());
    human.push_summary("Current streak", days(stats.current_streak));
    human.push_summary("Best streak", days(stats.best_streak));
    human.push_summary("Open tasks", output.open_tasks.to_string());
    for (category, count) in &stats.tasks_by_category {
        let points = stats.category_points.get(category).copied().unwrap_or(0);
        human.push_detail(format!("{category}: {count} completed, {points} points"));
    }

    emit_success(global.output(), "stats", &output, Some(&human))
}

pub fn run_achievements(options: AchievementsOptions) -> Result<()> {
    let ctx = Context::load(&options.global)?;
    let tracker = ctx.session.achievements();
    let unlocked = tracker.unlocked().len();

    let achievements: Vec<AchievementStatus> = tracker
        .progress()
        .into_iter()
        .filter(|status| options.all || status.unlocked)
        .collect();

    let mut human = HumanOutput::new("Achievements");
    push_warnings(&mut human, &ctx.warnings);
    human.push_summary("Unlocked", format!("{unlocked}/{}", REGISTRY.len()));
    for status in &achievements {
        let mark = if status.unlocked { "x" } else { " " };
        human.push_detail(format!(
            "[{mark}] {} - {}",
            status.achievement.name, status.achievement.description
        ));
    }
    if !options.all && unlocked < REGISTRY.len() {
        human.push_next_step("motiva achievements --all");
    }

    let output = AchievementsOutput {
        unlocked,
        total: REGISTRY.len(),
        achievements,
    };
    emit_success(options.global.output(), "achievements", &output, Some(&human))
}
