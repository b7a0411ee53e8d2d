//! motiva task command implementations.

use serde::Serialize;

use crate::achievements::Achievement;
use crate::cli::{Context, Global};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::session::TaskCompletion;
use crate::store::{DayStatus, DaySummary};
use crate::task::{parse_date, Task, TaskDraft, TaskEdit};

pub struct AddOptions {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<u8>,
    pub date: Option<String>,
    pub unscheduled: bool,
    pub global: Global,
}

pub struct ListOptions {
    pub date: Option<String>,
    pub all: bool,
    pub category: Option<String>,
    pub global: Global,
}

pub struct DoneOptions {
    pub id: String,
    pub global: Global,
}

pub struct EditOptions {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<u8>,
    pub global: Global,
}

pub struct RmOptions {
    pub id: String,
    pub global: Global,
}

#[derive(Serialize)]
struct TaskOutput<'a> {
    task: &'a Task,
}

#[derive(Serialize)]
struct TaskListOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<chrono::NaiveDate>,
    total: usize,
    tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
struct AlreadyCompletedOutput<'a> {
    task: &'a Task,
    already_completed: bool,
}

#[derive(Serialize)]
struct RemovedOutput<'a> {
    task: &'a Task,
    points_removed: u32,
}

#[derive(Serialize)]
struct HistoryOutput {
    changed: bool,
    tasks: usize,
    total_points: u32,
    can_undo: bool,
    can_redo: bool,
}

#[derive(Serialize)]
struct CalendarOutput<'a> {
    days: &'a [DaySummary],
}

#[derive(Serialize)]
struct TodayOutput<'a> {
    greeting: &'a str,
    date: chrono::NaiveDate,
    completed_today: u32,
    current_streak: u32,
    tasks: Vec<&'a Task>,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let mut ctx = Context::load(&options.global)?;
    let today = ctx.session.now().date();
    let category = ctx.category(options.category.as_deref());

    let mut draft = TaskDraft::new(options.title).category(category);
    if let Some(description) = options.description {
        draft = draft.description(description);
    }
    if let Some(priority) = options.priority {
        draft = draft.priority(priority);
    }
    match options.date.as_deref() {
        Some(raw) => draft = draft.scheduled(parse_date(raw)?),
        None if !options.unscheduled => draft = draft.scheduled(today),
        None => {}
    }

    let task = ctx.session.add_task(draft)?;
    ctx.save()?;

    let mut human = HumanOutput::new("Task added");
    push_warnings(&mut human, &ctx.warnings);
    push_task_summary(&mut human, &task);
    human.push_next_step(format!("motiva done {}", task.id.short()));

    emit_success(
        options.global.output(),
        "add",
        &TaskOutput { task: &task },
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let mut ctx = Context::load(&options.global)?;
    let date = if options.all {
        None
    } else {
        match options.date.as_deref() {
            Some(raw) => Some(parse_date(raw)?),
            None => Some(ctx.session.now().date()),
        }
    };
    let category = options
        .category
        .as_deref()
        .map(|raw| ctx.category(Some(raw)));

    let store = ctx.session.store();
    let tasks: Vec<&Task> = match (date, category.as_deref()) {
        (Some(date), Some(category)) => store
            .agenda(date)
            .into_iter()
            .filter(|task| task.category == category)
            .collect(),
        (Some(date), None) => store.agenda(date),
        (None, Some(category)) => store.tasks_by_category(category),
        (None, None) => store.tasks().iter().collect(),
    };

    let header = match date {
        Some(date) => format!("Tasks for {date}"),
        None => "All tasks".to_string(),
    };
    let mut human = HumanOutput::new(header);
    push_warnings(&mut human, &ctx.warnings);
    human.push_summary("Total", tasks.len().to_string());
    human.push_summary(
        "Open",
        tasks.iter().filter(|task| !task.completed).count().to_string(),
    );
    if let Some(category) = category.as_deref() {
        human.push_summary("Category", category);
    }
    for task in &tasks {
        human.push_detail(task_line(task));
    }
    if tasks.is_empty() {
        human.push_next_step("motiva add \"<title>\"");
    }

    let output = TaskListOutput {
        date,
        total: tasks.len(),
        tasks,
    };
    emit_success(options.global.output(), "list", &output, Some(&human))
}

pub fn run_done(options: DoneOptions) -> Result<()> {
    let mut ctx = Context::load(&options.global)?;
    let id = ctx.session.store().resolve(&options.id)?.id.clone();

    match ctx.session.complete_task(&id) {
        TaskCompletion::Completed(completion) => {
            ctx.save()?;

            let mut human = HumanOutput::new(completion.message);
            push_warnings(&mut human, &ctx.warnings);
            human.push_summary("Task", completion.task.title.as_str());
            human.push_summary("Points", format!("+{}", completion.points));
            human.push_summary("Total points", completion.total_points.to_string());
            human.push_summary("Streak", days(completion.current_streak));
            for achievement in &completion.unlocked {
                human.push_detail(achievement_line(achievement));
            }

            emit_success(options.global.output(), "done", &completion, Some(&human))
        }
        TaskCompletion::AlreadyCompleted(task) => {
            let mut human = HumanOutput::new("Task already completed");
            push_warnings(&mut human, &ctx.warnings);
            push_task_summary(&mut human, &task);
            human.push_warning("no points were awarded");

            emit_success(
                options.global.output(),
                "done",
                &AlreadyCompletedOutput {
                    task: &task,
                    already_completed: true,
                },
                Some(&human),
            )
        }
        TaskCompletion::NotFound => Err(Error::TaskNotFound(options.id)),
    }
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    if options.title.is_none()
        && options.description.is_none()
        && options.category.is_none()
        && options.priority.is_none()
    {
        return Err(Error::InvalidArgument(
            "nothing to edit; pass --title, --description, --category or --priority".to_string(),
        ));
    }

    let mut ctx = Context::load(&options.global)?;
    let current = ctx.session.store().resolve(&options.id)?.clone();

    let mut edit = TaskEdit::from_task(&current);
    if let Some(title) = options.title {
        edit.title = title;
    }
    if let Some(description) = options.description {
        edit.description = description;
    }
    if options.category.is_some() {
        edit.category = ctx.category(options.category.as_deref());
    }
    if let Some(priority) = options.priority {
        edit.priority = priority;
    }

    let task = ctx
        .session
        .edit_task(&current.id, edit)?
        .ok_or_else(|| Error::TaskNotFound(options.id.clone()))?;
    ctx.save()?;

    let mut human = HumanOutput::new("Task updated");
    push_warnings(&mut human, &ctx.warnings);
    push_task_summary(&mut human, &task);

    emit_success(
        options.global.output(),
        "edit",
        &TaskOutput { task: &task },
        Some(&human),
    )
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let mut ctx = Context::load(&options.global)?;
    let id = ctx.session.store().resolve(&options.id)?.id.clone();
    let points_before = ctx.session.stats().total_points;

    let task = ctx
        .session
        .delete_task(&id)
        .ok_or_else(|| Error::TaskNotFound(options.id.clone()))?;
    ctx.save()?;

    let points_removed = points_before.saturating_sub(ctx.session.stats().total_points);
    let mut human = HumanOutput::new("Task deleted");
    push_warnings(&mut human, &ctx.warnings);
    human.push_summary("Task", task.title.as_str());
    if points_removed > 0 {
        human.push_summary("Points removed", points_removed.to_string());
    }
    human.push_next_step("motiva undo");

    emit_success(
        options.global.output(),
        "rm",
        &RemovedOutput {
            task: &task,
            points_removed,
        },
        Some(&human),
    )
}

pub fn run_undo(global: Global) -> Result<()> {
    run_history(global, "undo")
}

pub fn run_redo(global: Global) -> Result<()> {
    run_history(global, "redo")
}

fn run_history(global: Global, command: &str) -> Result<()> {
    let mut ctx = Context::load(&global)?;
    let changed = if command == "undo" {
        ctx.session.undo()
    } else {
        ctx.session.redo()
    };
    if changed {
        ctx.save()?;
    }

    let output = HistoryOutput {
        changed,
        tasks: ctx.session.store().len(),
        total_points: ctx.session.stats().total_points,
        can_undo: ctx.session.can_undo(),
        can_redo: ctx.session.can_redo(),
    };

    let header = match (command, changed) {
        ("undo", true) => "Undid last change",
        ("undo", false) => "Nothing to undo",
        (_, true) => "Redid last change",
        (_, false) => "Nothing to redo",
    };
    let mut human = HumanOutput::new(header);
    push_warnings(&mut human, &ctx.warnings);
    human.push_summary("Tasks", output.tasks.to_string());
    human.push_summary("Total points", output.total_points.to_string());
    if changed && command == "undo" {
        human.push_next_step("motiva redo");
    }

    emit_success(global.output(), command, &output, Some(&human))
}

pub fn run_calendar(global: Global) -> Result<()> {
    let ctx = Context::load(&global)?;
    let days = ctx.session.store().day_summaries();

    let mut human = HumanOutput::new("Calendar");
    push_warnings(&mut human, &ctx.warnings);
    human.push_summary("Days with tasks", days.len().to_string());
    for day in &days {
        let status = match day.status {
            DayStatus::Done => "done",
            DayStatus::Partial => "partial",
            DayStatus::Pending => "pending",
        };
        let mut line = format!("{}  {}/{} {status}", day.date, day.completed, day.total);
        if day.is_urgent() {
            line.push_str(&format!(" ({} high priority)", day.high_priority));
        }
        human.push_detail(line);
    }

    emit_success(
        global.output(),
        "calendar",
        &CalendarOutput { days: &days },
        Some(&human),
    )
}

pub fn run_today(global: Global) -> Result<()> {
    let mut ctx = Context::load(&global)?;
    let greeting = ctx.session.greeting();
    let today = ctx.session.now().date();

    let stats = ctx.session.stats();
    let tasks = ctx.session.store().agenda(today);
    let output = TodayOutput {
        greeting: &greeting,
        date: today,
        completed_today: stats.completed_on(today),
        current_streak: stats.current_streak,
        tasks,
    };

    let mut human = HumanOutput::new(greeting.as_str());
    push_warnings(&mut human, &ctx.warnings);
    human.push_summary("Date", today.to_string());
    human.push_summary("Completed today", output.completed_today.to_string());
    human.push_summary("Streak", days(output.current_streak));
    for task in &output.tasks {
        human.push_detail(task_line(task));
    }
    if let Some(next) = output.tasks.iter().find(|task| !task.completed) {
        human.push_next_step(format!("motiva done {}", next.id.short()));
    }

    emit_success(global.output(), "today", &output, Some(&human))
}

// =============================================================================
// Formatting helpers
// =============================================================================

pub(crate) fn push_warnings(human: &mut HumanOutput, warnings: &[String]) {
    for warning in warnings {
        human.push_warning(warning.as_str());
    }
}

fn push_task_summary(human: &mut HumanOutput, task: &Task) {
    human.push_summary("ID", task.id.as_str());
    human.push_summary("Title", task.title.as_str());
    if task.has_description() {
        human.push_summary("Description", task.description.as_str());
    }
    human.push_summary("Category", task.category.as_str());
    human.push_summary("Priority", task.priority.to_string());
    human.push_summary(
        "Date",
        task.scheduled_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "unscheduled".to_string()),
    );
}

fn task_line(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    let mut line = format!(
        "[{mark}] {} P{} {} ({})",
        task.id.short(),
        task.priority,
        task.title,
        task.category
    );
    if let Some(date) = task.scheduled_date {
        line.push_str(&format!(" on {date}"));
    }
    line
}

fn achievement_line(achievement: &Achievement) -> String {
    format!("Unlocked {}: {}", achievement.name, achievement.description)
}

pub(crate) fn days(count: u32) -> String {
    if count == 1 {
        "1 day".to_string()
    } else {
        format!("{count} days")
    }
}
