//! motiva backup commands.

use serde::Serialize;

use crate::cli::task::push_warnings;
use crate::cli::{Context, Global};
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};

pub struct RestoreOptions {
    pub name: String,
    pub global: Global,
}

#[derive(Serialize)]
struct BackupListOutput<'a> {
    backup_dir: String,
    backups: &'a [String],
}

#[derive(Serialize)]
struct RestoreOutput<'a> {
    restored: &'a str,
    tasks: usize,
    total_points: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    backup: Option<String>,
}

pub fn run_list(global: Global) -> Result<()> {
    let ctx = Context::load(&global)?;
    let backups = ctx.storage.list_backups()?;

    let mut human = HumanOutput::new("Backups");
    push_warnings(&mut human, &ctx.warnings);
    human.push_summary("Directory", ctx.storage.backup_dir().display().to_string());
    human.push_summary("Total", backups.len().to_string());
    for name in &backups {
        human.push_detail(name.as_str());
    }
    if let Some(latest) = backups.last() {
        human.push_next_step(format!("motiva backup restore {latest}"));
    }

    let output = BackupListOutput {
        backup_dir: ctx.storage.backup_dir().display().to_string(),
        backups: &backups,
    };
    emit_success(global.output(), "backup list", &output, Some(&human))
}

pub fn run_restore(options: RestoreOptions) -> Result<()> {
    let mut ctx = Context::load(&options.global)?;
    let state = ctx.storage.restore_backup(&options.name)?;
    ctx.replace_state(state);
    let backup = ctx.save()?;

    let name = options.name.trim();
    let mut human = HumanOutput::new("Backup restored");
    push_warnings(&mut human, &ctx.warnings);
    human.push_summary("Backup", name);
    human.push_summary("Tasks", ctx.session.store().len().to_string());
    human.push_summary("Total points", ctx.session.stats().total_points.to_string());

    let output = RestoreOutput {
        restored: name,
        tasks: ctx.session.store().len(),
        total_points: ctx.session.stats().total_points,
        backup: backup.map(|path| path.display().to_string()),
    };
    emit_success(options.global.output(), "backup restore", &output, Some(&human))
}
