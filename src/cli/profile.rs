//! motiva name command.

use serde::Serialize;

use crate::cli::task::push_warnings;
use crate::cli::{Context, Global};
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};

pub struct NameOptions {
    pub name: Option<String>,
    pub global: Global,
}

#[derive(Serialize)]
struct NameOutput<'a> {
    name: Option<&'a str>,
    greeting: &'a str,
    changed: bool,
}

pub fn run_name(options: NameOptions) -> Result<()> {
    let mut ctx = Context::load(&options.global)?;
    let changed = match options.name.as_deref() {
        Some(name) => {
            ctx.session.set_username(name)?;
            ctx.save()?;
            true
        }
        None => false,
    };

    let greeting = ctx.session.greeting();
    let name = ctx.session.username();

    let mut human = HumanOutput::new(greeting.as_str());
    push_warnings(&mut human, &ctx.warnings);
    match name {
        Some(name) => human.push_summary("Name", name),
        None => human.push_next_step("motiva name \"<your name>\""),
    }

    let output = NameOutput {
        name,
        greeting: &greeting,
        changed,
    };
    emit_success(options.global.output(), "name", &output, Some(&human))
}
