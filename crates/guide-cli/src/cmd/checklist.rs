use super::{load_catalog, load_config, open_store, SourceOverrides};
use crate::cmd::show::render_steps;
use crate::output::print_json;
use anyhow::{bail, Context};
use clap::Subcommand;
use guide_core::checklist::{Checklist, ChecklistSession};
use std::path::Path;

#[derive(Subcommand)]
pub enum ChecklistSubcommand {
    /// Show step progress for an issue
    Status { id: String },
    /// Mark a step done (steps are numbered from 1)
    Check { id: String, step: usize },
    /// Mark a step not done; every later step is unchecked too
    Uncheck { id: String, step: usize },
    /// Forget all progress for an issue
    Clear { id: String },
}

enum Action {
    Status,
    Check(usize),
    Uncheck(usize),
    Clear,
}

pub fn run(
    root: &Path,
    overrides: &SourceOverrides,
    subcmd: ChecklistSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    let (id, action) = match subcmd {
        ChecklistSubcommand::Status { id } => (id, Action::Status),
        ChecklistSubcommand::Check { id, step } => (id, Action::Check(step_index(step)?)),
        ChecklistSubcommand::Uncheck { id, step } => (id, Action::Uncheck(step_index(step)?)),
        ChecklistSubcommand::Clear { id } => (id, Action::Clear),
    };

    let config = load_config(root)?;
    let catalog = load_catalog(&config, overrides)?;
    let issue = catalog
        .find(&id)
        .with_context(|| format!("issue '{id}' is not in the sheet"))?;
    let steps = issue.steps();
    if steps.is_empty() {
        bail!("issue '{id}' has no steps");
    }

    let mut store = open_store(root);
    let mut session =
        ChecklistSession::new(&mut *store, &config.checklist_namespace, &issue.id, steps.len());
    session.enable();

    let message = match action {
        Action::Status => None,
        Action::Check(i) => {
            session.check(i)?;
            Some(format!("Checked step {}", i + 1))
        }
        Action::Uncheck(i) => {
            session.uncheck(i)?;
            Some(format!("Unchecked step {} and everything after it", i + 1))
        }
        Action::Clear => {
            session.clear();
            Some(format!("Cleared progress for '{id}'"))
        }
    };

    let list = session.checklist();
    if json {
        print_json(&summary_json(&issue.id, &steps, list))?;
        return Ok(());
    }

    if let Some(message) = message {
        println!("{message}");
        println!();
    }
    println!("{}", issue.label());
    for line in render_steps(&steps, Some(list)) {
        println!("  {line}");
    }
    println!();
    println!("{}", list.progress_text());
    Ok(())
}

fn step_index(step: usize) -> anyhow::Result<usize> {
    if step == 0 {
        bail!("steps are numbered from 1");
    }
    Ok(step - 1)
}

fn summary_json(id: &str, steps: &[String], list: &Checklist) -> serde_json::Value {
    let states = list.states();
    let items: Vec<serde_json::Value> = steps
        .iter()
        .zip(states)
        .enumerate()
        .map(|(i, (text, state))| {
            serde_json::json!({ "number": i + 1, "text": text, "state": state })
        })
        .collect();
    serde_json::json!({
        "id": id,
        "steps": items,
        "completed": list.completed_count(),
        "total": list.len(),
        "progress": list.progress_text(),
    })
}
