//! Task management commands
//!
//! Implements `tl task add`, `tl task edit`, `tl task rm`, `tl task move`,
//! `tl task show`. All task commands operate on the active board.

use serde::Serialize;

use crate::cli::{resolve_task, CommandContext};
use crate::error::{Error, Result};
use crate::model::{ColumnId, Priority, Task};
use crate::output::{emit_success, HumanOutput};
use crate::store::TaskPatch;

/// Options for `tl task add`
pub struct AddOptions {
    pub title: String,
    pub column: String,
    pub priority: Option<String>,
    pub description: Option<String>,
}

/// Options for `tl task edit`
pub struct EditOptions {
    pub task: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
}

/// Output for task mutations
#[derive(Debug, Serialize)]
pub struct TaskOutput {
    #[serde(flatten)]
    pub task: Task,
    pub column: Option<ColumnId>,
}

fn parse_column(raw: &str) -> Result<ColumnId> {
    raw.parse().map_err(Error::InvalidArgument)
}

fn parse_priority(raw: &str) -> Result<Priority> {
    raw.parse().map_err(Error::InvalidArgument)
}

/// Column currently holding the task on the active board.
fn column_of(store: &crate::store::BoardStore, id: &str) -> Option<ColumnId> {
    let board = store.active_board()?;
    let orders = store.state().tasks_by_board.get(&board.id)?;
    orders
        .iter()
        .find(|(_, list)| list.iter().any(|tid| tid == id))
        .map(|(column, _)| *column)
}

fn task_output(store: &crate::store::BoardStore, id: &str) -> Result<TaskOutput> {
    let task = store
        .task_by_id(id)
        .cloned()
        .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
    Ok(TaskOutput {
        column: column_of(store, id),
        task,
    })
}

/// Run `tl task add <title>`
pub async fn run_add(ctx: CommandContext, opts: AddOptions) -> Result<()> {
    let title = opts.title.trim().to_string();
    if title.is_empty() {
        return Err(Error::InvalidArgument("task title must not be empty".into()));
    }
    let column = parse_column(&opts.column)?;
    let priority = opts.priority.as_deref().map(parse_priority).transpose()?;

    let mut session = ctx.open_session().await?;
    if session.store().active_board().is_none() {
        return Err(Error::NoActiveBoard);
    }

    let id = session
        .mutate(|store| store.create_task(column, &title, priority))
        .ok_or(Error::NoActiveBoard)?;
    if let Some(description) = opts.description {
        session.mutate(|store| {
            store.update_task(
                &id,
                TaskPatch {
                    description: Some(description),
                    ..TaskPatch::default()
                },
            )
        });
    }
    session.checkpoint().await?;

    let data = task_output(session.store(), &id)?;
    let mut human = HumanOutput::new(format!("Added '{title}' to {column}"));
    human.push_summary("id", id);
    if let Some(priority) = priority {
        human.push_summary("priority", priority.to_string());
    }
    emit_success(ctx.out(), "task add", &data, Some(&human))
}

/// Run `tl task edit <task>`
pub async fn run_edit(ctx: CommandContext, opts: EditOptions) -> Result<()> {
    let patch = TaskPatch {
        title: opts
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()),
        description: opts.description,
        priority: opts.priority.as_deref().map(parse_priority).transpose()?,
    };
    if patch.is_empty() {
        return Err(Error::InvalidArgument(
            "nothing to edit: pass --title, --description, or --priority".into(),
        ));
    }

    let mut session = ctx.open_session().await?;
    let id = resolve_task(session.store(), &opts.task)?;
    session.mutate(|store| store.update_task(&id, patch));
    session.checkpoint().await?;

    let data = task_output(session.store(), &id)?;
    let human = HumanOutput::new(format!("Updated '{}'", data.task.title));
    emit_success(ctx.out(), "task edit", &data, Some(&human))
}

/// Run `tl task rm <task>`
pub async fn run_rm(ctx: CommandContext, reference: String) -> Result<()> {
    let mut session = ctx.open_session().await?;
    let id = resolve_task(session.store(), &reference)?;
    let data = task_output(session.store(), &id)?;

    session.mutate(|store| store.delete_task(&id));
    session.checkpoint().await?;

    let human = HumanOutput::new(format!("Deleted '{}'", data.task.title));
    emit_success(ctx.out(), "task rm", &data, Some(&human))
}

/// Run `tl task move <task> --to <column> [--index <n>]`
pub async fn run_move(
    ctx: CommandContext,
    reference: String,
    to: String,
    index: Option<usize>,
) -> Result<()> {
    let column = parse_column(&to)?;
    // Without an explicit position, land at the end (the store clamps).
    let to_index = index.unwrap_or(usize::MAX);

    let mut session = ctx.open_session().await?;
    let id = resolve_task(session.store(), &reference)?;
    session.mutate(|store| store.move_task(&id, column, to_index));
    session.checkpoint().await?;

    let data = task_output(session.store(), &id)?;
    let mut human = HumanOutput::new(format!("Moved '{}' to {column}", data.task.title));
    if let Some(index) = index {
        human.push_summary("position", index.to_string());
    }
    emit_success(ctx.out(), "task move", &data, Some(&human))
}

/// Run `tl task show <task>`
pub async fn run_show(ctx: CommandContext, reference: String) -> Result<()> {
    let session = ctx.open_session().await?;
    let id = resolve_task(session.store(), &reference)?;
    let data = task_output(session.store(), &id)?;

    let mut human = HumanOutput::new(data.task.title.clone());
    human.push_summary("id", data.task.id.clone());
    if let Some(column) = data.column {
        human.push_summary("column", column.to_string());
    }
    if let Some(priority) = data.task.priority {
        human.push_summary("priority", priority.to_string());
    }
    if let Some(description) = &data.task.description {
        human.push_detail(description.clone());
    }
    human.push_summary("created", data.task.created_at.to_rfc3339());
    if let Some(updated) = data.task.updated_at {
        human.push_summary("updated", updated.to_rfc3339());
    }
    emit_success(ctx.out(), "task show", &data, Some(&human))
}
