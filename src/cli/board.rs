//! Board management commands
//!
//! Implements `tl board new`, `tl board list`, `tl board rename`,
//! `tl board rm`, `tl board use`.

use serde::Serialize;

use crate::cli::{resolve_board, CommandContext};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};

/// Output for `tl board new` and `tl board use`
#[derive(Debug, Serialize)]
pub struct BoardOutput {
    pub id: String,
    pub name: String,
    pub active: bool,
}

/// One row of `tl board list`
#[derive(Debug, Serialize)]
pub struct BoardListEntry {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub tasks: usize,
}

/// Run `tl board new <name>`
pub async fn run_new(ctx: CommandContext, name: String) -> Result<()> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::InvalidArgument("board name must not be empty".into()));
    }

    let mut session = ctx.open_session().await?;
    let id = session.mutate(|store| store.create_board(&name));
    session.checkpoint().await?;

    let data = BoardOutput {
        id: id.clone(),
        name: name.clone(),
        active: true,
    };
    let mut human = HumanOutput::new(format!("Created board '{name}'"));
    human.push_summary("id", id);
    human.push_summary("active", "yes");
    emit_success(ctx.out(), "board new", &data, Some(&human))
}

/// Run `tl board list`
pub async fn run_list(ctx: CommandContext) -> Result<()> {
    let session = ctx.open_session().await?;
    let store = session.store();
    let state = store.state();

    let entries: Vec<BoardListEntry> = state
        .boards
        .values()
        .map(|board| {
            let tasks = state
                .tasks_by_board
                .get(&board.id)
                .map(|orders| orders.values().map(Vec::len).sum())
                .unwrap_or(0);
            BoardListEntry {
                id: board.id.clone(),
                name: board.name.clone(),
                active: state.active_board_id.as_deref() == Some(board.id.as_str()),
                tasks,
            }
        })
        .collect();

    let mut human = HumanOutput::new(format!("{} board(s)", entries.len()));
    for entry in &entries {
        let marker = if entry.active { "*" } else { " " };
        human.push_detail(format!(
            "{marker} {name}  [{tasks} task(s)]  {id}",
            name = entry.name,
            tasks = entry.tasks,
            id = entry.id
        ));
    }
    emit_success(ctx.out(), "board list", &entries, Some(&human))
}

/// Run `tl board rename <board> <name>`
pub async fn run_rename(ctx: CommandContext, board: String, name: String) -> Result<()> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::InvalidArgument("board name must not be empty".into()));
    }

    let mut session = ctx.open_session().await?;
    let id = resolve_board(session.store(), &board)?;
    session.mutate(|store| store.rename_board(&id, &name));
    session.checkpoint().await?;

    let active = session.store().state().active_board_id.as_deref() == Some(id.as_str());
    let data = BoardOutput {
        id,
        name: name.clone(),
        active,
    };
    let human = HumanOutput::new(format!("Renamed board to '{name}'"));
    emit_success(ctx.out(), "board rename", &data, Some(&human))
}

/// Run `tl board rm <board>`
pub async fn run_rm(ctx: CommandContext, board: String) -> Result<()> {
    let mut session = ctx.open_session().await?;
    let id = resolve_board(session.store(), &board)?;
    let name = session.store().state().boards[&id].name.clone();

    session.mutate(|store| store.delete_board(&id));
    session.checkpoint().await?;

    let remaining = session.store().state().boards.len();
    let data = BoardOutput {
        id,
        name: name.clone(),
        active: false,
    };
    let mut human = HumanOutput::new(format!("Deleted board '{name}'"));
    human.push_summary("remaining boards", remaining.to_string());
    if let Some(active) = session.store().active_board() {
        human.push_summary("active board", active.name.clone());
    }
    emit_success(ctx.out(), "board rm", &data, Some(&human))
}

/// Run `tl board use <board>`
pub async fn run_use(ctx: CommandContext, board: String) -> Result<()> {
    let mut session = ctx.open_session().await?;
    let id = resolve_board(session.store(), &board)?;
    session.mutate(|store| store.set_active_board(&id));
    session.checkpoint().await?;

    let name = session.store().state().boards[&id].name.clone();
    let data = BoardOutput {
        id,
        name: name.clone(),
        active: true,
    };
    let human = HumanOutput::new(format!("Switched to board '{name}'"));
    emit_success(ctx.out(), "board use", &data, Some(&human))
}
