//! Command-line interface for tl
//!
//! This module defines the CLI structure using clap derive macros. The CLI
//! is a thin presentation layer over the board store: it resolves the
//! user-supplied board/task references, applies exactly one mutation, and
//! writes an explicit checkpoint before exiting. Reference validation
//! happens here — the store itself stays no-throw.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputOptions;
use crate::session::Session;
use crate::storage::Storage;
use crate::store::BoardStore;

mod board;
mod show;
mod task;

/// tl - a single-user kanban task board
///
/// Tasks live on named boards in three fixed columns (backlog, in-progress,
/// done). State persists locally as a single JSON snapshot.
#[derive(Parser, Debug)]
#[command(name = "tl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the state file (defaults to the platform data directory)
    #[arg(long, global = true, env = "TL_STATE")]
    pub state: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Board management
    #[command(subcommand)]
    Board(BoardCommands),

    /// Task management (on the active board)
    #[command(subcommand)]
    Task(TaskCommands),

    /// Show the active board grouped by column
    Show,
}

#[derive(Subcommand, Debug)]
pub enum BoardCommands {
    /// Create a board and switch to it
    New {
        /// Board name
        name: String,
    },

    /// List all boards
    List,

    /// Rename a board
    Rename {
        /// Board name or id
        board: String,

        /// New name
        name: String,
    },

    /// Delete a board (tasks referenced only by it are purged)
    Rm {
        /// Board name or id
        board: String,
    },

    /// Switch the active board
    Use {
        /// Board name or id
        board: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task to a column of the active board
    Add {
        /// Task title
        title: String,

        /// Target column: backlog, in-progress, done
        #[arg(long, default_value = "backlog")]
        column: String,

        /// Priority: low, medium, high
        #[arg(long)]
        priority: Option<String>,

        /// Longer description
        #[arg(long)]
        description: Option<String>,
    },

    /// Edit a task's title, description, or priority
    Edit {
        /// Task id, unique id prefix, or unique title
        task: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New priority: low, medium, high
        #[arg(long)]
        priority: Option<String>,
    },

    /// Delete a task
    Rm {
        /// Task id, unique id prefix, or unique title
        task: String,
    },

    /// Move a task to a column position on the active board
    Move {
        /// Task id, unique id prefix, or unique title
        task: String,

        /// Destination column: backlog, in-progress, done
        #[arg(long)]
        to: String,

        /// Destination position (0-based; defaults to the end of the column)
        #[arg(long)]
        index: Option<usize>,
    },

    /// Show one task in full
    Show {
        /// Task id, unique id prefix, or unique title
        task: String,
    },
}

impl Cli {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let ctx = CommandContext::new(self.state, self.json, self.quiet)?;
        match self.command {
            Commands::Board(cmd) => match cmd {
                BoardCommands::New { name } => board::run_new(ctx, name).await,
                BoardCommands::List => board::run_list(ctx).await,
                BoardCommands::Rename { board, name } => {
                    board::run_rename(ctx, board, name).await
                }
                BoardCommands::Rm { board } => board::run_rm(ctx, board).await,
                BoardCommands::Use { board } => board::run_use(ctx, board).await,
            },
            Commands::Task(cmd) => match cmd {
                TaskCommands::Add {
                    title,
                    column,
                    priority,
                    description,
                } => {
                    task::run_add(
                        ctx,
                        task::AddOptions {
                            title,
                            column,
                            priority,
                            description,
                        },
                    )
                    .await
                }
                TaskCommands::Edit {
                    task,
                    title,
                    description,
                    priority,
                } => {
                    task::run_edit(
                        ctx,
                        task::EditOptions {
                            task,
                            title,
                            description,
                            priority,
                        },
                    )
                    .await
                }
                TaskCommands::Rm { task } => task::run_rm(ctx, task).await,
                TaskCommands::Move { task, to, index } => {
                    task::run_move(ctx, task, to, index).await
                }
                TaskCommands::Show { task } => task::run_show(ctx, task).await,
            },
            Commands::Show => show::run(ctx).await,
        }
    }
}

/// Shared per-invocation context: resolved storage location, configuration,
/// and output options.
pub(crate) struct CommandContext {
    storage: Storage,
    config: Config,
    out: OutputOptions,
}

impl CommandContext {
    fn new(state: Option<PathBuf>, json: bool, quiet: bool) -> Result<Self> {
        let config = std::env::current_dir()
            .map(|dir| Config::load_from_dir(&dir))
            .unwrap_or_default();

        let storage = match state.or_else(|| config.state_path.clone()) {
            Some(path) => Storage::new(path),
            None => Storage::default_location()?,
        };

        Ok(Self {
            storage,
            config,
            out: OutputOptions { json, quiet },
        })
    }

    pub(crate) async fn open_session(&self) -> Result<Session> {
        Session::open(self.storage.clone(), &self.config).await
    }

    pub(crate) fn out(&self) -> OutputOptions {
        self.out
    }
}

/// Resolve a user-supplied board reference: exact id first, then unique
/// name match.
pub(crate) fn resolve_board(store: &BoardStore, reference: &str) -> Result<String> {
    let state = store.state();
    if state.boards.contains_key(reference) {
        return Ok(reference.to_string());
    }

    let matches: Vec<&String> = state
        .boards
        .iter()
        .filter(|(_, board)| board.name == reference)
        .map(|(id, _)| id)
        .collect();
    match matches.as_slice() {
        [id] => Ok((*id).clone()),
        [] => Err(Error::BoardNotFound(reference.to_string())),
        _ => Err(Error::InvalidArgument(format!(
            "board name '{reference}' is ambiguous ({} matches); use the id",
            matches.len()
        ))),
    }
}

/// Resolve a user-supplied task reference against the active board: exact
/// id, then unique id prefix, then unique title.
pub(crate) fn resolve_task(store: &BoardStore, reference: &str) -> Result<String> {
    let board = store.active_board().ok_or(Error::NoActiveBoard)?;
    let state = store.state();
    let ids: Vec<&str> = state
        .tasks_by_board
        .get(&board.id)
        .map(|orders| orders.values().flatten().map(String::as_str).collect())
        .unwrap_or_default();

    if ids.contains(&reference) {
        return Ok(reference.to_string());
    }

    let prefix_matches: Vec<&str> = ids
        .iter()
        .copied()
        .filter(|id| id.starts_with(reference))
        .collect();
    match prefix_matches.as_slice() {
        [id] => return Ok((*id).to_string()),
        [] => {}
        _ => {
            return Err(Error::AmbiguousTask {
                reference: reference.to_string(),
                count: prefix_matches.len(),
            })
        }
    }

    let title_matches: Vec<&str> = ids
        .iter()
        .copied()
        .filter(|id| {
            store
                .task_by_id(id)
                .map(|task| task.title == reference)
                .unwrap_or(false)
        })
        .collect();
    match title_matches.as_slice() {
        [id] => Ok((*id).to_string()),
        [] => Err(Error::TaskNotFound(reference.to_string())),
        _ => Err(Error::AmbiguousTask {
            reference: reference.to_string(),
            count: title_matches.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoardState, ColumnId};

    fn store_with_tasks() -> (BoardStore, String, String) {
        let mut store = BoardStore::new(BoardState::seeded("My Board"));
        let a = store
            .create_task(ColumnId::Backlog, "Write spec", None)
            .unwrap();
        let b = store.create_task(ColumnId::Done, "Ship it", None).unwrap();
        (store, a, b)
    }

    #[test]
    fn resolve_board_by_id_name_and_missing() {
        let (store, _, _) = store_with_tasks();
        let id = store.active_board().unwrap().id.clone();

        assert_eq!(resolve_board(&store, &id).unwrap(), id);
        assert_eq!(resolve_board(&store, "My Board").unwrap(), id);
        assert!(matches!(
            resolve_board(&store, "Nope"),
            Err(Error::BoardNotFound(_))
        ));
    }

    #[test]
    fn resolve_board_rejects_ambiguous_names() {
        let (mut store, _, _) = store_with_tasks();
        store.create_board("My Board");
        assert!(matches!(
            resolve_board(&store, "My Board"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn resolve_task_by_id_prefix_and_title() {
        let (store, a, b) = store_with_tasks();

        assert_eq!(resolve_task(&store, &a).unwrap(), a);
        // Ids start with "task_<time36>_"; the full id is its own prefix and
        // the random suffix makes longer prefixes unique.
        let prefix = &a[..a.len() - 2];
        assert_eq!(resolve_task(&store, prefix).unwrap(), a);
        assert_eq!(resolve_task(&store, "Ship it").unwrap(), b);
        assert!(matches!(
            resolve_task(&store, "Nonexistent"),
            Err(Error::TaskNotFound(_))
        ));
    }

    #[test]
    fn resolve_task_rejects_ambiguous_references() {
        let (mut store, _, _) = store_with_tasks();
        store
            .create_task(ColumnId::Backlog, "Write spec", None)
            .unwrap();
        assert!(matches!(
            resolve_task(&store, "Write spec"),
            Err(Error::AmbiguousTask { count: 2, .. })
        ));
        // The shared "task_" prefix matches everything.
        assert!(matches!(
            resolve_task(&store, "task_"),
            Err(Error::AmbiguousTask { .. })
        ));
    }

    #[test]
    fn resolve_task_requires_an_active_board() {
        let (mut store, _, _) = store_with_tasks();
        let id = store.active_board().unwrap().id.clone();
        store.delete_board(&id);
        assert!(matches!(
            resolve_task(&store, "anything"),
            Err(Error::NoActiveBoard)
        ));
    }
}
