//! Board view command
//!
//! Implements `tl show`: the active board's tasks grouped by column, in
//! column order.

use serde::Serialize;

use crate::cli::CommandContext;
use crate::error::Result;
use crate::model::{ColumnId, Task};
use crate::output::{emit_success, HumanOutput};

#[derive(Debug, Serialize)]
pub struct ShowOutput {
    pub board_id: Option<String>,
    pub board_name: Option<String>,
    pub columns: Vec<ColumnView>,
}

#[derive(Debug, Serialize)]
pub struct ColumnView {
    pub column: ColumnId,
    pub tasks: Vec<Task>,
}

/// Run `tl show`
pub async fn run(ctx: CommandContext) -> Result<()> {
    let session = ctx.open_session().await?;
    let store = session.store();

    let board = store.active_board();
    let grouped = store.tasks_by_column();
    let columns: Vec<ColumnView> = board
        .map(|board| {
            board
                .columns
                .iter()
                .map(|column| ColumnView {
                    column: *column,
                    tasks: grouped.get(column).cloned().unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();

    let data = ShowOutput {
        board_id: board.map(|b| b.id.clone()),
        board_name: board.map(|b| b.name.clone()),
        columns,
    };

    let header = match &data.board_name {
        Some(name) => format!("Board: {name}"),
        None => "No active board".to_string(),
    };
    let mut human = HumanOutput::new(header);
    for view in &data.columns {
        human.push_detail(format!(
            "{} ({})",
            view.column.title(),
            view.tasks.len()
        ));
        for task in &view.tasks {
            let priority = task
                .priority
                .map(|p| format!(" [{p}]"))
                .unwrap_or_default();
            human.push_detail(format!("  - {}{priority}  {}", task.title, task.id));
        }
    }
    emit_success(ctx.out(), "show", &data, Some(&human))
}
