//! Data model for the board state snapshot.
//!
//! The whole application state is one serializable aggregate:
//! boards, per-board column orderings, the task table, and the active board
//! pointer. Tasks are owned by the task table; column orders hold references
//! (ids) only. Wire names are camelCase, matching the persisted layout.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::generate_id;

/// Version tag of the persisted snapshot. A loaded record with any other
/// version is discarded and replaced by a freshly seeded state.
pub const SCHEMA_VERSION: u32 = 1;

/// The three fixed stages of every board, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnId {
    Backlog,
    InProgress,
    Done,
}

impl ColumnId {
    /// All columns in the fixed board order.
    pub const ALL: [ColumnId; 3] = [ColumnId::Backlog, ColumnId::InProgress, ColumnId::Done];

    /// Human-readable column title for display surfaces.
    pub fn title(&self) -> &'static str {
        match self {
            ColumnId::Backlog => "Backlog",
            ColumnId::InProgress => "In Progress",
            ColumnId::Done => "Done",
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            ColumnId::Backlog => "backlog",
            ColumnId::InProgress => "inProgress",
            ColumnId::Done => "done",
        }
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "backlog" => Ok(ColumnId::Backlog),
            "inProgress" | "in-progress" | "progress" | "doing" => Ok(ColumnId::InProgress),
            "done" => Ok(ColumnId::Done),
            other => Err(format!(
                "unknown column '{other}' (expected backlog, in-progress, or done)"
            )),
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        };
        f.write_str(s)
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!(
                "unknown priority '{other}' (expected low, medium, or high)"
            )),
        }
    }
}

/// A unit of work. `id` and `created_at` are set once at creation; every
/// later mutation stamps `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A named workspace with an ordered set of columns. The column set is
/// per-board data even though every board currently gets the same fixed
/// three-column layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub name: String,
    pub columns: Vec<ColumnId>,
}

/// Ordered task ids per column for one board.
pub type ColumnOrders = BTreeMap<ColumnId, Vec<String>>;

/// The aggregate root: everything the application persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardState {
    pub boards: BTreeMap<String, Board>,
    pub tasks_by_board: BTreeMap<String, ColumnOrders>,
    pub tasks: BTreeMap<String, Task>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_board_id: Option<String>,
    pub schema_version: u32,
}

/// Empty order lists for the fixed three-column layout.
pub fn empty_column_orders() -> ColumnOrders {
    ColumnId::ALL.iter().map(|c| (*c, Vec::new())).collect()
}

impl BoardState {
    /// Freshly seeded default state: one board with three empty columns,
    /// already active.
    pub fn seeded(default_board_name: &str) -> Self {
        let board_id = generate_id(Some("board"));
        let board = Board {
            id: board_id.clone(),
            name: default_board_name.to_string(),
            columns: ColumnId::ALL.to_vec(),
        };
        Self {
            boards: BTreeMap::from([(board_id.clone(), board)]),
            tasks_by_board: BTreeMap::from([(board_id.clone(), empty_column_orders())]),
            tasks: BTreeMap::new(),
            active_board_id: Some(board_id),
            schema_version: SCHEMA_VERSION,
        }
    }
}
