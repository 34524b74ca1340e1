//! Board State Store: the authoritative in-memory model.
//!
//! All mutations are synchronous transformations of the current snapshot and
//! never fail: a mutation against an unknown board or task id is a silent
//! no-op. The presentation layer treats transient id mismatches (a task
//! deleted between render and click) as expected, so the command path must
//! never throw. Absorbed no-ops are logged at debug level.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::debug;

use crate::id::generate_id;
use crate::model::{empty_column_orders, Board, BoardState, ColumnId, Priority, Task};

/// Partial update for a task. `id` and `created_at` are immutable and not
/// expressible here; absent fields leave the task unchanged.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.priority.is_none()
    }
}

/// Owning wrapper around the [`BoardState`] aggregate, exposing the mutation
/// API and the derived read-only views.
#[derive(Debug, Clone)]
pub struct BoardStore {
    state: BoardState,
}

impl BoardStore {
    pub fn new(state: BoardState) -> Self {
        Self { state }
    }

    /// The current snapshot.
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Consume the store, yielding the final snapshot.
    pub fn into_state(self) -> BoardState {
        self.state
    }

    // =========================================================================
    // Board mutations
    // =========================================================================

    /// Create a board with the fixed three-column layout and make it active.
    pub fn create_board(&mut self, name: &str) -> String {
        let id = generate_id(Some("board"));
        let board = Board {
            id: id.clone(),
            name: name.to_string(),
            columns: ColumnId::ALL.to_vec(),
        };
        self.state.boards.insert(id.clone(), board);
        self.state
            .tasks_by_board
            .insert(id.clone(), empty_column_orders());
        self.state.active_board_id = Some(id.clone());
        id
    }

    /// Replace a board's name. No-op if the id is unknown.
    pub fn rename_board(&mut self, id: &str, name: &str) {
        match self.state.boards.get_mut(id) {
            Some(board) => board.name = name.to_string(),
            None => debug!(board = id, "rename ignored: unknown board"),
        }
    }

    /// Remove a board and its column orders, purging tasks that are no
    /// longer referenced by any remaining board. If the deleted board was
    /// active, the first remaining board (in id order) becomes active.
    pub fn delete_board(&mut self, id: &str) {
        if self.state.boards.remove(id).is_none() {
            debug!(board = id, "delete ignored: unknown board");
            return;
        }
        self.state.tasks_by_board.remove(id);

        self.purge_orphan_tasks();

        if self.state.active_board_id.as_deref() == Some(id) {
            self.state.active_board_id = self.state.boards.keys().next().cloned();
        }
    }

    /// Point the active-board pointer at `id`. By contract the id is not
    /// validated; callers are expected to pass known ids.
    pub fn set_active_board(&mut self, id: &str) {
        self.state.active_board_id = Some(id.to_string());
    }

    // =========================================================================
    // Task mutations (all against the active board)
    // =========================================================================

    /// Create a task at the end of `column` on the active board. Returns the
    /// new id, or `None` when there is no active board.
    pub fn create_task(
        &mut self,
        column: ColumnId,
        title: &str,
        priority: Option<Priority>,
    ) -> Option<String> {
        let board_id = self.state.active_board_id.clone()?;
        let orders = self.state.tasks_by_board.get_mut(&board_id)?;

        let id = generate_id(Some("task"));
        let task = Task {
            id: id.clone(),
            title: title.to_string(),
            description: None,
            priority,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.state.tasks.insert(id.clone(), task);
        orders.entry(column).or_default().push(id.clone());
        Some(id)
    }

    /// Merge `patch` into an existing task and stamp `updated_at`. No-op if
    /// the id is unknown.
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) {
        let Some(task) = self.state.tasks.get_mut(id) else {
            debug!(task = id, "update ignored: unknown task");
            return;
        };
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = Some(description);
        }
        if let Some(priority) = patch.priority {
            task.priority = Some(priority);
        }
        task.updated_at = Some(Utc::now());
    }

    /// Remove a task from the task table and from whichever column order of
    /// the active board contains it. No-op if the id is unknown.
    pub fn delete_task(&mut self, id: &str) {
        if self.state.tasks.remove(id).is_none() {
            debug!(task = id, "delete ignored: unknown task");
            return;
        }
        if let Some(board_id) = self.state.active_board_id.clone() {
            if let Some(orders) = self.state.tasks_by_board.get_mut(&board_id) {
                for list in orders.values_mut() {
                    list.retain(|tid| tid != id);
                }
            }
        }
    }

    /// Move a task within the active board to `to_index` in `to_column`.
    ///
    /// The source position is resolved from the id at call time rather than
    /// trusted from the caller, so a stale index held by the presentation
    /// layer cannot displace an unrelated entry. For a same-column move the
    /// destination index is interpreted against the list after removal;
    /// out-of-range destinations clamp to the end. No-op when the id is not
    /// on the active board or the move would not change anything.
    pub fn move_task(&mut self, id: &str, to_column: ColumnId, to_index: usize) {
        let Some(board_id) = self.state.active_board_id.clone() else {
            return;
        };
        let Some(orders) = self.state.tasks_by_board.get_mut(&board_id) else {
            return;
        };

        let source = orders.iter().find_map(|(column, list)| {
            list.iter()
                .position(|tid| tid == id)
                .map(|index| (*column, index))
        });
        let Some((from_column, from_index)) = source else {
            debug!(task = id, "move ignored: task not on active board");
            return;
        };

        if from_column == to_column {
            let list = orders.get_mut(&from_column).expect("source column exists");
            let to_index = to_index.min(list.len() - 1);
            if to_index == from_index {
                return;
            }
            let moved = list.remove(from_index);
            list.insert(to_index, moved);
        } else {
            let moved = orders
                .get_mut(&from_column)
                .expect("source column exists")
                .remove(from_index);
            let target = orders.entry(to_column).or_default();
            let to_index = to_index.min(target.len());
            target.insert(to_index, moved);
        }
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    /// The active board, if one can be resolved.
    pub fn active_board(&self) -> Option<&Board> {
        let id = self.state.active_board_id.as_deref()?;
        self.state.boards.get(id)
    }

    /// Full task records grouped per column of the active board, in column
    /// order. Ids that fail to resolve in the task table are dropped rather
    /// than surfaced, as a guard against referential-integrity violations in
    /// a loaded snapshot.
    pub fn tasks_by_column(&self) -> BTreeMap<ColumnId, Vec<Task>> {
        let mut result = BTreeMap::new();
        let Some(board) = self.active_board() else {
            return result;
        };
        let Some(orders) = self.state.tasks_by_board.get(&board.id) else {
            return result;
        };

        for column in &board.columns {
            let tasks = orders
                .get(column)
                .map(|ids| {
                    ids.iter()
                        .filter_map(|id| self.state.tasks.get(id).cloned())
                        .collect()
                })
                .unwrap_or_default();
            result.insert(*column, tasks);
        }
        result
    }

    /// Direct task lookup.
    pub fn task_by_id(&self, id: &str) -> Option<&Task> {
        self.state.tasks.get(id)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Drop every task the remaining column orders no longer reference.
    fn purge_orphan_tasks(&mut self) {
        let referenced: std::collections::BTreeSet<&String> = self
            .state
            .tasks_by_board
            .values()
            .flat_map(|orders| orders.values())
            .flatten()
            .collect();
        let orphans: Vec<String> = self
            .state
            .tasks
            .keys()
            .filter(|id| !referenced.contains(id))
            .cloned()
            .collect();
        for id in orphans {
            debug!(task = %id, "purging orphaned task");
            self.state.tasks.remove(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SCHEMA_VERSION;

    fn store_with_board() -> BoardStore {
        BoardStore::new(BoardState::seeded("My Board"))
    }

    /// Every id in any column order resolves in the task table, and no id
    /// appears in more than one column order across the whole state.
    fn assert_referential_integrity(state: &BoardState) {
        let mut seen = std::collections::BTreeSet::new();
        for orders in state.tasks_by_board.values() {
            for list in orders.values() {
                for id in list {
                    assert!(state.tasks.contains_key(id), "dangling task id {id}");
                    assert!(seen.insert(id.clone()), "task id {id} referenced twice");
                }
            }
        }
    }

    #[test]
    fn create_board_becomes_active() {
        let mut store = store_with_board();
        let first = store.active_board().unwrap().id.clone();
        let second = store.create_board("Sprint 1");
        assert_ne!(first, second);
        assert_eq!(store.active_board().unwrap().id, second);
        assert_eq!(store.active_board().unwrap().name, "Sprint 1");
        assert_eq!(store.state().boards.len(), 2);
    }

    #[test]
    fn rename_board_replaces_name_and_ignores_unknown_id() {
        let mut store = store_with_board();
        let id = store.active_board().unwrap().id.clone();
        store.rename_board(&id, "Renamed");
        assert_eq!(store.active_board().unwrap().name, "Renamed");

        let before = store.state().clone();
        store.rename_board("board_missing", "Nope");
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn create_task_appends_to_column_end() {
        let mut store = store_with_board();
        let a = store
            .create_task(ColumnId::Backlog, "A", None)
            .expect("task id");
        let b = store
            .create_task(ColumnId::Backlog, "B", Some(Priority::Low))
            .expect("task id");

        let board_id = store.active_board().unwrap().id.clone();
        let order = &store.state().tasks_by_board[&board_id][&ColumnId::Backlog];
        assert_eq!(order, &vec![a, b.clone()]);
        assert_eq!(store.task_by_id(&b).unwrap().priority, Some(Priority::Low));
        assert!(store.task_by_id(&b).unwrap().updated_at.is_none());
        assert_referential_integrity(store.state());
    }

    #[test]
    fn create_task_without_active_board_is_a_noop() {
        let mut store = store_with_board();
        let id = store.active_board().unwrap().id.clone();
        store.delete_board(&id);
        assert!(store.state().active_board_id.is_none());
        assert_eq!(store.create_task(ColumnId::Backlog, "A", None), None);
        assert!(store.state().tasks.is_empty());
    }

    #[test]
    fn update_task_merges_partial_fields_and_stamps_updated_at() {
        let mut store = store_with_board();
        let id = store
            .create_task(ColumnId::Backlog, "Original", Some(Priority::Low))
            .unwrap();
        let created_at = store.task_by_id(&id).unwrap().created_at;

        store.update_task(
            &id,
            TaskPatch {
                description: Some("details".into()),
                ..TaskPatch::default()
            },
        );

        let task = store.task_by_id(&id).unwrap();
        assert_eq!(task.title, "Original");
        assert_eq!(task.description.as_deref(), Some("details"));
        assert_eq!(task.priority, Some(Priority::Low));
        assert_eq!(task.created_at, created_at);
        assert!(task.updated_at.is_some());

        let before = store.state().clone();
        store.update_task("task_missing", TaskPatch::default());
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn delete_task_removes_table_entry_and_column_reference() {
        let mut store = store_with_board();
        let keep = store.create_task(ColumnId::Backlog, "Keep", None).unwrap();
        let drop = store.create_task(ColumnId::Backlog, "Drop", None).unwrap();

        store.delete_task(&drop);

        assert!(store.task_by_id(&drop).is_none());
        let board_id = store.active_board().unwrap().id.clone();
        let order = &store.state().tasks_by_board[&board_id][&ColumnId::Backlog];
        assert_eq!(order, &vec![keep]);
        assert_referential_integrity(store.state());

        let before = store.state().clone();
        store.delete_task("task_missing");
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn move_within_column_is_a_pure_permutation() {
        let mut store = store_with_board();
        let a = store.create_task(ColumnId::Backlog, "A", None).unwrap();
        let b = store.create_task(ColumnId::Backlog, "B", None).unwrap();
        let c = store.create_task(ColumnId::Backlog, "C", None).unwrap();

        // [A,B,C], move A to final index 2 => [B,C,A]
        store.move_task(&a, ColumnId::Backlog, 2);

        let board_id = store.active_board().unwrap().id.clone();
        let order = &store.state().tasks_by_board[&board_id][&ColumnId::Backlog];
        assert_eq!(order, &vec![b, c, a]);
        assert_referential_integrity(store.state());
    }

    #[test]
    fn move_across_columns_conserves_total_count() {
        let mut store = store_with_board();
        let a = store.create_task(ColumnId::Backlog, "A", None).unwrap();
        let b = store.create_task(ColumnId::Backlog, "B", None).unwrap();
        let x = store.create_task(ColumnId::Done, "X", None).unwrap();

        store.move_task(&a, ColumnId::Done, 0);

        let board_id = store.active_board().unwrap().id.clone();
        let orders = &store.state().tasks_by_board[&board_id];
        assert_eq!(orders[&ColumnId::Backlog], vec![b]);
        assert_eq!(orders[&ColumnId::Done], vec![a, x]);
        assert_referential_integrity(store.state());
    }

    #[test]
    fn move_to_current_position_leaves_snapshot_unchanged() {
        let mut store = store_with_board();
        let a = store.create_task(ColumnId::Backlog, "A", None).unwrap();
        store.create_task(ColumnId::Backlog, "B", None).unwrap();

        let before = store.state().clone();
        store.move_task(&a, ColumnId::Backlog, 0);
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn move_clamps_out_of_range_destination_index() {
        let mut store = store_with_board();
        let a = store.create_task(ColumnId::Backlog, "A", None).unwrap();
        let b = store.create_task(ColumnId::Backlog, "B", None).unwrap();

        store.move_task(&a, ColumnId::Backlog, 99);
        let board_id = store.active_board().unwrap().id.clone();
        assert_eq!(
            store.state().tasks_by_board[&board_id][&ColumnId::Backlog],
            vec![b.clone(), a.clone()]
        );

        store.move_task(&a, ColumnId::InProgress, 99);
        assert_eq!(
            store.state().tasks_by_board[&board_id][&ColumnId::InProgress],
            vec![a]
        );
        assert_eq!(
            store.state().tasks_by_board[&board_id][&ColumnId::Backlog],
            vec![b]
        );
    }

    #[test]
    fn move_unknown_task_is_a_noop() {
        let mut store = store_with_board();
        store.create_task(ColumnId::Backlog, "A", None).unwrap();
        let before = store.state().clone();
        store.move_task("task_missing", ColumnId::Done, 0);
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn delete_board_purges_exclusively_referenced_tasks() {
        let mut store = store_with_board();
        let survivor = store
            .create_task(ColumnId::Backlog, "Survivor", None)
            .unwrap();

        let doomed_board = store.create_board("Doomed");
        let doomed_task = store.create_task(ColumnId::Backlog, "Doomed", None).unwrap();

        store.delete_board(&doomed_board);

        assert!(store.task_by_id(&doomed_task).is_none());
        assert!(store.task_by_id(&survivor).is_some());
        assert_referential_integrity(store.state());
    }

    #[test]
    fn delete_active_board_falls_back_to_first_remaining() {
        let mut store = store_with_board();
        store.create_board("Second");
        let active = store.active_board().unwrap().id.clone();

        store.delete_board(&active);

        let expected = store.state().boards.keys().next().cloned();
        assert_eq!(store.state().active_board_id, expected);
        assert!(store.state().active_board_id.is_some());
    }

    #[test]
    fn delete_last_board_clears_active_pointer() {
        let mut store = store_with_board();
        let id = store.active_board().unwrap().id.clone();
        store.delete_board(&id);
        assert!(store.state().active_board_id.is_none());
        assert!(store.active_board().is_none());
        assert!(store.tasks_by_column().is_empty());
    }

    #[test]
    fn set_active_board_does_not_validate_the_id() {
        let mut store = store_with_board();
        store.set_active_board("board_unknown");
        assert_eq!(
            store.state().active_board_id.as_deref(),
            Some("board_unknown")
        );
        // Derived views degrade to the empty/loading shape.
        assert!(store.active_board().is_none());
        assert!(store.tasks_by_column().is_empty());
    }

    #[test]
    fn tasks_by_column_resolves_records_in_order_and_drops_dangling_ids() {
        let mut store = store_with_board();
        let a = store.create_task(ColumnId::Backlog, "A", None).unwrap();
        store.create_task(ColumnId::Backlog, "B", None).unwrap();

        // Inject a referential-integrity violation directly into the state.
        let board_id = store.active_board().unwrap().id.clone();
        let mut state = store.into_state();
        state
            .tasks_by_board
            .get_mut(&board_id)
            .unwrap()
            .get_mut(&ColumnId::Backlog)
            .unwrap()
            .push("task_dangling".to_string());
        let store = BoardStore::new(state);

        let grouped = store.tasks_by_column();
        let backlog = &grouped[&ColumnId::Backlog];
        assert_eq!(backlog.len(), 2);
        assert_eq!(backlog[0].id, a);
        assert!(grouped[&ColumnId::InProgress].is_empty());
        assert!(grouped[&ColumnId::Done].is_empty());
    }

    #[test]
    fn schema_version_is_carried_through_mutations() {
        let mut store = store_with_board();
        store.create_board("Another");
        assert_eq!(store.state().schema_version, SCHEMA_VERSION);
    }
}
