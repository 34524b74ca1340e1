//! Session wiring: store + persistence + autosave policy.
//!
//! A [`Session`] owns the [`BoardStore`], the [`Storage`] gateway, and the
//! debouncer, and decides *when* writes happen:
//!
//! - every mutation schedules a debounced save of the resulting snapshot,
//! - while a drag gesture is in progress, scheduling is suppressed entirely
//!   (not merely delayed) so a half-completed drag is never persisted,
//! - drag end re-enables autosave and writes a deliberate checkpoint,
//! - an embedding event loop drives pending saves via [`Session::poll`] or
//!   [`Session::run_until_idle`].
//!
//! There is no concurrent writer: mutations run to completion on the single
//! execution context, so the only concern here is scheduling, not mutual
//! exclusion. A debounced save always carries the latest snapshot at fire
//! time; intermediate snapshots of a burst are never written.

use tokio::time::{sleep_until, Duration, Instant};
use tracing::warn;

use crate::config::Config;
use crate::debounce::Debouncer;
use crate::error::Result;
use crate::model::BoardState;
use crate::storage::Storage;
use crate::store::BoardStore;

pub struct Session {
    store: BoardStore,
    storage: Storage,
    debouncer: Debouncer<BoardState>,
    dragging: bool,
}

impl Session {
    /// Load the persisted snapshot, or seed the default single-board state
    /// when no usable prior state exists.
    pub async fn open(storage: Storage, config: &Config) -> Result<Self> {
        let state = match storage.load_state().await? {
            Some(state) => state,
            None => BoardState::seeded(&config.board.default_name),
        };
        Ok(Self {
            store: BoardStore::new(state),
            storage,
            debouncer: Debouncer::new(Duration::from_millis(config.autosave.debounce_ms)),
            dragging: false,
        })
    }

    /// Read access to the store and its derived views.
    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    /// Apply a mutation to the store, then schedule a debounced save of the
    /// new snapshot unless a drag is in progress.
    pub fn mutate<R>(&mut self, f: impl FnOnce(&mut BoardStore) -> R) -> R {
        let out = f(&mut self.store);
        if !self.dragging {
            self.debouncer
                .schedule(self.store.state().clone(), Instant::now());
        }
        out
    }

    /// Whether a drag gesture is currently suppressing autosave.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Disable autosave scheduling for the duration of a drag gesture.
    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    /// Re-enable autosave and write the gesture's final state as an explicit
    /// checkpoint.
    pub async fn end_drag(&mut self) -> Result<()> {
        self.dragging = false;
        self.checkpoint().await
    }

    /// When the next pending save becomes due, if one is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Write the pending debounced save if its quiet period has elapsed.
    /// Returns whether a write happened.
    pub async fn poll(&mut self) -> Result<bool> {
        match self.debouncer.fire(Instant::now()) {
            Some(snapshot) => {
                self.storage.save_state(&snapshot).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drive pending saves until nothing is scheduled. Meant for an
    /// embedding event loop that wants to drain autosave work; save
    /// failures on this path are logged and swallowed, matching the
    /// unsurfaced-failure contract of the autosave path.
    pub async fn run_until_idle(&mut self) {
        while let Some(deadline) = self.debouncer.deadline() {
            sleep_until(deadline).await;
            if let Some(snapshot) = self.debouncer.fire(Instant::now()) {
                if let Err(err) = self.storage.save_state(&snapshot).await {
                    warn!(%err, "autosave failed");
                }
            }
        }
    }

    /// Persist the current snapshot immediately, discarding any pending
    /// debounced save (it would only repeat this write).
    pub async fn checkpoint(&mut self) -> Result<()> {
        self.debouncer.flush();
        self.storage.save_state(self.store.state()).await
    }
}
