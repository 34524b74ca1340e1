//! Persistence gateway for the board state snapshot.
//!
//! The entire [`BoardState`] aggregate is stored as one JSON record at a
//! fixed path; there is no per-board or per-task granularity. Loading treats
//! a missing file, an unreadable record, and a schema-version mismatch
//! identically: the caller gets `None` and reseeds a default state. Writes
//! are full overwrites, made atomic with a temp file + rename so a crash
//! mid-write never leaves a truncated record behind.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{BoardState, SCHEMA_VERSION};

/// File name of the single persisted record.
pub const STATE_FILE: &str = "tl_state.json";

/// Storage manager for the persisted snapshot.
#[derive(Debug, Clone)]
pub struct Storage {
    state_path: PathBuf,
}

impl Storage {
    /// Storage backed by an explicit state-file path.
    pub fn new(state_path: PathBuf) -> Self {
        Self { state_path }
    }

    /// Storage at the platform-default data directory
    /// (e.g. `~/.local/share/tl/tl_state.json` on Linux).
    pub fn default_location() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "tl").ok_or(Error::NoStateDir)?;
        Ok(Self::new(dirs.data_dir().join(STATE_FILE)))
    }

    /// Path of the persisted record.
    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Read the persisted snapshot.
    ///
    /// Returns `Ok(None)` when there is no usable prior state: the file does
    /// not exist, does not parse, or carries a different schema version.
    /// Only unexpected I/O failures surface as errors.
    pub async fn load_state(&self) -> Result<Option<BoardState>> {
        let raw = match fs::read_to_string(&self.state_path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.state_path.display(), "no persisted state");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        // Probe the version tag before committing to the full shape, so a
        // record written by an older layout is discarded instead of failing.
        let value: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(path = %self.state_path.display(), %err, "discarding unreadable state record");
                return Ok(None);
            }
        };
        let version = value.get("schemaVersion").and_then(|v| v.as_u64());
        if version != Some(SCHEMA_VERSION as u64) {
            warn!(
                path = %self.state_path.display(),
                found = ?version,
                expected = SCHEMA_VERSION,
                "discarding state record with mismatched schema version"
            );
            return Ok(None);
        }

        match serde_json::from_value(value) {
            Ok(state) => Ok(Some(state)),
            Err(err) => {
                warn!(path = %self.state_path.display(), %err, "discarding malformed state record");
                Ok(None)
            }
        }
    }

    /// Overwrite the persisted snapshot atomically (write to temp, then
    /// rename), creating the parent directory on demand.
    pub async fn save_state(&self, state: &BoardState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;

        if let Some(parent) = self.state_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Temp file lives in the same directory so the rename is atomic.
        let temp_path = self.state_path.with_extension("json.tmp");
        fs::write(&temp_path, json.as_bytes()).await?;
        fs::rename(&temp_path, &self.state_path)
            .await
            .map_err(|_| Error::WriteFailed(self.state_path.clone()))?;

        debug!(path = %self.state_path.display(), "state saved");
        Ok(())
    }
}
