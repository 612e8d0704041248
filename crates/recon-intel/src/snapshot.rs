//! JSON snapshots of the shared stores plus per-agent memory.
//!
//! The tick driver loads a snapshot before the first agent runs and flushes
//! one after the last. Loading is forgiving: a missing, unreadable, or
//! corrupted file yields an empty snapshot rather than an error, so a bad
//! file can never stop scouts from running. Saving writes to a sibling
//! temp file and renames it into place.

use std::path::{Path, PathBuf};

use recon_types::Tick;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::IntelError;
use crate::store::IntelStore;
use crate::tasks::TaskQueue;

/// Everything that survives between ticks.
///
/// `A` is the host's per-agent record (for scouts, their persisted memory).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "A: DeserializeOwned"))]
pub struct Snapshot<A> {
    /// The last completed tick.
    #[serde(default)]
    pub tick: Tick,
    /// Region intel.
    #[serde(default)]
    pub intel: IntelStore,
    /// Colony task queues.
    #[serde(default)]
    pub tasks: TaskQueue,
    /// Per-agent state.
    #[serde(default = "Vec::new")]
    pub agents: Vec<A>,
}

impl<A> Default for Snapshot<A> {
    fn default() -> Self {
        Self {
            tick: 0,
            intel: IntelStore::new(),
            tasks: TaskQueue::new(),
            agents: Vec::new(),
        }
    }
}

/// A snapshot stored as a JSON file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Bind to a file path. Nothing is read until [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, falling back to an empty one.
    pub fn load<A: DeserializeOwned>(&self) -> Snapshot<A> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No snapshot file, starting empty");
                return Snapshot::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Unreadable snapshot, starting empty");
                return Snapshot::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Corrupted snapshot, starting empty");
                Snapshot::default()
            }
        }
    }

    /// Write the snapshot atomically.
    ///
    /// # Errors
    ///
    /// Returns [`IntelError::Json`] if encoding fails, or [`IntelError::Io`]
    /// if the temp file cannot be written or renamed.
    pub fn save<A: Serialize>(&self, snapshot: &Snapshot<A>) -> Result<(), IntelError> {
        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), tick = snapshot.tick, "Snapshot saved");
        Ok(())
    }
}
