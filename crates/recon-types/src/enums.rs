//! Enumeration types for the Recon scouting system.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Target sources
// ---------------------------------------------------------------------------

/// Where a scout's current target came from.
///
/// The three variants are also the three target-selection policies, tried
/// in the order given by [`TargetSource::PRIORITY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSource {
    /// A `SCOUT_ROOM` task claimed from the home colony's queue.
    Task,
    /// A stale region found by scanning the intel store.
    Memory,
    /// A stale region on the frontier around the home region.
    Auto,
}

impl TargetSource {
    /// Selection order: the first policy that yields a target wins.
    pub const PRIORITY: [Self; 3] = [Self::Task, Self::Memory, Self::Auto];
}

impl core::fmt::Display for TargetSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::Task => "task",
            Self::Memory => "memory",
            Self::Auto => "auto",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Task kinds
// ---------------------------------------------------------------------------

/// The kind of work a queued task asks for.
///
/// Serialized with the wire names used by every colony queue
/// (`SCOUT_ROOM`, `REMOTE_SCORE_ROOM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    /// Visit a region and refresh its intel.
    #[serde(rename = "SCOUT_ROOM")]
    ScoutRoom,
    /// Evaluate a freshly scouted region as a remote-mining candidate.
    #[serde(rename = "REMOTE_SCORE_ROOM")]
    RemoteScoreRoom,
}

impl TaskKind {
    /// The wire name of this task kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ScoutRoom => "SCOUT_ROOM",
            Self::RemoteScoreRoom => "REMOTE_SCORE_ROOM",
        }
    }
}

impl core::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Scout phases
// ---------------------------------------------------------------------------

/// The state a scout ended its tick in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoutPhase {
    /// Waiting out the idle window, possibly walking home.
    Idle,
    /// Moving toward the target region.
    Traveling,
    /// Arrived and wrote intel this tick.
    Recording,
    /// Gave up its target because it is about to expire.
    Retiring,
}
