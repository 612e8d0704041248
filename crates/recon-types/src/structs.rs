//! Core entity structs: region names, positions, intel records, and tasks.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::enums::TaskKind;
use crate::ids::{AgentId, TaskId};
use crate::Tick;

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// The name of a region, e.g. `W1N1` or `E12S3`.
///
/// Names usually encode grid coordinates, but any string is a valid name:
/// callers that need coordinates parse them and fall back gracefully when
/// parsing fails. The derived ordering is plain lexicographic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionName(String);

impl RegionName {
    /// Wrap a region name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for RegionName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionName {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl From<String> for RegionName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl core::borrow::Borrow<str> for RegionName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A tile inside a region's local 50x50 frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// The region the tile belongs to.
    pub region: RegionName,
    /// Column, `0..50`.
    pub x: u8,
    /// Row, `0..50`.
    pub y: u8,
}

impl Position {
    /// A tile at `(x, y)` in `region`.
    pub const fn new(region: RegionName, x: u8, y: u8) -> Self {
        Self { region, x, y }
    }

    /// The tile at `(center, center)`, used when no explicit target tile is known.
    pub const fn center_of(region: RegionName, center: u8) -> Self {
        Self {
            region,
            x: center,
            y: center,
        }
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}({},{})", self.region, self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Intel
// ---------------------------------------------------------------------------

/// Hostile occupants seen during the last visit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostileSummary {
    /// Number of hostile units.
    pub count: u32,
    /// Distinct owners of those units.
    pub owners: BTreeSet<String>,
}

/// Controller state of a region, when the region has a controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerInfo {
    /// Owning player, if claimed.
    pub owner: Option<String>,
    /// Reserving player, if reserved.
    pub reservation: Option<String>,
    /// Controller level (0 when unowned).
    pub level: u8,
}

/// Cached knowledge about one region.
///
/// Created empty the first time a region is looked up mutably, overwritten
/// by scouts on arrival, and never deleted. Freshness and backoff fields
/// are measured in ticks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntelRecord {
    /// Whether any scout has ever recorded this region.
    pub scouted: bool,
    /// Tick of the most recent successful visit.
    pub last_scouted: Option<Tick>,
    /// While `> now`, memory and frontier selection skip this region.
    pub scout_cooldown_until: Option<Tick>,
    /// Ticks at which scouts gave up on reaching this region.
    pub scout_fail_log: Vec<Tick>,
    /// Number of energy sources.
    pub source_count: u32,
    /// Mineral deposit type, if any.
    pub mineral: Option<String>,
    /// Structure counts grouped by structure type.
    pub structures: BTreeMap<String, u32>,
    /// Hostile presence at the last visit.
    pub hostiles: HostileSummary,
    /// Controller ownership, reservation, and level.
    pub controller: Option<ControllerInfo>,
    /// Terrain desirability score supplied by the terrain scorer.
    pub terrain_score: u32,
    /// Directly adjacent regions.
    pub exits: BTreeSet<RegionName>,
    /// Energy lying around or stored in the region.
    pub energy_available: u32,
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Exclusive ownership marker on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskClaim {
    /// The agent holding the claim.
    pub owner: AgentId,
    /// The claim lapses at this tick and the task becomes claimable again.
    pub until: Tick,
    /// Free-form claim metadata (e.g. the selected task id).
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

/// A unit of work in a colony's queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,
    /// What the task asks for.
    pub kind: TaskKind,
    /// The region the task is about.
    pub region: RegionName,
    /// Higher runs first.
    pub priority: u8,
    /// Ticks the task may live in the queue.
    pub ttl: u32,
    /// Ticks the task has spent in the queue.
    pub age: u32,
    /// How many agents the task wants.
    pub amount: u32,
    /// The agent that created the task, if any.
    pub owner: Option<AgentId>,
    /// Free-form creator metadata.
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
    /// Current claim, if any.
    pub claim: Option<TaskClaim>,
}

impl Task {
    /// Whether no live claim blocks this task at `now`.
    pub fn is_claimable(&self, now: Tick) -> bool {
        self.claim.as_ref().is_none_or(|claim| claim.until <= now)
    }

    /// Whether the task has outlived its TTL.
    pub const fn is_expired(&self) -> bool {
        self.age >= self.ttl
    }
}
