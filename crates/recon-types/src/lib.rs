//! Shared type definitions for the Recon scouting system.
//!
//! This crate is the single source of truth for the data that flows between
//! the world graph, the shared stores, and the scout decision procedure.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for agents and tasks
//! - [`enums`] -- Target sources, task kinds, and scout phases
//! - [`structs`] -- Region names, positions, intel records, and tasks

pub mod enums;
pub mod ids;
pub mod structs;

/// Discrete simulation time. All freshness, TTL, and cooldown arithmetic
/// is done in ticks supplied by the host clock.
pub type Tick = u64;

// Re-export all public types at crate root for convenience.
pub use enums::{ScoutPhase, TargetSource, TaskKind};
pub use ids::{AgentId, TaskId};
pub use structs::{
    ControllerInfo, HostileSummary, IntelRecord, Position, RegionName, Task, TaskClaim,
};
