//! Scout decision procedure, world clock, and tick cycle for the Recon
//! scouting system.
//!
//! # Modules
//!
//! - [`clock`] -- World clock with a checked tick counter.
//! - [`config`] -- Configuration loading from `recon-config.yaml` into
//!   strongly-typed structs.
//! - [`control`] -- Stop flag, tick pacing, and run bounds.
//! - [`runner`] -- The bounded async simulation loop.
//! - [`scout`] -- The per-tick scout state machine, target selection, and
//!   intel recording.
//! - [`tick`] -- One pass of every live scout over the shared stores.

pub mod clock;
pub mod config;
pub mod control;
pub mod runner;
pub mod scout;
pub mod tick;

pub use config::{ConfigError, ReconConfig, ScoutConfig, TaskConfig};
pub use control::{RunControl, SimulationEndReason};
pub use runner::{NoOpCallback, SimulationResult, TickCallback, run_simulation};
pub use scout::{ScoutAgent, ScoutCommand, ScoutContext, ScoutMemory, ScoutReport, Target};
pub use tick::{ScoutHost, SimulationState, TickServices, TickSummary, run_tick};
