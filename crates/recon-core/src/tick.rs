//! Tick cycle: one pass of every live scout over the shared stores.
//!
//! Each tick runs these steps in order:
//!
//! 1. **Advance** -- bump the world clock.
//! 2. **Age** -- age every queued task and drop the expired ones.
//! 3. **Decide** -- run [`scout::run`] once per scout in ascending
//!    [`AgentId`] order, each call seeing the writes of the calls before it,
//!    and hand the returned commands to the [`ScoutHost`].
//! 4. **Expire** -- tick down lifetimes and remove scouts that died or
//!    retired this tick, releasing any task claim they still hold.
//!
//! The cycle is deterministic given the same initial state and services.

use std::collections::BTreeMap;

use recon_intel::{IntelStore, Snapshot, TaskQueue};
use recon_types::{AgentId, Position, RegionName, ScoutPhase, Tick};
use recon_world::RegionMap;
use tracing::{debug, info};

use crate::clock::{ClockError, WorldClock};
use crate::config::{ScoutConfig, TaskConfig};
use crate::scout::services::{RegionObserver, TerrainCapture};
use crate::scout::{self, ScoutAgent, ScoutCommand, ScoutContext};

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Carries out scout commands in the host world.
pub trait ScoutHost {
    /// Execute one command issued by `scout`.
    ///
    /// Travel commands may move the scout by updating `scout.region`.
    fn execute(&mut self, world: &RegionMap, scout: &mut ScoutAgent, command: &ScoutCommand);
}

/// The services a tick needs besides the simulation state.
pub struct TickServices<'a> {
    /// Region survey service.
    pub observer: &'a dyn RegionObserver,
    /// Terrain cache service.
    pub terrain: &'a mut dyn TerrainCapture,
    /// Command executor.
    pub host: &'a mut dyn ScoutHost,
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: Tick,
    /// Scouts still alive at the end of the tick.
    pub scouts_alive: u32,
    /// How many scouts ended the tick in each phase.
    pub phases: BTreeMap<ScoutPhase, u32>,
    /// Regions recorded this tick.
    pub recorded: Vec<RegionName>,
    /// Commands handed to the host.
    pub commands_issued: u32,
    /// Tasks dropped for exceeding their TTL.
    pub expired_tasks: usize,
    /// Scouts removed this tick, whether expired or retired.
    pub departed: Vec<AgentId>,
}

impl TickSummary {
    /// Number of scouts that ended the tick in `phase`.
    pub fn phase_count(&self, phase: ScoutPhase) -> u32 {
        self.phases.get(&phase).copied().unwrap_or(0)
    }
}

/// The mutable simulation state passed through the tick cycle.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// The world clock.
    pub clock: WorldClock,
    /// Region adjacency.
    pub world: RegionMap,
    /// Shared region intel.
    pub intel: IntelStore,
    /// Shared colony task queues.
    pub tasks: TaskQueue,
    /// Live scouts by id.
    pub scouts: BTreeMap<AgentId, ScoutAgent>,
    /// Base position per colony region.
    pub bases: BTreeMap<RegionName, Position>,
    /// Decision tunables.
    pub scout_config: ScoutConfig,
    /// Parameters for tasks scouts enqueue.
    pub task_config: TaskConfig,
}

impl SimulationState {
    /// Empty state over `world` at tick 0.
    pub const fn new(world: RegionMap, scout_config: ScoutConfig, task_config: TaskConfig) -> Self {
        Self {
            clock: WorldClock::new(),
            world,
            intel: IntelStore::new(),
            tasks: TaskQueue::new(),
            scouts: BTreeMap::new(),
            bases: BTreeMap::new(),
            scout_config,
            task_config,
        }
    }

    /// Add a fresh scout standing in `region`.
    pub fn spawn_scout(&mut self, region: RegionName, ticks_to_live: u32) -> AgentId {
        let scout = ScoutAgent::new(region, ticks_to_live);
        let id = scout.id;
        debug!(agent_id = %id, region = %scout.region, ticks_to_live, "Scout spawned");
        self.scouts.insert(id, scout);
        id
    }

    /// Capture the persisted part of the state.
    pub fn snapshot(&self) -> Snapshot<ScoutAgent> {
        Snapshot {
            tick: self.clock.tick(),
            intel: self.intel.clone(),
            tasks: self.tasks.clone(),
            agents: self.scouts.values().cloned().collect(),
        }
    }

    /// Replace the persisted part of the state with `snapshot`.
    pub fn restore(&mut self, snapshot: Snapshot<ScoutAgent>) {
        self.clock = WorldClock::from_tick(snapshot.tick);
        self.intel = snapshot.intel;
        self.tasks = snapshot.tasks;
        self.scouts = snapshot
            .agents
            .into_iter()
            .map(|scout| (scout.id, scout))
            .collect();
        info!(
            tick = self.clock.tick(),
            regions = self.intel.len(),
            tasks = self.tasks.len(),
            scouts = self.scouts.len(),
            "State restored from snapshot"
        );
    }
}

/// Give a departing scout's claimed task back to its colony queue.
fn release_claim(tasks: &mut TaskQueue, agent: &ScoutAgent) {
    let (Some(home), Some(task_id)) = (
        agent.memory.home_region.as_ref(),
        agent.memory.target.as_ref().and_then(|target| target.task_id),
    ) else {
        return;
    };
    if tasks.release(home, task_id, agent.id) {
        info!(agent_id = %agent.id, task_id = %task_id, "Released claim of departed scout");
    }
}

/// Execute a single tick of the simulation.
///
/// # Errors
///
/// Returns [`TickError::Clock`] if the tick counter would overflow.
pub fn run_tick(
    state: &mut SimulationState,
    services: &mut TickServices<'_>,
) -> Result<TickSummary, TickError> {
    let tick = state.clock.advance()?;
    let expired_tasks = state.tasks.age_all();

    let mut summary = TickSummary {
        tick,
        expired_tasks,
        ..TickSummary::default()
    };

    let ids: Vec<AgentId> = state.scouts.keys().copied().collect();
    for id in ids {
        let Some(agent) = state.scouts.get_mut(&id) else {
            continue;
        };

        let mut ctx = ScoutContext {
            tick,
            config: &state.scout_config,
            task_config: &state.task_config,
            graph: &state.world,
            intel: &mut state.intel,
            tasks: &mut state.tasks,
            observer: services.observer,
            terrain: &mut *services.terrain,
            bases: &state.bases,
        };
        let report = scout::run(agent, &mut ctx);

        for command in &report.commands {
            services.host.execute(&state.world, agent, command);
        }

        let count = summary.phases.entry(report.phase).or_insert(0);
        *count = count.saturating_add(1);
        let issued = u32::try_from(report.commands.len()).unwrap_or(u32::MAX);
        summary.commands_issued = summary.commands_issued.saturating_add(issued);
        if let Some(region) = report.recorded {
            summary.recorded.push(region);
        }

        agent.ticks_to_live = agent.ticks_to_live.saturating_sub(1);
        if report.phase == ScoutPhase::Retiring || agent.ticks_to_live == 0 {
            summary.departed.push(id);
        }
    }

    for id in &summary.departed {
        if let Some(agent) = state.scouts.remove(id) {
            release_claim(&mut state.tasks, &agent);
            debug!(
                agent_id = %id,
                region = %agent.region,
                retired = agent.memory.retiring,
                "Scout removed"
            );
        }
    }

    summary.scouts_alive = u32::try_from(state.scouts.len()).unwrap_or(u32::MAX);

    debug!(
        tick,
        scouts_alive = summary.scouts_alive,
        recorded = summary.recorded.len(),
        commands = summary.commands_issued,
        expired_tasks,
        "Tick complete"
    );
    Ok(summary)
}
