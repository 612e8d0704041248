//! Seeding the simulation with scouts and scouting tasks.
//!
//! At startup the spawner registers the colony base, puts the configured
//! number of scouts in the colony region, and queues a `SCOUT_ROOM` task for
//! every region listed under `world.seed_tasks`. Restored state is topped
//! up, not replaced: scouts from a snapshot keep running and regions that
//! already have a queued scouting task are not queued twice.

use recon_core::config::WorldConfig;
use recon_core::tick::SimulationState;
use recon_intel::NewTask;
use recon_types::{AgentId, Position, RegionName, TaskId, TaskKind};
use tracing::{info, warn};

use crate::error::EngineError;

/// The output of the spawner.
#[derive(Debug, Default)]
pub struct SpawnResult {
    /// Newly spawned scouts.
    pub scouts: Vec<AgentId>,
    /// Newly queued seed tasks.
    pub tasks: Vec<TaskId>,
}

/// Register the colony base and spawn scouts and seed tasks.
///
/// # Errors
///
/// Returns [`EngineError::Spawner`] if the colony region is not part of the
/// world.
pub fn seed(config: &WorldConfig, state: &mut SimulationState) -> Result<SpawnResult, EngineError> {
    let colony = RegionName::from(config.colony.as_str());
    if !state.world.contains(&colony) {
        return Err(EngineError::Spawner {
            message: format!("colony region {colony} is not part of the world"),
        });
    }

    let base = Position::new(colony.clone(), config.base_x, config.base_y);
    info!(base = %base, "Colony base registered");
    state.bases.insert(colony.clone(), base);

    let alive = u32::try_from(state.scouts.len()).unwrap_or(u32::MAX);
    let scouts = (0..config.scout_count.saturating_sub(alive))
        .map(|_| state.spawn_scout(colony.clone(), config.scout_lifetime))
        .collect();

    let mut tasks = Vec::new();
    for name in &config.seed_tasks {
        let region = RegionName::from(name.as_str());
        if !state.world.contains(&region) {
            warn!(region = %region, "Seed task region is not part of the world, skipping");
            continue;
        }
        let already_queued = state
            .tasks
            .list(&colony)
            .iter()
            .any(|task| task.kind == TaskKind::ScoutRoom && task.region == region);
        if already_queued {
            continue;
        }
        tasks.push(
            state
                .tasks
                .add(&colony, NewTask::new(TaskKind::ScoutRoom, region)),
        );
    }

    Ok(SpawnResult { scouts, tasks })
}
