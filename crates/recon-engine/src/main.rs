//! Engine binary for the Recon scouting system.
//!
//! Wires the scout tick cycle to a synthetic grid world and runs it until
//! the tick budget is spent, every scout has expired, or the process is
//! interrupted.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `recon-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create the grid world
//! 4. Restore the last snapshot, if persistence is enabled
//! 5. Register the colony base and top up scouts and seed tasks
//! 6. Run the simulation loop, stopping on Ctrl-C
//! 7. Log the result and write a final snapshot

mod error;
mod services;
mod snapshot_callback;
mod spawner;

use std::path::Path;
use std::sync::Arc;

use recon_core::config::ReconConfig;
use recon_core::control::RunControl;
use recon_core::runner;
use recon_core::scout::ScoutAgent;
use recon_core::tick::{SimulationState, TickServices};
use recon_intel::{Snapshot, SnapshotFile};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::services::{CachedTerrain, HopMover, SyntheticObserver};
use crate::snapshot_callback::SnapshotCallback;

const CONFIG_PATH: &str = "recon-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself fails.
#[tokio::main]
#[allow(clippy::too_many_lines)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so remember whether
    //    the defaults were used and report it afterwards.
    let config_path = Path::new(CONFIG_PATH);
    let from_file = config_path.exists();
    let config = if from_file {
        ReconConfig::from_file(config_path).map_err(EngineError::from)?
    } else {
        ReconConfig::default()
    };

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("recon-engine starting");
    if !from_file {
        info!("Config file not found, using defaults");
    }
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        grid_radius = config.world.grid_radius,
        colony = config.world.colony,
        tick_interval_ms = config.world.tick_interval_ms,
        auto_scout = config.scout.enable_auto_scout,
        "Configuration loaded"
    );

    // 3. Create the grid world.
    let world =
        recon_world::create_grid_world(config.world.grid_radius).map_err(EngineError::from)?;
    info!(region_count = world.region_count(), "Grid world created");

    let mut state = SimulationState::new(world, config.scout.clone(), config.tasks.clone());

    // 4. Restore persisted state.
    let snapshot_file = config
        .persistence
        .enabled
        .then(|| SnapshotFile::new(&config.persistence.snapshot_path));
    if let Some(file) = &snapshot_file {
        let snapshot: Snapshot<ScoutAgent> = file.load();
        if snapshot == Snapshot::default() {
            info!(path = %file.path().display(), "No prior snapshot, starting fresh");
        } else {
            state.restore(snapshot);
        }
    }

    // 5. Seed scouts and tasks.
    let spawn_result = spawner::seed(&config.world, &mut state)?;
    info!(
        scouts_spawned = spawn_result.scouts.len(),
        scouts_alive = state.scouts.len(),
        tasks_seeded = spawn_result.tasks.len(),
        "Seeding complete"
    );

    // 6. Run control, with Ctrl-C mapped to a stop request.
    let control = Arc::new(RunControl::new(
        config.world.tick_interval_ms,
        &config.simulation,
    ));
    {
        let control = Arc::clone(&control);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Interrupt received, stopping after the current tick");
                    control.request_stop();
                }
                Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
            }
        });
    }

    let observer = SyntheticObserver::new(config.world.seed);
    let mut terrain = CachedTerrain::new();
    let mut host = HopMover::new();
    let mut services = TickServices {
        observer: &observer,
        terrain: &mut terrain,
        host: &mut host,
    };
    let mut callback =
        SnapshotCallback::new(snapshot_file.clone(), config.persistence.snapshot_interval);

    let result = runner::run_simulation(&mut state, &mut services, &control, &mut callback)
        .await
        .map_err(EngineError::from)?;

    // 7. Log results and persist.
    runner::log_simulation_end(&result, &state);
    info!(
        terrain_captures = terrain.refreshes(),
        terrain_cached = terrain.cached_regions(),
        hops = host.moves(),
        rescans_requested = host.rescans().len(),
        snapshots_written = callback.saves(),
        "Host services summary"
    );

    if let Some(file) = &snapshot_file {
        file.save(&state.snapshot()).map_err(EngineError::from)?;
        info!(path = %file.path().display(), tick = state.clock.tick(), "Final snapshot written");
    }

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "recon-engine shutdown complete"
    );

    Ok(())
}
