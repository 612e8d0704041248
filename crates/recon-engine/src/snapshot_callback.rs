//! Tick callback that persists the shared stores.
//!
//! Every `snapshot_interval` ticks the callback writes the intel store, the
//! task queues, and the live scouts to the snapshot file. A failed write is
//! logged and the simulation carries on; the next interval tries again.

use recon_core::runner::TickCallback;
use recon_core::tick::{SimulationState, TickSummary};
use recon_intel::SnapshotFile;
use recon_types::ScoutPhase;
use tracing::{info, warn};

/// Ticks between progress log lines.
const PROGRESS_INTERVAL: u64 = 100;

/// Periodic snapshot writer and progress logger.
pub struct SnapshotCallback {
    file: Option<SnapshotFile>,
    interval: u64,
    saves: u64,
}

impl SnapshotCallback {
    /// Write to `file` every `interval` ticks. `None` or an interval of 0
    /// disables periodic writes.
    pub const fn new(file: Option<SnapshotFile>, interval: u64) -> Self {
        Self {
            file,
            interval,
            saves: 0,
        }
    }

    /// Number of snapshots written so far.
    pub const fn saves(&self) -> u64 {
        self.saves
    }

    fn save_due(&self, tick: u64) -> bool {
        self.interval > 0 && tick.checked_rem(self.interval) == Some(0)
    }
}

impl TickCallback for SnapshotCallback {
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState) {
        if summary.tick.checked_rem(PROGRESS_INTERVAL) == Some(0) {
            info!(
                tick = summary.tick,
                scouts_alive = summary.scouts_alive,
                traveling = summary.phase_count(ScoutPhase::Traveling),
                idle = summary.phase_count(ScoutPhase::Idle),
                regions_scouted = state.intel.scouted_count(),
                tasks_queued = state.tasks.len(),
                "Progress"
            );
        }

        if !self.save_due(summary.tick) {
            return;
        }
        let Some(file) = &self.file else {
            return;
        };
        match file.save(&state.snapshot()) {
            Ok(()) => self.saves = self.saves.saturating_add(1),
            Err(e) => warn!(
                tick = summary.tick,
                path = %file.path().display(),
                error = %e,
                "Snapshot write failed"
            ),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use recon_core::config::{ScoutConfig, TaskConfig};
    use recon_intel::Snapshot;
    use recon_world::create_grid_world;

    use super::*;

    fn state_at(tick: u64) -> SimulationState {
        let mut state = SimulationState::new(
            create_grid_world(1).unwrap(),
            ScoutConfig::default(),
            TaskConfig::default(),
        );
        state.clock = recon_core::clock::WorldClock::from_tick(tick);
        state.spawn_scout("E0S0".into(), 100);
        state
    }

    fn summary_at(tick: u64) -> TickSummary {
        TickSummary {
            tick,
            scouts_alive: 1,
            ..TickSummary::default()
        }
    }

    #[test]
    fn writes_on_interval_ticks_only() {
        let path = std::env::temp_dir().join(format!("recon-callback-{}.json", std::process::id()));
        let mut callback = SnapshotCallback::new(Some(SnapshotFile::new(&path)), 10);

        for tick in 1..=25 {
            callback.on_tick(&summary_at(tick), &state_at(tick));
        }

        assert_eq!(callback.saves(), 2);
        let snapshot: Snapshot<recon_core::scout::ScoutAgent> = SnapshotFile::new(&path).load();
        assert_eq!(snapshot.tick, 20);
        assert_eq!(snapshot.agents.len(), 1);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn zero_interval_never_writes() {
        let path = std::env::temp_dir().join("recon-callback-never.json");
        let mut callback = SnapshotCallback::new(Some(SnapshotFile::new(&path)), 0);
        callback.on_tick(&summary_at(100), &state_at(100));
        assert_eq!(callback.saves(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_path_is_logged_not_fatal() {
        let path = std::env::temp_dir()
            .join("recon-missing-dir")
            .join("nested")
            .join("snapshot.json");
        let mut callback = SnapshotCallback::new(Some(SnapshotFile::new(path)), 1);
        callback.on_tick(&summary_at(1), &state_at(1));
        assert_eq!(callback.saves(), 0);
    }
}
