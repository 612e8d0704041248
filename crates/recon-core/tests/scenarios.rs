//! End-to-end scout scenarios against in-memory stores.
//!
//! Each test drives [`scout::run`] directly, one call per tick, and checks
//! the shared stores and the scout's memory afterwards.

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::missing_panics_doc,
    clippy::too_many_lines
)]

use std::collections::BTreeMap;

use recon_core::config::{ScoutConfig, TaskConfig};
use recon_core::scout::services::{
    CaptureOptions, HostileSighting, RegionObserver, RegionSurvey, TerrainCapture,
    TerrainSnapshot,
};
use recon_core::scout::{self, ScoutAgent, ScoutCommand, ScoutContext, Target};
use recon_core::tick::{ScoutHost, SimulationState, TickServices, run_tick};
use recon_intel::{IntelStore, NewTask, TaskQueue};
use recon_types::{Position, RegionName, ScoutPhase, TargetSource, TaskKind, Tick};
use recon_world::{RegionMap, create_grid_world};

/// Sees one hostile in `W1N0` and nothing else anywhere.
struct Observer;

impl RegionObserver for Observer {
    fn survey(&self, region: &RegionName) -> Option<RegionSurvey> {
        let hostiles = if region.as_str() == "W1N0" {
            vec![HostileSighting {
                owner: "Invader".to_owned(),
            }]
        } else {
            Vec::new()
        };
        Some(RegionSurvey {
            source_count: 1,
            hostiles,
            ..RegionSurvey::default()
        })
    }
}

#[derive(Default)]
struct Terrain {
    captures: u32,
}

impl TerrainCapture for Terrain {
    fn capture(&mut self, region: &RegionName, _options: CaptureOptions) -> TerrainSnapshot {
        self.captures = self.captures.saturating_add(1);
        TerrainSnapshot {
            region: region.clone(),
            encoded: Vec::new(),
        }
    }
}

/// A 4x4 grid around the origin with the colony at `E0S0`.
struct World {
    config: ScoutConfig,
    task_config: TaskConfig,
    graph: RegionMap,
    intel: IntelStore,
    tasks: TaskQueue,
    terrain: Terrain,
    bases: BTreeMap<RegionName, Position>,
}

impl World {
    fn new() -> Self {
        Self {
            config: ScoutConfig::default(),
            task_config: TaskConfig::default(),
            graph: create_grid_world(2).unwrap(),
            intel: IntelStore::new(),
            tasks: TaskQueue::new(),
            terrain: Terrain::default(),
            bases: BTreeMap::new(),
        }
    }

    fn ctx(&mut self, tick: Tick) -> ScoutContext<'_> {
        ScoutContext {
            tick,
            config: &self.config,
            task_config: &self.task_config,
            graph: &self.graph,
            intel: &mut self.intel,
            tasks: &mut self.tasks,
            observer: &Observer,
            terrain: &mut self.terrain,
            bases: &self.bases,
        }
    }

    /// Run one scout for one tick, moving it if it asked to travel.
    fn step(&mut self, scout: &mut ScoutAgent, tick: Tick) -> scout::ScoutReport {
        let report = scout::run(scout, &mut self.ctx(tick));
        for command in &report.commands {
            if let ScoutCommand::Travel { destination, .. } = command {
                scout.region = destination.region.clone();
            }
        }
        report
    }
}

fn home() -> RegionName {
    RegionName::from("E0S0")
}

fn scout_at_home(ticks_to_live: u32) -> ScoutAgent {
    ScoutAgent::new(home(), ticks_to_live)
}

#[test]
fn claimed_task_is_recorded_and_replaced_by_follow_up() {
    let mut world = World::new();
    let region = RegionName::from("E1S1");
    let task_id = world
        .tasks
        .add(&home(), NewTask::new(TaskKind::ScoutRoom, region.clone()));
    let mut scout = scout_at_home(1000);

    let report = world.step(&mut scout, 10);
    assert_eq!(report.phase, ScoutPhase::Traveling);
    let target = scout.memory.target.clone().unwrap();
    assert_eq!(target.source, TargetSource::Task);
    assert_eq!(target.task_id, Some(task_id));
    assert_eq!(scout.region, region);

    let report = world.step(&mut scout, 11);
    assert_eq!(report.phase, ScoutPhase::Recording);

    let record = world.intel.get(&region).unwrap();
    assert!(record.scouted);
    assert_eq!(record.last_scouted, Some(11));
    assert_eq!(record.source_count, 1);

    let queued = world.tasks.list(&home());
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].kind, TaskKind::RemoteScoreRoom);
    assert_eq!(queued[0].region, region);
    assert!(queued.iter().all(|task| task.id != task_id));
    assert_eq!(world.terrain.captures, 1);
}

#[test]
fn dying_scout_requeues_its_task() {
    let mut world = World::new();
    let region = RegionName::from("W1N1");
    world
        .tasks
        .add(&home(), NewTask::new(TaskKind::ScoutRoom, region.clone()));
    let mut scout = scout_at_home(1000);
    world.step(&mut scout, 1);
    scout.region = home();
    scout.ticks_to_live = 30;

    let report = world.step(&mut scout, 2);

    assert_eq!(report.phase, ScoutPhase::Retiring);
    assert_eq!(world.intel.get(&region).unwrap().scout_fail_log.len(), 1);
    let queued = world.tasks.list(&home());
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].kind, TaskKind::ScoutRoom);
    assert_eq!(queued[0].region, region);
    assert!(queued[0].claim.is_none());
    assert!(scout.memory.retiring);
    assert!(scout.memory.target.is_none());
}

#[test]
fn three_dying_scouts_cool_the_region_down() {
    let mut world = World::new();
    let region = RegionName::from("W1N1");
    world
        .tasks
        .add(&home(), NewTask::new(TaskKind::ScoutRoom, region.clone()));

    let mut now: Tick = 100;
    for attempt in 0..3 {
        let mut scout = scout_at_home(40);
        let report = world.step(&mut scout, now);
        assert_eq!(report.phase, ScoutPhase::Traveling, "attempt {attempt}");
        now = now.saturating_add(100);
        let report = world.step(&mut scout, now);
        assert_eq!(report.phase, ScoutPhase::Retiring, "attempt {attempt}");
        now = now.saturating_add(100);
    }

    let record = world.intel.get(&region).unwrap();
    let last_failure = now.saturating_sub(100);
    assert!(record.scout_cooldown_until.unwrap() > last_failure);
    assert_eq!(record.scout_cooldown_until, Some(last_failure.saturating_add(1000)));
    assert!(record.scout_fail_log.is_empty());
    // The third failure cooled the region, so nothing was requeued.
    assert!(world.tasks.is_empty());
}

#[test]
fn nothing_to_do_walks_home() {
    let mut world = World::new();
    let base = Position::new(home(), 12, 40);
    world.bases.insert(home(), base.clone());
    world.intel.get_mut(&"E1S0".into()).scouted = true;
    world.intel.get_mut(&"E1S0".into()).last_scouted = Some(90);
    let mut scout = ScoutAgent::new("E1S1".into(), 1000);
    scout.memory.home_region = Some(home());

    let report = world.step(&mut scout, 100);

    assert_eq!(report.phase, ScoutPhase::Idle);
    assert!(scout.memory.idle);
    assert_eq!(scout.memory.idle_until, 105);
    assert_eq!(
        report.commands,
        vec![ScoutCommand::Travel {
            destination: base,
            range: 3,
            ignore_agents: false,
        }]
    );
}

#[test]
fn recording_chains_to_next_memory_target() {
    let mut world = World::new();
    let here = RegionName::from("E1S0");
    let next = RegionName::from("W1N0");
    world.intel.get_mut(&here).scout_fail_log = vec![50, 60];
    world.intel.get_mut(&next);
    let mut scout = ScoutAgent::new(here.clone(), 1000);
    scout.memory.home_region = Some(home());
    scout.memory.target = Some(Target {
        region: here.clone(),
        source: TargetSource::Memory,
        pos: Position::center_of(here.clone(), 25),
        task_id: None,
    });

    let report = scout::run(&mut scout, &mut world.ctx(100));

    assert_eq!(report.phase, ScoutPhase::Recording);
    assert_eq!(report.recorded, Some(here.clone()));
    assert!(world.intel.get(&here).unwrap().scout_fail_log.is_empty());
    let chained = scout.memory.target.clone().unwrap();
    assert_eq!(chained.region, next);
    assert_eq!(chained.source, TargetSource::Memory);
    assert!(!scout.memory.idle);
    assert_eq!(
        report.commands,
        vec![ScoutCommand::Travel {
            destination: Position::center_of(next, 25),
            range: 20,
            ignore_agents: true,
        }]
    );
}

#[test]
fn hostile_region_requests_rescan() {
    let mut world = World::new();
    let region = RegionName::from("W1N0");
    world.intel.get_mut(&region);
    let mut scout = ScoutAgent::new(region.clone(), 1000);

    let report = scout::run(&mut scout, &mut world.ctx(5));

    assert_eq!(report.phase, ScoutPhase::Recording);
    assert!(
        report
            .commands
            .contains(&ScoutCommand::RequestRescan { region: region.clone() })
    );
    let record = world.intel.get(&region).unwrap();
    assert_eq!(record.hostiles.count, 1);
    assert!(record.hostiles.owners.contains("Invader"));
}

#[test]
fn same_tick_scouts_never_share_a_task() {
    let mut world = World::new();
    for name in ["E1S0", "W1S0"] {
        world
            .tasks
            .add(&home(), NewTask::new(TaskKind::ScoutRoom, name.into()));
    }
    let mut scouts: Vec<ScoutAgent> = (0..3).map(|_| scout_at_home(1000)).collect();

    for scout in &mut scouts {
        scout::run(scout, &mut world.ctx(1));
    }

    let task_targets: Vec<RegionName> = scouts
        .iter()
        .filter_map(|scout| scout.memory.target.as_ref())
        .filter(|target| target.source == TargetSource::Task)
        .map(|target| target.region.clone())
        .collect();
    assert_eq!(task_targets.len(), 2);
    assert_ne!(task_targets[0], task_targets[1]);
    assert!(scouts[2].memory.target.is_none());

    let owners: Vec<_> = world
        .tasks
        .list(&home())
        .iter()
        .filter_map(|task| task.claim.as_ref().map(|claim| claim.owner))
        .collect();
    assert_eq!(owners.len(), 2);
    assert_ne!(owners[0], owners[1]);
}

#[test]
fn recent_targets_stay_capped_over_many_recordings() {
    let mut world = World::new();
    let regions: Vec<RegionName> = world.graph.regions().cloned().collect();
    let mut scout = scout_at_home(100_000);

    for (i, region) in regions.iter().cycle().take(40).enumerate() {
        scout.region = region.clone();
        scout.memory.idle = false;
        scout.memory.target = Some(Target {
            region: region.clone(),
            source: TargetSource::Memory,
            pos: Position::center_of(region.clone(), 25),
            task_id: None,
        });
        let tick = Tick::try_from(i).unwrap().saturating_mul(10);
        scout::run(&mut scout, &mut world.ctx(tick));
        assert!(scout.memory.recent_targets.len() <= 12);
    }
    assert_eq!(scout.memory.recent_targets.len(), 12);
}

/// Moves scouts straight into the destination region.
struct Teleport;

impl ScoutHost for Teleport {
    fn execute(&mut self, _world: &RegionMap, scout: &mut ScoutAgent, command: &ScoutCommand) {
        if let ScoutCommand::Travel { destination, .. } = command {
            scout.region = destination.region.clone();
        }
    }
}

#[test]
fn scout_expiring_while_idle_leaves_no_stranded_claim() {
    let mut state = SimulationState::new(
        create_grid_world(2).unwrap(),
        ScoutConfig::default(),
        TaskConfig::default(),
    );
    for _ in 0..2 {
        state
            .tasks
            .add(&home(), NewTask::new(TaskKind::ScoutRoom, home()));
    }
    state.spawn_scout(home(), 3);
    let mut terrain = Terrain::default();
    let mut host = Teleport;
    let mut services = TickServices {
        observer: &Observer,
        terrain: &mut terrain,
        host: &mut host,
    };

    let phases: Vec<ScoutPhase> = (0..3)
        .map(|_| {
            let summary = run_tick(&mut state, &mut services).unwrap();
            *summary.phases.keys().next().unwrap()
        })
        .collect();
    assert_eq!(
        phases,
        vec![ScoutPhase::Recording, ScoutPhase::Idle, ScoutPhase::Idle]
    );
    assert!(state.scouts.is_empty());

    let scout_tasks: Vec<_> = state
        .tasks
        .list(&home())
        .iter()
        .filter(|task| task.kind == TaskKind::ScoutRoom)
        .collect();
    assert_eq!(scout_tasks.len(), 1);
    assert!(scout_tasks[0].claim.is_none());

    state.spawn_scout(home(), 100);
    let summary = run_tick(&mut state, &mut services).unwrap();

    assert_eq!(summary.recorded, vec![home()]);
    assert_eq!(state.intel.get(&home()).unwrap().last_scouted, Some(4));
    assert!(
        state
            .tasks
            .list(&home())
            .iter()
            .all(|task| task.kind != TaskKind::ScoutRoom)
    );
}
