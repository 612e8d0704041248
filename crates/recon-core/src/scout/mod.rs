//! The scout decision procedure.
//!
//! [`run`] is invoked once per tick for every live scout. A call never spans
//! ticks: everything a scout carries from one tick to the next lives in its
//! [`ScoutMemory`] and in the shared intel store. The call is infallible and
//! always ends in one of four phases:
//!
//! - **Idle** -- nothing worth doing; waits out the idle window, walking
//!   back to base when one is known.
//! - **Traveling** -- has a target in another region and asks the host to
//!   move it there.
//! - **Recording** -- stands in its target region, writes intel, and picks
//!   the next target straight away.
//! - **Retiring** -- about to expire with a target it cannot finish; hands
//!   the work back to the queue and stops.
//!
//! Side effects on the world outside the shared stores (movement, rescans)
//! are returned as [`ScoutCommand`]s for the host to carry out.

pub mod policy;
pub mod recording;
pub mod services;

use std::collections::BTreeMap;

use recon_intel::{IntelStore, NewTask, TaskQueue, record_failure};
use recon_types::{AgentId, Position, RegionName, ScoutPhase, TargetSource, TaskId, TaskKind, Tick};
use recon_world::RegionGraph;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{ScoutConfig, TaskConfig};
use services::{RegionObserver, TerrainCapture};

/// Emit a `debug!` decision trace when the scout config asks for one.
macro_rules! decision_trace {
    ($ctx:expr, $($arg:tt)+) => {
        if $ctx.config.debug_trace {
            tracing::debug!($($arg)+);
        }
    };
}
pub(crate) use decision_trace;

/// A region a scout has committed to visiting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// The region to record.
    pub region: RegionName,
    /// Which selection tier produced the target.
    pub source: TargetSource,
    /// Where to travel inside the region.
    pub pos: Position,
    /// The claimed task, for task-sourced targets.
    pub task_id: Option<TaskId>,
}

/// Per-scout state persisted between ticks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutMemory {
    /// Colony region; set once on the first run.
    pub home_region: Option<RegionName>,
    /// Current target, if any.
    pub target: Option<Target>,
    /// Recently recorded regions, most recent last.
    pub recent_targets: Vec<RegionName>,
    /// Waiting out the idle window.
    pub idle: bool,
    /// First tick at which the idle window is over.
    pub idle_until: Tick,
    /// Gave up its target this lifetime and is waiting to be removed.
    pub retiring: bool,
}

/// A scout as the host tracks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoutAgent {
    /// Unique agent id.
    pub id: AgentId,
    /// Region the scout currently stands in.
    pub region: RegionName,
    /// Remaining lifetime in ticks.
    pub ticks_to_live: u32,
    /// Persisted decision state.
    #[serde(default)]
    pub memory: ScoutMemory,
}

impl ScoutAgent {
    /// A freshly spawned scout with empty memory.
    pub fn new(region: RegionName, ticks_to_live: u32) -> Self {
        Self {
            id: AgentId::new(),
            region,
            ticks_to_live,
            memory: ScoutMemory::default(),
        }
    }
}

/// A side effect the host must carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoutCommand {
    /// Move the scout toward `destination`.
    Travel {
        /// Where to go.
        destination: Position,
        /// Stop once within this many tiles.
        range: u8,
        /// Path through other agents.
        ignore_agents: bool,
    },
    /// Hostiles were seen; the region should be looked at again soon.
    RequestRescan {
        /// The region with hostiles.
        region: RegionName,
    },
}

/// The outcome of one [`run`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoutReport {
    /// The phase the scout ended the tick in.
    pub phase: ScoutPhase,
    /// The region recorded this tick, if any.
    pub recorded: Option<RegionName>,
    /// Side effects for the host.
    pub commands: Vec<ScoutCommand>,
}

impl ScoutReport {
    const fn new(phase: ScoutPhase) -> Self {
        Self {
            phase,
            recorded: None,
            commands: Vec::new(),
        }
    }
}

/// Everything a scout reads or writes besides its own state.
pub struct ScoutContext<'a> {
    /// The current tick.
    pub tick: Tick,
    /// Decision tunables.
    pub config: &'a ScoutConfig,
    /// Parameters for tasks scouts enqueue.
    pub task_config: &'a TaskConfig,
    /// Region adjacency.
    pub graph: &'a dyn RegionGraph,
    /// Shared region intel.
    pub intel: &'a mut IntelStore,
    /// Shared colony task queues.
    pub tasks: &'a mut TaskQueue,
    /// Region survey service.
    pub observer: &'a dyn RegionObserver,
    /// Terrain cache service.
    pub terrain: &'a mut dyn TerrainCapture,
    /// Base position per colony region.
    pub bases: &'a BTreeMap<RegionName, Position>,
}

/// Run one tick of the scout state machine.
pub fn run(agent: &mut ScoutAgent, ctx: &mut ScoutContext<'_>) -> ScoutReport {
    let home = agent
        .memory
        .home_region
        .get_or_insert_with(|| agent.region.clone())
        .clone();

    if agent.memory.retiring {
        return ScoutReport::new(ScoutPhase::Retiring);
    }

    if agent.memory.idle && ctx.tick >= agent.memory.idle_until {
        agent.memory.idle = false;
        agent.memory.idle_until = 0;
        decision_trace!(ctx, agent_id = %agent.id, tick = ctx.tick, "Idle window over");
    }

    if agent.memory.idle {
        let mut report = ScoutReport::new(ScoutPhase::Idle);
        head_home(agent, ctx, &home, &mut report);
        return report;
    }

    if should_retire(agent, ctx.config) {
        retire(agent, ctx, &home);
        return ScoutReport::new(ScoutPhase::Retiring);
    }

    let target = if let Some(target) = agent.memory.target.clone() {
        target
    } else if let Some(target) = policy::select_target(agent, ctx, &home) {
        agent.memory.target = Some(target.clone());
        target
    } else {
        return go_idle(agent, ctx, &home, ScoutReport::new(ScoutPhase::Idle));
    };

    if agent.region != target.region {
        let mut report = ScoutReport::new(ScoutPhase::Traveling);
        report.commands.push(travel_to(ctx.config, &target));
        return report;
    }

    let mut report = ScoutReport::new(ScoutPhase::Recording);
    recording::record_intel(agent, ctx, &home, &mut report);

    match policy::select_target(agent, ctx, &home) {
        Some(next) if next.region != agent.region => {
            decision_trace!(
                ctx,
                agent_id = %agent.id,
                next = %next.region,
                source = %next.source,
                "Chained to next target"
            );
            report.commands.push(travel_to(ctx.config, &next));
            agent.memory.target = Some(next);
            report
        }
        Some(next) => {
            // An idle scout holds no claim.
            let claimed = next.task_id;
            if let Some(task_id) = claimed {
                ctx.tasks.release(&home, task_id, agent.id);
            }
            agent.memory.target = claimed.is_none().then_some(next);
            go_idle(agent, ctx, &home, report)
        }
        None => go_idle(agent, ctx, &home, report),
    }
}

fn should_retire(agent: &ScoutAgent, config: &ScoutConfig) -> bool {
    agent.ticks_to_live < config.retirement_ticks
        && agent
            .memory
            .target
            .as_ref()
            .is_some_and(|target| target.source != TargetSource::Memory)
}

/// Give the current target back: log a failure, drop the consumed claim,
/// and requeue the region unless it just went into cooldown.
fn retire(agent: &mut ScoutAgent, ctx: &mut ScoutContext<'_>, home: &RegionName) {
    let Some(target) = agent.memory.target.take() else {
        return;
    };

    let policy = ctx.config.backoff_policy();
    let cooled = record_failure(ctx.intel.get_mut(&target.region), ctx.tick, &policy);

    if let Some(task_id) = target.task_id {
        ctx.tasks.remove(home, task_id);
    }

    if !cooled {
        let template = ctx.task_config.requeue;
        ctx.tasks.add(
            home,
            NewTask::new(TaskKind::ScoutRoom, target.region.clone())
                .with_priority(template.priority)
                .with_ttl(template.ttl)
                .with_amount(template.amount)
                .with_owner(agent.id),
        );
    }

    agent.memory.retiring = true;
    agent.memory.idle = false;

    info!(
        agent_id = %agent.id,
        region = %target.region,
        source = %target.source,
        ticks_to_live = agent.ticks_to_live,
        cooled,
        "Scout retiring before reaching target"
    );
}

fn go_idle(
    agent: &mut ScoutAgent,
    ctx: &ScoutContext<'_>,
    home: &RegionName,
    mut report: ScoutReport,
) -> ScoutReport {
    agent.memory.idle = true;
    agent.memory.idle_until = ctx.tick.saturating_add(ctx.config.idle_window);
    decision_trace!(
        ctx,
        agent_id = %agent.id,
        idle_until = agent.memory.idle_until,
        "Nothing to scout, going idle"
    );
    head_home(agent, ctx, home, &mut report);
    report
}

fn head_home(
    agent: &ScoutAgent,
    ctx: &ScoutContext<'_>,
    home: &RegionName,
    report: &mut ScoutReport,
) {
    let Some(base) = ctx.bases.get(home) else {
        return;
    };
    decision_trace!(ctx, agent_id = %agent.id, base = %base, "Heading to base");
    report.commands.push(ScoutCommand::Travel {
        destination: base.clone(),
        range: ctx.config.home_range,
        ignore_agents: false,
    });
}

fn travel_to(config: &ScoutConfig, target: &Target) -> ScoutCommand {
    ScoutCommand::Travel {
        destination: target.pos.clone(),
        range: config.travel_range,
        ignore_agents: true,
    }
}
