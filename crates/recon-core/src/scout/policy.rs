//! Target selection.
//!
//! Three tiers are tried in [`TargetSource::PRIORITY`] order and the first
//! one that yields a target wins:
//!
//! 1. **Task** -- the nearest claimable `SCOUT_ROOM` task on the home
//!    colony's queue, claimed on the spot.
//! 2. **Memory** -- the first known region, in top-left order, that is due
//!    for a visit.
//! 3. **Auto** -- the stalest region within the frontier depth of home.
//!    Disabled unless `enable_auto_scout` is set.
//!
//! Memory and auto selection skip regions the scout recorded recently and
//! regions cooling down after repeated failures. Task claims skip neither.

use std::collections::BTreeMap;

use recon_intel::{ClaimRequest, is_cooling_down, needs_scouting, staleness};
use recon_types::{Position, RegionName, TargetSource, TaskKind, Tick};
use recon_world::{gather_nearby, linear_distance, top_left_key};

use super::{ScoutAgent, ScoutContext, Target, decision_trace};

/// Pick the next target, or `None` if no tier has one.
pub fn select_target(
    agent: &ScoutAgent,
    ctx: &mut ScoutContext<'_>,
    home: &RegionName,
) -> Option<Target> {
    let target = TargetSource::PRIORITY
        .into_iter()
        .find_map(|source| match source {
            TargetSource::Task => from_tasks(agent, ctx, home),
            TargetSource::Memory => from_memory(agent, ctx),
            TargetSource::Auto => from_frontier(agent, ctx, home),
        });

    if let Some(target) = &target {
        decision_trace!(
            ctx,
            agent_id = %agent.id,
            region = %target.region,
            source = %target.source,
            tick = ctx.tick,
            "Target selected"
        );
    }
    target
}

/// The last `window` entries of the recent-target history.
pub fn recent_window(recent: &[RegionName], window: usize) -> &[RegionName] {
    let start = recent.len().saturating_sub(window);
    recent.get(start..).unwrap_or_default()
}

fn from_tasks(agent: &ScoutAgent, ctx: &mut ScoutContext<'_>, home: &RegionName) -> Option<Target> {
    let (task_id, _) = ctx
        .tasks
        .list(home)
        .iter()
        .filter(|task| task.kind == TaskKind::ScoutRoom && task.is_claimable(ctx.tick))
        .map(|task| {
            let distance = linear_distance(task.region.as_str(), agent.region.as_str())
                .unwrap_or(u32::MAX);
            (task.id, distance)
        })
        .fold(None, |best: Option<(_, u32)>, candidate| match best {
            Some((_, best_distance)) if best_distance <= candidate.1 => best,
            _ => Some(candidate),
        })?;

    let request = ClaimRequest {
        level: 0,
        colony: home.clone(),
        kind: TaskKind::ScoutRoom,
        owner: agent.id,
        cooldown: ctx.config.task_claim_cooldown,
        task_id: Some(task_id),
        meta: BTreeMap::new(),
    };
    let Some(task) = ctx.tasks.claim(&request, ctx.tick) else {
        decision_trace!(ctx, agent_id = %agent.id, task_id = %task_id, "Task claim failed");
        return None;
    };

    Some(Target {
        pos: Position::center_of(task.region.clone(), ctx.config.region_center_coordinate),
        region: task.region,
        source: TargetSource::Task,
        task_id: Some(task.id),
    })
}

fn from_memory(agent: &ScoutAgent, ctx: &ScoutContext<'_>) -> Option<Target> {
    let recent = recent_window(
        &agent.memory.recent_targets,
        ctx.config.recent_targets_exclusion_window,
    );

    let mut regions = ctx.intel.keys();
    regions.sort_by(|a, b| top_left_key(a.as_str()).cmp(&top_left_key(b.as_str())));

    let region = regions.into_iter().find(|region| {
        !recent.contains(region)
            && ctx
                .intel
                .get(region)
                .is_some_and(|record| needs_scouting(record, ctx.tick, ctx.config.revisit_threshold))
    })?;

    Some(Target {
        pos: Position::center_of(region.clone(), ctx.config.region_center_coordinate),
        region,
        source: TargetSource::Memory,
        task_id: None,
    })
}

fn from_frontier(
    agent: &ScoutAgent,
    ctx: &mut ScoutContext<'_>,
    home: &RegionName,
) -> Option<Target> {
    if !ctx.config.enable_auto_scout {
        return None;
    }

    let recent = recent_window(
        &agent.memory.recent_targets,
        ctx.config.recent_targets_exclusion_window,
    );
    let candidates = gather_nearby(ctx.graph, home, ctx.config.max_frontier_depth);

    let mut best: Option<(RegionName, Tick, u32)> = None;
    for entry in candidates {
        if recent.contains(&entry.region) {
            continue;
        }
        let record = ctx.intel.get_mut(&entry.region);
        if is_cooling_down(record, ctx.tick) {
            continue;
        }
        let age = if record.scouted {
            staleness(record, ctx.tick).unwrap_or(Tick::MAX)
        } else {
            Tick::MAX
        };
        let better = best.as_ref().is_none_or(|(_, best_age, best_depth)| {
            age > *best_age || (age == *best_age && entry.depth < *best_depth)
        });
        if better {
            best = Some((entry.region, age, entry.depth));
        }
    }

    let (region, age, depth) = best?;
    if age < ctx.config.revisit_threshold {
        decision_trace!(
            ctx,
            agent_id = %agent.id,
            region = %region,
            age,
            "Stalest frontier region is still fresh"
        );
        return None;
    }

    decision_trace!(ctx, agent_id = %agent.id, region = %region, depth, "Frontier pick");
    Some(Target {
        pos: Position::center_of(region.clone(), ctx.config.region_center_coordinate),
        region,
        source: TargetSource::Auto,
        task_id: None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use recon_intel::{IntelStore, NewTask, TaskQueue, record_failure};
    use recon_world::RegionMap;

    use super::super::services::{BlindObserver, DiscardTerrain};
    use super::*;
    use crate::config::{ScoutConfig, TaskConfig};

    struct Stores {
        config: ScoutConfig,
        task_config: TaskConfig,
        graph: RegionMap,
        intel: IntelStore,
        tasks: TaskQueue,
        terrain: DiscardTerrain,
        bases: BTreeMap<RegionName, Position>,
    }

    impl Stores {
        /// A chain `E0S0 - E1S0 - E2S0 - E3S0` plus `E0S1` south of home.
        fn new() -> Self {
            let mut graph = RegionMap::new();
            for name in ["E0S0", "E1S0", "E2S0", "E3S0", "E0S1"] {
                graph.add_region(name.into()).unwrap();
            }
            graph.link(&"E0S0".into(), &"E1S0".into()).unwrap();
            graph.link(&"E1S0".into(), &"E2S0".into()).unwrap();
            graph.link(&"E2S0".into(), &"E3S0".into()).unwrap();
            graph.link(&"E0S0".into(), &"E0S1".into()).unwrap();
            Self {
                config: ScoutConfig::default(),
                task_config: TaskConfig::default(),
                graph,
                intel: IntelStore::new(),
                tasks: TaskQueue::new(),
                terrain: DiscardTerrain,
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
                observer: &BlindObserver,
                terrain: &mut self.terrain,
                bases: &self.bases,
            }
        }

        fn mark_scouted(&mut self, region: &str, at: Tick) {
            let record = self.intel.get_mut(&region.into());
            record.scouted = true;
            record.last_scouted = Some(at);
        }
    }

    fn home() -> RegionName {
        "E0S0".into()
    }

    #[test]
    fn recent_window_takes_the_tail() {
        let recent: Vec<RegionName> = ["A", "B", "C"].into_iter().map(RegionName::from).collect();
        assert_eq!(recent_window(&recent, 2), &recent[1..]);
        assert_eq!(recent_window(&recent, 10), recent.as_slice());
        assert!(recent_window(&recent, 0).is_empty());
    }

    #[test]
    fn nearest_task_wins_and_is_claimed() {
        let mut stores = Stores::new();
        stores
            .tasks
            .add(&home(), NewTask::new(TaskKind::ScoutRoom, "E3S0".into()));
        let near = stores
            .tasks
            .add(&home(), NewTask::new(TaskKind::ScoutRoom, "E1S0".into()));
        let scout = ScoutAgent::new(home(), 1000);

        let target = select_target(&scout, &mut stores.ctx(10), &home()).unwrap();

        assert_eq!(target.source, TargetSource::Task);
        assert_eq!(target.task_id, Some(near));
        assert_eq!(target.region, "E1S0".into());
        let claimed = stores.tasks.list(&home()).iter().find(|t| t.id == near).unwrap();
        let claim = claimed.claim.as_ref().unwrap();
        assert_eq!(claim.owner, scout.id);
        assert_eq!(claim.until, 1510);
    }

    #[test]
    fn distance_ties_go_to_the_first_listed_task() {
        let mut stores = Stores::new();
        let first = stores
            .tasks
            .add(&home(), NewTask::new(TaskKind::ScoutRoom, "E1S0".into()));
        stores
            .tasks
            .add(&home(), NewTask::new(TaskKind::ScoutRoom, "E0S1".into()));
        let scout = ScoutAgent::new(home(), 1000);

        let target = select_target(&scout, &mut stores.ctx(1), &home()).unwrap();
        assert_eq!(target.task_id, Some(first));
    }

    #[test]
    fn remote_score_tasks_are_not_scout_targets() {
        let mut stores = Stores::new();
        stores
            .tasks
            .add(&home(), NewTask::new(TaskKind::RemoteScoreRoom, "E1S0".into()));
        let scout = ScoutAgent::new(home(), 1000);
        assert!(select_target(&scout, &mut stores.ctx(1), &home()).is_none());
    }

    #[test]
    fn task_claims_ignore_cooldown_and_recent_targets() {
        let mut stores = Stores::new();
        stores
            .tasks
            .add(&home(), NewTask::new(TaskKind::ScoutRoom, "E1S0".into()));
        stores.intel.get_mut(&"E1S0".into()).scout_cooldown_until = Some(5000);
        let mut scout = ScoutAgent::new(home(), 1000);
        scout.memory.recent_targets.push("E1S0".into());

        let target = select_target(&scout, &mut stores.ctx(1), &home()).unwrap();
        assert_eq!(target.source, TargetSource::Task);
    }

    #[test]
    fn memory_scan_uses_top_left_order() {
        let mut stores = Stores::new();
        for name in ["E1S0", "W1N1", "E0S1"] {
            stores.intel.get_mut(&name.into());
        }
        let scout = ScoutAgent::new(home(), 1000);

        let target = select_target(&scout, &mut stores.ctx(1), &home()).unwrap();
        assert_eq!(target.source, TargetSource::Memory);
        assert_eq!(target.region, "E0S1".into());
        assert_eq!(target.pos, Position::center_of("E0S1".into(), 25));
    }

    #[test]
    fn memory_scan_visits_unparsable_names_last_in_lexicographic_order() {
        let mut stores = Stores::new();
        for name in ["sim", "E1S0", "arena"] {
            stores.intel.get_mut(&name.into());
        }
        let mut scout = ScoutAgent::new(home(), 1000);

        let target = select_target(&scout, &mut stores.ctx(1), &home()).unwrap();
        assert_eq!(target.region, "E1S0".into());

        scout.memory.recent_targets.push("E1S0".into());
        let target = select_target(&scout, &mut stores.ctx(1), &home()).unwrap();
        assert_eq!(target.region, "arena".into());

        scout.memory.recent_targets.push("arena".into());
        let target = select_target(&scout, &mut stores.ctx(1), &home()).unwrap();
        assert_eq!(target.region, "sim".into());
    }

    #[test]
    fn memory_scan_skips_recent_fresh_and_cooling_regions() {
        let mut stores = Stores::new();
        stores.mark_scouted("E0S1", 9000);
        stores.intel.get_mut(&"E1S0".into()).scout_cooldown_until = Some(10_500);
        stores.intel.get_mut(&"E2S0".into());
        stores.intel.get_mut(&"E3S0".into());
        let mut scout = ScoutAgent::new(home(), 1000);
        scout.memory.recent_targets.push("E2S0".into());

        let target = select_target(&scout, &mut stores.ctx(10_000), &home()).unwrap();
        assert_eq!(target.region, "E3S0".into());
    }

    #[test]
    fn recent_targets_beyond_the_window_are_eligible_again() {
        let mut stores = Stores::new();
        stores.intel.get_mut(&"E2S0".into());
        let mut scout = ScoutAgent::new(home(), 1000);
        scout.memory.recent_targets.push("E2S0".into());
        for filler in ["A1", "A2", "A3", "A4", "A5", "A6"] {
            scout.memory.recent_targets.push(filler.into());
        }

        let target = select_target(&scout, &mut stores.ctx(1), &home()).unwrap();
        assert_eq!(target.region, "E2S0".into());
    }

    #[test]
    fn auto_is_off_by_default() {
        let mut stores = Stores::new();
        let scout = ScoutAgent::new(home(), 1000);
        assert!(select_target(&scout, &mut stores.ctx(1), &home()).is_none());
        assert!(stores.intel.is_empty());
    }

    #[test]
    fn auto_picks_shallowest_unknown_region() {
        let mut stores = Stores::new();
        stores.config.enable_auto_scout = true;
        let scout = ScoutAgent::new(home(), 1000);

        let target = select_target(&scout, &mut stores.ctx(1), &home()).unwrap();

        assert_eq!(target.source, TargetSource::Auto);
        assert_eq!(target.region, "E0S1".into());
        // Candidates within depth 2 now have records; E3S0 is three hops out.
        assert_eq!(stores.intel.len(), 3);
        assert!(stores.intel.get(&"E2S0".into()).is_some());
        assert!(stores.intel.get(&"E3S0".into()).is_none());
    }

    #[test]
    fn auto_prefers_stalest_over_shallowest() {
        let mut stores = Stores::new();
        stores.config.enable_auto_scout = true;
        stores.mark_scouted("E0S1", 400);
        stores.mark_scouted("E1S0", 300);
        let scout = ScoutAgent::new(home(), 1000);

        let target = select_target(&scout, &mut stores.ctx(500), &home()).unwrap();
        assert_eq!(target.source, TargetSource::Auto);
        assert_eq!(target.region, "E2S0".into());
    }

    #[test]
    fn auto_discards_fresh_best() {
        let mut stores = Stores::new();
        stores.config.enable_auto_scout = true;
        for name in ["E1S0", "E2S0", "E0S1"] {
            stores.mark_scouted(name, 1000);
        }
        let scout = ScoutAgent::new(home(), 1000);

        assert!(select_target(&scout, &mut stores.ctx(5999), &home()).is_none());
    }

    #[test]
    fn excluded_candidates_get_no_record() {
        let mut stores = Stores::new();
        stores.config.enable_auto_scout = true;
        let mut scout = ScoutAgent::new(home(), 1000);
        for name in ["E1S0", "E0S1", "E2S0"] {
            scout.memory.recent_targets.push(name.into());
        }

        assert!(select_target(&scout, &mut stores.ctx(1), &home()).is_none());
        assert!(stores.intel.is_empty());
    }

    #[test]
    fn cooled_region_is_skipped_by_auto() {
        let mut stores = Stores::new();
        stores.config.enable_auto_scout = true;
        let policy = stores.config.backoff_policy();
        let record = stores.intel.get_mut(&"E1S0".into());
        for at in [1, 2, 3] {
            record_failure(record, at, &policy);
        }
        let mut scout = ScoutAgent::new(home(), 1000);
        scout.memory.recent_targets.push("E0S1".into());
        scout.memory.recent_targets.push("E2S0".into());

        assert!(select_target(&scout, &mut stores.ctx(4), &home()).is_none());
    }
}
