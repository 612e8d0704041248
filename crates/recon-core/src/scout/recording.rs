//! Writing intel for the region a scout has reached.

use recon_intel::{NewTask, clear_failures};
use recon_types::{HostileSummary, RegionName, TargetSource, TaskId, TaskKind};
use tracing::debug;

use super::services::CaptureOptions;
use super::{ScoutAgent, ScoutCommand, ScoutContext, ScoutReport, decision_trace};

/// Record the scout's current region and consume its target.
///
/// Refreshes the cached terrain, surveys the region, and overwrites the
/// region's intel record. A task-sourced target is completed: a
/// `REMOTE_SCORE_ROOM` follow-up goes onto the home queue and the claimed
/// task is removed. The region is appended to the recent-target history.
pub fn record_intel(
    agent: &mut ScoutAgent,
    ctx: &mut ScoutContext<'_>,
    home: &RegionName,
    report: &mut ScoutReport,
) {
    let region = agent.region.clone();

    ctx.terrain.capture(&region, CaptureOptions { force: true });
    let survey = ctx.observer.survey(&region).unwrap_or_default();
    let exits = ctx.graph.adjacent(&region);

    if !survey.hostiles.is_empty() {
        report.commands.push(ScoutCommand::RequestRescan {
            region: region.clone(),
        });
    }

    let record = ctx.intel.get_mut(&region);
    record.scouted = true;
    record.last_scouted = Some(ctx.tick);
    record.source_count = survey.source_count;
    record.structures = survey.structure_counts();
    record.hostiles = HostileSummary {
        count: u32::try_from(survey.hostiles.len()).unwrap_or(u32::MAX),
        owners: survey.hostiles.into_iter().map(|h| h.owner).collect(),
    };
    record.mineral = survey.mineral;
    record.controller = survey.controller;
    record.terrain_score = survey.terrain_score;
    record.energy_available = survey.energy_available;
    record.exits = exits;
    clear_failures(record);

    debug!(
        agent_id = %agent.id,
        region = %region,
        tick = ctx.tick,
        hostiles = record.hostiles.count,
        exits = record.exits.len(),
        "Region recorded"
    );

    if let Some(target) = agent
        .memory
        .target
        .take()
        .filter(|target| target.source == TargetSource::Task)
    {
        complete_task(agent, ctx, home, target.region, target.task_id);
    }

    agent.memory.recent_targets.push(region.clone());
    let excess = agent
        .memory
        .recent_targets
        .len()
        .saturating_sub(ctx.config.recent_targets_cap);
    agent.memory.recent_targets.drain(..excess);

    report.recorded = Some(region);
}

fn complete_task(
    agent: &ScoutAgent,
    ctx: &mut ScoutContext<'_>,
    home: &RegionName,
    region: RegionName,
    task_id: Option<TaskId>,
) {
    let template = ctx.task_config.follow_up;
    let follow_up = ctx.tasks.add(
        home,
        NewTask::new(TaskKind::RemoteScoreRoom, region)
            .with_priority(template.priority)
            .with_ttl(template.ttl)
            .with_amount(template.amount)
            .with_owner(agent.id),
    );
    if let Some(id) = task_id {
        ctx.tasks.remove(home, id);
    }
    decision_trace!(
        ctx,
        agent_id = %agent.id,
        follow_up = %follow_up,
        "Task completed, follow-up queued"
    );
}
