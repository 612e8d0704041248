//! Per-colony task queues with exclusive, time-limited claims.
//!
//! Each colony (keyed by its home region) owns a bucket of [`Task`]s kept in
//! descending priority order; tasks of equal priority stay in insertion
//! order. Agents pick tasks by claiming them: a claim marks the task with
//! its owner until `now + cooldown`, and claimed tasks are invisible to
//! other claimers until the claim lapses.
//!
//! Claiming, adding, and removing all take `&mut self`, so once one agent
//! has claimed a task every later reader in the same tick sees the claim.

use std::collections::BTreeMap;

use recon_types::{AgentId, RegionName, Task, TaskClaim, TaskId, TaskKind, Tick};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Claim metadata key recording the task id the claimer selected.
pub const META_TASK_ID: &str = "task_id";

/// Parameters for enqueuing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// What the task asks for.
    pub kind: TaskKind,
    /// The region the task is about.
    pub region: RegionName,
    /// Higher runs first.
    pub priority: u8,
    /// Ticks the task may live in the queue.
    pub ttl: u32,
    /// How many agents the task wants.
    pub amount: u32,
    /// The creating agent, if any.
    pub owner: Option<AgentId>,
    /// Free-form creator metadata.
    pub meta: BTreeMap<String, String>,
}

impl NewTask {
    /// A task with priority 0, ttl 500, amount 1, no owner and no metadata.
    pub const fn new(kind: TaskKind, region: RegionName) -> Self {
        Self {
            kind,
            region,
            priority: 0,
            ttl: 500,
            amount: 1,
            owner: None,
            meta: BTreeMap::new(),
        }
    }

    /// Set the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Set the time-to-live in ticks.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the requested agent count.
    #[must_use]
    pub const fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }

    /// Set the creating agent.
    #[must_use]
    pub const fn with_owner(mut self, owner: AgentId) -> Self {
        self.owner = Some(owner);
        self
    }
}

/// Parameters for claiming a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRequest {
    /// Minimum task priority eligible for this claim.
    pub level: u8,
    /// The colony whose queue is searched.
    pub colony: RegionName,
    /// Only tasks of this kind are eligible.
    pub kind: TaskKind,
    /// The claiming agent.
    pub owner: AgentId,
    /// Claim duration in ticks.
    pub cooldown: Tick,
    /// Restrict the claim to one specific task.
    pub task_id: Option<TaskId>,
    /// Extra claim metadata.
    pub meta: BTreeMap<String, String>,
}

/// All colonies' task buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskQueue {
    buckets: BTreeMap<RegionName, Vec<Task>>,
}

impl TaskQueue {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
        }
    }

    /// Enqueue a task on `colony`'s bucket and return its id.
    pub fn add(&mut self, colony: &RegionName, task: NewTask) -> TaskId {
        let id = TaskId::new();
        let bucket = self.buckets.entry(colony.clone()).or_default();
        let position = bucket
            .iter()
            .position(|existing| existing.priority < task.priority)
            .unwrap_or(bucket.len());

        debug!(
            colony = %colony,
            task_id = %id,
            kind = %task.kind,
            region = %task.region,
            priority = task.priority,
            "Task added"
        );

        bucket.insert(
            position,
            Task {
                id,
                kind: task.kind,
                region: task.region,
                priority: task.priority,
                ttl: task.ttl,
                age: 0,
                amount: task.amount,
                owner: task.owner,
                meta: task.meta,
                claim: None,
            },
        );
        id
    }

    /// Claim the first eligible task in priority order.
    ///
    /// A task is eligible when its kind matches, its priority is at least
    /// `request.level`, no live claim holds it, and (if given) its id equals
    /// `request.task_id`. Returns a copy of the claimed task, or `None` if
    /// nothing was eligible; the latter covers tasks removed by another
    /// agent earlier in the tick.
    pub fn claim(&mut self, request: &ClaimRequest, now: Tick) -> Option<Task> {
        let bucket = self.buckets.get_mut(&request.colony)?;
        let task = bucket.iter_mut().find(|task| {
            task.kind == request.kind
                && task.priority >= request.level
                && task.is_claimable(now)
                && request.task_id.is_none_or(|id| id == task.id)
        })?;

        let mut meta = request.meta.clone();
        meta.insert(META_TASK_ID.to_owned(), task.id.to_string());
        task.claim = Some(TaskClaim {
            owner: request.owner,
            until: now.saturating_add(request.cooldown),
            meta,
        });

        debug!(
            colony = %request.colony,
            task_id = %task.id,
            owner = %request.owner,
            "Task claimed"
        );
        Some(task.clone())
    }

    /// Drop `owner`'s claim on a task so others may claim it.
    ///
    /// Returns `true` if a claim held by `owner` was removed.
    pub fn release(&mut self, colony: &RegionName, id: TaskId, owner: AgentId) -> bool {
        let Some(task) = self
            .buckets
            .get_mut(colony)
            .and_then(|bucket| bucket.iter_mut().find(|task| task.id == id))
        else {
            return false;
        };
        if task.claim.as_ref().is_some_and(|claim| claim.owner == owner) {
            task.claim = None;
            return true;
        }
        false
    }

    /// The tasks queued for `colony`, highest priority first.
    pub fn list(&self, colony: &RegionName) -> &[Task] {
        self.buckets.get(colony).map(Vec::as_slice).unwrap_or_default()
    }

    /// Remove a task, returning it if it was present.
    pub fn remove(&mut self, colony: &RegionName, id: TaskId) -> Option<Task> {
        let bucket = self.buckets.get_mut(colony)?;
        let index = bucket.iter().position(|task| task.id == id)?;
        let removed = bucket.remove(index);
        if bucket.is_empty() {
            self.buckets.remove(colony);
        }
        Some(removed)
    }

    /// Age every task by one tick and drop the ones past their TTL.
    ///
    /// Returns the number of tasks dropped.
    pub fn age_all(&mut self) -> usize {
        let mut dropped: usize = 0;
        for bucket in self.buckets.values_mut() {
            for task in bucket.iter_mut() {
                task.age = task.age.saturating_add(1);
            }
            let before = bucket.len();
            bucket.retain(|task| !task.is_expired());
            dropped = dropped.saturating_add(before.saturating_sub(bucket.len()));
        }
        self.buckets.retain(|_, bucket| !bucket.is_empty());
        dropped
    }

    /// Total number of queued tasks across all colonies.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Whether every bucket is empty.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
