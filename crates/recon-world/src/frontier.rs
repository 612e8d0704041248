//! Breadth-first frontier discovery over a [`RegionGraph`].
//!
//! Both searches keep a seen-set keyed by region name, so they terminate on
//! cyclic graphs and visit each region at most once. Region names are opaque
//! tokens here; nothing requires them to parse as coordinates.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use recon_types::RegionName;

use crate::region_graph::RegionGraph;

/// Default hop limit for frontier discovery.
pub const DEFAULT_MAX_DEPTH: u32 = 2;

/// A region found by [`gather_nearby`] and its hop distance from the origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// The discovered region.
    pub region: RegionName,
    /// Hops from the origin, `1..=max_depth`.
    pub depth: u32,
}

/// Collect every region within `max_depth` hops of `origin`.
///
/// The origin itself is excluded. Entries come out in BFS discovery order,
/// so depths are non-decreasing.
pub fn gather_nearby<G>(graph: &G, origin: &RegionName, max_depth: u32) -> Vec<FrontierEntry>
where
    G: RegionGraph + ?Sized,
{
    let mut found = Vec::new();
    let mut seen = BTreeSet::new();
    let mut queue = VecDeque::new();

    seen.insert(origin.clone());
    queue.push_back((origin.clone(), 0_u32));

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        let next_depth = depth.saturating_add(1);
        for neighbor in graph.adjacent(&current) {
            if seen.insert(neighbor.clone()) {
                found.push(FrontierEntry {
                    region: neighbor.clone(),
                    depth: next_depth,
                });
                queue.push_back((neighbor, next_depth));
            }
        }
    }

    found
}

/// Fewest-hop path from `start` to `goal`, both inclusive.
///
/// Returns `None` if `goal` is unreachable.
pub fn shortest_hops<G>(graph: &G, start: &RegionName, goal: &RegionName) -> Option<Vec<RegionName>>
where
    G: RegionGraph + ?Sized,
{
    if start == goal {
        return Some(vec![start.clone()]);
    }

    let mut prev: BTreeMap<RegionName, RegionName> = BTreeMap::new();
    let mut seen = BTreeSet::new();
    let mut queue = VecDeque::new();
    seen.insert(start.clone());
    queue.push_back(start.clone());

    'search: while let Some(current) = queue.pop_front() {
        for neighbor in graph.adjacent(&current) {
            if seen.insert(neighbor.clone()) {
                prev.insert(neighbor.clone(), current.clone());
                if &neighbor == goal {
                    break 'search;
                }
                queue.push_back(neighbor);
            }
        }
    }

    if !prev.contains_key(goal) {
        return None;
    }

    let mut path = VecDeque::new();
    let mut current = goal.clone();
    while let Some(predecessor) = prev.get(&current) {
        path.push_front(current);
        current = predecessor.clone();
    }
    path.push_front(current);

    Some(path.into_iter().collect())
}
