//! Region adjacency: the [`RegionGraph`] trait and the in-memory
//! [`RegionMap`].
//!
//! Scouts only ever ask one question of the map: which regions border this
//! one? Hosts with their own map primitive implement [`RegionGraph`]
//! directly; everything else uses [`RegionMap`], an undirected adjacency
//! index keyed by region name.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use recon_types::RegionName;

use crate::error::WorldError;

/// Source of region adjacency.
pub trait RegionGraph {
    /// Regions directly reachable from `region`.
    ///
    /// Returns an empty set when the region is unknown or the underlying
    /// map query fails; callers treat that as "no data".
    fn adjacent(&self, region: &RegionName) -> BTreeSet<RegionName>;
}

/// An undirected region graph held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegionMap {
    /// Adjacency: region -> neighbors. Every region has an entry.
    adjacency: BTreeMap<RegionName, BTreeSet<RegionName>>,
}

impl RegionMap {
    /// Create an empty graph.
    pub const fn new() -> Self {
        Self {
            adjacency: BTreeMap::new(),
        }
    }

    /// Add an isolated region.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateRegion`] if the region already exists.
    pub fn add_region(&mut self, region: RegionName) -> Result<(), WorldError> {
        if self.adjacency.contains_key(&region) {
            return Err(WorldError::DuplicateRegion(region));
        }
        self.adjacency.insert(region, BTreeSet::new());
        Ok(())
    }

    /// Connect two existing regions in both directions.
    ///
    /// Linking an already-linked pair is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RegionNotFound`] if either endpoint is missing,
    /// or [`WorldError::SelfLink`] if `a == b`.
    pub fn link(&mut self, a: &RegionName, b: &RegionName) -> Result<(), WorldError> {
        if a == b {
            return Err(WorldError::SelfLink(a.clone()));
        }
        if !self.adjacency.contains_key(b) {
            return Err(WorldError::RegionNotFound(b.clone()));
        }
        self.adjacency
            .get_mut(a)
            .ok_or_else(|| WorldError::RegionNotFound(a.clone()))?
            .insert(b.clone());
        if let Some(neighbors) = self.adjacency.get_mut(b) {
            neighbors.insert(a.clone());
        }
        Ok(())
    }

    /// Whether the region exists.
    pub fn contains(&self, region: &RegionName) -> bool {
        self.adjacency.contains_key(region)
    }

    /// Number of regions.
    pub fn region_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Iterate over all region names in lexicographic order.
    pub fn regions(&self) -> impl Iterator<Item = &RegionName> {
        self.adjacency.keys()
    }

    /// Whether every region is reachable from every other region.
    pub fn is_connected(&self) -> bool {
        let Some(start) = self.adjacency.keys().next() else {
            return true;
        };

        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for neighbor in self.adjacency.get(current).into_iter().flatten() {
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        visited.len() == self.adjacency.len()
    }
}

impl RegionGraph for RegionMap {
    fn adjacent(&self, region: &RegionName) -> BTreeSet<RegionName> {
        self.adjacency.get(region).cloned().unwrap_or_default()
    }
}
