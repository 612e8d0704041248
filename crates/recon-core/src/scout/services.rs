//! Opaque services the scout calls into on arrival.
//!
//! What a region contains and how its terrain is cached are host concerns.
//! The scout only needs a [`RegionObserver`] to survey the region it stands
//! in and a [`TerrainCapture`] to refresh the cached terrain. The stub
//! implementations here report nothing and keep nothing, which lets the
//! decision procedure run without a host world.

use std::collections::BTreeMap;

use recon_types::{ControllerInfo, RegionName};
use serde::{Deserialize, Serialize};

/// One visible hostile unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostileSighting {
    /// The unit's owner.
    pub owner: String,
}

/// What a scout sees while standing in a region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSurvey {
    /// Energy sources in the region.
    pub source_count: u32,
    /// Mineral deposit type, if any.
    pub mineral: Option<String>,
    /// One entry per structure: its type.
    pub structures: Vec<String>,
    /// Visible hostile units.
    pub hostiles: Vec<HostileSighting>,
    /// Controller details, if the region has one.
    pub controller: Option<ControllerInfo>,
    /// Host-defined buildability score.
    pub terrain_score: u32,
    /// Energy currently lying in sources.
    pub energy_available: u32,
}

impl RegionSurvey {
    /// Structure counts grouped by type.
    pub fn structure_counts(&self) -> BTreeMap<String, u32> {
        self.structures
            .iter()
            .fold(BTreeMap::new(), |mut counts, kind| {
                let count: &mut u32 = counts.entry(kind.clone()).or_default();
                *count = count.saturating_add(1);
                counts
            })
    }
}

/// Survey access for the region a scout occupies.
pub trait RegionObserver {
    /// Survey `region`. `None` means the region is not visible.
    fn survey(&self, region: &RegionName) -> Option<RegionSurvey>;
}

/// Options for a terrain capture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureOptions {
    /// Refresh even if a cached capture exists.
    pub force: bool,
}

/// An encoded terrain capture. The encoding belongs to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainSnapshot {
    /// The captured region.
    pub region: RegionName,
    /// Host-encoded terrain.
    pub encoded: Vec<u8>,
}

/// Terrain cache refresh.
pub trait TerrainCapture {
    /// Capture (or return the cached) terrain of `region`.
    fn capture(&mut self, region: &RegionName, options: CaptureOptions) -> TerrainSnapshot;
}

/// Observer that never sees anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlindObserver;

impl RegionObserver for BlindObserver {
    fn survey(&self, _region: &RegionName) -> Option<RegionSurvey> {
        None
    }
}

/// Terrain capture that keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardTerrain;

impl TerrainCapture for DiscardTerrain {
    fn capture(&mut self, region: &RegionName, _options: CaptureOptions) -> TerrainSnapshot {
        TerrainSnapshot {
            region: region.clone(),
            encoded: Vec::new(),
        }
    }
}
