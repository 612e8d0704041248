//! Host-side stand-ins for the game world.
//!
//! The engine has no real world to look at, so it fakes one:
//!
//! - [`SyntheticObserver`] generates a survey per region from the world
//!   seed. The same seed and region always produce the same survey.
//! - [`CachedTerrain`] keeps one terrain capture per region.
//! - [`HopMover`] moves a scout one region along the fewest-hop path for
//!   every travel command, and notes rescan requests.

use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use recon_core::scout::services::{
    CaptureOptions, HostileSighting, RegionObserver, RegionSurvey, TerrainCapture,
    TerrainSnapshot,
};
use recon_core::scout::{ScoutAgent, ScoutCommand};
use recon_core::tick::ScoutHost;
use recon_types::{ControllerInfo, RegionName};
use recon_world::{RegionMap, parse_region, shortest_hops};
use tracing::{debug, info, warn};

const MINERALS: &[&str] = &["H", "O", "U", "L", "K", "Z", "X"];
const STRUCTURES: &[&str] = &["road", "container", "wall", "rampart"];
const HOSTILE_OWNERS: &[&str] = &["Invader", "rival"];
const ENERGY_PER_SOURCE: u32 = 3000;

/// Deterministic survey generator.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticObserver {
    seed: u64,
}

impl SyntheticObserver {
    /// Create an observer for the given world seed.
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn rng_for(&self, region: &RegionName) -> StdRng {
        // FNV-1a over the name, mixed with the world seed.
        let hash = region
            .as_str()
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
                (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
            });
        StdRng::seed_from_u64(self.seed ^ hash)
    }
}

fn pick<'a>(rng: &mut StdRng, choices: &[&'a str]) -> Option<&'a str> {
    choices.get(rng.random_range(0..choices.len())).copied()
}

impl RegionObserver for SyntheticObserver {
    fn survey(&self, region: &RegionName) -> Option<RegionSurvey> {
        parse_region(region.as_str())?;
        let mut rng = self.rng_for(region);

        let source_count: u32 = rng.random_range(0..=3);
        let mineral = pick(&mut rng, MINERALS).map(str::to_owned);

        let structure_count: usize = rng.random_range(0..=4);
        let structures = (0..structure_count)
            .filter_map(|_| pick(&mut rng, STRUCTURES).map(str::to_owned))
            .collect();

        let hostiles = if rng.random_bool(0.15) {
            let count: usize = rng.random_range(1..=3);
            (0..count)
                .filter_map(|_| pick(&mut rng, HOSTILE_OWNERS))
                .map(|owner| HostileSighting {
                    owner: owner.to_owned(),
                })
                .collect()
        } else {
            Vec::new()
        };

        let controller = (source_count > 0 && rng.random_bool(0.8)).then(|| {
            let owned = rng.random_bool(0.2);
            ControllerInfo {
                owner: owned.then(|| "rival".to_owned()),
                reservation: (!owned && rng.random_bool(0.1)).then(|| "rival".to_owned()),
                level: if owned { rng.random_range(1..=8) } else { 0 },
            }
        });

        Some(RegionSurvey {
            source_count,
            mineral,
            structures,
            hostiles,
            controller,
            terrain_score: rng.random_range(0..=100),
            energy_available: source_count.saturating_mul(ENERGY_PER_SOURCE),
        })
    }
}

/// Terrain cache keyed by region.
#[derive(Debug, Default)]
pub struct CachedTerrain {
    cache: BTreeMap<RegionName, TerrainSnapshot>,
    refreshes: u64,
}

impl CachedTerrain {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of regions with a cached capture.
    pub fn cached_regions(&self) -> usize {
        self.cache.len()
    }

    /// Number of captures actually taken (cache misses and forced refreshes).
    pub const fn refreshes(&self) -> u64 {
        self.refreshes
    }
}

impl TerrainCapture for CachedTerrain {
    fn capture(&mut self, region: &RegionName, options: CaptureOptions) -> TerrainSnapshot {
        if let Some(cached) = self.cache.get(region).filter(|_| !options.force) {
            return cached.clone();
        }
        self.refreshes = self.refreshes.saturating_add(1);
        let snapshot = TerrainSnapshot {
            region: region.clone(),
            encoded: region.as_str().as_bytes().to_vec(),
        };
        self.cache.insert(region.clone(), snapshot.clone());
        snapshot
    }
}

/// Moves scouts one region per travel command.
#[derive(Debug, Default)]
pub struct HopMover {
    moves: u64,
    rescans: BTreeSet<RegionName>,
}

impl HopMover {
    /// Create a mover with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total hops taken by all scouts.
    pub const fn moves(&self) -> u64 {
        self.moves
    }

    /// Regions a rescan has been requested for.
    pub const fn rescans(&self) -> &BTreeSet<RegionName> {
        &self.rescans
    }
}

impl ScoutHost for HopMover {
    fn execute(&mut self, world: &RegionMap, scout: &mut ScoutAgent, command: &ScoutCommand) {
        match command {
            ScoutCommand::Travel { destination, .. } => {
                if destination.region == scout.region {
                    return;
                }
                let Some(path) = shortest_hops(world, &scout.region, &destination.region) else {
                    warn!(
                        agent_id = %scout.id,
                        from = %scout.region,
                        to = %destination.region,
                        "No route to destination"
                    );
                    return;
                };
                if let Some(next) = path.get(1) {
                    debug!(agent_id = %scout.id, from = %scout.region, to = %next, "Scout moved");
                    scout.region = next.clone();
                    self.moves = self.moves.saturating_add(1);
                }
            }
            ScoutCommand::RequestRescan { region } => {
                if self.rescans.insert(region.clone()) {
                    info!(region = %region, "Hostiles sighted, rescan requested");
                }
            }
        }
    }
}
