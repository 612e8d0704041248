//! Square grid worlds of coordinate-named regions.
//!
//! The engine uses these as its default map: a `2r x 2r` block of regions
//! centred on the origin, each linked to its four orthogonal neighbours.

use tracing::debug;

use crate::coords::{RegionCoords, region_name};
use crate::error::WorldError;
use crate::region_graph::RegionMap;

/// Largest accepted grid radius.
pub const MAX_GRID_RADIUS: u32 = 1_000;

/// Build a grid world spanning `x, y` in `-radius..radius`.
///
/// # Errors
///
/// Returns [`WorldError::GridTooLarge`] if `radius` exceeds
/// [`MAX_GRID_RADIUS`].
pub fn create_grid_world(radius: u32) -> Result<RegionMap, WorldError> {
    if radius > MAX_GRID_RADIUS {
        return Err(WorldError::GridTooLarge(radius));
    }
    let r = i32::try_from(radius).map_err(|_overflow| WorldError::GridTooLarge(radius))?;

    let mut map = RegionMap::new();
    for x in -r..r {
        for y in -r..r {
            map.add_region(region_name(RegionCoords { x, y }))?;
        }
    }

    for x in -r..r {
        for y in -r..r {
            let here = region_name(RegionCoords { x, y });
            let east = x.saturating_add(1);
            if east < r {
                map.link(&here, &region_name(RegionCoords { x: east, y }))?;
            }
            let south = y.saturating_add(1);
            if south < r {
                map.link(&here, &region_name(RegionCoords { x, y: south }))?;
            }
        }
    }

    debug!(radius, regions = map.region_count(), "Grid world created");
    Ok(map)
}
