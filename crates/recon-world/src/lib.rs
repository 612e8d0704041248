//! Region geometry, adjacency, and frontier discovery for the Recon
//! scouting system.
//!
//! # Modules
//!
//! - [`coords`] -- Region-name coordinate parsing, the top-left ordering,
//!   and linear distance.
//! - [`error`] -- Error types for graph construction.
//! - [`frontier`] -- Depth-bounded BFS discovery and fewest-hop paths.
//! - [`grid`] -- Square grid worlds of coordinate-named regions.
//! - [`region_graph`] -- The [`RegionGraph`] trait and the in-memory
//!   [`RegionMap`].
//!
//! [`RegionGraph`]: region_graph::RegionGraph
//! [`RegionMap`]: region_graph::RegionMap

pub mod coords;
pub mod error;
pub mod frontier;
pub mod grid;
pub mod region_graph;

// Re-export primary types at crate root.
pub use coords::{
    RegionCoords, TopLeftKey, compare_by_top_left, linear_distance, parse_region, region_name,
    top_left_key,
};
pub use error::WorldError;
pub use frontier::{DEFAULT_MAX_DEPTH, FrontierEntry, gather_nearby, shortest_hops};
pub use grid::create_grid_world;
pub use region_graph::{RegionGraph, RegionMap};
