//! Error types for the `recon-world` crate.
//!
//! Only graph construction can fail. Queries never error: an unknown region
//! simply has no neighbors.

use recon_types::RegionName;

/// Errors that can occur while building a region graph.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A region was not found in the graph.
    #[error("region not found: {0}")]
    RegionNotFound(RegionName),

    /// A region was inserted twice.
    #[error("duplicate region: {0}")]
    DuplicateRegion(RegionName),

    /// A region may not be linked to itself.
    #[error("region {0} cannot be adjacent to itself")]
    SelfLink(RegionName),

    /// Grid dimensions exceed what region names can encode.
    #[error("grid radius {0} is out of range")]
    GridTooLarge(u32),
}
