//! The process-wide intel store: region name -> [`IntelRecord`].
//!
//! Records are created lazily: the first mutable lookup of a region inserts
//! an empty record. Read-only lookups never insert. Records are never
//! deleted.

use std::collections::BTreeMap;

use recon_types::{IntelRecord, RegionName, Tick};
use serde::{Deserialize, Serialize};

use crate::backoff;

/// Keyed store of region intel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntelStore {
    records: BTreeMap<RegionName, IntelRecord>,
}

impl IntelStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Look up a record without creating it.
    pub fn get(&self, region: &RegionName) -> Option<&IntelRecord> {
        self.records.get(region)
    }

    /// Look up a record, creating an empty one on first access.
    pub fn get_mut(&mut self, region: &RegionName) -> &mut IntelRecord {
        self.records.entry(region.clone()).or_default()
    }

    /// All known region names, in lexicographic order.
    pub fn keys(&self) -> Vec<RegionName> {
        self.records.keys().cloned().collect()
    }

    /// Iterate over all records.
    pub fn iter(&self) -> impl Iterator<Item = (&RegionName, &IntelRecord)> {
        self.records.iter()
    }

    /// Number of known regions.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no region is known yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of regions that have been recorded at least once.
    pub fn scouted_count(&self) -> usize {
        self.records.values().filter(|r| r.scouted).count()
    }
}

/// Ticks since the region was last recorded; `None` means never.
pub fn staleness(record: &IntelRecord, now: Tick) -> Option<Tick> {
    record.last_scouted.map(|at| now.saturating_sub(at))
}

/// Whether a region is due for a visit at `now`.
///
/// Due means: not cooling down, and either never scouted or last scouted
/// at least `revisit_threshold` ticks ago.
pub fn needs_scouting(record: &IntelRecord, now: Tick, revisit_threshold: Tick) -> bool {
    if backoff::is_cooling_down(record, now) {
        return false;
    }
    if !record.scouted {
        return true;
    }
    staleness(record, now).is_none_or(|age| age >= revisit_threshold)
}
