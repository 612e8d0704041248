//! Shared mutable state for the Recon scouting system.
//!
//! Scouts read and write two shared stores: the region [`IntelStore`] and the
//! per-colony [`TaskQueue`]. Both are plain owned values. The host hands each
//! scout a `&mut` borrow in turn, which is what makes a claim by one scout
//! visible to every scout that runs after it in the same tick.
//!
//! # Modules
//!
//! - [`backoff`] -- Failure logging and cooldowns for unreachable regions.
//! - [`error`] -- Error types for snapshot persistence.
//! - [`snapshot`] -- Forgiving JSON load/flush of the stores and agent memory.
//! - [`store`] -- Lazily populated region intel and freshness checks.
//! - [`tasks`] -- Priority-ordered task buckets with exclusive claims.
//!
//! [`IntelStore`]: store::IntelStore
//! [`TaskQueue`]: tasks::TaskQueue

pub mod backoff;
pub mod error;
pub mod snapshot;
pub mod store;
pub mod tasks;

// Re-export primary types at crate root.
pub use backoff::{BackoffPolicy, clear_failures, is_cooling_down, record_failure};
pub use error::IntelError;
pub use snapshot::{Snapshot, SnapshotFile};
pub use store::{IntelStore, needs_scouting, staleness};
pub use tasks::{ClaimRequest, META_TASK_ID, NewTask, TaskQueue};
