//! Configuration loading and typed config structures for the Recon system.
//!
//! The canonical configuration lives in `recon-config.yaml` at the project
//! root. Every field has a default, so an empty file (or no file at all)
//! yields a runnable configuration.

use std::path::Path;

use recon_intel::BackoffPolicy;
use recon_types::Tick;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `recon-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReconConfig {
    /// World construction and scout spawning.
    #[serde(default)]
    pub world: WorldConfig,

    /// Scout decision tunables.
    #[serde(default)]
    pub scout: ScoutConfig,

    /// Parameters of the tasks scouts enqueue themselves.
    #[serde(default)]
    pub tasks: TaskConfig,

    /// Simulation boundary parameters.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Snapshot persistence.
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ReconConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `RECON_SNAPSHOT_PATH` overrides `persistence.snapshot_path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.persistence.apply_env_overrides();
        Ok(config)
    }
}

/// World construction and scout spawning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable run name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Seed for the synthetic region observer.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time pause between ticks, in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Half-width of the generated grid world.
    #[serde(default = "default_grid_radius")]
    pub grid_radius: u32,

    /// Region the colony (and its task queue) lives in.
    #[serde(default = "default_colony")]
    pub colony: String,

    /// Local x coordinate of the colony base.
    #[serde(default = "default_base_coordinate")]
    pub base_x: u8,

    /// Local y coordinate of the colony base.
    #[serde(default = "default_base_coordinate")]
    pub base_y: u8,

    /// Scouts spawned at startup (on top of any restored from a snapshot).
    #[serde(default = "default_scout_count")]
    pub scout_count: u32,

    /// Ticks to live for newly spawned scouts.
    #[serde(default = "default_scout_lifetime")]
    pub scout_lifetime: u32,

    /// Regions to seed `SCOUT_ROOM` tasks for at startup.
    #[serde(default)]
    pub seed_tasks: Vec<String>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
            grid_radius: default_grid_radius(),
            colony: default_colony(),
            base_x: default_base_coordinate(),
            base_y: default_base_coordinate(),
            scout_count: default_scout_count(),
            scout_lifetime: default_scout_lifetime(),
            seed_tasks: Vec::new(),
        }
    }
}

/// Scout decision tunables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ScoutConfig {
    /// Whether the frontier (auto) tier may pick targets.
    #[serde(default)]
    pub enable_auto_scout: bool,

    /// Emit per-decision `debug!` traces.
    #[serde(default)]
    pub debug_trace: bool,

    /// BFS depth limit for frontier discovery.
    #[serde(default = "default_max_frontier_depth")]
    pub max_frontier_depth: u32,

    /// Ticks after which a scouted region is due again.
    #[serde(default = "default_revisit_threshold")]
    pub revisit_threshold: Tick,

    /// Ticks a scout stays idle after finding nothing to do.
    #[serde(default = "default_idle_window")]
    pub idle_window: Tick,

    /// Maximum length of a scout's recent-target history.
    #[serde(default = "default_recent_targets_cap")]
    pub recent_targets_cap: usize,

    /// Number of most recent targets excluded from memory and auto selection.
    #[serde(default = "default_recent_targets_exclusion_window")]
    pub recent_targets_exclusion_window: usize,

    /// Failures inside the window that trigger a cooldown.
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: usize,

    /// Trailing failure window, in ticks.
    #[serde(default = "default_failure_window")]
    pub failure_window: Tick,

    /// Cooldown length, in ticks.
    #[serde(default = "default_cooldown_length")]
    pub cooldown_length: Tick,

    /// Local coordinate of a region's center on both axes.
    #[serde(default = "default_region_center_coordinate")]
    pub region_center_coordinate: u8,

    /// Remaining lifetime below which a scout abandons non-memory targets.
    #[serde(default = "default_retirement_ticks")]
    pub retirement_ticks: u32,

    /// Arrival range for travel to a target.
    #[serde(default = "default_travel_range")]
    pub travel_range: u8,

    /// Arrival range for travel back to base while idle.
    #[serde(default = "default_home_range")]
    pub home_range: u8,

    /// How long a task claim blocks other scouts, in ticks.
    #[serde(default = "default_task_claim_cooldown")]
    pub task_claim_cooldown: Tick,
}

impl ScoutConfig {
    /// The backoff policy these settings describe.
    pub const fn backoff_policy(&self) -> BackoffPolicy {
        BackoffPolicy {
            failure_threshold: self.failure_threshold,
            failure_window: self.failure_window,
            cooldown_length: self.cooldown_length,
        }
    }
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            enable_auto_scout: false,
            debug_trace: false,
            max_frontier_depth: default_max_frontier_depth(),
            revisit_threshold: default_revisit_threshold(),
            idle_window: default_idle_window(),
            recent_targets_cap: default_recent_targets_cap(),
            recent_targets_exclusion_window: default_recent_targets_exclusion_window(),
            failure_threshold: default_failure_threshold(),
            failure_window: default_failure_window(),
            cooldown_length: default_cooldown_length(),
            region_center_coordinate: default_region_center_coordinate(),
            retirement_ticks: default_retirement_ticks(),
            travel_range: default_travel_range(),
            home_range: default_home_range(),
            task_claim_cooldown: default_task_claim_cooldown(),
        }
    }
}

/// Priority, TTL, and amount for a task scouts create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TaskTemplate {
    /// Queue priority (higher first).
    pub priority: u8,
    /// Ticks until the task expires.
    pub ttl: u32,
    /// Task amount.
    pub amount: u32,
}

/// Parameters of the tasks scouts enqueue themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TaskConfig {
    /// `SCOUT_ROOM` task requeued when a scout retires before arriving.
    #[serde(default = "default_requeue_task")]
    pub requeue: TaskTemplate,

    /// `REMOTE_SCORE_ROOM` task enqueued after a task-sourced recording.
    #[serde(default = "default_follow_up_task")]
    pub follow_up: TaskTemplate,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            requeue: default_requeue_task(),
            follow_up: default_follow_up_task(),
        }
    }
}

/// Simulation boundary parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Stop after this many ticks. 0 means unbounded.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
        }
    }
}

/// Snapshot persistence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersistenceConfig {
    /// Whether snapshots are loaded at startup and written while running.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// JSON snapshot file.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,

    /// Write a snapshot every this many ticks. 0 writes only at shutdown.
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval: u64,
}

impl PersistenceConfig {
    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("RECON_SNAPSHOT_PATH") {
            self.snapshot_path = path;
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            snapshot_path: default_snapshot_path(),
            snapshot_interval: default_snapshot_interval(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Recon".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_tick_interval_ms() -> u64 {
    100
}

const fn default_grid_radius() -> u32 {
    4
}

fn default_colony() -> String {
    "E0S0".to_owned()
}

const fn default_base_coordinate() -> u8 {
    25
}

const fn default_scout_count() -> u32 {
    2
}

const fn default_scout_lifetime() -> u32 {
    1500
}

const fn default_max_frontier_depth() -> u32 {
    2
}

const fn default_revisit_threshold() -> Tick {
    5000
}

const fn default_idle_window() -> Tick {
    5
}

const fn default_recent_targets_cap() -> usize {
    12
}

const fn default_recent_targets_exclusion_window() -> usize {
    6
}

const fn default_failure_threshold() -> usize {
    3
}

const fn default_failure_window() -> Tick {
    1000
}

const fn default_cooldown_length() -> Tick {
    1000
}

const fn default_region_center_coordinate() -> u8 {
    25
}

const fn default_retirement_ticks() -> u32 {
    50
}

const fn default_travel_range() -> u8 {
    20
}

const fn default_home_range() -> u8 {
    3
}

const fn default_task_claim_cooldown() -> Tick {
    1500
}

const fn default_requeue_task() -> TaskTemplate {
    TaskTemplate {
        priority: 5,
        ttl: 500,
        amount: 1,
    }
}

const fn default_follow_up_task() -> TaskTemplate {
    TaskTemplate {
        priority: 4,
        ttl: 1000,
        amount: 1,
    }
}

const fn default_max_ticks() -> u64 {
    2000
}

const fn default_true() -> bool {
    true
}

fn default_snapshot_path() -> String {
    "recon-snapshot.json".to_owned()
}

const fn default_snapshot_interval() -> u64 {
    100
}

fn default_log_level() -> String {
    "info".to_owned()
}
