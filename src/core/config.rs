//! Bot configuration with documented constants
//!
//! All tunable numbers are collected here with explanations of their purpose
//! and how they interact with each other. Values can be overridden from a
//! TOML file and from the command line.

use crate::core::error::{BotError, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration for the control loop and the decision engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BotConfig {
    // === NETWORK ===
    /// Base URL of the arena API, including the `/api` suffix.
    pub base_url: String,

    /// Static auth token attached to every request (`X-Auth-Token`).
    ///
    /// Usually supplied via `--token` or the `BLAZE_TOKEN` env var rather
    /// than the config file.
    pub token: String,

    /// Per-request timeout in milliseconds.
    ///
    /// A timeout is treated identically to a connection failure: it counts
    /// toward the error budget and never escapes the scheduler.
    pub request_timeout_ms: u64,

    /// Minimum spacing between successive arena fetches (milliseconds).
    ///
    /// The server enforces a global request budget; reads and writes are
    /// paced independently so their combined rate stays within it.
    pub read_interval_ms: u64,

    /// Minimum spacing between successive move submissions (milliseconds).
    pub send_interval_ms: u64,

    /// Decide-and-send cadence (milliseconds). The decide activity re-runs
    /// at this interval even when no fresh snapshot arrived, so a stretch of
    /// failed fetches degrades to re-deciding on the retained snapshot
    /// instead of going silent.
    pub tick_ms: u64,

    /// Attempts per outbound request before the cycle gives up.
    pub max_attempts: u32,

    /// Consecutive failures tolerated before the cooldown pause kicks in.
    pub error_budget: u32,

    /// Cooldown pause after the error budget is exhausted (milliseconds).
    /// Deliberately longer than the normal cadence; the budget resets when
    /// the pause ends.
    pub cooldown_ms: u64,

    // === PATHFINDING ===
    /// Maximum path length accepted by the transport (cells).
    pub max_path: usize,

    /// Node-expansion cap for every breadth-first search.
    ///
    /// Exceeding the cap yields not-found rather than a partial path, so a
    /// large open map degrades to "no action" instead of unbounded work.
    pub max_nodes: usize,

    // === DANGER MODEL ===
    /// Blast radius assumed for bombs the server reports without a radius,
    /// and for bombs we plant ourselves.
    pub default_bomb_radius: i32,

    /// Manhattan distance at which an enemy or awake mob makes a cell
    /// dangerous. At 2, a hostile one step away (or diagonal) triggers the
    /// Escape rule before contact.
    pub hostile_radius: i32,

    // === DECISIONS ===
    /// Manhattan range within which mobs and enemies become hunt targets.
    pub hunt_range: i32,

    /// Maximum steps of a scout walk. Short on purpose: scouting only needs
    /// to break symmetry and uncover nearby cells.
    pub scout_steps: usize,

    /// A bomb whose remaining fuse is at or below this window (seconds) and
    /// whose blast covers at least two obstacles triggers the Chain rule.
    pub chain_fuse_window: f32,

    /// When true, Farm targets the largest obstacle cluster within
    /// `cluster_radius` instead of the nearest single obstacle.
    pub cluster_targets: bool,

    /// Cluster membership radius (Manhattan) for `cluster_targets`.
    pub cluster_radius: i32,

    /// When true, units with no bombs left drift toward the nearest living
    /// ally instead of holding position. Policy only, not a correctness
    /// requirement.
    pub recover_drift: bool,

    /// Strategy resolved from the registry at startup.
    pub strategy: String,

    // === PARALLELIZATION ===
    /// Minimum unit count before per-unit decisions run on the rayon pool.
    /// Below this, thread overhead exceeds the benefit.
    pub parallel_threshold: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            base_url: "https://games-test.datsteam.dev/api".into(),
            token: String::new(),
            request_timeout_ms: 5_000,
            read_interval_ms: 1_000,
            send_interval_ms: 1_000,
            tick_ms: 1_000,
            max_attempts: 2,
            error_budget: 10,
            cooldown_ms: 5_000,

            max_path: 30,
            max_nodes: 5_000,

            default_bomb_radius: 3,
            hostile_radius: 2,

            hunt_range: 12,
            scout_steps: 5,
            chain_fuse_window: 1.0,
            cluster_targets: false,
            cluster_radius: 2,
            recover_drift: false,
            strategy: "priority".into(),

            parallel_threshold: 64,
        }
    }
}

impl BotConfig {
    /// Load configuration from a TOML file, with defaults for absent keys.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let cfg: BotConfig = toml::from_str(&content)
            .map_err(|e| BotError::Config(format!("{}: {}", path.display(), e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate configuration for internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(BotError::Config("base_url must not be empty".into()));
        }
        if self.read_interval_ms == 0 || self.send_interval_ms == 0 || self.tick_ms == 0 {
            return Err(BotError::Config("request intervals must be positive".into()));
        }
        if self.max_attempts == 0 {
            return Err(BotError::Config("max_attempts must be at least 1".into()));
        }
        if self.max_path == 0 || self.max_nodes == 0 {
            return Err(BotError::Config("search caps must be positive".into()));
        }
        if self.default_bomb_radius < 1 {
            return Err(BotError::Config("default_bomb_radius must be at least 1".into()));
        }
        if self.hostile_radius < 0 || self.hunt_range < 0 {
            return Err(BotError::Config("distance thresholds must be non-negative".into()));
        }
        if self.cooldown_ms < self.tick_ms {
            return Err(BotError::Config(
                "cooldown_ms must exceed the normal cadence (tick_ms)".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(BotConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg: BotConfig = toml::from_str("max_path = 12\nhunt_range = 8\n").unwrap();
        assert_eq!(cfg.max_path, 12);
        assert_eq!(cfg.hunt_range, 8);
        assert_eq!(cfg.max_nodes, BotConfig::default().max_nodes);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(toml::from_str::<BotConfig>("max_paht = 12\n").is_err());
    }

    #[test]
    fn test_cooldown_shorter_than_cadence_is_invalid() {
        let cfg = BotConfig {
            cooldown_ms: 100,
            tick_ms: 1_000,
            ..BotConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_zero_interval_is_invalid() {
        let cfg = BotConfig {
            read_interval_ms: 0,
            ..BotConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
