//! Session configuration loaded from TOML and overridden by adapters.

use pellet_chase_core::{CellCoord, Difficulty, GhostPolicy, SearchAlgorithm, TargetStrategy};
use pellet_chase_system_planner::PlannerConfig;
use pellet_chase_world::{LayoutOptions, DEFAULT_NUMERIC_START};
use serde::{Deserialize, Serialize};

use crate::SessionError;

/// Everything a session needs besides the maze layout.
///
/// Every field has a default, so a configuration file only lists what it
/// changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Search algorithm active when the session starts.
    pub algorithm: SearchAlgorithm,
    /// Pellet selection strategy active when the session starts.
    pub target_strategy: TargetStrategy,
    /// Behaviour of ghosts spawned from layout markers.
    pub ghosts: GhostConfig,
    /// Planner tunables.
    pub planner: PlannerConfig,
    /// Pellet count the layout must contain, when known in advance.
    pub expected_pellets: Option<u32>,
    /// Agent start for layouts without a start marker.
    pub default_start: CellCoord,
    /// Seed for wandering ghosts.
    pub seed: u64,
    /// Ticks after which a run stops on its own.
    pub max_ticks: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            algorithm: SearchAlgorithm::default(),
            target_strategy: TargetStrategy::default(),
            ghosts: GhostConfig::default(),
            planner: PlannerConfig::default(),
            expected_pellets: None,
            default_start: DEFAULT_NUMERIC_START,
            seed: 0,
            max_ticks: None,
        }
    }
}

impl SessionConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, SessionError> {
        Ok(toml::from_str(text)?)
    }

    pub(crate) fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            default_start: self.default_start,
            expected_pellets: self.expected_pellets,
        }
    }
}

/// Behaviour assigned to ghosts spawned from layout markers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GhostConfig {
    /// Movement policy.
    pub policy: GhostPolicy,
    /// Speed preset used when no explicit interval is given.
    pub difficulty: Difficulty,
    /// Explicit ticks between steps, overriding the difficulty preset.
    pub step_interval: Option<u32>,
}

impl GhostConfig {
    /// Ticks between successive ghost steps.
    #[must_use]
    pub fn step_interval(&self) -> u32 {
        self.step_interval
            .unwrap_or_else(|| self.difficulty.step_interval())
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = SessionConfig::from_toml("").expect("empty config parses");

        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.ghosts.step_interval(), 2);
        assert_eq!(config.default_start, CellCoord::new(1, 1));
    }

    #[test]
    fn partial_document_overrides_selected_fields() {
        let config = SessionConfig::from_toml(
            r#"
algorithm = "bfs"
target_strategy = "nearest-safe"
seed = 9

[ghosts]
difficulty = "easy"

[ghosts.policy]
kind = "wander"

[planner]
danger_radius = 2
max_replans = 4
"#,
        )
        .expect("valid config");

        assert_eq!(config.algorithm, SearchAlgorithm::BreadthFirst);
        assert_eq!(config.target_strategy, TargetStrategy::NearestSafe);
        assert_eq!(config.seed, 9);
        assert_eq!(config.ghosts.policy, GhostPolicy::Wander);
        assert_eq!(config.ghosts.step_interval(), 4);
        assert_eq!(config.planner.danger_radius, 2);
        assert_eq!(config.planner.max_replans, 4);
        assert_eq!(config.planner.danger_horizon, 1);
    }

    #[test]
    fn explicit_interval_overrides_difficulty() {
        let config = SessionConfig::from_toml(
            r#"
[ghosts]
difficulty = "extreme"
step_interval = 5
"#,
        )
        .expect("valid config");

        assert_eq!(config.ghosts.step_interval(), 5);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = SessionConfig::from_toml("speed = 3").expect_err("unknown field");

        assert!(matches!(error, SessionError::Config(_)));
    }

    #[test]
    fn patrol_waypoints_are_read_as_cells() {
        let config = SessionConfig::from_toml(
            r#"
[ghosts.policy]
kind = "patrol"
waypoints = [{ row = 1, column = 1 }, { row = 3, column = 5 }]
"#,
        )
        .expect("valid config");

        assert_eq!(
            config.ghosts.policy,
            GhostPolicy::Patrol {
                waypoints: vec![CellCoord::new(1, 1), CellCoord::new(3, 5)],
            }
        );
    }
}
