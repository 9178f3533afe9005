use std::{path::PathBuf, str::FromStr};

use anyhow::{anyhow, Context};
use clap::{Parser, ValueEnum};
use pellet_chase_core::{CellCoord, Difficulty, GhostPolicy, SearchAlgorithm, TargetStrategy};
use pellet_chase_session::SessionConfig;

/// Command-line arguments accepted by the `pellet-chase` binary.
#[derive(Debug, Parser)]
#[command(name = "pellet-chase", version)]
#[command(about = "Runs an autonomous pellet-collecting agent through a maze", long_about = None)]
pub(crate) struct Cli {
    /// Maze layout file; the built-in maze is used when omitted
    #[arg(short, long, value_name = "FILE")]
    pub(crate) layout: Option<PathBuf>,

    /// Session configuration in TOML; flags below override it
    #[arg(short, long, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,

    /// Search algorithm (bfs, dfs, astar, ucs)
    #[arg(short, long, value_name = "NAME")]
    pub(crate) algorithm: Option<SearchAlgorithm>,

    /// Pellet selection strategy (nearest, nearest-safe, furthest-from-ghosts)
    #[arg(short, long, value_name = "NAME")]
    pub(crate) strategy: Option<TargetStrategy>,

    /// Movement policy of ghosts placed by the layout
    #[arg(long, value_enum)]
    pub(crate) ghost_policy: Option<PolicyArg>,

    /// Ghost speed preset (easy, medium, hard, extreme)
    #[arg(long, value_name = "LEVEL")]
    pub(crate) difficulty: Option<Difficulty>,

    /// Ticks between ghost steps, overriding the difficulty preset
    #[arg(long, value_name = "TICKS")]
    pub(crate) ghost_interval: Option<u32>,

    /// Manhattan radius of the danger zone around each ghost
    #[arg(long, value_name = "CELLS")]
    pub(crate) danger_radius: Option<u32>,

    /// Extra cost per step into the danger zone for weighted searches
    #[arg(long, value_name = "COST")]
    pub(crate) danger_penalty: Option<u32>,

    /// Replans allowed within one tick
    #[arg(long, value_name = "COUNT")]
    pub(crate) max_replans: Option<u32>,

    /// Ticks between unconditional route recomputations (0 disables)
    #[arg(long, value_name = "TICKS")]
    pub(crate) replan_interval: Option<u32>,

    /// Pellet count the layout must contain
    #[arg(long, value_name = "COUNT")]
    pub(crate) expected_pellets: Option<u32>,

    /// Agent start for numeric layouts, as ROW,COLUMN
    #[arg(long, value_name = "ROW,COLUMN", value_parser = parse_cell)]
    pub(crate) start: Option<CellCoord>,

    /// Seed for wandering ghosts
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Upper bound on the number of ticks to run
    #[arg(long, value_name = "TICKS")]
    pub(crate) max_ticks: Option<u64>,

    /// Switch algorithms once a tick completes, as TICK:NAME (repeatable)
    #[arg(long = "switch", value_name = "TICK:NAME")]
    pub(crate) switches: Vec<AlgorithmSwitch>,

    /// Stop the run after this tick
    #[arg(long, value_name = "TICK")]
    pub(crate) quit_at: Option<u64>,

    /// Emit one JSON report per tick on stdout
    #[arg(long)]
    pub(crate) json: bool,

    /// Run the maze under every algorithm and print a comparison table
    #[arg(long, conflicts_with_all = ["json", "switches"])]
    pub(crate) compare: bool,

    /// Log filter, e.g. `debug` or `pellet_chase_system_planner=trace`
    #[arg(long, value_name = "FILTER")]
    pub(crate) log_level: Option<String>,
}

impl Cli {
    /// Layers the flags given on the command line over `config`.
    pub(crate) fn apply_overrides(&self, config: &mut SessionConfig) {
        if let Some(algorithm) = self.algorithm {
            config.algorithm = algorithm;
        }
        if let Some(strategy) = self.strategy {
            config.target_strategy = strategy;
        }
        if let Some(policy) = self.ghost_policy {
            config.ghosts.policy = policy.into();
        }
        if let Some(difficulty) = self.difficulty {
            config.ghosts.difficulty = difficulty;
        }
        if self.ghost_interval.is_some() {
            config.ghosts.step_interval = self.ghost_interval;
        }
        if let Some(radius) = self.danger_radius {
            config.planner.danger_radius = radius;
        }
        if let Some(penalty) = self.danger_penalty {
            config.planner.danger_penalty = penalty;
        }
        if let Some(replans) = self.max_replans {
            config.planner.max_replans = replans;
        }
        if let Some(interval) = self.replan_interval {
            config.planner.replan_interval = interval;
        }
        if self.expected_pellets.is_some() {
            config.expected_pellets = self.expected_pellets;
        }
        if let Some(start) = self.start {
            config.default_start = start;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.max_ticks.is_some() {
            config.max_ticks = self.max_ticks;
        }
    }
}

/// Ghost policies selectable from the command line.
///
/// Patrol routes need waypoints and are only available from a config file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum PolicyArg {
    /// Chase the agent along the shortest route.
    Pursue,
    /// Move to a random neighbour, avoiding reversals.
    Wander,
    /// Never move.
    Stationary,
}

impl From<PolicyArg> for GhostPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Pursue => GhostPolicy::Pursue,
            PolicyArg::Wander => GhostPolicy::Wander,
            PolicyArg::Stationary => GhostPolicy::Stationary,
        }
    }
}

/// Algorithm change scheduled for the end of a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct AlgorithmSwitch {
    pub(crate) tick: u64,
    pub(crate) algorithm: String,
}

impl FromStr for AlgorithmSwitch {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (tick, algorithm) = value
            .split_once(':')
            .ok_or_else(|| anyhow!("expected TICK:NAME, got '{value}'"))?;
        let tick = tick
            .trim()
            .parse()
            .with_context(|| format!("invalid tick in '{value}'"))?;
        Ok(Self {
            tick,
            algorithm: algorithm.trim().to_owned(),
        })
    }
}

fn parse_cell(value: &str) -> anyhow::Result<CellCoord> {
    let (row, column) = value
        .split_once(',')
        .ok_or_else(|| anyhow!("expected ROW,COLUMN, got '{value}'"))?;
    let row = row
        .trim()
        .parse()
        .with_context(|| format!("invalid row in '{value}'"))?;
    let column = column
        .trim()
        .parse()
        .with_context(|| format!("invalid column in '{value}'"))?;
    Ok(CellCoord::new(row, column))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_configuration_values() {
        let cli = Cli::parse_from([
            "pellet-chase",
            "--algorithm",
            "bfs",
            "--ghost-policy",
            "wander",
            "--danger-radius",
            "2",
            "--start",
            "3,4",
            "--seed",
            "11",
        ]);
        let mut config = SessionConfig::default();

        cli.apply_overrides(&mut config);

        assert_eq!(config.algorithm, SearchAlgorithm::BreadthFirst);
        assert_eq!(config.ghosts.policy, GhostPolicy::Wander);
        assert_eq!(config.planner.danger_radius, 2);
        assert_eq!(config.default_start, CellCoord::new(3, 4));
        assert_eq!(config.seed, 11);
        assert_eq!(config.target_strategy, TargetStrategy::Nearest);
    }

    #[test]
    fn switches_are_parsed_in_order_given() {
        let cli = Cli::parse_from(["pellet-chase", "--switch", "5:ucs", "--switch", "2: dfs"]);

        assert_eq!(
            cli.switches,
            vec![
                AlgorithmSwitch {
                    tick: 5,
                    algorithm: "ucs".to_owned(),
                },
                AlgorithmSwitch {
                    tick: 2,
                    algorithm: "dfs".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(Cli::try_parse_from(["pellet-chase", "--start", "3"]).is_err());
        assert!(Cli::try_parse_from(["pellet-chase", "--switch", "soon:bfs"]).is_err());
        assert!(Cli::try_parse_from(["pellet-chase", "--algorithm", "greedy"]).is_err());
    }
}
