//! Per-tick output consumed by adapters and external visualisers.

use pellet_chase_core::{CellCoord, Direction, GameStatus, SearchAlgorithm, TargetStrategy};
use pellet_chase_system_planner::{PathTrace, Planner, PlannerDiagnostics};
use pellet_chase_world::{query, World};
use serde::Serialize;

/// State published after every tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// Index of the most recent tick.
    pub tick: u64,
    /// Lifecycle status after the tick.
    pub status: GameStatus,
    /// Explanation of a terminal status.
    pub reason: Option<String>,
    /// Whether the tick clock is frozen.
    pub paused: bool,
    /// Cell occupied by the agent.
    pub agent: CellCoord,
    /// Direction of the agent's most recent step.
    pub facing: Direction,
    /// Algorithm the agent plans with.
    pub algorithm: SearchAlgorithm,
    /// Strategy the agent selects pellets with.
    pub target_strategy: TargetStrategy,
    /// Pellets collected so far.
    pub score: u32,
    /// Pellets present when the maze was loaded.
    pub total_pellets: u32,
    /// Cells currently occupied by ghosts.
    pub ghosts: Vec<CellCoord>,
    /// Most recently planned route.
    pub path: Option<PathTrace>,
    /// Planner decision snapshot.
    pub decision: PlannerDiagnostics,
}

impl TickReport {
    pub(crate) fn capture(world: &World, planner: &Planner) -> Self {
        let agent = query::agent(world);
        Self {
            tick: query::tick_index(world),
            status: query::status(world),
            reason: query::outcome_reason(world).map(str::to_owned),
            paused: query::is_paused(world),
            agent: agent.cell,
            facing: agent.facing,
            algorithm: agent.algorithm,
            target_strategy: agent.target_strategy,
            score: query::score(world),
            total_pellets: query::total_pellets(world),
            ghosts: query::ghost_view(world).positions(),
            path: planner.trace().cloned(),
            decision: planner.diagnostics(agent.cell),
        }
    }

    /// Renders the report as a single JSON line.
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Outcome of [`crate::Session::run`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Ticks executed during the run.
    pub ticks: u64,
    /// Lifecycle status when the run ended.
    pub status: GameStatus,
    /// Explanation of a terminal status.
    pub reason: Option<String>,
    /// Pellets collected.
    pub score: u32,
    /// Pellets present when the maze was loaded.
    pub total_pellets: u32,
    /// Cells expanded by every search of the session.
    pub expanded_total: u64,
    /// Set when the run ended because a stop was requested.
    pub stopped: bool,
}

impl RunSummary {
    pub(crate) fn capture(world: &World, planner: &Planner, ticks: u64, stopped: bool) -> Self {
        let agent = query::agent(world).cell;
        Self {
            ticks,
            status: query::status(world),
            reason: query::outcome_reason(world).map(str::to_owned),
            score: query::score(world),
            total_pellets: query::total_pellets(world),
            expanded_total: planner.diagnostics(agent).expanded_total,
            stopped,
        }
    }
}
