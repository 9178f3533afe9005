#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Agent decision loop.
//!
//! Each tick the planner walks `SelectTarget -> PlanPath -> Step` until it
//! either proposes a single agent step or decides to idle. The world resolves
//! the step during commit and reports collection and collision back as events,
//! which the planner consumes at the start of the next tick before stepping
//! again. Replanning within a tick is capped by
//! [`PlannerConfig::max_replans`]; once the cap is hit the agent idles and
//! retries on the next tick.
//!
//! Ghost cells are impassable for every strategy. Weighted strategies also pay
//! [`PlannerConfig::danger_penalty`] for each step into the danger zone. When
//! the next step of a route could be reached by a ghost within
//! [`PlannerConfig::danger_horizon`] ticks, the route is dropped and replanned
//! with every such cell blocked.

mod trace;

use std::fmt;

use pellet_chase_core::{
    AgentSnapshot, CellCoord, Command, Event, GameStatus, GhostView, MazeView,
};
use pellet_chase_system_adversary::ThreatModel;
use pellet_chase_system_search::{CostGrid, Pathfinder};
use pellet_chase_system_targeting::{select_target, TargetQuery};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub use trace::PathTrace;

/// Tunables controlling how cautiously the agent plans.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Ticks ahead a ghost's reach is predicted when vetting the next step.
    pub danger_horizon: u32,
    /// Manhattan radius around each ghost forming the danger zone.
    pub danger_radius: u32,
    /// Extra cost weighted strategies pay per step into the danger zone.
    pub danger_penalty: u32,
    /// Replans allowed within one tick before the agent idles.
    pub max_replans: u32,
    /// Ticks between unconditional route recomputations; zero disables them.
    pub replan_interval: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            danger_horizon: 1,
            danger_radius: 3,
            danger_penalty: 5,
            max_replans: 2,
            replan_interval: 30,
        }
    }
}

/// Decision-loop state of the planner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Choosing which pellet to pursue.
    #[default]
    SelectTarget,
    /// Searching for a route to the chosen pellet.
    PlanPath,
    /// Following the current route.
    Step,
    /// Waiting for the world to resolve the proposed step.
    CheckEvents,
    /// The session ended; nothing more is planned.
    Terminal(GameStatus),
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelectTarget => f.write_str("select-target"),
            Self::PlanPath => f.write_str("plan-path"),
            Self::Step => f.write_str("step"),
            Self::CheckEvents => f.write_str("check-events"),
            Self::Terminal(status) => write!(f, "terminal ({status})"),
        }
    }
}

/// Read-only session state the planner decides from.
#[derive(Clone, Copy, Debug)]
pub struct PlannerContext<'a> {
    /// Static maze topology.
    pub maze: MazeView<'a>,
    /// Current agent state.
    pub agent: AgentSnapshot,
    /// Uncollected pellet cells.
    pub pellets: &'a [CellCoord],
    /// Current ghost state.
    pub ghosts: &'a GhostView,
    /// Index of the tick being planned.
    pub tick: u64,
}

/// Why the agent did not step during the last planned tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdleReason {
    /// Every remaining pellet was unreachable this tick.
    NoReachableTarget,
    /// The replan cap was hit before a safe step was found.
    ReplanLimit,
}

/// Snapshot of the planner's most recent decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlannerDiagnostics {
    /// Decision-loop state after the last tick.
    pub phase: Phase,
    /// Pellet currently pursued.
    pub target: Option<CellCoord>,
    /// Steps left on the current route.
    pub remaining_steps: usize,
    /// Replans performed during the last tick.
    pub replans: u32,
    /// Cells expanded by every search since the session started.
    pub expanded_total: u64,
    /// Set when the agent stayed put during the last tick.
    pub idle: Option<IdleReason>,
}

/// Pure system that reacts to world events and proposes agent steps.
#[derive(Debug)]
pub struct Planner {
    config: PlannerConfig,
    pathfinder: Pathfinder,
    costs: Option<CostGrid>,
    phase: Phase,
    target: Option<CellCoord>,
    trace: Option<PathTrace>,
    superseded: Option<PathTrace>,
    checked_at: u64,
    unreachable: Vec<CellCoord>,
    replans: u32,
    expanded_total: u64,
    idle: Option<IdleReason>,
}

impl Planner {
    /// Creates a planner with the provided tunables.
    #[must_use]
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            pathfinder: Pathfinder::new(),
            costs: None,
            phase: Phase::SelectTarget,
            target: None,
            trace: None,
            superseded: None,
            checked_at: 0,
            unreachable: Vec::new(),
            replans: 0,
            expanded_total: 0,
            idle: None,
        }
    }

    /// Current decision-loop state.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Pellet currently pursued.
    #[must_use]
    pub fn target(&self) -> Option<CellCoord> {
        self.target
    }

    /// Most recently planned route.
    #[must_use]
    pub fn trace(&self) -> Option<&PathTrace> {
        self.trace.as_ref()
    }

    /// Summarises the planner's most recent decision for an agent on `agent`.
    #[must_use]
    pub fn diagnostics(&self, agent: CellCoord) -> PlannerDiagnostics {
        let remaining_steps = self
            .trace
            .as_ref()
            .map_or(0, |trace| trace.remaining_steps(agent));
        PlannerDiagnostics {
            phase: self.phase,
            target: self.target,
            remaining_steps,
            replans: self.replans,
            expanded_total: self.expanded_total,
            idle: self.idle,
        }
    }

    /// Consumes world events and the session context to emit agent commands.
    ///
    /// At most one [`Command::StepAgent`] is emitted, and only while a tick is open.
    pub fn handle(
        &mut self,
        events: &[Event],
        context: &PlannerContext<'_>,
        out: &mut Vec<Command>,
    ) {
        let mut tick_opened = false;
        for event in events {
            self.observe(event, &mut tick_opened);
        }

        if !tick_opened || matches!(self.phase, Phase::Terminal(_)) {
            return;
        }

        self.unreachable.clear();
        self.replans = 0;
        self.idle = None;
        self.resume(context);

        let threats = ThreatModel::new(context.maze, context.ghosts);
        let mut cautious = false;
        loop {
            match self.phase {
                Phase::SelectTarget => {
                    if !self.select(context, &threats) {
                        return;
                    }
                }
                Phase::PlanPath => {
                    if !self.plan(context, &threats, cautious) {
                        return;
                    }
                }
                Phase::Step => {
                    match self.step(context, &threats) {
                        StepOutcome::Proposed(command) => {
                            out.push(command);
                            self.phase = Phase::CheckEvents;
                            return;
                        }
                        StepOutcome::Replan { cautiously } => {
                            cautious |= cautiously;
                            if !self.count_replan() {
                                return;
                            }
                        }
                    }
                }
                Phase::CheckEvents | Phase::Terminal(_) => return,
            }
        }
    }

    fn observe(&mut self, event: &Event, tick_opened: &mut bool) {
        match event {
            Event::TimeAdvanced { .. } => *tick_opened = true,
            Event::PelletCollected { cell, .. } => {
                if self.target == Some(*cell) {
                    self.target = None;
                }
                self.invalidate();
            }
            Event::GameOver { status, .. } => {
                self.phase = Phase::Terminal(*status);
                self.invalidate();
            }
            Event::SessionReset => {
                self.phase = Phase::SelectTarget;
                self.target = None;
                self.trace = None;
                self.superseded = None;
                self.checked_at = 0;
                self.expanded_total = 0;
                self.idle = None;
            }
            Event::TargetStrategyChanged { strategy } => {
                debug!(%strategy, "target strategy changed, dropping route");
                self.target = None;
                self.invalidate();
            }
            Event::AlgorithmChanged { from, to } => {
                debug!(%from, %to, "algorithm changed, keeping current route");
            }
            Event::AgentStepRejected { .. } => self.invalidate(),
            _ => {}
        }
    }

    fn invalidate(&mut self) {
        self.trace = None;
        if !matches!(self.phase, Phase::Terminal(_)) {
            self.phase = Phase::PlanPath;
        }
    }

    fn resume(&mut self, context: &PlannerContext<'_>) {
        if let Some(target) = self.target {
            if !context.pellets.contains(&target) {
                self.target = None;
                self.trace = None;
            }
        }

        let interval = u64::from(self.config.replan_interval);
        if self.trace.is_some()
            && interval > 0
            && context.tick.saturating_sub(self.checked_at) >= interval
        {
            debug!(tick = context.tick, "periodic route recalculation");
            self.superseded = self.trace.take();
        }

        self.phase = if self.target.is_none() {
            Phase::SelectTarget
        } else if self.trace.is_none() {
            Phase::PlanPath
        } else {
            Phase::Step
        };
    }

    fn count_replan(&mut self) -> bool {
        self.replans = self.replans.saturating_add(1);
        if self.replans > self.config.max_replans {
            warn!(replans = self.replans, "replan limit reached, idling");
            self.idle = Some(IdleReason::ReplanLimit);
            self.trace = None;
            self.phase = Phase::PlanPath;
            return false;
        }
        self.trace = None;
        self.phase = Phase::PlanPath;
        true
    }

    fn select(&mut self, context: &PlannerContext<'_>, threats: &ThreatModel<'_>) -> bool {
        let ghosts = threats.positions();
        let query = TargetQuery {
            origin: context.agent.cell,
            pellets: context.pellets,
            ghosts: &ghosts,
            danger_radius: self.config.danger_radius,
            excluded: &self.unreachable,
        };

        match select_target(context.agent.target_strategy, &query) {
            Some(target) => {
                debug!(%target, strategy = %context.agent.target_strategy, "target selected");
                self.target = Some(target);
                self.phase = Phase::PlanPath;
                true
            }
            None if context.pellets.is_empty() => {
                self.target = None;
                self.phase = Phase::Terminal(GameStatus::Won);
                false
            }
            None => {
                info!(
                    remaining = context.pellets.len(),
                    "no reachable pellet this tick, idling"
                );
                self.target = None;
                self.idle = Some(IdleReason::NoReachableTarget);
                self.phase = Phase::SelectTarget;
                false
            }
        }
    }

    fn plan(
        &mut self,
        context: &PlannerContext<'_>,
        threats: &ThreatModel<'_>,
        cautious: bool,
    ) -> bool {
        let superseded = self.superseded.take();
        let Some(target) = self.target else {
            self.phase = Phase::SelectTarget;
            return true;
        };
        let algorithm = context.agent.algorithm;
        let costs = self
            .costs
            .get_or_insert_with(|| CostGrid::new(&context.maze));
        price_threats(
            costs,
            &context.maze,
            threats,
            &self.config,
            algorithm.is_weighted(),
            cautious.then_some(context.agent.cell),
        );

        let report = self
            .pathfinder
            .find_path(algorithm, &context.maze, context.agent.cell, target, &*costs);
        self.expanded_total = self
            .expanded_total
            .saturating_add(u64::from(report.expanded));

        match report.path {
            Some(path) => {
                self.checked_at = context.tick;
                if let Some(current) = superseded.filter(|current| {
                    current.target == target
                        && current
                            .path
                            .remaining_after(context.agent.cell)
                            .is_some_and(|ahead| ahead.len() < path.step_count())
                }) {
                    debug!(
                        %algorithm,
                        %target,
                        steps = path.step_count(),
                        remaining = current.remaining_steps(context.agent.cell),
                        "recalculated route is longer, keeping the current one"
                    );
                    self.trace = Some(current);
                    self.phase = Phase::Step;
                    return true;
                }
                debug!(
                    %algorithm,
                    %target,
                    steps = path.step_count(),
                    expanded = report.expanded,
                    cautious,
                    "route planned"
                );
                self.trace = Some(PathTrace {
                    path,
                    algorithm,
                    target,
                    expanded: report.expanded,
                    cost: report.cost,
                    planned_at: context.tick,
                });
                self.phase = Phase::Step;
                true
            }
            None => {
                debug!(%algorithm, %target, from = %context.agent.cell, "target unreachable");
                self.unreachable.push(target);
                self.target = None;
                self.phase = Phase::SelectTarget;
                true
            }
        }
    }

    fn step(&mut self, context: &PlannerContext<'_>, threats: &ThreatModel<'_>) -> StepOutcome {
        let cell = context.agent.cell;
        let Some(trace) = &self.trace else {
            return StepOutcome::Replan { cautiously: false };
        };
        let Some(remaining) = trace.path.remaining_after(cell) else {
            debug!(%cell, "agent left its route");
            return StepOutcome::Replan { cautiously: false };
        };
        let Some(&next) = remaining.first() else {
            self.target = None;
            return StepOutcome::Replan { cautiously: false };
        };

        if remaining.iter().any(|ahead| threats.is_occupied(*ahead)) {
            debug!(%cell, "ghost on route");
            return StepOutcome::Replan { cautiously: false };
        }
        if threats.predicted_danger(next, self.config.danger_horizon) {
            info!(%cell, %next, "next step endangered, replanning cautiously");
            return StepOutcome::Replan { cautiously: true };
        }

        match cell.direction_to(next) {
            Some(direction) => StepOutcome::Proposed(Command::StepAgent { direction }),
            None => StepOutcome::Replan { cautiously: false },
        }
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

enum StepOutcome {
    Proposed(Command),
    Replan { cautiously: bool },
}

fn price_threats(
    costs: &mut CostGrid,
    maze: &MazeView<'_>,
    threats: &ThreatModel<'_>,
    config: &PlannerConfig,
    weighted: bool,
    cautious_from: Option<CellCoord>,
) {
    costs.clear();
    if threats.is_empty() {
        return;
    }

    for ghost in threats.positions() {
        costs.block(ghost);
    }
    if weighted && config.danger_penalty > 0 {
        for cell in threats.danger_zone(config.danger_radius) {
            costs.penalize(cell, config.danger_penalty);
        }
    }
    if let Some(origin) = cautious_from {
        for cell in maze.walkable_cells() {
            if cell != origin && threats.predicted_danger(cell, config.danger_horizon) {
                costs.block(cell);
            }
        }
    }
}
