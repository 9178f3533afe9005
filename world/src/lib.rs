#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Pellet Chase.
//!
//! The world owns the maze, the pellet set, the agent and the ghosts. It is
//! only ever mutated through [`apply`]; systems observe it through the
//! [`query`] module. Agent and ghost steps are queued during a tick and only
//! take effect together when [`Command::CommitTick`] resolves them, so a tick
//! is never observed half-applied.

mod maze;
mod navigation;

use pellet_chase_core::{
    CellCoord, Command, Direction, Event, GameStatus, GhostId, GhostPolicy, SearchAlgorithm,
    TargetStrategy,
};
use tracing::{debug, info, warn};

pub use maze::{LayoutOptions, Maze, MazeError, DEFAULT_NUMERIC_START};

/// Represents the authoritative Pellet Chase world state.
#[derive(Debug)]
pub struct World {
    maze: Maze,
    pellets: PelletGrid,
    score: u32,
    agent: Agent,
    ghosts: Vec<Ghost>,
    spawns: Vec<GhostSpawn>,
    next_ghost_id: u32,
    status: GameStatus,
    outcome_reason: Option<String>,
    paused: bool,
    tick_index: u64,
    frame: StepFrame,
}

impl World {
    /// Creates a new world around a validated maze.
    #[must_use]
    pub fn new(maze: Maze) -> Self {
        let pellets = PelletGrid::from_maze(&maze);
        let agent = Agent::at(maze.start());
        Self {
            pellets,
            score: 0,
            agent,
            ghosts: Vec::new(),
            spawns: Vec::new(),
            next_ghost_id: 0,
            status: GameStatus::Running,
            outcome_reason: None,
            paused: false,
            tick_index: 0,
            frame: StepFrame::default(),
            maze,
        }
    }

    fn ghost_mut(&mut self, ghost: GhostId) -> Option<&mut Ghost> {
        self.ghosts.iter_mut().find(|candidate| candidate.id == ghost)
    }

    fn ghost_at(&self, cell: CellCoord) -> Option<GhostId> {
        self.ghosts
            .iter()
            .find(|ghost| ghost.cell == cell)
            .map(|ghost| ghost.id)
    }

    fn finish(&mut self, status: GameStatus, reason: String, out_events: &mut Vec<Event>) {
        info!(%status, %reason, tick = self.tick_index, "session finished");
        self.status = status;
        self.outcome_reason = Some(reason.clone());
        self.frame.clear();
        out_events.push(Event::GameOver { status, reason });
    }

    fn check_collision(&mut self, out_events: &mut Vec<Event>) -> bool {
        let Some(ghost) = self.ghost_at(self.agent.cell) else {
            return false;
        };
        let reason = format!("caught by {ghost} at {}", self.agent.cell);
        self.finish(GameStatus::Lost, reason, out_events);
        true
    }

    fn open_tick(&mut self, out_events: &mut Vec<Event>) {
        if self.status.is_terminal() || self.paused {
            return;
        }

        self.tick_index = self.tick_index.saturating_add(1);
        self.frame.clear();
        for ghost in &mut self.ghosts {
            ghost.cooldown = ghost.cooldown.saturating_sub(1);
        }
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        if self.check_collision(out_events) {
            return;
        }
        if self.pellets.remaining() == 0 {
            self.finish(
                GameStatus::Won,
                String::from("no pellets left to collect"),
                out_events,
            );
        }
    }

    fn commit_tick(&mut self, out_events: &mut Vec<Event>) {
        if self.status.is_terminal() || self.paused {
            self.frame.clear();
            return;
        }

        let view = self.maze.view();

        if let Some(direction) = self.frame.agent.take() {
            let from = self.agent.cell;
            match from.step(direction).filter(|cell| view.is_walkable(*cell)) {
                Some(to) => {
                    self.agent.cell = to;
                    self.agent.facing = direction;
                    debug!(%from, %to, "agent advanced");
                    out_events.push(Event::AgentMoved { from, to });
                }
                None => {
                    warn!(%from, ?direction, "agent step rejected");
                    out_events.push(Event::AgentStepRejected { direction });
                }
            }
        }

        for request in self.frame.drain_sorted() {
            let Some(ghost) = self
                .ghosts
                .iter_mut()
                .find(|ghost| ghost.id == request.ghost)
            else {
                continue;
            };
            if ghost.cooldown > 0 {
                continue;
            }
            let from = ghost.cell;
            let Some(to) = from
                .step(request.direction)
                .filter(|cell| view.is_walkable(*cell))
            else {
                continue;
            };
            ghost.cell = to;
            ghost.cooldown = ghost.step_interval;
            out_events.push(Event::GhostMoved {
                ghost: ghost.id,
                from,
                to,
            });
        }

        if self.check_collision(out_events) {
            return;
        }

        let view = self.maze.view();
        let cell = self.agent.cell;
        if self.pellets.take(&view, cell) {
            self.score = self.score.saturating_add(1);
            let remaining = self.pellets.remaining();
            info!(%cell, score = self.score, remaining, "pellet collected");
            out_events.push(Event::PelletCollected {
                cell,
                score: self.score,
                remaining,
            });

            if remaining == 0 {
                let reason = format!("all {} pellets collected", self.maze.pellet_count());
                self.finish(GameStatus::Won, reason, out_events);
            }
        }
    }

    fn spawn_ghost(
        &mut self,
        cell: CellCoord,
        policy: GhostPolicy,
        step_interval: u32,
        out_events: &mut Vec<Event>,
    ) {
        if !self.maze.view().is_walkable(cell) {
            warn!(%cell, "ghost spawn rejected");
            out_events.push(Event::GhostPlacementRejected { ghost: None, cell });
            return;
        }

        let spawn = GhostSpawn {
            cell,
            policy,
            step_interval: step_interval.max(1),
        };
        let ghost = Ghost::from_spawn(GhostId::new(self.next_ghost_id), &spawn);
        self.next_ghost_id = self.next_ghost_id.saturating_add(1);
        debug!(ghost = %ghost.id, %cell, "ghost spawned");
        out_events.push(Event::GhostSpawned {
            ghost: ghost.id,
            cell,
        });
        self.ghosts.push(ghost);
        self.spawns.push(spawn);
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.pellets = PelletGrid::from_maze(&self.maze);
        self.score = 0;
        self.agent.cell = self.maze.start();
        self.agent.facing = Direction::West;
        self.ghosts = self
            .spawns
            .iter()
            .zip(0..)
            .map(|(spawn, id)| Ghost::from_spawn(GhostId::new(id), spawn))
            .collect();
        self.status = GameStatus::Running;
        self.outcome_reason = None;
        self.paused = false;
        self.tick_index = 0;
        self.frame.clear();
        info!("session reset");
        out_events.push(Event::SessionReset);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => world.open_tick(out_events),
        Command::StepAgent { direction } => {
            if !world.status.is_terminal() {
                world.frame.agent = Some(direction);
            }
        }
        Command::StepGhost { ghost, direction } => {
            if !world.status.is_terminal() {
                world.frame.queue(StepRequest { ghost, direction });
            }
        }
        Command::CommitTick => world.commit_tick(out_events),
        Command::SwitchAlgorithm { algorithm } => {
            switch_algorithm(world, algorithm, out_events);
        }
        Command::SwitchAlgorithmNamed { name } => match name.parse::<SearchAlgorithm>() {
            Ok(algorithm) => switch_algorithm(world, algorithm, out_events),
            Err(error) => {
                warn!(%error, active = %world.agent.algorithm, "algorithm switch rejected");
                out_events.push(Event::AlgorithmSwitchRejected { name });
            }
        },
        Command::SetTargetStrategy { strategy } => {
            if world.agent.target_strategy != strategy {
                world.agent.target_strategy = strategy;
                info!(%strategy, "target strategy changed");
                out_events.push(Event::TargetStrategyChanged { strategy });
            }
        }
        Command::SetPaused { paused } => {
            if world.paused != paused {
                world.paused = paused;
                world.frame.clear();
                info!(paused, "pause toggled");
                out_events.push(Event::PauseChanged { paused });
            }
        }
        Command::SpawnGhost {
            cell,
            policy,
            step_interval,
        } => world.spawn_ghost(cell, policy, step_interval, out_events),
        Command::TeleportGhost { ghost, cell } => {
            let walkable = world.maze.view().is_walkable(cell);
            match world.ghost_mut(ghost) {
                Some(target) if walkable => {
                    let from = target.cell;
                    target.cell = cell;
                    debug!(%ghost, %from, to = %cell, "ghost teleported");
                    out_events.push(Event::GhostMoved {
                        ghost,
                        from,
                        to: cell,
                    });
                }
                _ => {
                    warn!(%ghost, %cell, "ghost teleport rejected");
                    out_events.push(Event::GhostPlacementRejected {
                        ghost: Some(ghost),
                        cell,
                    });
                }
            }
        }
        Command::Reset => world.reset(out_events),
    }
}

fn switch_algorithm(world: &mut World, algorithm: SearchAlgorithm, out_events: &mut Vec<Event>) {
    let from = world.agent.algorithm;
    if from == algorithm {
        return;
    }
    world.agent.algorithm = algorithm;
    info!(%from, to = %algorithm, "search algorithm changed");
    out_events.push(Event::AlgorithmChanged {
        from,
        to: algorithm,
    });
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use pellet_chase_core::{
        AgentSnapshot, CellCoord, GameStatus, GhostSnapshot, GhostView, MazeView,
    };

    use super::{Maze, World};

    /// Provides read-only access to the loaded maze.
    #[must_use]
    pub fn maze(world: &World) -> &Maze {
        &world.maze
    }

    /// Exposes the maze topology as a searchable graph.
    #[must_use]
    pub fn maze_view(world: &World) -> MazeView<'_> {
        world.maze.view()
    }

    /// Captures the agent's current state.
    #[must_use]
    pub fn agent(world: &World) -> AgentSnapshot {
        AgentSnapshot {
            cell: world.agent.cell,
            facing: world.agent.facing,
            algorithm: world.agent.algorithm,
            target_strategy: world.agent.target_strategy,
        }
    }

    /// Captures a read-only view of the ghosts inhabiting the maze.
    #[must_use]
    pub fn ghost_view(world: &World) -> GhostView {
        GhostView::from_snapshots(
            world
                .ghosts
                .iter()
                .map(|ghost| GhostSnapshot {
                    id: ghost.id,
                    cell: ghost.cell,
                    policy: ghost.policy.clone(),
                    step_interval: ghost.step_interval,
                    cooldown: ghost.cooldown,
                })
                .collect(),
        )
    }

    /// Uncollected pellet cells in row-major order.
    #[must_use]
    pub fn pellet_cells(world: &World) -> Vec<CellCoord> {
        world.pellets.cells(&world.maze.view())
    }

    /// Reports whether an uncollected pellet lies on the provided cell.
    #[must_use]
    pub fn has_pellet(world: &World, cell: CellCoord) -> bool {
        world.pellets.contains(&world.maze.view(), cell)
    }

    /// Pellets collected so far.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Pellets present when the maze was loaded.
    #[must_use]
    pub fn total_pellets(world: &World) -> u32 {
        world.maze.pellet_count()
    }

    /// Pellets still uncollected.
    #[must_use]
    pub fn remaining_pellets(world: &World) -> u32 {
        world.pellets.remaining()
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Explanation of the terminal status, once one is reached.
    #[must_use]
    pub fn outcome_reason(world: &World) -> Option<&str> {
        world.outcome_reason.as_deref()
    }

    /// Reports whether ticks are currently ignored.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Index of the most recently opened tick.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[derive(Clone, Copy, Debug)]
struct Agent {
    cell: CellCoord,
    facing: Direction,
    algorithm: SearchAlgorithm,
    target_strategy: TargetStrategy,
}

impl Agent {
    fn at(cell: CellCoord) -> Self {
        Self {
            cell,
            facing: Direction::West,
            algorithm: SearchAlgorithm::default(),
            target_strategy: TargetStrategy::default(),
        }
    }
}

#[derive(Clone, Debug)]
struct Ghost {
    id: GhostId,
    cell: CellCoord,
    policy: GhostPolicy,
    step_interval: u32,
    cooldown: u32,
}

impl Ghost {
    fn from_spawn(id: GhostId, spawn: &GhostSpawn) -> Self {
        Self {
            id,
            cell: spawn.cell,
            policy: spawn.policy.clone(),
            step_interval: spawn.step_interval,
            cooldown: spawn.step_interval,
        }
    }
}

#[derive(Clone, Debug)]
struct GhostSpawn {
    cell: CellCoord,
    policy: GhostPolicy,
    step_interval: u32,
}

#[derive(Clone, Copy, Debug)]
struct StepRequest {
    ghost: GhostId,
    direction: Direction,
}

#[derive(Debug, Default)]
struct StepFrame {
    agent: Option<Direction>,
    ghosts: Vec<StepRequest>,
}

impl StepFrame {
    fn clear(&mut self) {
        self.agent = None;
        self.ghosts.clear();
    }

    fn queue(&mut self, request: StepRequest) {
        if self.ghosts.iter().any(|queued| queued.ghost == request.ghost) {
            return;
        }
        self.ghosts.push(request);
    }

    fn drain_sorted(&mut self) -> Vec<StepRequest> {
        self.ghosts.sort_by_key(|request| request.ghost);
        self.ghosts.drain(..).collect()
    }
}

#[derive(Clone, Debug)]
struct PelletGrid {
    cells: Vec<bool>,
    remaining: u32,
}

impl PelletGrid {
    fn from_maze(maze: &Maze) -> Self {
        let view = maze.view();
        let mut cells = vec![false; view.cell_count()];
        for pellet in maze.pellets() {
            if let Some(index) = view.index(*pellet) {
                cells[index] = true;
            }
        }
        Self {
            cells,
            remaining: maze.pellet_count(),
        }
    }

    fn remaining(&self) -> u32 {
        self.remaining
    }

    fn contains(&self, view: &pellet_chase_core::MazeView<'_>, cell: CellCoord) -> bool {
        view.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    fn take(&mut self, view: &pellet_chase_core::MazeView<'_>, cell: CellCoord) -> bool {
        let Some(slot) = view.index(cell).and_then(|index| self.cells.get_mut(index)) else {
            return false;
        };
        if !*slot {
            return false;
        }
        *slot = false;
        self.remaining = self.remaining.saturating_sub(1);
        true
    }

    fn cells(&self, view: &pellet_chase_core::MazeView<'_>) -> Vec<CellCoord> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, present)| **present)
            .filter_map(|(index, _)| view.cell_at(index))
            .collect()
    }
}
