#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick orchestration for a single Pellet Chase session.
//!
//! A [`Session`] owns the world and every system. One call to
//! [`Session::tick`] opens a tick, lets the planner and the ghosts propose
//! their steps against the same snapshot, and commits those steps atomically.
//! Events produced by the commit are delivered to the systems when the next
//! tick opens.

mod config;
mod report;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use pellet_chase_core::{
    CellCoord, Command, Event, GameStatus, GhostId, GhostPolicy, SearchAlgorithm, TargetStrategy,
};
use pellet_chase_system_adversary::Adversaries;
use pellet_chase_system_planner::{Planner, PlannerContext};
use pellet_chase_world::{self as world, query, Maze, MazeError, World};
use thiserror::Error;
use tracing::{debug, info};

pub use config::{GhostConfig, SessionConfig};
pub use report::{RunSummary, TickReport};

/// Reasons a session cannot be created or a control request cannot be honoured.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The layout failed to parse or validate.
    #[error("invalid maze layout: {0}")]
    Maze(#[from] MazeError),
    /// The configuration document failed to parse.
    #[error("invalid session configuration: {0}")]
    Config(#[from] toml::de::Error),
    /// An algorithm switch named an unknown algorithm.
    #[error("unknown search algorithm '{name}'")]
    UnknownAlgorithm {
        /// Rejected label.
        name: String,
    },
    /// An algorithm switch used a key outside `1..=4`.
    #[error("no search algorithm is bound to key {key}")]
    UnknownHotkey {
        /// Rejected key.
        key: u8,
    },
    /// A ghost could not be placed on the requested cell.
    #[error("cannot place a ghost on {cell}")]
    GhostPlacement {
        /// Requested cell.
        cell: CellCoord,
    },
}

/// Shared flag that asks a running session to stop at the next tick boundary.
#[derive(Clone, Debug, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    /// Creates a lowered signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a stop.
    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Reports whether a stop was requested.
    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Lowers the signal again.
    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// A running Pellet Chase session.
#[derive(Debug)]
pub struct Session {
    world: World,
    planner: Planner,
    adversaries: Adversaries,
    pending: Vec<Event>,
    stop: StopSignal,
}

impl Session {
    /// Loads the layout and prepares a session at tick zero.
    ///
    /// Layout problems are reported here, before any tick runs.
    pub fn new(layout: &str, config: SessionConfig) -> Result<Self, SessionError> {
        let maze = Maze::parse_with(layout, &config.layout_options())?;
        Ok(Self::from_maze(maze, config))
    }

    /// Prepares a session around an already validated maze.
    #[must_use]
    pub fn from_maze(maze: Maze, config: SessionConfig) -> Self {
        let ghost_starts = maze.ghost_starts().to_vec();
        let mut session = Self {
            world: World::new(maze),
            planner: Planner::new(config.planner),
            adversaries: Adversaries::new(config.seed),
            pending: Vec::new(),
            stop: StopSignal::new(),
        };

        let _ = session.apply(Command::SwitchAlgorithm {
            algorithm: config.algorithm,
        });
        let _ = session.apply(Command::SetTargetStrategy {
            strategy: config.target_strategy,
        });
        let step_interval = config.ghosts.step_interval();
        for cell in ghost_starts {
            let _ = session.apply(Command::SpawnGhost {
                cell,
                policy: config.ghosts.policy.clone(),
                step_interval,
            });
        }

        info!(
            rows = query::maze(&session.world).rows(),
            columns = query::maze(&session.world).columns(),
            pellets = query::total_pellets(&session.world),
            ghosts = query::ghost_view(&session.world).len(),
            algorithm = %config.algorithm,
            "session ready"
        );
        session
    }

    fn apply(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.pending.extend(events.iter().cloned());
        events
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        query::status(&self.world)
    }

    /// Handle that stops [`Session::run`] at the next tick boundary.
    #[must_use]
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Activates the algorithm named by `name`, such as `"bfs"` or `"astar"`.
    ///
    /// Unknown names leave the active algorithm untouched.
    pub fn switch_algorithm(&mut self, name: &str) -> Result<SearchAlgorithm, SessionError> {
        let events = self.apply(Command::SwitchAlgorithmNamed {
            name: name.to_owned(),
        });
        if events
            .iter()
            .any(|event| matches!(event, Event::AlgorithmSwitchRejected { .. }))
        {
            return Err(SessionError::UnknownAlgorithm {
                name: name.to_owned(),
            });
        }
        Ok(query::agent(&self.world).algorithm)
    }

    /// Activates the algorithm bound to a numeric switch key.
    pub fn switch_algorithm_hotkey(&mut self, key: u8) -> Result<SearchAlgorithm, SessionError> {
        let algorithm =
            SearchAlgorithm::from_hotkey(key).ok_or(SessionError::UnknownHotkey { key })?;
        let _ = self.apply(Command::SwitchAlgorithm { algorithm });
        Ok(algorithm)
    }

    /// Activates a pellet selection strategy.
    pub fn set_target_strategy(&mut self, strategy: TargetStrategy) {
        let _ = self.apply(Command::SetTargetStrategy { strategy });
    }

    /// Freezes or resumes the tick clock.
    pub fn set_paused(&mut self, paused: bool) {
        let _ = self.apply(Command::SetPaused { paused });
    }

    /// Flips the pause state, returning the new state.
    pub fn toggle_pause(&mut self) -> bool {
        let paused = !query::is_paused(&self.world);
        self.set_paused(paused);
        paused
    }

    /// Adds a ghost to the maze.
    pub fn spawn_ghost(
        &mut self,
        cell: CellCoord,
        policy: GhostPolicy,
        step_interval: u32,
    ) -> Result<GhostId, SessionError> {
        let events = self.apply(Command::SpawnGhost {
            cell,
            policy,
            step_interval,
        });
        events
            .iter()
            .find_map(|event| match event {
                Event::GhostSpawned { ghost, .. } => Some(*ghost),
                _ => None,
            })
            .ok_or(SessionError::GhostPlacement { cell })
    }

    /// Relocates a ghost instantly.
    pub fn teleport_ghost(&mut self, ghost: GhostId, cell: CellCoord) -> Result<(), SessionError> {
        let events = self.apply(Command::TeleportGhost { ghost, cell });
        if events
            .iter()
            .any(|event| matches!(event, Event::GhostPlacementRejected { .. }))
        {
            return Err(SessionError::GhostPlacement { cell });
        }
        Ok(())
    }

    /// Restores the loaded maze, pellets, agent and ghosts.
    pub fn restart(&mut self) {
        let _ = self.apply(Command::Reset);
        self.stop.clear();
    }

    /// Runs one tick and reports the resulting state.
    pub fn tick(&mut self) -> TickReport {
        let mut events = std::mem::take(&mut self.pending);
        world::apply(&mut self.world, Command::Tick, &mut events);

        let mut commands = Vec::new();
        {
            let pellets = query::pellet_cells(&self.world);
            let ghosts = query::ghost_view(&self.world);
            let agent = query::agent(&self.world);
            let context = PlannerContext {
                maze: query::maze_view(&self.world),
                agent,
                pellets: &pellets,
                ghosts: &ghosts,
                tick: query::tick_index(&self.world),
            };
            self.planner.handle(&events, &context, &mut commands);
            self.adversaries
                .handle(&events, &context.maze, &ghosts, agent.cell, &mut commands);
        }

        let mut resolved = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut resolved);
        }
        world::apply(&mut self.world, Command::CommitTick, &mut resolved);
        debug!(
            tick = query::tick_index(&self.world),
            events = resolved.len(),
            "tick committed"
        );
        self.pending.extend(resolved);

        self.report()
    }

    /// Describes the current state without advancing time.
    #[must_use]
    pub fn report(&self) -> TickReport {
        TickReport::capture(&self.world, &self.planner)
    }

    /// Ticks until the session ends, `max_ticks` ticks ran, or a stop is requested.
    pub fn run<F>(&mut self, max_ticks: u64, mut on_tick: F) -> RunSummary
    where
        F: FnMut(&TickReport),
    {
        let mut ticks = 0;
        let mut stopped = false;
        while ticks < max_ticks && !self.status().is_terminal() {
            if self.stop.is_raised() {
                info!(tick = query::tick_index(&self.world), "stop requested");
                stopped = true;
                break;
            }
            let report = self.tick();
            on_tick(&report);
            ticks += 1;
        }

        RunSummary::capture(&self.world, &self.planner, ticks, stopped)
    }
}
