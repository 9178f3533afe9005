#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ghost behaviour: the movement system that drives ghosts each tick and the
//! threat model the agent consults before committing to a step.

mod threat;

use std::collections::BTreeMap;

use pellet_chase_core::{
    CellCoord, Command, Direction, Event, GhostId, GhostPolicy, GhostSnapshot, GhostView,
    MazeView, SearchAlgorithm,
};
use pellet_chase_system_search::{Pathfinder, UnitCost};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

pub use threat::ThreatModel;

/// Pure system that reacts to world events and proposes ghost steps.
#[derive(Debug)]
pub struct Adversaries {
    seed: u64,
    rng: ChaCha8Rng,
    pathfinder: Pathfinder,
    patrol_progress: BTreeMap<GhostId, usize>,
    headings: BTreeMap<GhostId, Direction>,
}

impl Adversaries {
    /// Creates the system with a deterministic seed for wandering ghosts.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            pathfinder: Pathfinder::new(),
            patrol_progress: BTreeMap::new(),
            headings: BTreeMap::new(),
        }
    }

    /// Consumes world events and immutable views to emit ghost step commands.
    ///
    /// Steps are only proposed while a tick is open and only for ghosts whose
    /// cadence allows a step this tick.
    pub fn handle(
        &mut self,
        events: &[Event],
        maze: &MazeView<'_>,
        ghosts: &GhostView,
        agent: CellCoord,
        out: &mut Vec<Command>,
    ) {
        let mut tick_opened = false;
        for event in events {
            match event {
                Event::TimeAdvanced { .. } => tick_opened = true,
                Event::GhostMoved { ghost, from, to } => {
                    if let Some(direction) = from.direction_to(*to) {
                        let _ = self.headings.insert(*ghost, direction);
                    }
                }
                Event::SessionReset => self.reset(),
                _ => {}
            }
        }

        if !tick_opened {
            return;
        }

        for ghost in ghosts.iter() {
            if !ghost.ready_for_step() {
                continue;
            }
            let Some(direction) = self.choose_direction(ghost, maze, agent) else {
                continue;
            };
            debug!(ghost = %ghost.id, cell = %ghost.cell, ?direction, "ghost step proposed");
            out.push(Command::StepGhost {
                ghost: ghost.id,
                direction,
            });
        }
    }

    fn reset(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.patrol_progress.clear();
        self.headings.clear();
    }

    fn choose_direction(
        &mut self,
        ghost: &GhostSnapshot,
        maze: &MazeView<'_>,
        agent: CellCoord,
    ) -> Option<Direction> {
        match &ghost.policy {
            GhostPolicy::Pursue => self.next_hop(maze, ghost.cell, agent),
            GhostPolicy::Patrol { waypoints } => {
                let target = self.patrol_target(ghost, waypoints)?;
                self.next_hop(maze, ghost.cell, target)
            }
            GhostPolicy::Wander => self.wander(ghost, maze),
            GhostPolicy::Stationary => None,
        }
    }

    fn next_hop(
        &mut self,
        maze: &MazeView<'_>,
        from: CellCoord,
        to: CellCoord,
    ) -> Option<Direction> {
        let report =
            self.pathfinder
                .find_path(SearchAlgorithm::BreadthFirst, maze, from, to, &UnitCost);
        let next = report.path?.next_hop_from(from)?;
        from.direction_to(next)
    }

    fn patrol_target(
        &mut self,
        ghost: &GhostSnapshot,
        waypoints: &[CellCoord],
    ) -> Option<CellCoord> {
        if waypoints.is_empty() {
            return None;
        }
        let progress = self.patrol_progress.entry(ghost.id).or_insert(0);
        for _ in 0..waypoints.len() {
            let target = waypoints[*progress % waypoints.len()];
            if target != ghost.cell {
                return Some(target);
            }
            *progress = (*progress + 1) % waypoints.len();
        }
        None
    }

    fn wander(&mut self, ghost: &GhostSnapshot, maze: &MazeView<'_>) -> Option<Direction> {
        let reverse = self
            .headings
            .get(&ghost.id)
            .map(|heading| heading.opposite());
        let mut options: Vec<Direction> = maze
            .neighbors(ghost.cell)
            .filter_map(|neighbor| ghost.cell.direction_to(neighbor))
            .collect();
        if options.len() > 1 {
            options.retain(|direction| Some(*direction) != reverse);
        }
        if options.is_empty() {
            return None;
        }
        let pick = self.rng.gen_range(0..options.len());
        Some(options[pick])
    }
}

impl Default for Adversaries {
    fn default() -> Self {
        Self::new(0)
    }
}
