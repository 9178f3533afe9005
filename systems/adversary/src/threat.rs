//! Danger predicates derived from the current ghost positions.

use std::collections::VecDeque;

use pellet_chase_core::{CellCoord, GhostSnapshot, GhostView, MazeView};

/// Read-only assessment of where ghosts are and where they can be soon.
#[derive(Clone, Debug)]
pub struct ThreatModel<'a> {
    maze: MazeView<'a>,
    threats: Vec<Threat>,
}

#[derive(Clone, Debug)]
struct Threat {
    ghost: GhostSnapshot,
    distances: Vec<u32>,
}

impl<'a> ThreatModel<'a> {
    /// Captures the ghosts and floods the maze from each of them.
    #[must_use]
    pub fn new(maze: MazeView<'a>, ghosts: &GhostView) -> Self {
        let threats = ghosts
            .iter()
            .map(|ghost| Threat {
                distances: flood(&maze, ghost.cell),
                ghost: ghost.clone(),
            })
            .collect();
        Self { maze, threats }
    }

    /// Cells currently occupied by ghosts, in identifier order.
    #[must_use]
    pub fn positions(&self) -> Vec<CellCoord> {
        self.threats.iter().map(|threat| threat.ghost.cell).collect()
    }

    /// Reports whether no ghosts are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.threats.is_empty()
    }

    /// Reports whether a ghost stands on the cell right now.
    #[must_use]
    pub fn is_occupied(&self, cell: CellCoord) -> bool {
        self.threats.iter().any(|threat| threat.ghost.cell == cell)
    }

    /// Reports whether a ghost occupies or can reach the cell within `horizon` ticks.
    ///
    /// The current tick counts as the first tick of the horizon. Reachability
    /// follows the maze graph and each ghost's cadence, so it over-approximates
    /// policies that would not actually head for the cell.
    #[must_use]
    pub fn predicted_danger(&self, cell: CellCoord, horizon: u32) -> bool {
        let Some(index) = self.maze.index(cell) else {
            return false;
        };
        self.threats.iter().any(|threat| {
            if threat.ghost.cell == cell {
                return true;
            }
            let reach = threat.ghost.steps_within(horizon);
            threat
                .distances
                .get(index)
                .is_some_and(|distance| *distance <= reach)
        })
    }

    /// Reports whether the cell lies within Manhattan `radius` of any ghost.
    #[must_use]
    pub fn in_danger_zone(&self, cell: CellCoord, radius: u32) -> bool {
        self.nearest_ghost_distance(cell)
            .is_some_and(|distance| distance <= radius)
    }

    /// Manhattan distance from the cell to the closest ghost.
    #[must_use]
    pub fn nearest_ghost_distance(&self, cell: CellCoord) -> Option<u32> {
        self.threats
            .iter()
            .map(|threat| threat.ghost.cell.manhattan_distance(cell))
            .min()
    }

    /// Every walkable cell inside the danger zone, in row-major order.
    #[must_use]
    pub fn danger_zone(&self, radius: u32) -> Vec<CellCoord> {
        if self.threats.is_empty() {
            return Vec::new();
        }
        self.maze
            .walkable_cells()
            .filter(|cell| self.in_danger_zone(*cell, radius))
            .collect()
    }
}

fn flood(maze: &MazeView<'_>, origin: CellCoord) -> Vec<u32> {
    let mut distances = vec![u32::MAX; maze.cell_count()];
    let Some(origin_index) = maze.index(origin) else {
        return distances;
    };
    distances[origin_index] = 0;
    let mut queue = VecDeque::from([origin]);

    while let Some(cell) = queue.pop_front() {
        let Some(index) = maze.index(cell) else {
            continue;
        };
        let next = distances[index].saturating_add(1);
        for neighbor in maze.neighbors(cell) {
            let Some(neighbor_index) = maze.index(neighbor) else {
                continue;
            };
            if distances[neighbor_index] <= next {
                continue;
            }
            distances[neighbor_index] = next;
            queue.push_back(neighbor);
        }
    }

    distances
}
