//! Static reachability field used to validate maze connectivity.

use std::collections::VecDeque;

use pellet_chase_core::{CellCoord, MazeView};

/// Dense breadth-first distance grid seeded from one or more cells.
///
/// Distances default to `u32::MAX` for walls and for walkable cells that the
/// seeds cannot reach, so callers can tell disconnected pockets apart.
#[derive(Clone, Debug, Default)]
pub(crate) struct NavigationField {
    distances: Vec<u32>,
}

impl NavigationField {
    /// Rebuilds the distances using a breadth-first flood from `seeds`.
    pub(crate) fn rebuild(&mut self, maze: &MazeView<'_>, seeds: &[CellCoord]) {
        let cell_count = maze.cell_count();
        if self.distances.len() != cell_count {
            self.distances = vec![u32::MAX; cell_count];
        } else {
            self.distances.fill(u32::MAX);
        }

        let mut queue = VecDeque::new();
        for &seed in seeds {
            if !maze.is_walkable(seed) {
                continue;
            }
            let Some(index) = maze.index(seed) else {
                continue;
            };
            if self.distances[index] == 0 {
                continue;
            }
            self.distances[index] = 0;
            queue.push_back(seed);
        }

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = maze.index(cell) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);

            for neighbor in maze.neighbors(cell) {
                let Some(neighbor_index) = maze.index(neighbor) else {
                    continue;
                };
                if self.distances[neighbor_index] <= next_distance {
                    continue;
                }
                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Distance captured for the provided cell, if it was reached.
    #[must_use]
    pub(crate) fn distance(&self, maze: &MazeView<'_>, cell: CellCoord) -> Option<u32> {
        let index = maze.index(cell)?;
        self.distances
            .get(index)
            .copied()
            .filter(|distance| *distance != u32::MAX)
    }

    /// First walkable cell, in row-major order, that the flood never reached.
    #[must_use]
    pub(crate) fn first_unreached(&self, maze: &MazeView<'_>) -> Option<CellCoord> {
        maze.walkable_cells()
            .find(|cell| self.distance(maze, *cell).is_none())
    }
}
