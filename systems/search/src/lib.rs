#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Graph search strategies the agent plans its routes with.
//!
//! All four strategies share one contract: given a maze, a source, a goal and
//! a cost model they either return a contiguous [`Path`] or report that the
//! goal is unreachable. Frontiers are explicit queues, stacks and heaps owned
//! by a reusable [`Pathfinder`], so repeated searches do not reallocate.

mod cost;

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, VecDeque},
};

use pellet_chase_core::{CellCoord, MazeView, Path, SearchAlgorithm};
use tracing::debug;

pub use cost::{CostGrid, CostModel, UnitCost};

/// Outcome of a single search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchReport {
    /// Strategy that produced the report.
    pub algorithm: SearchAlgorithm,
    /// Route from source to goal, or `None` when the goal is unreachable.
    pub path: Option<Path>,
    /// Number of cells removed from the frontier and expanded.
    pub expanded: u32,
    /// Total step cost of the path under the supplied cost model.
    pub cost: Option<u32>,
}

impl SearchReport {
    fn not_found(algorithm: SearchAlgorithm, expanded: u32) -> Self {
        Self {
            algorithm,
            path: None,
            expanded,
            cost: None,
        }
    }

    /// Reports whether a route was found.
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.path.is_some()
    }
}

type FrontierKey = Reverse<(u32, u32, u64, CellCoord)>;

/// Reusable search workspace.
#[derive(Debug, Default)]
pub struct Pathfinder {
    parents: Vec<Option<CellCoord>>,
    best: Vec<u32>,
    closed: Vec<bool>,
    queue: VecDeque<CellCoord>,
    stack: Vec<(CellCoord, Option<CellCoord>)>,
    heap: BinaryHeap<FrontierKey>,
    neighbors: Vec<CellCoord>,
}

impl Pathfinder {
    /// Creates an empty workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Searches for a route from `source` to `goal` with the requested strategy.
    ///
    /// Both endpoints must be walkable; otherwise the goal is reported as
    /// unreachable without expanding anything. Steps the cost model refuses are
    /// never taken. Weighted strategies minimise the summed step cost while the
    /// unweighted ones only treat the model as a passability filter.
    pub fn find_path<C>(
        &mut self,
        algorithm: SearchAlgorithm,
        maze: &MazeView<'_>,
        source: CellCoord,
        goal: CellCoord,
        costs: &C,
    ) -> SearchReport
    where
        C: CostModel + ?Sized,
    {
        if !maze.is_walkable(source) || !maze.is_walkable(goal) {
            return SearchReport::not_found(algorithm, 0);
        }

        self.prepare(maze.cell_count());
        let (reached, expanded) = match algorithm {
            SearchAlgorithm::BreadthFirst => self.breadth_first(maze, source, goal, costs),
            SearchAlgorithm::DepthFirst => self.depth_first(maze, source, goal, costs),
            SearchAlgorithm::BestFirst => {
                self.best_first(maze, source, goal, costs, |cell| cell.manhattan_distance(goal))
            }
            SearchAlgorithm::UniformCost => self.best_first(maze, source, goal, costs, |_| 0),
        };

        let path = if reached {
            self.reconstruct(maze, goal)
        } else {
            None
        };
        let cost = path.as_ref().and_then(|path| path_cost(path, costs));
        debug!(
            %algorithm,
            %source,
            %goal,
            expanded,
            found = path.is_some(),
            "search finished"
        );

        SearchReport {
            algorithm,
            path,
            expanded,
            cost,
        }
    }

    fn prepare(&mut self, cell_count: usize) {
        self.parents.clear();
        self.parents.resize(cell_count, None);
        self.best.clear();
        self.best.resize(cell_count, u32::MAX);
        self.closed.clear();
        self.closed.resize(cell_count, false);
        self.queue.clear();
        self.stack.clear();
        self.heap.clear();
    }

    fn breadth_first<C>(
        &mut self,
        maze: &MazeView<'_>,
        source: CellCoord,
        goal: CellCoord,
        costs: &C,
    ) -> (bool, u32)
    where
        C: CostModel + ?Sized,
    {
        let mut expanded = 0_u32;
        let Some(source_index) = maze.index(source) else {
            return (false, expanded);
        };
        self.closed[source_index] = true;
        self.queue.push_back(source);

        while let Some(cell) = self.queue.pop_front() {
            expanded = expanded.saturating_add(1);
            if cell == goal {
                return (true, expanded);
            }

            for neighbor in maze.neighbors(cell) {
                if costs.step_cost(cell, neighbor).is_none() {
                    continue;
                }
                let Some(index) = maze.index(neighbor) else {
                    continue;
                };
                if self.closed[index] {
                    continue;
                }
                self.closed[index] = true;
                self.parents[index] = Some(cell);
                self.queue.push_back(neighbor);
            }
        }

        (false, expanded)
    }

    fn depth_first<C>(
        &mut self,
        maze: &MazeView<'_>,
        source: CellCoord,
        goal: CellCoord,
        costs: &C,
    ) -> (bool, u32)
    where
        C: CostModel + ?Sized,
    {
        let mut expanded = 0_u32;
        self.stack.push((source, None));

        while let Some((cell, parent)) = self.stack.pop() {
            let Some(index) = maze.index(cell) else {
                continue;
            };
            if self.closed[index] {
                continue;
            }
            self.closed[index] = true;
            self.parents[index] = parent;
            expanded = expanded.saturating_add(1);
            if cell == goal {
                return (true, expanded);
            }

            self.neighbors.clear();
            self.neighbors.extend(maze.neighbors(cell));
            // Reversed so the first expansion direction is popped first.
            for &neighbor in self.neighbors.iter().rev() {
                if costs.step_cost(cell, neighbor).is_none() {
                    continue;
                }
                let Some(neighbor_index) = maze.index(neighbor) else {
                    continue;
                };
                if !self.closed[neighbor_index] {
                    self.stack.push((neighbor, Some(cell)));
                }
            }
        }

        (false, expanded)
    }

    fn best_first<C, H>(
        &mut self,
        maze: &MazeView<'_>,
        source: CellCoord,
        goal: CellCoord,
        costs: &C,
        heuristic: H,
    ) -> (bool, u32)
    where
        C: CostModel + ?Sized,
        H: Fn(CellCoord) -> u32,
    {
        let mut expanded = 0_u32;
        let mut sequence = 0_u64;
        let Some(source_index) = maze.index(source) else {
            return (false, expanded);
        };
        self.best[source_index] = 0;
        let estimate = heuristic(source);
        self.heap
            .push(Reverse((estimate, estimate, sequence, source)));

        while let Some(Reverse((_, _, _, cell))) = self.heap.pop() {
            let Some(index) = maze.index(cell) else {
                continue;
            };
            if self.closed[index] {
                continue;
            }
            self.closed[index] = true;
            expanded = expanded.saturating_add(1);
            if cell == goal {
                return (true, expanded);
            }

            let travelled = self.best[index];
            for neighbor in maze.neighbors(cell) {
                let Some(step) = costs.step_cost(cell, neighbor) else {
                    continue;
                };
                let Some(neighbor_index) = maze.index(neighbor) else {
                    continue;
                };
                let tentative = travelled.saturating_add(step);
                if tentative >= self.best[neighbor_index] {
                    continue;
                }
                self.best[neighbor_index] = tentative;
                self.parents[neighbor_index] = Some(cell);
                self.closed[neighbor_index] = false;
                sequence += 1;
                let remaining = heuristic(neighbor);
                self.heap.push(Reverse((
                    tentative.saturating_add(remaining),
                    remaining,
                    sequence,
                    neighbor,
                )));
            }
        }

        (false, expanded)
    }

    fn reconstruct(&self, maze: &MazeView<'_>, goal: CellCoord) -> Option<Path> {
        let mut cells = vec![goal];
        let mut current = goal;
        while let Some(parent) = maze.index(current).and_then(|index| self.parents[index]) {
            if cells.len() > self.parents.len() {
                return None;
            }
            cells.push(parent);
            current = parent;
        }
        cells.reverse();
        Path::new(cells).ok()
    }
}

/// Sums the step costs along a path under the provided model.
///
/// Returns `None` when the model refuses any step of the path.
pub fn path_cost<C>(path: &Path, costs: &C) -> Option<u32>
where
    C: CostModel + ?Sized,
{
    path.cells().windows(2).try_fold(0_u32, |total, pair| {
        costs
            .step_cost(pair[0], pair[1])
            .map(|step| total.saturating_add(step))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pellet_chase_core::Tile;

    fn tiles(rows: &[&str]) -> (Vec<Tile>, u32, u32) {
        let tiles = rows
            .iter()
            .flat_map(|row| row.chars())
            .map(|symbol| if symbol == '#' { Tile::Wall } else { Tile::Floor })
            .collect();
        let columns = u32::try_from(rows[0].len()).expect("narrow row");
        let height = u32::try_from(rows.len()).expect("few rows");
        (tiles, height, columns)
    }

    const LOOP: [&str; 5] = ["#####", "#...#", "#.#.#", "#...#", "#####"];

    #[test]
    fn every_strategy_finds_a_route_around_the_pillar() {
        let (tiles, rows, columns) = tiles(&LOOP);
        let maze = MazeView::new(&tiles, rows, columns);
        let mut pathfinder = Pathfinder::new();

        for algorithm in SearchAlgorithm::ALL {
            let report = pathfinder.find_path(
                algorithm,
                &maze,
                CellCoord::new(1, 1),
                CellCoord::new(3, 3),
                &UnitCost,
            );
            let path = report.path.expect("route exists");
            assert_eq!(path.source(), CellCoord::new(1, 1));
            assert_eq!(path.goal(), CellCoord::new(3, 3));
            assert_eq!(report.cost, Some(4), "{algorithm} returned a detour");
            assert!(report.expanded > 0);
        }
    }

    #[test]
    fn best_first_prefers_cells_closer_to_the_goal() {
        let (tiles, rows, columns) = tiles(&LOOP);
        let maze = MazeView::new(&tiles, rows, columns);
        let mut pathfinder = Pathfinder::new();

        let report = pathfinder.find_path(
            SearchAlgorithm::BestFirst,
            &maze,
            CellCoord::new(1, 1),
            CellCoord::new(3, 3),
            &UnitCost,
        );

        // South is queued before east and both tie on f and h.
        let path = report.path.expect("route exists");
        assert_eq!(path.cells()[1], CellCoord::new(2, 1));
    }

    #[test]
    fn breadth_first_expands_north_before_south() {
        let (tiles, rows, columns) = tiles(&["###", "#.#", "#.#", "#.#", "###"]);
        let maze = MazeView::new(&tiles, rows, columns);
        let mut pathfinder = Pathfinder::new();

        let report = pathfinder.find_path(
            SearchAlgorithm::BreadthFirst,
            &maze,
            CellCoord::new(2, 1),
            CellCoord::new(3, 1),
            &UnitCost,
        );

        assert_eq!(report.expanded, 3);
        assert_eq!(report.cost, Some(1));
    }

    #[test]
    fn depth_first_dives_north_first() {
        let (tiles, rows, columns) = tiles(&["#####", "#...#", "#...#", "#####"]);
        let maze = MazeView::new(&tiles, rows, columns);
        let mut pathfinder = Pathfinder::new();

        let report = pathfinder.find_path(
            SearchAlgorithm::DepthFirst,
            &maze,
            CellCoord::new(2, 1),
            CellCoord::new(2, 3),
            &UnitCost,
        );

        let path = report.path.expect("route exists");
        assert_eq!(path.cells()[1], CellCoord::new(1, 1));
        assert_eq!(path.goal(), CellCoord::new(2, 3));
    }

    #[test]
    fn unreachable_goals_are_reported_not_found() {
        let (tiles, rows, columns) = tiles(&["#####", "#.#.#", "#####"]);
        let maze = MazeView::new(&tiles, rows, columns);
        let mut pathfinder = Pathfinder::new();

        for algorithm in SearchAlgorithm::ALL {
            let report = pathfinder.find_path(
                algorithm,
                &maze,
                CellCoord::new(1, 1),
                CellCoord::new(1, 3),
                &UnitCost,
            );
            assert!(!report.is_found());
            assert_eq!(report.cost, None);
        }
    }

    #[test]
    fn walls_are_never_valid_endpoints() {
        let (tiles, rows, columns) = tiles(&LOOP);
        let maze = MazeView::new(&tiles, rows, columns);
        let mut pathfinder = Pathfinder::new();

        let report = pathfinder.find_path(
            SearchAlgorithm::UniformCost,
            &maze,
            CellCoord::new(1, 1),
            CellCoord::new(2, 2),
            &UnitCost,
        );

        assert_eq!(report, SearchReport::not_found(SearchAlgorithm::UniformCost, 0));
    }

    #[test]
    fn source_equal_to_goal_yields_a_single_cell_path() {
        let (tiles, rows, columns) = tiles(&LOOP);
        let maze = MazeView::new(&tiles, rows, columns);
        let mut pathfinder = Pathfinder::new();

        let report = pathfinder.find_path(
            SearchAlgorithm::DepthFirst,
            &maze,
            CellCoord::new(3, 3),
            CellCoord::new(3, 3),
            &UnitCost,
        );

        let path = report.path.expect("trivial route");
        assert_eq!(path.cells(), &[CellCoord::new(3, 3)]);
        assert_eq!(report.cost, Some(0));
    }

    #[test]
    fn weighted_strategies_detour_around_penalties() {
        let (tiles, rows, columns) = tiles(&LOOP);
        let maze = MazeView::new(&tiles, rows, columns);
        let mut grid = CostGrid::new(&maze);
        grid.penalize(CellCoord::new(2, 1), 10);
        let mut pathfinder = Pathfinder::new();

        for algorithm in [SearchAlgorithm::BestFirst, SearchAlgorithm::UniformCost] {
            let report = pathfinder.find_path(
                algorithm,
                &maze,
                CellCoord::new(1, 1),
                CellCoord::new(3, 3),
                &grid,
            );
            let path = report.path.expect("route exists");
            assert!(!path.contains(CellCoord::new(2, 1)));
            assert_eq!(report.cost, Some(4));
        }

        let unweighted = pathfinder.find_path(
            SearchAlgorithm::BreadthFirst,
            &maze,
            CellCoord::new(1, 1),
            CellCoord::new(3, 3),
            &grid,
        );
        assert!(unweighted
            .path
            .expect("route exists")
            .contains(CellCoord::new(2, 1)));
    }

    #[test]
    fn blocked_cells_are_impassable_for_every_strategy() {
        let (tiles, rows, columns) = tiles(&LOOP);
        let maze = MazeView::new(&tiles, rows, columns);
        let mut grid = CostGrid::new(&maze);
        grid.block(CellCoord::new(2, 1));
        grid.block(CellCoord::new(1, 2));
        let mut pathfinder = Pathfinder::new();

        for algorithm in SearchAlgorithm::ALL {
            let report = pathfinder.find_path(
                algorithm,
                &maze,
                CellCoord::new(1, 1),
                CellCoord::new(3, 3),
                &grid,
            );
            assert!(!report.is_found(), "{algorithm} crossed a blocked cell");
        }
    }
}
