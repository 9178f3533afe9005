//! Step cost models consulted by every search strategy.

use pellet_chase_core::{CellCoord, MazeView};

/// Prices a single step between two adjacent walkable cells.
///
/// Returning `None` marks the destination as impassable for this search.
/// Unweighted strategies only look at whether a step is passable.
pub trait CostModel {
    /// Cost of moving from `from` into `to`; `None` blocks the step.
    fn step_cost(&self, from: CellCoord, to: CellCoord) -> Option<u32>;
}

/// Every step costs exactly one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnitCost;

impl CostModel for UnitCost {
    fn step_cost(&self, _from: CellCoord, _to: CellCoord) -> Option<u32> {
        Some(1)
    }
}

/// Dense per-cell overlay of extra step costs and blocked cells.
#[derive(Clone, Debug)]
pub struct CostGrid {
    columns: u32,
    rows: u32,
    extra: Vec<u32>,
    blocked: Vec<bool>,
}

impl CostGrid {
    /// Creates an overlay where every step costs one and nothing is blocked.
    #[must_use]
    pub fn new(maze: &MazeView<'_>) -> Self {
        let cells = maze.cell_count();
        Self {
            columns: maze.columns(),
            rows: maze.rows(),
            extra: vec![0; cells],
            blocked: vec![false; cells],
        }
    }

    /// Restores unit costs everywhere.
    pub fn clear(&mut self) {
        self.extra.fill(0);
        self.blocked.fill(false);
    }

    /// Marks the cell as impassable.
    pub fn block(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            self.blocked[index] = true;
        }
    }

    /// Adds `amount` to the cost of stepping into the cell.
    pub fn penalize(&mut self, cell: CellCoord, amount: u32) {
        if let Some(index) = self.index(cell) {
            self.extra[index] = self.extra[index].saturating_add(amount);
        }
    }

    /// Reports whether the cell was blocked.
    #[must_use]
    pub fn is_blocked(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .map(|index| self.blocked[index])
            .unwrap_or(false)
    }

    /// Extra cost charged for stepping into the cell.
    #[must_use]
    pub fn penalty(&self, cell: CellCoord) -> u32 {
        self.index(cell).map(|index| self.extra[index]).unwrap_or(0)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.row() >= self.rows || cell.column() >= self.columns {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }
}

impl CostModel for CostGrid {
    fn step_cost(&self, _from: CellCoord, to: CellCoord) -> Option<u32> {
        if self.is_blocked(to) {
            return None;
        }
        Some(1_u32.saturating_add(self.penalty(to)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pellet_chase_core::Tile;

    #[test]
    fn cost_grid_prices_penalized_cells() {
        let tiles = [Tile::Floor; 6];
        let maze = MazeView::new(&tiles, 2, 3);
        let mut grid = CostGrid::new(&maze);

        grid.penalize(CellCoord::new(0, 1), 4);
        grid.block(CellCoord::new(1, 2));

        let origin = CellCoord::new(0, 0);
        assert_eq!(grid.step_cost(origin, CellCoord::new(1, 0)), Some(1));
        assert_eq!(grid.step_cost(origin, CellCoord::new(0, 1)), Some(5));
        assert_eq!(grid.step_cost(CellCoord::new(0, 2), CellCoord::new(1, 2)), None);

        grid.clear();
        assert_eq!(grid.step_cost(origin, CellCoord::new(0, 1)), Some(1));
        assert!(!grid.is_blocked(CellCoord::new(1, 2)));
    }

    #[test]
    fn out_of_bounds_cells_are_ignored() {
        let tiles = [Tile::Floor; 4];
        let maze = MazeView::new(&tiles, 2, 2);
        let mut grid = CostGrid::new(&maze);

        grid.block(CellCoord::new(5, 5));
        grid.penalize(CellCoord::new(0, 9), 3);

        assert!(!grid.is_blocked(CellCoord::new(5, 5)));
        assert_eq!(grid.penalty(CellCoord::new(0, 9)), 0);
    }
}
