use pellet_chase_core::{CellCoord, Path, SearchAlgorithm};
use serde::Serialize;

/// Most recent route the agent committed to, kept for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PathTrace {
    /// Route from the agent's cell at planning time to the target.
    pub path: Path,
    /// Strategy that produced the route.
    pub algorithm: SearchAlgorithm,
    /// Pellet the route leads to.
    pub target: CellCoord,
    /// Cells expanded while searching.
    pub expanded: u32,
    /// Summed step cost under the cost model used for the search.
    pub cost: Option<u32>,
    /// Tick during which the route was planned.
    pub planned_at: u64,
}

impl PathTrace {
    /// Steps still ahead of an agent standing on `cell`.
    #[must_use]
    pub fn remaining_steps(&self, cell: CellCoord) -> usize {
        self.path
            .remaining_after(cell)
            .map_or(0, <[CellCoord]>::len)
    }
}
