#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pellet selection for the agent.
//!
//! Selection is a pure function of the agent's cell, the uncollected pellets
//! and the ghost positions. Ties always resolve by lowest row and then lowest
//! column, so repeated calls with the same inputs pick the same pellet.

use std::cmp::Reverse;

use pellet_chase_core::{CellCoord, TargetStrategy};

/// Inputs consulted when picking the next pellet.
#[derive(Clone, Copy, Debug)]
pub struct TargetQuery<'a> {
    /// Cell the agent currently occupies.
    pub origin: CellCoord,
    /// Uncollected pellet cells.
    pub pellets: &'a [CellCoord],
    /// Cells currently occupied by ghosts.
    pub ghosts: &'a [CellCoord],
    /// Manhattan radius around each ghost considered unsafe.
    pub danger_radius: u32,
    /// Pellets that must not be chosen, such as ones found unreachable this tick.
    pub excluded: &'a [CellCoord],
}

impl TargetQuery<'_> {
    fn candidates(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.pellets
            .iter()
            .copied()
            .filter(|pellet| !self.excluded.contains(pellet))
    }

    fn ghost_clearance(&self, cell: CellCoord) -> Option<u32> {
        self.ghosts
            .iter()
            .map(|ghost| ghost.manhattan_distance(cell))
            .min()
    }

    fn is_safe(&self, cell: CellCoord) -> bool {
        self.ghost_clearance(cell)
            .map_or(true, |clearance| clearance > self.danger_radius)
    }

    fn nearest(&self, filter: impl Fn(CellCoord) -> bool) -> Option<CellCoord> {
        self.candidates()
            .filter(|cell| filter(*cell))
            .min_by_key(|cell| (self.origin.manhattan_distance(*cell), *cell))
    }
}

/// Picks the pellet the agent should pursue next.
///
/// Returns `None` only when no candidate pellet remains.
#[must_use]
pub fn select_target(strategy: TargetStrategy, query: &TargetQuery<'_>) -> Option<CellCoord> {
    match strategy {
        TargetStrategy::Nearest => query.nearest(|_| true),
        TargetStrategy::NearestSafe => query
            .nearest(|cell| query.is_safe(cell))
            .or_else(|| query.nearest(|_| true)),
        TargetStrategy::FurthestFromGhosts => {
            if query.ghosts.is_empty() {
                return query.nearest(|_| true);
            }
            query.candidates().min_by_key(|cell| {
                (
                    Reverse(query.ghost_clearance(*cell).unwrap_or(u32::MAX)),
                    query.origin.manhattan_distance(*cell),
                    *cell,
                )
            })
        }
    }
}
