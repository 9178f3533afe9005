use std::fmt::Write as _;

use pellet_chase_core::{CellCoord, Tile};
use pellet_chase_session::RunSummary;
use pellet_chase_world::{query, World};

/// Draws the maze with its current occupants using the symbolic layout alphabet.
pub(crate) fn frame(world: &World) -> String {
    let view = query::maze_view(world);
    let agent = query::agent(world).cell;
    let ghosts = query::ghost_view(world);
    let line_breaks = usize::try_from(view.rows()).unwrap_or_default();
    let mut out = String::with_capacity(view.cell_count() + line_breaks);

    for row in 0..view.rows() {
        for column in 0..view.columns() {
            let cell = CellCoord::new(row, column);
            let symbol = if cell == agent {
                'P'
            } else if ghosts.occupies(cell) {
                'G'
            } else if query::has_pellet(world, cell) {
                '.'
            } else if view.tile(cell) == Some(Tile::Wall) {
                '#'
            } else {
                ' '
            };
            out.push(symbol);
        }
        out.push('\n');
    }
    out
}

/// One-line outcome of a run.
pub(crate) fn summary(summary: &RunSummary) -> String {
    let mut line = format!(
        "{} after {} ticks: score {}/{}, {} cells expanded",
        summary.status, summary.ticks, summary.score, summary.total_pellets, summary.expanded_total
    );
    if let Some(reason) = &summary.reason {
        let _ = write!(line, " ({reason})");
    }
    if summary.stopped {
        line.push_str(" [stopped]");
    }
    line
}
