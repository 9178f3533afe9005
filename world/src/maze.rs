//! Maze layouts: parsing, validation, and the immutable topology they produce.

use pellet_chase_core::{CellCoord, MazeView, Tile};
use thiserror::Error;

use crate::navigation::NavigationField;

/// Start cell used by numeric layouts, which carry no start marker.
pub const DEFAULT_NUMERIC_START: CellCoord = CellCoord::new(1, 1);

/// Reasons a layout cannot be turned into a playable maze.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MazeError {
    /// The layout contained no rows.
    #[error("layout is empty")]
    Empty,
    /// A row's width differs from the first row.
    #[error("row {row} has {found} cells but the first row has {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: u32,
        /// Width of the first row.
        expected: u32,
        /// Width of the offending row.
        found: u32,
    },
    /// A cell used a symbol outside the layout alphabet.
    #[error("unknown layout symbol {symbol:?} at {cell}")]
    UnknownSymbol {
        /// Cell holding the symbol.
        cell: CellCoord,
        /// Offending symbol.
        symbol: char,
    },
    /// The layout exceeds the addressable grid size.
    #[error("layout dimensions exceed the supported grid size")]
    TooLarge,
    /// A symbolic layout carried no agent start marker.
    #[error("layout has no agent start marker 'P'")]
    MissingStart,
    /// A symbolic layout carried more than one agent start marker.
    #[error("layout has a second agent start marker at {second} (first at {first})")]
    DuplicateStart {
        /// First marker encountered.
        first: CellCoord,
        /// Second marker encountered.
        second: CellCoord,
    },
    /// Every cell is a wall.
    #[error("layout has no walkable cells")]
    NoWalkableCells,
    /// The agent would start inside a wall or outside the grid.
    #[error("agent start {cell} is not walkable")]
    StartNotWalkable {
        /// Requested start cell.
        cell: CellCoord,
    },
    /// A walkable cell cannot be reached from the agent's start.
    #[error("walkable cell {cell} is not reachable from the agent start")]
    Disconnected {
        /// First unreachable cell in row-major order.
        cell: CellCoord,
    },
    /// The layout's pellet count differs from the declared count.
    #[error("layout holds {found} pellets but {expected} were expected")]
    PelletCountMismatch {
        /// Declared pellet count.
        expected: u32,
        /// Pellets found in the layout.
        found: u32,
    },
}

/// Options applied while loading a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Agent start used when the layout carries no start marker.
    pub default_start: CellCoord,
    /// Pellet count the layout must match, if declared.
    pub expected_pellets: Option<u32>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            default_start: DEFAULT_NUMERIC_START,
            expected_pellets: None,
        }
    }
}

/// Immutable maze topology together with its initial occupants.
///
/// A maze is only ever constructed from a layout that passed validation: it
/// has at least one walkable cell, the agent starts on a walkable cell, and
/// every walkable cell is reachable from that start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    tiles: Vec<Tile>,
    rows: u32,
    columns: u32,
    start: CellCoord,
    ghost_starts: Vec<CellCoord>,
    pellets: Vec<CellCoord>,
}

impl Maze {
    /// Parses a layout with default options.
    ///
    /// Two layout formats are accepted. Symbolic layouts use `#` for walls,
    /// `.` or `o` for pellets, space or `_` for empty floor, `P` for the
    /// agent start and `G` for ghost starts. Numeric layouts separate `0`
    /// (floor), `1` (wall) and `2` (pellet) by whitespace and take the agent
    /// start from [`LayoutOptions::default_start`].
    pub fn parse(text: &str) -> Result<Self, MazeError> {
        Self::parse_with(text, &LayoutOptions::default())
    }

    /// Parses a layout with the provided options.
    pub fn parse_with(text: &str, options: &LayoutOptions) -> Result<Self, MazeError> {
        let rows = if is_numeric(text) {
            lex_numeric(text)?
        } else {
            lex_symbolic(text)?
        };
        Self::assemble(rows, options)
    }

    fn assemble(rows: Vec<Vec<Symbol>>, options: &LayoutOptions) -> Result<Self, MazeError> {
        let Some(first_row) = rows.first() else {
            return Err(MazeError::Empty);
        };
        let expected = u32::try_from(first_row.len()).map_err(|_| MazeError::TooLarge)?;
        if expected == 0 {
            return Err(MazeError::Empty);
        }
        let row_count = u32::try_from(rows.len()).map_err(|_| MazeError::TooLarge)?;

        let mut tiles = Vec::with_capacity(rows.len() * first_row.len());
        let mut start: Option<CellCoord> = None;
        let mut ghost_starts = Vec::new();
        let mut pellets = Vec::new();

        for (row_index, row) in (0..row_count).zip(rows.iter()) {
            let found = u32::try_from(row.len()).map_err(|_| MazeError::TooLarge)?;
            if found != expected {
                return Err(MazeError::RaggedRow {
                    row: row_index,
                    expected,
                    found,
                });
            }

            for (column_index, symbol) in (0..expected).zip(row.iter()) {
                let cell = CellCoord::new(row_index, column_index);
                match symbol {
                    Symbol::Wall => tiles.push(Tile::Wall),
                    Symbol::Floor => tiles.push(Tile::Floor),
                    Symbol::Pellet => {
                        tiles.push(Tile::Floor);
                        pellets.push(cell);
                    }
                    Symbol::Start => {
                        if let Some(first) = start {
                            return Err(MazeError::DuplicateStart {
                                first,
                                second: cell,
                            });
                        }
                        start = Some(cell);
                        tiles.push(Tile::Floor);
                    }
                    Symbol::Ghost => {
                        ghost_starts.push(cell);
                        tiles.push(Tile::Floor);
                    }
                    Symbol::Unknown(symbol) => {
                        return Err(MazeError::UnknownSymbol {
                            cell,
                            symbol: *symbol,
                        });
                    }
                }
            }
        }

        if !tiles.iter().any(|tile| *tile == Tile::Floor) {
            return Err(MazeError::NoWalkableCells);
        }

        let start = start.unwrap_or(options.default_start);
        let view = MazeView::new(&tiles, row_count, expected);
        if !view.is_walkable(start) {
            return Err(MazeError::StartNotWalkable { cell: start });
        }

        let mut field = NavigationField::default();
        field.rebuild(&view, &[start]);
        if let Some(cell) = field.first_unreached(&view) {
            return Err(MazeError::Disconnected { cell });
        }

        // The agent occupies its start from the outset, so nothing can be collected there.
        pellets.retain(|cell| *cell != start);
        let pellet_count = u32::try_from(pellets.len()).map_err(|_| MazeError::TooLarge)?;
        if let Some(expected_pellets) = options.expected_pellets {
            if expected_pellets != pellet_count {
                return Err(MazeError::PelletCountMismatch {
                    expected: expected_pellets,
                    found: pellet_count,
                });
            }
        }

        Ok(Self {
            tiles,
            rows: row_count,
            columns: expected,
            start,
            ghost_starts,
            pellets,
        })
    }

    /// Read-only graph view over the maze topology.
    #[must_use]
    pub fn view(&self) -> MazeView<'_> {
        MazeView::new(&self.tiles, self.rows, self.columns)
    }

    /// Number of rows in the maze.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the maze.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Cell the agent starts on.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Cells marked as ghost starts, in row-major order.
    #[must_use]
    pub fn ghost_starts(&self) -> &[CellCoord] {
        &self.ghost_starts
    }

    /// Cells holding a pellet at load time, in row-major order.
    #[must_use]
    pub fn pellets(&self) -> &[CellCoord] {
        &self.pellets
    }

    /// Number of pellets present at load time.
    #[must_use]
    pub fn pellet_count(&self) -> u32 {
        u32::try_from(self.pellets.len()).unwrap_or(u32::MAX)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Symbol {
    Wall,
    Floor,
    Pellet,
    Start,
    Ghost,
    Unknown(char),
}

fn is_numeric(text: &str) -> bool {
    let mut saw_digit = false;
    for character in text.chars() {
        match character {
            '0' | '1' | '2' => saw_digit = true,
            character if character.is_whitespace() => {}
            _ => return false,
        }
    }
    saw_digit
}

fn lex_numeric(text: &str) -> Result<Vec<Vec<Symbol>>, MazeError> {
    let rows: Vec<Vec<Symbol>> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.split_whitespace()
                .map(|token| match token {
                    "0" => Symbol::Floor,
                    "1" => Symbol::Wall,
                    "2" => Symbol::Pellet,
                    other => Symbol::Unknown(other.chars().next().unwrap_or('?')),
                })
                .collect()
        })
        .collect();

    if rows.is_empty() {
        return Err(MazeError::Empty);
    }
    Ok(rows)
}

fn lex_symbolic(text: &str) -> Result<Vec<Vec<Symbol>>, MazeError> {
    let mut rows: Vec<Vec<Symbol>> = text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .map(|line| {
            line.chars()
                .map(|symbol| match symbol {
                    '#' => Symbol::Wall,
                    ' ' | '_' => Symbol::Floor,
                    '.' | 'o' => Symbol::Pellet,
                    'P' => Symbol::Start,
                    'G' => Symbol::Ghost,
                    other => Symbol::Unknown(other),
                })
                .collect()
        })
        .collect();

    while rows.first().is_some_and(Vec::is_empty) {
        let _ = rows.remove(0);
    }
    while rows.last().is_some_and(Vec::is_empty) {
        let _ = rows.pop();
    }

    if rows.is_empty() {
        return Err(MazeError::Empty);
    }
    if rows.iter().all(|row| !row.contains(&Symbol::Start)) {
        return Err(MazeError::MissingStart);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORRIDOR: &str = "\
#######
#P..G.#
#.###.#
#.....#
#######";

    #[test]
    fn parses_symbolic_layout() {
        let maze = Maze::parse(CORRIDOR).expect("valid layout");

        assert_eq!(maze.rows(), 5);
        assert_eq!(maze.columns(), 7);
        assert_eq!(maze.start(), CellCoord::new(1, 1));
        assert_eq!(maze.ghost_starts(), &[CellCoord::new(1, 4)]);
        assert_eq!(maze.pellet_count(), 10);
        assert!(maze.view().is_walkable(CellCoord::new(2, 5)));
        assert!(!maze.view().is_walkable(CellCoord::new(2, 2)));
    }

    #[test]
    fn parses_numeric_layout_with_default_start() {
        let layout = "1 1 1 1\n1 2 2 1\n1 0 2 1\n1 1 1 1\n";
        let maze = Maze::parse(layout).expect("valid layout");

        assert_eq!(maze.start(), DEFAULT_NUMERIC_START);
        // The pellet under the start cell is dropped at load time.
        assert_eq!(
            maze.pellets(),
            &[CellCoord::new(1, 2), CellCoord::new(2, 2)]
        );
    }

    #[test]
    fn rejects_ragged_rows() {
        let error = Maze::parse("####\n#P.\n####").expect_err("ragged layout");
        assert_eq!(
            error,
            MazeError::RaggedRow {
                row: 1,
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn rejects_unknown_symbols() {
        let error = Maze::parse("###\n#P#\n#x#\n###").expect_err("unknown symbol");
        assert_eq!(
            error,
            MazeError::UnknownSymbol {
                cell: CellCoord::new(2, 1),
                symbol: 'x'
            }
        );
    }

    #[test]
    fn rejects_missing_and_duplicate_starts() {
        assert_eq!(Maze::parse("###\n#.#\n###"), Err(MazeError::MissingStart));
        assert_eq!(
            Maze::parse("####\n#PP#\n####"),
            Err(MazeError::DuplicateStart {
                first: CellCoord::new(1, 1),
                second: CellCoord::new(1, 2)
            })
        );
    }

    #[test]
    fn rejects_disconnected_regions() {
        let error = Maze::parse("#####\n#P#.#\n#####").expect_err("sealed pellet");
        assert_eq!(
            error,
            MazeError::Disconnected {
                cell: CellCoord::new(1, 3)
            }
        );
    }

    #[test]
    fn rejects_start_inside_wall() {
        let options = LayoutOptions {
            default_start: CellCoord::new(0, 0),
            expected_pellets: None,
        };
        let error = Maze::parse_with("1 1 1\n1 2 1\n1 1 1", &options).expect_err("walled start");
        assert_eq!(
            error,
            MazeError::StartNotWalkable {
                cell: CellCoord::new(0, 0)
            }
        );
    }

    #[test]
    fn rejects_all_wall_layouts() {
        assert_eq!(
            Maze::parse("1 1\n1 1"),
            Err(MazeError::NoWalkableCells)
        );
    }

    #[test]
    fn enforces_declared_pellet_count() {
        let options = LayoutOptions {
            expected_pellets: Some(194),
            ..LayoutOptions::default()
        };
        let error = Maze::parse_with(CORRIDOR, &options).expect_err("count mismatch");
        assert_eq!(
            error,
            MazeError::PelletCountMismatch {
                expected: 194,
                found: 10
            }
        );
    }
}
