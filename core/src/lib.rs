#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Pellet Chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! views such as [`MazeView`] and [`GhostView`], and respond exclusively with
//! new command batches.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Opens a new simulation tick.
    Tick,
    /// Queues a single agent step for the current tick.
    StepAgent {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Queues a single ghost step for the current tick.
    StepGhost {
        /// Identifier of the ghost attempting to move.
        ghost: GhostId,
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Applies every queued step atomically and resolves collection and collision.
    CommitTick,
    /// Activates the provided search algorithm for subsequent planning.
    SwitchAlgorithm {
        /// Algorithm the agent should plan with.
        algorithm: SearchAlgorithm,
    },
    /// Activates a search algorithm identified by a free-form label.
    ///
    /// Unknown labels are rejected and leave the active algorithm untouched.
    SwitchAlgorithmNamed {
        /// Label supplied by the adapter, such as `"bfs"` or `"astar"`.
        name: String,
    },
    /// Activates the provided pellet selection strategy.
    SetTargetStrategy {
        /// Strategy the agent should select pellets with.
        strategy: TargetStrategy,
    },
    /// Freezes or resumes the simulation clock.
    SetPaused {
        /// Whether ticks should be ignored.
        paused: bool,
    },
    /// Requests that a ghost be created at the provided cell.
    SpawnGhost {
        /// Cell the ghost starts on.
        cell: CellCoord,
        /// Movement policy driving the ghost.
        policy: GhostPolicy,
        /// Number of ticks between successive ghost steps.
        step_interval: u32,
    },
    /// Relocates a ghost instantly, bypassing its movement cadence.
    TeleportGhost {
        /// Identifier of the ghost to relocate.
        ghost: GhostId,
        /// Destination cell.
        cell: CellCoord,
    },
    /// Restores the loaded maze, pellets, agent and ghosts.
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that just opened.
        tick: u64,
    },
    /// Confirms that the agent moved between two cells.
    AgentMoved {
        /// Cell the agent occupied before moving.
        from: CellCoord,
        /// Cell the agent occupies after moving.
        to: CellCoord,
    },
    /// Reports that a queued agent step pointed into a wall or off the grid.
    AgentStepRejected {
        /// Direction of the rejected step.
        direction: Direction,
    },
    /// Confirms that a ghost moved between two cells.
    GhostMoved {
        /// Identifier of the ghost that moved.
        ghost: GhostId,
        /// Cell the ghost occupied before moving.
        from: CellCoord,
        /// Cell the ghost occupies after moving.
        to: CellCoord,
    },
    /// Confirms that the agent consumed a pellet.
    PelletCollected {
        /// Cell that held the pellet.
        cell: CellCoord,
        /// Score after the collection.
        score: u32,
        /// Pellets still uncollected.
        remaining: u32,
    },
    /// Announces that the agent plans with a different algorithm.
    AlgorithmChanged {
        /// Previously active algorithm.
        from: SearchAlgorithm,
        /// Newly active algorithm.
        to: SearchAlgorithm,
    },
    /// Reports that an algorithm switch named an unknown identifier.
    AlgorithmSwitchRejected {
        /// Label that failed to resolve.
        name: String,
    },
    /// Announces that the agent selects pellets with a different strategy.
    TargetStrategyChanged {
        /// Newly active strategy.
        strategy: TargetStrategy,
    },
    /// Announces that the simulation clock was frozen or resumed.
    PauseChanged {
        /// Whether ticks are currently ignored.
        paused: bool,
    },
    /// Confirms that a ghost joined the maze.
    GhostSpawned {
        /// Identifier assigned to the ghost.
        ghost: GhostId,
        /// Cell the ghost occupies.
        cell: CellCoord,
    },
    /// Reports that a ghost could not be placed on the requested cell.
    GhostPlacementRejected {
        /// Ghost that was being relocated, if the request targeted an existing ghost.
        ghost: Option<GhostId>,
        /// Requested cell.
        cell: CellCoord,
    },
    /// Announces the transition into a terminal status.
    GameOver {
        /// Terminal status reached.
        status: GameStatus,
        /// Human-readable explanation of the outcome.
        reason: String,
    },
    /// Confirms that the session was restored to its loaded state.
    SessionReset,
}

/// Cardinal movement directions available to the agent and the ghosts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Expansion order used whenever neighbours are enumerated.
    pub const EXPANSION_ORDER: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

/// Location of a single grid cell expressed as row and column coordinates.
///
/// Ordering is row-major, which is the deterministic tie-break used by target
/// selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Cell adjacent in the provided direction, if it does not underflow.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => self
                .row
                .checked_sub(1)
                .map(|row| CellCoord::new(row, self.column)),
            Direction::South => self
                .row
                .checked_add(1)
                .map(|row| CellCoord::new(row, self.column)),
            Direction::West => self
                .column
                .checked_sub(1)
                .map(|column| CellCoord::new(self.row, column)),
            Direction::East => self
                .column
                .checked_add(1)
                .map(|column| CellCoord::new(self.row, column)),
        }
    }

    /// Direction leading from `self` to an orthogonally adjacent `other`.
    #[must_use]
    pub fn direction_to(self, other: CellCoord) -> Option<Direction> {
        let column_diff = self.column.abs_diff(other.column);
        let row_diff = self.row.abs_diff(other.row);
        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if other.column > self.column {
                Some(Direction::East)
            } else {
                Some(Direction::West)
            }
        } else if other.row > self.row {
            Some(Direction::South)
        } else {
            Some(Direction::North)
        }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Static terrain occupying a maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Impassable cell.
    Wall,
    /// Walkable cell.
    Floor,
}

/// Read-only view into the static maze topology.
///
/// This is the graph every search strategy runs over: walkable cells are the
/// nodes and orthogonal adjacency between walkable cells forms the edges.
#[derive(Clone, Copy, Debug)]
pub struct MazeView<'a> {
    tiles: &'a [Tile],
    rows: u32,
    columns: u32,
}

impl<'a> MazeView<'a> {
    /// Captures a new maze view backed by the provided row-major tile slice.
    #[must_use]
    pub fn new(tiles: &'a [Tile], rows: u32, columns: u32) -> Self {
        Self {
            tiles,
            rows,
            columns,
        }
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

    /// Total number of cells, walkable or not.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.tiles.len()
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    /// Terrain at the provided cell, if it lies inside the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Reports whether the cell lies inside the grid and is not a wall.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.tile(cell) == Some(Tile::Floor)
    }

    /// Walkable orthogonal neighbours of a walkable cell.
    ///
    /// Yields nothing when `cell` itself is out of bounds or a wall.
    #[must_use]
    pub fn neighbors(&self, cell: CellCoord) -> Neighbors {
        let mut neighbors = Neighbors::default();
        if !self.is_walkable(cell) {
            return neighbors;
        }

        for direction in Direction::EXPANSION_ORDER {
            if let Some(candidate) = cell.step(direction) {
                if self.is_walkable(candidate) {
                    neighbors.push(candidate);
                }
            }
        }

        neighbors
    }

    /// Unit cost of stepping between two adjacent walkable cells.
    #[must_use]
    pub fn cost(&self, from: CellCoord, to: CellCoord) -> Option<u32> {
        if from.direction_to(to).is_none() {
            return None;
        }
        if self.is_walkable(from) && self.is_walkable(to) {
            Some(1)
        } else {
            None
        }
    }

    /// Dense row-major index of the cell.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Cell stored at the provided dense index.
    #[must_use]
    pub fn cell_at(&self, index: usize) -> Option<CellCoord> {
        let width = usize::try_from(self.columns).ok()?;
        if width == 0 || index >= self.tiles.len() {
            return None;
        }
        let row = u32::try_from(index / width).ok()?;
        let column = u32::try_from(index % width).ok()?;
        Some(CellCoord::new(row, column))
    }

    /// Iterator over every walkable cell in row-major order.
    pub fn walkable_cells(&self) -> impl Iterator<Item = CellCoord> + 'a {
        let columns = self.columns;
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| **tile == Tile::Floor)
            .filter_map(move |(index, _)| {
                let width = usize::try_from(columns).ok()?;
                let row = u32::try_from(index / width).ok()?;
                let column = u32::try_from(index % width).ok()?;
                Some(CellCoord::new(row, column))
            })
    }
}

/// Fixed-capacity iterator over up to four neighbouring cells.
#[derive(Clone, Debug, Default)]
pub struct Neighbors {
    buffer: [Option<CellCoord>; 4],
    len: usize,
    cursor: usize,
}

impl Neighbors {
    fn push(&mut self, cell: CellCoord) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(cell);
            self.len += 1;
        }
    }
}

impl Iterator for Neighbors {
    type Item = CellCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }

        let value = self.buffer[self.cursor];
        self.cursor += 1;
        value
    }
}

/// Reasons a cell sequence cannot form a [`Path`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    /// Paths contain at least their source cell.
    #[error("path must contain at least one cell")]
    Empty,
    /// Two consecutive cells are not orthogonal neighbours.
    #[error("path cell {index} is not adjacent to its successor")]
    Disjoint {
        /// Position of the first cell of the offending pair.
        index: usize,
    },
}

/// Ordered sequence of cells from source to goal, inclusive.
///
/// Every consecutive pair is orthogonally adjacent. Paths are never mutated
/// after creation; planners replace them instead.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<CellCoord>", into = "Vec<CellCoord>")]
pub struct Path {
    cells: Vec<CellCoord>,
}

impl Path {
    /// Validates the provided cells and wraps them into a path.
    pub fn new(cells: Vec<CellCoord>) -> Result<Self, PathError> {
        if cells.is_empty() {
            return Err(PathError::Empty);
        }
        if let Some(index) = cells
            .windows(2)
            .position(|pair| pair[0].direction_to(pair[1]).is_none())
        {
            return Err(PathError::Disjoint { index });
        }
        Ok(Self { cells })
    }

    /// First cell of the path.
    #[must_use]
    pub fn source(&self) -> CellCoord {
        self.cells[0]
    }

    /// Last cell of the path.
    #[must_use]
    pub fn goal(&self) -> CellCoord {
        self.cells[self.cells.len() - 1]
    }

    /// Cells composing the path, source first.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Number of moves needed to walk the path.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.cells.len() - 1
    }

    /// Reports whether the path visits the provided cell.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }

    /// Cells still ahead of an agent standing on `cell`, excluding `cell`.
    ///
    /// Returns `None` when `cell` is not on the path.
    #[must_use]
    pub fn remaining_after(&self, cell: CellCoord) -> Option<&[CellCoord]> {
        let position = self.cells.iter().position(|candidate| *candidate == cell)?;
        Some(&self.cells[position + 1..])
    }

    /// Cell following `cell` on the path.
    #[must_use]
    pub fn next_hop_from(&self, cell: CellCoord) -> Option<CellCoord> {
        self.remaining_after(cell)
            .and_then(|remaining| remaining.first().copied())
    }
}

impl TryFrom<Vec<CellCoord>> for Path {
    type Error = PathError;

    fn try_from(cells: Vec<CellCoord>) -> Result<Self, Self::Error> {
        Self::new(cells)
    }
}

impl From<Path> for Vec<CellCoord> {
    fn from(path: Path) -> Self {
        path.cells
    }
}

/// Error returned when a textual identifier does not name a known variant.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownIdentifier {
    kind: &'static str,
    value: String,
}

impl UnknownIdentifier {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }

    /// Identifier that failed to resolve.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Graph-search strategies the agent can plan with.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum SearchAlgorithm {
    /// A* search ordered by accumulated cost plus Manhattan distance.
    #[default]
    #[serde(alias = "astar")]
    BestFirst,
    /// Level-by-level expansion with a FIFO frontier.
    #[serde(alias = "bfs")]
    BreadthFirst,
    /// Branch-exhausting expansion with an explicit stack.
    #[serde(alias = "dfs")]
    DepthFirst,
    /// Dijkstra expansion ordered strictly by accumulated cost.
    #[serde(alias = "ucs")]
    UniformCost,
}

impl SearchAlgorithm {
    /// Every algorithm in hotkey order.
    pub const ALL: [SearchAlgorithm; 4] = [
        SearchAlgorithm::BreadthFirst,
        SearchAlgorithm::DepthFirst,
        SearchAlgorithm::BestFirst,
        SearchAlgorithm::UniformCost,
    ];

    /// Short identifier accepted by [`FromStr`].
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BestFirst => "astar",
            Self::BreadthFirst => "bfs",
            Self::DepthFirst => "dfs",
            Self::UniformCost => "ucs",
        }
    }

    /// Whether the algorithm honours per-step costs beyond reachability.
    #[must_use]
    pub const fn is_weighted(self) -> bool {
        matches!(self, Self::BestFirst | Self::UniformCost)
    }

    /// Maps the numeric switch keys `1..=4` onto algorithms.
    #[must_use]
    pub fn from_hotkey(key: u8) -> Option<Self> {
        let index = usize::from(key.checked_sub(1)?);
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for SearchAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SearchAlgorithm {
    type Err = UnknownIdentifier;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "astar" | "a*" | "a-star" | "best-first" | "bestfirst" => Ok(Self::BestFirst),
            "bfs" | "breadth-first" | "breadthfirst" => Ok(Self::BreadthFirst),
            "dfs" | "depth-first" | "depthfirst" => Ok(Self::DepthFirst),
            "ucs" | "uniform-cost" | "uniformcost" | "dijkstra" => Ok(Self::UniformCost),
            _ => Err(UnknownIdentifier::new("search algorithm", value)),
        }
    }
}

/// Policies for choosing the next pellet to pursue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetStrategy {
    /// Nearest pellet by Manhattan distance.
    #[default]
    Nearest,
    /// Nearest pellet outside every ghost's danger zone, else the nearest one.
    NearestSafe,
    /// Pellet maximising the distance to the closest ghost.
    FurthestFromGhosts,
}

impl TargetStrategy {
    /// Short identifier accepted by [`FromStr`].
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::NearestSafe => "nearest-safe",
            Self::FurthestFromGhosts => "furthest-from-ghosts",
        }
    }
}

impl fmt::Display for TargetStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TargetStrategy {
    type Err = UnknownIdentifier;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "nearest" => Ok(Self::Nearest),
            "nearest-safe" | "safe" => Ok(Self::NearestSafe),
            "furthest-from-ghosts" | "furthest" => Ok(Self::FurthestFromGhosts),
            _ => Err(UnknownIdentifier::new("target strategy", value)),
        }
    }
}

/// Ghost speed presets expressed as ticks between steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Ghosts step every fourth tick.
    Easy,
    /// Ghosts step every third tick.
    Medium,
    /// Ghosts step every second tick.
    #[default]
    Hard,
    /// Ghosts step every tick.
    Extreme,
}

impl Difficulty {
    /// Ticks between successive ghost steps.
    #[must_use]
    pub const fn step_interval(self) -> u32 {
        match self {
            Self::Easy => 4,
            Self::Medium => 3,
            Self::Hard => 2,
            Self::Extreme => 1,
        }
    }
}

impl FromStr for Difficulty {
    type Err = UnknownIdentifier;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            "extreme" => Ok(Self::Extreme),
            _ => Err(UnknownIdentifier::new("difficulty", value)),
        }
    }
}

/// Unique identifier assigned to a ghost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GhostId(u32);

impl GhostId {
    /// Creates a new ghost identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for GhostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ghost {}", self.0)
    }
}

/// Movement policies driving a ghost.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum GhostPolicy {
    /// Follows the shortest route toward the agent.
    #[default]
    Pursue,
    /// Cycles through the listed waypoints.
    Patrol {
        /// Cells visited in order before wrapping around.
        waypoints: Vec<CellCoord>,
    },
    /// Picks a random walkable neighbour, avoiding immediate reversal.
    Wander,
    /// Never moves.
    Stationary,
}

impl GhostPolicy {
    /// Whether the ghost ever leaves its cell on its own.
    #[must_use]
    pub fn is_mobile(&self) -> bool {
        match self {
            Self::Stationary => false,
            Self::Patrol { waypoints } => !waypoints.is_empty(),
            Self::Pursue | Self::Wander => true,
        }
    }
}

/// Lifecycle status of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Ticks are still processed.
    #[default]
    Running,
    /// Every pellet was collected.
    Won,
    /// A ghost caught the agent.
    Lost,
}

impl GameStatus {
    /// Reports whether no further ticks are processed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Running => "running",
            Self::Won => "won",
            Self::Lost => "lost",
        };
        f.write_str(label)
    }
}

/// Immutable representation of the agent's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgentSnapshot {
    /// Grid cell currently occupied by the agent.
    pub cell: CellCoord,
    /// Direction of the agent's most recent step.
    pub facing: Direction,
    /// Search algorithm the agent plans with.
    pub algorithm: SearchAlgorithm,
    /// Strategy the agent selects pellets with.
    pub target_strategy: TargetStrategy,
}

/// Immutable representation of a single ghost's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GhostSnapshot {
    /// Unique identifier assigned to the ghost.
    pub id: GhostId,
    /// Grid cell currently occupied by the ghost.
    pub cell: CellCoord,
    /// Movement policy driving the ghost.
    pub policy: GhostPolicy,
    /// Number of ticks between successive steps.
    pub step_interval: u32,
    /// Ticks remaining until the ghost may step again; zero means ready now.
    pub cooldown: u32,
}

impl GhostSnapshot {
    /// Indicates whether the ghost may step during the current tick.
    #[must_use]
    pub const fn ready_for_step(&self) -> bool {
        self.cooldown == 0
    }

    /// Number of steps the ghost can take during the next `horizon` ticks.
    ///
    /// The current tick counts as the first tick of the horizon.
    #[must_use]
    pub fn steps_within(&self, horizon: u32) -> u32 {
        if !self.policy.is_mobile() || horizon <= self.cooldown {
            return 0;
        }
        let interval = self.step_interval.max(1);
        1 + (horizon - self.cooldown - 1) / interval
    }
}

/// Read-only snapshot describing all ghosts within the maze.
#[derive(Clone, Debug, Default)]
pub struct GhostView {
    snapshots: Vec<GhostSnapshot>,
}

impl GhostView {
    /// Creates a new ghost view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<GhostSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured ghost snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &GhostSnapshot> {
        self.snapshots.iter()
    }

    /// Cells currently occupied by ghosts, in identifier order.
    #[must_use]
    pub fn positions(&self) -> Vec<CellCoord> {
        self.snapshots.iter().map(|ghost| ghost.cell).collect()
    }

    /// Reports whether any ghost stands on the provided cell.
    #[must_use]
    pub fn occupies(&self, cell: CellCoord) -> bool {
        self.snapshots.iter().any(|ghost| ghost.cell == cell)
    }

    /// Number of ghosts captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no ghosts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
