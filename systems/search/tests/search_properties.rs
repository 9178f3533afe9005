use pellet_chase_core::{CellCoord, MazeView, SearchAlgorithm, Tile};
use pellet_chase_system_search::{path_cost, CostGrid, Pathfinder, UnitCost};
use pellet_chase_world::Maze;
use proptest::prelude::*;

#[derive(Clone, Debug)]
struct RandomGrid {
    rows: u32,
    columns: u32,
    tiles: Vec<Tile>,
    penalties: Vec<u32>,
}

fn random_grid() -> impl Strategy<Value = RandomGrid> {
    (2_u32..9, 2_u32..9).prop_flat_map(|(rows, columns)| {
        let cells = (rows * columns) as usize;
        (
            prop::collection::vec(prop::bool::weighted(0.3), cells),
            prop::collection::vec(0_u32..5, cells),
        )
            .prop_map(move |(walls, penalties)| RandomGrid {
                rows,
                columns,
                tiles: walls
                    .into_iter()
                    .map(|wall| if wall { Tile::Wall } else { Tile::Floor })
                    .collect(),
                penalties,
            })
    })
}

fn endpoints(maze: &MazeView<'_>) -> Option<(CellCoord, CellCoord)> {
    let source = maze.walkable_cells().next()?;
    let goal = maze.walkable_cells().last()?;
    Some((source, goal))
}

fn assert_contiguous(cells: &[CellCoord], maze: &MazeView<'_>) {
    for pair in cells.windows(2) {
        assert_eq!(maze.cost(pair[0], pair[1]), Some(1));
    }
}

proptest! {
    #[test]
    fn unit_cost_strategies_agree_on_minimal_length(grid in random_grid()) {
        let maze = MazeView::new(&grid.tiles, grid.rows, grid.columns);
        let Some((source, goal)) = endpoints(&maze) else {
            return Ok(());
        };
        let mut pathfinder = Pathfinder::new();

        let breadth = pathfinder.find_path(SearchAlgorithm::BreadthFirst, &maze, source, goal, &UnitCost);
        let uniform = pathfinder.find_path(SearchAlgorithm::UniformCost, &maze, source, goal, &UnitCost);
        let best = pathfinder.find_path(SearchAlgorithm::BestFirst, &maze, source, goal, &UnitCost);

        prop_assert_eq!(breadth.is_found(), uniform.is_found());
        prop_assert_eq!(breadth.is_found(), best.is_found());
        prop_assert_eq!(breadth.cost, uniform.cost);
        prop_assert_eq!(uniform.cost, best.cost);
        if let Some(path) = &breadth.path {
            assert_contiguous(path.cells(), &maze);
        }
    }

    #[test]
    fn best_first_matches_uniform_cost_under_penalties(grid in random_grid()) {
        let maze = MazeView::new(&grid.tiles, grid.rows, grid.columns);
        let Some((source, goal)) = endpoints(&maze) else {
            return Ok(());
        };
        let mut costs = CostGrid::new(&maze);
        for (cell, penalty) in maze.walkable_cells().zip(grid.penalties.iter()) {
            costs.penalize(cell, *penalty);
        }
        let mut pathfinder = Pathfinder::new();

        let uniform = pathfinder.find_path(SearchAlgorithm::UniformCost, &maze, source, goal, &costs);
        let best = pathfinder.find_path(SearchAlgorithm::BestFirst, &maze, source, goal, &costs);

        prop_assert_eq!(uniform.cost, best.cost);
        if let Some(path) = &best.path {
            prop_assert_eq!(path_cost(path, &costs), best.cost);
        }
    }

    #[test]
    fn depth_first_finds_a_simple_route_whenever_one_exists(grid in random_grid()) {
        let maze = MazeView::new(&grid.tiles, grid.rows, grid.columns);
        let Some((source, goal)) = endpoints(&maze) else {
            return Ok(());
        };
        let mut pathfinder = Pathfinder::new();

        let breadth = pathfinder.find_path(SearchAlgorithm::BreadthFirst, &maze, source, goal, &UnitCost);
        let depth = pathfinder.find_path(SearchAlgorithm::DepthFirst, &maze, source, goal, &UnitCost);

        prop_assert_eq!(breadth.is_found(), depth.is_found());
        if let (Some(shortest), Some(path)) = (&breadth.path, &depth.path) {
            prop_assert_eq!(path.source(), source);
            prop_assert_eq!(path.goal(), goal);
            prop_assert!(path.step_count() >= shortest.step_count());
            assert_contiguous(path.cells(), &maze);

            let mut visited = path.cells().to_vec();
            visited.sort();
            visited.dedup();
            prop_assert_eq!(visited.len(), path.cells().len());
        }
        let walkable = u32::try_from(maze.walkable_cells().count()).unwrap_or(u32::MAX);
        prop_assert!(depth.expanded <= walkable);
    }
}

#[test]
fn strategies_share_the_parsed_maze_graph() {
    let maze = Maze::parse(
        "\
#########
#P..#...#
#.#.#.#.#
#.#...#.#
#.#####.#
#.......#
#########",
    )
    .expect("valid layout");
    let view = maze.view();
    let goal = CellCoord::new(1, 7);
    let mut pathfinder = Pathfinder::new();

    let costs: Vec<_> = SearchAlgorithm::ALL
        .into_iter()
        .map(|algorithm| {
            pathfinder
                .find_path(algorithm, &view, maze.start(), goal, &UnitCost)
                .cost
                .expect("route exists")
        })
        .collect();

    // Breadth-first, depth-first, best-first, uniform-cost.
    assert_eq!(costs[0], 10);
    assert!(costs[1] >= 10);
    assert_eq!(costs[2], 10);
    assert_eq!(costs[3], 10);
}
