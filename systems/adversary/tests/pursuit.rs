use pellet_chase_core::{CellCoord, Command, Event, GameStatus, GhostPolicy};
use pellet_chase_system_adversary::Adversaries;
use pellet_chase_world::{self as world, query, Maze, World};

const HALL: &str = "\
#########
#P......#
#########";

fn world_with_ghost(policy: GhostPolicy, step_interval: u32) -> World {
    let maze = Maze::parse(HALL).expect("valid layout");
    let mut world = World::new(maze);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnGhost {
            cell: CellCoord::new(1, 7),
            policy,
            step_interval,
        },
        &mut events,
    );
    world
}

fn advance(world: &mut World, adversaries: &mut Adversaries) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick, &mut events);

    let mut commands = Vec::new();
    adversaries.handle(
        &events,
        &query::maze_view(world),
        &query::ghost_view(world),
        query::agent(world).cell,
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, &mut events);
    }
    world::apply(world, Command::CommitTick, &mut events);
    events
}

#[test]
fn pursuing_ghost_catches_an_idle_agent() {
    let mut world = world_with_ghost(GhostPolicy::Pursue, 1);
    let mut adversaries = Adversaries::default();

    let mut ticks = 0;
    while query::status(&world) == GameStatus::Running && ticks < 20 {
        let _ = advance(&mut world, &mut adversaries);
        ticks += 1;
    }

    assert_eq!(query::status(&world), GameStatus::Lost);
    assert_eq!(ticks, 6);
}

#[test]
fn slower_cadence_delays_the_catch() {
    let mut world = world_with_ghost(GhostPolicy::Pursue, 2);
    let mut adversaries = Adversaries::default();

    let mut ticks = 0;
    while query::status(&world) == GameStatus::Running && ticks < 40 {
        let _ = advance(&mut world, &mut adversaries);
        ticks += 1;
    }

    assert_eq!(query::status(&world), GameStatus::Lost);
    assert_eq!(ticks, 12);
}

#[test]
fn wandering_ghosts_replay_identically() {
    let run = || {
        let mut world = world_with_ghost(GhostPolicy::Wander, 1);
        let mut adversaries = Adversaries::new(42);
        let mut log = Vec::new();
        for _ in 0..10 {
            log.extend(advance(&mut world, &mut adversaries));
        }
        log
    };

    assert_eq!(run(), run());
}
