use pellet_chase_core::{GhostPolicy, SearchAlgorithm};
use pellet_chase_session::{GhostConfig, Session, SessionConfig, TickReport};

const ARENA: &str = "\
###########
#P...#....#
#.##.#.##.#
#....G....#
#.##.#.##.#
#....#...G#
###########";

fn wandering(seed: u64, algorithm: SearchAlgorithm) -> SessionConfig {
    SessionConfig {
        algorithm,
        seed,
        ghosts: GhostConfig {
            policy: GhostPolicy::Wander,
            step_interval: Some(2),
            ..GhostConfig::default()
        },
        ..SessionConfig::default()
    }
}

fn record(config: SessionConfig) -> Vec<TickReport> {
    let mut session = Session::new(ARENA, config).expect("valid layout");
    let mut reports = Vec::new();
    let _ = session.run(300, |report| reports.push(report.clone()));
    reports
}

#[test]
fn identical_configurations_replay_identically() {
    for algorithm in SearchAlgorithm::ALL {
        let first = record(wandering(42, algorithm));
        let second = record(wandering(42, algorithm));

        assert!(!first.is_empty());
        assert_eq!(first, second, "{algorithm} diverged between runs");
    }
}

#[test]
fn restart_replays_the_recorded_ticks() {
    let config = wandering(7, SearchAlgorithm::BestFirst);
    let mut session = Session::new(ARENA, config).expect("valid layout");

    let mut first = Vec::new();
    let _ = session.run(300, |report| first.push(report.clone()));
    session.restart();
    let mut second = Vec::new();
    let _ = session.run(300, |report| second.push(report.clone()));

    assert_eq!(first, second);
}

#[test]
fn ghosts_stay_on_walkable_cells() {
    let reports = record(wandering(3, SearchAlgorithm::UniformCost));

    for report in &reports {
        for ghost in &report.ghosts {
            let row = ARENA.lines().nth(ghost.row() as usize).expect("row in layout");
            let symbol = row.chars().nth(ghost.column() as usize).expect("column in row");
            assert_ne!(symbol, '#', "ghost on a wall at tick {}", report.tick);
        }
    }
}
