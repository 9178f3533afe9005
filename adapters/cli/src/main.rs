#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Pellet Chase sessions in the terminal.

mod args;
mod render;

use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::Parser;
use pellet_chase_core::SearchAlgorithm;
use pellet_chase_session::{RunSummary, Session, SessionConfig, TickReport};
use pellet_chase_world::query;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::args::Cli;

const BUILTIN_LAYOUT: &str = include_str!("../layouts/classic.txt");
const DEFAULT_MAX_TICKS: u64 = 10_000;

/// Entry point for the Pellet Chase command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    let layout = match &cli.layout {
        Some(path) => read(path, "layout")?,
        None => BUILTIN_LAYOUT.to_owned(),
    };
    let mut config = match &cli.config {
        Some(path) => SessionConfig::from_toml(&read(path, "configuration")?)
            .with_context(|| format!("failed to parse configuration {}", path.display()))?,
        None => SessionConfig::default(),
    };
    cli.apply_overrides(&mut config);
    let max_ticks = config.max_ticks.unwrap_or(DEFAULT_MAX_TICKS);

    if cli.compare {
        compare(&layout, &config, max_ticks)
    } else {
        play(&cli, &layout, config, max_ticks)
    }
}

fn init_logging(filter: Option<&str>) -> Result<()> {
    let filter = match filter {
        Some(filter) => EnvFilter::try_new(filter)
            .with_context(|| format!("invalid log filter '{filter}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(anyhow::Error::msg)
        .context("failed to install the log subscriber")
}

fn read(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {what} {}", path.display()))
}

fn play(cli: &Cli, layout: &str, config: SessionConfig, max_ticks: u64) -> Result<()> {
    let mut session = Session::new(layout, config).context("failed to load the maze")?;
    if !cli.json {
        print!("{}", render::frame(session.world()));
    }

    let mut switches = cli.switches.clone();
    switches.sort_by_key(|switch| switch.tick);
    let mut switches = switches.into_iter().peekable();
    let stop = session.stop_signal();
    let mut emit = |report: &TickReport| {
        if cli.json {
            match report.to_json_line() {
                Ok(line) => println!("{line}"),
                Err(error) => warn!(%error, tick = report.tick, "failed to serialise tick report"),
            }
        }
        if cli.quit_at.is_some_and(|tick| report.tick >= tick) {
            stop.raise();
        }
    };

    let mut ticks = 0;
    let summary = loop {
        let now = query::tick_index(session.world());
        while let Some(switch) = switches.next_if(|switch| switch.tick <= now) {
            match session.switch_algorithm(&switch.algorithm) {
                Ok(algorithm) => info!(tick = now, %algorithm, "algorithm switched"),
                Err(error) => warn!(tick = now, %error, "algorithm switch ignored"),
            }
        }

        let remaining = max_ticks - ticks;
        let budget = switches
            .peek()
            .map_or(remaining, |next| (next.tick - now).min(remaining));
        let segment = session.run(budget, &mut emit);
        ticks += segment.ticks;
        if segment.stopped || segment.status.is_terminal() || ticks >= max_ticks {
            break RunSummary { ticks, ..segment };
        }
    };

    if !cli.json {
        print!("{}", render::frame(session.world()));
        println!("{}", render::summary(&summary));
    }
    info!(
        ticks = summary.ticks,
        status = %summary.status,
        score = summary.score,
        "run finished"
    );
    Ok(())
}

fn compare(layout: &str, config: &SessionConfig, max_ticks: u64) -> Result<()> {
    println!(
        "{:<6} {:>7} {:<8} {:>9} {:>10}",
        "algo", "ticks", "status", "score", "expanded"
    );
    for algorithm in SearchAlgorithm::ALL {
        let config = SessionConfig {
            algorithm,
            ..config.clone()
        };
        let mut session = Session::new(layout, config)
            .with_context(|| format!("failed to load the maze for {algorithm}"))?;
        let summary = session.run(max_ticks, |_| {});
        println!(
            "{:<6} {:>7} {:<8} {:>9} {:>10}",
            algorithm.label(),
            summary.ticks,
            summary.status.to_string(),
            format!("{}/{}", summary.score, summary.total_pellets),
            summary.expanded_total
        );
    }
    Ok(())
}
