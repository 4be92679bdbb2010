//! Headless batch runner.
//!
//! Plays scripted sessions over a range of seeds in parallel and prints a
//! JSON summary of every session's round outcomes.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use arena_core::{Coord, GameConfig, GameEvent, RoundOutcome, RoundPhase, Simulation, Team, TemplateId};
use clap::Parser;
use parity_scale_codec::Encode;
use rayon::prelude::*;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "arena-sim")]
#[command(about = "Run scripted Tile Arena sessions and report round outcomes")]
struct Args {
    /// JSON game configuration; the built-in starter set when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// First seed of the batch
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Number of sessions, one per consecutive seed
    #[arg(long, short = 'n', default_value_t = 16)]
    sessions: u64,

    /// Rounds played per session
    #[arg(long, default_value_t = 10)]
    rounds: u32,

    /// Tick length in milliseconds
    #[arg(long, default_value_t = 50)]
    dt: u32,

    /// Play every session twice and compare the encoded event logs
    #[arg(long)]
    verify: bool,

    /// Pretty-print the JSON summary
    #[arg(long)]
    pretty: bool,

    /// Log filter, overriding RUST_LOG (e.g. `info` or `arena_core=debug`)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Serialize)]
struct SessionSummary {
    seed: u64,
    outcomes: Vec<RoundOutcome>,
    victories: usize,
    final_gold: u32,
    final_level: u8,
    units_owned: usize,
    events: usize,
    event_bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    deterministic: Option<bool>,
}

#[derive(Serialize)]
struct BatchSummary {
    sessions: usize,
    rounds: u32,
    win_rate: f64,
    results: Vec<SessionSummary>,
}

/// Ticks before a stuck round is abandoned
const MAX_TICKS_PER_ROUND: u32 = 100_000;

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig, String> {
    let Some(path) = path else {
        return Ok(GameConfig::starter());
    };
    let raw = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let config: GameConfig =
        serde_json::from_str(&raw).map_err(|e| format!("{}: {}", path.display(), e))?;
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn affordable(sim: &Simulation) -> Option<TemplateId> {
    sim.shop().iter().flatten().copied().find(|t| {
        sim.config()
            .catalog
            .iter()
            .any(|c| c.id == *t && c.cost <= sim.gold())
    })
}

/// Spend everything on the shop, then field bench units onto the first free
/// zone tiles until the cap
fn shop_phase(sim: &mut Simulation) {
    while let Some(template) = affordable(sim) {
        if let Err(err) = sim.purchase_unit(template) {
            log::debug!("purchase stopped: {}", err);
            break;
        }
    }

    let width = sim.config().board.width as i16;
    let rows = sim.config().board.zone_rows as i16;
    for unit in sim.bench().into_iter().flatten() {
        if sim.active_roster(Team::Player).len() >= sim.max_active_units() as usize {
            break;
        }
        let board = &sim.world().board;
        let Some(to) = (0..rows)
            .flat_map(|y| (0..width).map(move |x| Coord::new(x, y)))
            .filter_map(|c| board.tile_at(c))
            .find(|t| board.is_free(*t))
        else {
            break;
        };
        let Some(from) = sim.world().units.get(unit).and_then(|u| u.tile) else {
            continue;
        };
        if let Err(err) = sim.move_unit_between_tiles(unit, from, to) {
            log::debug!("unit {} stays benched: {}", unit.0, err);
        }
    }
}

fn play_session(config: &GameConfig, seed: u64, rounds: u32, dt: u32) -> Result<(SessionSummary, Vec<GameEvent>), String> {
    let mut sim = Simulation::new(config.clone(), seed).map_err(|e| e.to_string())?;
    let mut outcomes = Vec::with_capacity(rounds as usize);
    let mut events = sim.drain_events();

    for _ in 0..rounds {
        shop_phase(&mut sim);
        sim.begin_round().map_err(|e| e.to_string())?;
        let mut ticks = 0;
        while sim.phase() != RoundPhase::Shopping {
            sim.tick(dt);
            ticks += 1;
            if ticks >= MAX_TICKS_PER_ROUND {
                return Err(format!("seed {}: round {} never finished", seed, sim.round()));
            }
        }
        events.extend(sim.drain_events());
        if let Some(outcome) = sim.last_outcome() {
            outcomes.push(outcome);
        }
    }

    let summary = SessionSummary {
        seed,
        victories: outcomes
            .iter()
            .filter(|o| **o == RoundOutcome::Victory)
            .count(),
        outcomes,
        final_gold: sim.gold(),
        final_level: sim.level(),
        units_owned: sim.world().rosters.player_owned.len(),
        events: events.len(),
        event_bytes: events.encoded_size(),
        deterministic: None,
    };
    Ok((summary, events))
}

fn run(args: &Args) -> Result<BatchSummary, String> {
    let config = load_config(args.config.as_ref())?;
    if args.dt == 0 {
        return Err("tick length must be positive".into());
    }

    let results: Result<Vec<SessionSummary>, String> = (args.seed..args.seed + args.sessions)
        .into_par_iter()
        .map(|seed| {
            let (mut summary, events) = play_session(&config, seed, args.rounds, args.dt)?;
            if args.verify {
                let (_, replay) = play_session(&config, seed, args.rounds, args.dt)?;
                let same = events.encode() == replay.encode();
                if !same {
                    log::error!("seed {} diverged on replay", seed);
                }
                summary.deterministic = Some(same);
            }
            log::info!(
                "seed {}: {} of {} rounds won",
                seed,
                summary.victories,
                args.rounds
            );
            Ok(summary)
        })
        .collect();
    let results = results?;

    let played = results.len() as f64 * args.rounds as f64;
    let won: usize = results.iter().map(|r| r.victories).sum();
    Ok(BatchSummary {
        sessions: results.len(),
        rounds: args.rounds,
        win_rate: if played > 0.0 { won as f64 / played } else { 0.0 },
        results,
    })
}

fn main() -> ExitCode {
    let args = Args::parse();
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(filter) = &args.log_level {
        logger.parse_filters(filter);
    }
    logger.init();

    let summary = match run(&args) {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("arena-sim: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&summary)
    } else {
        serde_json::to_string(&summary)
    };
    match json {
        Ok(json) => {
            println!("{}", json);
            if summary.results.iter().any(|r| r.deterministic == Some(false)) {
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("arena-sim: {}", err);
            ExitCode::FAILURE
        }
    }
}
