use super::*;
use crate::events::RoundPhase;
use crate::simulation::Simulation;
use parity_scale_codec::Encode;

fn affordable(sim: &Simulation) -> Option<TemplateId> {
    sim.shop().iter().flatten().copied().find(|t| {
        sim.config()
            .catalog
            .iter()
            .any(|c| c.id == *t && c.cost <= sim.gold())
    })
}

/// Buy what the gold allows, field the bench up to the cap, fight
fn play_round(sim: &mut Simulation) {
    while let Some(template) = affordable(sim) {
        if sim.purchase_unit(template).is_err() {
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
        // Combines can consume bench units mid-loop
        let Some(from) = sim.world().units.get(unit).and_then(|u| u.tile) else {
            continue;
        };
        let _ = sim.move_unit_between_tiles(unit, from, to);
    }

    sim.begin_round().expect("waves configured");
    for _ in 0..2000 {
        sim.tick(100);
        if sim.phase() == RoundPhase::Shopping {
            break;
        }
    }
}

fn record(seed: u64, rounds: u32) -> Vec<u8> {
    let mut sim = Simulation::new(GameConfig::starter(), seed).expect("starter config");
    let mut log = Vec::new();
    for _ in 0..rounds {
        play_round(&mut sim);
        log.extend(sim.drain_events());
    }
    assert_eq!(sim.round(), rounds + 1);
    log.encode()
}

#[test]
fn test_same_seed_same_events() {
    // SCENARIO: two sessions from the same configuration and seed receive the
    // same scripted calls. Their event logs match byte for byte.
    assert_eq!(record(42, 3), record(42, 3));
}

#[test]
fn test_seed_changes_the_shop() {
    let lineups: Vec<Vec<Option<TemplateId>>> = (1..=8u64)
        .map(|seed| {
            Simulation::new(GameConfig::starter(), seed)
                .unwrap()
                .shop()
                .to_vec()
        })
        .collect();

    assert!(lineups.iter().any(|l| *l != lineups[0]));
}
