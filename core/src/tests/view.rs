use super::*;
use crate::events::{RoundOutcome, RoundPhase};
use crate::simulation::Simulation;
use crate::view::UnitView;

#[test]
fn test_game_view_maps_bench_board_and_synergies() {
    let mut config = create_config();
    config.catalog = alloc::vec![create_melee(1, 10, 100).with_traits(&[KNIGHT])];
    config.enemy_waves[0].units[0].template = TemplateId(1);
    let mut sim = Simulation::new(config, 3).unwrap();
    let fielded = sim.purchase_unit(TemplateId(1)).unwrap();
    let benched = sim.purchase_unit(TemplateId(1)).unwrap();
    let from = sim.world().units.get(fielded).unwrap().tile.unwrap();
    let to = tile(sim.world(), 1, 1);
    sim.move_unit_between_tiles(fielded, from, to).unwrap();

    let view = sim.view();

    assert_eq!(view.phase, RoundPhase::Shopping);
    assert_eq!(view.round, 1);
    assert_eq!(view.gold, 48);
    assert_eq!(view.level, 1);
    assert_eq!(view.max_experience, 4);
    assert_eq!(view.max_active_units, 3);
    assert_eq!(view.shop.len(), 5);
    assert_eq!(view.last_outcome, None);
    assert_eq!(view.bench.len(), 8);
    assert!(view.bench[0].is_none(), "fielded unit left its slot");
    assert_eq!(view.bench[1].as_ref().map(|u| u.id), Some(benched));
    assert_eq!(view.player_units.len(), 1);
    assert_eq!(view.player_units[0].tile, Some(to));
    assert!(view.enemy_units.is_empty());

    let knights = view
        .synergies
        .iter()
        .find(|s| s.id == SynergyId(KNIGHT))
        .expect("knight synergy listed");
    assert_eq!((knights.unique_owned, knights.unique_active), (1, 1));
    assert_eq!(knights.tier, 1);
    assert_eq!(knights.total_synergy_size, 2);
}

#[test]
fn test_unit_view_includes_bonus_damage() {
    let mut world = create_world();
    let id = spawn_at(&mut world, Team::Player, create_melee(1, 10, 100), 0, 0);
    world.units.get_mut(id).unwrap().add_bonus(Bonuses {
        damage: 4,
        ..Bonuses::default()
    });

    let view = UnitView::from(world.units.get(id).unwrap());

    assert_eq!((view.min_damage, view.max_damage), (14, 14));
    assert_eq!(view.max_health, 100);
    assert!(view.alive);
}

#[test]
fn test_last_outcome_surfaces_after_round() {
    let mut sim = Simulation::new(create_config(), 3).unwrap();
    sim.begin_round().unwrap();
    for _ in 0..100 {
        sim.tick(100);
    }

    let view = sim.view();
    assert_eq!(view.last_outcome, Some(RoundOutcome::Defeat));
    assert_eq!(view.round, 2);
}

#[cfg(feature = "std")]
fn assert_serde<T: serde::Serialize + serde::de::DeserializeOwned>() {}

#[cfg(feature = "std")]
#[test]
fn test_domain_types_serialize_with_std() {
    assert_serde::<GameConfig>();
    assert_serde::<GameEvent>();
    assert_serde::<UnitTemplate>();
    assert_serde::<ArmyRoster>();
    assert_serde::<Bonuses>();
    assert_serde::<crate::stats::DerivedStats>();
    assert_serde::<crate::board::BoardTile>();
    assert_serde::<crate::error::GameError>();
    assert_serde::<crate::view::GameView>();
}
