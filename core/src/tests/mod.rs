mod attack;
mod board;
mod combine;
mod determinism;
mod log;
mod view;

use alloc::vec::Vec;

use crate::combat::CombatController;
use crate::config::{CombatSettings, GameConfig};
use crate::events::GameEvent;
use crate::rng::XorShiftRng;
use crate::stats::Bonuses;
use crate::synergy::{SynergyDefinition, SynergyEffect};
use crate::types::*;
use crate::world::World;
use crate::board::BoardGrid;

// ==========================================
// HELPER FUNCTIONS (Boilerplate Reduction)
// ==========================================

pub const KNIGHT: u16 = 1;
pub const RANGER: u16 = 2;
pub const BRUTE: u16 = 3;

fn create_stats(damage: i32, range: u8, health: i32) -> TemplateStats {
    TemplateStats {
        min_damage: damage,
        max_damage: damage,
        base_attack_time_ms: 1000,
        attack_point_ms: 300,
        attack_range: range,
        mana_cost: 100,
        mana_per_attack: 10,
        move_speed: 5000,
        health,
        armor: 0,
    }
}

fn create_melee(id: u32, damage: i32, health: i32) -> UnitTemplate {
    UnitTemplate::new(id, "Melee", 1, create_stats(damage, 1, health))
}

fn create_ranged(id: u32, damage: i32, health: i32) -> UnitTemplate {
    UnitTemplate::new(id, "Ranged", 2, create_stats(damage, 3, health)).with_projectile()
}

/// 8 wide, 4 rows per zone, 8 bench slots
fn create_world() -> World {
    World::new(BoardGrid::new(8, 4, 8).expect("valid board"))
}

fn tile(world: &World, x: i16, y: i16) -> TileId {
    world
        .board
        .tile_at(Coord::new(x, y))
        .expect("tile inside the grid")
}

fn spawn_at(world: &mut World, team: Team, template: UnitTemplate, x: i16, y: i16) -> UnitId {
    let at = tile(world, x, y);
    let worth = template.cost;
    world.spawn(team, template, worth, at).expect("free tile")
}

fn spawn_on_bench(world: &mut World, template: UnitTemplate, slot: usize) -> UnitId {
    let at = world.board.bench_tile(slot).expect("bench slot");
    let worth = template.cost;
    world.spawn(Team::Player, template, worth, at).expect("free bench slot")
}

fn create_controller() -> CombatController {
    CombatController::new(CombatSettings::default())
}

/// Tick a bare combat and return everything it emitted
fn run_combat(
    controller: &mut CombatController,
    world: &mut World,
    rng: &mut XorShiftRng,
    ticks: u32,
    dt_ms: u32,
) -> Vec<GameEvent> {
    for _ in 0..ticks {
        controller.tick(world, rng, dt_ms);
    }
    world.events.drain()
}

fn bonus_armor(armor: i32) -> Bonuses {
    Bonuses {
        armor,
        ..Bonuses::default()
    }
}

/// Knight: 2 unique for 2 tiers (+3 / +5 armor). Ranger: 1 unique for +50%
/// attack speed. Brute: 2 unique for one tier of +20 health.
fn create_synergies() -> Vec<SynergyDefinition> {
    alloc::vec![
        SynergyDefinition {
            id: SynergyId(KNIGHT),
            name: "Knight".into(),
            description: "".into(),
            total_synergy_size: 2,
            total_buff_size: 2,
            effects: alloc::vec![
                SynergyEffect::new(1, bonus_armor(3)),
                SynergyEffect::new(2, bonus_armor(5)),
            ],
            enemy_debuff: false,
        },
        SynergyDefinition {
            id: SynergyId(RANGER),
            name: "Ranger".into(),
            description: "".into(),
            total_synergy_size: 1,
            total_buff_size: 1,
            effects: alloc::vec![SynergyEffect::new(
                1,
                Bonuses {
                    attack_speed: 50,
                    ..Bonuses::default()
                }
            )],
            enemy_debuff: false,
        },
        SynergyDefinition {
            id: SynergyId(BRUTE),
            name: "Brute".into(),
            description: "".into(),
            total_synergy_size: 2,
            total_buff_size: 1,
            effects: alloc::vec![SynergyEffect::new(
                1,
                Bonuses {
                    health: 20,
                    ..Bonuses::default()
                }
            )],
            enemy_debuff: false,
        },
    ]
}

/// Small catalog: a three-step knight line, a brute pair and an archer
fn create_catalog() -> Vec<UnitTemplate> {
    alloc::vec![
        create_melee(1, 10, 100)
            .with_traits(&[KNIGHT])
            .upgrades_to(2),
        create_melee(2, 20, 200)
            .with_traits(&[KNIGHT])
            .with_star(2)
            .upgrades_to(3),
        create_melee(3, 40, 400).with_traits(&[KNIGHT]).with_star(3),
        create_melee(20, 12, 120).with_traits(&[BRUTE]),
        create_melee(21, 12, 120).with_traits(&[BRUTE, KNIGHT]),
        create_ranged(10, 10, 80).with_traits(&[RANGER]),
    ]
}

fn create_config() -> GameConfig {
    GameConfig {
        catalog: create_catalog(),
        synergies: create_synergies(),
        enemy_waves: alloc::vec![ArmyRoster {
            name: "Lone".into(),
            units: alloc::vec![WaveUnit {
                template: TemplateId(20),
                column: 3,
                row: 0,
            }],
        }],
        starting_gold: 50,
        ..GameConfig::default()
    }
}
