//! Built-in starter set: a small catalog, its synergies and eight enemy waves.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::config::GameConfig;
use crate::stats::Bonuses;
use crate::synergy::{SynergyDefinition, SynergyEffect};
use crate::types::{ArmyRoster, Quality, SynergyId, TemplateId, TemplateStats, UnitTemplate, WaveUnit};

pub const KNIGHT: u16 = 1;
pub const RANGER: u16 = 2;
pub const BRUTE: u16 = 3;
pub const HEXER: u16 = 4;

#[allow(clippy::too_many_arguments)]
fn stats(
    damage: (i32, i32),
    attack_time_ms: u32,
    attack_point_ms: u32,
    range: u8,
    health: i32,
    armor: i32,
    move_speed: i32,
    mana: (i32, i32),
) -> TemplateStats {
    TemplateStats {
        min_damage: damage.0,
        max_damage: damage.1,
        base_attack_time_ms: attack_time_ms,
        attack_point_ms,
        attack_range: range,
        mana_cost: mana.0,
        mana_per_attack: mana.1,
        move_speed,
        health,
        armor,
    }
}

/// Star-1 templates with their star-2 and star-3 upgrades
pub fn starter_templates() -> Vec<UnitTemplate> {
    vec![
        // Footman line
        UnitTemplate::new(1, "Footman", 1, stats((8, 10), 1200, 400, 1, 120, 3, 3000, (100, 10)))
            .with_traits(&[KNIGHT])
            .upgrades_to(2),
        UnitTemplate::new(2, "Footman", 3, stats((14, 17), 1200, 400, 1, 220, 4, 3000, (100, 10)))
            .with_traits(&[KNIGHT])
            .with_star(2)
            .upgrades_to(3),
        UnitTemplate::new(3, "Footman", 9, stats((26, 30), 1200, 400, 1, 400, 6, 3000, (100, 10)))
            .with_traits(&[KNIGHT])
            .with_star(3),
        // Archer line
        UnitTemplate::new(10, "Archer", 1, stats((7, 9), 1000, 350, 3, 80, 0, 3000, (80, 10)))
            .with_traits(&[RANGER])
            .with_projectile()
            .upgrades_to(11),
        UnitTemplate::new(11, "Archer", 3, stats((13, 16), 1000, 350, 3, 150, 1, 3000, (80, 10)))
            .with_traits(&[RANGER])
            .with_projectile()
            .with_star(2),
        // Ogre line
        UnitTemplate::new(20, "Ogre", 2, stats((12, 16), 1600, 500, 1, 200, 2, 2500, (120, 15)))
            .with_traits(&[BRUTE])
            .with_quality(Quality::Uncommon)
            .upgrades_to(21),
        UnitTemplate::new(21, "Ogre", 6, stats((22, 28), 1600, 500, 1, 380, 3, 2500, (120, 15)))
            .with_traits(&[BRUTE])
            .with_quality(Quality::Uncommon)
            .with_star(2),
        // Warden: knight and brute
        UnitTemplate::new(30, "Warden", 3, stats((10, 12), 1300, 450, 1, 180, 6, 2800, (100, 10)))
            .with_traits(&[KNIGHT, BRUTE])
            .with_quality(Quality::Rare),
        // Crossbowman
        UnitTemplate::new(40, "Crossbowman", 2, stats((11, 14), 1500, 500, 2, 110, 1, 3000, (100, 10)))
            .with_traits(&[RANGER])
            .with_projectile()
            .with_quality(Quality::Uncommon),
        // Hexer
        UnitTemplate::new(50, "Hexer", 3, stats((9, 11), 1100, 400, 3, 90, 0, 3000, (60, 15)))
            .with_traits(&[HEXER])
            .with_projectile()
            .with_quality(Quality::Rare),
        UnitTemplate::new(51, "Witch", 4, stats((12, 15), 1100, 400, 2, 110, 1, 3000, (60, 15)))
            .with_traits(&[HEXER, RANGER])
            .with_projectile()
            .with_quality(Quality::Epic),
    ]
}

fn bonus(attack_speed: i32, damage: i32, armor: i32, health: i32) -> Bonuses {
    Bonuses {
        attack_speed,
        damage,
        armor,
        health,
        move_speed: 0,
    }
}

pub fn starter_synergies() -> Vec<SynergyDefinition> {
    vec![
        SynergyDefinition {
            id: SynergyId(KNIGHT),
            name: String::from("Knight"),
            description: String::from("Knights gain armor"),
            total_synergy_size: 2,
            total_buff_size: 2,
            effects: vec![
                SynergyEffect::new(1, bonus(0, 0, 3, 0)),
                SynergyEffect::new(2, bonus(0, 0, 5, 0)),
            ],
            enemy_debuff: false,
        },
        SynergyDefinition {
            id: SynergyId(RANGER),
            name: String::from("Ranger"),
            description: String::from("Rangers attack faster"),
            total_synergy_size: 3,
            total_buff_size: 1,
            effects: vec![SynergyEffect::new(1, bonus(30, 0, 0, 0))],
            enemy_debuff: false,
        },
        SynergyDefinition {
            id: SynergyId(BRUTE),
            name: String::from("Brute"),
            description: String::from("Brutes gain health and damage"),
            total_synergy_size: 2,
            total_buff_size: 1,
            effects: vec![SynergyEffect::new(1, bonus(0, 3, 0, 60))],
            enemy_debuff: false,
        },
        SynergyDefinition {
            id: SynergyId(HEXER),
            name: String::from("Hexer"),
            description: String::from("Enemies lose armor"),
            total_synergy_size: 2,
            total_buff_size: 2,
            effects: vec![
                SynergyEffect::new(1, bonus(0, 0, -2, 0)),
                SynergyEffect::new(2, bonus(0, 0, -3, 0)),
            ],
            enemy_debuff: true,
        },
    ]
}

fn wave(name: &str, units: &[(u32, u8, u8)]) -> ArmyRoster {
    ArmyRoster {
        name: String::from(name),
        units: units
            .iter()
            .map(|(template, column, row)| WaveUnit {
                template: TemplateId(*template),
                column: *column,
                row: *row,
            })
            .collect(),
    }
}

pub fn starter_waves() -> Vec<ArmyRoster> {
    vec![
        wave("Scouts", &[(1, 3, 1), (10, 4, 3)]),
        wave("Patrol", &[(1, 3, 1), (1, 4, 1), (10, 4, 3)]),
        wave("Brutes", &[(20, 3, 1), (20, 4, 1), (10, 2, 3)]),
        wave("Vanguard", &[(2, 3, 1), (20, 4, 1), (10, 2, 3), (40, 5, 3)]),
        wave("Coven", &[(2, 3, 1), (30, 4, 1), (50, 2, 3), (51, 5, 3)]),
        wave(
            "Warband",
            &[(2, 2, 1), (21, 4, 1), (30, 5, 1), (11, 3, 3), (40, 6, 3)],
        ),
        wave(
            "Siege",
            &[(3, 3, 0), (21, 4, 0), (11, 2, 3), (11, 5, 3), (51, 4, 3)],
        ),
        wave(
            "Iron Host",
            &[(3, 2, 0), (3, 5, 0), (21, 4, 1), (11, 3, 3), (51, 4, 3), (50, 6, 3)],
        ),
    ]
}

impl GameConfig {
    /// Default settings with the built-in catalog, synergies and waves
    pub fn starter() -> Self {
        Self {
            catalog: starter_templates(),
            synergies: starter_synergies(),
            enemy_waves: starter_waves(),
            ..GameConfig::default()
        }
    }
}
