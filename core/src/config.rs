//! Static configuration loaded once per session.

use alloc::vec::Vec;
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

use crate::board::BoardGrid;
use crate::catalog::Catalog;
use crate::combine::DEFAULT_UNITS_NEEDED_FOR_COMBO;
use crate::error::{GameError, GameResult};
use crate::synergy::SynergyDefinition;
use crate::types::{ArmyRoster, UnitTemplate};

/// Bench slots when the configuration leaves them unset
pub const DEFAULT_BENCH_CAPACITY: u8 = 8;
/// End-of-round leeway when the configuration leaves it unset
pub const DEFAULT_END_ROUND_LEEWAY_MS: u32 = 1000;
/// Projectile speed in milli-tiles per second
pub const DEFAULT_PROJECTILE_SPEED: i32 = 25_000;
/// Delay before a boxed-in unit searches again
pub const BOXED_IN_RETARGET_MS: u32 = 500;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(default, rename_all = "camelCase"))]
pub struct BoardConfig {
    pub width: u8,
    /// Rows per team zone
    pub zone_rows: u8,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 8,
            zone_rows: 4,
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(default, rename_all = "camelCase"))]
pub struct CombatSettings {
    pub projectile_speed: i32,
    pub retarget_cooldown_ms: u32,
    /// A combat still running after this long ends in a draw
    pub max_combat_ms: u32,
}

impl Default for CombatSettings {
    fn default() -> Self {
        Self {
            projectile_speed: DEFAULT_PROJECTILE_SPEED,
            retarget_cooldown_ms: BOXED_IN_RETARGET_MS,
            max_combat_ms: 90_000,
        }
    }
}

/// How max experience evolves with level.
///
/// Both variants exist in the wild; the configuration picks one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(tag = "type", rename_all = "camelCase"))]
pub enum ExperienceCurve {
    /// `base + per_level * (level - 1)` at every level
    #[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
    Linear { base: u32, per_level: u32 },
    /// Like `Linear` until `freeze_at`, then zero (no further leveling)
    #[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
    Frozen {
        base: u32,
        per_level: u32,
        freeze_at: u8,
    },
}

impl ExperienceCurve {
    /// Experience needed to leave `level`; zero disables leveling
    pub fn max_experience(&self, level: u8) -> u32 {
        let level = level.max(1) as u32;
        match *self {
            ExperienceCurve::Linear { base, per_level } => base + per_level * (level - 1),
            ExperienceCurve::Frozen {
                base,
                per_level,
                freeze_at,
            } => {
                if level >= freeze_at as u32 {
                    0
                } else {
                    base + per_level * (level - 1)
                }
            }
        }
    }
}

impl Default for ExperienceCurve {
    fn default() -> Self {
        ExperienceCurve::Linear {
            base: 4,
            per_level: 4,
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(default, rename_all = "camelCase"))]
pub struct GoldIncome {
    pub base: u32,
    pub per_round: u32,
    pub max: u32,
}

impl GoldIncome {
    /// Gold granted when `round` begins shopping
    pub fn for_round(&self, round: u32) -> u32 {
        self.base
            .saturating_add(self.per_round.saturating_mul(round))
            .min(self.max)
    }
}

impl Default for GoldIncome {
    fn default() -> Self {
        Self {
            base: 2,
            per_round: 1,
            max: 7,
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(default, rename_all = "camelCase"))]
pub struct GameConfig {
    pub board: BoardConfig,
    pub bench_capacity: Option<u8>,
    pub units_needed_for_combo: u8,
    pub shop_size: u8,
    pub starting_gold: u32,
    pub starting_experience: u32,
    pub reroll_cost: u32,
    pub max_level: u8,
    pub starting_max_active_units: u8,
    pub experience_curve: ExperienceCurve,
    pub experience_per_round: u32,
    pub gold_income: GoldIncome,
    pub win_bonus_gold: u32,
    pub end_round_leeway_ms: Option<u32>,
    pub reward_delay_ms: u32,
    pub combat: CombatSettings,
    pub catalog: Vec<UnitTemplate>,
    pub synergies: Vec<SynergyDefinition>,
    pub enemy_waves: Vec<ArmyRoster>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            bench_capacity: None,
            units_needed_for_combo: DEFAULT_UNITS_NEEDED_FOR_COMBO,
            shop_size: 5,
            starting_gold: 10,
            starting_experience: 0,
            reroll_cost: 2,
            max_level: 9,
            starting_max_active_units: 3,
            experience_curve: ExperienceCurve::default(),
            experience_per_round: 2,
            gold_income: GoldIncome::default(),
            win_bonus_gold: 1,
            end_round_leeway_ms: None,
            reward_delay_ms: 1500,
            combat: CombatSettings::default(),
            catalog: Vec::new(),
            synergies: Vec::new(),
            enemy_waves: Vec::new(),
        }
    }
}

impl GameConfig {
    pub fn bench_capacity(&self) -> u8 {
        self.bench_capacity.unwrap_or(DEFAULT_BENCH_CAPACITY)
    }

    pub fn end_round_leeway_ms(&self) -> u32 {
        self.end_round_leeway_ms
            .unwrap_or(DEFAULT_END_ROUND_LEEWAY_MS)
    }

    /// Check cross references. An empty wave list passes here; it is
    /// reported when a round tries to start.
    pub fn validate(&self) -> GameResult<()> {
        BoardGrid::check_layout(
            self.board.width,
            self.board.zone_rows,
            self.bench_capacity(),
        )?;
        for synergy in &self.synergies {
            synergy.validate()?;
        }
        let catalog = Catalog::new(self.catalog.clone());
        catalog.validate()?;
        for template in &self.catalog {
            for tag in &template.traits {
                if !self.synergies.iter().any(|s| s.id == *tag) {
                    return Err(GameError::SynergyNotFound { synergy: *tag });
                }
            }
        }
        for (index, wave) in self.enemy_waves.iter().enumerate() {
            let mut taken = Vec::new();
            for unit in &wave.units {
                catalog.get(unit.template)?;
                let spot = (unit.column, unit.row);
                if unit.column >= self.board.width
                    || unit.row >= self.board.zone_rows
                    || taken.contains(&spot)
                {
                    return Err(GameError::InvalidWavePlacement {
                        wave: index as u32,
                        x: unit.column,
                        y: unit.row,
                    });
                }
                taken.push(spot);
            }
        }
        Ok(())
    }
}
