//! Stat computation for a unit instance.
//!
//! Derived stats are a pure function of the template and the additive bonus
//! fields. They are recomputed after every bonus change and never cached
//! across one.

use core::ops::{AddAssign, Neg, SubAssign};

use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

use crate::types::TemplateStats;

/// Physical damage reduction per point of armor, in per-mille (1.7%).
pub const ARMOR_REDUCTION_PERMILLE: i64 = 17;

/// Returned for timers whose rate collapsed to zero or below.
pub const NEVER_MS: u32 = u32::MAX;

/// Additive stat bonuses. Negative values are debuffs and are never clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(default, rename_all = "camelCase"))]
pub struct Bonuses {
    /// Percent; 100 doubles attacks per second
    pub attack_speed: i32,
    pub damage: i32,
    pub armor: i32,
    pub health: i32,
    pub move_speed: i32,
}

impl Bonuses {
    pub fn is_zero(&self) -> bool {
        *self == Bonuses::default()
    }
}

impl AddAssign for Bonuses {
    fn add_assign(&mut self, rhs: Self) {
        self.attack_speed += rhs.attack_speed;
        self.damage += rhs.damage;
        self.armor += rhs.armor;
        self.health += rhs.health;
        self.move_speed += rhs.move_speed;
    }
}

impl SubAssign for Bonuses {
    fn sub_assign(&mut self, rhs: Self) {
        self.attack_speed -= rhs.attack_speed;
        self.damage -= rhs.damage;
        self.armor -= rhs.armor;
        self.health -= rhs.health;
        self.move_speed -= rhs.move_speed;
    }
}

impl Neg for Bonuses {
    type Output = Bonuses;

    fn neg(self) -> Bonuses {
        Bonuses {
            attack_speed: -self.attack_speed,
            damage: -self.damage,
            armor: -self.armor,
            health: -self.health,
            move_speed: -self.move_speed,
        }
    }
}

/// Stats after bonuses, as combat reads them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct DerivedStats {
    /// Full cycle between attack decisions
    pub attack_time_ms: u32,
    /// Windup inside one cycle
    pub attack_point_ms: u32,
    pub min_damage: i32,
    pub max_damage: i32,
    /// Flat damage added to every roll
    pub bonus_damage: i32,
    pub armor: i32,
    pub max_health: i32,
    pub max_mana: i32,
    pub mana_per_attack: i32,
    pub move_speed: i32,
    pub attack_range: u8,
}

impl DerivedStats {
    /// Attacks per second scaled by 1000
    pub fn attacks_per_thousand_seconds(&self) -> u64 {
        if self.attack_time_ms == 0 || self.attack_time_ms == NEVER_MS {
            return 0;
        }
        1_000_000 / self.attack_time_ms as u64
    }

    /// Physical damage reduction in per-mille (armor * 1.7%)
    pub fn physical_reduction_permille(&self) -> i64 {
        self.armor as i64 * ARMOR_REDUCTION_PERMILLE
    }
}

/// Derive the live stats of a unit from its template and bonuses.
pub fn derive_stats(base: &TemplateStats, bonuses: &Bonuses) -> DerivedStats {
    DerivedStats {
        attack_time_ms: scale_by_attack_speed(base.base_attack_time_ms, bonuses.attack_speed),
        attack_point_ms: scale_by_attack_speed(base.attack_point_ms, bonuses.attack_speed),
        min_damage: base.min_damage,
        max_damage: base.max_damage,
        bonus_damage: bonuses.damage,
        armor: base.armor + bonuses.armor,
        max_health: base.health + bonuses.health,
        max_mana: base.mana_cost,
        mana_per_attack: base.mana_per_attack,
        move_speed: base.move_speed + bonuses.move_speed,
        attack_range: base.attack_range,
    }
}

/// `base * 100 / (100 + bonus_percent)`; a rate at or below zero never fires.
fn scale_by_attack_speed(base_ms: u32, bonus_percent: i32) -> u32 {
    let denominator = 100i64 + bonus_percent as i64;
    if denominator <= 0 {
        return NEVER_MS;
    }
    let scaled = base_ms as i64 * 100 / denominator;
    scaled.clamp(0, NEVER_MS as i64) as u32
}

/// Damage left after armor. May be negative for large negative armor or rolls.
pub fn mitigate(raw_damage: i32, armor: i32) -> i32 {
    let mitigated = raw_damage as i64 * armor as i64 * ARMOR_REDUCTION_PERMILLE / 1000;
    (raw_damage as i64 - mitigated) as i32
}
