//! View types for UI serialization
//!
//! Snapshots of session state for a presentation layer. They carry no
//! behaviour and are rebuilt on every query.

use alloc::string::String;
use alloc::vec::Vec;
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;

use crate::events::{RoundOutcome, RoundPhase};
use crate::synergy::{SynergyAggregator, SynergyDefinition};
use crate::types::{Point, SynergyId, Team, TemplateId, TileId, UnitId};
use crate::unit::{CombatState, UnitInstance};

#[cfg(feature = "std")]
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

/// One unit with its derived numbers
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct UnitView {
    pub id: UnitId,
    pub team: Team,
    pub template: TemplateId,
    pub name: String,
    pub star: u8,
    pub worth: u32,
    pub tile: Option<TileId>,
    pub position: Point,
    pub alive: bool,
    pub state: CombatState,
    pub health: i32,
    pub max_health: i32,
    pub mana: i32,
    pub max_mana: i32,
    pub min_damage: i32,
    pub max_damage: i32,
    pub armor: i32,
    pub attack_time_ms: u32,
    pub attack_range: u8,
    pub target: Option<UnitId>,
}

impl From<&UnitInstance> for UnitView {
    fn from(unit: &UnitInstance) -> Self {
        Self {
            id: unit.id,
            team: unit.team,
            template: unit.template.id,
            name: unit.template.name.clone(),
            star: unit.template.star,
            worth: unit.worth,
            tile: unit.tile,
            position: unit.position,
            alive: unit.alive,
            state: unit.state,
            health: unit.health,
            max_health: unit.stats.max_health,
            mana: unit.mana,
            max_mana: unit.stats.max_mana,
            min_damage: unit.stats.min_damage + unit.stats.bonus_damage,
            max_damage: unit.stats.max_damage + unit.stats.bonus_damage,
            armor: unit.stats.armor,
            attack_time_ms: unit.stats.attack_time_ms,
            attack_range: unit.stats.attack_range,
            target: unit.target,
        }
    }
}

/// Widget state of one synergy: outline (owned) and fill (active) counts
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct SynergyView {
    pub id: SynergyId,
    pub name: String,
    pub unique_owned: u32,
    pub unique_active: u32,
    pub tier: u8,
    pub total_synergy_size: u8,
    pub total_buff_size: u8,
}

impl SynergyView {
    pub fn new(definition: &SynergyDefinition, synergies: &SynergyAggregator) -> Self {
        let (owned, active) = synergies
            .entry(definition.id)
            .map(|e| (e.unique_owned(), e.unique_active()))
            .unwrap_or((0, 0));
        Self {
            id: definition.id,
            name: definition.name.clone(),
            unique_owned: owned,
            unique_active: active,
            tier: synergies.current_tier(definition.id),
            total_synergy_size: definition.total_synergy_size,
            total_buff_size: definition.total_buff_size,
        }
    }
}

/// The complete session view
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct GameView {
    pub phase: RoundPhase,
    pub round: u32,
    pub gold: u32,
    pub level: u8,
    pub experience: u32,
    pub max_experience: u32,
    pub max_active_units: u8,
    pub shop: Vec<Option<TemplateId>>,
    /// Bench slots in order (None = empty)
    pub bench: Vec<Option<UnitView>>,
    pub player_units: Vec<UnitView>,
    pub enemy_units: Vec<UnitView>,
    pub synergies: Vec<SynergyView>,
    pub last_outcome: Option<RoundOutcome>,
}
