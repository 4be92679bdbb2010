//! Events emitted for the presentation layer.
//!
//! The engine appends to an [`EventLog`]; a UI drains it after each call or
//! tick and plays the entries back in order.

use alloc::vec::Vec;
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

use crate::types::{SynergyId, Team, TemplateId, TileId, UnitId};

/// Phase of the round loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub enum RoundPhase {
    Shopping,
    CombatActive,
    CombatResolving,
    RewardDistribution,
}

impl RoundPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            RoundPhase::Shopping => "shopping",
            RoundPhase::CombatActive => "combat",
            RoundPhase::CombatResolving => "resolving",
            RoundPhase::RewardDistribution => "reward",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub enum RoundOutcome {
    Victory,
    Defeat,
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(tag = "type", content = "payload", rename_all = "camelCase"))]
pub enum GameEvent {
    #[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
    UnitSpawned {
        unit: UnitId,
        team: Team,
        template: TemplateId,
        tile: TileId,
    },
    #[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
    UnitDestroyed { unit: UnitId, team: Team },
    #[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
    UnitMoved {
        unit: UnitId,
        from: Option<TileId>,
        to: TileId,
    },
    #[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
    HealthChanged {
        unit: UnitId,
        health: i32,
        max_health: i32,
    },
    #[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
    ManaChanged { unit: UnitId, mana: i32, max_mana: i32 },
    #[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
    TargetAcquired { unit: UnitId, target: UnitId },
    #[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
    AttackStarted { unit: UnitId, target: UnitId },
    #[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
    ProjectileLaunched {
        projectile: u32,
        source: UnitId,
        target: UnitId,
    },
    #[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
    DamageDealt {
        source: UnitId,
        target: UnitId,
        damage: i32,
        remaining_health: i32,
    },
    /// Armor turned the hit negative; nothing happened
    #[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
    HitAbsorbed { source: UnitId, target: UnitId },
    #[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
    UnitDied { unit: UnitId, team: Team },
    #[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
    PhaseChanged { phase: RoundPhase },
    #[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
    RoundDecided { round: u32, outcome: RoundOutcome },
    #[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
    CombatLimitExceeded { elapsed_ms: u32 },
    #[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
    SynergyChanged {
        synergy: SynergyId,
        owned: u32,
        active: u32,
        tier: u8,
    },
    #[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
    ShopChanged { lineup: Vec<Option<TemplateId>> },
    #[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
    GoldChanged { gold: u32 },
    #[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
    ExperienceChanged {
        experience: u32,
        max_experience: u32,
    },
    #[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
    LevelUp { level: u8, max_active_units: u8 },
}

/// Ordered, append-only event buffer
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn as_slice(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        core::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
