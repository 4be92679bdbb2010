//! Unit instances and the arena that owns them.

use alloc::vec::Vec;
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

use crate::stats::{derive_stats, Bonuses, DerivedStats};
use crate::types::{Point, Team, TemplateId, TileId, UnitId, UnitTemplate};

/// Per-unit combat state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub enum CombatState {
    /// Not fighting, or waiting for a death/spawn to look for targets again
    Idle,
    /// Needs a target search on its next step
    Targeting,
    /// Walking to the next tile
    Moving,
    /// Target in range, waiting for the readiness rule to allow the first swing
    ReadyToAttack,
    /// Attack point timer running
    AttackWindup,
    /// Hit delivered, waiting for the rest of the attack time
    AttackResolve,
    Dead,
}

/// Movement in progress between two tile centres
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo)]
pub struct Transit {
    pub from: Point,
    pub to: Point,
    pub total_ms: u32,
    pub remaining_ms: u32,
}

/// Countdowns owned by one unit. `None` means not scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Encode, Decode, TypeInfo)]
pub struct UnitTimers {
    pub attack_point: Option<u32>,
    pub attack_time: Option<u32>,
    pub retarget: Option<u32>,
}

impl UnitTimers {
    /// Drop a windup that has not released yet. The attack-time countdown
    /// keeps running so the next decision still waits out the full cycle.
    pub fn cancel_swing(&mut self) {
        self.attack_point = None;
    }

    /// Still inside the current attack cycle
    pub fn recovering(&self) -> bool {
        self.attack_time.is_some()
    }

    pub fn cancel_all(&mut self) {
        *self = UnitTimers::default();
    }
}

/// The last three distinct tiles a unit stood on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Encode, Decode, TypeInfo)]
pub struct RecentTiles {
    slots: [Option<TileId>; 3],
    next: u8,
}

impl RecentTiles {
    pub fn push(&mut self, tile: TileId) {
        let newest = (self.next as usize + 2) % 3;
        if self.slots[newest] == Some(tile) {
            return;
        }
        self.slots[self.next as usize] = Some(tile);
        self.next = (self.next + 1) % 3;
    }

    pub fn contains(&self, tile: TileId) -> bool {
        self.slots.contains(&Some(tile))
    }

    pub fn clear(&mut self) {
        *self = RecentTiles::default();
    }
}

/// A live unit: template, bonuses and combat bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo)]
pub struct UnitInstance {
    pub id: UnitId,
    pub team: Team,
    pub template: UnitTemplate,
    /// Gold this unit is worth when sold
    pub worth: u32,
    /// All additive bonuses, synergy-granted ones included
    pub bonuses: Bonuses,
    /// Subset of `bonuses` granted by synergies, for exact removal
    pub synergy_bonuses: Bonuses,
    pub stats: DerivedStats,
    pub health: i32,
    pub mana: i32,
    pub alive: bool,
    pub tile: Option<TileId>,
    /// Pre-combat anchor on the zone grid
    pub home_tile: Option<TileId>,
    pub position: Point,
    pub recent_tiles: RecentTiles,
    pub target: Option<UnitId>,
    pub state: CombatState,
    /// Set while the target is in range and this unit is allowed to swing at it
    pub ready_to_attack: bool,
    pub transit: Option<Transit>,
    pub timers: UnitTimers,
}

impl UnitInstance {
    pub fn new(id: UnitId, team: Team, template: UnitTemplate, worth: u32) -> Self {
        let bonuses = Bonuses::default();
        let stats = derive_stats(&template.stats, &bonuses);
        Self {
            id,
            team,
            worth,
            bonuses,
            synergy_bonuses: Bonuses::default(),
            health: stats.max_health,
            mana: 0,
            stats,
            template,
            alive: true,
            tile: None,
            home_tile: None,
            position: Point::default(),
            recent_tiles: RecentTiles::default(),
            target: None,
            state: CombatState::Idle,
            ready_to_attack: false,
            transit: None,
            timers: UnitTimers::default(),
        }
    }

    pub fn template_id(&self) -> TemplateId {
        self.template.id
    }

    /// Recompute derived stats after a bonus change
    pub fn refresh_stats(&mut self) {
        self.stats = derive_stats(&self.template.stats, &self.bonuses);
    }

    pub fn add_bonus(&mut self, delta: Bonuses) {
        self.bonuses += delta;
        self.refresh_stats();
    }

    /// Add a synergy-granted delta, tracked for exact reversal
    pub fn add_synergy_bonus(&mut self, delta: Bonuses) {
        self.bonuses += delta;
        self.synergy_bonuses += delta;
        self.refresh_stats();
    }

    /// Remove every synergy-granted delta and recompute
    pub fn clear_synergy_bonuses(&mut self) {
        let granted = self.synergy_bonuses;
        self.bonuses -= granted;
        self.synergy_bonuses = Bonuses::default();
        self.refresh_stats();
    }

    /// Full health and empty mana bar, health clamped to the current maximum
    pub fn refresh_vitals(&mut self) {
        self.health = self.stats.max_health.max(0);
        self.mana = 0;
    }

    /// Drop all combat bookkeeping
    pub fn reset_combat(&mut self) {
        self.target = None;
        self.ready_to_attack = false;
        self.transit = None;
        self.timers.cancel_all();
        self.state = if self.alive {
            CombatState::Idle
        } else {
            CombatState::Dead
        };
    }

    /// Alive and standing on the board
    pub fn is_targetable(&self) -> bool {
        self.alive && self.tile.is_some()
    }
}

/// Dense slot storage for units. Destroying a unit frees its slot; ids are
/// handed out monotonically so a stale id never aliases a new unit.
#[derive(Debug, Clone, Default)]
pub struct UnitArena {
    slots: Vec<Option<UnitInstance>>,
}

impl UnitArena {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn spawn(&mut self, team: Team, template: UnitTemplate, worth: u32) -> UnitId {
        let id = UnitId(self.slots.len() as u32);
        self.slots
            .push(Some(UnitInstance::new(id, team, template, worth)));
        id
    }

    pub fn get(&self, id: UnitId) -> Option<&UnitInstance> {
        self.slots.get(id.0 as usize).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut UnitInstance> {
        self.slots
            .get_mut(id.0 as usize)
            .and_then(|slot| slot.as_mut())
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.get(id).is_some()
    }

    /// Free the slot, returning the record
    pub fn remove(&mut self, id: UnitId) -> Option<UnitInstance> {
        self.slots.get_mut(id.0 as usize).and_then(|slot| slot.take())
    }

    /// Put a record taken with [`UnitArena::remove`] back into its slot
    pub fn restore(&mut self, unit: UnitInstance) {
        if let Some(slot) = self.slots.get_mut(unit.id.0 as usize) {
            *slot = Some(unit);
        }
    }

    /// Units in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &UnitInstance> {
        self.slots.iter().filter_map(|slot| slot.as_ref())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
