//! Team synergies: unique-template bookkeeping and threshold buffs.
//!
//! The aggregator tracks, per synergy, which templates the player owns and
//! which are standing on the zone grid. Combat numbers do not come from that
//! bookkeeping: [`SynergyAggregator::apply_team_effects`] re-derives tiers from
//! the army it is handed, so applying and clearing never compounds.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::events::{EventLog, GameEvent};
use crate::log;
use crate::stats::Bonuses;
use crate::types::{SynergyId, TemplateId, UnitId, UnitTemplate};
use crate::unit::UnitArena;

/// Highest number of buff tiers a synergy may define
pub const MAX_BUFF_TIERS: u8 = 3;

/// Stat delta granted by one tier of a synergy
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct SynergyEffect {
    /// 1-based tier index
    pub tier: u8,
    pub bonus: Bonuses,
}

impl SynergyEffect {
    pub fn new(tier: u8, bonus: Bonuses) -> Self {
        Self { tier, bonus }
    }

    /// Add this tier's delta to each unit, tracked as synergy-granted
    pub fn apply(&self, units: &mut UnitArena, targets: &[UnitId]) {
        for id in targets {
            if let Some(unit) = units.get_mut(*id) {
                unit.add_synergy_bonus(self.bonus);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct SynergyDefinition {
    pub id: SynergyId,
    pub name: String,
    #[cfg_attr(feature = "std", serde(default))]
    pub description: String,
    /// Unique templates needed to reach the last tier
    pub total_synergy_size: u8,
    /// Number of tiers, 1 to 3
    pub total_buff_size: u8,
    pub effects: Vec<SynergyEffect>,
    /// Tier effects land on the opposing army instead of the holders
    #[cfg_attr(feature = "std", serde(default))]
    pub enemy_debuff: bool,
}

impl SynergyDefinition {
    /// Reject tier tables that would need rounding.
    pub fn validate(&self) -> GameResult<()> {
        let tiers = self.total_buff_size;
        if tiers == 0
            || tiers > MAX_BUFF_TIERS
            || self.total_synergy_size == 0
            || self.total_synergy_size % tiers != 0
        {
            return Err(GameError::InvalidSynergyTiers {
                synergy: self.id,
                size: self.total_synergy_size,
                tiers,
            });
        }
        for tier in 1..=tiers {
            if self.effect(tier).is_none() {
                return Err(GameError::MissingSynergyEffect {
                    synergy: self.id,
                    tier,
                });
            }
        }
        Ok(())
    }

    /// Unique templates per tier
    pub fn step(&self) -> u32 {
        (self.total_synergy_size / self.total_buff_size.max(1)).max(1) as u32
    }

    /// Tier reached with `unique` distinct templates
    pub fn tier_for(&self, unique: u32) -> u8 {
        (unique / self.step()).min(self.total_buff_size as u32) as u8
    }

    pub fn effect(&self, tier: u8) -> Option<&SynergyEffect> {
        self.effects.iter().find(|e| e.tier == tier)
    }
}

/// Per-synergy counters: template -> number of copies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynergyEntry {
    owned: BTreeMap<TemplateId, u32>,
    active: BTreeMap<TemplateId, u32>,
}

impl SynergyEntry {
    pub fn unique_owned(&self) -> u32 {
        self.owned.len() as u32
    }

    pub fn unique_active(&self) -> u32 {
        self.active.len() as u32
    }

    pub fn owned_copies(&self, template: TemplateId) -> u32 {
        self.owned.get(&template).copied().unwrap_or(0)
    }

    pub fn active_copies(&self, template: TemplateId) -> u32 {
        self.active.get(&template).copied().unwrap_or(0)
    }
}

fn increment(map: &mut BTreeMap<TemplateId, u32>, template: TemplateId) {
    *map.entry(template).or_insert(0) += 1;
}

fn decrement(map: &mut BTreeMap<TemplateId, u32>, template: TemplateId, by: u32) {
    if let Some(count) = map.get_mut(&template) {
        *count = count.saturating_sub(by);
        if *count == 0 {
            map.remove(&template);
        }
    }
}

/// One synergy bucket while scanning an army
struct Bucket {
    affected: Vec<UnitId>,
    templates: BTreeSet<TemplateId>,
    queued: u8,
}

#[derive(Debug, Clone)]
pub struct SynergyAggregator {
    definitions: Vec<SynergyDefinition>,
    entries: Vec<SynergyEntry>,
}

impl SynergyAggregator {
    pub fn new(definitions: Vec<SynergyDefinition>) -> GameResult<Self> {
        for definition in &definitions {
            definition.validate()?;
        }
        let entries = vec![SynergyEntry::default(); definitions.len()];
        Ok(Self {
            definitions,
            entries,
        })
    }

    pub fn definitions(&self) -> &[SynergyDefinition] {
        &self.definitions
    }

    fn index_of(&self, synergy: SynergyId) -> Option<usize> {
        self.definitions.iter().position(|d| d.id == synergy)
    }

    pub fn entry(&self, synergy: SynergyId) -> Option<&SynergyEntry> {
        self.index_of(synergy).map(|i| &self.entries[i])
    }

    /// Tier the player's board currently shows for `synergy`
    pub fn current_tier(&self, synergy: SynergyId) -> u8 {
        match self.index_of(synergy) {
            Some(i) => self.definitions[i].tier_for(self.entries[i].unique_active()),
            None => 0,
        }
    }

    /// A copy of `template` joined the player's collection
    pub fn acquire(&mut self, template: &UnitTemplate, events: &mut EventLog) {
        self.for_each_trait(template, events, |entry| {
            increment(&mut entry.owned, template.id)
        });
    }

    /// A copy of `template` left the player's collection
    pub fn release(&mut self, template: &UnitTemplate, events: &mut EventLog) {
        self.for_each_trait(template, events, |entry| {
            decrement(&mut entry.owned, template.id, 1)
        });
    }

    /// A copy of `template` moved onto the zone grid
    pub fn activate(&mut self, template: &UnitTemplate, events: &mut EventLog) {
        let id = template.id;
        self.for_each_trait(template, events, |entry| {
            if entry.active_copies(id) < entry.owned_copies(id) {
                increment(&mut entry.active, id);
            } else {
                log::error(&format!(
                    "activating template {} beyond its owned copies",
                    id.0
                ));
            }
        });
    }

    /// A copy of `template` left the zone grid
    pub fn deactivate(&mut self, template: &UnitTemplate, events: &mut EventLog) {
        self.for_each_trait(template, events, |entry| {
            decrement(&mut entry.active, template.id, 1)
        });
    }

    /// `consumed` copies of `template` were merged away on the bench
    pub fn adjustment_after_combine(
        &mut self,
        template: &UnitTemplate,
        consumed: u32,
        events: &mut EventLog,
    ) {
        self.for_each_trait(template, events, |entry| {
            decrement(&mut entry.owned, template.id, consumed)
        });
    }

    fn for_each_trait<F>(&mut self, template: &UnitTemplate, events: &mut EventLog, mut update: F)
    where
        F: FnMut(&mut SynergyEntry),
    {
        let mut seen: Vec<SynergyId> = Vec::new();
        for synergy in &template.traits {
            if seen.contains(synergy) {
                continue;
            }
            seen.push(*synergy);
            let Some(index) = self.index_of(*synergy) else {
                continue;
            };
            let before = self.entries[index].clone();
            update(&mut self.entries[index]);
            let entry = &self.entries[index];
            if entry.unique_owned() != before.unique_owned()
                || entry.unique_active() != before.unique_active()
            {
                events.push(GameEvent::SynergyChanged {
                    synergy: *synergy,
                    owned: entry.unique_owned(),
                    active: entry.unique_active(),
                    tier: self.definitions[index].tier_for(entry.unique_active()),
                });
            }
        }
    }

    /// Buff `friendly` (or debuff `hostile`) from the unique templates
    /// `friendly` fields. Returns the tiers applied per synergy.
    pub fn apply_team_effects(
        &self,
        units: &mut UnitArena,
        friendly: &[UnitId],
        hostile: &[UnitId],
    ) -> Vec<(SynergyId, u8)> {
        let mut buckets: Vec<Bucket> = self
            .definitions
            .iter()
            .map(|_| Bucket {
                affected: Vec::new(),
                templates: BTreeSet::new(),
                queued: 0,
            })
            .collect();

        for id in friendly {
            let Some(unit) = units.get(*id) else {
                continue;
            };
            for synergy in &unit.template.traits {
                let Some(index) = self.index_of(*synergy) else {
                    continue;
                };
                let definition = &self.definitions[index];
                let bucket = &mut buckets[index];
                if bucket.affected.last() == Some(id) {
                    continue;
                }
                bucket.affected.push(*id);
                if bucket.templates.insert(unit.template.id)
                    && bucket.templates.len() as u32 % definition.step() == 0
                    && bucket.queued < definition.total_buff_size
                {
                    bucket.queued += 1;
                }
            }
        }

        let mut applied = Vec::new();
        for (definition, bucket) in self.definitions.iter().zip(buckets.iter()) {
            if bucket.queued == 0 {
                continue;
            }
            let targets: &[UnitId] = if definition.enemy_debuff {
                hostile
            } else {
                &bucket.affected
            };
            for tier in 1..=bucket.queued {
                if let Some(effect) = definition.effect(tier) {
                    effect.apply(units, targets);
                }
            }
            log::debug(
                "synergy",
                &format!(
                    "{} tier {} on {} units",
                    definition.name,
                    bucket.queued,
                    targets.len()
                ),
            );
            applied.push((definition.id, bucket.queued));
        }
        applied
    }

    /// Strip every synergy-granted delta from `army`
    pub fn clear_team_effects(units: &mut UnitArena, army: &[UnitId]) {
        for id in army {
            if let Some(unit) = units.get_mut(*id) {
                unit.clear_synergy_bonuses();
            }
        }
    }
}
