//! Merging N identical bench units into their upgrade.

use alloc::format;
use alloc::vec::Vec;

use crate::catalog::Catalog;
use crate::error::{GameError, GameResult};
use crate::log;
use crate::synergy::SynergyAggregator;
use crate::types::{Team, TemplateId, UnitId};
use crate::world::World;

/// Copies needed for a combine when the configuration leaves it unset
pub const DEFAULT_UNITS_NEEDED_FOR_COMBO: u8 = 3;

#[derive(Debug, Clone, Copy)]
pub struct BenchCombiner {
    units_needed: u8,
}

impl BenchCombiner {
    pub fn new(units_needed: u8) -> Self {
        Self {
            units_needed: if units_needed == 0 {
                DEFAULT_UNITS_NEEDED_FOR_COMBO
            } else {
                units_needed
            },
        }
    }

    pub fn units_needed(&self) -> u8 {
        self.units_needed
    }

    /// Merge `units_needed` bench copies of `template` into its upgrade, then
    /// try again one tier up. Returns the last unit produced. Templates with no
    /// upgrade never combine.
    pub fn check_for_combination(
        &self,
        template: TemplateId,
        world: &mut World,
        synergies: &mut SynergyAggregator,
        catalog: &Catalog,
    ) -> GameResult<Option<UnitId>> {
        let needed = self.units_needed as usize;
        let mut matched: Vec<UnitId> = Vec::with_capacity(needed);
        for occupant in world.bench().into_iter().flatten() {
            let Some(unit) = world.units.get(occupant) else {
                continue;
            };
            if unit.team == Team::Player && unit.template_id() == template {
                matched.push(occupant);
                if matched.len() == needed {
                    break;
                }
            }
        }
        if matched.len() < needed {
            return Ok(None);
        }

        let source = catalog.get(template)?;
        // Top of the chain: nothing to merge into
        let Some(upgraded) = source.upgraded else {
            return Ok(None);
        };
        let upgraded = catalog.get(upgraded)?.clone();
        let mut gold = 0u32;
        for id in &matched {
            let unit = world.destroy(*id)?;
            gold = gold.saturating_add(unit.worth);
        }
        synergies.adjustment_after_combine(source, self.units_needed as u32, &mut world.events);
        log::debug(
            "combine",
            &format!("{} x{} merged, worth {}", source.name, needed, gold),
        );

        let Some(slot) = world.board.first_free_bench_tile() else {
            log::error(&format!(
                "combine of template {} left no bench slot for its upgrade",
                template.0
            ));
            return Err(GameError::NoFreeBenchSlotForCombine { template });
        };
        synergies.acquire(&upgraded, &mut world.events);
        let upgraded_id = upgraded.id;
        let unit = world.spawn(Team::Player, upgraded, gold, slot)?;

        match self.check_for_combination(upgraded_id, world, synergies, catalog)? {
            Some(further) => Ok(Some(further)),
            None => Ok(Some(unit)),
        }
    }
}
