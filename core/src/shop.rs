//! Shop line-up rolls.

use alloc::vec;
use alloc::vec::Vec;

use crate::catalog::Catalog;
use crate::events::{EventLog, GameEvent};
use crate::rng::BattleRng;
use crate::types::TemplateId;

/// Fixed-size line-up. An emptied slot stays `None` until the next roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shop {
    lineup: Vec<Option<TemplateId>>,
}

impl Shop {
    pub fn new(size: u8) -> Self {
        Self {
            lineup: vec![None; size as usize],
        }
    }

    pub fn lineup(&self) -> &[Option<TemplateId>] {
        &self.lineup
    }

    pub fn contains(&self, template: TemplateId) -> bool {
        self.lineup.contains(&Some(template))
    }

    /// Refill every slot with a quality-weighted draw over purchasable templates
    pub fn roll(&mut self, catalog: &Catalog, rng: &mut impl BattleRng, events: &mut EventLog) {
        let pool = catalog.purchasable();
        let total_weight: u32 = pool.iter().map(|t| t.quality.shop_weight()).sum();
        for slot in self.lineup.iter_mut() {
            *slot = None;
            if total_weight == 0 {
                continue;
            }
            let mut target = rng.gen_range(total_weight as usize) as u32;
            for template in &pool {
                let weight = template.quality.shop_weight();
                if target < weight {
                    *slot = Some(template.id);
                    break;
                }
                target -= weight;
            }
        }
        events.push(GameEvent::ShopChanged {
            lineup: self.lineup.clone(),
        });
    }

    /// Empty the first slot offering `template`
    pub fn take(&mut self, template: TemplateId, events: &mut EventLog) -> bool {
        let Some(slot) = self.lineup.iter_mut().find(|s| **s == Some(template)) else {
            return false;
        };
        *slot = None;
        events.push(GameEvent::ShopChanged {
            lineup: self.lineup.clone(),
        });
        true
    }
}
