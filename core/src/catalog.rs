//! Template lookup by id.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::error::{GameError, GameResult};
use crate::types::{TemplateId, UnitTemplate};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    templates: BTreeMap<TemplateId, UnitTemplate>,
}

impl Catalog {
    pub fn new(templates: Vec<UnitTemplate>) -> Self {
        Self {
            templates: templates.into_iter().map(|t| (t.id, t)).collect(),
        }
    }

    pub fn get(&self, id: TemplateId) -> GameResult<&UnitTemplate> {
        self.templates
            .get(&id)
            .ok_or(GameError::TemplateNotFound { template: id })
    }

    pub fn contains(&self, id: TemplateId) -> bool {
        self.templates.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitTemplate> {
        self.templates.values()
    }

    /// Templates a shop may offer: everything that is not only reachable by combining
    pub fn purchasable(&self) -> Vec<&UnitTemplate> {
        self.templates
            .values()
            .filter(|t| !self.templates.values().any(|o| o.upgraded == Some(t.id)))
            .collect()
    }

    /// Every referenced upgrade must exist
    pub fn validate(&self) -> GameResult<()> {
        for template in self.templates.values() {
            if let Some(upgraded) = template.upgraded {
                self.get(upgraded)?;
            }
        }
        Ok(())
    }
}
