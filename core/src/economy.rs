//! Gold and experience.

use alloc::format;
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;

use crate::config::{ExperienceCurve, GameConfig};
use crate::events::{EventLog, GameEvent};
use crate::log;

/// The player's gold
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Encode, Decode, TypeInfo)]
pub struct Wallet {
    gold: u32,
}

impl Wallet {
    pub fn new(gold: u32) -> Self {
        Self { gold }
    }

    pub fn gold(&self) -> u32 {
        self.gold
    }

    /// Take `amount` if the wallet holds it. Nothing changes on `false`.
    pub fn spend_gold(&mut self, amount: u32) -> bool {
        if amount > self.gold {
            return false;
        }
        self.gold -= amount;
        true
    }

    pub fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }
}

/// Level, experience and the active-unit cap it unlocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo)]
pub struct Progression {
    level: u8,
    experience: u32,
    max_experience: u32,
    max_level: u8,
    max_active_units: u8,
}

impl Progression {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            level: 1,
            experience: 0,
            max_experience: config.experience_curve.max_experience(1),
            max_level: config.max_level.max(1),
            max_active_units: config.starting_max_active_units,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn max_experience(&self) -> u32 {
        self.max_experience
    }

    pub fn max_active_units(&self) -> u8 {
        self.max_active_units
    }

    /// Add experience, levelling up as many times as it covers. Each level
    /// raises the active-unit cap by one. A zero threshold or the level cap
    /// stops levelling; experience still accumulates.
    pub fn add_experience(&mut self, amount: u32, curve: &ExperienceCurve, events: &mut EventLog) {
        self.experience = self.experience.saturating_add(amount);
        while self.max_experience > 0
            && self.level < self.max_level
            && self.experience >= self.max_experience
        {
            self.experience -= self.max_experience;
            self.level += 1;
            self.max_active_units = self.max_active_units.saturating_add(1);
            self.max_experience = curve.max_experience(self.level);
            log::info(&format!(
                "level up: {} (max active units {})",
                self.level, self.max_active_units
            ));
            events.push(GameEvent::LevelUp {
                level: self.level,
                max_active_units: self.max_active_units,
            });
        }
        events.push(GameEvent::ExperienceChanged {
            experience: self.experience,
            max_experience: self.max_experience,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_gold_rejects_overdraw() {
        let mut wallet = Wallet::new(3);
        assert!(!wallet.spend_gold(5));
        assert_eq!(wallet.gold(), 3);
        assert!(wallet.spend_gold(3));
        assert_eq!(wallet.gold(), 0);
    }

    #[test]
    fn experience_levels_up_and_raises_cap() {
        let config = GameConfig::default();
        let mut progression = Progression::new(&config);
        let mut events = EventLog::new();
        progression.add_experience(5, &config.experience_curve, &mut events);
        assert_eq!(progression.level(), 2);
        assert_eq!(progression.experience(), 1);
        assert_eq!(progression.max_experience(), 8);
        assert_eq!(progression.max_active_units(), 4);
    }

    #[test]
    fn frozen_curve_stops_levelling() {
        let mut config = GameConfig::default();
        config.experience_curve = ExperienceCurve::Frozen {
            base: 2,
            per_level: 2,
            freeze_at: 3,
        };
        let mut progression = Progression::new(&config);
        let mut events = EventLog::new();
        progression.add_experience(100, &config.experience_curve, &mut events);
        assert_eq!(progression.level(), 3);
        assert_eq!(progression.max_experience(), 0);
        assert_eq!(progression.max_active_units(), 5);
    }
}
