#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod log;

pub mod board;
pub mod catalog;
pub mod combat;
pub mod combine;
pub mod config;
pub mod economy;
pub mod error;
pub mod events;
pub mod rng;
pub mod round;
pub mod session;
pub mod shop;
pub mod simulation;
pub mod starter;
pub mod stats;
pub mod synergy;
pub mod types;
pub mod unit;
pub mod view;
pub mod world;

#[cfg(test)]
mod tests;

pub use board::{BoardGrid, BoardTile, TileCategory};
pub use catalog::Catalog;
pub use combat::{CombatController, HitOutcome, Projectile, TickReport};
pub use combine::BenchCombiner;
pub use config::{BoardConfig, CombatSettings, ExperienceCurve, GameConfig, GoldIncome};
pub use economy::{Progression, Wallet};
pub use error::{ErrorKind, GameError, GameResult};
pub use events::{EventLog, GameEvent, RoundOutcome, RoundPhase};
pub use rng::{BattleRng, XorShiftRng};
pub use round::RoundOrchestrator;
pub use session::Session;
pub use shop::Shop;
pub use simulation::Simulation;
pub use stats::{derive_stats, mitigate, Bonuses, DerivedStats};
pub use synergy::{SynergyAggregator, SynergyDefinition, SynergyEffect, SynergyEntry};
pub use types::*;
pub use unit::{CombatState, UnitArena, UnitInstance};
pub use view::{GameView, SynergyView, UnitView};
pub use world::{Rosters, World};
