//! Error types for engine operations
//!
//! This module provides no_std compatible error types using enums
//! instead of String-based errors, so rejections can be encoded and compared.

use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;

#[cfg(feature = "std")]
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

use crate::types::{SynergyId, TemplateId, TileId, UnitId};

/// Broad class of a [`GameError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Static data is missing or inconsistent. Aborts the requested transition.
    Configuration,
    /// The caller asked for something not allowed right now. No state changed.
    Rejected,
    /// Internal bookkeeping disagrees with itself. Always a defect.
    Invariant,
}

/// Errors that can occur while driving the simulation
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(tag = "type", rename_all = "camelCase"))]
pub enum GameError {
    // ==========================================
    // CONFIGURATION
    // ==========================================
    /// No enemy waves configured
    MissingEnemyRoster,
    /// `total_synergy_size` is not a multiple of `total_buff_size`, or the tier count is out of range
    InvalidSynergyTiers { synergy: SynergyId, size: u8, tiers: u8 },
    /// A synergy does not define an effect for one of its tiers
    MissingSynergyEffect { synergy: SynergyId, tier: u8 },
    /// Referenced unit template does not exist
    TemplateNotFound { template: TemplateId },
    /// Referenced synergy does not exist
    SynergyNotFound { synergy: SynergyId },
    /// An enemy wave places a unit outside the enemy zone or on a taken tile
    InvalidWavePlacement { wave: u32, x: u8, y: u8 },
    /// Board dimensions cannot host two zones, or need more tile ids than exist
    InvalidBoardSize,
    /// A combine consumed units but left nowhere to put the upgrade
    NoFreeBenchSlotForCombine { template: TemplateId },

    // ==========================================
    // REJECTED USER ACTIONS
    // ==========================================
    /// Not enough gold to perform action
    NotEnoughGold { have: u32, need: u32 },
    /// Bench has no free slot
    BenchFull,
    /// Active unit cap reached
    BoardFull { cap: u8 },
    /// Action not allowed in current phase
    WrongPhase,
    /// Template is not offered by the shop
    NotInShop { template: TemplateId },
    /// Unit does not exist (or was destroyed)
    UnitNotFound { unit: UnitId },
    /// Unit belongs to the enemy
    NotPlayerUnit { unit: UnitId },
    /// Tile index out of range
    InvalidTile { tile: TileId },
    /// Unit is not standing on the tile the caller claims
    UnitNotOnTile { unit: UnitId, tile: TileId },
    /// Destination tile cannot receive player units
    InvalidDestination { tile: TileId },
    /// Destination tile is taken
    TileOccupied { tile: TileId },

    // ==========================================
    // RUNTIME INVARIANTS
    // ==========================================
    /// A unit that should be anchored to the board has no home tile
    MissingHomeTile { unit: UnitId },
    /// Tile occupant and unit position disagree
    OccupancyMismatch { tile: TileId, unit: UnitId },
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        use GameError::*;
        match self {
            MissingEnemyRoster
            | InvalidSynergyTiers { .. }
            | MissingSynergyEffect { .. }
            | TemplateNotFound { .. }
            | SynergyNotFound { .. }
            | InvalidWavePlacement { .. }
            | InvalidBoardSize
            | NoFreeBenchSlotForCombine { .. } => ErrorKind::Configuration,
            MissingHomeTile { .. } | OccupancyMismatch { .. } => ErrorKind::Invariant,
            _ => ErrorKind::Rejected,
        }
    }

    pub fn is_rejection(&self) -> bool {
        self.kind() == ErrorKind::Rejected
    }
}

impl core::fmt::Display for GameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use GameError::*;
        match self {
            MissingEnemyRoster => write!(f, "no enemy waves configured"),
            InvalidSynergyTiers {
                synergy,
                size,
                tiers,
            } => write!(
                f,
                "synergy {} has size {} which cannot be split into {} tiers",
                synergy.0, size, tiers
            ),
            MissingSynergyEffect { synergy, tier } => {
                write!(f, "synergy {} has no effect for tier {}", synergy.0, tier)
            }
            TemplateNotFound { template } => write!(f, "unknown unit template {}", template.0),
            SynergyNotFound { synergy } => write!(f, "unknown synergy {}", synergy.0),
            InvalidWavePlacement { wave, x, y } => {
                write!(f, "wave {} places a unit on invalid tile ({}, {})", wave, x, y)
            }
            InvalidBoardSize => write!(
                f,
                "board must have a positive width and zone depth and at most 65535 tiles"
            ),
            NoFreeBenchSlotForCombine { template } => write!(
                f,
                "no free bench slot for the upgrade of template {}",
                template.0
            ),
            NotEnoughGold { have, need } => {
                write!(f, "not enough gold: have {}, need {}", have, need)
            }
            BenchFull => write!(f, "bench is full"),
            BoardFull { cap } => write!(f, "active unit cap of {} reached", cap),
            WrongPhase => write!(f, "action not allowed in the current phase"),
            NotInShop { template } => write!(f, "template {} is not in the shop", template.0),
            UnitNotFound { unit } => write!(f, "unit {} not found", unit.0),
            NotPlayerUnit { unit } => write!(f, "unit {} is not a player unit", unit.0),
            InvalidTile { tile } => write!(f, "tile {} does not exist", tile.0),
            UnitNotOnTile { unit, tile } => write!(f, "unit {} is not on tile {}", unit.0, tile.0),
            InvalidDestination { tile } => write!(f, "tile {} cannot receive player units", tile.0),
            TileOccupied { tile } => write!(f, "tile {} is occupied", tile.0),
            MissingHomeTile { unit } => write!(f, "unit {} has no home tile", unit.0),
            OccupancyMismatch { tile, unit } => write!(
                f,
                "tile {} and unit {} disagree about occupancy",
                tile.0, unit.0
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GameError {}

/// Result type alias for engine operations
pub type GameResult<T> = Result<T, GameError>;
