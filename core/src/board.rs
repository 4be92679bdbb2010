//! Tile occupancy for the two team zones and the bench.
//!
//! Zone tiles form one `width x (2 * zone_rows)` grid: rows `0..zone_rows`
//! belong to the player, the rest to the enemy. Bench tiles come after the
//! grid in the tile table and have no neighbours.

use alloc::vec::Vec;
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::log;
use crate::types::{Coord, Team, TileId, UnitId};
use crate::unit::UnitInstance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub enum TileCategory {
    PlayerZone,
    EnemyZone,
    Bench,
}

impl TileCategory {
    pub fn is_zone(self) -> bool {
        !matches!(self, TileCategory::Bench)
    }

    pub fn zone_of(team: Team) -> TileCategory {
        match team {
            Team::Player => TileCategory::PlayerZone,
            Team::Enemy => TileCategory::EnemyZone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct BoardTile {
    pub id: TileId,
    /// Grid coordinate; bench slots use `(slot, -1)`
    pub coord: Coord,
    pub category: TileCategory,
    pub occupant: Option<UnitId>,
}

/// The grid plus the bench, with exclusive occupancy
#[derive(Debug, Clone)]
pub struct BoardGrid {
    width: u8,
    zone_rows: u8,
    tiles: Vec<BoardTile>,
    bench_start: usize,
}

/// Tile ids are `u16`, so the whole table must stay below this size
pub const MAX_TILES: usize = u16::MAX as usize;

fn tile_id(index: usize) -> GameResult<TileId> {
    u16::try_from(index)
        .map(TileId)
        .map_err(|_| GameError::InvalidBoardSize)
}

impl BoardGrid {
    /// Both zones need a row and a column, and every tile an id
    pub fn check_layout(width: u8, zone_rows: u8, bench_capacity: u8) -> GameResult<()> {
        let total = width as usize * zone_rows as usize * 2 + bench_capacity as usize;
        if width == 0 || zone_rows == 0 || total > MAX_TILES {
            return Err(GameError::InvalidBoardSize);
        }
        Ok(())
    }

    pub fn new(width: u8, zone_rows: u8, bench_capacity: u8) -> GameResult<Self> {
        Self::check_layout(width, zone_rows, bench_capacity)?;
        let height = zone_rows as usize * 2;
        let mut tiles = Vec::with_capacity(width as usize * height + bench_capacity as usize);
        for y in 0..height {
            for x in 0..width as usize {
                let category = if y < zone_rows as usize {
                    TileCategory::PlayerZone
                } else {
                    TileCategory::EnemyZone
                };
                tiles.push(BoardTile {
                    id: tile_id(tiles.len())?,
                    coord: Coord::new(x as i16, y as i16),
                    category,
                    occupant: None,
                });
            }
        }
        let bench_start = tiles.len();
        for slot in 0..bench_capacity {
            tiles.push(BoardTile {
                id: tile_id(tiles.len())?,
                coord: Coord::new(slot as i16, -1),
                category: TileCategory::Bench,
                occupant: None,
            });
        }
        Ok(Self {
            width,
            zone_rows,
            tiles,
            bench_start,
        })
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn zone_rows(&self) -> u8 {
        self.zone_rows
    }

    pub fn tile(&self, id: TileId) -> GameResult<&BoardTile> {
        self.tiles
            .get(id.0 as usize)
            .ok_or(GameError::InvalidTile { tile: id })
    }

    pub fn tiles(&self) -> &[BoardTile] {
        &self.tiles
    }

    pub fn occupant(&self, id: TileId) -> Option<UnitId> {
        self.tiles.get(id.0 as usize).and_then(|t| t.occupant)
    }

    pub fn is_free(&self, id: TileId) -> bool {
        self.tiles
            .get(id.0 as usize)
            .map(|t| t.occupant.is_none())
            .unwrap_or(false)
    }

    pub fn category(&self, id: TileId) -> Option<TileCategory> {
        self.tiles.get(id.0 as usize).map(|t| t.category)
    }

    pub fn coord(&self, id: TileId) -> Option<Coord> {
        self.tiles.get(id.0 as usize).map(|t| t.coord)
    }

    /// Zone tile at a grid coordinate
    pub fn tile_at(&self, coord: Coord) -> Option<TileId> {
        let height = self.zone_rows as i16 * 2;
        if coord.x < 0 || coord.y < 0 || coord.x >= self.width as i16 || coord.y >= height {
            return None;
        }
        let index = coord.y as usize * self.width as usize + coord.x as usize;
        tile_id(index).ok()
    }

    /// Enemy-zone tile by local coordinates, row 0 facing the player
    pub fn enemy_tile(&self, column: u8, row: u8) -> Option<TileId> {
        if row >= self.zone_rows {
            return None;
        }
        self.tile_at(Coord::new(column as i16, self.zone_rows as i16 + row as i16))
    }

    pub fn bench_capacity(&self) -> usize {
        self.tiles.len() - self.bench_start
    }

    /// Bench tile for a slot index
    pub fn bench_tile(&self, slot: usize) -> Option<TileId> {
        if slot < self.bench_capacity() {
            tile_id(self.bench_start + slot).ok()
        } else {
            None
        }
    }

    pub fn bench_tiles(&self) -> impl Iterator<Item = &BoardTile> {
        self.tiles[self.bench_start..].iter()
    }

    /// First free bench tile in slot order
    pub fn first_free_bench_tile(&self) -> Option<TileId> {
        self.bench_tiles()
            .find(|t| t.occupant.is_none())
            .map(|t| t.id)
    }

    /// Free tiles of a category in table order
    pub fn free_tiles(&self, category: TileCategory) -> impl Iterator<Item = TileId> + '_ {
        self.tiles
            .iter()
            .filter(move |t| t.category == category && t.occupant.is_none())
            .map(|t| t.id)
    }

    /// Up to eight in-bounds zone tiles around `id`, row-major from the top-left.
    /// Bench tiles have no neighbours.
    pub fn neighbors(&self, id: TileId) -> Vec<TileId> {
        let tile = match self.tiles.get(id.0 as usize) {
            Some(t) if t.category.is_zone() => t,
            _ => return Vec::new(),
        };
        let mut out = Vec::with_capacity(8);
        for dy in -1i16..=1 {
            for dx in -1i16..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if let Some(n) = self.tile_at(Coord::new(tile.coord.x + dx, tile.coord.y + dy)) {
                    out.push(n);
                }
            }
        }
        out
    }

    /// Move `unit` onto `to` as one step: the destination is checked, the old
    /// tile released and both pointers updated together. Returns the tile the
    /// unit left, if any.
    pub fn place(&mut self, unit: &mut UnitInstance, to: TileId) -> GameResult<Option<TileId>> {
        let target = self
            .tiles
            .get(to.0 as usize)
            .ok_or(GameError::InvalidTile { tile: to })?;
        match target.occupant {
            Some(other) if other == unit.id => return Ok(None),
            Some(_) => return Err(GameError::TileOccupied { tile: to }),
            None => {}
        }

        let previous = self.release(unit)?;
        let target = &mut self.tiles[to.0 as usize];
        target.occupant = Some(unit.id);
        unit.tile = Some(to);
        unit.position = target.coord.to_point();
        Ok(previous)
    }

    /// Take `unit` off its tile. Returns the tile it left.
    pub fn release(&mut self, unit: &mut UnitInstance) -> GameResult<Option<TileId>> {
        let Some(from) = unit.tile else {
            return Ok(None);
        };
        let tile = self
            .tiles
            .get_mut(from.0 as usize)
            .ok_or(GameError::InvalidTile { tile: from })?;
        match tile.occupant {
            Some(occupant) if occupant == unit.id => tile.occupant = None,
            _ => {
                log::error(&alloc::format!(
                    "occupancy mismatch: unit {} points at tile {} held by {:?}",
                    unit.id.0,
                    from.0,
                    tile.occupant
                ));
                return Err(GameError::OccupancyMismatch {
                    tile: from,
                    unit: unit.id,
                });
            }
        }
        unit.tile = None;
        Ok(Some(from))
    }

    /// Exchange the tiles of two placed units in one step
    pub fn swap(&mut self, a: &mut UnitInstance, b: &mut UnitInstance) -> GameResult<()> {
        let (Some(tile_a), Some(tile_b)) = (a.tile, b.tile) else {
            return Err(GameError::InvalidTile {
                tile: a.tile.or(b.tile).unwrap_or(TileId(u16::MAX)),
            });
        };
        if self.occupant(tile_a) != Some(a.id) {
            return Err(GameError::OccupancyMismatch {
                tile: tile_a,
                unit: a.id,
            });
        }
        if self.occupant(tile_b) != Some(b.id) {
            return Err(GameError::OccupancyMismatch {
                tile: tile_b,
                unit: b.id,
            });
        }
        self.tiles[tile_a.0 as usize].occupant = Some(b.id);
        self.tiles[tile_b.0 as usize].occupant = Some(a.id);
        a.tile = Some(tile_b);
        b.tile = Some(tile_a);
        a.position = self.tiles[tile_b.0 as usize].coord.to_point();
        b.position = self.tiles[tile_a.0 as usize].coord.to_point();
        Ok(())
    }

    /// Grid-axis reach test: both axis deltas within `range`
    pub fn within_range(&self, from: TileId, to: TileId, range: u8) -> bool {
        match (self.coord(from), self.coord(to)) {
            (Some(a), Some(b)) => {
                let range = range as i16;
                (a.x - b.x).abs() <= range && (a.y - b.y).abs() <= range
            }
            _ => false,
        }
    }
}
