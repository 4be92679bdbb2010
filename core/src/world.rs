//! Board, units and rosters bundled so every placement keeps them in step.

use alloc::format;
use alloc::vec::Vec;

use crate::board::{BoardGrid, TileCategory};
use crate::error::{GameError, GameResult};
use crate::events::{EventLog, GameEvent};
use crate::log;
use crate::types::{Team, TileId, UnitId, UnitTemplate};
use crate::unit::{CombatState, UnitArena, UnitInstance};

/// Team membership lists. Order is insertion order and is what target
/// searches iterate, so it must stay stable.
#[derive(Debug, Clone, Default)]
pub struct Rosters {
    /// Player units on the player zone
    pub player_active: Vec<UnitId>,
    /// Enemy units on the enemy zone
    pub enemy_active: Vec<UnitId>,
    /// Every player unit, bench included
    pub player_owned: Vec<UnitId>,
    /// Player units that started the current combat
    pub round_start: Vec<UnitId>,
    /// Every enemy spawned for the current round, dead ones included
    pub enemy_wave: Vec<UnitId>,
}

impl Rosters {
    pub fn active(&self, team: Team) -> &[UnitId] {
        match team {
            Team::Player => &self.player_active,
            Team::Enemy => &self.enemy_active,
        }
    }

    fn active_mut(&mut self, team: Team) -> &mut Vec<UnitId> {
        match team {
            Team::Player => &mut self.player_active,
            Team::Enemy => &mut self.enemy_active,
        }
    }

    pub fn remove_active(&mut self, team: Team, unit: UnitId) -> bool {
        let list = self.active_mut(team);
        let before = list.len();
        list.retain(|id| *id != unit);
        before != list.len()
    }

    fn forget(&mut self, unit: UnitId) {
        self.player_active.retain(|id| *id != unit);
        self.enemy_active.retain(|id| *id != unit);
        self.player_owned.retain(|id| *id != unit);
        self.round_start.retain(|id| *id != unit);
        self.enemy_wave.retain(|id| *id != unit);
    }
}

/// Everything combat and roster mutations read and write
#[derive(Debug, Clone)]
pub struct World {
    pub board: BoardGrid,
    pub units: UnitArena,
    pub rosters: Rosters,
    pub events: EventLog,
}

impl World {
    pub fn new(board: BoardGrid) -> Self {
        Self {
            board,
            units: UnitArena::new(),
            rosters: Rosters::default(),
            events: EventLog::new(),
        }
    }

    pub fn unit(&self, id: UnitId) -> GameResult<&UnitInstance> {
        self.units.get(id).ok_or(GameError::UnitNotFound { unit: id })
    }

    pub fn unit_mut(&mut self, id: UnitId) -> GameResult<&mut UnitInstance> {
        self.units
            .get_mut(id)
            .ok_or(GameError::UnitNotFound { unit: id })
    }

    /// Create a unit directly on a free tile
    pub fn spawn(
        &mut self,
        team: Team,
        template: UnitTemplate,
        worth: u32,
        tile: TileId,
    ) -> GameResult<UnitId> {
        if !self.board.is_free(tile) {
            self.board.tile(tile)?;
            return Err(GameError::TileOccupied { tile });
        }
        let template_id = template.id;
        let id = self.units.spawn(team, template, worth);
        let unit = self
            .units
            .get_mut(id)
            .ok_or(GameError::UnitNotFound { unit: id })?;
        self.board.place(unit, tile)?;
        if self.board.category(tile) == Some(TileCategory::zone_of(team)) {
            unit.home_tile = Some(tile);
        }
        match team {
            Team::Player => self.rosters.player_owned.push(id),
            Team::Enemy => self.rosters.enemy_wave.push(id),
        }
        self.sync_active(id);
        self.events.push(GameEvent::UnitSpawned {
            unit: id,
            team,
            template: template_id,
            tile,
        });
        Ok(id)
    }

    /// Move a unit to a free tile and update its roster membership
    pub fn place(&mut self, id: UnitId, tile: TileId) -> GameResult<()> {
        let unit = self
            .units
            .get_mut(id)
            .ok_or(GameError::UnitNotFound { unit: id })?;
        let from = self.board.place(unit, tile)?;
        self.sync_active(id);
        self.events.push(GameEvent::UnitMoved {
            unit: id,
            from,
            to: tile,
        });
        Ok(())
    }

    /// Exchange the tiles of two units and update both memberships
    pub fn swap(&mut self, a: UnitId, b: UnitId) -> GameResult<()> {
        if a == b {
            return Ok(());
        }
        let mut first = self.units.remove(a).ok_or(GameError::UnitNotFound { unit: a })?;
        let result = match self.units.get_mut(b) {
            Some(second) => self.board.swap(&mut first, second),
            None => Err(GameError::UnitNotFound { unit: b }),
        };
        let new_a = first.tile;
        self.units.restore(first);
        result?;
        self.sync_active(a);
        self.sync_active(b);
        let new_b = self.units.get(b).and_then(|u| u.tile);
        if let (Some(new_a), Some(new_b)) = (new_a, new_b) {
            self.events.push(GameEvent::UnitMoved {
                unit: a,
                from: Some(new_b),
                to: new_a,
            });
            self.events.push(GameEvent::UnitMoved {
                unit: b,
                from: Some(new_a),
                to: new_b,
            });
        }
        Ok(())
    }

    /// Keep `active` membership equal to "alive and on the team's zone".
    pub fn sync_active(&mut self, id: UnitId) {
        let Some(unit) = self.units.get(id) else {
            return;
        };
        let team = unit.team;
        let on_zone = unit.alive
            && unit
                .tile
                .and_then(|t| self.board.category(t))
                .map(|c| c.is_zone())
                .unwrap_or(false);
        let list = self.rosters.active_mut(team);
        let listed = list.contains(&id);
        if on_zone && !listed {
            list.push(id);
        } else if !on_zone && listed {
            list.retain(|u| *u != id);
        }
    }

    /// Free the unit's slot and tile and drop it from every roster. Units that
    /// were targeting it go back to target search.
    pub fn destroy(&mut self, id: UnitId) -> GameResult<UnitInstance> {
        let mut unit = self
            .units
            .remove(id)
            .ok_or(GameError::UnitNotFound { unit: id })?;
        if let Err(err) = self.board.release(&mut unit) {
            log::error(&format!("destroying unit {}: {}", id.0, err));
        }
        self.rosters.forget(id);
        self.drop_target_references(id);
        self.events.push(GameEvent::UnitDestroyed {
            unit: id,
            team: unit.team,
        });
        Ok(unit)
    }

    /// Send every unit hunting `target` back to target search
    pub fn drop_target_references(&mut self, target: UnitId) {
        let hunters: Vec<UnitId> = self
            .units
            .iter()
            .filter(|u| u.alive && u.target == Some(target))
            .map(|u| u.id)
            .collect();
        for hunter in hunters {
            if let Some(unit) = self.units.get_mut(hunter) {
                unit.target = None;
                unit.ready_to_attack = false;
                unit.timers.cancel_swing();
                if unit.state != CombatState::Idle && unit.state != CombatState::Moving {
                    unit.state = CombatState::Targeting;
                }
            }
        }
    }

    /// Player bench contents by slot
    pub fn bench(&self) -> Vec<Option<UnitId>> {
        self.board.bench_tiles().map(|t| t.occupant).collect()
    }

    pub fn bench_count(&self) -> usize {
        self.board
            .bench_tiles()
            .filter(|t| t.occupant.is_some())
            .count()
    }

    pub fn active_count(&self, team: Team) -> usize {
        self.rosters.active(team).len()
    }
}
