//! Per-unit combat state machine: targeting, movement, attack timing,
//! damage, mana and death.
//!
//! Time only moves through [`CombatController::tick`]. Each tick first runs
//! every countdown down by the tick delta, then lands projectiles in launch
//! order, then lets units act in ascending id order. A unit "waits" by holding
//! a countdown, never by yielding.

use alloc::format;
use alloc::vec::Vec;
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;

use crate::config::CombatSettings;
use crate::events::GameEvent;
use crate::log;
use crate::rng::BattleRng;
use crate::stats::mitigate;
use crate::types::{Point, Team, UnitId};
use crate::unit::{CombatState, Transit};
use crate::world::World;

/// A shot in flight, homing on the live position of its target
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo)]
pub struct Projectile {
    pub id: u32,
    pub source: UnitId,
    pub target: UnitId,
    pub position: Point,
    /// Rolled when the shot left; armor applies on arrival
    pub raw_damage: i32,
}

/// Outcome of one hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Health reduced by `damage`
    Landed { damage: i32, killed: bool },
    /// Armor made the hit negative; it was dropped
    Absorbed,
    /// Target was already gone
    Missed,
}

/// Deaths produced by one tick, in the order they happened
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub deaths: Vec<(UnitId, Team)>,
}

/// Countdowns that ran out this tick for one unit
#[derive(Debug, Clone, Copy, Default)]
struct Expired {
    arrived: bool,
    attack_point: bool,
    attack_time: bool,
    retarget: bool,
}

impl Expired {
    fn any(&self) -> bool {
        self.arrived || self.attack_point || self.attack_time || self.retarget
    }
}

pub(crate) fn count_down(timer: &mut Option<u32>, dt_ms: u32) -> bool {
    match timer {
        Some(remaining) => {
            *remaining = remaining.saturating_sub(dt_ms);
            if *remaining == 0 {
                *timer = None;
                true
            } else {
                false
            }
        }
        None => false,
    }
}

#[derive(Debug, Clone)]
pub struct CombatController {
    settings: CombatSettings,
    projectiles: Vec<Projectile>,
    next_projectile: u32,
    running: bool,
}

impl CombatController {
    pub fn new(settings: CombatSettings) -> Self {
        Self {
            settings,
            projectiles: Vec::new(),
            next_projectile: 1,
            running: false,
        }
    }

    pub fn settings(&self) -> &CombatSettings {
        &self.settings
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Put every active unit of both teams into combat
    pub fn begin(&mut self, world: &mut World) {
        self.running = true;
        let fighters: Vec<UnitId> = world
            .rosters
            .player_active
            .iter()
            .chain(world.rosters.enemy_active.iter())
            .copied()
            .collect();
        for id in fighters {
            if let Some(unit) = world.units.get_mut(id) {
                unit.reset_combat();
                unit.recent_tiles.clear();
                if let Some(tile) = unit.tile.and_then(|t| world.board.coord(t)) {
                    unit.position = tile.to_point();
                }
                unit.state = CombatState::Targeting;
            }
        }
    }

    /// Stop every unit where it stands. Projectiles already in the air keep flying.
    pub fn halt(&mut self, world: &mut World) {
        self.running = false;
        let fighters: Vec<UnitId> = world.units.iter().map(|u| u.id).collect();
        for id in fighters {
            stop_auto_attack(world, id);
        }
    }

    pub fn clear_projectiles(&mut self) {
        self.projectiles.clear();
    }

    /// Advance the fight by `dt_ms`
    pub fn tick(&mut self, world: &mut World, rng: &mut impl BattleRng, dt_ms: u32) -> TickReport {
        let mut report = TickReport::default();

        // 1. run every countdown down
        let mut expired: Vec<(UnitId, Expired)> = Vec::new();
        if self.running {
            let fighters = fighting_units(world);
            for id in fighters {
                let Some(unit) = world.units.get_mut(id) else {
                    continue;
                };
                let mut flags = Expired::default();
                if let Some(transit) = unit.transit.as_mut() {
                    transit.remaining_ms = transit.remaining_ms.saturating_sub(dt_ms);
                    let done = transit.total_ms - transit.remaining_ms;
                    unit.position =
                        transit
                            .from
                            .lerp(transit.to, done as i64, transit.total_ms as i64);
                    if transit.remaining_ms == 0 {
                        unit.transit = None;
                        flags.arrived = true;
                    }
                }
                flags.attack_point = count_down(&mut unit.timers.attack_point, dt_ms);
                flags.attack_time = count_down(&mut unit.timers.attack_time, dt_ms);
                flags.retarget = count_down(&mut unit.timers.retarget, dt_ms);
                expired.push((id, flags));
            }
        }

        // 2. land projectiles in launch order
        self.advance_projectiles(world, dt_ms, &mut report);

        // 3. act in ascending id order
        for (id, flags) in expired {
            let alive = world.units.get(id).map(|u| u.alive).unwrap_or(false);
            if !alive || !self.running {
                continue;
            }
            if flags.any() {
                self.on_expired(world, rng, id, flags, &mut report);
            }
            self.think(world, id);
        }

        report
    }

    fn on_expired(
        &mut self,
        world: &mut World,
        rng: &mut impl BattleRng,
        id: UnitId,
        flags: Expired,
        report: &mut TickReport,
    ) {
        if flags.arrived || flags.retarget {
            if let Some(unit) = world.units.get_mut(id) {
                if matches!(unit.state, CombatState::Moving | CombatState::Idle) {
                    unit.state = CombatState::Targeting;
                }
            }
            if flags.arrived && target_is_valid(world, id) {
                // Keep the current target; only re-run the range check
                self.engage(world, id);
            }
        }
        if flags.attack_point {
            self.release_attack(world, rng, id, report);
        }
        let deferred = world
            .units
            .get(id)
            .map(|u| !u.alive || u.state == CombatState::Moving)
            .unwrap_or(true);
        // A unit walking to a new target decides again on arrival
        if flags.attack_time && !deferred {
            let target = world.units.get(id).and_then(|u| u.target);
            if target_is_valid(world, id) && target_is_in_range(world, id, target) {
                self.start_attack_sequence(world, id);
            } else {
                stop_auto_attack(world, id);
                if let Some(unit) = world.units.get_mut(id) {
                    unit.state = CombatState::Targeting;
                }
            }
        }
    }

    fn think(&mut self, world: &mut World, id: UnitId) {
        let state = match world.units.get(id) {
            Some(unit) if unit.alive => unit.state,
            _ => return,
        };

        if state == CombatState::Targeting {
            self.acquire_target(world, id);
        }

        let state = world.units.get(id).map(|u| u.state);
        if state == Some(CombatState::ReadyToAttack) {
            if !target_is_valid(world, id) {
                self.acquire_target(world, id);
                return;
            }
            let target = world.units.get(id).and_then(|u| u.target);
            if !target_is_in_range(world, id, target) {
                self.engage(world, id);
                return;
            }
            let recovering = world
                .units
                .get(id)
                .map(|u| u.timers.recovering())
                .unwrap_or(false);
            if !recovering && may_begin_attack(world, id) {
                self.start_attack_sequence(world, id);
            }
        }
    }

    /// Nearest-enemy search; no enemy leaves the unit idle until the next death or spawn
    fn acquire_target(&mut self, world: &mut World, id: UnitId) {
        let found = find_nearest_target(world, id);
        let Some(unit) = world.units.get_mut(id) else {
            return;
        };
        match found {
            None => {
                unit.target = None;
                unit.ready_to_attack = false;
                unit.state = CombatState::Idle;
            }
            Some(target) => {
                if unit.target != Some(target) {
                    unit.target = Some(target);
                    world
                        .events
                        .push(GameEvent::TargetAcquired { unit: id, target });
                }
                self.engage(world, id);
            }
        }
    }

    /// Range check against the current target: ready up, or walk a tile
    fn engage(&mut self, world: &mut World, id: UnitId) {
        let target = world.units.get(id).and_then(|u| u.target);
        if target_is_in_range(world, id, target) {
            if let Some(unit) = world.units.get_mut(id) {
                unit.ready_to_attack = true;
                unit.state = CombatState::ReadyToAttack;
            }
            return;
        }
        if let Some(unit) = world.units.get_mut(id) {
            unit.ready_to_attack = false;
        }
        if let Some(target) = target {
            if !move_one_tile_to_target(world, id, target) {
                let cooldown = self.settings.retarget_cooldown_ms;
                if let Some(unit) = world.units.get_mut(id) {
                    unit.state = CombatState::Idle;
                    unit.timers.retarget = Some(cooldown.max(1));
                }
            }
        }
    }

    fn start_attack_sequence(&mut self, world: &mut World, id: UnitId) {
        let target = world.units.get(id).and_then(|u| u.target);
        if !target_is_in_range(world, id, target) {
            self.engage(world, id);
            return;
        }
        let (Some(unit), Some(target)) = (world.units.get_mut(id), target) else {
            return;
        };
        unit.timers.attack_point = Some(unit.stats.attack_point_ms.max(1));
        unit.timers.attack_time = Some(unit.stats.attack_time_ms.max(1));
        unit.ready_to_attack = true;
        unit.state = CombatState::AttackWindup;
        world
            .events
            .push(GameEvent::AttackStarted { unit: id, target });
    }

    /// Attack point reached: hit now, or send a projectile
    fn release_attack(
        &mut self,
        world: &mut World,
        rng: &mut impl BattleRng,
        id: UnitId,
        report: &mut TickReport,
    ) {
        if !target_is_valid(world, id) {
            stop_auto_attack(world, id);
            if let Some(unit) = world.units.get_mut(id) {
                unit.state = CombatState::Targeting;
            }
            return;
        }
        let Some(unit) = world.units.get_mut(id) else {
            return;
        };
        let Some(target) = unit.target else {
            return;
        };
        unit.state = CombatState::AttackResolve;
        let raw = rng.gen_inclusive(unit.stats.min_damage, unit.stats.max_damage)
            + unit.stats.bonus_damage;

        if unit.template.projectile {
            let projectile = Projectile {
                id: self.next_projectile,
                source: id,
                target,
                position: unit.position,
                raw_damage: raw,
            };
            self.next_projectile += 1;
            world.events.push(GameEvent::ProjectileLaunched {
                projectile: projectile.id,
                source: id,
                target,
            });
            self.projectiles.push(projectile);
        } else {
            apply_hit(world, id, target, raw, self.running, report);
        }
    }

    fn advance_projectiles(&mut self, world: &mut World, dt_ms: u32, report: &mut TickReport) {
        if self.projectiles.is_empty() {
            return;
        }
        let step = (self.settings.projectile_speed.max(0) as i64 * dt_ms as i64) / 1000;
        let in_flight = core::mem::take(&mut self.projectiles);
        for mut projectile in in_flight {
            let destination = match world.units.get(projectile.target) {
                Some(target) if target.is_targetable() => target.position,
                _ => {
                    log::trace(
                        "projectile",
                        &format!("{} lost its target, discarded", projectile.id),
                    );
                    continue;
                }
            };
            let distance = projectile.position.distance(destination);
            if distance <= step {
                apply_hit(
                    world,
                    projectile.source,
                    projectile.target,
                    projectile.raw_damage,
                    self.running,
                    report,
                );
            } else {
                projectile.position = projectile.position.lerp(destination, step, distance);
                self.projectiles.push(projectile);
            }
        }
    }
}

/// Alive units on either team's zone, ascending id
fn fighting_units(world: &World) -> Vec<UnitId> {
    let mut ids: Vec<UnitId> = world
        .rosters
        .player_active
        .iter()
        .chain(world.rosters.enemy_active.iter())
        .copied()
        .collect();
    ids.sort();
    ids
}

/// Drop attack timers and readiness; the unit goes idle
pub fn stop_auto_attack(world: &mut World, id: UnitId) {
    if let Some(unit) = world.units.get_mut(id) {
        unit.reset_combat();
    }
}

/// Nearest opposing active unit by world distance. The opposing roster is
/// scanned in order and only a strictly closer unit replaces the best so far.
pub fn find_nearest_target(world: &World, seeker: UnitId) -> Option<UnitId> {
    let unit = world.units.get(seeker)?;
    let origin = unit.position;
    let mut best: Option<(UnitId, i64)> = None;
    for candidate in world.rosters.active(unit.team.opponent()) {
        let Some(other) = world.units.get(*candidate) else {
            continue;
        };
        if !other.is_targetable() {
            continue;
        }
        let distance = origin.distance_sq(other.position);
        match best {
            Some((_, closest)) if distance >= closest => {}
            _ => best = Some((*candidate, distance)),
        }
    }
    best.map(|(id, _)| id)
}

/// The unit's target still exists, lives and stands on the opposing zone
pub fn target_is_valid(world: &World, id: UnitId) -> bool {
    let Some(unit) = world.units.get(id) else {
        return false;
    };
    let Some(target) = unit.target else {
        return false;
    };
    match world.units.get(target) {
        Some(other) => {
            other.is_targetable()
                && other.team != unit.team
                && world.rosters.active(other.team).contains(&target)
        }
        None => false,
    }
}

/// Both grid-axis deltas within the attacker's range. False for a missing or dead target.
pub fn target_is_in_range(world: &World, attacker: UnitId, target: Option<UnitId>) -> bool {
    let (Some(unit), Some(target)) = (world.units.get(attacker), target) else {
        return false;
    };
    let Some(other) = world.units.get(target) else {
        return false;
    };
    if !other.alive {
        return false;
    }
    match (unit.tile, other.tile) {
        (Some(from), Some(to)) => world.board.within_range(from, to, unit.stats.attack_range),
        _ => false,
    }
}

/// A shorter-ranged unit swings as soon as it is ready; otherwise it waits
/// until its target is ready too.
pub fn may_begin_attack(world: &World, id: UnitId) -> bool {
    let Some(unit) = world.units.get(id) else {
        return false;
    };
    let Some(target) = unit.target.and_then(|t| world.units.get(t)) else {
        return false;
    };
    unit.stats.attack_range < target.stats.attack_range || target.ready_to_attack
}

/// Step onto the free neighbour closest to the target's tile, skipping the
/// mover's last three tiles. Returns false when boxed in.
pub fn move_one_tile_to_target(world: &mut World, mover: UnitId, target: UnitId) -> bool {
    let Some(unit) = world.units.get(mover) else {
        return false;
    };
    let Some(from_tile) = unit.tile else {
        return false;
    };
    let (from, speed, recent) = (unit.position, unit.stats.move_speed, unit.recent_tiles);
    let Some(goal) = world
        .units
        .get(target)
        .and_then(|t| t.tile)
        .and_then(|t| world.board.coord(t))
    else {
        return false;
    };
    if speed <= 0 {
        return false;
    }

    let mut candidates = world.board.neighbors(from_tile);
    candidates.sort_by_key(|t| {
        world
            .board
            .coord(*t)
            .map(|c| c.distance_sq(goal))
            .unwrap_or(i32::MAX)
    });
    let chosen = candidates
        .into_iter()
        .find(|t| world.board.is_free(*t) && !recent.contains(*t));
    let Some(next) = chosen else {
        log::trace("move", &format!("unit {} is boxed in", mover.0));
        return false;
    };

    if let Err(err) = world.place(mover, next) {
        log::error(&format!("move of unit {}: {}", mover.0, err));
        return false;
    }
    let Some(unit) = world.units.get_mut(mover) else {
        return false;
    };
    let to = unit.position;
    let distance = from.distance(to).max(1);
    let total_ms = ((distance * 1000) / speed as i64).clamp(1, u32::MAX as i64) as u32;
    unit.recent_tiles.push(from_tile);
    // Tile is taken at once; the body eases over
    unit.position = from;
    unit.transit = Some(Transit {
        from,
        to,
        total_ms,
        remaining_ms: total_ms,
    });
    unit.state = CombatState::Moving;
    true
}

/// Apply one hit from `source` to `target`. Negative damage after armor is
/// dropped; only landed hits grant the attacker mana.
pub fn apply_hit(
    world: &mut World,
    source: UnitId,
    target: UnitId,
    raw_damage: i32,
    wake_idle: bool,
    report: &mut TickReport,
) -> HitOutcome {
    let Some(victim) = world.units.get_mut(target) else {
        return HitOutcome::Missed;
    };
    if !victim.alive {
        return HitOutcome::Missed;
    }
    let damage = mitigate(raw_damage, victim.stats.armor);
    if damage < 0 {
        world
            .events
            .push(GameEvent::HitAbsorbed { source, target });
        return HitOutcome::Absorbed;
    }
    victim.health = (victim.health - damage).max(0);
    let remaining = victim.health;
    let max_health = victim.stats.max_health;
    world.events.push(GameEvent::DamageDealt {
        source,
        target,
        damage,
        remaining_health: remaining,
    });
    world.events.push(GameEvent::HealthChanged {
        unit: target,
        health: remaining,
        max_health,
    });

    if let Some(attacker) = world.units.get_mut(source) {
        if attacker.alive {
            let max_mana = attacker.stats.max_mana;
            attacker.mana = (attacker.mana + attacker.stats.mana_per_attack).min(max_mana);
            let mana = attacker.mana;
            world.events.push(GameEvent::ManaChanged {
                unit: source,
                mana,
                max_mana,
            });
            if mana >= max_mana {
                // Full bar: abilities would cast here
                log::trace("mana", &format!("unit {} reached full mana", source.0));
            }
        }
    }

    let killed = remaining <= 0;
    if killed {
        kill(world, target, wake_idle, report);
    }
    HitOutcome::Landed { damage, killed }
}

/// Mark dead, cancel timers, free the tile, leave the active roster
pub fn kill(world: &mut World, id: UnitId, wake_idle: bool, report: &mut TickReport) {
    let Some(unit) = world.units.get_mut(id) else {
        return;
    };
    if !unit.alive {
        return;
    }
    unit.alive = false;
    unit.reset_combat();
    let team = unit.team;
    if let Err(err) = world.board.release(unit) {
        log::error(&format!("death of unit {}: {}", id.0, err));
    }
    world.rosters.remove_active(team, id);
    world.drop_target_references(id);
    world.events.push(GameEvent::UnitDied { unit: id, team });
    report.deaths.push((id, team));
    log::debug("death", &format!("{} unit {} died", team.as_str(), id.0));
    if wake_idle {
        wake_idle_units(world);
    }
}

/// A death or spawn changed the field: idle fighters look again
pub fn wake_idle_units(world: &mut World) {
    let fighters = fighting_units(world);
    for id in fighters {
        if let Some(unit) = world.units.get_mut(id) {
            if unit.alive && unit.state == CombatState::Idle && unit.timers.retarget.is_none() {
                unit.state = CombatState::Targeting;
            }
        }
    }
}
