//! Round loop: shopping, combat, resolution and rewards.
//!
//! ```text
//! Shopping -> CombatActive -> CombatResolving -> RewardDistribution -> Shopping
//! ```
//!
//! Combat ends on the first wiped-out team. A leeway timer then runs so a
//! near-simultaneous death on the other side still counts, turning a race
//! into a draw.

use alloc::format;
use alloc::vec::Vec;

use crate::board::TileCategory;
use crate::combat::{count_down, TickReport};
use crate::error::{GameError, GameResult};
use crate::events::{GameEvent, RoundOutcome, RoundPhase};
use crate::log;
use crate::session::Session;
use crate::synergy::SynergyAggregator;
use crate::types::{Team, TileId, UnitId, UnitTemplate};

#[derive(Debug, Clone)]
pub struct RoundOrchestrator {
    phase: RoundPhase,
    /// 1-based round number
    round: u32,
    player_won: bool,
    enemy_won: bool,
    round_ending: bool,
    leeway_ms: Option<u32>,
    reward_ms: Option<u32>,
    combat_elapsed_ms: u32,
    last_outcome: Option<RoundOutcome>,
}

impl Default for RoundOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundOrchestrator {
    pub fn new() -> Self {
        Self {
            phase: RoundPhase::Shopping,
            round: 1,
            player_won: false,
            enemy_won: false,
            round_ending: false,
            leeway_ms: None,
            reward_ms: None,
            combat_elapsed_ms: 0,
            last_outcome: None,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn last_outcome(&self) -> Option<RoundOutcome> {
        self.last_outcome
    }

    pub fn win_flags(&self) -> (bool, bool) {
        (self.player_won, self.enemy_won)
    }

    fn set_phase(&mut self, session: &mut Session, phase: RoundPhase) {
        self.phase = phase;
        log::debug("phase", phase.as_str());
        session.world.events.push(GameEvent::PhaseChanged { phase });
    }

    /// Enemy wave for this round, clamped to the last configured wave
    fn wave_templates(&self, session: &Session) -> GameResult<Vec<(UnitTemplate, TileId)>> {
        let waves = &session.config.enemy_waves;
        if waves.is_empty() {
            log::error("no enemy waves configured");
            return Err(GameError::MissingEnemyRoster);
        }
        let index = (self.round.saturating_sub(1) as usize).min(waves.len() - 1);
        let board = &session.world.board;
        let mut placed: Vec<(UnitTemplate, TileId)> = Vec::with_capacity(waves[index].units.len());
        for unit in &waves[index].units {
            let template = session.catalog.get(unit.template)?.clone();
            let invalid = GameError::InvalidWavePlacement {
                wave: index as u32,
                x: unit.column,
                y: unit.row,
            };
            let tile = board.enemy_tile(unit.column, unit.row).ok_or(invalid.clone())?;
            if !board.is_free(tile) || placed.iter().any(|(_, t)| *t == tile) {
                return Err(invalid);
            }
            placed.push((template, tile));
        }
        Ok(placed)
    }

    /// Start combat. A missing or misplaced wave is reported before anything
    /// on the board changes.
    pub fn begin_round(&mut self, session: &mut Session) -> GameResult<()> {
        if self.phase != RoundPhase::Shopping {
            return Err(GameError::WrongPhase);
        }
        let wave = self.wave_templates(session)?;
        log::action("begin_round", &format!("round {} vs {} enemies", self.round, wave.len()));

        for (template, tile) in wave {
            let worth = template.cost;
            session.world.spawn(Team::Enemy, template, worth, tile)?;
        }

        self.enforce_active_cap(session)?;
        session.world.rosters.round_start = session.world.rosters.player_active.clone();

        let player = session.world.rosters.player_active.clone();
        let enemy = session.world.rosters.enemy_active.clone();
        session
            .synergies
            .apply_team_effects(&mut session.world.units, &player, &enemy);
        session
            .synergies
            .apply_team_effects(&mut session.world.units, &enemy, &player);

        for id in player.iter().chain(enemy.iter()) {
            if let Some(unit) = session.world.units.get_mut(*id) {
                unit.refresh_vitals();
                let (health, max_health) = (unit.health, unit.stats.max_health);
                session.world.events.push(GameEvent::HealthChanged {
                    unit: *id,
                    health,
                    max_health,
                });
            }
        }

        self.player_won = false;
        self.enemy_won = false;
        self.round_ending = false;
        self.combat_elapsed_ms = 0;
        self.last_outcome = None;
        self.set_phase(session, RoundPhase::CombatActive);
        session.combat.begin(&mut session.world);
        self.check_win(session);
        Ok(())
    }

    /// Bench the most recently placed units over the cap, selling them when
    /// the bench is full
    fn enforce_active_cap(&mut self, session: &mut Session) -> GameResult<()> {
        let cap = session.progression.max_active_units() as usize;
        while session.world.active_count(Team::Player) > cap {
            let Some(excess) = session.world.rosters.player_active.last().copied() else {
                break;
            };
            if session.bench_now(excess)? {
                log::debug("cap", &format!("unit {} benched", excess.0));
            } else {
                let refund = session.sell_now(excess);
                log::debug("cap", &format!("unit {} sold for {}", excess.0, refund));
            }
        }
        Ok(())
    }

    /// Advance the round by `dt_ms`
    pub fn tick(&mut self, session: &mut Session, dt_ms: u32) {
        match self.phase {
            RoundPhase::Shopping => {}
            RoundPhase::CombatActive => {
                self.combat_elapsed_ms = self.combat_elapsed_ms.saturating_add(dt_ms);
                let report = session
                    .combat
                    .tick(&mut session.world, &mut session.rng, dt_ms);
                self.on_deaths(session, &report);
                if self.phase == RoundPhase::CombatActive
                    && self.combat_elapsed_ms >= session.config.combat.max_combat_ms
                {
                    log::warn(&format!(
                        "combat limit reached after {} ms",
                        self.combat_elapsed_ms
                    ));
                    session.world.events.push(GameEvent::CombatLimitExceeded {
                        elapsed_ms: self.combat_elapsed_ms,
                    });
                    self.player_won = true;
                    self.enemy_won = true;
                    self.end_round(session);
                }
            }
            RoundPhase::CombatResolving => {
                // Units are halted; shots in flight still land
                let report = session
                    .combat
                    .tick(&mut session.world, &mut session.rng, dt_ms);
                self.on_deaths(session, &report);
                if count_down(&mut self.leeway_ms, dt_ms) {
                    self.decide_winner(session);
                }
            }
            RoundPhase::RewardDistribution => {
                if count_down(&mut self.reward_ms, dt_ms) {
                    self.distribute_rewards(session);
                }
            }
        }
    }

    fn on_deaths(&mut self, session: &mut Session, report: &TickReport) {
        if report.deaths.is_empty() {
            return;
        }
        for (id, team) in &report.deaths {
            if *team == Team::Player {
                if let Some(unit) = session.world.units.get(*id) {
                    let template = unit.template.clone();
                    session
                        .synergies
                        .deactivate(&template, &mut session.world.events);
                }
            }
        }
        self.check_win(session);
    }

    /// Raise the win flag of any side facing an empty roster
    fn check_win(&mut self, session: &mut Session) {
        if session.world.active_count(Team::Player) == 0 {
            self.enemy_won = true;
        }
        if session.world.active_count(Team::Enemy) == 0 {
            self.player_won = true;
        }
        if (self.player_won || self.enemy_won) && !self.round_ending {
            self.end_round(session);
        }
    }

    fn end_round(&mut self, session: &mut Session) {
        if self.round_ending {
            return;
        }
        self.round_ending = true;
        session.combat.halt(&mut session.world);
        SynergyAggregator::clear_team_effects(
            &mut session.world.units,
            &session.world.rosters.round_start,
        );
        SynergyAggregator::clear_team_effects(
            &mut session.world.units,
            &session.world.rosters.enemy_wave,
        );
        self.leeway_ms = Some(session.config.end_round_leeway_ms());
        self.set_phase(session, RoundPhase::CombatResolving);
    }

    fn decide_winner(&mut self, session: &mut Session) {
        let outcome = match (self.player_won, self.enemy_won) {
            (true, true) => RoundOutcome::Draw,
            (true, false) => RoundOutcome::Victory,
            (false, true) => RoundOutcome::Defeat,
            (false, false) => {
                log::warn("round ended with no winner flagged");
                return;
            }
        };
        log::info(&format!("round {}: {:?}", self.round, outcome));
        if outcome == RoundOutcome::Victory {
            session.add_gold(session.config.win_bonus_gold);
        }
        session.world.events.push(GameEvent::RoundDecided {
            round: self.round,
            outcome,
        });
        self.last_outcome = Some(outcome);
        self.player_won = false;
        self.enemy_won = false;
        self.round_ending = false;
        self.reward_ms = Some(session.config.reward_delay_ms);
        self.set_phase(session, RoundPhase::RewardDistribution);
    }

    fn distribute_rewards(&mut self, session: &mut Session) {
        for enemy in session.world.rosters.enemy_wave.clone() {
            if let Err(err) = session.world.destroy(enemy) {
                log::error(&format!("clearing enemy {}: {}", enemy.0, err));
            }
        }
        session.combat.clear_projectiles();
        self.return_home(session);

        self.round += 1;
        session.progression.add_experience(
            session.config.experience_per_round,
            &session.config.experience_curve,
            &mut session.world.events,
        );
        session.add_gold(session.config.gold_income.for_round(self.round));
        session.roll_shop();
        self.set_phase(session, RoundPhase::Shopping);
        log::state_summary(
            self.phase.as_str(),
            self.round,
            session.wallet.gold(),
            session.progression.level(),
            session.progression.experience(),
            session.world.bench_count(),
            session.world.active_count(Team::Player),
        );
    }

    /// Revive the round-start roster and put every unit back on its home
    /// tile. Units that fell during combat are revived too, not only the
    /// survivors. All units leave the grid first so no unit blocks another's home.
    fn return_home(&mut self, session: &mut Session) {
        let roster = session.world.rosters.round_start.clone();
        let world = &mut session.world;
        // Alive at this point means still counted active by the synergies
        let mut was_active: Vec<(UnitId, bool)> = Vec::with_capacity(roster.len());
        for id in &roster {
            let Some(unit) = world.units.get_mut(*id) else {
                continue;
            };
            was_active.push((*id, unit.alive));
            unit.alive = true;
            unit.reset_combat();
            if let Err(err) = world.board.release(unit) {
                log::error(&format!("lifting unit {}: {}", id.0, err));
            }
            world.sync_active(*id);
        }

        for (id, active_before) in was_active {
            let Some(unit) = world.units.get(id) else {
                continue;
            };
            let home = unit.home_tile.filter(|t| {
                world.board.category(*t) == Some(TileCategory::PlayerZone) && world.board.is_free(*t)
            });
            let placed = match home {
                Some(tile) => world.place(id, tile),
                None => {
                    log::error(&format!("{}", GameError::MissingHomeTile { unit: id }));
                    match world.board.first_free_bench_tile() {
                        Some(slot) => world.place(id, slot),
                        None => Err(GameError::BenchFull),
                    }
                }
            };
            if let Err(err) = placed {
                log::error(&format!("returning unit {}: {}", id.0, err));
            }

            let Some(unit) = world.units.get_mut(id) else {
                continue;
            };
            unit.refresh_vitals();
            let (health, max_health) = (unit.health, unit.stats.max_health);
            let (mana, max_mana) = (unit.mana, unit.stats.max_mana);
            let on_zone = unit.tile.and_then(|t| world.board.category(t))
                == Some(TileCategory::PlayerZone);
            if on_zone {
                unit.home_tile = unit.tile;
            } else {
                unit.home_tile = None;
            }
            let template = unit.template.clone();
            world.events.push(GameEvent::HealthChanged {
                unit: id,
                health,
                max_health,
            });
            world.events.push(GameEvent::ManaChanged {
                unit: id,
                mana,
                max_mana,
            });
            match (active_before, on_zone) {
                (false, true) => session.synergies.activate(&template, &mut world.events),
                (true, false) => session.synergies.deactivate(&template, &mut world.events),
                _ => {}
            }
        }
        world.rosters.round_start.clear();
    }
}
