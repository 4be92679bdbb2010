//! The session facade a presentation layer drives.
//!
//! A `Simulation` owns every component; nothing is global. Mutations are
//! plain method calls, time moves only through [`Simulation::tick`], and the
//! caller drains [`GameEvent`]s after each call to update its display.

use alloc::format;
use alloc::vec::Vec;

use crate::config::GameConfig;
use crate::error::GameResult;
use crate::events::{GameEvent, RoundOutcome, RoundPhase};
use crate::log;
use crate::round::RoundOrchestrator;
use crate::session::Session;
use crate::types::{Team, TemplateId, TileId, UnitId};
use crate::view::{GameView, SynergyView, UnitView};
use crate::world::World;

#[derive(Debug, Clone)]
pub struct Simulation {
    round: RoundOrchestrator,
    session: Session,
}

impl Simulation {
    /// Validate `config`, build the session and run the game-start bootstrap
    pub fn new(config: GameConfig, seed: u64) -> GameResult<Self> {
        let mut session = Session::new(config, seed)?;
        session.bootstrap();
        log::info(&format!("session started with seed {}", seed));
        Ok(Self {
            round: RoundOrchestrator::new(),
            session,
        })
    }

    fn report<T>(action: &str, result: GameResult<T>) -> GameResult<T> {
        match &result {
            Ok(_) => log::result(true, action),
            Err(err) => log::result(false, &format!("{}: {}", action, err)),
        }
        result
    }

    // ==========================================
    // MUTATIONS
    // ==========================================

    pub fn purchase_unit(&mut self, template: TemplateId) -> GameResult<UnitId> {
        log::action("purchase_unit", &format!("template {}", template.0));
        let result = self.session.purchase_unit(template);
        Self::report("purchase_unit", result)
    }

    pub fn sell_unit(&mut self, unit: UnitId) -> GameResult<u32> {
        log::action("sell_unit", &format!("unit {}", unit.0));
        let result = self.session.sell_unit(unit, self.round.phase());
        Self::report("sell_unit", result)
    }

    pub fn move_unit_between_tiles(&mut self, unit: UnitId, from: TileId, to: TileId) -> GameResult<()> {
        log::action(
            "move_unit",
            &format!("unit {} from {} to {}", unit.0, from.0, to.0),
        );
        let result = self
            .session
            .move_unit_between_tiles(unit, from, to, self.round.phase());
        Self::report("move_unit", result)
    }

    pub fn begin_round(&mut self) -> GameResult<()> {
        let result = self.round.begin_round(&mut self.session);
        Self::report("begin_round", result)
    }

    pub fn reroll_shop(&mut self) -> GameResult<()> {
        log::action("reroll_shop", &format!("gold {}", self.session.wallet.gold()));
        let result = self.session.reroll_shop();
        Self::report("reroll_shop", result)
    }

    /// Advance the session by `dt_ms`
    pub fn tick(&mut self, dt_ms: u32) {
        self.round.tick(&mut self.session, dt_ms);
    }

    /// Hand every event recorded since the last drain to the caller
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.session.world.events.drain()
    }

    // ==========================================
    // QUERIES
    // ==========================================

    pub fn phase(&self) -> RoundPhase {
        self.round.phase()
    }

    pub fn round(&self) -> u32 {
        self.round.round()
    }

    pub fn last_outcome(&self) -> Option<RoundOutcome> {
        self.round.last_outcome()
    }

    pub fn gold(&self) -> u32 {
        self.session.wallet.gold()
    }

    pub fn experience(&self) -> u32 {
        self.session.progression.experience()
    }

    pub fn level(&self) -> u8 {
        self.session.progression.level()
    }

    pub fn max_active_units(&self) -> u8 {
        self.session.progression.max_active_units()
    }

    pub fn config(&self) -> &GameConfig {
        &self.session.config
    }

    pub fn world(&self) -> &World {
        &self.session.world
    }

    /// Direct access to the components, for scripted setups
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn shop(&self) -> &[Option<TemplateId>] {
        self.session.shop.lineup()
    }

    pub fn active_roster(&self, team: Team) -> &[UnitId] {
        self.session.world.rosters.active(team)
    }

    pub fn bench(&self) -> Vec<Option<UnitId>> {
        self.session.world.bench()
    }

    pub fn unit_view(&self, unit: UnitId) -> Option<UnitView> {
        self.session.world.units.get(unit).map(UnitView::from)
    }

    pub fn synergy_views(&self) -> Vec<SynergyView> {
        self.session
            .synergies
            .definitions()
            .iter()
            .map(|d| SynergyView::new(d, &self.session.synergies))
            .collect()
    }

    fn roster_views(&self, team: Team) -> Vec<UnitView> {
        self.active_roster(team)
            .iter()
            .filter_map(|id| self.unit_view(*id))
            .collect()
    }

    pub fn view(&self) -> GameView {
        GameView {
            phase: self.phase(),
            round: self.round(),
            gold: self.gold(),
            level: self.level(),
            experience: self.experience(),
            max_experience: self.session.progression.max_experience(),
            max_active_units: self.max_active_units(),
            shop: self.shop().to_vec(),
            bench: self
                .bench()
                .into_iter()
                .map(|slot| slot.and_then(|id| self.unit_view(id)))
                .collect(),
            player_units: self.roster_views(Team::Player),
            enemy_units: self.roster_views(Team::Enemy),
            synergies: self.synergy_views(),
            last_outcome: self.last_outcome(),
        }
    }
}
