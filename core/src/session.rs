//! Component instances of one session and the roster mutations that touch
//! several of them at once.

use alloc::format;

use crate::board::{BoardGrid, TileCategory};
use crate::catalog::Catalog;
use crate::combat::CombatController;
use crate::combine::BenchCombiner;
use crate::config::GameConfig;
use crate::economy::{Progression, Wallet};
use crate::error::{GameError, GameResult};
use crate::events::{GameEvent, RoundPhase};
use crate::log;
use crate::rng::XorShiftRng;
use crate::shop::Shop;
use crate::synergy::SynergyAggregator;
use crate::types::{Team, TemplateId, TileId, UnitId};
use crate::unit::UnitInstance;
use crate::world::World;

#[derive(Debug, Clone)]
pub struct Session {
    pub config: GameConfig,
    pub catalog: Catalog,
    pub world: World,
    pub synergies: SynergyAggregator,
    pub combat: CombatController,
    pub combiner: BenchCombiner,
    pub wallet: Wallet,
    pub progression: Progression,
    pub shop: Shop,
    pub rng: XorShiftRng,
}

impl Session {
    /// Build every component from a validated configuration. Nothing is
    /// granted yet; see [`Session::bootstrap`].
    pub fn new(config: GameConfig, seed: u64) -> GameResult<Self> {
        config.validate()?;
        let board = BoardGrid::new(
            config.board.width,
            config.board.zone_rows,
            config.bench_capacity(),
        )?;
        Ok(Self {
            catalog: Catalog::new(config.catalog.clone()),
            world: World::new(board),
            synergies: SynergyAggregator::new(config.synergies.clone())?,
            combat: CombatController::new(config.combat.clone()),
            combiner: BenchCombiner::new(config.units_needed_for_combo),
            wallet: Wallet::new(0),
            progression: Progression::new(&config),
            shop: Shop::new(config.shop_size),
            rng: XorShiftRng::seed_from_u64(seed),
            config,
        })
    }

    /// One-time game start: starting gold and experience, then a free roll
    pub fn bootstrap(&mut self) {
        self.add_gold(self.config.starting_gold);
        self.progression.add_experience(
            self.config.starting_experience,
            &self.config.experience_curve,
            &mut self.world.events,
        );
        self.roll_shop();
    }

    pub fn add_gold(&mut self, amount: u32) {
        self.wallet.add_gold(amount);
        self.world.events.push(GameEvent::GoldChanged {
            gold: self.wallet.gold(),
        });
    }

    fn spend_gold(&mut self, amount: u32) -> GameResult<()> {
        let have = self.wallet.gold();
        if !self.wallet.spend_gold(amount) {
            return Err(GameError::NotEnoughGold { have, need: amount });
        }
        self.world.events.push(GameEvent::GoldChanged {
            gold: self.wallet.gold(),
        });
        Ok(())
    }

    /// Free reroll
    pub fn roll_shop(&mut self) {
        self.shop
            .roll(&self.catalog, &mut self.rng, &mut self.world.events);
    }

    /// Paid reroll
    pub fn reroll_shop(&mut self) -> GameResult<()> {
        self.spend_gold(self.config.reroll_cost)?;
        self.roll_shop();
        Ok(())
    }

    /// Buy a template from the line-up onto the bench, then look for a combine.
    /// Returns the unit that ends up representing the purchase.
    pub fn purchase_unit(&mut self, template: TemplateId) -> GameResult<UnitId> {
        if !self.shop.contains(template) {
            return Err(GameError::NotInShop { template });
        }
        let bought = self.catalog.get(template)?.clone();
        let slot = self
            .world
            .board
            .first_free_bench_tile()
            .ok_or(GameError::BenchFull)?;
        self.spend_gold(bought.cost)?;
        self.shop.take(template, &mut self.world.events);
        self.synergies.acquire(&bought, &mut self.world.events);
        let cost = bought.cost;
        let unit = self.world.spawn(Team::Player, bought, cost, slot)?;
        log::debug("shop", &format!("bought template {} as unit {}", template.0, unit.0));

        let combined = self.combiner.check_for_combination(
            template,
            &mut self.world,
            &mut self.synergies,
            &self.catalog,
        )?;
        Ok(combined.unwrap_or(unit))
    }

    fn player_unit(&self, unit: UnitId) -> GameResult<&UnitInstance> {
        let record = self.world.unit(unit)?;
        if record.team != Team::Player {
            return Err(GameError::NotPlayerUnit { unit });
        }
        Ok(record)
    }

    fn on_zone(&self, tile: Option<TileId>) -> bool {
        tile.and_then(|t| self.world.board.category(t))
            .map(|c| c == TileCategory::PlayerZone)
            .unwrap_or(false)
    }

    /// Sell for the unit's recorded worth. Board units only sell while shopping.
    pub fn sell_unit(&mut self, unit: UnitId, phase: RoundPhase) -> GameResult<u32> {
        let record = self.player_unit(unit)?;
        let on_bench = record
            .tile
            .and_then(|t| self.world.board.category(t))
            == Some(TileCategory::Bench);
        if !on_bench && phase != RoundPhase::Shopping {
            return Err(GameError::WrongPhase);
        }
        Ok(self.sell_now(unit))
    }

    /// Sell without phase checks; used by round-start cap enforcement
    pub(crate) fn sell_now(&mut self, unit: UnitId) -> u32 {
        let Some(record) = self.world.units.get(unit) else {
            return 0;
        };
        let template = record.template.clone();
        let counted_active = record.alive && self.on_zone(record.tile);
        if counted_active {
            self.synergies.deactivate(&template, &mut self.world.events);
        }
        self.synergies.release(&template, &mut self.world.events);
        match self.world.destroy(unit) {
            Ok(sold) => {
                log::debug("sell", &format!("unit {} refunded {}", unit.0, sold.worth));
                self.add_gold(sold.worth);
                sold.worth
            }
            Err(err) => {
                log::error(&format!("selling unit {}: {}", unit.0, err));
                0
            }
        }
    }

    /// Put a zone unit on the first free bench slot. False when the bench is full.
    pub(crate) fn bench_now(&mut self, unit: UnitId) -> GameResult<bool> {
        let Some(slot) = self.world.board.first_free_bench_tile() else {
            return Ok(false);
        };
        let template = self.world.unit(unit)?.template.clone();
        self.world.place(unit, slot)?;
        self.world.unit_mut(unit)?.home_tile = None;
        self.synergies.deactivate(&template, &mut self.world.events);
        Ok(true)
    }

    /// Drag a player unit between zone and bench tiles. An occupied
    /// destination swaps the two units.
    pub fn move_unit_between_tiles(
        &mut self,
        unit: UnitId,
        from: TileId,
        to: TileId,
        phase: RoundPhase,
    ) -> GameResult<()> {
        let record = self.player_unit(unit)?;
        let board = &self.world.board;
        let from_category = board.tile(from)?.category;
        let to_category = board.tile(to)?.category;
        if record.tile != Some(from) {
            return Err(GameError::UnitNotOnTile { unit, tile: from });
        }
        if !matches!(to_category, TileCategory::PlayerZone | TileCategory::Bench) {
            return Err(GameError::InvalidDestination { tile: to });
        }
        let touches_zone = from_category.is_zone() || to_category.is_zone();
        if touches_zone && phase != RoundPhase::Shopping {
            return Err(GameError::WrongPhase);
        }
        if from == to {
            return Ok(());
        }

        match board.occupant(to) {
            Some(other) => {
                self.player_unit(other)?;
                self.world.swap(unit, other)?;
                self.after_landing(unit, from_category, to_category)?;
                self.after_landing(other, to_category, from_category)?;
            }
            None => {
                if from_category == TileCategory::Bench && to_category == TileCategory::PlayerZone {
                    let cap = self.progression.max_active_units();
                    if self.world.active_count(Team::Player) >= cap as usize {
                        return Err(GameError::BoardFull { cap });
                    }
                }
                self.world.place(unit, to)?;
                self.after_landing(unit, from_category, to_category)?;
            }
        }
        Ok(())
    }

    /// Home tile, synergy membership and combines for a unit that changed tiles
    fn after_landing(
        &mut self,
        unit: UnitId,
        left: TileCategory,
        landed: TileCategory,
    ) -> GameResult<()> {
        let record = self.world.unit_mut(unit)?;
        record.home_tile = match landed {
            TileCategory::PlayerZone => record.tile,
            _ => None,
        };
        let template = record.template.clone();
        match (left, landed) {
            (TileCategory::Bench, TileCategory::PlayerZone) => {
                self.synergies.activate(&template, &mut self.world.events)
            }
            (TileCategory::PlayerZone, TileCategory::Bench) => {
                self.synergies.deactivate(&template, &mut self.world.events);
                self.combiner.check_for_combination(
                    template.id,
                    &mut self.world,
                    &mut self.synergies,
                    &self.catalog,
                )?;
            }
            _ => {}
        }
        Ok(())
    }
}
