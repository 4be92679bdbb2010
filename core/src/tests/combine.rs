use super::*;
use crate::catalog::Catalog;
use crate::combine::BenchCombiner;
use crate::synergy::SynergyAggregator;

struct Fixture {
    world: World,
    synergies: SynergyAggregator,
    catalog: Catalog,
    combiner: BenchCombiner,
}

fn create_fixture() -> Fixture {
    Fixture {
        world: create_world(),
        synergies: SynergyAggregator::new(create_synergies()).unwrap(),
        catalog: Catalog::new(create_catalog()),
        combiner: BenchCombiner::new(3),
    }
}

impl Fixture {
    fn bench(&mut self, template: u32, worth: u32, slot: usize) -> UnitId {
        let template = self.catalog.get(TemplateId(template)).unwrap().clone();
        self.synergies.acquire(&template, &mut self.world.events);
        let at = self.world.board.bench_tile(slot).unwrap();
        self.world
            .spawn(Team::Player, template, worth, at)
            .unwrap()
    }

    fn check(&mut self, template: u32) -> Option<UnitId> {
        self.combiner
            .check_for_combination(
                TemplateId(template),
                &mut self.world,
                &mut self.synergies,
                &self.catalog,
            )
            .unwrap()
    }
}

#[test]
fn test_three_copies_merge_into_upgrade() {
    // SCENARIO: three identical templates on a bench that is full except for
    // one slot. Exactly those three are destroyed and one upgraded unit appears
    // carrying the sum of their worth.
    let mut fx = create_fixture();
    let copies = [fx.bench(1, 1, 0), fx.bench(1, 2, 2), fx.bench(1, 4, 5)];
    let fillers: Vec<UnitId> = [1usize, 3, 4, 6]
        .iter()
        .map(|slot| fx.bench(20, 2, *slot))
        .collect();
    assert_eq!(fx.world.bench_count(), 7);

    let merged = fx.check(1).expect("combined");

    for copy in copies {
        assert!(!fx.world.units.contains(copy));
    }
    for filler in &fillers {
        assert!(fx.world.units.contains(*filler));
    }
    assert_eq!(fx.world.bench_count(), 5);
    let unit = fx.world.units.get(merged).unwrap();
    assert_eq!(unit.template_id(), TemplateId(2));
    assert_eq!(unit.worth, 7);
    // First free slot after the merge
    assert_eq!(unit.tile, fx.world.board.bench_tile(0));

    let knights = fx.synergies.entry(SynergyId(KNIGHT)).unwrap();
    assert_eq!(knights.owned_copies(TemplateId(1)), 0);
    assert_eq!(knights.owned_copies(TemplateId(2)), 1);
}

#[test]
fn test_two_copies_do_nothing() {
    let mut fx = create_fixture();
    let a = fx.bench(1, 1, 0);
    let b = fx.bench(1, 1, 1);

    assert_eq!(fx.check(1), None);

    assert!(fx.world.units.contains(a));
    assert!(fx.world.units.contains(b));
}

#[test]
fn test_merge_chains_upward() {
    // Two star-2 copies already wait on the bench; three star-1 copies make
    // the third star-2, which completes a star-3.
    let mut fx = create_fixture();
    fx.bench(2, 3, 0);
    fx.bench(2, 3, 1);
    fx.bench(1, 1, 2);
    fx.bench(1, 1, 3);
    fx.bench(1, 1, 4);

    let merged = fx.check(1).expect("combined");

    let unit = fx.world.units.get(merged).unwrap();
    assert_eq!(unit.template_id(), TemplateId(3));
    assert_eq!(unit.worth, 9);
    assert_eq!(fx.world.bench_count(), 1);
}

#[test]
fn test_top_of_chain_never_merges() {
    let mut fx = create_fixture();
    let tops: Vec<UnitId> = (0..3).map(|slot| fx.bench(3, 9, slot)).collect();

    assert_eq!(fx.check(3), None);

    for top in tops {
        assert!(fx.world.units.contains(top));
    }
}

#[test]
fn test_board_copies_are_not_consumed() {
    let mut fx = create_fixture();
    let template = fx.catalog.get(TemplateId(1)).unwrap().clone();
    let on_board = spawn_at(&mut fx.world, Team::Player, template, 2, 2);
    fx.bench(1, 1, 0);
    fx.bench(1, 1, 1);

    assert_eq!(fx.check(1), None);
    assert!(fx.world.units.contains(on_board));
}
