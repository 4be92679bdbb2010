use super::*;
use crate::combat::{apply_hit, HitOutcome, TickReport};
use crate::unit::CombatState;

#[test]
fn test_fixed_damage_without_armor_is_exact() {
    // SCENARIO: min = max = 10 and armor 0 on both sides. Every landed hit
    // deals exactly 10.
    let mut world = create_world();
    let mut controller = create_controller();
    let mut rng = XorShiftRng::seed_from_u64(99);
    let attacker = spawn_at(&mut world, Team::Player, create_melee(1, 10, 1000), 3, 3);
    let defender = spawn_at(&mut world, Team::Enemy, create_melee(1, 10, 1000), 3, 4);
    world.events.drain();
    controller.begin(&mut world);

    let events = run_combat(&mut controller, &mut world, &mut rng, 50, 100);

    let hits: Vec<i32> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::DamageDealt { damage, .. } => Some(*damage),
            _ => None,
        })
        .collect();
    assert!(hits.len() >= 4);
    assert!(hits.iter().all(|d| *d == 10));
    let attacker_health = world.units.get(attacker).unwrap().health;
    let defender_health = world.units.get(defender).unwrap().health;
    assert_eq!((1000 - attacker_health) % 10, 0);
    assert_eq!((1000 - defender_health) % 10, 0);
}

#[test]
fn test_damage_rolls_within_bounds() {
    let mut world = create_world();
    let mut controller = create_controller();
    let mut rng = XorShiftRng::seed_from_u64(5);
    let mut template = create_melee(1, 5, 10_000);
    template.stats.max_damage = 9;
    spawn_at(&mut world, Team::Player, template.clone(), 3, 3);
    spawn_at(&mut world, Team::Enemy, template, 3, 4);
    controller.begin(&mut world);

    let events = run_combat(&mut controller, &mut world, &mut rng, 200, 100);

    for event in &events {
        if let GameEvent::DamageDealt { damage, .. } = event {
            assert!((5..=9).contains(damage));
        }
    }
}

#[test]
fn test_negative_damage_is_discarded() {
    // SCENARIO: armor so high that mitigation exceeds the raw hit. The hit is
    // dropped: no health change and no mana for the attacker.
    let mut world = create_world();
    let attacker = spawn_at(&mut world, Team::Player, create_melee(1, 10, 100), 3, 3);
    let mut armored = create_melee(1, 10, 100);
    armored.stats.armor = 100;
    let defender = spawn_at(&mut world, Team::Enemy, armored, 3, 4);
    world.events.drain();
    let mut report = TickReport::default();

    let outcome = apply_hit(&mut world, attacker, defender, 10, true, &mut report);

    assert_eq!(outcome, HitOutcome::Absorbed);
    assert_eq!(world.units.get(defender).unwrap().health, 100);
    assert_eq!(world.units.get(attacker).unwrap().mana, 0);
    assert_eq!(
        world.events.drain(),
        alloc::vec![GameEvent::HitAbsorbed {
            source: attacker,
            target: defender
        }]
    );
}

#[test]
fn test_zero_damage_still_lands() {
    let mut world = create_world();
    let attacker = spawn_at(&mut world, Team::Player, create_melee(1, 0, 100), 3, 3);
    let defender = spawn_at(&mut world, Team::Enemy, create_melee(1, 10, 100), 3, 4);
    let mut report = TickReport::default();

    let outcome = apply_hit(&mut world, attacker, defender, 0, true, &mut report);

    assert_eq!(
        outcome,
        HitOutcome::Landed {
            damage: 0,
            killed: false
        }
    );
    assert_eq!(world.units.get(attacker).unwrap().mana, 10);
}

#[test]
fn test_mana_clamps_at_max() {
    let mut world = create_world();
    let attacker = spawn_at(&mut world, Team::Player, create_melee(1, 1, 100), 3, 3);
    let defender = spawn_at(&mut world, Team::Enemy, create_melee(1, 10, 1000), 3, 4);
    let mut report = TickReport::default();

    for _ in 0..15 {
        apply_hit(&mut world, attacker, defender, 1, true, &mut report);
    }

    assert_eq!(world.units.get(attacker).unwrap().mana, 100);
}

#[test]
fn test_lethal_hit_kills_and_frees_tile() {
    let mut world = create_world();
    let attacker = spawn_at(&mut world, Team::Player, create_melee(1, 50, 100), 3, 3);
    let ally = spawn_at(&mut world, Team::Player, create_melee(1, 50, 100), 4, 3);
    let defender = spawn_at(&mut world, Team::Enemy, create_melee(1, 10, 30), 3, 4);
    world.units.get_mut(ally).unwrap().target = Some(defender);
    world.units.get_mut(ally).unwrap().state = CombatState::AttackWindup;
    world.units.get_mut(ally).unwrap().timers.attack_point = Some(100);
    let mut report = TickReport::default();

    let outcome = apply_hit(&mut world, attacker, defender, 50, true, &mut report);

    assert_eq!(
        outcome,
        HitOutcome::Landed {
            damage: 50,
            killed: true
        }
    );
    let dead = world.units.get(defender).unwrap();
    assert!(!dead.alive);
    assert_eq!(dead.health, 0);
    assert_eq!(dead.state, CombatState::Dead);
    assert_eq!(dead.tile, None);
    assert!(world.board.is_free(tile(&world, 3, 4)));
    assert!(world.rosters.enemy_active.is_empty());
    assert_eq!(report.deaths, alloc::vec![(defender, Team::Enemy)]);

    // Anyone hunting the dead unit drops it and its pending swing
    let hunter = world.units.get(ally).unwrap();
    assert_eq!(hunter.target, None);
    assert_eq!(hunter.timers.attack_point, None);
    assert_eq!(hunter.state, CombatState::Targeting);
}

#[test]
fn test_kill_keeps_attack_cadence() {
    // SCENARIO: the attacker one-shots a fragile enemy, then turns on a tough
    // one next to it. The swing after the kill still waits out the full
    // attack time of the swing that killed.
    let mut world = create_world();
    let mut controller = create_controller();
    let mut rng = XorShiftRng::seed_from_u64(3);
    let attacker = spawn_at(&mut world, Team::Player, create_melee(1, 50, 10_000), 3, 3);
    let fragile = spawn_at(&mut world, Team::Enemy, create_melee(2, 1, 30), 3, 4);
    spawn_at(&mut world, Team::Enemy, create_melee(3, 1, 10_000), 4, 4);
    world.events.drain();
    controller.begin(&mut world);

    let mut hits = Vec::new();
    let mut fragile_died = false;
    for tick in 1..=40u32 {
        controller.tick(&mut world, &mut rng, 100);
        for event in world.events.drain() {
            match event {
                GameEvent::DamageDealt { source, .. } if source == attacker => {
                    hits.push(tick * 100)
                }
                GameEvent::UnitDied { unit, .. } if unit == fragile => fragile_died = true,
                _ => {}
            }
        }
    }

    assert!(fragile_died);
    assert!(hits.len() >= 3);
    let attack_time = world.units.get(attacker).unwrap().stats.attack_time_ms;
    assert_eq!(attack_time, 1000);
    for pair in hits.windows(2) {
        assert!(
            pair[1] - pair[0] >= attack_time,
            "swings at {} and {}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn test_projectile_lands_after_travel() {
    let mut world = create_world();
    let mut controller = create_controller();
    let mut rng = XorShiftRng::seed_from_u64(1);
    let archer = spawn_at(&mut world, Team::Player, create_ranged(10, 10, 1000), 3, 1);
    // Equal range, so the archer may swing once the target is ready too
    spawn_at(&mut world, Team::Enemy, create_ranged(11, 10, 1000), 3, 4);
    world.events.drain();
    controller.begin(&mut world);

    let mut launched_at = None;
    let mut landed_at = None;
    for tick in 0..30u32 {
        controller.tick(&mut world, &mut rng, 100);
        for event in world.events.drain() {
            match event {
                GameEvent::ProjectileLaunched { source, .. } if source == archer => {
                    launched_at.get_or_insert(tick);
                }
                GameEvent::DamageDealt { source, .. } if source == archer => {
                    landed_at.get_or_insert(tick);
                }
                _ => {}
            }
        }
    }

    let launched_at = launched_at.expect("archer fired");
    let landed_at = landed_at.expect("projectile landed");
    // 3 tiles at 25 tiles/s takes two 100 ms ticks
    assert_eq!(landed_at - launched_at, 2);
}

#[test]
fn test_projectile_discarded_when_target_gone() {
    let mut world = create_world();
    let mut controller = create_controller();
    let mut rng = XorShiftRng::seed_from_u64(1);
    let archer = spawn_at(&mut world, Team::Player, create_ranged(10, 10, 1000), 3, 1);
    let target = spawn_at(&mut world, Team::Enemy, create_ranged(11, 10, 1000), 3, 4);
    controller.begin(&mut world);

    let from_archer =
        |c: &CombatController| c.projectiles().iter().any(|p| p.source == archer);
    for _ in 0..20 {
        if from_archer(&controller) {
            break;
        }
        controller.tick(&mut world, &mut rng, 100);
    }
    assert!(from_archer(&controller));
    world.destroy(target).unwrap();
    world.events.drain();
    controller.tick(&mut world, &mut rng, 100);

    assert!(!from_archer(&controller));
    let hits = world
        .events
        .drain()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::DamageDealt { source, .. } if *source == archer))
        .count();
    assert_eq!(hits, 0);
}
