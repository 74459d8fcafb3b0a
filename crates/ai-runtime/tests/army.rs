mod common;

use ai_runtime::analyzers::ArmyManager;
use common::{army, creature, env, StubCreatures, StubMap, StubWorld};
use strategy_core::{CreatureId, Dwelling, GameConstants, ObjectId, Resources};

fn bestiary() -> StubCreatures {
    StubCreatures::default()
        .with(creature(1, 1, 4, 10, 60)) // pikeman
        .with(creature(2, 2, 6, 16, 100)) // archer
        .with(creature(3, 4, 5, 60, 300)) // swordsman
        .with(creature(4, 1, 4, 30, 30)) // gremlin
        .with(creature(5, 2, 6, 150, 160)) // gargoyle
}

#[test]
fn best_army_merges_sorts_and_keeps_a_rear_guard() {
    let map = StubMap::new(4, 4);
    let world = StubWorld::new();
    let creatures = bestiary();
    let env = env(&map, &world, &creatures);

    let target = army(&[(1, 10), (2, 5)]);
    let source = army(&[(1, 4), (3, 2)]).with_last_stack();

    let best = ArmyManager::get_best_army(env, &target, &source);

    assert_eq!(best.len(), 3);

    // Sorted by power descending: pikemen 14x10, swordsmen 2x60, archers 5x16.
    assert_eq!(best[0].creature, CreatureId(1));
    assert_eq!(best[1].creature, CreatureId(3));
    assert_eq!(best[2].creature, CreatureId(2));

    // One unit of the weakest stack (lowest level: pikeman) stays behind.
    assert_eq!(best[0].count, 13);
    assert_eq!(best[0].power, 130);
    assert!(best.windows(2).all(|w| w[0].power >= w[1].power));
}

#[test]
fn best_army_never_exceeds_the_slot_cap() {
    let map = StubMap::new(4, 4);
    let world = StubWorld::new();
    let mut creatures = bestiary();
    for id in 10..20 {
        creatures = creatures.with(creature(id, 3, 5, 40 + id as u64, 100));
    }
    let env = env(&map, &world, &creatures);

    let target = army(&[(10, 1), (11, 1), (12, 1), (13, 1), (14, 1)]);
    let source = army(&[(15, 1), (16, 1), (17, 1), (18, 1), (19, 1)]);

    let best = ArmyManager::get_best_army(env, &target, &source);

    assert_eq!(best.len(), GameConstants::ARMY_SIZE);

    let mut seen: Vec<CreatureId> = best.iter().map(|s| s.creature).collect();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), GameConstants::ARMY_SIZE, "creature types must be unique");
}

#[test]
fn reinforcements_never_go_negative() {
    let map = StubMap::new(4, 4);
    let world = StubWorld::new();
    let creatures = bestiary();
    let env = env(&map, &world, &creatures);

    let strong = army(&[(3, 50)]);
    let weak = army(&[(1, 1)]);

    // Merging a weak army into a strong one gains little but never loses.
    let gain = ArmyManager::how_many_reinforcements_can_get(env, &strong, &weak);
    assert_eq!(gain, 10);

    let nothing = ArmyManager::how_many_reinforcements_can_get(env, &strong, &army(&[]));
    assert_eq!(nothing, 0);
}

#[test]
fn buying_needs_a_free_slot() {
    let map = StubMap::new(4, 4);
    let world = StubWorld::new();
    let mut creatures = bestiary();
    for id in 10..17 {
        creatures = creatures.with(creature(id, 3, 5, 40, 100));
    }
    let env = env(&map, &world, &creatures);

    // Seven unrelated stacks: no room for gremlins or gargoyles.
    let full_army = army(&[(10, 1), (11, 1), (12, 1), (13, 1), (14, 1), (15, 1), (16, 1)]);

    let dwelling = Dwelling {
        id: ObjectId(50),
        position: strategy_core::Coord::new(0, 0, 0),
        owner: None,
        available: vec![(CreatureId(4), 100), (CreatureId(5), 50)],
    };

    let purchases =
        ArmyManager::get_army_available_to_buy(env, &full_army, &dwelling, Resources::gold(2000));

    assert!(purchases.is_empty());
}

#[test]
fn buying_walks_tiers_top_down_and_respects_gold() {
    let map = StubMap::new(4, 4);
    let world = StubWorld::new();
    let creatures = bestiary();
    let env = env(&map, &world, &creatures);

    let empty = army(&[]);
    let dwelling = Dwelling {
        id: ObjectId(50),
        position: strategy_core::Coord::new(0, 0, 0),
        owner: None,
        available: vec![(CreatureId(4), 100), (CreatureId(5), 50)],
    };

    let purchases =
        ArmyManager::get_army_available_to_buy(env, &empty, &dwelling, Resources::gold(2000));

    // Gargoyles first (top tier): 2000 / 160 = 12; then 80 gold buys 2 gremlins.
    assert_eq!(purchases.len(), 2);
    assert_eq!(purchases[0].creature, CreatureId(5));
    assert_eq!(purchases[0].count, 12);
    assert_eq!(purchases[1].creature, CreatureId(4));
    assert_eq!(purchases[1].count, 2);

    let value = ArmyManager::how_many_reinforcements_can_buy(
        env,
        &empty,
        &dwelling,
        Resources::gold(2000),
    );
    assert_eq!(value, 12 * 150 + 2 * 30);
}
