mod common;

use ai_runtime::pathfinding::{AiPathfinder, PathfinderSettings, SpecialAction};
use common::{army, creature, env, hero, StubCreatures, StubMap, StubWorld};
use strategy_core::{
    Coord, CreatureSet, HeroRole, MapObject, ObjectId, ObjectKind, PlayerId, Resources,
    SecondarySkill, SkillLevel, SpellId, Town,
};

const PLAYER: PlayerId = PlayerId(0);

fn pathfinder() -> AiPathfinder {
    let mut pathfinder = AiPathfinder::new(10);
    pathfinder.storage_mut().set_player(PLAYER);
    pathfinder
}

fn town(id: u32, position: Coord) -> Town {
    Town {
        id: ObjectId(id),
        position,
        owner: PLAYER,
        has_fort: false,
        daily_income: Resources::gold(500),
        garrison: CreatureSet::new(),
        visiting_hero: None,
        garrison_hero: None,
        buildable: Vec::new(),
    }
}

#[test]
fn heroes_meeting_on_a_tile_form_a_chain() {
    let map = StubMap::new(6, 1);
    let mut world = StubWorld::new();
    let creatures = StubCreatures::default()
        .with(creature(1, 5, 7, 100, 500))
        .with(creature(2, 2, 5, 50, 150));

    let strong = hero(1, PLAYER, Coord::new(0, 0, 0), army(&[(1, 100)]));
    let weak = hero(2, PLAYER, Coord::new(1, 0, 0), army(&[(2, 40)]));

    world.add_hero(strong.clone());
    world.add_hero(weak.clone());

    let env = env(&map, &world, &creatures);
    let mut pathfinder = pathfinder();

    pathfinder.update_paths(
        env,
        &[(strong, HeroRole::Main), (weak, HeroRole::Main)],
        PathfinderSettings::default(),
    );

    let paths = pathfinder
        .storage()
        .get_chain_info(env, Coord::new(0, 0, 0), true);

    let chain = paths
        .iter()
        .filter(|p| p.chain_mask == 0b11)
        .min_by(|a, b| a.movement_cost().total_cmp(&b.movement_cost()))
        .expect("a two-hero chain should exist where the strong hero waits");

    assert_eq!(chain.exchange_count, 2);
    // Merged best-of army: both stacks survive the merge.
    assert_eq!(chain.hero_army_value, 100 * 100 + 40 * 50);
    // Carrier waits in place; only the tiny exchange penalty is paid.
    assert!(chain.movement_cost() < 1e-3);
    // The delivering hero's leg is recorded before the exchange node.
    assert!(chain.nodes.len() >= 2);
}

#[test]
fn chain_masks_stay_disjoint_and_combined() {
    let map = StubMap::new(6, 1);
    let mut world = StubWorld::new();
    let creatures = StubCreatures::default()
        .with(creature(1, 5, 7, 100, 500))
        .with(creature(2, 2, 5, 50, 150));

    let a = hero(1, PLAYER, Coord::new(0, 0, 0), army(&[(1, 100)]));
    let b = hero(2, PLAYER, Coord::new(1, 0, 0), army(&[(2, 40)]));

    world.add_hero(a.clone());
    world.add_hero(b.clone());

    let env = env(&map, &world, &creatures);
    let mut pathfinder = pathfinder();

    pathfinder.update_paths(
        env,
        &[(a, HeroRole::Main), (b, HeroRole::Main)],
        PathfinderSettings::default(),
    );

    for tile in [Coord::new(0, 0, 0), Coord::new(1, 0, 0)] {
        for path in pathfinder.storage().get_chain_info(env, tile, true) {
            if path.exchange_count == 2 {
                assert_eq!(path.chain_mask, 0b01 | 0b10);
            } else {
                assert!(path.chain_mask.count_ones() == 1);
            }
        }
    }
}

#[test]
fn expert_town_portal_reaches_every_friendly_town() {
    let map = StubMap::new(10, 10);
    let mut world = StubWorld::new();
    let creatures = StubCreatures::default().with(creature(1, 5, 7, 100, 500));

    let mut caster = hero(1, PLAYER, Coord::new(0, 0, 0), army(&[(1, 50)]));
    caster.spells.push(SpellId::TOWN_PORTAL);
    caster.mana = 20;
    caster
        .secondary_skills
        .push((SecondarySkill::EarthMagic, SkillLevel::Expert));

    world.add_hero(caster.clone());

    let town_tiles = [
        Coord::new(9, 0, 0),
        Coord::new(0, 9, 0),
        Coord::new(9, 9, 0),
    ];

    for (i, &tile) in town_tiles.iter().enumerate() {
        world.towns.push(town(100 + i as u32, tile));
    }

    let env = env(&map, &world, &creatures);
    let mut pathfinder = pathfinder();

    pathfinder.update_paths(env, &[(caster, HeroRole::Main)], PathfinderSettings::default());

    for (i, &tile) in town_tiles.iter().enumerate() {
        let paths = pathfinder.storage().get_chain_info(env, tile, true);

        let has_portal = paths.iter().any(|p| {
            p.nodes.iter().any(|n| {
                matches!(n.special, Some(SpecialAction::TownPortal { town }) if town == ObjectId(100 + i as u32))
            })
        });

        assert!(has_portal, "expected a town portal node at {tile}");
    }
}

#[test]
fn basic_caster_only_portals_to_the_closest_town() {
    let map = StubMap::new(10, 10);
    let mut world = StubWorld::new();
    let creatures = StubCreatures::default().with(creature(1, 5, 7, 100, 500));

    let mut caster = hero(1, PLAYER, Coord::new(0, 0, 0), army(&[(1, 50)]));
    caster.spells.push(SpellId::TOWN_PORTAL);
    caster.mana = 20;

    world.add_hero(caster.clone());
    world.towns.push(town(100, Coord::new(2, 2, 0)));
    world.towns.push(town(101, Coord::new(9, 9, 0)));

    let env = env(&map, &world, &creatures);
    let mut pathfinder = pathfinder();

    pathfinder.update_paths(env, &[(caster, HeroRole::Main)], PathfinderSettings::default());

    let near = pathfinder
        .storage()
        .get_chain_info(env, Coord::new(2, 2, 0), true);
    assert!(near.iter().any(|p| {
        p.nodes
            .iter()
            .any(|n| matches!(n.special, Some(SpecialAction::TownPortal { .. })))
    }));

    let far = pathfinder
        .storage()
        .get_chain_info(env, Coord::new(9, 9, 0), true);
    assert!(!far.iter().any(|p| {
        p.nodes
            .iter()
            .any(|n| matches!(n.special, Some(SpecialAction::TownPortal { .. })))
    }));
}

#[test]
fn weak_guard_is_fought_through_and_strong_guard_blocks() {
    let creatures = StubCreatures::default()
        .with(creature(1, 5, 7, 100, 500))
        .with(creature(9, 1, 3, 20, 50));

    for (guard_count, expect_path) in [(5u32, true), (2000u32, false)] {
        let mut map = StubMap::new(6, 1);
        let mut world = StubWorld::new();

        let walker = hero(1, PLAYER, Coord::new(0, 0, 0), army(&[(1, 50)]));
        world.add_hero(walker.clone());

        let guard_tile = Coord::new(2, 0, 0);
        let monster = MapObject {
            id: ObjectId(77),
            kind: ObjectKind::Monster,
            position: guard_tile,
            owner: None,
            guard: army(&[(9, guard_count)]),
        };

        map.place(guard_tile, monster.id);
        map.guard(guard_tile, monster.id);
        world.add_object(monster);

        let env = env(&map, &world, &creatures);
        let mut pathfinder = pathfinder();

        pathfinder.update_paths(
            env,
            &[(walker.clone(), HeroRole::Main)],
            PathfinderSettings::default(),
        );

        let paths = pathfinder.storage().get_chain_info(env, guard_tile, true);

        if expect_path {
            let path = paths.first().expect("weak guard should be passable");

            assert!(path.army_loss > 0, "a battle must cost something");
            assert!(path.army_loss < path.hero_army_value);
            assert!(path
                .nodes
                .iter()
                .any(|n| matches!(n.special, Some(SpecialAction::Battle { .. }))));
        } else {
            assert!(
                paths.is_empty(),
                "an overwhelming guard must block the tile"
            );
        }
    }
}

#[test]
fn costs_never_decrease_along_a_path() {
    let map = StubMap::new(8, 1);
    let mut world = StubWorld::new();
    let creatures = StubCreatures::default()
        .with(creature(1, 5, 7, 100, 500))
        .with(creature(2, 2, 5, 50, 150));

    let a = hero(1, PLAYER, Coord::new(0, 0, 0), army(&[(1, 100)]));
    let b = hero(2, PLAYER, Coord::new(3, 0, 0), army(&[(2, 40)]));

    world.add_hero(a.clone());
    world.add_hero(b.clone());

    let env = env(&map, &world, &creatures);
    let mut pathfinder = pathfinder();

    pathfinder.update_paths(
        env,
        &[(a, HeroRole::Main), (b, HeroRole::Main)],
        PathfinderSettings::default(),
    );

    for x in 0..8 {
        for path in pathfinder
            .storage()
            .get_chain_info(env, Coord::new(x, 0, 0), true)
        {
            // Nodes are target-first; within one hero's leg every
            // predecessor must be cheaper or equal, waiting only adds.
            for window in path.nodes.windows(2) {
                if window[0].hero != window[1].hero {
                    continue;
                }

                assert!(
                    window[0].cost >= window[1].cost - 1e-6,
                    "cost decreased along a path at x={x}"
                );
            }
        }
    }
}
