mod common;

use ai_runtime::{AiConfig, AiWorker, GameHost, Interrupt, RuntimeError, TurnEngine, TurnEvent};
use common::{army, creature, env, hero, RecordingSink, StubCreatures, StubMap, StubWorld};
use strategy_core::{
    ActionSink, Coord, CreatureOracle, MapObject, MapOracle, ObjectId, ObjectKind, PlayerId,
    Resources, TaskError, Town, WorldOracle,
};

const PLAYER: PlayerId = PlayerId(0);
const RULES: &str = include_str!("../../../config/ai/object-priorities.txt");

fn engine() -> TurnEngine {
    TurnEngine::from_rules(AiConfig::default(), PLAYER, Interrupt::new(), RULES)
        .expect("rule file must parse")
}

fn empty_setup() -> (StubMap, StubWorld, StubCreatures) {
    let map = StubMap::new(6, 6);
    let mut world = StubWorld::new();
    let creatures = StubCreatures::default().with(creature(1, 5, 7, 100, 500));

    world.add_hero(hero(1, PLAYER, Coord::new(0, 0, 0), army(&[(1, 50)])));

    (map, world, creatures)
}

#[test]
fn empty_world_ends_the_turn_without_actions() {
    let (map, world, creatures) = empty_setup();
    let env = env(&map, &world, &creatures);
    let mut sink = RecordingSink::default();

    let result = engine().make_turn(env, &mut sink);

    assert!(result.is_ok());
    assert!(sink.actions.is_empty(), "no executor action may be issued");
}

#[test]
fn rewarding_object_is_visited() {
    let (mut map, mut world, creatures) = empty_setup();

    let chest = MapObject {
        id: ObjectId(40),
        kind: ObjectKind::TreasureChest,
        position: Coord::new(1, 1, 0),
        owner: None,
        guard: Default::default(),
    };
    map.place(chest.position, chest.id);
    world.add_object(chest);

    let env = env(&map, &world, &creatures);
    let mut sink = RecordingSink::default();

    let result = engine().make_turn(env, &mut sink);

    assert!(result.is_ok());
    assert!(
        sink.actions.iter().any(|a| a.contains("visit obj#40")),
        "the chest should be picked up, got {:?}",
        sink.actions
    );
}

#[test]
fn loop_is_bounded_by_max_pass() {
    let (mut map, mut world, creatures) = empty_setup();

    let chest = MapObject {
        id: ObjectId(40),
        kind: ObjectKind::TreasureChest,
        position: Coord::new(1, 1, 0),
        owner: None,
        guard: Default::default(),
    };
    map.place(chest.position, chest.id);
    world.add_object(chest);

    let env = env(&map, &world, &creatures);

    // The stub world never changes, so the same task wins every pass; the
    // loop must still terminate at the pass limit.
    let mut sink = RecordingSink::default();
    let result = engine().make_turn(env, &mut sink);

    assert!(result.is_ok());

    let visits = sink
        .actions
        .iter()
        .filter(|a| a.contains("visit"))
        .count() as u32;

    assert!(visits >= 1);
    assert!(visits <= AiConfig::default().max_pass);
}

#[test]
fn goal_fulfilled_continues_and_execution_failure_ends_the_turn() {
    let (mut map, mut world, creatures) = empty_setup();

    let chest = MapObject {
        id: ObjectId(40),
        kind: ObjectKind::TreasureChest,
        position: Coord::new(1, 1, 0),
        owner: None,
        guard: Default::default(),
    };
    map.place(chest.position, chest.id);
    world.add_object(chest);

    let env = env(&map, &world, &creatures);

    let mut fulfilled_sink = RecordingSink {
        fail_with: Some(|| TaskError::GoalFulfilled),
        ..Default::default()
    };
    assert!(engine().make_turn(env, &mut fulfilled_sink).is_ok());
    assert!(fulfilled_sink.actions.is_empty());

    let mut failing_sink = RecordingSink {
        fail_with: Some(|| TaskError::Execution("refused".to_owned())),
        ..Default::default()
    };
    assert!(engine().make_turn(env, &mut failing_sink).is_ok());
    assert!(failing_sink.actions.is_empty());
}

#[test]
fn threatened_town_is_garrisoned_once_and_the_hero_stays_locked() {
    let map = StubMap::new(6, 6);
    let mut world = StubWorld::new();
    let creatures = StubCreatures::default().with(creature(1, 5, 7, 100, 500));

    // A defender strong enough to hold, a garrison that is not.
    world.add_hero(hero(1, PLAYER, Coord::new(0, 0, 0), army(&[(1, 300)])));
    world.add_hero(hero(2, PlayerId(1), Coord::new(5, 5, 0), army(&[(1, 200)])));

    world.towns.push(Town {
        id: ObjectId(100),
        position: Coord::new(2, 2, 0),
        owner: PLAYER,
        has_fort: true,
        daily_income: Resources::gold(500),
        garrison: army(&[(1, 10)]),
        visiting_hero: None,
        garrison_hero: None,
        buildable: Vec::new(),
    });

    let env = env(&map, &world, &creatures);
    let mut sink = RecordingSink::default();

    let result = engine().make_turn(env, &mut sink);

    assert!(result.is_ok());

    // The fixed defence priority wins over everything else on the map and
    // the hero is locked afterwards, so garrison duty happens exactly once.
    let garrisons = sink
        .actions
        .iter()
        .filter(|a| a.contains("garrison hero#1 in obj#100"))
        .count();

    assert_eq!(garrisons, 1, "got {:?}", sink.actions);
}

#[test]
fn triggered_interrupt_ends_the_turn_early() {
    let (map, world, creatures) = empty_setup();
    let env = env(&map, &world, &creatures);

    let interrupt = Interrupt::new();
    let mut engine =
        TurnEngine::from_rules(AiConfig::default(), PLAYER, interrupt.clone(), RULES).unwrap();

    interrupt.trigger();

    let mut sink = RecordingSink::default();
    let result = engine.make_turn(env, &mut sink);

    assert!(matches!(result, Err(RuntimeError::Interrupted)));
    assert!(sink.actions.is_empty());
}

#[test]
fn missing_priority_file_is_fatal() {
    let config = AiConfig {
        priorities_path: "definitely/not/here.txt".into(),
        ..AiConfig::default()
    };

    let result = TurnEngine::new(config, PLAYER, Interrupt::new());

    assert!(matches!(result, Err(RuntimeError::ConfigMissing { .. })));
}

struct StubHost {
    map: StubMap,
    world: StubWorld,
    creatures: StubCreatures,
    sink: RecordingSink,
}

impl GameHost for StubHost {
    fn split(
        &mut self,
    ) -> (
        &dyn MapOracle,
        &dyn WorldOracle,
        &dyn CreatureOracle,
        &mut dyn ActionSink,
    ) {
        (&self.map, &self.world, &self.creatures, &mut self.sink)
    }
}

#[tokio::test]
async fn worker_runs_turns_and_reports_events() {
    let (map, world, creatures) = empty_setup();

    let host = StubHost {
        map,
        world,
        creatures,
        sink: RecordingSink::default(),
    };

    let (worker, handle) = AiWorker::new(engine(), PLAYER, host);
    let mut events = handle.subscribe();

    let join = tokio::spawn(worker.run());

    handle.run_turn().await.expect("turn should succeed");

    assert_eq!(events.recv().await, Ok(TurnEvent::TurnStarted { player: PLAYER }));
    assert_eq!(
        events.recv().await,
        Ok(TurnEvent::TurnCompleted { player: PLAYER })
    );

    handle.shutdown().await.expect("shutdown");
    join.await.expect("worker task");
}
