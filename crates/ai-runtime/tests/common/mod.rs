//! Stub oracles and a recording action sink shared by the integration
//! tests. The map is flat land, fully visible, with 8-directional movement
//! at a uniform step cost unless a test overrides it.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use strategy_core::{
    ActionSink, BuildingId, Coord, Creature, CreatureId, CreatureOracle, CreatureSet, Date,
    Dwelling, GameEnv, Hero, HeroId, MapObject, MapOracle, MapSize, ObjectId, PlayerId,
    PlayerRelation, PrimaryStats, Resources, TaskError, TerrainKind, TileInfo, Town, WorldOracle,
};

pub const STEP_COST: u32 = 100;

#[derive(Default)]
pub struct StubCreatures {
    creatures: HashMap<CreatureId, Creature>,
}

impl StubCreatures {
    pub fn with(mut self, creature: Creature) -> Self {
        self.creatures.insert(creature.id, creature);
        self
    }
}

impl CreatureOracle for StubCreatures {
    fn creature(&self, id: CreatureId) -> Option<Creature> {
        self.creatures.get(&id).copied()
    }
}

pub fn creature(id: u32, level: u8, speed: u8, ai_value: u64, gold_cost: i64) -> Creature {
    Creature {
        id: CreatureId(id),
        level,
        speed,
        growth: 7,
        ai_value,
        cost: Resources::gold(gold_cost),
    }
}

pub fn army(slots: &[(u32, u32)]) -> CreatureSet {
    let mut set = CreatureSet::new();
    for &(id, count) in slots {
        assert!(set.add(CreatureId(id), count), "army overflow in test setup");
    }
    set
}

pub struct StubMap {
    pub size: MapSize,
    pub water: HashSet<Coord>,
    pub objects: HashMap<Coord, ObjectId>,
    pub guards: HashMap<Coord, Vec<ObjectId>>,
    pub teleports: HashMap<Coord, Vec<Coord>>,
}

impl StubMap {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            size: MapSize {
                x: width,
                y: height,
                z: 1,
            },
            water: HashSet::new(),
            objects: HashMap::new(),
            guards: HashMap::new(),
            teleports: HashMap::new(),
        }
    }

    pub fn place(&mut self, position: Coord, object: ObjectId) {
        self.objects.insert(position, object);
    }

    pub fn guard(&mut self, position: Coord, guard: ObjectId) {
        self.guards.entry(position).or_default().push(guard);
    }
}

impl MapOracle for StubMap {
    fn size(&self) -> MapSize {
        self.size
    }

    fn tile(&self, position: Coord) -> Option<TileInfo> {
        if !self.size.contains(position) {
            return None;
        }

        Some(TileInfo {
            terrain: if self.water.contains(&position) {
                TerrainKind::Water
            } else {
                TerrainKind::Land
            },
            move_cost: STEP_COST,
            object: self.objects.get(&position).copied(),
        })
    }

    fn neighbours(&self, position: Coord) -> Vec<Coord> {
        let mut result = Vec::with_capacity(8);

        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }

                let next = Coord::new(position.x + dx, position.y + dy, position.z);

                if self.size.contains(next) {
                    result.push(next);
                }
            }
        }

        result
    }

    fn teleport_exits(&self, position: Coord) -> Vec<Coord> {
        self.teleports.get(&position).cloned().unwrap_or_default()
    }

    fn guards_at(&self, position: Coord) -> Vec<ObjectId> {
        self.guards.get(&position).cloned().unwrap_or_default()
    }

    fn is_visible(&self, _player: PlayerId, _position: Coord) -> bool {
        true
    }
}

#[derive(Default)]
pub struct StubWorld {
    pub objects: HashMap<ObjectId, MapObject>,
    pub heroes: HashMap<HeroId, Hero>,
    pub towns: Vec<Town>,
    pub dwellings: Vec<Dwelling>,
    pub resources: HashMap<PlayerId, Resources>,
    pub day: u32,
    pub satisfied_quests: HashSet<ObjectId>,
}

impl StubWorld {
    pub fn new() -> Self {
        Self {
            day: 2,
            ..Self::default()
        }
    }

    pub fn add_hero(&mut self, hero: Hero) {
        self.heroes.insert(hero.id, hero);
    }

    pub fn add_object(&mut self, object: MapObject) {
        self.objects.insert(object.id, object);
    }
}

impl WorldOracle for StubWorld {
    fn object(&self, id: ObjectId) -> Option<MapObject> {
        self.objects.get(&id).cloned()
    }

    fn visitable_objects(&self, _player: PlayerId) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = self.objects.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn hero(&self, id: HeroId) -> Option<Hero> {
        self.heroes.get(&id).cloned()
    }

    fn heroes(&self, player: PlayerId) -> Vec<Hero> {
        let mut result: Vec<Hero> = self
            .heroes
            .values()
            .filter(|h| h.owner == player)
            .cloned()
            .collect();
        result.sort_by_key(|h| h.id);
        result
    }

    fn enemy_heroes(&self, player: PlayerId) -> Vec<Hero> {
        let mut result: Vec<Hero> = self
            .heroes
            .values()
            .filter(|h| h.owner != player)
            .cloned()
            .collect();
        result.sort_by_key(|h| h.id);
        result
    }

    fn towns(&self, player: PlayerId) -> Vec<Town> {
        self.towns
            .iter()
            .filter(|t| t.owner == player)
            .cloned()
            .collect()
    }

    fn dwellings(&self, player: PlayerId) -> Vec<Dwelling> {
        self.dwellings
            .iter()
            .filter(|d| d.owner == Some(player))
            .cloned()
            .collect()
    }

    fn dwelling(&self, id: ObjectId) -> Option<Dwelling> {
        self.dwellings.iter().find(|d| d.id == id).cloned()
    }

    fn relation(&self, a: PlayerId, b: PlayerId) -> PlayerRelation {
        if a == b {
            PlayerRelation::Same
        } else {
            PlayerRelation::Enemy
        }
    }

    fn resources(&self, player: PlayerId) -> Resources {
        self.resources.get(&player).copied().unwrap_or(Resources::ZERO)
    }

    fn date(&self) -> Date {
        Date {
            day: self.day,
            day_of_week: ((self.day - 1) % 7 + 1) as u8,
        }
    }

    fn quest_satisfied(&self, object: ObjectId, _hero: &Hero) -> bool {
        self.satisfied_quests.contains(&object)
    }
}

pub fn hero(id: u32, player: PlayerId, position: Coord, army: CreatureSet) -> Hero {
    Hero {
        id: HeroId(id),
        owner: player,
        position,
        movement: 1500,
        max_movement_land: 1500,
        max_movement_sail: 1500,
        mana: 10,
        spells: Vec::new(),
        secondary_skills: Vec::new(),
        stats: PrimaryStats::default(),
        level: 1,
        experience: 0,
        army,
        has_boat: false,
    }
}

pub fn env<'a>(
    map: &'a StubMap,
    world: &'a StubWorld,
    creatures: &'a StubCreatures,
) -> GameEnv<'a> {
    GameEnv::new(map, world, creatures)
}

/// Records every action; individual calls can be scripted to fail.
#[derive(Default)]
pub struct RecordingSink {
    pub actions: Vec<String>,
    pub fail_with: Option<fn() -> TaskError>,
}

impl RecordingSink {
    fn record(&mut self, action: String) -> Result<(), TaskError> {
        if let Some(fail) = self.fail_with {
            return Err(fail());
        }

        self.actions.push(action);
        Ok(())
    }
}

impl ActionSink for RecordingSink {
    fn move_hero(&mut self, hero: HeroId, path: &[Coord]) -> Result<(), TaskError> {
        self.record(format!("move hero#{} over {} tiles", hero.0, path.len()))
    }

    fn visit_object(&mut self, hero: HeroId, object: ObjectId) -> Result<(), TaskError> {
        self.record(format!("visit {} with hero#{}", object, hero.0))
    }

    fn recruit_creatures(
        &mut self,
        source: ObjectId,
        hero: HeroId,
        creature: CreatureId,
        count: u32,
    ) -> Result<(), TaskError> {
        self.record(format!(
            "recruit {}x creature#{} at {} for hero#{}",
            count, creature.0, source, hero.0
        ))
    }

    fn build(&mut self, town: ObjectId, building: BuildingId) -> Result<(), TaskError> {
        self.record(format!("build #{} in {}", building.0, town))
    }

    fn recruit_hero(&mut self, town: ObjectId) -> Result<(), TaskError> {
        self.record(format!("recruit hero in {}", town))
    }

    fn cast_town_portal(&mut self, hero: HeroId, town: ObjectId) -> Result<(), TaskError> {
        self.record(format!("town portal hero#{} to {}", hero.0, town))
    }

    fn exchange_garrison(&mut self, hero: HeroId, town: ObjectId) -> Result<(), TaskError> {
        self.record(format!("garrison hero#{} in {}", hero.0, town))
    }
}
