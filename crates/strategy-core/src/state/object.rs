use crate::state::{
    Coord, CreatureId, CreatureSet, HeroId, ObjectId, PlayerId, ResourceKind, Resources,
    SecondarySkill,
};

/// Quality band of an artifact, used when its stat bonuses undersell it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactClass {
    Minor,
    Major,
    Relic,
    Special,
}

/// An artifact lying on the map or carried by an enemy hero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Artifact {
    pub class: Option<ArtifactClass>,
    pub is_spell_scroll: bool,
    pub land_movement: i32,
    pub morale: i32,
    pub luck: i32,
    pub attack: i32,
    pub defence: i32,
    pub knowledge: i32,
    pub spell_power: i32,
}

/// What a visitable map object is, with the payload the reward tables need.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ObjectKind {
    Resource(ResourceKind),
    TreasureChest,
    SeaChest,
    Campfire,
    Wagon,
    WaterWheel,
    Windmill,
    MysticalGarden,
    Mine(ResourceKind),
    AbandonedMine,
    /// Guarded bank; the reward comes from the bank's configuration.
    CreatureBank {
        gold_reward: i64,
        army_reward: u64,
    },
    Crypt,
    DerelictShip,
    Shipwreck,
    ShipwreckSurvivor,
    WarriorsTomb,
    DragonUtopia,
    Artifact(Artifact),
    /// Grants +1 to a primary skill or a point of a secondary skill.
    SkillTrainer,
    Arena,
    Library,
    WitchHut {
        skill: SecondarySkill,
        /// Whether this player has scouted which skill the hut teaches.
        revealed: bool,
    },
    Town,
    Dwelling,
    Hero(HeroId),
    HillFort,
    QuestGuard,
    BorderGuard,
    Teleporter,
    /// Wandering monster stack guarding its tile and neighbours.
    Monster,
}

impl ObjectKind {
    /// Objects that disappear once picked up, clearing the tile.
    pub fn is_removable(&self) -> bool {
        matches!(
            self,
            ObjectKind::Resource(_)
                | ObjectKind::TreasureChest
                | ObjectKind::SeaChest
                | ObjectKind::Campfire
                | ObjectKind::Wagon
                | ObjectKind::Artifact(_)
                | ObjectKind::Monster
                | ObjectKind::QuestGuard
                | ObjectKind::BorderGuard
        )
    }

    /// Objects visited by stepping onto their tile rather than next to it.
    pub fn blocks_visit(&self) -> bool {
        matches!(
            self,
            ObjectKind::Resource(_)
                | ObjectKind::TreasureChest
                | ObjectKind::SeaChest
                | ObjectKind::Campfire
                | ObjectKind::Wagon
                | ObjectKind::Artifact(_)
                | ObjectKind::Monster
                | ObjectKind::QuestGuard
                | ObjectKind::BorderGuard
                | ObjectKind::Hero(_)
                | ObjectKind::Town
        )
    }
}

/// A visitable object as reported by the game engine.
#[derive(Clone, Debug)]
pub struct MapObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub position: Coord,
    pub owner: Option<PlayerId>,
    /// Creatures defending the object itself (bank guards, monster stack).
    pub guard: CreatureSet,
}

impl MapObject {
    pub fn owner_or_neutral(&self) -> PlayerId {
        self.owner.unwrap_or(PlayerId::NEUTRAL)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BuildingId(pub u16);

/// A construction candidate surfaced by the game engine for a town.
#[derive(Clone, Debug)]
pub struct BuildingInfo {
    pub id: BuildingId,
    pub cost: Resources,
    pub daily_income: Resources,
    /// Combat value of the weekly creature growth this building unlocks.
    pub army_growth_value: u64,
}

/// An owned or visible town.
#[derive(Clone, Debug)]
pub struct Town {
    pub id: ObjectId,
    pub position: Coord,
    pub owner: PlayerId,
    pub has_fort: bool,
    pub daily_income: Resources,
    pub garrison: CreatureSet,
    pub visiting_hero: Option<HeroId>,
    pub garrison_hero: Option<HeroId>,
    /// Next construction candidates, cheapest prerequisites first.
    pub buildable: Vec<BuildingInfo>,
}

/// A creature dwelling with its currently available stock, lowest tier first.
#[derive(Clone, Debug)]
pub struct Dwelling {
    pub id: ObjectId,
    pub position: Coord,
    pub owner: Option<PlayerId>,
    pub available: Vec<(CreatureId, u32)>,
}
