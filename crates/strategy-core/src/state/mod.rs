mod common;
mod creature;
mod hero;
mod object;
mod resources;

pub use common::{Coord, Date, Layer, ObjectId, PlayerId, PlayerRelation};
pub use creature::{Creature, CreatureId, CreatureSet, CreatureSlot, SlotInfo};
pub use hero::{Hero, HeroId, HeroRole, PrimaryStats, SecondarySkill, SkillLevel, SpellId};
pub use object::{
    Artifact, ArtifactClass, BuildingId, BuildingInfo, Dwelling, MapObject, ObjectKind, Town,
};
pub use resources::{ResourceKind, Resources};
