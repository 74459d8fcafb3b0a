//! Data model and external interfaces for the adventure-map AI.
//!
//! This crate is deliberately free of game logic: it defines the vocabulary
//! (coordinates, creatures, heroes, map objects, resources), the oracle
//! traits through which the AI reads the game engine, and the action sink
//! through which it acts. The decision-making lives in `ai-runtime`.

pub mod action;
pub mod config;
pub mod env;
pub mod state;

pub use action::{ActionSink, TaskError};
pub use config::GameConstants;
pub use env::{CreatureOracle, GameEnv, MapOracle, MapSize, TerrainKind, TileInfo, WorldOracle};
pub use state::{
    Artifact, ArtifactClass, BuildingId, BuildingInfo, Coord, Creature, CreatureId, CreatureSet,
    CreatureSlot, Date, Dwelling, Hero, HeroId, HeroRole, Layer, MapObject, ObjectId, ObjectKind,
    PlayerId, PlayerRelation, PrimaryStats, ResourceKind, Resources, SecondarySkill, SkillLevel,
    SlotInfo, SpellId, Town,
};
