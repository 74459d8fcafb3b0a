use crate::state::{Creature, CreatureId};

/// Bestiary lookup provided by the game engine.
pub trait CreatureOracle {
    fn creature(&self, id: CreatureId) -> Option<Creature>;
}
