mod creatures;
mod map;
mod world;

pub use creatures::CreatureOracle;
pub use map::{MapOracle, MapSize, TerrainKind, TileInfo};
pub use world::WorldOracle;

/// Aggregates the read-only oracles the AI needs for one decision pass.
///
/// Borrowed from the game host for the duration of a turn; every subsystem
/// receives it as an explicit argument instead of reaching for globals.
#[derive(Clone, Copy)]
pub struct GameEnv<'a> {
    map: &'a dyn MapOracle,
    world: &'a dyn WorldOracle,
    creatures: &'a dyn CreatureOracle,
}

impl<'a> GameEnv<'a> {
    pub fn new(
        map: &'a dyn MapOracle,
        world: &'a dyn WorldOracle,
        creatures: &'a dyn CreatureOracle,
    ) -> Self {
        Self {
            map,
            world,
            creatures,
        }
    }

    pub fn map(&self) -> &'a dyn MapOracle {
        self.map
    }

    pub fn world(&self) -> &'a dyn WorldOracle {
        self.world
    }

    pub fn creatures(&self) -> &'a dyn CreatureOracle {
        self.creatures
    }
}
