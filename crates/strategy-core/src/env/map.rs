use crate::state::{Coord, ObjectId, PlayerId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapSize {
    pub x: i32,
    pub y: i32,
    /// Number of map levels (1 = surface only, 2 = with underground).
    pub z: i32,
}

impl MapSize {
    pub fn contains(&self, c: Coord) -> bool {
        c.x >= 0 && c.y >= 0 && c.z >= 0 && c.x < self.x && c.y < self.y && c.z < self.z
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerrainKind {
    /// Impassable filler; no layer can enter.
    Rock,
    Water,
    Land,
}

/// Static description of one tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileInfo {
    pub terrain: TerrainKind,
    /// Movement points one step onto this tile costs.
    pub move_cost: u32,
    /// Visitable object occupying the tile, if any.
    pub object: Option<ObjectId>,
}

/// Tile-level view of the adventure map, provided by the game engine.
pub trait MapOracle {
    fn size(&self) -> MapSize;

    fn tile(&self, position: Coord) -> Option<TileInfo>;

    /// 8-directional passable neighbours on the same map level.
    fn neighbours(&self, position: Coord) -> Vec<Coord>;

    /// Exits reachable by entering a teleporter on this tile.
    fn teleport_exits(&self, position: Coord) -> Vec<Coord>;

    /// Monster stacks whose zone of control covers this tile.
    fn guards_at(&self, position: Coord) -> Vec<ObjectId>;

    /// Fog-of-war check for the given player's team.
    fn is_visible(&self, player: PlayerId, position: Coord) -> bool;
}
