/// Game-wide constants shared by every subsystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct GameConstants;

impl GameConstants {
    /// Maximum number of creature stacks an army can hold.
    pub const ARMY_SIZE: usize = 7;

    /// Maximum number of secondary skills a hero can learn.
    pub const SKILL_PER_HERO: usize = 8;

    /// Gold cost of recruiting a hero in a town tavern.
    pub const HERO_GOLD_COST: u32 = 2500;

    /// Movement points consumed by a single step over neutral terrain.
    pub const BASE_MOVEMENT_COST: u32 = 100;
}
