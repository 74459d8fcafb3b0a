use strategy_core::{Coord, CreatureSet, HeroId};

use crate::pathfinding::node::SpecialAction;

/// One anchor point of an extracted path.
#[derive(Clone, Debug)]
pub struct AiPathNodeInfo {
    pub coord: Coord,
    pub turns: u8,
    pub cost: f32,
    pub danger: u64,
    pub chain_mask: u64,
    pub hero: HeroId,
    pub special: Option<SpecialAction>,
    /// Index of the node this one continues from, `-1` for the path target.
    pub parent_index: i32,
    /// Set when the special action cannot be performed yet.
    pub action_is_blocked: bool,
}

/// A path extracted from node storage for behaviors: who goes where, what
/// it costs and what it risks. Nodes are ordered target-first.
#[derive(Clone, Debug, Default)]
pub struct AiPath {
    pub nodes: Vec<AiPathNodeInfo>,
    pub target_hero: Option<HeroId>,
    pub hero_army: CreatureSet,
    pub army_loss: u64,
    pub target_object_danger: u64,
    pub target_object_army_loss: u64,
    pub chain_mask: u64,
    pub exchange_count: u32,
    /// Stat multiplier of the hero arriving at the target.
    pub hero_fighting_strength: f64,
    /// Army power of the arriving actor.
    pub hero_army_value: u64,
}

impl AiPath {
    /// Tile the acting hero must reach first.
    pub fn first_tile_to_get(&self) -> Option<Coord> {
        self.nodes.last().map(|n| n.coord)
    }

    pub fn target_tile(&self) -> Option<Coord> {
        self.target_node().map(|n| n.coord)
    }

    /// First node of the march: the last entry in target-first order.
    pub fn first_node(&self) -> Option<&AiPathNodeInfo> {
        self.nodes.last()
    }

    /// The node at the path's destination for the target hero.
    pub fn target_node(&self) -> Option<&AiPathNodeInfo> {
        let first = self.nodes.first()?;

        if self.target_hero == Some(first.hero) {
            Some(first)
        } else {
            self.nodes.get(1)
        }
    }

    pub fn path_danger(&self) -> u64 {
        self.target_node().map(|n| n.danger).unwrap_or(0)
    }

    pub fn movement_cost(&self) -> f32 {
        self.target_node().map(|n| n.cost).unwrap_or(0.0)
    }

    pub fn turn(&self) -> u8 {
        self.target_node().map(|n| n.turns).unwrap_or(0)
    }

    /// Effective strength of the arriving force.
    pub fn hero_strength(&self) -> u64 {
        (self.hero_army_value as f64 * self.hero_fighting_strength) as u64
    }

    pub fn total_danger(&self) -> u64 {
        self.path_danger().max(self.target_object_danger)
    }

    pub fn total_army_loss(&self) -> u64 {
        self.army_loss + self.target_object_army_loss
    }

    pub fn contains_hero(&self, hero: HeroId) -> bool {
        self.target_hero == Some(hero) || self.nodes.iter().any(|n| n.hero == hero)
    }

    /// The last special action on the march that cannot be performed yet.
    pub fn first_blocked_action(&self) -> Option<&SpecialAction> {
        self.nodes
            .iter()
            .rev()
            .find(|n| n.special.is_some() && n.action_is_blocked)
            .and_then(|n| n.special.as_ref())
    }
}
