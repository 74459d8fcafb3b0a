use strategy_core::{Coord, Layer, ObjectId};

use crate::pathfinding::actor::ActorId;

/// What a hero can do with a tile, after fog of war is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Accessibility {
    /// Rock, out of bounds or hidden by fog.
    NotSet,
    Accessible,
    /// An object is visited from an adjacent tile.
    Visitable,
    /// An object that is visited by entering its tile and stops movement.
    BlockVis,
    Blocked,
}

/// How a committed node is entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeAction {
    Unknown,
    Normal,
    Battle,
    TeleportNormal,
    TeleportBattle,
    TeleportBlockingVisit,
    BlockingVisit,
}

/// Extra step a path must perform at a node before continuing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpecialAction {
    /// Fight the guards covering this tile.
    Battle { position: Coord },
    /// Cast town portal to arrive at the town.
    TownPortal { town: ObjectId },
    /// A quest gate the hero does not currently satisfy; the node is
    /// reported as blocked until the quest completes.
    Quest { object: ObjectId },
}

impl SpecialAction {
    /// Whether the hero can actually perform the action right now.
    pub fn can_act(&self) -> bool {
        !matches!(self, SpecialAction::Quest { .. })
    }
}

/// One search node: the state of one actor at one (tile, layer).
#[derive(Clone, Debug)]
pub struct AiPathNode {
    pub coord: Coord,
    pub layer: Layer,
    pub accessibility: Accessibility,
    pub actor: Option<ActorId>,
    pub action: NodeAction,
    /// `u8::MAX` until the node is reached.
    pub turns: u8,
    pub move_remains: u32,
    /// Turn units: integer part = turns elapsed, fraction = movement used.
    pub cost: f32,
    pub danger: u64,
    pub army_loss: u64,
    pub mana_cost: u32,
    pub special: Option<SpecialAction>,
    /// The other parent's node when this node seals an exchange.
    pub chain_other: Option<usize>,
    /// Previous anchor node (exchange or special-action site) on the path.
    pub prev: Option<usize>,
    pub locked: bool,
}

impl AiPathNode {
    pub fn unreachable(coord: Coord, layer: Layer) -> Self {
        Self {
            coord,
            layer,
            accessibility: Accessibility::NotSet,
            actor: None,
            action: NodeAction::Unknown,
            turns: u8::MAX,
            move_remains: 0,
            cost: f32::MAX,
            danger: 0,
            army_loss: 0,
            mana_cost: 0,
            special: None,
            chain_other: None,
            prev: None,
            locked: false,
        }
    }

    /// Clears per-turn state, keeping only position and accessibility.
    pub fn reset(&mut self, accessibility: Accessibility) {
        let coord = self.coord;
        let layer = self.layer;

        *self = Self::unreachable(coord, layer);
        self.accessibility = accessibility;
    }

    pub fn is_reached(&self) -> bool {
        self.action != NodeAction::Unknown
    }
}
