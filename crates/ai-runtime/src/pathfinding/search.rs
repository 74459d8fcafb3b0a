//! Best-first search host.
//!
//! A deterministic Dijkstra-style loop over the node storage: cheapest cost
//! first, stale heap entries skipped, ties broken by insertion order. The
//! storage provides neighbour enumeration and the after-destination rule
//! decides what each step means.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use strategy_core::{Coord, GameConstants, GameEnv, ObjectKind};

use crate::pathfinding::node::{Accessibility, NodeAction};
use crate::pathfinding::rules::Destination;
use crate::pathfinding::storage::AiNodeStorage;

#[derive(Debug)]
struct OpenNode {
    cost: f32,
    tie: u64,
    node: usize,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.tie == other.tie && self.node == other.node
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.tie.cmp(&self.tie))
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Expands the given seed nodes until the frontier is exhausted.
pub(crate) fn run(storage: &mut AiNodeStorage, env: GameEnv<'_>, initial: Vec<usize>) {
    let mut open = BinaryHeap::new();
    let mut tie: u64 = 0;

    for idx in initial {
        let node = storage.node(idx);

        if !node.locked && node.is_reached() {
            open.push(OpenNode {
                cost: node.cost,
                tie,
                node: idx,
            });
            tie += 1;
        }
    }

    while let Some(entry) = open.pop() {
        let node = storage.node(entry.node);

        // Stale heap entry: the node changed since it was queued.
        if node.locked || node.cost != entry.cost {
            continue;
        }

        expand(storage, env, entry.node, &mut open, &mut tie);
    }
}

fn expand(
    storage: &mut AiNodeStorage,
    env: GameEnv<'_>,
    src: usize,
    open: &mut BinaryHeap<OpenNode>,
    tie: &mut u64,
) {
    let (src_coord, src_layer, src_turns, src_remains) = {
        let node = storage.node(src);
        (node.coord, node.layer, node.turns, node.move_remains)
    };

    let Some(actor_id) = storage.node(src).actor else {
        return;
    };

    let max_move = storage.actors.get(actor_id).max_move_points(src_layer).max(1);

    let mut steps: Vec<(Coord, u32)> = Vec::with_capacity(16);

    for neighbour in env.map().neighbours(src_coord) {
        if let Some(info) = env.map().tile(neighbour) {
            steps.push((neighbour, info.move_cost));
        }
    }

    let on_teleporter = env
        .map()
        .tile(src_coord)
        .and_then(|t| t.object)
        .and_then(|id| env.world().object(id))
        .map(|o| o.kind == ObjectKind::Teleporter)
        .unwrap_or(false);

    let first_teleport_step = steps.len();

    if on_teleporter {
        for exit in env.map().teleport_exits(src_coord) {
            steps.push((exit, GameConstants::BASE_MOVEMENT_COST));
        }
    }

    for (step_index, (coord, move_cost)) in steps.into_iter().enumerate() {
        let is_teleport = step_index >= first_teleport_step;

        if move_cost > max_move {
            continue;
        }

        let Some(dst_idx) = storage.get_or_create_node(coord, src_layer, actor_id) else {
            continue;
        };

        let dst = storage.node(dst_idx);

        if dst.locked
            || matches!(
                dst.accessibility,
                Accessibility::NotSet | Accessibility::Blocked
            )
        {
            continue;
        }

        let (turns, move_remains) = if src_remains >= move_cost {
            (src_turns, src_remains - move_cost)
        } else {
            (src_turns.saturating_add(1), max_move - move_cost)
        };

        let cost = f32::from(turns) + (max_move - move_remains) as f32 / max_move as f32;

        if dst.is_reached() && cost >= dst.cost {
            continue;
        }

        let mut dest = Destination {
            node: dst_idx,
            coord,
            layer: src_layer,
            action: if is_teleport {
                NodeAction::TeleportNormal
            } else {
                NodeAction::Normal
            },
            turns,
            move_remains,
            cost,
            blocked: false,
            extra_army_loss: 0,
            extra_danger: 0,
            special: None,
            anchor_source: false,
        };

        storage.apply_after_destination_rule(env, src, &mut dest);

        if dest.blocked || storage.is_distance_limit_reached(actor_id, dest.turns) {
            continue;
        }

        // The rule may have redirected the step onto a battle subnode;
        // re-check that the final target actually improves.
        let target = storage.node(dest.node);

        if target.locked || (target.is_reached() && dest.cost >= target.cost) {
            continue;
        }

        storage.commit_destination(src, &dest);

        let stops_here = matches!(
            dest.action,
            NodeAction::BlockingVisit | NodeAction::TeleportBlockingVisit
        );

        if !stops_here {
            open.push(OpenNode {
                cost: dest.cost,
                tie: *tie,
                node: dest.node,
            });
            *tie += 1;
        }
    }
}
