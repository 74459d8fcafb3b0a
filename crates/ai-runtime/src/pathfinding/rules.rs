//! Movement-after-destination rule: once a step lands on a tile, decide
//! whether it is free, needs a battle subnode, carries a quest gate, or is
//! simply blocked.

use strategy_core::{Coord, GameEnv, Layer, ObjectKind};

use crate::pathfinding::node::{NodeAction, SpecialAction};
use crate::pathfinding::storage::{AiNodeStorage, CandidateView, HeroChainPass};
use crate::pathfinding::threat;

/// A tentative step under evaluation. The rule may redirect `node` to a
/// battle subnode, veto the step, or attach a special action.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Destination {
    pub node: usize,
    pub coord: Coord,
    pub layer: Layer,
    pub action: NodeAction,
    pub turns: u8,
    pub move_remains: u32,
    pub cost: f32,
    pub blocked: bool,
    /// Losses added by a battle fought on this tile.
    pub extra_army_loss: u64,
    pub extra_danger: u64,
    pub special: Option<SpecialAction>,
    /// Forces the predecessor to become a path anchor (e.g. a pickup that
    /// clears the way).
    pub anchor_source: bool,
}

impl AiNodeStorage {
    /// Commits an approved step, folding in whatever the rule added: battle
    /// losses and danger, the special action, and forced anchoring.
    pub(crate) fn commit_destination(&mut self, src: usize, dest: &Destination) {
        self.commit(
            dest.node,
            src,
            dest.action,
            dest.turns,
            dest.move_remains,
            dest.cost,
        );

        let node = self.node_mut(dest.node);
        node.danger = node.danger.max(dest.extra_danger);
        node.army_loss += dest.extra_army_loss;
        node.special = dest.special;

        if dest.anchor_source {
            node.prev = Some(src);
        }
    }

    pub(crate) fn apply_after_destination_rule(
        &mut self,
        env: GameEnv<'_>,
        src: usize,
        dest: &mut Destination,
    ) {
        // During chain passes a step dominated by an existing chain is dead
        // weight; lock it so later relaxations skip it too.
        if self.pass() == HeroChainPass::Chain {
            let Some(actor) = self.node(src).actor else {
                dest.blocked = true;
                return;
            };
            let view = CandidateView {
                actor,
                coord: dest.coord,
                layer: dest.layer,
                cost: dest.cost,
                danger: self.node(src).danger,
                army_loss: self.node(src).army_loss,
            };

            if self.has_better_chain(&view, Some(dest.node)) {
                self.node_mut(dest.node).locked = true;
                dest.blocked = true;
                return;
            }
        }

        let object = env
            .map()
            .tile(dest.coord)
            .and_then(|t| t.object)
            .and_then(|id| env.world().object(id));

        // Leaving a tile with a pickup means the pickup happens first; keep
        // that node as a path anchor.
        let src_removable = env
            .map()
            .tile(self.node(src).coord)
            .and_then(|t| t.object)
            .and_then(|id| env.world().object(id))
            .map(|o| o.kind.is_removable())
            .unwrap_or(false);

        if src_removable {
            dest.anchor_source = true;
        }

        let danger = threat::tile_danger(env, dest.coord, self.player);

        if danger == 0 {
            if let Some(object) = &object {
                self.classify_peaceful_visit(env, object, dest);
            }
            return;
        }

        // Guards shared with the source tile were already bypassed when the
        // hero stepped there; only fresh guards force a battle.
        let src_coord = self.node(src).coord;
        let src_guards = env.map().guards_at(src_coord);
        let dst_guards = env.map().guards_at(dest.coord);
        let fresh_guards: Vec<_> = dst_guards
            .iter()
            .filter(|&g| !src_guards.contains(g))
            .collect();

        let Some(actor_id) = self.node(src).actor else {
            dest.blocked = true;
            return;
        };
        let actor = self.actors.get(actor_id);

        let guards_already_bypassed =
            !dst_guards.is_empty() && fresh_guards.is_empty() && !src_guards.is_empty();

        if guards_already_bypassed && actor.allow_battle {
            tracing::trace!(coord = %dest.coord, "bypassing already-fought guards");
            return;
        }

        self.bypass_with_battle(src, dest, danger);
    }

    /// Visit classification when nothing defends the tile.
    fn classify_peaceful_visit(
        &self,
        env: GameEnv<'_>,
        object: &strategy_core::MapObject,
        dest: &mut Destination,
    ) {
        match object.kind {
            ObjectKind::QuestGuard | ObjectKind::BorderGuard => {
                // The gate opens only for heroes satisfying the quest; the
                // path survives but reports the action as blocked.
                let hero = self
                    .node(dest.node)
                    .actor
                    .map(|a| self.actors.get(a))
                    .and_then(|a| a.hero)
                    .and_then(|id| env.world().hero(id));

                let satisfied = hero
                    .map(|h| env.world().quest_satisfied(object.id, &h))
                    .unwrap_or(false);

                if !satisfied {
                    dest.special = Some(SpecialAction::Quest { object: object.id });
                }
            }
            kind if kind.is_removable() => {
                // Pickups clear the tile, so the path may continue through.
            }
            kind if kind.blocks_visit() => {
                dest.action = NodeAction::BlockingVisit;
            }
            _ => {}
        }
    }

    /// Allocates a battle subnode under the actor's battle variant and
    /// commits to the fight when the expected losses leave an army.
    fn bypass_with_battle(&mut self, src: usize, dest: &mut Destination, danger: u64) {
        let Some(actor_id) = self.node(src).actor else {
            dest.blocked = true;
            return;
        };
        let battle_actor = self.actors.get(actor_id).battle_actor;

        let Some(battle_node) = self.get_or_create_node(dest.coord, dest.layer, battle_actor)
        else {
            tracing::trace!(coord = %dest.coord, "cannot allocate battle node");
            dest.blocked = true;
            return;
        };

        if self.node(battle_node).locked {
            dest.blocked = true;
            return;
        }

        let actor = self.actors.get(actor_id);
        let actual_army = actor.army_value.saturating_sub(self.node(src).army_loss);
        let loss = threat::evaluate_army_loss(actor.hero_fighting_strength, actual_army, danger);

        if loss >= actual_army {
            dest.blocked = true;
            return;
        }

        let teleporting = matches!(
            dest.action,
            NodeAction::TeleportNormal | NodeAction::TeleportBattle
        );

        dest.node = battle_node;
        dest.action = if teleporting {
            NodeAction::TeleportBattle
        } else {
            NodeAction::Battle
        };
        dest.extra_army_loss = loss;
        dest.extra_danger = danger;
        dest.special = Some(SpecialAction::Battle {
            position: dest.coord,
        });

        tracing::trace!(coord = %dest.coord, danger, loss, "battle bypass");
    }
}
