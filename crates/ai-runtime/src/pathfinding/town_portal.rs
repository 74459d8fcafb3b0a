//! Town-portal node synthesis: before each search run, heroes that can cast
//! the spell get synthetic teleport nodes at friendly towns.

use std::collections::{HashMap, HashSet};

use strategy_core::{
    GameConstants, HeroId, GameEnv, Layer, SecondarySkill, SkillLevel, SpellId, Town,
};

use crate::pathfinding::actor::ActorId;
use crate::pathfinding::node::{NodeAction, SpecialAction};
use crate::pathfinding::storage::AiNodeStorage;

const TOWN_PORTAL_MANA_COST: u32 = 16;

impl AiNodeStorage {
    /// Appends town-portal destination nodes for every seed actor whose
    /// hero can cast the spell and pay for it.
    pub(crate) fn calculate_town_portal_teleportations(
        &mut self,
        env: GameEnv<'_>,
        seeds: &mut Vec<usize>,
    ) {
        let seed_actors: HashSet<ActorId> = seeds
            .iter()
            .filter_map(|&idx| self.node(idx).actor)
            .map(|a| self.actors.get(a).base_actor)
            .collect();

        let mut hero_masks: HashMap<HeroId, u64> = HashMap::new();

        for id in self.actors.base_actors() {
            let actor = self.actors.get(id);

            if let Some(hero) = actor.hero {
                if actor.actor_exchange_count == 1 {
                    hero_masks.entry(hero).or_insert(actor.chain_mask);
                }
            }
        }

        let towns = env.world().towns(self.player);

        if towns.is_empty() {
            return;
        }

        let mut seed_actors: Vec<ActorId> = seed_actors.into_iter().collect();
        seed_actors.sort_unstable();

        for actor_id in seed_actors {
            let actor = self.actors.get(actor_id);

            let Some(hero_id) = actor.hero else {
                continue;
            };

            let Some(hero) = env.world().hero(hero_id) else {
                continue;
            };

            if !hero.knows_spell(SpellId::TOWN_PORTAL) || hero.mana < TOWN_PORTAL_MANA_COST {
                continue;
            }

            let skill = hero.skill_level(SecondarySkill::EarthMagic);
            let movement_needed = GameConstants::BASE_MOVEMENT_COST
                * if skill >= SkillLevel::Expert { 2 } else { 3 };
            let actor_mask = actor.chain_mask;
            let cast_actor = actor.cast_actor;

            for town in &towns {
                // A foreign visiting hero occupies the gate unless it is
                // already part of this chain.
                if let Some(visiting) = town.visiting_hero {
                    if visiting != hero_id {
                        let basic_mask = hero_masks.get(&visiting).copied().unwrap_or(0);
                        let hero_in_chain = actor_mask & basic_mask != 0;
                        let same_actor = actor_mask == basic_mask;

                        if same_actor || !hero_in_chain {
                            continue;
                        }
                    }
                }

                let Some(best) =
                    self.best_source_node(seeds, actor_id, skill, movement_needed, town, &towns)
                else {
                    continue;
                };

                let Some(idx) = self.get_or_create_node(town.position, Layer::Land, cast_actor)
                else {
                    continue;
                };

                let source = self.node(best);
                let max_move = self
                    .actors
                    .get(cast_actor)
                    .max_move_points(Layer::Land)
                    .max(1);
                let movement_cost = movement_needed as f32 / max_move as f32 + source.cost;
                let (turns, move_remains) =
                    (source.turns, source.move_remains.saturating_sub(movement_needed));

                let node = self.node(idx);

                if node.is_reached() && node.cost <= movement_cost {
                    continue;
                }

                self.commit(idx, best, NodeAction::TeleportNormal, turns, move_remains, movement_cost);

                let node = self.node_mut(idx);
                node.prev = Some(best);
                node.special = Some(SpecialAction::TownPortal { town: town.id });
                node.mana_cost += TOWN_PORTAL_MANA_COST;

                tracing::trace!(town = town.id.0, "adding town portal node");

                seeds.push(idx);
            }
        }
    }

    /// Cheapest seed node of this actor that can pay the casting movement.
    /// Below expert mastery the spell only reaches the closest town, so
    /// other targets reject the node.
    fn best_source_node(
        &self,
        seeds: &[usize],
        base_actor: ActorId,
        skill: SkillLevel,
        movement_needed: u32,
        target: &Town,
        all_towns: &[Town],
    ) -> Option<usize> {
        let mut best: Option<usize> = None;

        for &idx in seeds {
            let node = self.node(idx);

            let Some(actor) = node.actor else {
                continue;
            };

            if self.actors.get(actor).base_actor != base_actor
                || node.layer != Layer::Land
                || node.move_remains < movement_needed
            {
                continue;
            }

            if skill < SkillLevel::Expert {
                let nearest = all_towns
                    .iter()
                    .min_by_key(|t| (node.coord.dist2d_sq(t.position), t.id))
                    .map(|t| t.id);

                if nearest != Some(target.id) {
                    continue;
                }
            }

            if best.map(|b| self.node(b).cost > node.cost).unwrap_or(true) {
                best = Some(idx);
            }
        }

        best
    }
}
