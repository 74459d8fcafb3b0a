use strategy_core::{GameEnv, HeroRole};

use crate::analyzers::ArmyManager;
use crate::behaviors::{usable_paths_to, Behavior};
use crate::config::AiConfig;
use crate::engine::AiState;
use crate::goals::{EvaluationContext, ExecuteChain, Goal};

/// Routes weaker heroes toward the main heroes to concentrate force, and
/// main heroes toward dwellings with worthwhile stock.
pub struct GatherArmyBehavior;

impl Behavior for GatherArmyBehavior {
    fn name(&self) -> &'static str {
        "GatherArmy"
    }

    fn decomposition_depth(&self, config: &AiConfig) -> u32 {
        config.max_decomposition_depth
    }

    fn goals(&self, ai: &AiState, env: GameEnv<'_>) -> Vec<Goal> {
        let mut goals = Vec::new();

        for hero in env.world().heroes(ai.player) {
            if ai.heroes.role(hero.id) != HeroRole::Main || ai.is_hero_locked(hero.id) {
                continue;
            }

            // Chains that deliver someone else's army to this hero.
            for (path, closest_way_ratio) in usable_paths_to(ai, env, hero.position) {
                if path.target_hero == Some(hero.id) && path.exchange_count <= 1 {
                    continue;
                }

                let reinforcement =
                    ArmyManager::how_many_reinforcements_can_get(env, &hero.army, &path.hero_army);

                if reinforcement == 0 {
                    continue;
                }

                let Some(path_hero) = path.target_hero else {
                    continue;
                };

                let context = EvaluationContext {
                    army_loss: path.total_army_loss(),
                    hero_strength: path.hero_strength(),
                    danger: path.total_danger(),
                    movement_cost: path.movement_cost(),
                    closest_way_ratio,
                    army_reward: reinforcement,
                    ..EvaluationContext::default()
                };

                goals.push(Goal::ExecuteChain(ExecuteChain {
                    hero: path_hero,
                    target_object: None,
                    target_tile: hero.position,
                    path,
                    lock: None,
                    priority: None,
                    context,
                }));
            }

            // March to dwellings whose stock this hero could buy out.
            for dwelling in env.world().dwellings(ai.player) {
                let value = ArmyManager::how_many_reinforcements_can_buy(
                    env,
                    &hero.army,
                    &dwelling,
                    ai.free_resources(env),
                );

                if value == 0 {
                    continue;
                }

                for (path, closest_way_ratio) in usable_paths_to(ai, env, dwelling.position) {
                    if path.target_hero != Some(hero.id) {
                        continue;
                    }

                    let context = EvaluationContext {
                        army_loss: path.total_army_loss(),
                        hero_strength: path.hero_strength(),
                        danger: path.total_danger(),
                        movement_cost: path.movement_cost(),
                        closest_way_ratio,
                        army_reward: value,
                        ..EvaluationContext::default()
                    };

                    goals.push(Goal::ExecuteChain(ExecuteChain {
                        hero: hero.id,
                        target_object: Some(dwelling.id),
                        target_tile: dwelling.position,
                        path,
                        lock: None,
                        priority: None,
                        context,
                    }));
                }
            }
        }

        goals
    }
}
