use strategy_core::{GameEnv, HeroRole};

use crate::analyzers::ArmyManager;
use crate::behaviors::{usable_paths_to, Behavior};
use crate::engine::AiState;
use crate::goals::{EvaluationContext, ExecuteChain, Goal, HeroLockReason};

/// Day-one opening: send the strongest hero to the nearest own town to pick
/// up the garrison before anything else spends its movement.
pub struct StartupBehavior;

impl Behavior for StartupBehavior {
    fn name(&self) -> &'static str {
        "Startup"
    }

    fn goals(&self, ai: &AiState, env: GameEnv<'_>) -> Vec<Goal> {
        if env.world().date().day != 1 {
            return Vec::new();
        }

        let mut goals = Vec::new();

        for town in env.world().towns(ai.player) {
            if town.garrison.is_empty() {
                continue;
            }

            for (path, closest_way_ratio) in usable_paths_to(ai, env, town.position) {
                let Some(hero) = path.target_hero else {
                    continue;
                };

                if ai.heroes.role(hero) != HeroRole::Main || path.turn() > 0 {
                    continue;
                }

                let reinforcement = ArmyManager::how_many_reinforcements_can_get(
                    env,
                    &path.hero_army,
                    &town.garrison,
                );

                if reinforcement == 0 {
                    continue;
                }

                let context = EvaluationContext {
                    hero_strength: path.hero_strength(),
                    movement_cost: path.movement_cost(),
                    closest_way_ratio,
                    army_reward: reinforcement,
                    ..EvaluationContext::default()
                };

                goals.push(Goal::ExecuteChain(ExecuteChain {
                    hero,
                    target_object: None,
                    target_tile: town.position,
                    path,
                    lock: Some(HeroLockReason::Startup),
                    priority: None,
                    context,
                }));
            }
        }

        goals
    }
}
