use strategy_core::{GameEnv, Resources};

use crate::analyzers::ArmyManager;
use crate::behaviors::Behavior;
use crate::engine::AiState;
use crate::goals::{BuyArmy, EvaluationContext, Goal};

/// Proposes purchasing the best affordable creatures where a hero is
/// standing by to take them.
pub struct BuyArmyBehavior;

impl Behavior for BuyArmyBehavior {
    fn name(&self) -> &'static str {
        "BuyArmy"
    }

    fn goals(&self, ai: &AiState, env: GameEnv<'_>) -> Vec<Goal> {
        let mut goals = Vec::new();
        let heroes = env.world().heroes(ai.player);
        let free = ai.free_resources(env);

        for dwelling in env.world().dwellings(ai.player) {
            // Someone must be on site to receive the troops.
            let Some(hero) = heroes.iter().find(|h| h.position == dwelling.position) else {
                continue;
            };

            if ai.is_hero_locked(hero.id) {
                continue;
            }

            let purchases = ArmyManager::get_army_available_to_buy(env, &hero.army, &dwelling, free);

            if purchases.is_empty() {
                continue;
            }

            let total_cost = purchases
                .iter()
                .fold(Resources::ZERO, |acc, p| acc + p.cost);
            let total_value: u64 = purchases.iter().map(|p| p.ai_value).sum();

            goals.push(Goal::BuyArmy(BuyArmy {
                dwelling: dwelling.id,
                hero: hero.id,
                purchases,
                resources_locked: total_cost,
                priority: None,
                context: EvaluationContext {
                    army_reward: total_value,
                    ..EvaluationContext::default()
                },
            }));
        }

        goals
    }
}
