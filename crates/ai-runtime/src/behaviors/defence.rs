use strategy_core::GameEnv;

use crate::behaviors::{usable_paths_to, Behavior};
use crate::config::AiConfig;
use crate::engine::AiState;
use crate::goals::{DefendTown, EvaluationContext, Goal};
use crate::pathfinding::threat;

/// Losing a town costs more than any single map reward, so garrison duty
/// carries a fixed priority at the top of the evaluator's output range
/// instead of competing through the fuzzy rules.
const GARRISON_PRIORITY: f32 = 5.0;

/// Stations a strong enough hero in any town the hit map says is exposed.
pub struct DefenceBehavior;

impl Behavior for DefenceBehavior {
    fn name(&self) -> &'static str {
        "Defence"
    }

    fn decomposition_depth(&self, config: &AiConfig) -> u32 {
        config.max_decomposition_depth
    }

    fn goals(&self, ai: &AiState, env: GameEnv<'_>) -> Vec<Goal> {
        let mut goals = Vec::new();

        for town in env.world().towns(ai.player) {
            let danger = ai.hitmap.danger_at(town.position);

            if danger == 0 {
                continue;
            }

            let mut defence = town.garrison.power(env.creatures());

            if let Some(visiting) = town.visiting_hero.and_then(|id| env.world().hero(id)) {
                defence += threat::hero_strength(env, &visiting);
            }

            if defence >= danger {
                continue;
            }

            for (path, closest_way_ratio) in usable_paths_to(ai, env, town.position) {
                let Some(hero) = path.target_hero else {
                    continue;
                };

                // A defender weaker than the attacker just feeds the siege.
                if path.hero_strength() < danger {
                    continue;
                }

                let context = EvaluationContext {
                    army_loss: path.total_army_loss(),
                    hero_strength: path.hero_strength(),
                    danger,
                    movement_cost: path.movement_cost(),
                    closest_way_ratio,
                    strategical_value: 1.0,
                    ..EvaluationContext::default()
                };

                goals.push(Goal::DefendTown(DefendTown {
                    hero,
                    town: town.id,
                    town_tile: town.position,
                    path,
                    priority: Some(GARRISON_PRIORITY),
                    context,
                }));
            }
        }

        goals
    }
}
