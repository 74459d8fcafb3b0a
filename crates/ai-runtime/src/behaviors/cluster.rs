use strategy_core::GameEnv;

use crate::behaviors::{usable_paths_to, Behavior};
use crate::config::AiConfig;
use crate::engine::AiState;
use crate::goals::{EvaluationContext, ExecuteChain, Goal};

/// Meta-behavior: bundles each multi-object cluster into one composition so
/// a single strong hero sweeps it instead of several heroes trickling in.
pub struct ClusterBehavior;

impl Behavior for ClusterBehavior {
    fn name(&self) -> &'static str {
        "Cluster"
    }

    fn decomposition_depth(&self, config: &AiConfig) -> u32 {
        config.max_decomposition_depth
    }

    fn goals(&self, ai: &AiState, env: GameEnv<'_>) -> Vec<Goal> {
        let mut goals = Vec::new();

        for cluster in ai.clusterizer.clusters() {
            if cluster.objects.len() < 2 {
                continue;
            }

            let mut subgoals = Vec::new();
            let mut consolidated = EvaluationContext::default();

            for &object_id in &cluster.objects {
                let Some(object) = env.world().object(object_id) else {
                    continue;
                };

                if object.owner == Some(ai.player) {
                    continue;
                }

                // Cheapest-per-hero path only; the cluster shares one visit.
                let best = usable_paths_to(ai, env, object.position)
                    .into_iter()
                    .max_by(|(a, _), (b, _)| {
                        b.movement_cost()
                            .total_cmp(&a.movement_cost())
                            .then(a.chain_mask.cmp(&b.chain_mask))
                    });

                let Some((path, closest_way_ratio)) = best else {
                    continue;
                };

                let Some(hero) = path.target_hero else {
                    continue;
                };

                consolidated.army_loss += path.total_army_loss();
                consolidated.danger = consolidated.danger.max(path.total_danger());
                consolidated.movement_cost += path.movement_cost();
                consolidated.hero_strength = consolidated.hero_strength.max(path.hero_strength());

                subgoals.push(Goal::ExecuteChain(ExecuteChain {
                    hero,
                    target_object: Some(object_id),
                    target_tile: object.position,
                    context: EvaluationContext {
                        army_loss: path.total_army_loss(),
                        hero_strength: path.hero_strength(),
                        danger: path.total_danger(),
                        movement_cost: path.movement_cost(),
                        closest_way_ratio,
                        ..EvaluationContext::default()
                    },
                    path,
                    lock: None,
                    priority: None,
                }));
            }

            if subgoals.len() > 1 {
                goals.push(Goal::Composition {
                    subgoals,
                    context: consolidated,
                });
            }
        }

        goals
    }
}
