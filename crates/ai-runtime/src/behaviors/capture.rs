use strategy_core::GameEnv;

use crate::behaviors::{usable_paths_to, Behavior};
use crate::engine::AiState;
use crate::goals::{EvaluationContext, ExecuteChain, Goal};

/// Proposes visiting every capturable object each reachable hero can take.
pub struct CaptureObjectsBehavior;

impl Behavior for CaptureObjectsBehavior {
    fn name(&self) -> &'static str {
        "CaptureObjects"
    }

    fn goals(&self, ai: &AiState, env: GameEnv<'_>) -> Vec<Goal> {
        let mut goals = Vec::new();

        for cluster in ai.clusterizer.clusters() {
            for &object_id in &cluster.objects {
                let Some(object) = env.world().object(object_id) else {
                    continue;
                };

                // Our own objects grant nothing by revisiting.
                if object.owner == Some(ai.player) {
                    continue;
                }

                for (path, closest_way_ratio) in usable_paths_to(ai, env, object.position) {
                    let Some(hero) = path.target_hero else {
                        continue;
                    };

                    let context = EvaluationContext {
                        army_loss: path.total_army_loss(),
                        hero_strength: path.hero_strength(),
                        danger: path.total_danger(),
                        movement_cost: path.movement_cost(),
                        closest_way_ratio,
                        ..EvaluationContext::default()
                    };

                    goals.push(Goal::ExecuteChain(ExecuteChain {
                        hero,
                        target_object: Some(object_id),
                        target_tile: object.position,
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
