use strategy_core::{GameEnv, ResourceKind};

use crate::analyzers::BuildAnalyzer;
use crate::behaviors::Behavior;
use crate::engine::AiState;
use crate::goals::{Build, EvaluationContext, Goal};

/// Proposes the best next building per town, holding non-income builds back
/// while gold is tight.
pub struct BuildingBehavior;

impl Behavior for BuildingBehavior {
    fn name(&self) -> &'static str {
        "Building"
    }

    fn goals(&self, ai: &AiState, env: GameEnv<'_>) -> Vec<Goal> {
        let free = ai.free_resources(env);
        let gold_pressure = ai.build.gold_pressure();

        tracing::trace!(gold_pressure, "considering buildings");

        let mut goals = Vec::new();

        for development in ai.build.developments() {
            for building in &development.to_build {
                let income_building = building.daily_income[ResourceKind::Gold] > 0;

                if gold_pressure >= BuildAnalyzer::MAX_GOLD_PRESSURE && !income_building {
                    continue;
                }

                if !free.can_afford(&building.cost) {
                    continue;
                }

                goals.push(Goal::Build(Build {
                    town: development.town,
                    building: building.id,
                    resources_locked: building.cost,
                    priority: None,
                    context: EvaluationContext::default(),
                }));

                // One candidate per town per pass.
                break;
            }
        }

        goals
    }
}
