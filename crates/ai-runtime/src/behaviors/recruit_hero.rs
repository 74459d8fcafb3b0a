use strategy_core::{GameConstants, GameEnv, ResourceKind};

use crate::behaviors::Behavior;
use crate::engine::AiState;
use crate::goals::{EvaluationContext, Goal, RecruitHero};

/// Hires a hero in towns without one when the roster is thin and the purse
/// allows it.
pub struct RecruitHeroBehavior;

impl Behavior for RecruitHeroBehavior {
    fn name(&self) -> &'static str {
        "RecruitHero"
    }

    fn goals(&self, ai: &AiState, env: GameEnv<'_>) -> Vec<Goal> {
        let towns = env.world().towns(ai.player);
        let hero_count = env.world().heroes(ai.player).len();

        // Enough hands already.
        if hero_count >= towns.len().max(3) {
            return Vec::new();
        }

        let free = ai.free_resources(env);

        if free[ResourceKind::Gold] < i64::from(GameConstants::HERO_GOLD_COST) {
            return Vec::new();
        }

        towns
            .into_iter()
            .filter(|town| town.visiting_hero.is_none())
            .map(|town| {
                Goal::RecruitHero(RecruitHero {
                    town: town.id,
                    priority: None,
                    context: EvaluationContext::default(),
                })
            })
            .collect()
    }
}
