use std::sync::Mutex;

use fuzzy_logic::Engine;
use strategy_core::GameEnv;

use crate::analyzers::{DangerHitMap, HeroManager};
use crate::engine::rewards;
use crate::goals::Goal;

/// Priority returned for goals without an acting hero (builds, hires): they
/// are always worth doing when nothing else competes.
const HEROLESS_PRIORITY: f32 = 2.0;

/// Maps a goal to a priority through the fuzzy rule base.
pub struct PriorityEvaluator {
    engine: Engine,
}

impl PriorityEvaluator {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    pub fn evaluate(
        &mut self,
        env: GameEnv<'_>,
        player: strategy_core::PlayerId,
        heroes: &HeroManager,
        hitmap: &DangerHitMap,
        goal: &Goal,
    ) -> f32 {
        // A positive priority fixed by the behavior is already the answer.
        if let Some(preset) = goal.preset_priority() {
            if preset > 0.0 {
                return preset;
            }
        }

        let context = goal.context();

        let Some(hero_id) = goal.hero() else {
            return HEROLESS_PRIORITY;
        };

        let Some(hero) = env.world().hero(hero_id) else {
            return HEROLESS_PRIORITY;
        };

        let role = heroes.role(hero_id);
        let target = goal.target_object().and_then(|id| env.world().object(id));

        // Dwelling purchases only count when no battle will drain the purse.
        let check_gold = context.danger == 0;

        let (gold, army, skill, strategical) = match &target {
            Some(object) => (
                rewards::gold_reward(env, player, object),
                rewards::army_reward(env, player, object, check_gold),
                rewards::skill_reward(env, player, object, &hero, role, heroes),
                rewards::strategic_value(env, player, object, hitmap),
            ),
            None => (
                context.gold_reward,
                context.army_reward,
                context.skill_reward,
                context.strategical_value,
            ),
        };

        let army_loss_ratio = context.army_loss as f64 / context.hero_strength.max(1) as f64;
        let reward_type = [
            gold > 0,
            army > 0,
            skill > 0.0,
            strategical > 0.0,
        ]
        .iter()
        .filter(|&&b| b)
        .count();

        let inputs = [
            ("armyLoss", army_loss_ratio),
            ("heroRole", if role == strategy_core::HeroRole::Main { 0.0 } else { 1.0 }),
            ("danger", context.danger as f64),
            ("turnDistance", f64::from(context.movement_cost)),
            ("goldReward", gold as f64),
            ("armyReward", army as f64),
            ("skillReward", f64::from(skill)),
            ("strategicalValue", f64::from(strategical)),
            ("rewardType", reward_type as f64),
            ("closestHeroRatio", f64::from(context.closest_way_ratio)),
        ];

        for (name, value) in inputs {
            if let Err(error) = self.engine.set_input(name, value) {
                tracing::error!(%error, "priority evaluation failed");
                return 0.0;
            }
        }

        self.engine.process();

        match self.engine.output("Value") {
            Ok(value) => {
                let result = value as f32;

                tracing::trace!(
                    goal = %goal.description(),
                    army_loss_ratio,
                    gold,
                    army,
                    skill,
                    strategical,
                    result,
                    "evaluated goal"
                );

                result
            }
            Err(error) => {
                tracing::error!(%error, "priority evaluation failed");
                0.0
            }
        }
    }
}

/// Shared pool of evaluators: engines are borrowed per evaluation batch so
/// future parallel scoring needs no extra locking inside the engine.
pub struct EvaluatorPool {
    template: Engine,
    pool: Mutex<Vec<Engine>>,
}

impl EvaluatorPool {
    pub fn new(template: Engine) -> Self {
        Self {
            template,
            pool: Mutex::new(Vec::new()),
        }
    }

    pub fn borrow(&self) -> PooledEvaluator<'_> {
        let engine = self
            .pool
            .lock()
            .ok()
            .and_then(|mut pool| pool.pop())
            .unwrap_or_else(|| self.template.clone());

        PooledEvaluator {
            pool: self,
            evaluator: Some(PriorityEvaluator::new(engine)),
        }
    }

    fn give_back(&self, engine: Engine) {
        if let Ok(mut pool) = self.pool.lock() {
            pool.push(engine);
        }
    }
}

/// Borrow guard; returns the engine to the pool on drop.
pub struct PooledEvaluator<'a> {
    pool: &'a EvaluatorPool,
    evaluator: Option<PriorityEvaluator>,
}

impl PooledEvaluator<'_> {
    pub fn get(&mut self) -> &mut PriorityEvaluator {
        self.evaluator.as_mut().expect("evaluator taken")
    }
}

impl Drop for PooledEvaluator<'_> {
    fn drop(&mut self) {
        if let Some(evaluator) = self.evaluator.take() {
            self.pool.give_back(evaluator.engine);
        }
    }
}
