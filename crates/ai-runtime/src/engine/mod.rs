//! The outer turn controller: rebuilds analyzers, asks each behavior for
//! its best task, executes the winner and repeats until nothing on the map
//! is worth the movement points.

mod decomposer;
mod evaluator;
mod rewards;

pub use decomposer::Decomposer;
pub use evaluator::{EvaluatorPool, PooledEvaluator, PriorityEvaluator};

use std::collections::HashMap;

use strategy_core::{ActionSink, GameEnv, HeroId, HeroRole, PlayerId, Resources, TaskError};

use crate::analyzers::{ArmyManager, BuildAnalyzer, DangerHitMap, HeroManager, ObjectClusterizer};
use crate::behaviors::{self, Behavior};
use crate::config::{AiConfig, ScanDepth};
use crate::error::{Result, RuntimeError};
use crate::goals::{HeroLockReason, Task};
use crate::interrupt::Interrupt;
use crate::pathfinding::{AiPath, AiPathfinder, PathfinderSettings};

/// Everything the behaviors read: analyzers, paths, locks and reservations.
/// Rebuilt in-place at the start of every decision pass.
pub struct AiState {
    pub player: PlayerId,
    pub config: AiConfig,
    pub pathfinder: AiPathfinder,
    pub army: ArmyManager,
    pub heroes: HeroManager,
    pub hitmap: DangerHitMap,
    pub clusterizer: ObjectClusterizer,
    pub build: BuildAnalyzer,
    pub locked_heroes: HashMap<HeroId, HeroLockReason>,
    pub locked_resources: Resources,
    pub scan_depth: ScanDepth,
}

impl AiState {
    pub fn hero_lock_reason(&self, hero: HeroId) -> Option<HeroLockReason> {
        self.locked_heroes.get(&hero).copied()
    }

    pub fn is_hero_locked(&self, hero: HeroId) -> bool {
        self.hero_lock_reason(hero).is_some()
    }

    /// A path is unusable when its target hero is reserved for the opening
    /// or any hero on it is locked.
    pub fn are_path_heroes_locked(&self, path: &AiPath) -> bool {
        if let Some(target) = path.target_hero {
            if self.hero_lock_reason(target) == Some(HeroLockReason::Startup) {
                return true;
            }
        }

        path.nodes.iter().any(|node| self.is_hero_locked(node.hero))
    }

    /// Current resources minus soft reservations, clamped non-negative.
    pub fn free_resources(&self, env: GameEnv<'_>) -> Resources {
        (env.world().resources(self.player) - self.locked_resources).positive()
    }

    pub fn lock_resources(&mut self, resources: Resources) {
        self.locked_resources += resources;
    }
}

pub struct TurnEngine {
    state: AiState,
    behaviors: Vec<Box<dyn Behavior>>,
    evaluators: EvaluatorPool,
    decomposer: Decomposer,
    interrupt: Interrupt,
}

impl TurnEngine {
    /// Builds an engine for one player. Fails fast when the priority rule
    /// file is missing or malformed: without it no goal can be scored.
    pub fn new(config: AiConfig, player: PlayerId, interrupt: Interrupt) -> Result<Self> {
        let rules = std::fs::read_to_string(&config.priorities_path).map_err(|source| {
            RuntimeError::ConfigMissing {
                path: config.priorities_path.clone(),
                source,
            }
        })?;

        Self::from_rules(config, player, interrupt, &rules)
    }

    /// Engine construction from in-memory rules; the file-less seam used by
    /// tests and embedders.
    pub fn from_rules(
        config: AiConfig,
        player: PlayerId,
        interrupt: Interrupt,
        rules: &str,
    ) -> Result<Self> {
        let engine = fuzzy_logic::Engine::from_rules(rules)?;
        let num_chains = config.num_chains;

        Ok(Self {
            state: AiState {
                player,
                config,
                pathfinder: AiPathfinder::new(num_chains),
                army: ArmyManager::new(),
                heroes: HeroManager::new(),
                hitmap: DangerHitMap::new(),
                clusterizer: ObjectClusterizer::new(),
                build: BuildAnalyzer::new(),
                locked_heroes: HashMap::new(),
                locked_resources: Resources::ZERO,
                scan_depth: ScanDepth::Small,
            },
            behaviors: behaviors::default_behaviors(),
            evaluators: EvaluatorPool::new(engine),
            decomposer: Decomposer::new(),
            interrupt,
        })
    }

    pub fn state(&self) -> &AiState {
        &self.state
    }

    pub fn interrupt_handle(&self) -> Interrupt {
        self.interrupt.clone()
    }

    /// Plays out one full turn against the game engine. The interrupt
    /// handle is not re-armed here; that is the host's call to make.
    pub fn make_turn(&mut self, env: GameEnv<'_>, sink: &mut dyn ActionSink) -> Result<()> {
        self.reset_ai_state();

        for pass in 1..=self.state.config.max_pass {
            if self.update_ai_state(env, pass).is_err() {
                return Err(RuntimeError::Interrupted);
            }

            let mut best = Task::invalid();

            for index in 0..self.behaviors.len() {
                let task = match self.choose_best_task(env, index) {
                    Ok(task) => task,
                    Err(_) => return Err(RuntimeError::Interrupted),
                };

                if task.priority > best.priority {
                    best = task;
                }
            }

            if best.is_invalid() {
                tracing::debug!("no behavior produced a task, ending turn");
                return Ok(());
            }

            // Low-value results may mean the horizon was too short; widen
            // the scan before giving up.
            if best.priority < self.state.config.next_scan_min_priority
                && self.state.scan_depth != ScanDepth::Full
            {
                let role = best
                    .hero()
                    .map(|h| self.state.heroes.role(h))
                    .unwrap_or(HeroRole::Main);

                if role == HeroRole::Main || best.priority < self.state.config.min_priority {
                    tracing::trace!(
                        task = %best.goal.description(),
                        priority = best.priority,
                        "priority too low, increasing scan depth"
                    );
                    self.state.scan_depth = self.state.scan_depth.widen();
                    continue;
                }
            }

            if best.priority < self.state.config.min_priority {
                tracing::trace!(
                    task = %best.goal.description(),
                    priority = best.priority,
                    "not worth doing, ending turn"
                );
                return Ok(());
            }

            if self.interrupt.is_triggered() {
                return Err(RuntimeError::Interrupted);
            }

            tracing::debug!(
                task = %best.goal.description(),
                priority = best.priority,
                "trying to realize task"
            );

            match best.accept(sink) {
                Ok(()) => {
                    self.state.lock_resources(best.resources_locked());

                    if let Some((hero, reason)) = best.hero_lock() {
                        self.state.locked_heroes.insert(hero, reason);
                    }
                }
                Err(TaskError::GoalFulfilled) => {
                    tracing::trace!(task = %best.goal.description(), "task already fulfilled");
                }
                Err(TaskError::Interrupted) => return Err(RuntimeError::Interrupted),
                Err(TaskError::Execution(reason)) => {
                    tracing::debug!(
                        task = %best.goal.description(),
                        reason,
                        "failed to realize task, ending turn"
                    );
                    return Ok(());
                }
            }
        }

        Ok(())
    }

    fn reset_ai_state(&mut self) {
        self.state.locked_resources = Resources::ZERO;
        self.state.scan_depth = ScanDepth::Small;
        // Defence locks persist for the hero's lifetime; the rest clear.
        self.state
            .locked_heroes
            .retain(|_, reason| *reason == HeroLockReason::Defence);
        self.state.hitmap.reset();
    }

    fn update_ai_state(&mut self, env: GameEnv<'_>, pass: u32) -> std::result::Result<(), TaskError> {
        self.interrupt.check()?;

        tracing::debug!(pass, "updating AI state");

        self.state.hitmap.update_hit_map(env, self.state.player);
        self.state.heroes.update(env, self.state.player);

        self.interrupt.check()?;

        let active_heroes: Vec<_> = env
            .world()
            .heroes(self.state.player)
            .into_iter()
            .filter(|h| self.state.hero_lock_reason(h.id) != Some(HeroLockReason::Defence))
            .map(|h| {
                let role = self.state.heroes.role(h.id);
                (h, role)
            })
            .collect();

        let settings = PathfinderSettings {
            use_hero_chain: true,
            scout_turn_distance_limit: self.state.config.scout_turn_distance_limit,
            main_turn_distance_limit: match self.state.scan_depth {
                ScanDepth::Full => None,
                depth => Some(
                    self.state
                        .config
                        .main_turn_distance_limit
                        .saturating_mul(depth.multiplier()),
                ),
            },
            hero_chain_max_turns: self.state.config.hero_chain_max_turns,
        };

        self.state.pathfinder.storage_mut().set_player(self.state.player);
        self.state.pathfinder.update_paths(env, &active_heroes, settings);

        self.state.army.update(env, self.state.player);
        self.state.clusterizer.clusterize(env, self.state.player);
        self.state.build.update(env, self.state.player);
        self.decomposer.reset();

        Ok(())
    }

    /// Decomposes one behavior, scores its elementary goals and returns the
    /// best as a task (`Task::invalid()` when the behavior is idle).
    fn choose_best_task(
        &mut self,
        env: GameEnv<'_>,
        behavior_index: usize,
    ) -> std::result::Result<Task, TaskError> {
        self.interrupt.check()?;

        let behavior = &self.behaviors[behavior_index];

        tracing::debug!(behavior = behavior.name(), "checking behavior");

        let goals = behavior.goals(&self.state, env);
        let depth = behavior.decomposition_depth(&self.state.config);
        let elementary = self.decomposer.decompose(&self.interrupt, goals, depth)?;

        if elementary.is_empty() {
            tracing::debug!(behavior = behavior.name(), "behavior found no tasks");
            return Ok(Task::invalid());
        }

        let mut evaluator = self.evaluators.borrow();
        let mut best = Task::invalid();

        for goal in elementary {
            let mut task = Task::new(goal);
            task.priority = match task.goal.preset_priority() {
                Some(preset) => preset,
                None => evaluator.get().evaluate(
                    env,
                    self.state.player,
                    &self.state.heroes,
                    &self.state.hitmap,
                    &task.goal,
                ),
            };

            if task.priority > best.priority {
                best = task;
            }
        }

        tracing::debug!(
            behavior = behavior.name(),
            task = %best.goal.description(),
            priority = best.priority,
            "behavior returns task"
        );

        Ok(best)
    }
}
