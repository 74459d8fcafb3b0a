//! Goal and task taxonomy.
//!
//! Behaviors produce goals; composite goals decompose into elementary ones;
//! an elementary goal becomes a [`Task`] that the turn loop can score and
//! execute.

mod task;

pub use task::Task;

use strategy_core::{BuildingId, Coord, HeroId, ObjectId, Resources};

use crate::analyzers::CreaturePurchase;
use crate::pathfinding::AiPath;

/// Why a hero is withheld from regular duty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeroLockReason {
    /// Day-one opening moves; cleared at the next state reset.
    Startup,
    /// Garrison duty; survives state resets until the threat passes.
    Defence,
}

/// Features the fuzzy evaluator scores a goal on. Reward fields are only
/// used when the goal has no target object to derive them from.
#[derive(Clone, Copy, Debug)]
pub struct EvaluationContext {
    pub army_loss: u64,
    pub hero_strength: u64,
    pub danger: u64,
    pub movement_cost: f32,
    pub closest_way_ratio: f32,
    pub gold_reward: i64,
    pub army_reward: u64,
    pub skill_reward: f32,
    pub strategical_value: f32,
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self {
            army_loss: 0,
            hero_strength: 0,
            danger: 0,
            movement_cost: 0.0,
            closest_way_ratio: 1.0,
            gold_reward: 0,
            army_reward: 0,
            skill_reward: 0.0,
            strategical_value: 0.0,
        }
    }
}

/// March a (possibly multi-hero) chain to a tile and optionally visit the
/// object there.
#[derive(Clone, Debug)]
pub struct ExecuteChain {
    pub hero: HeroId,
    pub target_object: Option<ObjectId>,
    pub target_tile: Coord,
    pub path: AiPath,
    pub lock: Option<HeroLockReason>,
    /// Priority fixed by the proposing behavior; bypasses the evaluator.
    pub priority: Option<f32>,
    pub context: EvaluationContext,
}

/// Purchase the listed creatures at a dwelling.
#[derive(Clone, Debug)]
pub struct BuyArmy {
    pub dwelling: ObjectId,
    pub hero: HeroId,
    pub purchases: Vec<CreaturePurchase>,
    pub resources_locked: Resources,
    pub priority: Option<f32>,
    pub context: EvaluationContext,
}

/// Construct the next building in a town.
#[derive(Clone, Debug)]
pub struct Build {
    pub town: ObjectId,
    pub building: BuildingId,
    pub resources_locked: Resources,
    pub priority: Option<f32>,
    pub context: EvaluationContext,
}

/// Hire a hero in a town's tavern.
#[derive(Clone, Debug)]
pub struct RecruitHero {
    pub town: ObjectId,
    pub priority: Option<f32>,
    pub context: EvaluationContext,
}

/// Station a hero in a threatened town and hand the army to the garrison.
#[derive(Clone, Debug)]
pub struct DefendTown {
    pub hero: HeroId,
    pub town: ObjectId,
    pub town_tile: Coord,
    pub path: AiPath,
    pub priority: Option<f32>,
    pub context: EvaluationContext,
}

#[derive(Clone, Debug)]
pub enum Goal {
    /// A bundle of subgoals sharing a consolidated evaluation context.
    Composition {
        subgoals: Vec<Goal>,
        context: EvaluationContext,
    },
    ExecuteChain(ExecuteChain),
    BuyArmy(BuyArmy),
    Build(Build),
    RecruitHero(RecruitHero),
    DefendTown(DefendTown),
    Invalid,
}

/// Identity of a goal, used to drop duplicates and cycles during
/// decomposition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GoalKey {
    kind: u8,
    hero: Option<HeroId>,
    object: Option<ObjectId>,
    tile: Option<Coord>,
    building: Option<BuildingId>,
    chain_mask: u64,
    /// Distinguishes compositions, which have no anchor of their own:
    /// a hash over the subgoal keys.
    salt: u64,
}

impl Goal {
    pub fn is_elementary(&self) -> bool {
        !matches!(self, Goal::Composition { .. } | Goal::Invalid)
    }

    pub fn hero(&self) -> Option<HeroId> {
        match self {
            Goal::ExecuteChain(g) => Some(g.hero),
            Goal::BuyArmy(g) => Some(g.hero),
            Goal::DefendTown(g) => Some(g.hero),
            _ => None,
        }
    }

    pub fn target_object(&self) -> Option<ObjectId> {
        match self {
            Goal::ExecuteChain(g) => g.target_object,
            Goal::BuyArmy(g) => Some(g.dwelling),
            Goal::Build(g) => Some(g.town),
            Goal::RecruitHero(g) => Some(g.town),
            Goal::DefendTown(g) => Some(g.town),
            _ => None,
        }
    }

    pub fn context(&self) -> EvaluationContext {
        match self {
            Goal::Composition { context, .. } => *context,
            Goal::ExecuteChain(g) => g.context,
            Goal::BuyArmy(g) => g.context,
            Goal::Build(g) => g.context,
            Goal::RecruitHero(g) => g.context,
            Goal::DefendTown(g) => g.context,
            Goal::Invalid => EvaluationContext::default(),
        }
    }

    pub fn resources_locked(&self) -> Resources {
        match self {
            Goal::BuyArmy(g) => g.resources_locked,
            Goal::Build(g) => g.resources_locked,
            _ => Resources::ZERO,
        }
    }

    /// Priority the proposing behavior fixed in advance, if any. Such goals
    /// are taken at face value and never re-scored by the fuzzy engine.
    pub fn preset_priority(&self) -> Option<f32> {
        match self {
            Goal::ExecuteChain(g) => g.priority,
            Goal::BuyArmy(g) => g.priority,
            Goal::Build(g) => g.priority,
            Goal::RecruitHero(g) => g.priority,
            Goal::DefendTown(g) => g.priority,
            _ => None,
        }
    }

    pub fn lock_reason(&self) -> Option<HeroLockReason> {
        match self {
            Goal::ExecuteChain(g) => g.lock,
            Goal::DefendTown(_) => Some(HeroLockReason::Defence),
            _ => None,
        }
    }

    pub fn key(&self) -> GoalKey {
        let kind = match self {
            Goal::Composition { .. } => 0,
            Goal::ExecuteChain(_) => 1,
            Goal::BuyArmy(_) => 2,
            Goal::Build(_) => 3,
            Goal::RecruitHero(_) => 4,
            Goal::DefendTown(_) => 5,
            Goal::Invalid => 6,
        };

        GoalKey {
            kind,
            hero: self.hero(),
            object: self.target_object(),
            tile: match self {
                Goal::ExecuteChain(g) => Some(g.target_tile),
                Goal::DefendTown(g) => Some(g.town_tile),
                _ => None,
            },
            building: match self {
                Goal::Build(g) => Some(g.building),
                _ => None,
            },
            chain_mask: match self {
                Goal::ExecuteChain(g) => g.path.chain_mask,
                Goal::DefendTown(g) => g.path.chain_mask,
                _ => 0,
            },
            salt: match self {
                Goal::Composition { subgoals, .. } => {
                    use std::hash::{Hash, Hasher};

                    let mut hasher = std::collections::hash_map::DefaultHasher::new();
                    for sub in subgoals {
                        sub.key().hash(&mut hasher);
                    }
                    hasher.finish()
                }
                _ => 0,
            },
        }
    }

    /// Log-friendly one-liner.
    pub fn description(&self) -> String {
        match self {
            Goal::Composition { subgoals, .. } => format!("composition of {}", subgoals.len()),
            Goal::ExecuteChain(g) => match g.target_object {
                Some(object) => format!("visit {} with hero #{}", object, g.hero.0),
                None => format!("move hero #{} to {}", g.hero.0, g.target_tile),
            },
            Goal::BuyArmy(g) => format!("buy army at {} for hero #{}", g.dwelling, g.hero.0),
            Goal::Build(g) => format!("build #{} in {}", g.building.0, g.town),
            Goal::RecruitHero(g) => format!("recruit hero in {}", g.town),
            Goal::DefendTown(g) => format!("defend {} with hero #{}", g.town, g.hero.0),
            Goal::Invalid => "invalid".to_owned(),
        }
    }
}
