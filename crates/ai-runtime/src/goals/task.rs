use strategy_core::{ActionSink, Coord, HeroId, Resources, TaskError};

use crate::goals::{Goal, HeroLockReason};
use crate::pathfinding::{AiPath, SpecialAction};

/// An elementary goal with its computed priority: the unit the turn loop
/// ranks and executes.
#[derive(Clone, Debug)]
pub struct Task {
    pub goal: Goal,
    pub priority: f32,
}

impl Task {
    pub fn new(goal: Goal) -> Self {
        Self {
            goal,
            priority: 0.0,
        }
    }

    /// Placeholder returned by behaviors that found nothing to do; always
    /// loses the priority contest.
    pub fn invalid() -> Self {
        Self {
            goal: Goal::Invalid,
            priority: -1.0,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self.goal, Goal::Invalid)
    }

    pub fn hero(&self) -> Option<HeroId> {
        self.goal.hero()
    }

    pub fn resources_locked(&self) -> Resources {
        self.goal.resources_locked()
    }

    pub fn hero_lock(&self) -> Option<(HeroId, HeroLockReason)> {
        match (self.goal.hero(), self.goal.lock_reason()) {
            (Some(hero), Some(reason)) => Some((hero, reason)),
            _ => None,
        }
    }

    /// Executes the task against the game engine. `GoalFulfilled` is the
    /// designed shortcut out and is handled by the caller.
    pub fn accept(&self, sink: &mut dyn ActionSink) -> Result<(), TaskError> {
        match &self.goal {
            Goal::ExecuteChain(g) => {
                execute_path(sink, &g.path)?;

                if let Some(object) = g.target_object {
                    sink.visit_object(g.hero, object)?;
                }

                Ok(())
            }
            Goal::BuyArmy(g) => {
                for purchase in &g.purchases {
                    sink.recruit_creatures(g.dwelling, g.hero, purchase.creature, purchase.count)?;
                }

                Ok(())
            }
            Goal::Build(g) => sink.build(g.town, g.building),
            Goal::RecruitHero(g) => sink.recruit_hero(g.town),
            Goal::DefendTown(g) => {
                execute_path(sink, &g.path)?;
                sink.exchange_garrison(g.hero, g.town)
            }
            Goal::Composition { .. } | Goal::Invalid => Err(TaskError::Execution(
                "task is not executable".to_owned(),
            )),
        }
    }
}

/// Walks a chain path in march order, flushing movement per hero segment
/// and performing special actions where they occur.
fn execute_path(sink: &mut dyn ActionSink, path: &AiPath) -> Result<(), TaskError> {
    if path.first_blocked_action().is_some() {
        return Err(TaskError::Execution(
            "path is gated by an unsatisfied quest".to_owned(),
        ));
    }

    let mut current: Option<(HeroId, Vec<Coord>)> = None;

    // Nodes are stored target-first; march order is the reverse.
    for node in path.nodes.iter().rev() {
        if let Some(SpecialAction::TownPortal { town }) = node.special {
            flush_movement(sink, &mut current)?;
            sink.cast_town_portal(node.hero, town)?;
            continue;
        }

        match &mut current {
            Some((hero, tiles)) if *hero == node.hero => tiles.push(node.coord),
            _ => {
                flush_movement(sink, &mut current)?;
                current = Some((node.hero, vec![node.coord]));
            }
        }
    }

    flush_movement(sink, &mut current)
}

fn flush_movement(
    sink: &mut dyn ActionSink,
    current: &mut Option<(HeroId, Vec<Coord>)>,
) -> Result<(), TaskError> {
    if let Some((hero, tiles)) = current.take() {
        if !tiles.is_empty() {
            sink.move_hero(hero, &tiles)?;
        }
    }

    Ok(())
}
