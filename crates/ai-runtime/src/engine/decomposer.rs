use std::collections::HashSet;

use strategy_core::TaskError;

use crate::goals::{Goal, GoalKey};
use crate::interrupt::Interrupt;

/// Depth-bounded expansion of composite goals into elementary ones.
///
/// The seen-set persists across behaviors within one pass, so the same goal
/// proposed twice only surfaces once; `reset` clears it each state update.
#[derive(Debug, Default)]
pub struct Decomposer {
    seen: HashSet<GoalKey>,
}

impl Decomposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.seen.clear();
    }

    /// Flattens `roots` into elementary goals, dropping duplicates, cycles
    /// and anything nested deeper than `max_depth`.
    pub fn decompose(
        &mut self,
        interrupt: &Interrupt,
        roots: Vec<Goal>,
        max_depth: u32,
    ) -> Result<Vec<Goal>, TaskError> {
        let mut out = Vec::new();
        let mut stack: Vec<(Goal, u32)> = roots.into_iter().map(|g| (g, 0)).collect();

        while let Some((goal, depth)) = stack.pop() {
            interrupt.check()?;

            if !self.seen.insert(goal.key()) {
                continue;
            }

            match goal {
                Goal::Invalid => {}
                Goal::Composition { subgoals, .. } => {
                    if depth >= max_depth {
                        tracing::trace!(depth, "decomposition depth exceeded, dropping subtree");
                        continue;
                    }

                    for sub in subgoals {
                        stack.push((sub, depth + 1));
                    }
                }
                elementary => out.push(elementary),
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::EvaluationContext;
    use strategy_core::{Coord, HeroId, ObjectId};

    fn visit(hero: u32, object: u32) -> Goal {
        Goal::ExecuteChain(crate::goals::ExecuteChain {
            hero: HeroId(hero),
            target_object: Some(ObjectId(object)),
            target_tile: Coord::new(object as i32, 0, 0),
            path: Default::default(),
            lock: None,
            priority: None,
            context: EvaluationContext::default(),
        })
    }

    fn composition(subgoals: Vec<Goal>) -> Goal {
        Goal::Composition {
            subgoals,
            context: EvaluationContext::default(),
        }
    }

    #[test]
    fn flattens_nested_compositions() {
        let mut decomposer = Decomposer::new();
        let root = composition(vec![visit(1, 10), composition(vec![visit(1, 20)])]);

        let out = decomposer
            .decompose(&Interrupt::new(), vec![root], 5)
            .unwrap();

        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|g| g.is_elementary()));
    }

    #[test]
    fn drops_duplicates_across_calls_until_reset() {
        let mut decomposer = Decomposer::new();
        let interrupt = Interrupt::new();

        let first = decomposer
            .decompose(&interrupt, vec![visit(1, 10)], 5)
            .unwrap();
        let second = decomposer
            .decompose(&interrupt, vec![visit(1, 10)], 5)
            .unwrap();

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());

        decomposer.reset();
        let third = decomposer
            .decompose(&interrupt, vec![visit(1, 10)], 5)
            .unwrap();
        assert_eq!(third.len(), 1);
    }

    #[test]
    fn depth_bound_prunes_deep_subtrees() {
        let mut decomposer = Decomposer::new();
        let deep = composition(vec![composition(vec![visit(1, 10)])]);

        let out = decomposer
            .decompose(&Interrupt::new(), vec![deep], 1)
            .unwrap();

        assert!(out.is_empty());
    }

    #[test]
    fn interruption_stops_expansion() {
        let mut decomposer = Decomposer::new();
        let interrupt = Interrupt::new();
        interrupt.trigger();

        let result = decomposer.decompose(&interrupt, vec![visit(1, 10)], 5);

        assert!(result.is_err());
    }
}
