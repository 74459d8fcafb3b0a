//! Multi-actor chain pathfinder.
//!
//! Per-tile reachability for a set of cooperating heroes that may meet,
//! exchange armies and continue. Three passes: an initial per-hero flood,
//! repeated chain passes that splice co-located actors, and a final
//! consolidation pass that lets composite actors extend past their last
//! exchange tile.

pub mod actor;
pub mod node;
pub mod path;
pub mod search;
pub mod storage;
pub mod threat;

mod rules;
mod town_portal;

pub use actor::{ActorArena, ActorId, ChainActor, SPECIAL_ACTORS_COUNT};
pub use node::{Accessibility, AiPathNode, NodeAction, SpecialAction};
pub use path::{AiPath, AiPathNodeInfo};
pub use storage::{AiNodeStorage, HeroChainPass, PathfinderSettings};

use strategy_core::{GameEnv, Hero, HeroRole};

/// Facade the rest of the runtime drives: owns the node storage and runs
/// the pass schedule each turn.
pub struct AiPathfinder {
    storage: AiNodeStorage,
}

impl AiPathfinder {
    pub fn new(num_chains: usize) -> Self {
        Self {
            storage: AiNodeStorage::new(num_chains),
        }
    }

    pub fn storage(&self) -> &AiNodeStorage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut AiNodeStorage {
        &mut self.storage
    }

    /// Rebuilds all paths for the given heroes.
    pub fn update_paths(
        &mut self,
        env: GameEnv<'_>,
        heroes: &[(Hero, HeroRole)],
        settings: PathfinderSettings,
    ) {
        tracing::trace!("updating paths");

        let storage = &mut self.storage;

        storage.clear(env, settings);
        storage.set_heroes(env, heroes);
        storage.set_towns_and_hillforts(env);
        storage.initialize(env);

        let initial = storage.initial_nodes(env);
        search::run(storage, env, initial);

        if !settings.use_hero_chain || !storage.select_first_actor() {
            return;
        }

        loop {
            while storage.calculate_hero_chain(env) {
                let seeds = storage.initial_nodes(env);
                search::run(storage, env, seeds);
            }

            if storage.select_next_actor() {
                continue;
            }

            if storage.increase_hero_chain_turn_limit() {
                continue;
            }

            break;
        }

        if storage.calculate_hero_chain_final() {
            let seeds = storage.initial_nodes(env);
            search::run(storage, env, seeds);
        }
    }
}
