//! Strategy modules. Each behavior reads world state and precomputed paths
//! and proposes candidate goals; it never mutates pathfinder state.

mod building;
mod buy_army;
mod capture;
mod cluster;
mod defence;
mod gather;
mod recruit_hero;
mod startup;

pub use building::BuildingBehavior;
pub use buy_army::BuyArmyBehavior;
pub use capture::CaptureObjectsBehavior;
pub use cluster::ClusterBehavior;
pub use defence::DefenceBehavior;
pub use gather::GatherArmyBehavior;
pub use recruit_hero::RecruitHeroBehavior;
pub use startup::StartupBehavior;

use strategy_core::{Coord, GameEnv};

use crate::config::AiConfig;
use crate::engine::AiState;
use crate::goals::Goal;
use crate::pathfinding::AiPath;

pub trait Behavior: Send {
    fn name(&self) -> &'static str;

    /// How deep compositions from this behavior may nest.
    fn decomposition_depth(&self, _config: &AiConfig) -> u32 {
        1
    }

    fn goals(&self, ai: &AiState, env: GameEnv<'_>) -> Vec<Goal>;
}

/// The production behavior set, in evaluation order.
pub fn default_behaviors() -> Vec<Box<dyn Behavior>> {
    vec![
        Box::new(BuyArmyBehavior),
        Box::new(CaptureObjectsBehavior),
        Box::new(ClusterBehavior),
        Box::new(RecruitHeroBehavior),
        Box::new(DefenceBehavior),
        Box::new(BuildingBehavior),
        Box::new(GatherArmyBehavior),
        Box::new(StartupBehavior),
    ]
}

/// Usable chain paths to a tile: locked heroes and suicidal marches are
/// dropped, and each path gets its closest-way ratio against the cheapest.
pub(crate) fn usable_paths_to(ai: &AiState, env: GameEnv<'_>, tile: Coord) -> Vec<(AiPath, f32)> {
    let mut paths = ai.pathfinder.storage().get_chain_info(env, tile, true);

    paths.retain(|path| {
        path.target_hero.is_some()
            && !ai.are_path_heroes_locked(path)
            && path.total_army_loss() < path.hero_army_value
    });

    let cheapest = paths
        .iter()
        .map(|p| p.movement_cost())
        .fold(f32::INFINITY, f32::min);

    paths
        .into_iter()
        .map(|path| {
            let cost = path.movement_cost();
            let ratio = if cost > 0.0 && cheapest.is_finite() {
                (cheapest / cost).clamp(0.0, 1.0)
            } else {
                1.0
            };

            (path, ratio)
        })
        .collect()
}
