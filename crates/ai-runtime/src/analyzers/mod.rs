//! Per-turn world analyzers. Each is rebuilt from scratch by
//! `TurnEngine::update_ai_state` and read-only afterwards.

mod army;
mod build;
mod cluster;
mod hero;
mod hitmap;

pub use army::{ArmyManager, CreaturePurchase};
pub use build::{BuildAnalyzer, TownDevelopment};
pub use cluster::{ObjectCluster, ObjectClusterizer};
pub use hero::HeroManager;
pub use hitmap::DangerHitMap;
