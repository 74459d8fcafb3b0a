use std::collections::{BinaryHeap, HashMap};
use std::cmp::Reverse;

use strategy_core::{Coord, GameEnv, Hero, HeroId, ObjectId, PlayerId};

use crate::pathfinding::threat;

/// Per-tile maximum enemy-hero reach strength within one turn.
///
/// Rebuilt from scratch each update; the rest of the turn reads it to judge
/// how exposed a tile or town is.
#[derive(Debug, Default)]
pub struct DangerHitMap {
    tile_threat: HashMap<Coord, u64>,
    accessible_objects: HashMap<HeroId, Vec<ObjectId>>,
}

impl DangerHitMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.tile_threat.clear();
        self.accessible_objects.clear();
    }

    pub fn update_hit_map(&mut self, env: GameEnv<'_>, player: PlayerId) {
        tracing::trace!("updating danger hit map");

        self.reset();

        for enemy in env.world().enemy_heroes(player) {
            let strength = threat::hero_strength(env, &enemy);
            let reached = one_turn_reach(env, &enemy);
            let objects = self.accessible_objects.entry(enemy.id).or_default();

            for tile in reached {
                let entry = self.tile_threat.entry(tile).or_insert(0);
                *entry = (*entry).max(strength);

                if let Some(info) = env.map().tile(tile) {
                    if let Some(object) = info.object {
                        objects.push(object);
                    }
                }
            }

            objects.sort_unstable();
            objects.dedup();
        }
    }

    /// Strongest enemy force that can reach the tile this turn.
    pub fn danger_at(&self, tile: Coord) -> u64 {
        self.tile_threat.get(&tile).copied().unwrap_or(0)
    }

    pub fn one_turn_accessible_objects(&self, enemy: HeroId) -> &[ObjectId] {
        self.accessible_objects
            .get(&enemy)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Tiles an enemy hero can end a move on this turn: cheapest-first expansion
/// over its remaining movement budget.
fn one_turn_reach(env: GameEnv<'_>, hero: &Hero) -> Vec<Coord> {
    let budget = hero.max_move_points(hero.layer());
    let mut best_cost: HashMap<Coord, u32> = HashMap::from([(hero.position, 0)]);
    let mut queue = BinaryHeap::from([(Reverse(0u32), hero.position)]);

    while let Some((Reverse(cost), tile)) = queue.pop() {
        if cost > best_cost.get(&tile).copied().unwrap_or(u32::MAX) {
            continue;
        }

        for next in env.map().neighbours(tile) {
            let Some(info) = env.map().tile(next) else {
                continue;
            };

            let next_cost = cost.saturating_add(info.move_cost);

            if next_cost > budget {
                continue;
            }

            if next_cost < best_cost.get(&next).copied().unwrap_or(u32::MAX) {
                best_cost.insert(next, next_cost);
                queue.push((Reverse(next_cost), next));
            }
        }
    }

    best_cost.into_keys().collect()
}
