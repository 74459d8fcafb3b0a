use std::collections::HashMap;

use strategy_core::{Coord, GameEnv, ObjectId, PlayerId};

use crate::pathfinding::threat;

/// A group of visitable objects behaviors treat as one target.
#[derive(Clone, Debug)]
pub struct ObjectCluster {
    pub objects: Vec<ObjectId>,
    /// Representative tile used when pathing to the cluster.
    pub position: Coord,
    /// Strength of the strongest guard covering the cluster.
    pub danger: u64,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum ClusterKey {
    /// Objects behind the same guard fall or stand together.
    Guard(ObjectId),
    Tile(Coord),
}

/// Groups nearby visitable objects by shared guard or shared access tile.
#[derive(Debug, Default)]
pub struct ObjectClusterizer {
    clusters: Vec<ObjectCluster>,
}

impl ObjectClusterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clusters(&self) -> &[ObjectCluster] {
        &self.clusters
    }

    pub fn clusterize(&mut self, env: GameEnv<'_>, player: PlayerId) {
        tracing::trace!("clusterizing objects");

        let mut grouped: HashMap<ClusterKey, ObjectCluster> = HashMap::new();

        for id in env.world().visitable_objects(player) {
            let Some(object) = env.world().object(id) else {
                continue;
            };

            let guards = env.map().guards_at(object.position);
            let key = match guards.first() {
                Some(&guard) => ClusterKey::Guard(guard),
                None => ClusterKey::Tile(object.position),
            };

            let danger = threat::tile_danger(env, object.position, player);
            let cluster = grouped.entry(key).or_insert_with(|| ObjectCluster {
                objects: Vec::new(),
                position: object.position,
                danger: 0,
            });

            cluster.objects.push(id);
            cluster.danger = cluster.danger.max(danger);
        }

        self.clusters = grouped.into_values().collect();
        // Stable order for deterministic behavior output.
        self.clusters.sort_by_key(|c| c.objects[0]);

        for cluster in &mut self.clusters {
            cluster.objects.sort_unstable();
        }
    }
}
