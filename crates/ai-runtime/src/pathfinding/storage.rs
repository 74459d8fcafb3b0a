use strategy_core::{Coord, GameEnv, Hero, HeroId, HeroRole, Layer, MapSize, ObjectKind, PlayerId, TerrainKind};

use crate::pathfinding::actor::{ActorArena, ActorId};
use crate::pathfinding::node::{Accessibility, AiPathNode, NodeAction};
use crate::pathfinding::path::{AiPath, AiPathNodeInfo};
use crate::pathfinding::threat;

/// Which phase of the search schedule the storage is serving.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeroChainPass {
    Initial,
    Chain,
    Final,
}

/// Per-update pathfinder limits, derived from the engine's scan depth.
#[derive(Clone, Copy, Debug)]
pub struct PathfinderSettings {
    pub use_hero_chain: bool,
    pub scout_turn_distance_limit: u8,
    /// `None` lifts the horizon entirely (full scan).
    pub main_turn_distance_limit: Option<u8>,
    pub hero_chain_max_turns: u8,
}

impl Default for PathfinderSettings {
    fn default() -> Self {
        Self {
            use_hero_chain: true,
            scout_turn_distance_limit: 5,
            main_turn_distance_limit: None,
            hero_chain_max_turns: 3,
        }
    }
}

/// A proposed exchange of armies between two settled nodes on one tile.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ExchangeCandidate {
    pub coord: Coord,
    pub layer: Layer,
    pub actor: ActorId,
    pub carrier: usize,
    pub other: usize,
    pub turns: u8,
    pub move_remains: u32,
    pub cost: f32,
    pub army_loss: u64,
}

/// Node facts `has_better_chain` needs, detached from storage so the same
/// dominance test runs against committed nodes and same-batch candidates.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CandidateView {
    pub actor: ActorId,
    pub coord: Coord,
    pub layer: Layer,
    pub cost: f32,
    pub danger: u64,
    pub army_loss: u64,
}

/// The physical layers node storage materializes. Flying and water-walking
/// stay disabled, matching the default pathfinder options.
const STORED_LAYERS: [Layer; 2] = [Layer::Land, Layer::Sail];

fn stored_layer_index(layer: Layer) -> Option<usize> {
    match layer {
        Layer::Land => Some(0),
        Layer::Sail => Some(1),
        _ => None,
    }
}

/// Dense 5-D node grid `(x, y, z, layer, chain-slot)` plus the chain-pass
/// machinery that splices co-located actors into composite chains.
pub struct AiNodeStorage {
    sizes: MapSize,
    num_chains: usize,
    nodes: Vec<AiPathNode>,
    pub(crate) actors: ActorArena,
    pub(crate) player: PlayerId,
    /// Seed nodes for the next search run during chain and final passes.
    hero_chain: Vec<usize>,
    pass: HeroChainPass,
    hero_chain_turn: u8,
    /// Active carrier set: exchanges must touch this mask.
    chain_mask: u64,
    settings: PathfinderSettings,
}

impl AiNodeStorage {
    pub fn new(num_chains: usize) -> Self {
        Self {
            sizes: MapSize { x: 0, y: 0, z: 0 },
            num_chains,
            nodes: Vec::new(),
            actors: ActorArena::default(),
            player: PlayerId::NEUTRAL,
            hero_chain: Vec::new(),
            pass: HeroChainPass::Initial,
            hero_chain_turn: 0,
            chain_mask: 0,
            settings: PathfinderSettings::default(),
        }
    }

    pub fn clear(&mut self, env: GameEnv<'_>, settings: PathfinderSettings) {
        self.actors.clear();
        self.hero_chain.clear();
        self.pass = HeroChainPass::Initial;
        self.hero_chain_turn = 0;
        self.chain_mask = 0;
        self.settings = settings;

        let sizes = env.map().size();

        if sizes != self.sizes || self.nodes.is_empty() {
            self.sizes = sizes;
            let total =
                (sizes.x * sizes.y * sizes.z) as usize * STORED_LAYERS.len() * self.num_chains;
            self.nodes.clear();
            self.nodes.reserve(total);

            for z in 0..sizes.z {
                for y in 0..sizes.y {
                    for x in 0..sizes.x {
                        for layer in STORED_LAYERS {
                            for _ in 0..self.num_chains {
                                self.nodes
                                    .push(AiPathNode::unreachable(Coord::new(x, y, z), layer));
                            }
                        }
                    }
                }
            }
        }
    }

    pub fn pass(&self) -> HeroChainPass {
        self.pass
    }

    pub fn node(&self, idx: usize) -> &AiPathNode {
        &self.nodes[idx]
    }

    pub(crate) fn node_mut(&mut self, idx: usize) -> &mut AiPathNode {
        &mut self.nodes[idx]
    }

    fn first_slot(&self, coord: Coord, layer: Layer) -> Option<usize> {
        let layer_idx = stored_layer_index(layer)?;

        if !self.sizes.contains(coord) {
            return None;
        }

        let tile =
            ((coord.z * self.sizes.y + coord.y) * self.sizes.x + coord.x) as usize;

        Some((tile * STORED_LAYERS.len() + layer_idx) * self.num_chains)
    }

    /// All chain-slot node indices at one (tile, layer).
    pub(crate) fn slots(&self, coord: Coord, layer: Layer) -> std::ops::Range<usize> {
        match self.first_slot(coord, layer) {
            Some(first) => first..first + self.num_chains,
            None => 0..0,
        }
    }

    /// The node owned by `actor` at this position, claiming a free slot on
    /// first visit. `None` when every slot is taken by other actors.
    pub(crate) fn get_or_create_node(
        &mut self,
        coord: Coord,
        layer: Layer,
        actor: ActorId,
    ) -> Option<usize> {
        let range = self.slots(coord, layer);

        if range.is_empty() {
            return None;
        }

        for idx in range.clone() {
            match self.nodes[idx].actor {
                Some(owner) if owner == actor => return Some(idx),
                None => {
                    self.nodes[idx].actor = Some(actor);
                    return Some(idx);
                }
                _ => {}
            }
        }

        tracing::trace!(%coord, "out of chain slots");
        None
    }

    /// Registers hero actors, one mask bit each. Heroes locked for defence
    /// are expected to be filtered out by the caller.
    pub fn set_heroes(&mut self, env: GameEnv<'_>, heroes: &[(Hero, HeroRole)]) {
        for (hero, role) in heroes {
            let Some(mask) = self.next_mask() else {
                return;
            };

            self.actors.add_hero_actor(env, hero, *role, mask);
        }
    }

    /// Towns without a garrisoned hero and hill forts become immobile army
    /// sources the chain can draw from.
    pub fn set_towns_and_hillforts(&mut self, env: GameEnv<'_>) {
        for town in env.world().towns(self.player) {
            if town.garrison_hero.is_some() || town.garrison.is_empty() {
                continue;
            }

            let Some(mask) = self.next_mask() else {
                return;
            };

            self.actors
                .add_garrison_actor(env, town.position, town.garrison, mask);
        }

        for id in env.world().visitable_objects(self.player) {
            let Some(object) = env.world().object(id) else {
                continue;
            };

            if object.kind == ObjectKind::HillFort && !object.guard.is_empty() {
                let Some(mask) = self.next_mask() else {
                    return;
                };

                self.actors
                    .add_garrison_actor(env, object.position, object.guard, mask);
            }
        }
    }

    fn next_mask(&self) -> Option<u64> {
        let primitives = self.actors.primitive_actors().count();

        if primitives >= u64::BITS as usize {
            tracing::trace!("too many primitive actors, ignoring the rest");
            return None;
        }

        Some(1 << primitives)
    }

    pub fn set_player(&mut self, player: PlayerId) {
        self.player = player;
    }

    /// Stamps accessibility for every tile and resets all chain slots.
    pub fn initialize(&mut self, env: GameEnv<'_>) {
        for z in 0..self.sizes.z {
            for y in 0..self.sizes.y {
                for x in 0..self.sizes.x {
                    let coord = Coord::new(x, y, z);

                    let (land, sail) = match env.map().tile(coord) {
                        None => (Accessibility::NotSet, Accessibility::NotSet),
                        Some(info) => match info.terrain {
                            TerrainKind::Rock => (Accessibility::NotSet, Accessibility::NotSet),
                            TerrainKind::Water => {
                                (Accessibility::Blocked, self.evaluate_accessibility(env, coord))
                            }
                            TerrainKind::Land => {
                                (self.evaluate_accessibility(env, coord), Accessibility::Blocked)
                            }
                        },
                    };

                    self.reset_tile(coord, Layer::Land, land);
                    self.reset_tile(coord, Layer::Sail, sail);
                }
            }
        }
    }

    fn evaluate_accessibility(&self, env: GameEnv<'_>, coord: Coord) -> Accessibility {
        if !env.map().is_visible(self.player, coord) {
            return Accessibility::Blocked;
        }

        let Some(info) = env.map().tile(coord) else {
            return Accessibility::NotSet;
        };

        match info.object.and_then(|id| env.world().object(id)) {
            Some(object) if object.kind.blocks_visit() => Accessibility::BlockVis,
            Some(_) => Accessibility::Visitable,
            None => Accessibility::Accessible,
        }
    }

    fn reset_tile(&mut self, coord: Coord, layer: Layer, accessibility: Accessibility) {
        for idx in self.slots(coord, layer) {
            self.nodes[idx].reset(accessibility);
        }
    }

    /// Seed nodes for the next search run. During the initial pass these are
    /// the actors' starting tiles; later passes reuse the freshly spliced
    /// exchange nodes. Town-portal nodes are appended in both cases.
    pub fn initial_nodes(&mut self, env: GameEnv<'_>) -> Vec<usize> {
        if self.pass != HeroChainPass::Initial {
            let mut seeds = std::mem::take(&mut self.hero_chain);
            self.calculate_town_portal_teleportations(env, &mut seeds);
            return seeds;
        }

        let mut seeds = Vec::new();

        for actor_id in self.actors.base_actors().collect::<Vec<_>>() {
            let actor = self.actors.get(actor_id);
            let (position, layer, turn, movement, movable) = (
                actor.initial_position,
                actor.layer,
                actor.initial_turn,
                actor.initial_movement,
                actor.is_movable,
            );

            let Some(idx) = self.get_or_create_node(position, layer, actor_id) else {
                continue;
            };

            let node = &mut self.nodes[idx];
            node.turns = turn;
            node.move_remains = movement;
            node.danger = 0;
            node.cost = f32::from(turn);
            node.action = NodeAction::Normal;

            if movable {
                seeds.push(idx);
            } else {
                node.locked = true;
            }
        }

        self.calculate_town_portal_teleportations(env, &mut seeds);

        seeds
    }

    /// Copies path state from `src` into a committed node. The predecessor
    /// link only anchors on nodes that carry an action to perform, so
    /// extracted paths list decision points rather than every tile.
    pub(crate) fn commit(
        &mut self,
        dst: usize,
        src: usize,
        action: NodeAction,
        turns: u8,
        move_remains: u32,
        cost: f32,
    ) {
        let source = &self.nodes[src];
        let danger = source.danger;
        let army_loss = source.army_loss;
        let mana_cost = source.mana_cost;
        let anchor = source.special.is_some() || source.chain_other.is_some();
        let prev = if anchor { Some(src) } else { source.prev };

        let node = &mut self.nodes[dst];
        node.action = action;
        node.turns = turns;
        node.move_remains = move_remains;
        node.cost = cost;
        node.danger = danger;
        node.army_loss = army_loss;
        node.mana_cost = mana_cost;
        node.special = None;
        node.chain_other = None;
        node.prev = prev;
    }

    // ------------------------------------------------------------------
    // Chain passes
    // ------------------------------------------------------------------

    /// Picks the strongest actor as the first carrier set.
    pub fn select_first_actor(&mut self) -> bool {
        let strongest = self
            .actors
            .primitive_actors()
            .max_by_key(|&id| (self.actors.get(id).army_value, std::cmp::Reverse(id)));

        match strongest {
            Some(id) => {
                self.chain_mask = self.actors.get(id).chain_mask;
                true
            }
            None => false,
        }
    }

    /// Moves the carrier set to the next-strongest actor, in stable
    /// descending army order.
    pub fn select_next_actor(&mut self) -> bool {
        let bases: Vec<ActorId> = self.actors.primitive_actors().collect();

        let current = bases
            .iter()
            .position(|&id| self.actors.get(id).chain_mask == self.chain_mask);

        let Some(current_pos) = current else {
            return false;
        };

        let current_value = self.actors.get(bases[current_pos]).army_value;
        let mut next: Option<(u64, usize)> = None;

        for (pos, &id) in bases.iter().enumerate() {
            let value = self.actors.get(id).army_value;

            if value > current_value || (value == current_value && pos <= current_pos) {
                continue;
            }

            if next.map(|(best, _)| value > best).unwrap_or(true) {
                next = Some((value, pos));
            }
        }

        match next {
            Some((_, pos)) => {
                self.chain_mask = self.actors.get(bases[pos]).chain_mask;
                true
            }
            None => false,
        }
    }

    pub fn increase_hero_chain_turn_limit(&mut self) -> bool {
        if self.hero_chain_turn >= self.settings.hero_chain_max_turns {
            return false;
        }

        self.hero_chain_turn += 1;
        true
    }

    /// One chain pass: for every tile, tries every ordered pair of settled
    /// nodes as (carrier, other), committing the surviving exchanges.
    /// Returns whether any new chain node appeared.
    pub fn calculate_hero_chain(&mut self, env: GameEnv<'_>) -> bool {
        self.pass = HeroChainPass::Chain;
        self.hero_chain.clear();

        let mut existing: Vec<usize> = Vec::with_capacity(self.num_chains);
        let mut candidates: Vec<ExchangeCandidate> = Vec::with_capacity(self.num_chains);

        for layer in STORED_LAYERS {
            for z in 0..self.sizes.z {
                for y in 0..self.sizes.y {
                    for x in 0..self.sizes.x {
                        let coord = Coord::new(x, y, z);

                        existing.clear();
                        candidates.clear();

                        for idx in self.slots(coord, layer) {
                            let node = &self.nodes[idx];

                            if node.actor.is_some()
                                && node.is_reached()
                                && node.turns <= self.hero_chain_turn
                            {
                                existing.push(idx);
                            }
                        }

                        for &carrier in &existing {
                            if !self.actor_of(carrier).is_movable {
                                continue;
                            }

                            for &other in &existing {
                                if other == carrier {
                                    continue;
                                }

                                self.try_exchange(env, carrier, other, &mut candidates);
                            }
                        }

                        self.cleanup_inefective_chains(&mut candidates);
                        self.add_hero_chain(&candidates);
                    }
                }
            }
        }

        !self.hero_chain.is_empty()
    }

    fn actor_of(&self, node: usize) -> &crate::pathfinding::actor::ChainActor {
        let id = self.nodes[node].actor.expect("settled node without actor");
        self.actors.get(id)
    }

    fn try_exchange(
        &mut self,
        env: GameEnv<'_>,
        carrier: usize,
        other: usize,
        candidates: &mut Vec<ExchangeCandidate>,
    ) {
        let carrier_node = &self.nodes[carrier];
        let other_node = &self.nodes[other];
        let carrier_actor_id = carrier_node.actor.expect("settled node without actor");
        let other_actor_id = other_node.actor.expect("settled node without actor");
        let carrier_actor = self.actors.get(carrier_actor_id);
        let other_actor = self.actors.get(other_actor_id);

        // One side must belong to the active carrier set.
        if other_actor.chain_mask & self.chain_mask == 0
            && carrier_actor.chain_mask & self.chain_mask == 0
        {
            return;
        }

        // Same-origin chains never merge.
        if other_actor.chain_mask & carrier_actor.chain_mask != 0 {
            return;
        }

        if matches!(
            other_node.action,
            NodeAction::Battle
                | NodeAction::TeleportBattle
                | NodeAction::TeleportNormal
                | NodeAction::TeleportBlockingVisit
        ) {
            return;
        }

        // Carrier must arrive intact and be able to act from its node.
        let carrier_battled =
            carrier_node.action == NodeAction::Battle
                && !(carrier_actor.allow_battle && carrier_node.special.is_some());

        if carrier_node.army_loss >= carrier_actor.army_value
            || carrier_battled
            || carrier_node.action == NodeAction::BlockingVisit
        {
            return;
        }

        if other_node.army_loss != 0 && other_node.army_loss >= other_actor.army_value {
            return;
        }

        // Handing the army to the slower and less experienced hero of the
        // two only ever wastes movement.
        if other_actor.is_movable {
            let has_less_mp = carrier_node.turns > other_node.turns
                || (carrier_node.turns == other_node.turns
                    && carrier_node.move_remains < other_node.move_remains);
            let has_less_experience = carrier_actor.hero_exp < other_actor.hero_exp;

            if has_less_mp && has_less_experience {
                return;
            }
        }

        if !self.actors.can_exchange(env, carrier_actor_id, other_actor_id) {
            return;
        }

        let merged = self.actors.exchange(env, carrier_actor_id, other_actor_id);

        candidates.push(self.calculate_exchange(merged, carrier, other));
    }

    /// Cost and timing of an exchange: the carrier waits for the other
    /// chain, paying a tiny penalty so direct paths stay preferred.
    fn calculate_exchange(
        &self,
        merged: ActorId,
        carrier: usize,
        other: usize,
    ) -> ExchangeCandidate {
        let carrier_node = &self.nodes[carrier];
        let other_node = &self.nodes[other];

        let mut candidate = ExchangeCandidate {
            coord: carrier_node.coord,
            layer: carrier_node.layer,
            actor: merged,
            carrier,
            other,
            turns: carrier_node.turns,
            move_remains: carrier_node.move_remains,
            cost: carrier_node.cost + other_node.cost / 1000.0,
            army_loss: carrier_node.army_loss + other_node.army_loss,
        };

        if carrier_node.turns < other_node.turns {
            let max_move = self
                .actors
                .get(merged)
                .max_move_points(carrier_node.layer)
                .max(1);
            let waiting = f32::from(other_node.turns - carrier_node.turns - 1)
                + carrier_node.move_remains as f32 / max_move as f32;

            candidate.turns = other_node.turns;
            candidate.cost += waiting;
            candidate.move_remains = max_move;
        }

        candidate
    }

    /// Drops candidates dominated by committed nodes or batch siblings.
    fn cleanup_inefective_chains(&self, candidates: &mut Vec<ExchangeCandidate>) {
        let all = candidates.clone();

        candidates.retain(|candidate| {
            let view = CandidateView {
                actor: candidate.actor,
                coord: candidate.coord,
                layer: candidate.layer,
                cost: candidate.cost,
                danger: self.nodes[candidate.carrier].danger,
                army_loss: candidate.army_loss,
            };

            !self.has_better_chain(&view, None) && !self.has_better_chain_in_batch(&view, &all)
        });
    }

    fn add_hero_chain(&mut self, candidates: &[ExchangeCandidate]) {
        for candidate in candidates {
            let Some(idx) = self.get_or_create_node(candidate.coord, candidate.layer, candidate.actor)
            else {
                continue;
            };

            let node = &self.nodes[idx];

            if node.is_reached() {
                continue;
            }

            if node.turns != u8::MAX && node.cost < candidate.cost {
                continue;
            }

            let action = self.nodes[candidate.carrier].action;
            self.commit(
                idx,
                candidate.carrier,
                action,
                candidate.turns,
                candidate.move_remains,
                candidate.cost,
            );

            let node = &mut self.nodes[idx];
            node.chain_other = Some(candidate.other);
            node.army_loss = candidate.army_loss;

            tracing::trace!(
                coord = %candidate.coord,
                mask = self.actors.get(candidate.actor).chain_mask,
                cost = candidate.cost,
                "chain accepted"
            );

            self.hero_chain.push(idx);
        }
    }

    /// Final pass seeds: multi-actor chains past the exchange horizon that
    /// no settled node dominates, ready for one more expansion.
    pub fn calculate_hero_chain_final(&mut self) -> bool {
        self.pass = HeroChainPass::Final;
        self.hero_chain.clear();

        for layer in STORED_LAYERS {
            for z in 0..self.sizes.z {
                for y in 0..self.sizes.y {
                    for x in 0..self.sizes.x {
                        let coord = Coord::new(x, y, z);

                        for idx in self.slots(coord, layer) {
                            let node = &self.nodes[idx];

                            let Some(actor_id) = node.actor else {
                                continue;
                            };

                            if node.turns <= self.hero_chain_turn
                                || node.locked
                                || !node.is_reached()
                                || self.actors.get(actor_id).actor_exchange_count <= 1
                            {
                                continue;
                            }

                            let view = CandidateView {
                                actor: actor_id,
                                coord,
                                layer,
                                cost: node.cost,
                                danger: node.danger,
                                army_loss: node.army_loss,
                            };

                            if !self.has_better_chain(&view, Some(idx)) {
                                self.hero_chain.push(idx);
                            }
                        }
                    }
                }
            }
        }

        !self.hero_chain.is_empty()
    }

    // ------------------------------------------------------------------
    // Dominance
    // ------------------------------------------------------------------

    /// Whether a settled node at the candidate's tile dominates it.
    pub(crate) fn has_better_chain(
        &self,
        candidate: &CandidateView,
        candidate_node: Option<usize>,
    ) -> bool {
        for idx in self.slots(candidate.coord, candidate.layer) {
            if candidate_node == Some(idx) {
                continue;
            }

            let node = &self.nodes[idx];

            let Some(node_actor_id) = node.actor else {
                continue;
            };

            if node_actor_id == candidate.actor || !node.is_reached() {
                continue;
            }

            let node_actor = self.actors.get(node_actor_id);

            if node_actor.hero.is_none() {
                continue;
            }

            if self.dominates(
                node_actor_id,
                node.danger,
                node.army_loss,
                node.cost,
                candidate,
            ) {
                return true;
            }
        }

        false
    }

    fn has_better_chain_in_batch(
        &self,
        candidate: &CandidateView,
        batch: &[ExchangeCandidate],
    ) -> bool {
        batch.iter().any(|other| {
            other.actor != candidate.actor
                && other.coord == candidate.coord
                && other.layer == candidate.layer
                && self.dominates(
                    other.actor,
                    self.nodes[other.carrier].danger,
                    other.army_loss,
                    other.cost,
                    candidate,
                )
        })
    }

    /// The dominance rules: a cheaper equally-safe battle variant, or a
    /// stronger-at-no-greater-cost chain (during chain/final passes), or an
    /// equal-army stronger-hero chain during the final pass.
    fn dominates(
        &self,
        node_actor_id: ActorId,
        node_danger: u64,
        node_army_loss: u64,
        node_cost: f32,
        candidate: &CandidateView,
    ) -> bool {
        let node_actor = self.actors.get(node_actor_id);
        let candidate_actor = self.actors.get(candidate.actor);

        if node_danger <= candidate.danger
            && candidate.actor == node_actor.battle_actor
            && node_cost < candidate.cost
        {
            return true;
        }

        if candidate_actor.chain_mask != node_actor.chain_mask && self.pass != HeroChainPass::Final
        {
            return false;
        }

        let node_army = node_actor.army_value.saturating_sub(node_army_loss);
        let candidate_army = candidate_actor.army_value.saturating_sub(candidate.army_loss);

        if node_army > candidate_army && node_cost <= candidate.cost {
            return true;
        }

        if self.pass == HeroChainPass::Final
            && node_army == candidate_army
            && node_actor.hero_fighting_strength >= candidate_actor.hero_fighting_strength
            && node_cost <= candidate.cost
        {
            // Exact ties break on actor identity so exactly one side wins.
            if node_actor.hero_fighting_strength == candidate_actor.hero_fighting_strength
                && node_cost == candidate.cost
                && node_actor_id < candidate.actor
            {
                return false;
            }

            return true;
        }

        false
    }

    // ------------------------------------------------------------------
    // Distance limits
    // ------------------------------------------------------------------

    /// Turn-horizon cutoffs. Exchange eligibility is bounded separately by
    /// the chain turn; expansion itself may run past it so the final pass
    /// has seeds to extend. Scouts have their own short leash, and
    /// everything is bounded by the scan-depth horizon when one is set.
    pub(crate) fn is_distance_limit_reached(&self, actor: ActorId, turns: u8) -> bool {
        let role = self.actors.get(actor).hero_role;

        if role == HeroRole::Scout && turns > self.settings.scout_turn_distance_limit {
            return true;
        }

        if let Some(limit) = self.settings.main_turn_distance_limit {
            if turns > limit {
                return true;
            }
        }

        false
    }

    // ------------------------------------------------------------------
    // Path extraction
    // ------------------------------------------------------------------

    /// Every settled way to reach a tile, one path per hero-bearing chain.
    pub fn get_chain_info(&self, env: GameEnv<'_>, pos: Coord, is_on_land: bool) -> Vec<AiPath> {
        let layer = if is_on_land { Layer::Land } else { Layer::Sail };
        let mut paths = Vec::new();

        for idx in self.slots(pos, layer) {
            let node = &self.nodes[idx];

            let Some(actor_id) = node.actor else {
                continue;
            };

            if !node.is_reached() {
                continue;
            }

            let actor = self.actors.get(actor_id);

            let Some(hero) = actor.hero else {
                continue;
            };

            let danger = threat::tile_danger(env, pos, self.player);
            let army_value = actor.army_value;

            let mut path = AiPath {
                nodes: Vec::new(),
                target_hero: Some(hero),
                hero_army: actor.army.clone(),
                army_loss: node.army_loss,
                target_object_danger: danger,
                target_object_army_loss: threat::evaluate_army_loss(
                    actor.hero_fighting_strength,
                    army_value,
                    danger,
                ),
                chain_mask: actor.chain_mask,
                exchange_count: actor.actor_exchange_count,
                hero_fighting_strength: actor.hero_fighting_strength,
                hero_army_value: army_value,
            };

            self.fill_chain_info(Some(idx), &mut path, -1);

            paths.push(path);
        }

        paths
    }

    fn fill_chain_info(&self, start: Option<usize>, path: &mut AiPath, mut parent_index: i32) {
        let mut current = start;

        while let Some(idx) = current {
            let node = &self.nodes[idx];

            let Some(actor_id) = node.actor else {
                return;
            };

            let actor = self.actors.get(actor_id);

            let Some(hero) = actor.hero else {
                return;
            };

            if let Some(other) = node.chain_other {
                self.fill_chain_info(Some(other), path, parent_index);
            }

            let action_is_blocked = node.special.map(|s| !s.can_act()).unwrap_or(false);

            path.nodes.push(AiPathNodeInfo {
                coord: node.coord,
                turns: node.turns,
                cost: node.cost,
                danger: node.danger,
                chain_mask: actor.chain_mask,
                hero,
                special: node.special,
                parent_index,
                action_is_blocked,
            });

            parent_index = (path.nodes.len() - 1) as i32;
            current = node.prev;
        }
    }

    /// Whether the hero can reach the tile at all.
    pub fn is_tile_accessible(&self, hero: HeroId, pos: Coord, layer: Layer) -> bool {
        self.slots(pos, layer).any(|idx| {
            let node = &self.nodes[idx];

            node.is_reached()
                && node
                    .actor
                    .map(|a| self.actors.get(a).hero == Some(hero))
                    .unwrap_or(false)
        })
    }
}
