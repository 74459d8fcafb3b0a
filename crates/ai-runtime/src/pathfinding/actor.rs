use std::collections::HashMap;

use strategy_core::{Coord, CreatureSet, GameEnv, Hero, HeroId, HeroRole, Layer};

use crate::analyzers::ArmyManager;

/// Permission variants of a hero actor beyond the base one. Bit layout of
/// the variant index: `(battle, cast, resource)` in bits 0..=2.
pub const SPECIAL_ACTORS_COUNT: usize = 7;

/// Index into the per-turn actor arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActorId(pub u32);

/// A pathfinding identity: one hero (or immobile army source), its merged
/// army and the permission profile it searches under.
#[derive(Clone, Debug)]
pub struct ChainActor {
    pub hero: Option<HeroId>,
    pub hero_role: HeroRole,
    pub army: CreatureSet,
    pub army_value: u64,
    pub initial_position: Coord,
    pub initial_turn: u8,
    pub initial_movement: u32,
    pub layer: Layer,
    /// One bit per primitive actor in this chain; composites OR their
    /// parents' masks.
    pub chain_mask: u64,
    /// Variant index within the hero's 8-actor block.
    pub permission_bits: u8,
    pub base_actor: ActorId,
    pub battle_actor: ActorId,
    pub cast_actor: ActorId,
    pub resource_actor: ActorId,
    pub allow_battle: bool,
    pub allow_spell_cast: bool,
    pub allow_use_resources: bool,
    pub carrier_parent: Option<ActorId>,
    pub other_parent: Option<ActorId>,
    /// Number of primitive actors merged into this chain.
    pub actor_exchange_count: u32,
    pub is_movable: bool,
    pub hero_exp: u64,
    pub hero_fighting_strength: f64,
    max_movement_land: u32,
    max_movement_sail: u32,
}

impl ChainActor {
    pub fn max_move_points(&self, layer: Layer) -> u32 {
        match layer {
            Layer::Sail => self.max_movement_sail,
            _ => self.max_movement_land,
        }
    }
}

/// Per-turn arena of chain actors with the exchange memo tables.
///
/// Actors never move or die within a turn, so everything references them by
/// index. A hero's 8 permission variants occupy consecutive slots starting
/// at its base actor.
#[derive(Debug, Default)]
pub struct ActorArena {
    actors: Vec<ChainActor>,
    exchange_memo: HashMap<(ActorId, ActorId), ActorId>,
    can_exchange_memo: HashMap<(ActorId, ActorId), bool>,
}

impl ActorArena {
    pub fn clear(&mut self) {
        self.actors.clear();
        self.exchange_memo.clear();
        self.can_exchange_memo.clear();
    }

    pub fn get(&self, id: ActorId) -> &ChainActor {
        &self.actors[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn iter_ids(&self) -> impl Iterator<Item = ActorId> {
        (0..self.actors.len() as u32).map(ActorId)
    }

    /// Base actors only, in creation order: one per permission block.
    pub fn base_actors(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.actors
            .iter()
            .enumerate()
            .filter(|(i, a)| a.base_actor.0 as usize == *i)
            .map(|(i, _)| ActorId(i as u32))
    }

    /// The registered starting actors (heroes, garrisons), excluding
    /// composites synthesized by exchanges.
    pub fn primitive_actors(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.base_actors()
            .filter(|&id| self.get(id).actor_exchange_count == 1)
    }

    fn variant(base: ActorId, bits: u8) -> ActorId {
        ActorId(base.0 + u32::from(bits))
    }

    /// Creates a hero actor and its 8 permission variants; returns the base.
    pub fn add_hero_actor(
        &mut self,
        env: GameEnv<'_>,
        hero: &Hero,
        role: HeroRole,
        chain_mask: u64,
    ) -> ActorId {
        let base = ActorId(self.actors.len() as u32);
        let army_value = hero.army.power(env.creatures());

        for bits in 0..=(SPECIAL_ACTORS_COUNT as u8) {
            self.actors.push(ChainActor {
                hero: Some(hero.id),
                hero_role: role,
                army: hero.army.clone(),
                army_value,
                initial_position: hero.position,
                initial_turn: 0,
                initial_movement: hero.movement,
                layer: hero.layer(),
                chain_mask,
                permission_bits: bits,
                base_actor: base,
                battle_actor: Self::variant(base, bits | 1),
                cast_actor: Self::variant(base, bits | 2),
                resource_actor: Self::variant(base, bits | 4),
                allow_battle: bits & 1 != 0,
                allow_spell_cast: bits & 2 != 0,
                allow_use_resources: bits & 4 != 0,
                carrier_parent: None,
                other_parent: None,
                actor_exchange_count: 1,
                is_movable: true,
                hero_exp: hero.experience,
                hero_fighting_strength: hero.fighting_strength(),
                max_movement_land: hero.max_movement_land,
                max_movement_sail: hero.max_movement_sail,
            });
        }

        base
    }

    /// Creates an immobile army source (town garrison or hill fort).
    pub fn add_garrison_actor(
        &mut self,
        env: GameEnv<'_>,
        position: Coord,
        army: CreatureSet,
        chain_mask: u64,
    ) -> ActorId {
        let id = ActorId(self.actors.len() as u32);
        let army_value = army.power(env.creatures());

        self.actors.push(ChainActor {
            hero: None,
            hero_role: HeroRole::Scout,
            army,
            army_value,
            initial_position: position,
            initial_turn: 0,
            initial_movement: 0,
            layer: Layer::Land,
            chain_mask,
            permission_bits: 0,
            base_actor: id,
            battle_actor: id,
            cast_actor: id,
            resource_actor: id,
            allow_battle: false,
            allow_spell_cast: false,
            allow_use_resources: false,
            carrier_parent: None,
            other_parent: None,
            actor_exchange_count: 1,
            is_movable: false,
            hero_exp: 0,
            hero_fighting_strength: 1.0,
            max_movement_land: 0,
            max_movement_sail: 0,
        });

        id
    }

    /// Whether merging `other` into `actor` is worth a chain: masks must be
    /// disjoint and the reinforcement must beat both a tenth of the
    /// carrier's army and an absolute floor. Memoized per base pair.
    pub fn can_exchange(&mut self, env: GameEnv<'_>, actor: ActorId, other: ActorId) -> bool {
        if !self.get(actor).is_movable {
            return false;
        }

        let key = (self.get(actor).base_actor, self.get(other).base_actor);

        if let Some(&cached) = self.can_exchange_memo.get(&key) {
            return cached;
        }

        let a = self.get(key.0);
        let b = self.get(key.1);

        let result = a.chain_mask & b.chain_mask == 0 && {
            let reinforcement = ArmyManager::how_many_reinforcements_can_get(env, &a.army, &b.army);

            reinforcement > (a.army_value / 10).max(1000)
        };

        self.can_exchange_memo.insert(key, result);
        result
    }

    /// Merged actor for `carrier ⊕ other`, memoized per base pair. The
    /// returned variant carries the carrier's permission bits.
    pub fn exchange(&mut self, env: GameEnv<'_>, carrier: ActorId, other: ActorId) -> ActorId {
        let bits = self.get(carrier).permission_bits;
        let key = (self.get(carrier).base_actor, self.get(other).base_actor);

        if let Some(&base) = self.exchange_memo.get(&key) {
            return Self::variant(base, bits);
        }

        let base = self.create_exchanged(env, key.0, key.1);
        self.exchange_memo.insert(key, base);

        Self::variant(base, bits)
    }

    fn create_exchanged(
        &mut self,
        env: GameEnv<'_>,
        carrier_base: ActorId,
        other_base: ActorId,
    ) -> ActorId {
        let carrier = self.get(carrier_base).clone();
        let other = self.get(other_base).clone();

        let merged = ArmyManager::get_best_army(env, &carrier.army, &other.army);
        let army = ArmyManager::to_creature_set(&merged);
        let army_value: u64 = merged.iter().map(|s| s.power).sum();

        let base = ActorId(self.actors.len() as u32);

        for bits in 0..=(SPECIAL_ACTORS_COUNT as u8) {
            self.actors.push(ChainActor {
                hero: carrier.hero,
                hero_role: carrier.hero_role,
                army: army.clone(),
                army_value,
                initial_position: carrier.initial_position,
                initial_turn: carrier.initial_turn,
                initial_movement: carrier.initial_movement,
                layer: carrier.layer,
                chain_mask: carrier.chain_mask | other.chain_mask,
                permission_bits: bits,
                base_actor: base,
                battle_actor: Self::variant(base, bits | 1),
                cast_actor: Self::variant(base, bits | 2),
                resource_actor: Self::variant(base, bits | 4),
                allow_battle: bits & 1 != 0,
                allow_spell_cast: bits & 2 != 0,
                allow_use_resources: bits & 4 != 0,
                carrier_parent: Some(carrier_base),
                other_parent: Some(other_base),
                actor_exchange_count: carrier.actor_exchange_count + other.actor_exchange_count,
                is_movable: true,
                hero_exp: carrier.hero_exp,
                hero_fighting_strength: carrier.hero_fighting_strength,
                max_movement_land: carrier.max_movement_land,
                max_movement_sail: carrier.max_movement_sail,
            });
        }

        base
    }
}
