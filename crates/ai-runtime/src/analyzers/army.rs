use std::collections::HashMap;

use strategy_core::{
    CreatureId, CreatureSet, Dwelling, GameConstants, GameEnv, PlayerId, Resources, SlotInfo,
};

/// A purchase candidate at a dwelling: what to buy and what it is worth.
#[derive(Clone, Copy, Debug)]
pub struct CreaturePurchase {
    pub creature: CreatureId,
    pub count: u32,
    pub cost: Resources,
    pub ai_value: u64,
}

/// Pure army arithmetic plus a per-turn cache of everything we could field.
#[derive(Debug, Default)]
pub struct ArmyManager {
    total_army: HashMap<CreatureId, SlotInfo>,
}

impl ArmyManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the total-army cache from all owned heroes and towns.
    pub fn update(&mut self, env: GameEnv<'_>, player: PlayerId) {
        tracing::trace!("start analysing army");

        self.total_army.clear();

        let heroes = env.world().heroes(player);
        let towns = env.world().towns(player);
        let armies = heroes
            .iter()
            .map(|h| &h.army)
            .chain(towns.iter().map(|t| &t.garrison));

        for army in armies {
            for slot in army.slots() {
                let entry = self.total_army.entry(slot.creature).or_insert(SlotInfo {
                    creature: slot.creature,
                    count: 0,
                    power: 0,
                });
                entry.count += slot.count;
            }
        }

        for info in self.total_army.values_mut() {
            if let Some(creature) = env.creatures().creature(info.creature) {
                info.power = creature.ai_value * info.count as u64;
            }
        }
    }

    pub fn total_creatures_available(&self, creature: CreatureId) -> SlotInfo {
        self.total_army.get(&creature).copied().unwrap_or(SlotInfo {
            creature,
            count: 0,
            power: 0,
        })
    }

    /// Unions both armies per creature type and sorts by power, descending.
    fn sorted_slots(env: GameEnv<'_>, target: &CreatureSet, source: &CreatureSet) -> Vec<SlotInfo> {
        let mut by_creature: HashMap<CreatureId, SlotInfo> = HashMap::new();

        for army in [target, source] {
            for slot in army.slots() {
                let ai_value = env
                    .creatures()
                    .creature(slot.creature)
                    .map(|c| c.ai_value)
                    .unwrap_or(0);
                let entry = by_creature.entry(slot.creature).or_insert(SlotInfo {
                    creature: slot.creature,
                    count: 0,
                    power: 0,
                });
                entry.count += slot.count;
                entry.power += ai_value * slot.count as u64;
            }
        }

        let mut result: Vec<SlotInfo> = by_creature.into_values().collect();
        // Secondary key keeps the order stable when powers tie.
        result.sort_by(|a, b| b.power.cmp(&a.power).then(a.creature.cmp(&b.creature)));
        result
    }

    /// The strongest army assemblable from both sets, at most
    /// [`GameConstants::ARMY_SIZE`] stacks. If the source must keep a rear
    /// guard and everything fits, one unit of the weakest stack stays behind.
    pub fn get_best_army(
        env: GameEnv<'_>,
        target: &CreatureSet,
        source: &CreatureSet,
    ) -> Vec<SlotInfo> {
        let mut army = Self::sorted_slots(env, target, source);

        if army.len() > GameConstants::ARMY_SIZE {
            army.truncate(GameConstants::ARMY_SIZE);
        } else if source.needs_last_stack && !army.is_empty() {
            let weakest = Self::weakest_stack_index(env, &army);
            let slot = &mut army[weakest];

            if slot.count == 1 {
                army.remove(weakest);
            } else {
                slot.power -= slot.power / slot.count as u64;
                slot.count -= 1;
            }
        }

        army
    }

    /// Weakest stack: lowest level, ties broken by higher speed.
    fn weakest_stack_index(env: GameEnv<'_>, army: &[SlotInfo]) -> usize {
        let mut weakest = 0;

        for (i, slot) in army.iter().enumerate().skip(1) {
            let (Some(cur), Some(best)) = (
                env.creatures().creature(slot.creature),
                env.creatures().creature(army[weakest].creature),
            ) else {
                continue;
            };

            if cur.level < best.level || (cur.level == best.level && cur.speed > best.speed) {
                weakest = i;
            }
        }

        weakest
    }

    /// Power gained by the target from merging in the source army.
    pub fn how_many_reinforcements_can_get(
        env: GameEnv<'_>,
        target: &CreatureSet,
        source: &CreatureSet,
    ) -> u64 {
        let merged: u64 = Self::get_best_army(env, target, source)
            .iter()
            .map(|s| s.power)
            .sum();
        let current = target.power(env.creatures());

        merged.saturating_sub(current)
    }

    pub fn can_get_army(
        env: GameEnv<'_>,
        target_owner: PlayerId,
        source_owner: PlayerId,
        target: &CreatureSet,
        source: &CreatureSet,
    ) -> bool {
        if target_owner != source_owner {
            tracing::error!("army exchange requested between different players");
            return false;
        }

        Self::how_many_reinforcements_can_get(env, target, source) > 0
    }

    /// What the hero could buy at the dwelling right now: walks tiers from
    /// top to bottom, constrained by free slots and remaining resources.
    pub fn get_army_available_to_buy(
        env: GameEnv<'_>,
        hero_army: &CreatureSet,
        dwelling: &Dwelling,
        mut available: Resources,
    ) -> Vec<CreaturePurchase> {
        let mut purchases = Vec::new();
        let mut free_slots = GameConstants::ARMY_SIZE - hero_army.stacks_count();

        for &(creature_id, stock) in dwelling.available.iter().rev() {
            if stock == 0 {
                continue;
            }

            let Some(creature) = env.creatures().creature(creature_id) else {
                continue;
            };

            if !hero_army.contains(creature_id) {
                if free_slots == 0 {
                    continue;
                }
                free_slots -= 1;
            }

            let affordable = available.purchasable_count(&creature.cost);
            let count = stock.min(affordable);

            if count == 0 {
                continue;
            }

            let cost = creature.cost.scaled(count);
            available -= cost;

            purchases.push(CreaturePurchase {
                creature: creature_id,
                count,
                cost,
                ai_value: creature.ai_value * count as u64,
            });
        }

        purchases
    }

    /// Total combat value purchasable at the dwelling.
    pub fn how_many_reinforcements_can_buy(
        env: GameEnv<'_>,
        hero_army: &CreatureSet,
        dwelling: &Dwelling,
        available: Resources,
    ) -> u64 {
        Self::get_army_available_to_buy(env, hero_army, dwelling, available)
            .iter()
            .map(|p| p.ai_value)
            .sum()
    }

    /// Refits a merged slot list back into a creature set.
    pub fn to_creature_set(army: &[SlotInfo]) -> CreatureSet {
        let mut set = CreatureSet::new();
        for slot in army {
            set.add(slot.creature, slot.count);
        }
        set
    }
}
