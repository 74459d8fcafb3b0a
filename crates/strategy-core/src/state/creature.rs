use arrayvec::ArrayVec;

use crate::config::GameConstants;
use crate::env::CreatureOracle;
use crate::state::Resources;

/// Identifier of a creature type in the game's bestiary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CreatureId(pub u32);

/// Static creature description from the bestiary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Creature {
    pub id: CreatureId,
    pub level: u8,
    pub speed: u8,
    /// Weekly growth in a dwelling of this creature.
    pub growth: u8,
    /// Combat worth of a single unit, as estimated by the game engine.
    pub ai_value: u64,
    pub cost: Resources,
}

/// One stack: a creature type and how many units of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CreatureSlot {
    pub creature: CreatureId,
    pub count: u32,
}

/// Merge intermediate: a stack annotated with its total combat power.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotInfo {
    pub creature: CreatureId,
    pub count: u32,
    pub power: u64,
}

type Slots = ArrayVec<CreatureSlot, { GameConstants::ARMY_SIZE }>;

/// An army: at most [`GameConstants::ARMY_SIZE`] non-empty stacks with
/// unique creature types.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreatureSet {
    slots: Slots,
    /// Armies that garrison an object must keep at least one unit behind.
    pub needs_last_stack: bool,
}

impl CreatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_last_stack(mut self) -> Self {
        self.needs_last_stack = true;
        self
    }

    /// Adds units to this army, merging into an existing stack of the same
    /// type. Returns `false` when a new stack would not fit.
    pub fn add(&mut self, creature: CreatureId, count: u32) -> bool {
        if count == 0 {
            return true;
        }

        if let Some(slot) = self.slots.iter_mut().find(|s| s.creature == creature) {
            slot.count += count;
            return true;
        }

        self.slots.try_push(CreatureSlot { creature, count }).is_ok()
    }

    pub fn slots(&self) -> &[CreatureSlot] {
        &self.slots
    }

    pub fn stacks_count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn has_free_slot(&self) -> bool {
        !self.slots.is_full()
    }

    pub fn contains(&self, creature: CreatureId) -> bool {
        self.slots.iter().any(|s| s.creature == creature)
    }

    /// Total combat power: Σ ai_value × count over all stacks. Stacks of
    /// unknown creature types contribute nothing.
    pub fn power(&self, creatures: &dyn CreatureOracle) -> u64 {
        self.slots
            .iter()
            .filter_map(|s| {
                creatures
                    .creature(s.creature)
                    .map(|c| c.ai_value * s.count as u64)
            })
            .sum()
    }
}

impl FromIterator<CreatureSlot> for CreatureSet {
    fn from_iter<I: IntoIterator<Item = CreatureSlot>>(iter: I) -> Self {
        let mut set = CreatureSet::new();
        for slot in iter {
            set.add(slot.creature, slot.count);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_merges_stacks_of_same_type() {
        let mut set = CreatureSet::new();
        assert!(set.add(CreatureId(1), 5));
        assert!(set.add(CreatureId(1), 3));

        assert_eq!(set.stacks_count(), 1);
        assert_eq!(set.slots()[0].count, 8);
    }

    #[test]
    fn add_rejects_eighth_unique_type() {
        let mut set = CreatureSet::new();
        for i in 0..GameConstants::ARMY_SIZE as u32 {
            assert!(set.add(CreatureId(i), 1));
        }

        assert!(!set.add(CreatureId(99), 1));
        assert_eq!(set.stacks_count(), GameConstants::ARMY_SIZE);
    }

    #[test]
    fn zero_count_is_ignored() {
        let mut set = CreatureSet::new();
        assert!(set.add(CreatureId(1), 0));
        assert!(set.is_empty());
    }
}
