use std::ops::{Add, AddAssign, Index, IndexMut, Sub, SubAssign};

/// The seven tradeable resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Gold,
    Wood,
    Ore,
    Mercury,
    Sulfur,
    Crystal,
    Gems,
}

impl ResourceKind {
    pub const COUNT: usize = 7;

    pub const ALL: [ResourceKind; Self::COUNT] = [
        ResourceKind::Gold,
        ResourceKind::Wood,
        ResourceKind::Ore,
        ResourceKind::Mercury,
        ResourceKind::Sulfur,
        ResourceKind::Crystal,
        ResourceKind::Gems,
    ];

    fn index(self) -> usize {
        match self {
            ResourceKind::Gold => 0,
            ResourceKind::Wood => 1,
            ResourceKind::Ore => 2,
            ResourceKind::Mercury => 3,
            ResourceKind::Sulfur => 4,
            ResourceKind::Crystal => 5,
            ResourceKind::Gems => 6,
        }
    }
}

/// A resource amount vector. Components may go negative during accounting;
/// call [`Resources::positive`] to clamp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Resources([i64; ResourceKind::COUNT]);

impl Resources {
    pub const ZERO: Self = Self([0; ResourceKind::COUNT]);

    pub fn gold(amount: i64) -> Self {
        let mut res = Self::ZERO;
        res[ResourceKind::Gold] = amount;
        res
    }

    /// Clamps every component to be non-negative.
    pub fn positive(mut self) -> Self {
        for v in &mut self.0 {
            *v = (*v).max(0);
        }
        self
    }

    pub fn can_afford(&self, cost: &Resources) -> bool {
        self.0.iter().zip(cost.0.iter()).all(|(have, need)| have >= need)
    }

    /// How many times `cost` fits into this amount; unlimited components
    /// (zero cost) do not constrain the result.
    pub fn purchasable_count(&self, cost: &Resources) -> u32 {
        let mut limit = u32::MAX;

        for (have, need) in self.0.iter().zip(cost.0.iter()) {
            if *need > 0 {
                let times = (*have).max(0) / *need;
                limit = limit.min(times.min(u32::MAX as i64) as u32);
            }
        }

        if limit == u32::MAX { 0 } else { limit }
    }

    pub fn scaled(mut self, factor: u32) -> Self {
        for v in &mut self.0 {
            *v *= i64::from(factor);
        }
        self
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0)
    }
}

impl Index<ResourceKind> for Resources {
    type Output = i64;

    fn index(&self, kind: ResourceKind) -> &i64 {
        &self.0[kind.index()]
    }
}

impl IndexMut<ResourceKind> for Resources {
    fn index_mut(&mut self, kind: ResourceKind) -> &mut i64 {
        &mut self.0[kind.index()]
    }
}

impl Add for Resources {
    type Output = Resources;

    fn add(mut self, rhs: Resources) -> Resources {
        self += rhs;
        self
    }
}

impl AddAssign for Resources {
    fn add_assign(&mut self, rhs: Resources) {
        for (a, b) in self.0.iter_mut().zip(rhs.0.iter()) {
            *a += b;
        }
    }
}

impl Sub for Resources {
    type Output = Resources;

    fn sub(mut self, rhs: Resources) -> Resources {
        self -= rhs;
        self
    }
}

impl SubAssign for Resources {
    fn sub_assign(&mut self, rhs: Resources) {
        for (a, b) in self.0.iter_mut().zip(rhs.0.iter()) {
            *a -= b;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchasable_count_is_limited_by_scarcest_component() {
        let mut have = Resources::gold(1000);
        have[ResourceKind::Gems] = 3;

        let mut cost = Resources::gold(100);
        cost[ResourceKind::Gems] = 1;

        assert_eq!(have.purchasable_count(&cost), 3);
    }

    #[test]
    fn purchasable_count_of_free_cost_is_zero() {
        assert_eq!(Resources::gold(500).purchasable_count(&Resources::ZERO), 0);
    }

    #[test]
    fn positive_clamps_deficits() {
        let res = (Resources::gold(100) - Resources::gold(250)).positive();
        assert_eq!(res[ResourceKind::Gold], 0);
    }
}
