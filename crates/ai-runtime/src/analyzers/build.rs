use strategy_core::{BuildingInfo, GameEnv, ObjectId, PlayerId, ResourceKind, Resources};

/// Construction plan for one town: candidates ranked best-first.
#[derive(Clone, Debug)]
pub struct TownDevelopment {
    pub town: ObjectId,
    pub to_build: Vec<BuildingInfo>,
}

/// Aggregates what the towns want to build and what that will cost.
#[derive(Debug, Default)]
pub struct BuildAnalyzer {
    developments: Vec<TownDevelopment>,
    required_now: Resources,
    total_required: Resources,
    daily_income: Resources,
    gold_pressure: f32,
}

impl BuildAnalyzer {
    /// Above this pressure only income buildings are worth starting.
    pub const MAX_GOLD_PRESSURE: f32 = 0.3;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, env: GameEnv<'_>, player: PlayerId) {
        tracing::trace!("updating build analysis");

        self.developments.clear();
        self.required_now = Resources::ZERO;
        self.total_required = Resources::ZERO;
        self.daily_income = Resources::ZERO;

        for town in env.world().towns(player) {
            self.daily_income += town.daily_income;

            if town.buildable.is_empty() {
                continue;
            }

            let mut candidates = town.buildable.clone();
            candidates.sort_by(|a, b| {
                let a_value = a.daily_income[ResourceKind::Gold] as u64 + a.army_growth_value;
                let b_value = b.daily_income[ResourceKind::Gold] as u64 + b.army_growth_value;
                b_value
                    .cmp(&a_value)
                    .then(a.cost[ResourceKind::Gold].cmp(&b.cost[ResourceKind::Gold]))
            });

            self.required_now += candidates[0].cost;

            for candidate in &candidates {
                self.total_required += candidate.cost;
            }

            self.developments.push(TownDevelopment {
                town: town.id,
                to_build: candidates,
            });
        }

        let available = env.world().resources(player);
        let funds = available[ResourceKind::Gold] + 10 * self.daily_income[ResourceKind::Gold];
        self.gold_pressure = if funds <= 0 {
            1.0
        } else {
            self.required_now[ResourceKind::Gold] as f32 / funds as f32
        };

        tracing::trace!(gold_pressure = self.gold_pressure, "build analysis done");
    }

    pub fn developments(&self) -> &[TownDevelopment] {
        &self.developments
    }

    pub fn resources_required_now(&self) -> Resources {
        self.required_now
    }

    pub fn total_resources_required(&self) -> Resources {
        self.total_required
    }

    pub fn daily_income(&self) -> Resources {
        self.daily_income
    }

    pub fn gold_pressure(&self) -> f32 {
        self.gold_pressure
    }
}
