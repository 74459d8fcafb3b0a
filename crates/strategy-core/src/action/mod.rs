use thiserror::Error;

use crate::state::{BuildingId, Coord, CreatureId, HeroId, ObjectId};

/// Outcome of asking the game engine to perform an action.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The objective was already satisfied; not a failure. The turn loop
    /// catches this and moves on to the next pass.
    #[error("goal already fulfilled")]
    GoalFulfilled,

    /// The engine refused the action; the turn ends to stay safe.
    #[error("action refused: {0}")]
    Execution(String),

    /// Cooperative cancellation was observed mid-task.
    #[error("turn interrupted")]
    Interrupted,
}

/// The action surface the AI drives. Implemented by the game host; every
/// accepted call mutates real game state.
pub trait ActionSink {
    /// Walks the hero along the given tiles, fighting anything on the way.
    fn move_hero(&mut self, hero: HeroId, path: &[Coord]) -> Result<(), TaskError>;

    fn visit_object(&mut self, hero: HeroId, object: ObjectId) -> Result<(), TaskError>;

    fn recruit_creatures(
        &mut self,
        source: ObjectId,
        hero: HeroId,
        creature: CreatureId,
        count: u32,
    ) -> Result<(), TaskError>;

    fn build(&mut self, town: ObjectId, building: BuildingId) -> Result<(), TaskError>;

    fn recruit_hero(&mut self, town: ObjectId) -> Result<(), TaskError>;

    fn cast_town_portal(&mut self, hero: HeroId, town: ObjectId) -> Result<(), TaskError>;

    /// Moves the whole visiting army into the town garrison.
    fn exchange_garrison(&mut self, hero: HeroId, town: ObjectId) -> Result<(), TaskError>;
}
