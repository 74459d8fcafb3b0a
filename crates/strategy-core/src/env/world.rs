use crate::state::{
    Date, Dwelling, Hero, HeroId, MapObject, ObjectId, PlayerId, PlayerRelation, Resources, Town,
};

/// Object- and player-level view of the game, provided by the game engine.
///
/// Lookups return owned snapshots; the AI rebuilds its caches every pass, so
/// borrowing from the host across suspension points is never needed.
pub trait WorldOracle {
    fn object(&self, id: ObjectId) -> Option<MapObject>;

    /// All visitable objects inside the player's fog of war.
    fn visitable_objects(&self, player: PlayerId) -> Vec<ObjectId>;

    fn hero(&self, id: HeroId) -> Option<Hero>;

    fn heroes(&self, player: PlayerId) -> Vec<Hero>;

    /// Visible heroes of players hostile to `player`.
    fn enemy_heroes(&self, player: PlayerId) -> Vec<Hero>;

    fn towns(&self, player: PlayerId) -> Vec<Town>;

    fn dwellings(&self, player: PlayerId) -> Vec<Dwelling>;

    fn dwelling(&self, id: ObjectId) -> Option<Dwelling>;

    fn relation(&self, a: PlayerId, b: PlayerId) -> PlayerRelation;

    fn resources(&self, player: PlayerId) -> Resources;

    fn date(&self) -> Date;

    /// Whether the hero currently satisfies the quest gating `object`.
    fn quest_satisfied(&self, object: ObjectId, hero: &Hero) -> bool;
}
