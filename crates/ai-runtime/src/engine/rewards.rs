//! Per-object-kind reward tables feeding the fuzzy evaluator.

use strategy_core::{
    Artifact, ArtifactClass, GameConstants, GameEnv, Hero, HeroRole, MapObject, ObjectKind,
    PlayerId, PlayerRelation, ResourceKind,
};

use crate::analyzers::{DangerHitMap, HeroManager};
use crate::pathfinding::threat;

/// Daily income is valued at this many days up front.
const DAILY_INCOME_MULTIPLIER: i64 = 5;
const ENEMY_ARMY_ELIMINATION_REWARD_RATIO: f64 = 0.5;
const ENEMY_ARMY_ELIMINATION_GOLD_RATIO: f64 = 0.2;
const ENEMY_HERO_ELIMINATION_SKILL_RATIO: f32 = 0.5;

fn is_enemy(env: GameEnv<'_>, player: PlayerId, object: &MapObject) -> bool {
    env.world().relation(player, object.owner_or_neutral()) == PlayerRelation::Enemy
}

/// Approximate gold gained by visiting the object.
pub fn gold_reward(env: GameEnv<'_>, player: PlayerId, object: &MapObject) -> i64 {
    match &object.kind {
        ObjectKind::Resource(kind) => {
            if *kind == ResourceKind::Gold {
                600
            } else {
                100
            }
        }
        ObjectKind::TreasureChest | ObjectKind::SeaChest => 1500,
        ObjectKind::WaterWheel => 1000,
        ObjectKind::Town => DAILY_INCOME_MULTIPLIER * estimate_town_income(env, player, object),
        ObjectKind::Mine(kind) => {
            DAILY_INCOME_MULTIPLIER * if *kind == ResourceKind::Gold { 1000 } else { 75 }
        }
        // Cleared abandoned mines produce gold.
        ObjectKind::AbandonedMine => DAILY_INCOME_MULTIPLIER * 1000,
        ObjectKind::MysticalGarden | ObjectKind::Windmill | ObjectKind::Wagon => 100,
        ObjectKind::Campfire => 800,
        ObjectKind::CreatureBank { gold_reward, .. } => *gold_reward,
        ObjectKind::Crypt | ObjectKind::DerelictShip => 3000,
        ObjectKind::DragonUtopia => 10000,
        ObjectKind::Hero(hero_id) => {
            if !is_enemy(env, player, object) {
                return 0;
            }

            let army_cost = env
                .world()
                .hero(*hero_id)
                .map(|h| army_gold_cost(env, &h))
                .unwrap_or(0);

            i64::from(GameConstants::HERO_GOLD_COST / 2)
                + (ENEMY_ARMY_ELIMINATION_GOLD_RATIO * army_cost as f64) as i64
        }
        _ => 0,
    }
}

fn army_gold_cost(env: GameEnv<'_>, hero: &Hero) -> i64 {
    hero.army
        .slots()
        .iter()
        .filter_map(|slot| {
            env.creatures()
                .creature(slot.creature)
                .map(|c| c.cost[ResourceKind::Gold] * i64::from(slot.count))
        })
        .sum()
}

fn estimate_town_income(env: GameEnv<'_>, player: PlayerId, object: &MapObject) -> i64 {
    if !is_enemy(env, player, object) {
        // Already ours; visiting adds nothing.
        return 0;
    }

    let neutral = object.owner_or_neutral().is_neutral();
    let developed = env
        .world()
        .towns(object.owner_or_neutral())
        .iter()
        .find(|t| t.id == object.id)
        .map(|t| t.has_fort)
        .unwrap_or(false);

    if !neutral && developed { 1500 } else { 500 }
}

/// Approximate combat value gained by visiting the object.
pub fn army_reward(
    env: GameEnv<'_>,
    player: PlayerId,
    object: &MapObject,
    check_gold: bool,
) -> u64 {
    match &object.kind {
        ObjectKind::Town => {
            if object.owner_or_neutral().is_neutral() {
                1000
            } else {
                10000
            }
        }
        ObjectKind::CreatureBank { army_reward, .. } => *army_reward,
        ObjectKind::Dwelling => dwelling_score(env, player, object, check_gold),
        ObjectKind::Crypt
        | ObjectKind::Shipwreck
        | ObjectKind::ShipwreckSurvivor
        | ObjectKind::WarriorsTomb => 1500,
        ObjectKind::Artifact(artifact) => evaluate_artifact_army_value(artifact),
        ObjectKind::DragonUtopia => 10000,
        ObjectKind::Hero(hero_id) => {
            if !is_enemy(env, player, object) {
                return 0;
            }

            env.world()
                .hero(*hero_id)
                .map(|h| (threat::hero_strength(env, &h) as f64
                    * ENEMY_ARMY_ELIMINATION_REWARD_RATIO) as u64)
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn dwelling_score(
    env: GameEnv<'_>,
    player: PlayerId,
    object: &MapObject,
    check_gold: bool,
) -> u64 {
    let Some(dwelling) = env.world().dwelling(object.id) else {
        return 0;
    };

    let available = env.world().resources(player);
    let mut score = 0;

    for &(creature_id, count) in &dwelling.available {
        if count == 0 {
            continue;
        }

        let Some(creature) = env.creatures().creature(creature_id) else {
            continue;
        };

        if check_gold && !available.can_afford(&creature.cost.scaled(count)) {
            continue;
        }

        score += creature.ai_value * u64::from(count);
    }

    score
}

/// Worth of an artifact: weighted stat bonuses, floored by its class band.
pub fn evaluate_artifact_army_value(artifact: &Artifact) -> u64 {
    if artifact.is_spell_scroll {
        return 1500;
    }

    // Defence is intentionally weighted twice.
    let stats_value = 4 * artifact.land_movement
        + 700 * artifact.morale
        + 700 * artifact.attack
        + 700 * artifact.defence
        + 700 * artifact.knowledge
        + 700 * artifact.spell_power
        + 700 * artifact.defence
        + 500 * artifact.luck;

    let class_value = match artifact.class {
        Some(ArtifactClass::Minor) => 1000,
        Some(ArtifactClass::Major) => 3000,
        Some(ArtifactClass::Relic) | Some(ArtifactClass::Special) => 8000,
        None => 0,
    };

    stats_value.max(class_value).max(0) as u64
}

/// How much the object advances skills, weighted by hero role.
pub fn skill_reward(
    env: GameEnv<'_>,
    player: PlayerId,
    object: &MapObject,
    hero: &Hero,
    role: HeroRole,
    heroes: &HeroManager,
) -> f32 {
    match &object.kind {
        ObjectKind::SkillTrainer => 1.0,
        ObjectKind::Arena => 2.0,
        ObjectKind::Library => 8.0,
        ObjectKind::WitchHut { skill, revealed } => {
            if !revealed {
                return if role == HeroRole::Scout { 2.0 } else { 0.0 };
            }

            if hero.skill_level(*skill) != strategy_core::SkillLevel::None
                || !hero.has_free_skill_slot()
            {
                return 0.0;
            }

            let score = heroes.evaluate_secondary_skill(hero, *skill);

            if score >= 2.0 {
                if role == HeroRole::Main { 10.0 } else { 4.0 }
            } else {
                score
            }
        }
        ObjectKind::Hero(hero_id) => {
            if !is_enemy(env, player, object) {
                return 0.0;
            }

            env.world()
                .hero(*hero_id)
                .map(|h| ENEMY_HERO_ELIMINATION_SKILL_RATIO * h.level as f32)
                .unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

/// Long-term worth beyond immediate rewards.
pub fn strategic_value(
    env: GameEnv<'_>,
    player: PlayerId,
    object: &MapObject,
    hitmap: &DangerHitMap,
) -> f32 {
    match &object.kind {
        ObjectKind::Town => {
            if object.owner_or_neutral().is_neutral() {
                0.5
            } else {
                1.0
            }
        }
        ObjectKind::Hero(hero_id) => {
            if !is_enemy(env, player, object) {
                return 0.0;
            }

            enemy_hero_strategic_value(env, player, *hero_id, hitmap)
        }
        _ => 0.0,
    }
}

/// An enemy hero is worth half of the best thing it threatens, plus its
/// levels. Nested enemy heroes are not recursed into.
fn enemy_hero_strategic_value(
    env: GameEnv<'_>,
    player: PlayerId,
    hero_id: strategy_core::HeroId,
    hitmap: &DangerHitMap,
) -> f32 {
    let mut object_value: f32 = 0.0;

    for &threatened in hitmap.one_turn_accessible_objects(hero_id) {
        let Some(object) = env.world().object(threatened) else {
            continue;
        };

        if matches!(object.kind, ObjectKind::Hero(_)) {
            continue;
        }

        object_value = object_value.max(strategic_value(env, player, &object, hitmap));
    }

    let level = env.world().hero(hero_id).map(|h| h.level).unwrap_or(0);

    object_value / 2.0 + level as f32 / 15.0
}
