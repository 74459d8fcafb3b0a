//! Danger and army-loss estimation.

use strategy_core::{Coord, GameEnv, Hero, ObjectKind, PlayerId, PlayerRelation};

/// Effective combat strength of a hero: army power scaled by the hero's
/// stat multiplier.
pub fn hero_strength(env: GameEnv<'_>, hero: &Hero) -> u64 {
    let army = hero.army.power(env.creatures()) as f64;

    (army * hero.fighting_strength()) as u64
}

/// Strongest force that must be beaten to take the tile: guards covering it
/// plus whatever hostile object sits on it.
pub fn tile_danger(env: GameEnv<'_>, tile: Coord, player: PlayerId) -> u64 {
    let mut danger = 0u64;

    for guard_id in env.map().guards_at(tile) {
        if let Some(guard) = env.world().object(guard_id) {
            danger = danger.max(guard.guard.power(env.creatures()));
        }
    }

    let Some(info) = env.map().tile(tile) else {
        return danger;
    };

    let Some(object) = info.object.and_then(|id| env.world().object(id)) else {
        return danger;
    };

    let hostile = env.world().relation(player, object.owner_or_neutral()) == PlayerRelation::Enemy;

    match object.kind {
        ObjectKind::Hero(hero_id) if hostile => {
            if let Some(hero) = env.world().hero(hero_id) {
                danger = danger.max(hero_strength(env, &hero));
            }
        }
        _ if hostile || object.owner.is_none() => {
            danger = danger.max(object.guard.power(env.creatures()));
        }
        _ => {}
    }

    danger
}

/// Expected combat losses when an army of `army_value` with the given stat
/// multiplier attacks a force of strength `danger`.
///
/// Losses grow quadratically as the enemy approaches parity, reaching the
/// full army at even strength, so a losing battle is never judged cheap.
pub fn evaluate_army_loss(fighting_strength: f64, army_value: u64, danger: u64) -> u64 {
    if danger == 0 || army_value == 0 {
        return 0;
    }

    let ours = army_value as f64 * fighting_strength.max(0.01);
    let ratio = danger as f64 / ours;
    let loss = army_value as f64 * ratio * ratio;

    loss.min(u64::MAX as f64) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_danger_means_no_loss() {
        assert_eq!(evaluate_army_loss(1.0, 10_000, 0), 0);
    }

    #[test]
    fn parity_consumes_the_whole_army() {
        assert!(evaluate_army_loss(1.0, 10_000, 10_000) >= 10_000);
    }

    #[test]
    fn weak_guard_costs_little() {
        let loss = evaluate_army_loss(1.0, 10_000, 1_000);
        assert!(loss < 10_000 / 50, "loss {loss} should be marginal");
    }

    #[test]
    fn stat_multiplier_reduces_losses() {
        let plain = evaluate_army_loss(1.0, 10_000, 5_000);
        let strong = evaluate_army_loss(1.5, 10_000, 5_000);
        assert!(strong < plain);
    }
}
