use std::collections::HashMap;

use strategy_core::{GameEnv, Hero, HeroId, HeroRole, PlayerId, SecondarySkill, SkillLevel};

/// One rule of a skill evaluator; rules run in order and adjust the score.
trait SkillScoreRule: Send + Sync {
    fn evaluate(&self, hero: &Hero, skill: SecondarySkill, score: &mut f32);
}

struct SkillScoreMap(HashMap<SecondarySkill, f32>);

impl SkillScoreRule for SkillScoreMap {
    fn evaluate(&self, _hero: &Hero, skill: SecondarySkill, score: &mut f32) {
        if let Some(value) = self.0.get(&skill) {
            *score = *value;
        }
    }
}

/// Boosts skills the hero is close to finishing; learning yet another skill
/// from scratch is rarely worth a slot.
struct ExistingSkillRule;

impl SkillScoreRule for ExistingSkillRule {
    fn evaluate(&self, hero: &Hero, skill: SecondarySkill, score: &mut f32) {
        let mut upgrades_left = 0u32;

        for &(known, level) in &hero.secondary_skills {
            if known == skill {
                return;
            }

            upgrades_left += u32::from(level.upgrades_left());
        }

        if *score >= 2.0 || (*score >= 1.0 && upgrades_left <= 1) {
            *score += 1.5;
        }
    }
}

/// A high-level hero without wisdom is locked out of its best spells.
struct WisdomRule;

impl SkillScoreRule for WisdomRule {
    fn evaluate(&self, hero: &Hero, skill: SecondarySkill, score: &mut f32) {
        if skill != SecondarySkill::Wisdom {
            return;
        }

        if hero.level > 10 && hero.skill_level(SecondarySkill::Wisdom) == SkillLevel::None {
            *score += 1.5;
        }
    }
}

struct AtLeastOneMagicRule;

impl SkillScoreRule for AtLeastOneMagicRule {
    fn evaluate(&self, hero: &Hero, skill: SecondarySkill, score: &mut f32) {
        if !SecondarySkill::MAGIC_SCHOOLS.contains(&skill) {
            return;
        }

        let has_any_magic = SecondarySkill::MAGIC_SCHOOLS
            .iter()
            .any(|school| hero.skill_level(*school) > SkillLevel::None);

        if !has_any_magic {
            *score += 1.0;
        }
    }
}

struct SkillEvaluator {
    rules: Vec<Box<dyn SkillScoreRule>>,
}

impl SkillEvaluator {
    fn evaluate_skill(&self, hero: &Hero, skill: SecondarySkill) -> f32 {
        let mut score = 0.0;

        for rule in &self.rules {
            rule.evaluate(hero, skill, &mut score);
        }

        score
    }

    fn evaluate_all(&self, hero: &Hero) -> f32 {
        hero.secondary_skills
            .iter()
            .map(|&(skill, level)| level as u8 as f32 * self.evaluate_skill(hero, skill))
            .sum()
    }
}

fn warrior_evaluator() -> SkillEvaluator {
    use SecondarySkill::*;

    let scores = HashMap::from([
        (Diplomacy, 2.0),
        (Logistics, 2.0),
        (EarthMagic, 2.0),
        (Armorer, 2.0),
        (Offence, 2.0),
        (AirMagic, 1.0),
        (Wisdom, 1.0),
        (Leadership, 1.0),
        (Intelligence, 1.0),
        (Resistance, 1.0),
        (Mysticism, -1.0),
        (Sorcery, -1.0),
        (Estates, -1.0),
        (FirstAid, -1.0),
        (Learning, -1.0),
        (Scholar, -1.0),
        (EagleEye, -1.0),
        (Navigation, -1.0),
    ]);

    SkillEvaluator {
        rules: vec![
            Box::new(SkillScoreMap(scores)),
            Box::new(ExistingSkillRule),
            Box::new(WisdomRule),
            Box::new(AtLeastOneMagicRule),
        ],
    }
}

fn scout_evaluator() -> SkillEvaluator {
    use SecondarySkill::*;

    let scores = HashMap::from([
        (Logistics, 2.0),
        (Estates, 2.0),
        (Pathfinding, 1.0),
        (Scholar, 1.0),
    ]);

    SkillEvaluator {
        rules: vec![Box::new(SkillScoreMap(scores)), Box::new(ExistingSkillRule)],
    }
}

/// Classifies owned heroes into MAIN and SCOUT and scores skill choices.
pub struct HeroManager {
    roles: HashMap<HeroId, HeroRole>,
    warrior_skills: SkillEvaluator,
    scout_skills: SkillEvaluator,
}

impl Default for HeroManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HeroManager {
    pub fn new() -> Self {
        Self {
            roles: HashMap::new(),
            warrior_skills: warrior_evaluator(),
            scout_skills: scout_evaluator(),
        }
    }

    /// Re-ranks heroes: the strongest third (rounded up) become MAIN.
    pub fn update(&mut self, env: GameEnv<'_>, player: PlayerId) {
        tracing::trace!("start analysing our heroes");

        let mut heroes = env.world().heroes(player);
        let mut scores: HashMap<HeroId, f32> = HashMap::new();

        for hero in &heroes {
            scores.insert(hero.id, self.evaluate_fighting_strength(hero));
        }

        heroes.sort_by(|a, b| {
            scores[&b.id]
                .total_cmp(&scores[&a.id])
                .then(a.id.cmp(&b.id))
        });

        self.roles.clear();
        let mut main_count = (heroes.len() + 2) / 3;

        for hero in &heroes {
            let role = if main_count > 0 {
                main_count -= 1;
                HeroRole::Main
            } else {
                HeroRole::Scout
            };

            tracing::trace!(hero = hero.id.0, ?role, "hero role assigned");
            self.roles.insert(hero.id, role);
        }
    }

    /// Role of the hero; heroes missed by the last update default to SCOUT.
    pub fn role(&self, hero: HeroId) -> HeroRole {
        self.roles.get(&hero).copied().unwrap_or(HeroRole::Scout)
    }

    pub fn evaluate_secondary_skill(&self, hero: &Hero, skill: SecondarySkill) -> f32 {
        match self.role(hero.id) {
            HeroRole::Main => self.warrior_skills.evaluate_skill(hero, skill),
            HeroRole::Scout => self.scout_skills.evaluate_skill(hero, skill),
        }
    }

    /// Index of the best skill among those offered (level-up or witch hut).
    pub fn select_best_skill(&self, hero: &Hero, offered: &[SecondarySkill]) -> Option<usize> {
        let evaluator = match self.role(hero.id) {
            HeroRole::Main => &self.warrior_skills,
            HeroRole::Scout => &self.scout_skills,
        };

        offered
            .iter()
            .enumerate()
            .map(|(i, &skill)| (i, evaluator.evaluate_skill(hero, skill)))
            .max_by(|a, b| a.1.total_cmp(&b.1).then(b.0.cmp(&a.0)))
            .map(|(i, _)| i)
    }

    pub fn evaluate_fighting_strength(&self, hero: &Hero) -> f32 {
        self.evaluate_speciality(hero) + self.warrior_skills.evaluate_all(hero)
            + hero.level as f32 * 1.5
    }

    /// Hook for hero specialities; the oracle surface has no speciality data
    /// yet, so this contributes nothing for now.
    fn evaluate_speciality(&self, _hero: &Hero) -> f32 {
        0.0
    }
}
