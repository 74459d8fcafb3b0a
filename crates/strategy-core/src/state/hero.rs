use crate::state::{Coord, CreatureSet, Layer, PlayerId};

/// Identifier of a hero instance on the adventure map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeroId(pub u32);

/// Role assigned by the hero analyzer: MAIN heroes carry the fighting
/// armies, SCOUT heroes grab loose objects and explore.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeroRole {
    Main,
    Scout,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpellId(pub u16);

impl SpellId {
    pub const TOWN_PORTAL: Self = Self(64);
}

/// Secondary skills referenced by the skill-score tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SecondarySkill {
    Pathfinding,
    Scouting,
    Logistics,
    Diplomacy,
    Navigation,
    Leadership,
    Wisdom,
    Mysticism,
    Luck,
    EagleEye,
    Estates,
    FireMagic,
    AirMagic,
    WaterMagic,
    EarthMagic,
    Scholar,
    Tactics,
    Artillery,
    Learning,
    Offence,
    Armorer,
    Intelligence,
    Sorcery,
    Resistance,
    FirstAid,
}

impl SecondarySkill {
    pub const MAGIC_SCHOOLS: [SecondarySkill; 4] = [
        SecondarySkill::AirMagic,
        SecondarySkill::EarthMagic,
        SecondarySkill::FireMagic,
        SecondarySkill::WaterMagic,
    ];
}

/// Mastery level of a secondary skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SkillLevel {
    None,
    Basic,
    Advanced,
    Expert,
}

impl SkillLevel {
    /// Upgrade steps remaining until expert.
    pub fn upgrades_left(self) -> u8 {
        SkillLevel::Expert as u8 - self as u8
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrimaryStats {
    pub attack: u8,
    pub defence: u8,
    pub spell_power: u8,
    pub knowledge: u8,
}

/// A hero as reported by the game engine.
#[derive(Clone, Debug)]
pub struct Hero {
    pub id: HeroId,
    pub owner: PlayerId,
    pub position: Coord,
    /// Movement points left this turn.
    pub movement: u32,
    pub max_movement_land: u32,
    pub max_movement_sail: u32,
    pub mana: u32,
    pub spells: Vec<SpellId>,
    pub secondary_skills: Vec<(SecondarySkill, SkillLevel)>,
    pub stats: PrimaryStats,
    pub level: u32,
    pub experience: u64,
    pub army: CreatureSet,
    pub has_boat: bool,
}

impl Hero {
    pub fn max_move_points(&self, layer: Layer) -> u32 {
        match layer {
            Layer::Sail => self.max_movement_sail,
            _ => self.max_movement_land,
        }
    }

    /// Layer the hero currently occupies.
    pub fn layer(&self) -> Layer {
        if self.has_boat {
            Layer::Sail
        } else {
            Layer::Land
        }
    }

    pub fn knows_spell(&self, spell: SpellId) -> bool {
        self.spells.contains(&spell)
    }

    pub fn skill_level(&self, skill: SecondarySkill) -> SkillLevel {
        self.secondary_skills
            .iter()
            .find(|(s, _)| *s == skill)
            .map(|(_, l)| *l)
            .unwrap_or(SkillLevel::None)
    }

    pub fn has_free_skill_slot(&self) -> bool {
        self.secondary_skills.len() < crate::config::GameConstants::SKILL_PER_HERO
    }

    /// Stat-derived combat multiplier applied on top of army power.
    pub fn fighting_strength(&self) -> f64 {
        let attack = 1.0 + 0.05 * f64::from(self.stats.attack);
        let defence = 1.0 + 0.05 * f64::from(self.stats.defence);

        (attack * defence).sqrt()
    }
}
