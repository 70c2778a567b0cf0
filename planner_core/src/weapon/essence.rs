//! Essences - socketable stat gems that raise weapon skill ranks

use serde::{Deserialize, Serialize};

use super::skills::{SkillBaseNames, SkillSlot};

/// Essence stats that raise skill 1
pub const PRIMARY_STATS: [&str; 5] = [
    "Agility Boost",
    "Intellect Boost",
    "Main Attribute Boost",
    "Strength Boost",
    "Will Boost",
];

/// Essence stats that raise skill 2
pub const SECONDARY_STATS: [&str; 14] = [
    "ATK Boost",
    "Arts Boost",
    "Arts Intensity Boost",
    "Assault: Armament Prep",
    "Attack Boost",
    "Critical Rate Boost",
    "Cryo DMG Boost",
    "Electric DMG Boost",
    "HP Boost",
    "Heat DMG Boost",
    "Nature DMG Boost",
    "Physical DMG Boost",
    "Treatment Efficiency Boost",
    "Ultimate Gain Efficiency Boost",
];

/// Essence stats that raise skill 3 (passive name prefixes)
pub const PASSIVE_PREFIXES: [&str; 13] = [
    "Brutality",
    "Combative",
    "Crusher",
    "Detonate",
    "Efficacy",
    "Flow",
    "Fracture",
    "Infliction",
    "Inspiring",
    "Medicant",
    "Pursuit",
    "Suppression",
    "Twilight",
];

/// Which vocabulary an essence stat belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EssenceCategory {
    Primary,
    Secondary,
    Passive,
}

impl EssenceCategory {
    pub fn classify(stat_type: &str) -> Option<EssenceCategory> {
        if PRIMARY_STATS.contains(&stat_type) {
            Some(EssenceCategory::Primary)
        } else if SECONDARY_STATS.contains(&stat_type) {
            Some(EssenceCategory::Secondary)
        } else if PASSIVE_PREFIXES.contains(&stat_type) {
            Some(EssenceCategory::Passive)
        } else {
            None
        }
    }

    /// The weapon skill this category feeds
    pub fn skill(self) -> SkillSlot {
        match self {
            EssenceCategory::Primary => SkillSlot::One,
            EssenceCategory::Secondary => SkillSlot::Two,
            EssenceCategory::Passive => SkillSlot::Three,
        }
    }
}

/// Slot count and bonus ranges for an essence rarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RarityRules {
    pub max_slots: usize,
    pub primary: (u8, u8),
    pub secondary: (u8, u8),
    pub passive: (u8, u8),
}

impl RarityRules {
    pub fn for_rarity(rarity: u8) -> Self {
        match rarity.clamp(Essence::MIN_RARITY, Essence::MAX_RARITY) {
            2 => RarityRules::uniform(1, (1, 1)),
            3 => RarityRules::uniform(2, (1, 2)),
            4 => RarityRules::uniform(3, (1, 3)),
            _ => RarityRules {
                max_slots: 3,
                primary: (1, 6),
                secondary: (1, 6),
                passive: (1, 3),
            },
        }
    }

    fn uniform(max_slots: usize, range: (u8, u8)) -> Self {
        RarityRules {
            max_slots,
            primary: range,
            secondary: range,
            passive: range,
        }
    }

    /// Allowed bonus range for a category; unclassified stats use the narrowest
    pub fn range(&self, category: Option<EssenceCategory>) -> (u8, u8) {
        match category {
            Some(EssenceCategory::Primary) => self.primary,
            Some(EssenceCategory::Secondary) => self.secondary,
            Some(EssenceCategory::Passive) | None => self.passive,
        }
    }
}

fn default_bonus() -> u8 {
    1
}

/// One essence stat slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssenceStat {
    #[serde(rename = "type")]
    pub stat_type: String,
    /// Ranks added to the matching skill
    #[serde(default = "default_bonus", alias = "bonusLevels")]
    pub bonus: u8,
}

impl EssenceStat {
    pub fn new(stat_type: impl Into<String>, bonus: u8) -> Self {
        EssenceStat {
            stat_type: stat_type.into(),
            bonus,
        }
    }
}

/// A socketed essence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Essence {
    pub rarity: u8,
    #[serde(default)]
    pub stats: Vec<EssenceStat>,
}

impl Essence {
    pub const MIN_RARITY: u8 = 2;
    pub const MAX_RARITY: u8 = 5;

    pub fn new(rarity: u8, stats: Vec<EssenceStat>) -> Self {
        Essence { rarity, stats }
    }

    /// Clamp into the rarity's rules: extra slots dropped, bonuses clamped
    pub fn sanitized(&self) -> Essence {
        let rarity = self.rarity.clamp(Self::MIN_RARITY, Self::MAX_RARITY);
        let rules = RarityRules::for_rarity(rarity);
        if self.stats.len() > rules.max_slots {
            log::warn!(
                "essence of rarity {} holds {} stats, keeping the first {}",
                rarity,
                self.stats.len(),
                rules.max_slots
            );
        }
        let stats = self
            .stats
            .iter()
            .take(rules.max_slots)
            .map(|stat| {
                let (min, max) = rules.range(EssenceCategory::classify(&stat.stat_type));
                EssenceStat::new(stat.stat_type.clone(), stat.bonus.clamp(min, max))
            })
            .collect();
        Essence { rarity, stats }
    }
}

/// How one essence slot lands on the equipped weapon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssenceSlotEffect {
    pub stat_type: String,
    pub category: Option<EssenceCategory>,
    pub skill: Option<SkillSlot>,
    /// Whether the stat matches the weapon's skill name
    pub matches: bool,
    /// Ranks actually added (zero for a wasted slot)
    pub bonus: u8,
}

/// Per-slot effects of an essence on a weapon with the given skill names
pub fn essence_slot_effects(essence: &Essence, names: &SkillBaseNames) -> Vec<EssenceSlotEffect> {
    essence
        .sanitized()
        .stats
        .into_iter()
        .map(|stat| {
            let category = EssenceCategory::classify(&stat.stat_type);
            let matches = match category {
                Some(EssenceCategory::Primary) => stat.stat_type == names.skill1,
                Some(EssenceCategory::Secondary) => stat.stat_type == names.skill2,
                Some(EssenceCategory::Passive) => stat.stat_type == names.skill3_prefix,
                None => false,
            };
            EssenceSlotEffect {
                category,
                skill: category.map(EssenceCategory::skill),
                matches,
                bonus: if matches { stat.bonus } else { 0 },
                stat_type: stat.stat_type,
            }
        })
        .collect()
}
