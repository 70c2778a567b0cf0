//! Condition triggers in descriptions

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::compile;

/// Battle condition a bonus depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    OriginiumCrystals,
    Combustion,
    Electrification,
    Solidification,
    Corrosion,
    Vulnerability,
    BattleSkill,
    ComboSkill,
    Ultimate,
    CriticalHit,
    Shield,
    Healing,
}

impl ConditionKind {
    pub fn all() -> &'static [ConditionKind] {
        &[
            ConditionKind::OriginiumCrystals,
            ConditionKind::Combustion,
            ConditionKind::Electrification,
            ConditionKind::Solidification,
            ConditionKind::Corrosion,
            ConditionKind::Vulnerability,
            ConditionKind::BattleSkill,
            ConditionKind::ComboSkill,
            ConditionKind::Ultimate,
            ConditionKind::CriticalHit,
            ConditionKind::Shield,
            ConditionKind::Healing,
        ]
    }

    pub fn id(self) -> &'static str {
        match self {
            ConditionKind::OriginiumCrystals => "originium_crystals",
            ConditionKind::Combustion => "combustion",
            ConditionKind::Electrification => "electrification",
            ConditionKind::Solidification => "solidification",
            ConditionKind::Corrosion => "corrosion",
            ConditionKind::Vulnerability => "vulnerability",
            ConditionKind::BattleSkill => "battle_skill",
            ConditionKind::ComboSkill => "combo_skill",
            ConditionKind::Ultimate => "ultimate",
            ConditionKind::CriticalHit => "critical_hit",
            ConditionKind::Shield => "shield",
            ConditionKind::Healing => "healing",
        }
    }

    fn keywords(self) -> &'static str {
        match self {
            ConditionKind::OriginiumCrystals => r"originium crystals?",
            ConditionKind::Combustion => r"combustion|burning",
            ConditionKind::Electrification => r"electrifi(?:cation|ed)",
            ConditionKind::Solidification => r"solidification|frozen|slowed",
            ConditionKind::Corrosion => r"corro(?:sion|ded)",
            ConditionKind::Vulnerability => r"vulnerab(?:ility|le)",
            ConditionKind::BattleSkill => r"battle skills?",
            ConditionKind::ComboSkill => r"combo skills?",
            ConditionKind::Ultimate => r"ultimates?",
            ConditionKind::CriticalHit => r"crit\w*",
            ConditionKind::Shield => r"shield\w*",
            ConditionKind::Healing => r"heal\w*|treatment|restores",
        }
    }
}

static BOUNDARY: Lazy<Option<Regex>> = Lazy::new(|| compile(r"(?i)\b(?:when|after)\b"));

static KEYWORDS: Lazy<Vec<(ConditionKind, Regex)>> = Lazy::new(|| {
    ConditionKind::all()
        .iter()
        .filter_map(|kind| {
            compile(&format!(r"(?i)\b(?:{})", kind.keywords())).map(|regex| (*kind, regex))
        })
        .collect()
});

/// Byte offset of the first "When"/"After"
pub fn boundary(text: &str) -> Option<usize> {
    BOUNDARY.as_ref()?.find(text).map(|m| m.start())
}

/// The condition whose keyword appears earliest in `text`
pub fn detect(text: &str) -> Option<ConditionKind> {
    KEYWORDS
        .iter()
        .filter_map(|(kind, regex)| regex.find(text).map(|m| (m.start(), *kind)))
        .min_by_key(|(start, _)| *start)
        .map(|(_, kind)| kind)
}

/// Where a description splits at its "When"/"After" boundary, and what the
/// trailing clause is conditional on
///
/// Keywords inside the trigger clause take precedence over keywords
/// elsewhere in the text. The kind is `None` when no trigger keyword is
/// recognised.
pub(crate) fn split_trigger(text: &str) -> Option<(usize, Option<ConditionKind>)> {
    let split = boundary(text)?;
    let kind = detect(&text[split..]).or_else(|| detect(text));
    Some((split, kind))
}
