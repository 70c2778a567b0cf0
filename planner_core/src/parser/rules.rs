//! Ordered bonus rule table
//!
//! Rules run most-specific first. Each rule fires at most once per text, and
//! the span it matched is blanked out so that later, more general rules
//! ("Skill DMG") cannot re-read text claimed by earlier ones ("Battle Skill DMG").

use std::collections::BTreeMap;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use super::compile;
use crate::types::StatKey;

/// Whether a rule's number must carry a `%` sign
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Percent,
    Flat,
}

/// One entry of the rule table: a stat name pattern and the key it feeds
#[derive(Debug, Clone, Copy)]
pub struct BonusRule {
    pub name: &'static str,
    /// Regex fragment for the stat name; the `+N` suffix is appended
    pub stat_pattern: &'static str,
    pub stat: StatKey,
    pub unit: Unit,
}

const fn rule(name: &'static str, stat_pattern: &'static str, stat: StatKey, unit: Unit) -> BonusRule {
    BonusRule {
        name,
        stat_pattern,
        stat,
        unit,
    }
}

/// The rule battery, in match order
pub const BONUS_RULES: &[BonusRule] = &[
    // === Skill-specific damage (before the generic "Skill DMG") ===
    rule("battle_skill_dmg", r"Battle Skill DMG(?:\s+Dealt)?", StatKey::BattleSkillDmg, Unit::Percent),
    rule("combo_skill_dmg", r"Combo Skill DMG(?:\s+Dealt)?", StatKey::ComboSkillDmg, Unit::Percent),
    rule("ultimate_dmg", r"Ultimate DMG(?:\s+Dealt)?", StatKey::UltimateDmg, Unit::Percent),
    rule("basic_attack_dmg", r"Basic Attack DMG(?:\s+Dealt)?", StatKey::BasicAttackDmg, Unit::Percent),
    rule("crit_dmg", r"Crit(?:ical)? DMG(?:\s+Dealt)?", StatKey::CritDmg, Unit::Percent),
    rule("physical_dmg_taken", r"Physical DMG Taken", StatKey::EnemyPhysicalDmgTaken, Unit::Percent),
    rule("dmg_to_broken", r"DMG(?:\s+Dealt)? to Broken(?:\s+enemies)?", StatKey::DmgToBroken, Unit::Percent),
    rule("skill_dmg", r"Skill DMG(?:\s+Dealt)?", StatKey::SkillDmg, Unit::Percent),
    // === Element damage ===
    rule("physical_dmg", r"Physical DMG(?:\s+Dealt)?", StatKey::PhysicalDmg, Unit::Percent),
    rule("heat_dmg", r"Heat DMG(?:\s+Dealt)?", StatKey::HeatDmg, Unit::Percent),
    rule("cryo_dmg", r"Cryo DMG(?:\s+Dealt)?", StatKey::CryoDmg, Unit::Percent),
    rule("electric_dmg", r"Electric DMG(?:\s+Dealt)?", StatKey::ElectricDmg, Unit::Percent),
    rule("nature_dmg", r"Nature DMG(?:\s+Dealt)?", StatKey::NatureDmg, Unit::Percent),
    rule("arts_dmg", r"Arts DMG(?:\s+Dealt)?", StatKey::ArtsDmg, Unit::Percent),
    // === Stagger ===
    rule("stagger_dmg", r"Stagger DMG", StatKey::StaggerDmg, Unit::Percent),
    rule("stagger_efficiency", r"Stagger Efficiency", StatKey::StaggerEfficiency, Unit::Percent),
    // === Crit and support ===
    rule("crit_rate", r"Crit(?:ical)? Rate", StatKey::CritRate, Unit::Percent),
    rule("treatment_efficiency", r"Treatment Efficiency", StatKey::TreatmentEfficiency, Unit::Percent),
    rule("shield_applied", r"Shield applied", StatKey::ShieldBonus, Unit::Percent),
    rule("ultimate_gain", r"Ultimate (?:SP )?Gain(?:\s+Efficiency)?", StatKey::UltimateGain, Unit::Percent),
    rule("sp_recovery", r"SP Recovery", StatKey::SpRecovery, Unit::Percent),
    // === Defense and health ===
    rule("dmg_reduction", r"DMG Reduction", StatKey::DmgReduction, Unit::Percent),
    rule("max_hp_percent", r"(?:Max\s+)?HP", StatKey::MaxHpPercent, Unit::Percent),
    rule("hp_flat", r"(?:Max\s+)?HP", StatKey::HpFlat, Unit::Flat),
    rule("def_flat", r"DEF", StatKey::Def, Unit::Flat),
    // === Attack ===
    rule("atk_percent", r"ATK|Attack", StatKey::AtkPercent, Unit::Percent),
    rule("arts_intensity", r"Arts Intensity", StatKey::ArtsIntensity, Unit::Flat),
    // === Attributes ===
    rule("strength", r"Strength", StatKey::Strength, Unit::Flat),
    rule("agility", r"Agility", StatKey::Agility, Unit::Flat),
    rule("intellect", r"Intellect", StatKey::Intellect, Unit::Flat),
    rule("will", r"Will", StatKey::Will, Unit::Flat),
];

struct CompiledRule {
    rule: &'static BonusRule,
    regex: Regex,
}

impl CompiledRule {
    /// First match whose unit agrees with the rule, with its byte span
    fn find(&self, text: &str) -> Option<(Range<usize>, f64)> {
        self.regex.captures_iter(text).find_map(|caps| {
            let is_percent = caps.get(2).is_some();
            if is_percent != (self.rule.unit == Unit::Percent) {
                return None;
            }
            let value = caps.get(1)?.as_str().parse::<f64>().ok()?;
            Some((caps.get(0)?.range(), value))
        })
    }
}

static COMPILED_RULES: Lazy<Vec<CompiledRule>> = Lazy::new(|| {
    BONUS_RULES
        .iter()
        .filter_map(|rule| {
            let pattern = format!(r"(?i)\b(?:{})\s*\+\s*(\d+(?:\.\d+)?)(%)?", rule.stat_pattern);
            compile(&pattern).map(|regex| CompiledRule { rule, regex })
        })
        .collect()
});

/// Run the rule battery over `text`
pub fn scan_bonuses(text: &str) -> BTreeMap<StatKey, f64> {
    let mut remaining = text.to_string();
    let mut bonuses = BTreeMap::new();

    for compiled in COMPILED_RULES.iter() {
        if let Some((span, value)) = compiled.find(&remaining) {
            let blank = " ".repeat(span.len());
            remaining.replace_range(span, &blank);
            *bonuses.entry(compiled.rule.stat).or_insert(0.0) += value;
        }
    }

    bonuses
}

/// Match a single rule by name against `text`
pub fn match_rule(name: &str, text: &str) -> Option<f64> {
    COMPILED_RULES
        .iter()
        .find(|compiled| compiled.rule.name == name)
        .and_then(|compiled| compiled.find(text))
        .map(|(_, value)| value)
}
