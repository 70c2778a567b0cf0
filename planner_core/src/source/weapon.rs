//! WeaponSource - Stats from the equipped weapon

use std::collections::BTreeMap;

use serde::Serialize;

use crate::conditions::{weapon_passive_key, BattleConditions};
use crate::parser::{parse_description, ParsedDescription};
use crate::source::StatSource;
use crate::stat_block::StatAccumulator;
use crate::types::{Attribute, StatKey};
use crate::weapon::{
    essence_slot_effects, parse_skill1, parse_skill2, resolve_ranks, AttributeBoost, BoostTarget,
    EssenceSlotEffect, SkillRanks, SkillSlot, WeaponDef, WeaponInstance, WeaponSkillTable,
};

/// Weapon skill 3 as resolved for a build
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassiveBreakdown {
    /// Skill header, e.g. "Pursuit: Hunting Season"
    pub name: String,
    pub rank: u8,
    pub description: String,
    pub parsed: ParsedDescription,
    /// Whether the conditional part was toggled on
    pub active: bool,
}

/// What the weapon contributed, for display
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeaponBreakdown {
    pub weapon_id: String,
    /// Level after clamping to the tuning cap
    pub level: u32,
    pub atk: f64,
    /// `None` until the weapon's skill table is loaded
    pub ranks: Option<SkillRanks>,
    pub essence: Vec<EssenceSlotEffect>,
    pub skill1: Option<AttributeBoost>,
    pub skill2: BTreeMap<StatKey, f64>,
    /// Skill 2 ATK% folded into base ATK
    pub atk_percent: f64,
    /// ATK added by that fold
    pub atk_bonus: f64,
    pub passive: Option<PassiveBreakdown>,
}

/// Weapon ATK plus its three skills at their resolved ranks
pub struct WeaponSource<'a> {
    pub weapon: &'a WeaponDef,
    pub instance: &'a WeaponInstance,
    /// Target of "Main attribute" skill 1 boosts
    pub main_attribute: Attribute,
    pub conditions: &'a BattleConditions,
}

impl<'a> WeaponSource<'a> {
    pub fn new(
        weapon: &'a WeaponDef,
        instance: &'a WeaponInstance,
        main_attribute: Attribute,
        conditions: &'a BattleConditions,
    ) -> Self {
        WeaponSource {
            weapon,
            instance,
            main_attribute,
            conditions,
        }
    }

    fn apply_skills(&self, table: &WeaponSkillTable, stats: &mut StatAccumulator, breakdown: &mut WeaponBreakdown) {
        let names = table.base_names();
        let essence = self.instance.essence.as_ref();
        let ranks = resolve_ranks(self.instance.tuning_stage, self.instance.potential, essence, &names);
        breakdown.ranks = Some(ranks);
        breakdown.essence = essence
            .map(|essence| essence_slot_effects(essence, &names))
            .unwrap_or_default();

        // Skill 1: attribute boost
        if let Some(boost) = table.value(SkillSlot::One, ranks.skill1).and_then(parse_skill1) {
            let attribute = match boost.target {
                BoostTarget::Attribute(attribute) => attribute,
                BoostTarget::MainAttribute => self.main_attribute,
            };
            stats.add_attribute(attribute, boost.value);
            breakdown.skill1 = Some(boost);
        }

        // Skill 2: ATK% folds into the base, everything else is pooled
        if let Some(text) = table.value(SkillSlot::Two, ranks.skill2) {
            let bonuses = parse_skill2(text);
            for (key, value) in &bonuses {
                if *key == StatKey::AtkPercent {
                    breakdown.atk_percent += value;
                    breakdown.atk_bonus += stats.fold_atk_percent_into_base(*value);
                } else {
                    stats.apply_stat(*key, *value);
                }
            }
            breakdown.skill2 = bonuses;
        }

        // Skill 3: passive, conditional part behind the per-weapon toggle
        if let Some(text) = table.value(SkillSlot::Three, ranks.skill3) {
            let parsed = parse_description(text);
            let active = self.conditions.is_on(&weapon_passive_key(&self.weapon.id));
            stats.apply_bonuses(&parsed.bonuses, 1.0);
            if active {
                stats.apply_bonuses(&parsed.conditional_bonuses, 1.0);
            }
            breakdown.passive = Some(PassiveBreakdown {
                name: table.header(SkillSlot::Three).to_string(),
                rank: ranks.skill3,
                description: text.to_string(),
                parsed,
                active,
            });
        }
    }
}

impl StatSource for WeaponSource<'_> {
    fn id(&self) -> &str {
        &self.weapon.id
    }

    fn priority(&self) -> i32 {
        200 // Skill 2 reads the base ATK built so far
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        let level = self.instance.effective_level();
        let atk = self.weapon.atk_at(level);
        stats.add_weapon_atk(atk);

        let mut breakdown = WeaponBreakdown {
            weapon_id: self.weapon.id.clone(),
            level,
            atk,
            ..Default::default()
        };

        match &self.weapon.skills {
            Some(table) => self.apply_skills(table, stats, &mut breakdown),
            None => log::debug!("weapon {} has no skill table loaded", self.weapon.id),
        }

        stats.weapon = Some(breakdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::BreakpointTable;
    use crate::weapon::{Essence, EssenceStat};

    fn skill_table() -> WeaponSkillTable {
        let mut rows = vec![vec![
            "Rank".to_string(),
            "Agility Boost [L]".to_string(),
            "Attack Boost [M]".to_string(),
            "Pursuit: Hunting Season".to_string(),
        ]];
        for rank in 1..=9 {
            rows.push(vec![
                rank.to_string(),
                format!("Agility +{}", 10 + rank),
                format!("Attack +{}%", rank),
                format!("Physical DMG +{}%. After casting a battle skill, ATK +{}%.", rank, 2 * rank),
            ]);
        }
        WeaponSkillTable::from_rows(&rows).unwrap()
    }

    fn weapon() -> WeaponDef {
        WeaponDef::new("wpn", "Test Blade", "Sword", 6)
            .with_atk_curve(BreakpointTable::from_levels([50.0, 100.0, 150.0, 200.0, 250.0, 300.0]).unwrap())
            .with_skills(skill_table())
    }

    fn apply(weapon: &WeaponDef, instance: &WeaponInstance, conditions: &BattleConditions) -> StatAccumulator {
        let mut acc = StatAccumulator::new();
        acc.base_atk = 100.0;
        WeaponSource::new(weapon, instance, Attribute::Intellect, conditions).apply(&mut acc);
        acc
    }

    #[test]
    fn test_weapon_atk_and_skills() {
        let weapon = weapon();
        // Tuning 4: skill 1 and 2 at rank 3, skill 3 at rank 1
        let instance = WeaponInstance::new("wpn");
        let acc = apply(&weapon, &instance, &BattleConditions::new());

        assert!((acc.weapon_atk - 300.0).abs() < f64::EPSILON);
        // (100 + 300) * 3% = 12
        assert!((acc.weapon_atk_bonus - 12.0).abs() < f64::EPSILON);
        assert!((acc.base_atk - 412.0).abs() < f64::EPSILON);
        assert!((acc.agility - 13.0).abs() < f64::EPSILON);
        assert!((acc.physical_dmg - 1.0).abs() < f64::EPSILON);
        // The ATK% never reaches the percentage pool
        assert!(acc.atk_percent.abs() < f64::EPSILON);

        let breakdown = acc.weapon.unwrap();
        assert_eq!(breakdown.ranks, Some(SkillRanks { skill1: 3, skill2: 3, skill3: 1 }));
        assert!(!breakdown.passive.unwrap().active);
    }

    #[test]
    fn test_passive_toggle() {
        let weapon = weapon();
        let instance = WeaponInstance::new("wpn").with_potential(2);
        let conditions = BattleConditions::new().with_toggle(weapon_passive_key("wpn"));
        let acc = apply(&weapon, &instance, &conditions);
        // Rank 3 passive: ATK +6% while toggled
        assert!((acc.atk_percent - 6.0).abs() < f64::EPSILON);
        assert!((acc.physical_dmg - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_essence_raises_matching_skill() {
        let weapon = weapon();
        let essence = Essence::new(5, vec![EssenceStat::new("Agility Boost", 4), EssenceStat::new("HP Boost", 6)]);
        let instance = WeaponInstance::new("wpn").with_essence(essence);
        let acc = apply(&weapon, &instance, &BattleConditions::new());
        // Skill 1 rank 3 + 4 = 7
        assert!((acc.agility - 17.0).abs() < f64::EPSILON);
        let breakdown = acc.weapon.unwrap();
        assert_eq!(breakdown.essence.len(), 2);
        assert!(!breakdown.essence[1].matches);
    }

    #[test]
    fn test_main_attribute_boost() {
        let rows: Vec<Vec<String>> = [
            ["", "Main Attribute Boost [L]", "HP Boost [M]", "Flow: Tides"],
            ["1", "Main attribute +17", "Max HP +10%", "Arts Intensity +5"],
        ]
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();
        let weapon = WeaponDef::new("wpn", "Test Staff", "Arts Unit", 5)
            .with_skills(WeaponSkillTable::from_rows(&rows).unwrap());
        let instance = WeaponInstance::new("wpn").with_tuning_stage(0).with_level(1);
        let acc = apply(&weapon, &instance, &BattleConditions::new());

        assert!((acc.intellect - 17.0).abs() < f64::EPSILON);
        assert!((acc.max_hp_percent - 10.0).abs() < f64::EPSILON);
        assert!((acc.arts_intensity - 5.0).abs() < f64::EPSILON);
        // 5-star fallback at level 1
        assert!((acc.weapon_atk - 42.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_weapon_without_skill_table() {
        let weapon = WeaponDef::new("wpn", "Plain", "Sword", 3);
        let instance = WeaponInstance::new("wpn").with_level(1);
        let acc = apply(&weapon, &instance, &BattleConditions::new());
        assert!((acc.weapon_atk - 29.0).abs() < f64::EPSILON);
        assert!(acc.weapon.unwrap().ranks.is_none());
    }
}
