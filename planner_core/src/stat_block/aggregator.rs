//! StatAccumulator - Collects stat contributions before finalization

use std::collections::BTreeMap;

use crate::config::PlannerConstants;
use crate::curve::arts::ArtsEffects;
use crate::source::WeaponBreakdown;
use crate::stat_block::{DerivedStats, StatValue};
use crate::types::{Attribute, StatKey};

/// Accumulates stat contributions from every source
///
/// Sources write into this in priority order; later sources may read what
/// earlier ones produced (weapon skill 2 folds ATK% into the base ATK so far,
/// attribute scaling talents read final attributes).
#[derive(Debug, Clone, Default)]
pub struct StatAccumulator {
    // === Base values ===
    pub base_atk: f64,
    pub base_hp: f64,
    pub weapon_atk: f64,
    /// ATK folded into `base_atk` by weapon skill 2
    pub weapon_atk_bonus: f64,
    pub defense: f64,

    // === Attributes ===
    pub strength: f64,
    pub agility: f64,
    pub intellect: f64,
    pub will: f64,

    // === Offense ===
    pub atk_percent: f64,
    pub crit_rate: f64,
    pub crit_dmg: f64,
    pub physical_dmg: f64,
    pub heat_dmg: f64,
    pub cryo_dmg: f64,
    pub electric_dmg: f64,
    pub nature_dmg: f64,
    pub arts_dmg: f64,
    pub skill_dmg: f64,
    pub battle_skill_dmg: f64,
    pub combo_skill_dmg: f64,
    pub ultimate_dmg: f64,
    pub basic_attack_dmg: f64,
    pub arts_intensity: f64,
    pub dmg_to_broken: f64,
    pub stagger_dmg: f64,
    pub stagger_efficiency: f64,
    pub enemy_physical_dmg_taken: f64,

    // === Support ===
    pub treatment_efficiency: f64,
    pub shield_bonus: f64,
    pub ultimate_gain: f64,
    pub sp_recovery: f64,

    // === Defense ===
    pub dmg_reduction: f64,
    pub max_hp_percent: f64,

    // === Bookkeeping ===
    pub active_set: Option<String>,
    /// Display strings for conditional bonuses that applied
    pub conditional_bonuses: Vec<String>,
    pub weapon: Option<WeaponBreakdown>,
}

impl StatAccumulator {
    pub fn new() -> Self {
        StatAccumulator::default()
    }

    /// Add a bonus to its accumulator
    ///
    /// Attribute keys add to the attribute, `HpFlat` to base HP and `Def` to
    /// defense; every other key is a plain sum.
    pub fn apply_stat(&mut self, key: StatKey, value: f64) {
        match key {
            // Attributes
            StatKey::Strength => self.strength += value,
            StatKey::Agility => self.agility += value,
            StatKey::Intellect => self.intellect += value,
            StatKey::Will => self.will += value,

            // Offense
            StatKey::AtkPercent => self.atk_percent += value,
            StatKey::CritRate => self.crit_rate += value,
            StatKey::CritDmg => self.crit_dmg += value,
            StatKey::PhysicalDmg => self.physical_dmg += value,
            StatKey::HeatDmg => self.heat_dmg += value,
            StatKey::CryoDmg => self.cryo_dmg += value,
            StatKey::ElectricDmg => self.electric_dmg += value,
            StatKey::NatureDmg => self.nature_dmg += value,
            StatKey::ArtsDmg => self.arts_dmg += value,
            StatKey::SkillDmg => self.skill_dmg += value,
            StatKey::BattleSkillDmg => self.battle_skill_dmg += value,
            StatKey::ComboSkillDmg => self.combo_skill_dmg += value,
            StatKey::UltimateDmg => self.ultimate_dmg += value,
            StatKey::BasicAttackDmg => self.basic_attack_dmg += value,
            StatKey::ArtsIntensity => self.arts_intensity += value,
            StatKey::DmgToBroken => self.dmg_to_broken += value,
            StatKey::StaggerDmg => self.stagger_dmg += value,
            StatKey::StaggerEfficiency => self.stagger_efficiency += value,
            StatKey::EnemyPhysicalDmgTaken => self.enemy_physical_dmg_taken += value,

            // Support
            StatKey::TreatmentEfficiency => self.treatment_efficiency += value,
            StatKey::ShieldBonus => self.shield_bonus += value,
            StatKey::UltimateGain => self.ultimate_gain += value,
            StatKey::SpRecovery => self.sp_recovery += value,

            // Defense
            StatKey::DmgReduction => self.dmg_reduction += value,
            StatKey::MaxHpPercent => self.max_hp_percent += value,
            StatKey::HpFlat => self.base_hp += value,
            StatKey::Def => self.defense += value,
        }
    }

    /// Apply every entry of a bonus map, each scaled by `multiplier`
    pub fn apply_bonuses(&mut self, bonuses: &BTreeMap<StatKey, f64>, multiplier: f64) {
        for (key, value) in bonuses {
            self.apply_stat(*key, value * multiplier);
        }
    }

    /// Current value of an accumulator (see [`apply_stat`](Self::apply_stat) for routing)
    pub fn get(&self, key: StatKey) -> f64 {
        match key {
            StatKey::Strength => self.strength,
            StatKey::Agility => self.agility,
            StatKey::Intellect => self.intellect,
            StatKey::Will => self.will,
            StatKey::AtkPercent => self.atk_percent,
            StatKey::CritRate => self.crit_rate,
            StatKey::CritDmg => self.crit_dmg,
            StatKey::PhysicalDmg => self.physical_dmg,
            StatKey::HeatDmg => self.heat_dmg,
            StatKey::CryoDmg => self.cryo_dmg,
            StatKey::ElectricDmg => self.electric_dmg,
            StatKey::NatureDmg => self.nature_dmg,
            StatKey::ArtsDmg => self.arts_dmg,
            StatKey::SkillDmg => self.skill_dmg,
            StatKey::BattleSkillDmg => self.battle_skill_dmg,
            StatKey::ComboSkillDmg => self.combo_skill_dmg,
            StatKey::UltimateDmg => self.ultimate_dmg,
            StatKey::BasicAttackDmg => self.basic_attack_dmg,
            StatKey::ArtsIntensity => self.arts_intensity,
            StatKey::DmgToBroken => self.dmg_to_broken,
            StatKey::StaggerDmg => self.stagger_dmg,
            StatKey::StaggerEfficiency => self.stagger_efficiency,
            StatKey::EnemyPhysicalDmgTaken => self.enemy_physical_dmg_taken,
            StatKey::TreatmentEfficiency => self.treatment_efficiency,
            StatKey::ShieldBonus => self.shield_bonus,
            StatKey::UltimateGain => self.ultimate_gain,
            StatKey::SpRecovery => self.sp_recovery,
            StatKey::DmgReduction => self.dmg_reduction,
            StatKey::MaxHpPercent => self.max_hp_percent,
            StatKey::HpFlat => self.base_hp,
            StatKey::Def => self.defense,
        }
    }

    pub fn attribute(&self, attribute: Attribute) -> f64 {
        self.get(attribute.stat_key())
    }

    pub fn add_attribute(&mut self, attribute: Attribute, value: f64) {
        self.apply_stat(attribute.stat_key(), value);
    }

    /// Add weapon ATK to the base
    pub fn add_weapon_atk(&mut self, atk: f64) {
        self.weapon_atk += atk;
        self.base_atk += atk;
    }

    /// Fold a weapon skill 2 ATK% into the base ATK so far; returns the ATK added
    pub fn fold_atk_percent_into_base(&mut self, percent: f64) -> f64 {
        let bonus = (self.base_atk * percent / 100.0).floor();
        self.base_atk += bonus;
        self.weapon_atk_bonus += bonus;
        bonus
    }

    /// Compute final values from the accumulated contributions
    pub fn finalize(
        &self,
        main_attribute: Attribute,
        sub_attribute: Attribute,
        constants: &PlannerConstants,
    ) -> DerivedStats {
        let rates = &constants.attribute;
        let main_attribute_value = self.attribute(main_attribute);
        let sub_attribute_value = self.attribute(sub_attribute);
        let main_atk_bonus = main_attribute_value * rates.main_atk_rate;
        let sub_atk_bonus = sub_attribute_value * rates.sub_atk_rate;
        let total_atk_bonus = main_atk_bonus + sub_atk_bonus + self.atk_percent;

        let mut atk = StatValue::with_base(self.base_atk);
        atk.add_percent(total_atk_bonus);

        let mut hp = StatValue::with_base(self.base_hp);
        hp.add_flat(self.strength * rates.hp_per_strength);
        hp.add_percent(self.max_hp_percent);

        let defense_reduction = if self.defense > 0.0 {
            self.defense / (self.defense + constants.defense.constant) * 100.0
        } else {
            0.0
        };

        let bonuses = StatKey::all()
            .iter()
            .filter(|key| {
                key.attribute().is_none() && !matches!(key, StatKey::HpFlat | StatKey::Def)
            })
            .map(|key| (*key, self.get(*key)))
            .collect();

        DerivedStats {
            final_atk: atk.compute_floor(),
            final_hp: hp.compute_floor(),
            base_atk: self.base_atk,
            weapon_atk: self.weapon_atk,
            weapon_atk_bonus: self.weapon_atk_bonus,
            base_hp: self.base_hp,
            defense: self.defense,
            dmg_reduction: defense_reduction + self.dmg_reduction,
            strength: self.strength,
            agility: self.agility,
            intellect: self.intellect,
            will: self.will,
            main_attribute_value,
            sub_attribute_value,
            main_atk_bonus,
            sub_atk_bonus,
            total_atk_bonus,
            bonuses,
            arts: ArtsEffects::from_intensity(self.arts_intensity),
            active_set: self.active_set.clone(),
            conditional_bonuses: self.conditional_bonuses.clone(),
            weapon: self.weapon.clone(),
        }
    }
}
