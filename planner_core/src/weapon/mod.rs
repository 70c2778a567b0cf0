//! Weapon - Definitions, build instances and ATK scaling

mod essence;
mod ranks;
mod skills;

pub use essence::{
    essence_slot_effects, Essence, EssenceCategory, EssenceSlotEffect, EssenceStat, RarityRules,
    PASSIVE_PREFIXES, PRIMARY_STATS, SECONDARY_STATS,
};
pub use ranks::{resolve_ranks, SkillRanks, MAX_SKILL_RANK, MIN_SKILL_RANK};
pub use skills::{
    parse_skill1, parse_skill2, AttributeBoost, BoostTarget, SkillBaseNames, SkillSlot,
    WeaponSkillTable,
};

use serde::{Deserialize, Serialize};

use crate::curve::BreakpointTable;

pub const MAX_TUNING_STAGE: u8 = 4;
pub const MAX_POTENTIAL: u8 = 5;

/// Weapon level cap per tuning stage
pub const LEVEL_CAPS: [u32; 5] = [20, 40, 60, 80, 90];

/// Max weapon level at a tuning stage
pub fn level_cap(tuning_stage: u8) -> u32 {
    LEVEL_CAPS[usize::from(tuning_stage.min(MAX_TUNING_STAGE))]
}

/// Linear ATK growth for weapons without an ATK table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtkScaling {
    pub base: f64,
    pub per_level: f64,
}

/// Stat engine fallback: `base + (level - 1) * per_level`, by rarity
pub const ATK_SCALING_BY_RARITY: [(u8, AtkScaling); 4] = [
    (6, AtkScaling { base: 52.0, per_level: 5.1 }),
    (5, AtkScaling { base: 42.0, per_level: 4.15 }),
    (4, AtkScaling { base: 35.0, per_level: 3.44 }),
    (3, AtkScaling { base: 29.0, per_level: 2.86 }),
];

/// Per-level growth used by the weapon picker's display estimate, by rarity.
/// Deliberately separate from [`ATK_SCALING_BY_RARITY`].
pub const DISPLAY_ATK_PER_LEVEL: [(u8, f64); 2] = [(6, 7.0), (5, 6.0)];
pub const DISPLAY_ATK_PER_LEVEL_DEFAULT: f64 = 5.0;

pub fn atk_scaling(rarity: u8) -> Option<AtkScaling> {
    ATK_SCALING_BY_RARITY
        .iter()
        .find(|(r, _)| *r == rarity)
        .map(|(_, scaling)| *scaling)
}

/// A weapon definition from the catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDef {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub weapon_type: String,
    pub rarity: u8,
    /// Character this weapon is the signature of
    #[serde(default)]
    pub signature: Option<String>,
    /// Level-1 ATK shown by the weapon picker
    #[serde(default)]
    pub base_atk: Option<f64>,
    #[serde(default)]
    pub atk_curve: Option<BreakpointTable>,
    #[serde(default)]
    pub skills: Option<WeaponSkillTable>,
}

impl WeaponDef {
    pub fn new(id: impl Into<String>, name: impl Into<String>, weapon_type: impl Into<String>, rarity: u8) -> Self {
        WeaponDef {
            id: id.into(),
            name: name.into(),
            weapon_type: weapon_type.into(),
            rarity,
            signature: None,
            base_atk: None,
            atk_curve: None,
            skills: None,
        }
    }

    pub fn with_atk_curve(mut self, curve: BreakpointTable) -> Self {
        self.atk_curve = Some(curve);
        self
    }

    pub fn with_skills(mut self, skills: WeaponSkillTable) -> Self {
        self.skills = Some(skills);
        self
    }

    pub fn with_base_atk(mut self, base_atk: f64) -> Self {
        self.base_atk = Some(base_atk);
        self
    }

    /// ATK at `level`: the weapon's own table when loaded, else the rarity formula
    pub fn atk_at(&self, level: u32) -> f64 {
        match &self.atk_curve {
            Some(curve) => curve.floor_at(f64::from(level)),
            None => match atk_scaling(self.rarity) {
                Some(scaling) => {
                    (scaling.base + f64::from(level.saturating_sub(1)) * scaling.per_level).floor()
                }
                None => {
                    log::warn!("weapon {} has no ATK table and no scaling for rarity {}", self.id, self.rarity);
                    0.0
                }
            },
        }
    }

    /// Rough ATK figure for pickers; `None` without a listed base ATK
    pub fn display_atk_estimate(&self, level: u32) -> Option<i64> {
        let base = self.base_atk?;
        let per_level = DISPLAY_ATK_PER_LEVEL
            .iter()
            .find(|(r, _)| *r == self.rarity)
            .map_or(DISPLAY_ATK_PER_LEVEL_DEFAULT, |(_, growth)| *growth);
        Some((base + f64::from(level.saturating_sub(1)) * per_level).round() as i64)
    }
}

/// A weapon as configured in a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponInstance {
    pub weapon_id: String,
    pub level: u32,
    /// 0-4
    pub tuning_stage: u8,
    /// 0-5
    #[serde(default)]
    pub potential: u8,
    #[serde(default)]
    pub essence: Option<Essence>,
}

impl WeaponInstance {
    /// Fully tuned, level 90, no potential
    pub fn new(weapon_id: impl Into<String>) -> Self {
        WeaponInstance {
            weapon_id: weapon_id.into(),
            level: 90,
            tuning_stage: MAX_TUNING_STAGE,
            potential: 0,
            essence: None,
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_tuning_stage(mut self, stage: u8) -> Self {
        self.tuning_stage = stage;
        self
    }

    pub fn with_potential(mut self, potential: u8) -> Self {
        self.potential = potential;
        self
    }

    pub fn with_essence(mut self, essence: Essence) -> Self {
        self.essence = Some(essence);
        self
    }

    /// Level clamped into [1, cap(tuning stage)]
    pub fn effective_level(&self) -> u32 {
        let cap = level_cap(self.tuning_stage);
        let level = self.level.clamp(1, cap);
        if level != self.level {
            log::debug!(
                "weapon {} level {} clamped to {} (tuning stage {})",
                self.weapon_id,
                self.level,
                level,
                self.tuning_stage
            );
        }
        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_caps() {
        assert_eq!(level_cap(0), 20);
        assert_eq!(level_cap(2), 60);
        assert_eq!(level_cap(4), 90);
        assert_eq!(level_cap(7), 90);
    }

    #[test]
    fn test_fallback_atk() {
        let weapon = WeaponDef::new("w", "W", "Sword", 6);
        // 52 + 89 * 5.1 = 505.9
        assert!((weapon.atk_at(90) - 505.0).abs() < f64::EPSILON);
        assert!((weapon.atk_at(1) - 52.0).abs() < f64::EPSILON);

        let weapon = WeaponDef::new("w", "W", "Sword", 4);
        // 35 + 19 * 3.44 = 100.36
        assert!((weapon.atk_at(20) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_rarity_has_no_atk() {
        let weapon = WeaponDef::new("w", "W", "Sword", 2);
        assert!(weapon.atk_at(50).abs() < f64::EPSILON);
    }

    #[test]
    fn test_curve_atk_is_floored() {
        let curve = BreakpointTable::from_levels([51.0, 146.0, 247.0, 348.0, 449.0, 500.0]).unwrap();
        let weapon = WeaponDef::new("w", "W", "Sword", 6).with_atk_curve(curve);
        assert!((weapon.atk_at(20) - 146.0).abs() < f64::EPSILON);
        // 146 + 101 * 5/20 = 171.25
        assert!((weapon.atk_at(25) - 171.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_display_estimate_uses_own_table() {
        let weapon = WeaponDef::new("w", "W", "Sword", 6).with_base_atk(50.0);
        assert_eq!(weapon.display_atk_estimate(11), Some(120));
        let weapon = WeaponDef::new("w", "W", "Sword", 4).with_base_atk(30.0);
        assert_eq!(weapon.display_atk_estimate(11), Some(80));
        assert_eq!(WeaponDef::new("w", "W", "Sword", 6).display_atk_estimate(11), None);
    }

    #[test]
    fn test_effective_level_clamps_to_tuning_cap() {
        let instance = WeaponInstance::new("w").with_tuning_stage(1).with_level(70);
        assert_eq!(instance.effective_level(), 40);
        let instance = WeaponInstance::new("w").with_level(0);
        assert_eq!(instance.effective_level(), 1);
    }
}
