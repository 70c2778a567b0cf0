//! Core types shared across the planner

use serde::{Deserialize, Serialize};

/// The four character attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Attribute {
    Strength,
    Agility,
    Intellect,
    Will,
}

impl Attribute {
    /// Get all attributes
    pub fn all() -> &'static [Attribute] {
        &[
            Attribute::Strength,
            Attribute::Agility,
            Attribute::Intellect,
            Attribute::Will,
        ]
    }

    /// Display name as it appears in descriptions
    pub fn label(self) -> &'static str {
        match self {
            Attribute::Strength => "Strength",
            Attribute::Agility => "Agility",
            Attribute::Intellect => "Intellect",
            Attribute::Will => "Will",
        }
    }

    /// Case-insensitive lookup by display name
    pub fn from_name(name: &str) -> Option<Attribute> {
        let name = name.trim();
        Attribute::all()
            .iter()
            .copied()
            .find(|attr| attr.label().eq_ignore_ascii_case(name))
    }

    /// The accumulator key for flat bonuses to this attribute
    pub fn stat_key(self) -> StatKey {
        match self {
            Attribute::Strength => StatKey::Strength,
            Attribute::Agility => StatKey::Agility,
            Attribute::Intellect => StatKey::Intellect,
            Attribute::Will => StatKey::Will,
        }
    }
}

/// Every bonus the stat engine knows how to accumulate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    // Attributes (flat)
    Strength,
    Agility,
    Intellect,
    Will,
    // Offense
    AtkPercent,
    CritRate,
    CritDmg,
    PhysicalDmg,
    HeatDmg,
    CryoDmg,
    ElectricDmg,
    NatureDmg,
    ArtsDmg,
    SkillDmg,
    BattleSkillDmg,
    ComboSkillDmg,
    UltimateDmg,
    BasicAttackDmg,
    ArtsIntensity,
    DmgToBroken,
    StaggerDmg,
    StaggerEfficiency,
    EnemyPhysicalDmgTaken,
    // Support
    TreatmentEfficiency,
    ShieldBonus,
    UltimateGain,
    SpRecovery,
    // Defense
    DmgReduction,
    MaxHpPercent,
    HpFlat,
    Def,
}

impl StatKey {
    pub fn all() -> &'static [StatKey] {
        &[
            StatKey::Strength,
            StatKey::Agility,
            StatKey::Intellect,
            StatKey::Will,
            StatKey::AtkPercent,
            StatKey::CritRate,
            StatKey::CritDmg,
            StatKey::PhysicalDmg,
            StatKey::HeatDmg,
            StatKey::CryoDmg,
            StatKey::ElectricDmg,
            StatKey::NatureDmg,
            StatKey::ArtsDmg,
            StatKey::SkillDmg,
            StatKey::BattleSkillDmg,
            StatKey::ComboSkillDmg,
            StatKey::UltimateDmg,
            StatKey::BasicAttackDmg,
            StatKey::ArtsIntensity,
            StatKey::DmgToBroken,
            StatKey::StaggerDmg,
            StatKey::StaggerEfficiency,
            StatKey::EnemyPhysicalDmgTaken,
            StatKey::TreatmentEfficiency,
            StatKey::ShieldBonus,
            StatKey::UltimateGain,
            StatKey::SpRecovery,
            StatKey::DmgReduction,
            StatKey::MaxHpPercent,
            StatKey::HpFlat,
            StatKey::Def,
        ]
    }

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            StatKey::Strength => "Strength",
            StatKey::Agility => "Agility",
            StatKey::Intellect => "Intellect",
            StatKey::Will => "Will",
            StatKey::AtkPercent => "ATK",
            StatKey::CritRate => "Critical Rate",
            StatKey::CritDmg => "Critical DMG",
            StatKey::PhysicalDmg => "Physical DMG",
            StatKey::HeatDmg => "Heat DMG",
            StatKey::CryoDmg => "Cryo DMG",
            StatKey::ElectricDmg => "Electric DMG",
            StatKey::NatureDmg => "Nature DMG",
            StatKey::ArtsDmg => "Arts DMG",
            StatKey::SkillDmg => "Skill DMG",
            StatKey::BattleSkillDmg => "Battle Skill DMG",
            StatKey::ComboSkillDmg => "Combo Skill DMG",
            StatKey::UltimateDmg => "Ultimate DMG",
            StatKey::BasicAttackDmg => "Basic Attack DMG",
            StatKey::ArtsIntensity => "Arts Intensity",
            StatKey::DmgToBroken => "DMG to Broken",
            StatKey::StaggerDmg => "Stagger DMG",
            StatKey::StaggerEfficiency => "Stagger Efficiency",
            StatKey::EnemyPhysicalDmgTaken => "Physical DMG Taken",
            StatKey::TreatmentEfficiency => "Treatment Efficiency",
            StatKey::ShieldBonus => "Shield Applied",
            StatKey::UltimateGain => "Ultimate Gain",
            StatKey::SpRecovery => "SP Recovery",
            StatKey::DmgReduction => "DMG Reduction",
            StatKey::MaxHpPercent => "Max HP",
            StatKey::HpFlat => "HP",
            StatKey::Def => "DEF",
        }
    }

    /// Whether values of this stat are percentages
    pub fn is_percent(self) -> bool {
        !matches!(
            self,
            StatKey::Strength
                | StatKey::Agility
                | StatKey::Intellect
                | StatKey::Will
                | StatKey::ArtsIntensity
                | StatKey::HpFlat
                | StatKey::Def
        )
    }

    /// The attribute this key adds to, if any
    pub fn attribute(self) -> Option<Attribute> {
        match self {
            StatKey::Strength => Some(Attribute::Strength),
            StatKey::Agility => Some(Attribute::Agility),
            StatKey::Intellect => Some(Attribute::Intellect),
            StatKey::Will => Some(Attribute::Will),
            _ => None,
        }
    }

    /// Map a gear stat name (as written in the equipment catalogue) to a key
    pub fn from_gear_name(name: &str) -> Option<StatKey> {
        let key = match name.trim() {
            "DEF" => StatKey::Def,
            "Strength" => StatKey::Strength,
            "Agility" => StatKey::Agility,
            "Intellect" => StatKey::Intellect,
            "Will" => StatKey::Will,
            "Physical DMG" => StatKey::PhysicalDmg,
            "Heat DMG" => StatKey::HeatDmg,
            "Cryo DMG" => StatKey::CryoDmg,
            "Electric DMG" => StatKey::ElectricDmg,
            "Nature DMG" => StatKey::NatureDmg,
            "Arts DMG" => StatKey::ArtsDmg,
            "Arts Intensity" => StatKey::ArtsIntensity,
            "Critical Rate" => StatKey::CritRate,
            "Critical DMG" => StatKey::CritDmg,
            "Treatment Efficiency" => StatKey::TreatmentEfficiency,
            "DMG to Broken" => StatKey::DmgToBroken,
            "DMG Reduction" => StatKey::DmgReduction,
            "Combo Skill DMG" => StatKey::ComboSkillDmg,
            "Battle Skill DMG" => StatKey::BattleSkillDmg,
            "Ultimate DMG" => StatKey::UltimateDmg,
            "Ultimate SP Gain" | "Ultimate Gain Efficiency" => StatKey::UltimateGain,
            "SP Recovery" => StatKey::SpRecovery,
            _ => return None,
        };
        Some(key)
    }

    /// Render a bonus the way the planner displays it ("ATK +12%", "DEF +30")
    pub fn format_bonus(self, value: f64) -> String {
        let suffix = if self.is_percent() { "%" } else { "" };
        format!("{} +{}{}", self.label(), trim_number(value), suffix)
    }
}

/// Format a number without trailing zeros ("12", "0.15")
pub fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let text = format!("{:.4}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Character promotion stage (0-4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct EliteTier(u8);

impl EliteTier {
    pub const MAX: u8 = 4;

    /// Create a tier, clamping into 0..=4
    pub fn new(tier: u8) -> Self {
        EliteTier(tier.min(Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Inclusive character level range for this tier
    pub fn level_range(self) -> (u32, u32) {
        match self.0 {
            0 => (1, 20),
            1 => (20, 40),
            2 => (40, 60),
            3 => (60, 80),
            _ => (80, 90),
        }
    }

    /// Clamp a character level into this tier's range
    pub fn clamp_level(self, level: u32) -> u32 {
        let (min, max) = self.level_range();
        level.clamp(min, max)
    }

    /// Whether talent tier `tier` (1-based) is unlocked
    pub fn unlocks(self, tier: u8) -> bool {
        tier >= 1 && tier <= self.0
    }
}

impl From<u8> for EliteTier {
    fn from(tier: u8) -> Self {
        EliteTier::new(tier)
    }
}

impl From<EliteTier> for u8 {
    fn from(tier: EliteTier) -> Self {
        tier.0
    }
}

/// Gear slot on a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GearSlot {
    Armor,
    Gloves,
    Kit1,
    Kit2,
}

impl GearSlot {
    /// Get all gear slots
    pub fn all() -> &'static [GearSlot] {
        &[GearSlot::Armor, GearSlot::Gloves, GearSlot::Kit1, GearSlot::Kit2]
    }
}

/// Kind of gear item; kits fit either kit slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GearKind {
    Armor,
    Gloves,
    Kit,
}

impl GearKind {
    /// Map the catalogue's slot group name ("Body", "Hand", "EDC")
    pub fn from_catalogue(group: &str) -> Option<GearKind> {
        match group {
            "Body" => Some(GearKind::Armor),
            "Hand" => Some(GearKind::Gloves),
            "EDC" => Some(GearKind::Kit),
            _ => None,
        }
    }

    /// Whether an item of this kind can be equipped in `slot`
    pub fn fits(self, slot: GearSlot) -> bool {
        matches!(
            (self, slot),
            (GearKind::Armor, GearSlot::Armor)
                | (GearKind::Gloves, GearSlot::Gloves)
                | (GearKind::Kit, GearSlot::Kit1)
                | (GearKind::Kit, GearSlot::Kit2)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elite_level_ranges() {
        assert_eq!(EliteTier::new(0).level_range(), (1, 20));
        assert_eq!(EliteTier::new(2).level_range(), (40, 60));
        assert_eq!(EliteTier::new(4).level_range(), (80, 90));
        // Out of range tiers clamp to 4
        assert_eq!(EliteTier::new(9).value(), 4);
    }

    #[test]
    fn test_elite_clamps_level() {
        assert_eq!(EliteTier::new(1).clamp_level(5), 20);
        assert_eq!(EliteTier::new(1).clamp_level(33), 33);
        assert_eq!(EliteTier::new(1).clamp_level(70), 40);
    }

    #[test]
    fn test_elite_unlocks() {
        let tier = EliteTier::new(2);
        assert!(!tier.unlocks(0));
        assert!(tier.unlocks(1));
        assert!(tier.unlocks(2));
        assert!(!tier.unlocks(3));
        assert!(!EliteTier::new(0).unlocks(1));
    }

    #[test]
    fn test_gear_kind_fits() {
        assert!(GearKind::Kit.fits(GearSlot::Kit1));
        assert!(GearKind::Kit.fits(GearSlot::Kit2));
        assert!(!GearKind::Kit.fits(GearSlot::Armor));
        assert!(GearKind::Gloves.fits(GearSlot::Gloves));
    }

    #[test]
    fn test_gear_names() {
        assert_eq!(StatKey::from_gear_name("DEF"), Some(StatKey::Def));
        assert_eq!(StatKey::from_gear_name("Ultimate SP Gain"), Some(StatKey::UltimateGain));
        assert_eq!(StatKey::from_gear_name("Luck"), None);
    }

    #[test]
    fn test_format_bonus() {
        assert_eq!(StatKey::AtkPercent.format_bonus(12.0), "ATK +12%");
        assert_eq!(StatKey::Def.format_bonus(30.0), "DEF +30");
        assert_eq!(StatKey::HeatDmg.format_bonus(7.5), "Heat DMG +7.5%");
    }

    #[test]
    fn test_attribute_lookup() {
        assert_eq!(Attribute::from_name("will"), Some(Attribute::Will));
        assert_eq!(Attribute::from_name(" Agility "), Some(Attribute::Agility));
        assert_eq!(Attribute::from_name("Luck"), None);
    }
}
