//! Character - Operator definitions and base attribute resolution

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::PlannerConstants;
use crate::curve::BreakpointTable;
use crate::types::{Attribute, EliteTier};

/// Per-level attribute tables for one character
///
/// Each table holds the values at levels 1, 20, 40, 60, 80 and 90.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterAttributes {
    pub atk: BreakpointTable,
    pub hp: BreakpointTable,
    pub strength: BreakpointTable,
    pub agility: BreakpointTable,
    pub intellect: BreakpointTable,
    pub will: BreakpointTable,
}

impl CharacterAttributes {
    pub fn attribute(&self, attribute: Attribute) -> &BreakpointTable {
        match attribute {
            Attribute::Strength => &self.strength,
            Attribute::Agility => &self.agility,
            Attribute::Intellect => &self.intellect,
            Attribute::Will => &self.will,
        }
    }
}

/// An operator from the roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub rarity: u8,
    pub class: String,
    pub element: String,
    pub weapon_type: String,
    pub main_attribute: Attribute,
    pub sub_attribute: Attribute,
    /// Level-1 ATK used until attribute tables load
    pub base_atk: f64,
    /// Level-1 HP used until attribute tables load
    pub base_hp: f64,
    #[serde(default)]
    pub attributes: Option<CharacterAttributes>,
    /// Talent name -> "Elite N" -> description
    #[serde(default)]
    pub talents: BTreeMap<String, BTreeMap<String, String>>,
}

/// Base values of a character before any gear, weapon or talent
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BaseValues {
    pub atk: f64,
    pub hp: f64,
    pub strength: f64,
    pub agility: f64,
    pub intellect: f64,
    pub will: f64,
}

impl BaseValues {
    pub fn attribute(&self, attribute: Attribute) -> f64 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Agility => self.agility,
            Attribute::Intellect => self.intellect,
            Attribute::Will => self.will,
        }
    }
}

impl Character {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        main_attribute: Attribute,
        sub_attribute: Attribute,
    ) -> Self {
        Character {
            id: id.into(),
            name: name.into(),
            rarity: 6,
            class: String::new(),
            element: String::new(),
            weapon_type: String::new(),
            main_attribute,
            sub_attribute,
            base_atk: 0.0,
            base_hp: 0.0,
            attributes: None,
            talents: BTreeMap::new(),
        }
    }

    pub fn with_base(mut self, base_atk: f64, base_hp: f64) -> Self {
        self.base_atk = base_atk;
        self.base_hp = base_hp;
        self
    }

    pub fn with_attributes(mut self, attributes: CharacterAttributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn with_talent(mut self, name: impl Into<String>, tiers: &[(u8, &str)]) -> Self {
        let tiers = tiers
            .iter()
            .map(|(tier, text)| (crate::talent::tier_label(*tier), text.to_string()))
            .collect();
        self.talents.insert(name.into(), tiers);
        self
    }

    /// Base ATK, HP and attributes at `level`, clamped into the elite's range
    ///
    /// Interpolates the attribute tables when loaded, otherwise falls back to
    /// the linear approximations in [`FallbackConstants`](crate::config::FallbackConstants).
    pub fn base_values(&self, level: u32, elite: EliteTier, constants: &PlannerConstants) -> BaseValues {
        let level = elite.clamp_level(level);
        let x = f64::from(level);

        match &self.attributes {
            Some(tables) => BaseValues {
                atk: tables.atk.floor_at(x),
                hp: tables.hp.floor_at(x),
                strength: tables.strength.floor_at(x),
                agility: tables.agility.floor_at(x),
                intellect: tables.intellect.floor_at(x),
                will: tables.will.floor_at(x),
            },
            None => {
                log::debug!("{}: attribute tables not loaded, using fallback formulas", self.id);
                let fallback = &constants.fallback;
                let attribute = (fallback.attribute_base + x * fallback.attribute_per_level).floor();
                BaseValues {
                    atk: (self.base_atk * (1.0 + (x - 1.0) * fallback.atk_growth)).floor(),
                    hp: (self.base_hp + (x - 1.0) * fallback.hp_per_level).floor(),
                    strength: attribute,
                    agility: attribute,
                    intellect: attribute,
                    will: attribute,
                }
            }
        }
    }
}
