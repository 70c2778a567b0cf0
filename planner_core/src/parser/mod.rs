//! Description parser - Extracts numeric bonuses from ability text
//!
//! Talents, weapon passives and set effects are free text ("Heat DMG Dealt
//! +10%. After applying Combustion, ATK +15%"). Parsing runs in a fixed order:
//!
//! 1. Attribute flat bonuses (`Operator Agility +10`) - additive across tiers
//! 2. Attribute scaling formulas - evaluated live against final attributes
//! 3. The ordered stat rule battery, split into base and conditional halves
//!    at the first "When"/"After"; a trailing clause with no recognised
//!    trigger is ignored

mod condition;
mod rules;

pub use condition::{boundary, detect, ConditionKind};
pub use rules::{match_rule, scan_bonuses, BonusRule, Unit, BONUS_RULES};

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::{Attribute, StatKey};

/// How a talent tier combines with earlier tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationPolicy {
    /// Summed across tiers (flat attribute bonuses)
    Additive,
    /// Latest tier replaces earlier tiers
    #[default]
    Overriding,
    /// Recomputed from live attribute values on every evaluation
    LiveScaling,
}

/// A bonus proportional to live attribute values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingFormula {
    /// Attributes whose values are summed
    pub attributes: Vec<Attribute>,
    /// Attribute points per step
    pub per_points: f64,
    /// Bonus granted per step
    pub bonus: f64,
    pub target: StatKey,
}

impl ScalingFormula {
    /// Evaluate against the current attribute values
    pub fn evaluate(&self, attribute_value: impl Fn(Attribute) -> f64) -> f64 {
        if self.per_points <= 0.0 {
            return 0.0;
        }
        let total: f64 = self.attributes.iter().map(|attr| attribute_value(*attr)).sum();
        total / self.per_points * self.bonus
    }
}

/// Structured result of parsing one description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedDescription {
    pub policy: CombinationPolicy,
    /// Always-active bonuses
    pub bonuses: BTreeMap<StatKey, f64>,
    /// Bonuses that need the condition toggled on
    pub conditional_bonuses: BTreeMap<StatKey, f64>,
    pub condition: Option<ConditionKind>,
    /// In-combat stack limit
    pub max_stacks: Option<u32>,
    pub scaling: Option<ScalingFormula>,
}

impl ParsedDescription {
    pub fn is_additive(&self) -> bool {
        self.policy == CombinationPolicy::Additive
    }

    pub fn is_conditional(&self) -> bool {
        self.condition.is_some()
    }

    /// Whether anything numeric was recognised
    pub fn has_numeric_bonus(&self) -> bool {
        !self.bonuses.is_empty() || !self.conditional_bonuses.is_empty() || self.scaling.is_some()
    }
}

const ATTRIBUTE_NAMES: &str = "Strength|Agility|Intellect|Will";

static ATTRIBUTE_FLAT: Lazy<Option<Regex>> = Lazy::new(|| {
    compile(&format!(r"(?i)Operator\s+({ATTRIBUTE_NAMES})\s*\+\s*(\d+(?:\.\d+)?)"))
});

static SCALING_ATK: Lazy<Option<Regex>> = Lazy::new(|| {
    compile(&format!(
        r"(?i)Every point of ({ATTRIBUTE_NAMES})(?:\s+and\s+({ATTRIBUTE_NAMES}))?\s+(?:further\s+)?grants ATK\s*\+\s*(\d+(?:\.\d+)?)%"
    ))
});

static SCALING_ELEMENT: Lazy<Option<Regex>> = Lazy::new(|| {
    compile(&format!(
        r"(?i)For every (\d+) ({ATTRIBUTE_NAMES}),\s*(Physical|Heat|Cryo|Electric|Nature|Arts) DMG(?:\s+Dealt)?\s*\+\s*(\d+(?:\.\d+)?)%"
    ))
});

static SCALING_DEF: Lazy<Option<Regex>> = Lazy::new(|| {
    compile(&format!(
        r"(?i)For every (\d+) ({ATTRIBUTE_NAMES}),\s*DEF\s*\+\s*(\d+(?:\.\d+)?)"
    ))
});

static STACK_LIMIT: Lazy<Option<Regex>> =
    Lazy::new(|| compile(r"(?i)(?:can reach|up to)\s+(\d+)\s+stacks?"));

/// Compile a built-in pattern, logging instead of panicking on failure
pub(crate) fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(err) => {
            log::error!("invalid built-in pattern {pattern:?}: {err}");
            None
        }
    }
}

/// Parse a talent, passive or set description
pub fn parse_description(text: &str) -> ParsedDescription {
    let max_stacks = stack_limit(text);

    if let Some((attribute, value)) = attribute_flat_bonus(text) {
        let mut bonuses = BTreeMap::new();
        bonuses.insert(attribute.stat_key(), value);
        return ParsedDescription {
            policy: CombinationPolicy::Additive,
            bonuses,
            max_stacks,
            ..Default::default()
        };
    }

    if let Some(scaling) = scaling_formula(text) {
        return ParsedDescription {
            policy: CombinationPolicy::LiveScaling,
            max_stacks,
            scaling: Some(scaling),
            ..Default::default()
        };
    }

    let mut parsed = ParsedDescription {
        policy: CombinationPolicy::Overriding,
        max_stacks,
        ..Default::default()
    };
    match condition::split_trigger(text) {
        Some((split, Some(kind))) => {
            parsed.condition = Some(kind);
            parsed.bonuses = scan_bonuses(&text[..split]);
            parsed.conditional_bonuses = scan_bonuses(&text[split..]);
        }
        Some((split, None)) => {
            // Unrecognised trigger: the clause after the boundary never applies
            log::debug!("no trigger keyword after boundary, ignoring {:?}", &text[split..]);
            parsed.bonuses = scan_bonuses(&text[..split]);
        }
        None => parsed.bonuses = scan_bonuses(text),
    }

    if !parsed.has_numeric_bonus() {
        log::debug!("no bonus pattern matched: {text:?}");
    }
    parsed
}

/// `can reach N stacks` / `up to N stacks`
pub fn stack_limit(text: &str) -> Option<u32> {
    let caps = STACK_LIMIT.as_ref()?.captures(text)?;
    caps.get(1)?.as_str().parse().ok()
}

fn attribute_flat_bonus(text: &str) -> Option<(Attribute, f64)> {
    let caps = ATTRIBUTE_FLAT.as_ref()?.captures(text)?;
    let attribute = Attribute::from_name(caps.get(1)?.as_str())?;
    let value = caps.get(2)?.as_str().parse().ok()?;
    Some((attribute, value))
}

fn scaling_formula(text: &str) -> Option<ScalingFormula> {
    if let Some(caps) = SCALING_ATK.as_ref().and_then(|re| re.captures(text)) {
        let attributes = [caps.get(1), caps.get(2)]
            .into_iter()
            .flatten()
            .filter_map(|m| Attribute::from_name(m.as_str()))
            .collect();
        return Some(ScalingFormula {
            attributes,
            per_points: 1.0,
            bonus: caps.get(3)?.as_str().parse().ok()?,
            target: StatKey::AtkPercent,
        });
    }

    if let Some(caps) = SCALING_ELEMENT.as_ref().and_then(|re| re.captures(text)) {
        return Some(ScalingFormula {
            attributes: vec![Attribute::from_name(caps.get(2)?.as_str())?],
            per_points: caps.get(1)?.as_str().parse().ok()?,
            bonus: caps.get(4)?.as_str().parse().ok()?,
            target: element_damage(caps.get(3)?.as_str())?,
        });
    }

    if let Some(caps) = SCALING_DEF.as_ref().and_then(|re| re.captures(text)) {
        return Some(ScalingFormula {
            attributes: vec![Attribute::from_name(caps.get(2)?.as_str())?],
            per_points: caps.get(1)?.as_str().parse().ok()?,
            bonus: caps.get(3)?.as_str().parse().ok()?,
            target: StatKey::Def,
        });
    }

    None
}

fn element_damage(element: &str) -> Option<StatKey> {
    match element.to_ascii_lowercase().as_str() {
        "physical" => Some(StatKey::PhysicalDmg),
        "heat" => Some(StatKey::HeatDmg),
        "cryo" => Some(StatKey::CryoDmg),
        "electric" => Some(StatKey::ElectricDmg),
        "nature" => Some(StatKey::NatureDmg),
        "arts" => Some(StatKey::ArtsDmg),
        _ => None,
    }
}
