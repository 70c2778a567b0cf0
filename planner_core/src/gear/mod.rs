//! Gear - Equipment items, upgrades and set bonuses

mod set_bonus;
mod upgrade;

pub use set_bonus::{parse_set_effect, SetBonus, SetConditional};
pub use upgrade::{applied_stats, format_stat_value, MAX_UPGRADE_LEVEL};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::GearKind;

/// Stats never offered for upgrade
pub const NON_UPGRADEABLE_STATS: [&str; 1] = ["DEF"];

/// An equipment item definition
///
/// Stat values are display strings ("45", "12.5%"). Upgrade tables map a
/// stat name to its `"+1"`..`"+3"` deltas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearItem {
    pub id: String,
    pub name: String,
    pub set: String,
    pub kind: GearKind,
    #[serde(default)]
    pub base_stats: BTreeMap<String, String>,
    #[serde(default)]
    pub stat_upgrades: BTreeMap<String, BTreeMap<String, String>>,
}

impl GearItem {
    pub fn new(id: impl Into<String>, set: impl Into<String>, kind: GearKind) -> Self {
        let id = id.into();
        GearItem {
            name: id.clone(),
            id,
            set: set.into(),
            kind,
            base_stats: BTreeMap::new(),
            stat_upgrades: BTreeMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_stat(mut self, stat: impl Into<String>, value: impl Into<String>) -> Self {
        self.base_stats.insert(stat.into(), value.into());
        self
    }

    /// Add an upgrade table; `deltas` are the `+1`, `+2`, `+3` values in order
    pub fn with_upgrades(mut self, stat: impl Into<String>, deltas: &[&str]) -> Self {
        let table = deltas
            .iter()
            .enumerate()
            .map(|(i, delta)| (format!("+{}", i + 1), delta.to_string()))
            .collect();
        self.stat_upgrades.insert(stat.into(), table);
        self
    }

    /// Stats the player may choose upgrade levels for
    pub fn upgradeable_stats(&self) -> Vec<&str> {
        self.stat_upgrades
            .keys()
            .map(String::as_str)
            .filter(|stat| !NON_UPGRADEABLE_STATS.contains(stat))
            .collect()
    }
}

/// A named equipment set with its parsed 3-piece effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearSet {
    pub name: String,
    pub set_effect: String,
    pub bonus: SetBonus,
}

impl GearSet {
    pub fn new(name: impl Into<String>, set_effect: impl Into<String>) -> Self {
        let set_effect = set_effect.into();
        GearSet {
            name: name.into(),
            bonus: parse_set_effect(&set_effect),
            set_effect,
        }
    }
}

/// Numeric value of a display string; malformed text reads as zero
pub fn parse_stat_value(value: &str) -> f64 {
    let cleaned = value.trim().trim_end_matches('%').trim();
    match cleaned.parse::<f64>() {
        Ok(number) if number.is_finite() => number,
        _ => {
            log::debug!("malformed stat value {value:?}, using 0");
            0.0
        }
    }
}
