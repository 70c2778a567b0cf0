//! Weapon skill tables
//!
//! Row 0 holds the three skill headers, rows 1..=9 hold the per-rank value
//! text. Column 0 of every row is a label and is ignored.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::parser::{compile, scan_bonuses};
use crate::types::{Attribute, StatKey};

/// One of a weapon's three skills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillSlot {
    /// Attribute boost
    One,
    /// Percentage boost
    Two,
    /// Named passive
    Three,
}

impl SkillSlot {
    fn column(self) -> usize {
        match self {
            SkillSlot::One => 0,
            SkillSlot::Two => 1,
            SkillSlot::Three => 2,
        }
    }
}

/// Names an essence stat must equal to raise each skill's rank
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillBaseNames {
    pub skill1: String,
    pub skill2: String,
    pub skill3_prefix: String,
}

impl SkillBaseNames {
    /// Derive from the table headers: `[L]`/`[M]`/`[S]` suffixes are dropped
    /// and the passive contributes only the text before its colon
    pub fn from_headers(headers: &[String; 3]) -> Self {
        SkillBaseNames {
            skill1: strip_size_suffix(&headers[0]),
            skill2: strip_size_suffix(&headers[1]),
            skill3_prefix: headers[2]
                .split(':')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string(),
        }
    }
}

static SIZE_SUFFIX: Lazy<Option<Regex>> = Lazy::new(|| compile(r"(?i)\s*\[[LMS]\]$"));

fn strip_size_suffix(header: &str) -> String {
    let trimmed = header.trim();
    match SIZE_SUFFIX.as_ref() {
        Some(suffix) => suffix.replace(trimmed, "").into_owned(),
        None => trimmed.to_string(),
    }
}

/// A weapon's rank table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSkillTable {
    headers: [String; 3],
    ranks: Vec<[String; 3]>,
}

impl WeaponSkillTable {
    /// Build from raw rows; needs a header row and at least one rank row
    pub fn from_rows(rows: &[Vec<String>]) -> Option<Self> {
        let (header, ranks) = rows.split_first()?;
        if ranks.is_empty() {
            return None;
        }
        Some(WeaponSkillTable {
            headers: skill_columns(header),
            ranks: ranks.iter().map(|row| skill_columns(row)).collect(),
        })
    }

    pub fn header(&self, slot: SkillSlot) -> &str {
        &self.headers[slot.column()]
    }

    pub fn base_names(&self) -> SkillBaseNames {
        SkillBaseNames::from_headers(&self.headers)
    }

    pub fn rank_count(&self) -> usize {
        self.ranks.len()
    }

    /// Value text for `slot` at a 1-based `rank`
    pub fn value(&self, slot: SkillSlot, rank: u8) -> Option<&str> {
        let row = self.ranks.get(usize::from(rank).checked_sub(1)?)?;
        let text = row[slot.column()].trim();
        (!text.is_empty()).then_some(text)
    }
}

fn skill_columns(row: &[String]) -> [String; 3] {
    let cell = |index: usize| row.get(index).cloned().unwrap_or_default();
    [cell(1), cell(2), cell(3)]
}

/// What a skill 1 boost raises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostTarget {
    Attribute(Attribute),
    /// The wielder's main attribute
    MainAttribute,
}

/// Parsed skill 1 value ("Agility +20", "Main attribute +17")
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributeBoost {
    pub target: BoostTarget,
    pub value: f64,
}

pub fn parse_skill1(text: &str) -> Option<AttributeBoost> {
    let (name, value) = text.trim().rsplit_once('+')?;
    let value: f64 = value.trim().parse().ok()?;
    let name = name.trim().to_ascii_lowercase();

    let target = if name.contains("main attribute") {
        BoostTarget::MainAttribute
    } else {
        let attribute = Attribute::all()
            .iter()
            .copied()
            .find(|attr| name.contains(&attr.label().to_ascii_lowercase()))?;
        BoostTarget::Attribute(attribute)
    };
    Some(AttributeBoost { target, value })
}

/// Parsed skill 2 value; ATK% is folded into base ATK by the caller
pub fn parse_skill2(text: &str) -> BTreeMap<StatKey, f64> {
    scan_bonuses(text)
}
