//! Data - Immutable reference data and build snapshots
//!
//! A [`DataContext`] is built once from the built-in catalogues and any JSON
//! descriptors the host has fetched, then passed by reference into every
//! computation. A [`BuildSnapshot`] names the user's selections by id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::character::{Character, CharacterAttributes};
use crate::conditions::BattleConditions;
use crate::config::{default_roster, default_weapons, PlannerConstants};
use crate::curve::{BreakpointTable, CurveError};
use crate::gear::{parse_stat_value, GearItem, GearSet, NON_UPGRADEABLE_STATS};
use crate::stat_block::{compute_stats, BuildInput, DerivedStats};
use crate::talent::active_talents;
use crate::types::{EliteTier, GearKind, GearSlot};
use crate::weapon::{WeaponDef, WeaponInstance, WeaponSkillTable};

/// Column labels of a character attribute table, levels 1..90
pub const ATTRIBUTE_COLUMNS: [&str; 6] = ["Base", "Elite 1", "Elite 2", "Elite 3", "Elite 4", "Elite 4 Max"];

/// Descriptor loading or snapshot resolution error
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid {name} table: {source}")]
    Curve { name: String, source: CurveError },
    #[error("Unknown character: {0}")]
    UnknownCharacter(String),
    #[error("Unknown weapon: {0}")]
    UnknownWeapon(String),
    #[error("Missing field: {0}")]
    MissingField(String),
}

/// A gear item chosen for a slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquippedGear {
    pub item_id: String,
    /// Upgrade level (0-3) per stat name
    #[serde(default)]
    pub upgrades: BTreeMap<String, u8>,
}

impl EquippedGear {
    pub fn new(item_id: impl Into<String>) -> Self {
        EquippedGear {
            item_id: item_id.into(),
            upgrades: BTreeMap::new(),
        }
    }

    pub fn with_upgrade(mut self, stat: impl Into<String>, level: u8) -> Self {
        self.upgrades.insert(stat.into(), level);
        self
    }
}

/// The user's selections, by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSnapshot {
    pub character_id: String,
    pub level: u32,
    #[serde(default)]
    pub elite: EliteTier,
    #[serde(default)]
    pub gear: BTreeMap<GearSlot, EquippedGear>,
    #[serde(default)]
    pub weapon: Option<WeaponInstance>,
    #[serde(default)]
    pub conditions: BattleConditions,
}

impl BuildSnapshot {
    pub fn new(character_id: impl Into<String>, level: u32, elite: EliteTier) -> Self {
        BuildSnapshot {
            character_id: character_id.into(),
            level,
            elite,
            gear: BTreeMap::new(),
            weapon: None,
            conditions: BattleConditions::default(),
        }
    }

    pub fn with_gear(mut self, slot: GearSlot, gear: EquippedGear) -> Self {
        self.gear.insert(slot, gear);
        self
    }

    pub fn with_weapon(mut self, weapon: WeaponInstance) -> Self {
        self.weapon = Some(weapon);
        self
    }

    pub fn with_conditions(mut self, conditions: BattleConditions) -> Self {
        self.conditions = conditions;
        self
    }
}

/// All reference data a computation may read
#[derive(Debug, Clone, Default)]
pub struct DataContext {
    pub characters: BTreeMap<String, Character>,
    pub weapons: BTreeMap<String, WeaponDef>,
    pub gear: BTreeMap<String, GearItem>,
    pub gear_sets: BTreeMap<String, GearSet>,
    pub constants: PlannerConstants,
}

// === JSON descriptor shapes ===

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EquipmentSetJson {
    #[serde(default)]
    set_effect: String,
    #[serde(default)]
    equipment: BTreeMap<String, Vec<EquipmentItemJson>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EquipmentItemJson {
    item_id: String,
    #[serde(default)]
    base_stats: BTreeMap<String, Value>,
    #[serde(default)]
    stat_upgrades: BTreeMap<String, BTreeMap<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct AttributesJson {
    stats: BTreeMap<String, BTreeMap<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct TalentsJson {
    #[serde(default)]
    upgrades: BTreeMap<String, BTreeMap<String, String>>,
}

/// Display text of a descriptor cell (numbers or strings)
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Numeric value of a descriptor cell; malformed cells read as zero
fn cell_number(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => parse_stat_value(text),
        _ => {
            log::debug!("non-numeric descriptor cell {value}, using 0");
            0.0
        }
    }
}

/// "item_equip_t4_suit_attri01_body_01" -> "Body"
fn piece_label(item_id: &str) -> String {
    let trimmed = match item_id.rsplit_once('_') {
        Some((head, tail)) if !tail.is_empty() && tail.chars().all(|c| c.is_ascii_digit()) => head,
        _ => item_id,
    };
    let part = trimmed.rsplit('_').next().unwrap_or(trimmed);
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Catalogue entry to [`GearItem`]; DEF upgrade tables are dropped
fn gear_item_from_json(set_name: &str, kind: GearKind, raw: &EquipmentItemJson) -> GearItem {
    let mut item = GearItem::new(raw.item_id.clone(), set_name, kind)
        .with_name(format!("{set_name} {}", piece_label(&raw.item_id)));
    for (stat, value) in &raw.base_stats {
        item = item.with_stat(stat.clone(), cell_text(value));
    }
    for (stat, table) in &raw.stat_upgrades {
        if NON_UPGRADEABLE_STATS.contains(&stat.as_str()) {
            continue;
        }
        let table = table
            .iter()
            .map(|(level, delta)| (level.clone(), cell_text(delta)))
            .collect();
        item.stat_upgrades.insert(stat.clone(), table);
    }
    item
}

impl DataContext {
    /// Empty context with default constants
    pub fn new() -> Self {
        Self::default()
    }

    /// Context holding the built-in roster and weapon catalogue
    pub fn with_defaults() -> Self {
        DataContext {
            characters: default_roster(),
            weapons: default_weapons(),
            ..Default::default()
        }
    }

    pub fn with_constants(mut self, constants: PlannerConstants) -> Self {
        self.constants = constants;
        self
    }

    pub fn with_character(mut self, character: Character) -> Self {
        self.characters.insert(character.id.clone(), character);
        self
    }

    pub fn with_weapon(mut self, weapon: WeaponDef) -> Self {
        self.weapons.insert(weapon.id.clone(), weapon);
        self
    }

    pub fn with_gear_item(mut self, item: GearItem) -> Self {
        self.gear.insert(item.id.clone(), item);
        self
    }

    pub fn with_gear_set(mut self, set: GearSet) -> Self {
        self.gear_sets.insert(set.name.clone(), set);
        self
    }

    /// Items of a kind, for slot pickers
    pub fn gear_for_slot(&self, slot: GearSlot) -> Vec<&GearItem> {
        self.gear.values().filter(|item| item.kind.fits(slot)).collect()
    }

    /// Weapons a character can wield
    pub fn weapons_for(&self, character: &Character) -> Vec<&WeaponDef> {
        self.weapons
            .values()
            .filter(|weapon| weapon.weapon_type == character.weapon_type)
            .collect()
    }

    /// Load an equipment catalogue: `{set: {setEffect, equipment: {Body|Hand|EDC: [items]}}}`
    ///
    /// Returns the number of items loaded. DEF upgrade tables are dropped.
    pub fn load_equipment_json(&mut self, json: &str) -> Result<usize, DataError> {
        let sets: BTreeMap<String, EquipmentSetJson> = serde_json::from_str(json)?;
        let mut loaded = 0;

        for (set_name, set) in sets {
            for (group, items) in &set.equipment {
                let Some(kind) = GearKind::from_catalogue(group) else {
                    log::warn!("set {set_name}: unknown equipment group {group:?}, skipping {} items", items.len());
                    continue;
                };
                for raw in items {
                    let item = gear_item_from_json(&set_name, kind, raw);
                    self.gear.insert(item.id.clone(), item);
                    loaded += 1;
                }
            }
            self.gear_sets
                .insert(set_name.clone(), GearSet::new(set_name, set.set_effect));
        }

        log::debug!("loaded {} gear items, {} sets", loaded, self.gear_sets.len());
        Ok(loaded)
    }

    fn character_mut(&mut self, character_id: &str) -> Result<&mut Character, DataError> {
        self.characters
            .get_mut(character_id)
            .ok_or_else(|| DataError::UnknownCharacter(character_id.to_string()))
    }

    fn weapon_mut(&mut self, weapon_id: &str) -> Result<&mut WeaponDef, DataError> {
        self.weapons
            .get_mut(weapon_id)
            .ok_or_else(|| DataError::UnknownWeapon(weapon_id.to_string()))
    }

    /// Attach attribute tables: `{"stats": {"ATK": {"Base": .., "Elite 4 Max": ..}, ..}}`
    pub fn attach_character_attributes(&mut self, character_id: &str, json: &str) -> Result<(), DataError> {
        let parsed: AttributesJson = serde_json::from_str(json)?;
        let table = |name: &str| -> Result<BreakpointTable, DataError> {
            let columns = parsed
                .stats
                .get(name)
                .ok_or_else(|| DataError::MissingField(format!("stats.{name}")))?;
            let mut values = [0.0; 6];
            for (value, label) in values.iter_mut().zip(ATTRIBUTE_COLUMNS) {
                let cell = columns
                    .get(label)
                    .ok_or_else(|| DataError::MissingField(format!("stats.{name}.{label}")))?;
                *value = cell_number(cell);
            }
            BreakpointTable::from_levels(values).map_err(|source| DataError::Curve {
                name: name.to_string(),
                source,
            })
        };

        let attributes = CharacterAttributes {
            atk: table("ATK")?,
            hp: table("HP")?,
            strength: table("STR")?,
            agility: table("AGL")?,
            intellect: table("INT")?,
            will: table("WIL")?,
        };
        self.character_mut(character_id)?.attributes = Some(attributes);
        Ok(())
    }

    /// Attach talents: `{"upgrades": {name: {"Elite N": description}}}`
    pub fn attach_character_talents(&mut self, character_id: &str, json: &str) -> Result<(), DataError> {
        let parsed: TalentsJson = serde_json::from_str(json)?;
        self.character_mut(character_id)?.talents = parsed.upgrades;
        Ok(())
    }

    /// Attach a skill table: row 0 headers, rows 1..=9 rank values
    pub fn attach_weapon_skills(&mut self, weapon_id: &str, json: &str) -> Result<(), DataError> {
        let rows: Vec<Vec<Value>> = serde_json::from_str(json)?;
        let rows: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();
        let table = WeaponSkillTable::from_rows(&rows)
            .ok_or_else(|| DataError::MissingField("skill table rows".to_string()))?;
        self.weapon_mut(weapon_id)?.skills = Some(table);
        Ok(())
    }

    /// Attach the ATK table from `["Base ATK", v1, v20, v40, v60, v80, v90]`
    pub fn attach_weapon_attributes(&mut self, weapon_id: &str, json: &str) -> Result<(), DataError> {
        let rows: Vec<Vec<Value>> = serde_json::from_str(json)?;
        let row = rows
            .iter()
            .find(|row| row.first().map(cell_text).as_deref() == Some("Base ATK"))
            .ok_or_else(|| DataError::MissingField("Base ATK row".to_string()))?;
        if row.len() < 7 {
            return Err(DataError::MissingField(format!("Base ATK values (got {})", row.len() - 1)));
        }

        let mut values = [0.0; 6];
        for (value, cell) in values.iter_mut().zip(&row[1..7]) {
            *value = cell_number(cell);
        }
        let curve = BreakpointTable::from_levels(values).map_err(|source| DataError::Curve {
            name: "Base ATK".to_string(),
            source,
        })?;

        let weapon = self.weapon_mut(weapon_id)?;
        weapon.base_atk = Some(values[0]);
        weapon.atk_curve = Some(curve);
        Ok(())
    }

    /// Resolve a snapshot against this context and compute its stats
    ///
    /// Unknown gear and weapon ids are skipped; only an unknown character
    /// is an error.
    pub fn compute(&self, snapshot: &BuildSnapshot) -> Result<DerivedStats, DataError> {
        let character = self
            .characters
            .get(&snapshot.character_id)
            .ok_or_else(|| DataError::UnknownCharacter(snapshot.character_id.clone()))?;
        let talents = active_talents(&character.talents, snapshot.elite);

        let mut input = BuildInput::new(character, snapshot.level, snapshot.elite, &snapshot.conditions)
            .with_gear_sets(&self.gear_sets)
            .with_talents(&talents);

        for (slot, equipped) in &snapshot.gear {
            match self.gear.get(&equipped.item_id) {
                Some(item) => input = input.with_upgraded_gear(*slot, item, &equipped.upgrades),
                None => log::warn!("unknown gear item {} in slot {:?}, skipping", equipped.item_id, slot),
            }
        }

        if let Some(instance) = &snapshot.weapon {
            match self.weapons.get(&instance.weapon_id) {
                Some(weapon) => input = input.with_weapon(weapon, instance),
                None => log::warn!("unknown weapon {}, skipping", instance.weapon_id),
            }
        }

        Ok(compute_stats(&input, &self.constants))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Attribute;

    const EQUIPMENT: &str = r#"{
        "Swift": {
            "setEffect": "3-piece set effect: Agility +30",
            "equipment": {
                "Body": [{"itemId": "item_equip_t4_suit_swift_body_01",
                          "baseStats": {"DEF": "56", "Agility": 40},
                          "statUpgrades": {"DEF": {"+1": "5"}, "Agility": {"+1": "4", "+2": "8", "+3": "12"}}}],
                "Hand": [{"itemId": "item_equip_t4_suit_swift_hand_01", "baseStats": {"Critical Rate": "5%"}}],
                "Relic": [{"itemId": "mystery"}]
            }
        }
    }"#;

    #[test]
    fn test_load_equipment_json() {
        let mut context = DataContext::new();
        let loaded = context.load_equipment_json(EQUIPMENT).unwrap();
        assert_eq!(loaded, 2);

        let body = &context.gear["item_equip_t4_suit_swift_body_01"];
        assert_eq!(body.name, "Swift Body");
        assert_eq!(body.kind, GearKind::Armor);
        assert_eq!(body.base_stats["Agility"], "40");
        assert!(!body.stat_upgrades.contains_key("DEF"));
        assert_eq!(body.upgradeable_stats(), vec!["Agility"]);

        assert!(context.gear_sets.contains_key("Swift"));
        assert_eq!(context.gear_for_slot(GearSlot::Gloves).len(), 1);
        assert!(context.gear_for_slot(GearSlot::Kit1).is_empty());
    }

    #[test]
    fn test_piece_label() {
        assert_eq!(piece_label("item_equip_t4_suit_attri01_body_01"), "Body");
        assert_eq!(piece_label("item_equip_t4_suit_attri01_edc"), "Edc");
    }

    #[test]
    fn test_attach_character_attributes() {
        let mut context = DataContext::new()
            .with_character(Character::new("op", "Op", Attribute::Agility, Attribute::Strength));
        let json = r#"{"stats": {
            "ATK": {"Base": "30", "Elite 1": "100", "Elite 2": "180", "Elite 3": "260", "Elite 4": "340", "Elite 4 Max": "380"},
            "HP":  {"Base": 500, "Elite 1": 1500, "Elite 2": 2500, "Elite 3": 3500, "Elite 4": 4500, "Elite 4 Max": 5000},
            "STR": {"Base": 10, "Elite 1": 20, "Elite 2": 30, "Elite 3": 40, "Elite 4": 50, "Elite 4 Max": 55},
            "AGL": {"Base": 10, "Elite 1": 20, "Elite 2": 30, "Elite 3": 40, "Elite 4": 50, "Elite 4 Max": 55},
            "INT": {"Base": 10, "Elite 1": 20, "Elite 2": 30, "Elite 3": 40, "Elite 4": 50, "Elite 4 Max": 55},
            "WIL": {"Base": 10, "Elite 1": 20, "Elite 2": 30, "Elite 3": 40, "Elite 4": 50, "Elite 4 Max": 55}
        }}"#;
        context.attach_character_attributes("op", json).unwrap();
        let attributes = context.characters["op"].attributes.as_ref().unwrap();
        assert!((attributes.atk.value_at(90.0) - 380.0).abs() < f64::EPSILON);

        assert!(matches!(
            context.attach_character_attributes("nobody", json),
            Err(DataError::UnknownCharacter(_))
        ));
        assert!(matches!(
            context.attach_character_attributes("op", r#"{"stats": {}}"#),
            Err(DataError::MissingField(_))
        ));
    }

    #[test]
    fn test_attach_weapon_tables() {
        let mut context = DataContext::new().with_weapon(WeaponDef::new("wpn", "Blade", "Sword", 6));
        context
            .attach_weapon_attributes("wpn", r#"[["Level", 1, 20, 40, 60, 80, 90], ["Base ATK", "51", "146", "247", "348", "449", "500"]]"#)
            .unwrap();
        let weapon = &context.weapons["wpn"];
        assert_eq!(weapon.base_atk, Some(51.0));
        assert!((weapon.atk_at(90) - 500.0).abs() < f64::EPSILON);

        context
            .attach_weapon_skills(
                "wpn",
                r#"[["", "Agility Boost [L]", "Attack Boost [M]", "Pursuit: Chase"], [1, "Agility +10", "Attack +3%", "ATK +2%"]]"#,
            )
            .unwrap();
        let skills = context.weapons["wpn"].skills.as_ref().unwrap();
        assert_eq!(skills.base_names().skill3_prefix, "Pursuit");

        assert!(matches!(
            context.attach_weapon_skills("wpn", "[]"),
            Err(DataError::MissingField(_))
        ));
        assert!(matches!(
            context.attach_weapon_attributes("wpn", r#"[["Base ATK", 1, 2]]"#),
            Err(DataError::MissingField(_))
        ));
    }

    #[test]
    fn test_unknown_character_is_an_error() {
        let context = DataContext::new();
        let snapshot = BuildSnapshot::new("ghost", 90, EliteTier::new(4));
        assert!(matches!(context.compute(&snapshot), Err(DataError::UnknownCharacter(_))));
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        let context = DataContext::new()
            .with_character(Character::new("op", "Op", Attribute::Agility, Attribute::Strength).with_base(30.0, 500.0));
        let snapshot = BuildSnapshot::new("op", 90, EliteTier::new(4))
            .with_gear(GearSlot::Armor, EquippedGear::new("missing"))
            .with_weapon(WeaponInstance::new("missing"));
        let stats = context.compute(&snapshot).unwrap();
        assert!(stats.weapon.is_none());
        assert!((stats.defense).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_context_has_catalogues() {
        let context = DataContext::with_defaults();
        let character = &context.characters["endministrator"];
        assert!(!context.weapons_for(character).is_empty());
    }
}
