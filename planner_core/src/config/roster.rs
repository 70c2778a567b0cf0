//! Built-in operator roster and weapon catalogue loading

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::character::Character;
use crate::weapon::WeaponDef;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RosterConfig {
    #[serde(default)]
    characters: Vec<Character>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WeaponsConfig {
    #[serde(default)]
    weapons: Vec<WeaponDef>,
}

fn roster_map(config: RosterConfig) -> BTreeMap<String, Character> {
    config
        .characters
        .into_iter()
        .map(|character| (character.id.clone(), character))
        .collect()
}

fn weapon_map(config: WeaponsConfig) -> BTreeMap<String, WeaponDef> {
    config
        .weapons
        .into_iter()
        .map(|weapon| (weapon.id.clone(), weapon))
        .collect()
}

/// Load an operator roster from a TOML file
pub fn load_roster(path: &Path) -> Result<BTreeMap<String, Character>, ConfigError> {
    let config: RosterConfig = super::load_toml(path)?;
    Ok(roster_map(config))
}

/// Load an operator roster from a TOML string
pub fn parse_roster(content: &str) -> Result<BTreeMap<String, Character>, ConfigError> {
    let config: RosterConfig = super::parse_toml(content)?;
    Ok(roster_map(config))
}

/// Load a weapon catalogue from a TOML file
pub fn load_weapons(path: &Path) -> Result<BTreeMap<String, WeaponDef>, ConfigError> {
    let config: WeaponsConfig = super::load_toml(path)?;
    Ok(weapon_map(config))
}

/// Load a weapon catalogue from a TOML string
pub fn parse_weapons(content: &str) -> Result<BTreeMap<String, WeaponDef>, ConfigError> {
    let config: WeaponsConfig = super::parse_toml(content)?;
    Ok(weapon_map(config))
}

/// Get the built-in operator roster
pub fn default_roster() -> BTreeMap<String, Character> {
    let toml = include_str!("../../config/operators.toml");
    parse_roster(toml).unwrap_or_else(|err| {
        log::error!("built-in operator roster failed to parse: {err}");
        BTreeMap::new()
    })
}

/// Get the built-in weapon catalogue
pub fn default_weapons() -> BTreeMap<String, WeaponDef> {
    let toml = include_str!("../../config/weapons.toml");
    parse_weapons(toml).unwrap_or_else(|err| {
        log::error!("built-in weapon catalogue failed to parse: {err}");
        BTreeMap::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Attribute;

    #[test]
    fn test_parse_roster() {
        let toml = r#"
[[characters]]
id = "perlica"
name = "Perlica"
rarity = 5
class = "Caster"
element = "Electric"
weapon_type = "Arts Unit"
main_attribute = "Intellect"
sub_attribute = "Will"
base_atk = 27
base_hp = 480
"#;

        let roster = parse_roster(toml).unwrap();
        let perlica = &roster["perlica"];
        assert_eq!(perlica.main_attribute, Attribute::Intellect);
        assert!((perlica.base_atk - 27.0).abs() < f64::EPSILON);
        assert!(perlica.attributes.is_none());
        assert!(perlica.talents.is_empty());
    }

    #[test]
    fn test_default_roster_loads_all() {
        let roster = default_roster();
        assert_eq!(roster.len(), 23, "Expected 23 operators from config");
        assert!(roster.contains_key("endministrator"));
    }

    #[test]
    fn test_default_weapons_loads_all() {
        let weapons = default_weapons();
        assert_eq!(weapons.len(), 62, "Expected 62 weapons from config");
        assert!(weapons.values().any(|weapon| weapon.signature.is_some()));
        assert!(weapons.values().all(|weapon| (3..=6).contains(&weapon.rarity)));
    }
}
