//! Planner constants configuration

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Tunable stat engine constants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerConstants {
    #[serde(default)]
    pub attribute: AttributeConstants,
    #[serde(default)]
    pub defense: DefenseConstants,
    #[serde(default)]
    pub crit: CritConstants,
    #[serde(default)]
    pub set: SetConstants,
    #[serde(default)]
    pub fallback: FallbackConstants,
}

impl PlannerConstants {
    /// Reject values that would make the final formulas meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.defense.constant <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "defense.constant must be positive, got {}",
                self.defense.constant
            )));
        }
        if self.set.piece_threshold == 0 {
            return Err(ConfigError::ValidationError(
                "set.piece_threshold must be at least 1".to_string(),
            ));
        }
        let rates = [
            ("attribute.main_atk_rate", self.attribute.main_atk_rate),
            ("attribute.sub_atk_rate", self.attribute.sub_atk_rate),
            ("attribute.hp_per_strength", self.attribute.hp_per_strength),
        ];
        if let Some((name, value)) = rates.iter().find(|(_, value)| *value < 0.0) {
            return Err(ConfigError::ValidationError(format!("{name} must not be negative, got {value}")));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeConstants {
    /// ATK% per point of the main attribute
    #[serde(default = "default_main_atk_rate")]
    pub main_atk_rate: f64,
    /// ATK% per point of the sub attribute
    #[serde(default = "default_sub_atk_rate")]
    pub sub_atk_rate: f64,
    /// Flat HP per point of Strength
    #[serde(default = "default_hp_per_strength")]
    pub hp_per_strength: f64,
}

impl Default for AttributeConstants {
    fn default() -> Self {
        AttributeConstants {
            main_atk_rate: 0.5,
            sub_atk_rate: 0.2,
            hp_per_strength: 5.0,
        }
    }
}

fn default_main_atk_rate() -> f64 {
    0.5
}
fn default_sub_atk_rate() -> f64 {
    0.2
}
fn default_hp_per_strength() -> f64 {
    5.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseConstants {
    /// Formula constant: reduction = def / (def + constant) * 100
    #[serde(default = "default_defense_constant")]
    pub constant: f64,
}

impl Default for DefenseConstants {
    fn default() -> Self {
        DefenseConstants { constant: 200.0 }
    }
}

fn default_defense_constant() -> f64 {
    200.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CritConstants {
    /// Critical rate every character starts with (percent)
    #[serde(default = "default_base_crit_rate")]
    pub base_rate: f64,
}

impl Default for CritConstants {
    fn default() -> Self {
        CritConstants { base_rate: 5.0 }
    }
}

fn default_base_crit_rate() -> f64 {
    5.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetConstants {
    /// Pieces of one set needed for its effect
    #[serde(default = "default_piece_threshold")]
    pub piece_threshold: usize,
}

impl Default for SetConstants {
    fn default() -> Self {
        SetConstants { piece_threshold: 3 }
    }
}

fn default_piece_threshold() -> usize {
    3
}

/// Linear approximations used until a character's attribute tables load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackConstants {
    /// Base ATK growth per level, as a fraction of level-1 ATK
    #[serde(default = "default_atk_growth")]
    pub atk_growth: f64,
    #[serde(default = "default_hp_per_level")]
    pub hp_per_level: f64,
    #[serde(default = "default_attribute_base")]
    pub attribute_base: f64,
    #[serde(default = "default_attribute_per_level")]
    pub attribute_per_level: f64,
}

impl Default for FallbackConstants {
    fn default() -> Self {
        FallbackConstants {
            atk_growth: 0.03,
            hp_per_level: 55.0,
            attribute_base: 20.0,
            attribute_per_level: 0.5,
        }
    }
}

fn default_atk_growth() -> f64 {
    0.03
}
fn default_hp_per_level() -> f64 {
    55.0
}
fn default_attribute_base() -> f64 {
    20.0
}
fn default_attribute_per_level() -> f64 {
    0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let constants = PlannerConstants::default();
        assert!((constants.attribute.main_atk_rate - 0.5).abs() < f64::EPSILON);
        assert!((constants.defense.constant - 200.0).abs() < f64::EPSILON);
        assert!((constants.crit.base_rate - 5.0).abs() < f64::EPSILON);
        assert_eq!(constants.set.piece_threshold, 3);
        assert!(constants.validate().is_ok());
    }

    #[test]
    fn test_parse_constants() {
        let toml = r#"
[attribute]
main_atk_rate = 0.5
sub_atk_rate = 0.2
hp_per_strength = 5

[defense]
constant = 250

[fallback]
hp_per_level = 60
"#;

        let constants: PlannerConstants = toml::from_str(toml).unwrap();
        assert!((constants.defense.constant - 250.0).abs() < f64::EPSILON);
        assert!((constants.fallback.hp_per_level - 60.0).abs() < f64::EPSILON);
        // Omitted sections and fields keep their defaults
        assert!((constants.fallback.atk_growth - 0.03).abs() < f64::EPSILON);
        assert_eq!(constants.set.piece_threshold, 3);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut constants = PlannerConstants::default();
        constants.defense.constant = 0.0;
        assert!(matches!(constants.validate(), Err(ConfigError::ValidationError(_))));

        let mut constants = PlannerConstants::default();
        constants.attribute.sub_atk_rate = -1.0;
        assert!(constants.validate().is_err());
    }
}
