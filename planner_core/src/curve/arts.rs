//! Arts intensity effects

use serde::{Deserialize, Serialize};

use super::sample;

/// Arts intensity -> effect enhancement (%) control points
pub const EFFECT_ENHANCEMENT_POINTS: [(f64, f64); 14] = [
    (0.0, 0.0),
    (30.0, 18.0),
    (50.0, 28.0),
    (85.0, 44.0),
    (100.0, 48.0),
    (117.0, 56.0),
    (126.0, 59.0),
    (138.0, 63.0),
    (153.0, 67.0),
    (168.0, 71.0),
    (200.0, 79.0),
    (204.0, 80.0),
    (250.0, 88.0),
    (300.0, 95.0),
];

/// Stagger bonus per point of arts intensity
pub const STAGGER_PER_INTENSITY: f64 = 0.5;

/// Effect enhancement (%) for an arts intensity value, floored
pub fn effect_enhancement(intensity: f64) -> f64 {
    if intensity <= 0.0 {
        return 0.0;
    }
    sample(&EFFECT_ENHANCEMENT_POINTS, intensity).floor()
}

/// Bonuses derived from a character's total arts intensity
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtsEffects {
    /// Nonlinear effect enhancement (%)
    pub effect_enhancement: f64,
    /// Arts damage bonus (%)
    pub damage_bonus: f64,
    /// Stagger bonus (%)
    pub stagger_bonus: f64,
}

impl ArtsEffects {
    pub fn from_intensity(intensity: f64) -> Self {
        let intensity = intensity.max(0.0);
        ArtsEffects {
            effect_enhancement: effect_enhancement(intensity),
            damage_bonus: intensity.floor(),
            stagger_bonus: (intensity * STAGGER_PER_INTENSITY).floor(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::BreakpointTable;

    #[test]
    fn test_table_is_valid() {
        assert!(BreakpointTable::new(EFFECT_ENHANCEMENT_POINTS.to_vec()).is_ok());
    }

    #[test]
    fn test_control_points() {
        assert!((effect_enhancement(100.0) - 48.0).abs() < f64::EPSILON);
        assert!((effect_enhancement(204.0) - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_between_points() {
        // 48 + 8 * 10/17 = 52.7
        let value = effect_enhancement(110.0);
        assert!(value > 48.0 && value < 56.0);
        assert!((value - 52.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clamps() {
        assert!((effect_enhancement(-10.0)).abs() < f64::EPSILON);
        assert!((effect_enhancement(0.0)).abs() < f64::EPSILON);
        assert!((effect_enhancement(450.0) - 95.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_linear_effects() {
        let effects = ArtsEffects::from_intensity(75.0);
        assert!((effects.damage_bonus - 75.0).abs() < f64::EPSILON);
        assert!((effects.stagger_bonus - 37.0).abs() < f64::EPSILON);
        // 28 + 16 * 25/35 = 39.4
        assert!((effects.effect_enhancement - 39.0).abs() < f64::EPSILON);
    }
}
