//! StatValue - Base + flat scaled by a percentage pool

use serde::{Deserialize, Serialize};

/// A stat computed as `(base + flat) × (1 + percent / 100)`
///
/// Final ATK and HP both take this shape: ATK has no flat part and scales by
/// the total ATK bonus, HP adds Strength-derived flat HP and scales by Max HP%.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatValue {
    pub base: f64,
    pub flat: f64,
    /// Sum of percentage bonuses (15.0 = +15%)
    pub percent: f64,
}

impl StatValue {
    pub fn with_base(base: f64) -> Self {
        StatValue {
            base,
            ..Default::default()
        }
    }

    pub fn add_flat(&mut self, value: f64) {
        self.flat += value;
    }

    pub fn add_percent(&mut self, value: f64) {
        self.percent += value;
    }

    pub fn compute(&self) -> f64 {
        (self.base + self.flat) * (1.0 + self.percent / 100.0)
    }

    /// The displayed value, floored to an integer
    pub fn compute_floor(&self) -> i64 {
        self.compute().floor() as i64
    }
}
