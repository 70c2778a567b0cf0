//! StatSource - Trait and implementations for stat providers

mod base_stats;
mod gear;
mod scaling;
mod set_bonus;
mod talent;
mod weapon;

pub use base_stats::BaseStatsSource;
pub use gear::GearSource;
pub use scaling::AttributeScalingSource;
pub use set_bonus::SetBonusSource;
pub use talent::TalentSource;
pub use weapon::{PassiveBreakdown, WeaponBreakdown, WeaponSource};

use crate::stat_block::StatAccumulator;

/// Trait for anything that contributes stats to a build
pub trait StatSource: Send + Sync {
    /// Unique identifier for this source
    fn id(&self) -> &str;

    /// Priority for application order (higher = applied later)
    /// Default priority is 0.
    /// Priorities in use:
    /// - Base stats: -100
    /// - Gear: 0
    /// - Talents: 100
    /// - Weapon: 200
    /// - Set bonus: 300
    /// - Attribute scaling talents: 400
    fn priority(&self) -> i32 {
        0
    }

    /// Apply this source's stats to the accumulator
    fn apply(&self, stats: &mut StatAccumulator);
}
