//! planner_core - Stat engine for a team build planner
//!
//! This library provides:
//! - DataContext: Characters, weapons, gear and sets loaded once
//! - BuildSnapshot: A character's level, gear, weapon and battle toggles
//! - StatSource pipeline: Priority-ordered contributions into a StatAccumulator
//! - DerivedStats: Final ATK, HP, DEF, crit and every damage bonus
//! - Description parsing: Stat bonuses read from talent, weapon and set text

pub mod character;
pub mod conditions;
pub mod config;
pub mod curve;
pub mod data;
pub mod gear;
pub mod parser;
pub mod prelude;
pub mod source;
pub mod stat_block;
pub mod talent;
pub mod types;
pub mod weapon;

// Re-export core types for convenience
pub use character::{BaseValues, Character, CharacterAttributes};
pub use conditions::BattleConditions;
pub use config::{default_roster, default_weapons, ConfigError, PlannerConstants};
pub use curve::arts::ArtsEffects;
pub use curve::{BreakpointTable, CurveError};
pub use data::{BuildSnapshot, DataContext, DataError, EquippedGear};
pub use gear::{GearItem, GearSet, SetBonus};
pub use parser::{parse_description, ParsedDescription, ScalingFormula};
pub use source::{
    AttributeScalingSource, BaseStatsSource, GearSource, SetBonusSource, StatSource, TalentSource,
    WeaponSource,
};
pub use stat_block::{compute_stats, BuildInput, DerivedStats, StatAccumulator, StatValue};
pub use talent::{active_talents, Talent};
pub use types::{Attribute, EliteTier, GearKind, GearSlot, StatKey};
pub use weapon::{Essence, EssenceStat, SkillRanks, WeaponDef, WeaponInstance, WeaponSkillTable};
