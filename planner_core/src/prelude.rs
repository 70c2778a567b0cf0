//! Prelude module for convenient imports
//!
//! ```rust
//! use planner_core::prelude::*;
//! ```

// Core types
pub use crate::types::{Attribute, EliteTier, GearKind, GearSlot, StatKey};
pub use crate::stat_block::{compute_stats, BuildInput, DerivedStats, StatAccumulator};

// Reference data
pub use crate::character::Character;
pub use crate::data::{BuildSnapshot, DataContext, DataError, EquippedGear};
pub use crate::gear::{GearItem, GearSet};
pub use crate::weapon::{Essence, EssenceStat, WeaponDef, WeaponInstance};

// Battle toggles
pub use crate::conditions::{set_key, talent_key, talent_stacks_key, weapon_passive_key, BattleConditions, SET_STACKS_KEY};

// Sources
pub use crate::source::StatSource;

// Config
pub use crate::config::PlannerConstants;
