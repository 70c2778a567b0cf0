//! BattleConditions - Toggled combat conditions and stack counters

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Stack counter shared by every set stack bonus
pub const SET_STACKS_KEY: &str = "set";

pub fn talent_key(character_id: &str, talent: &str) -> String {
    format!("talent_{character_id}_{talent}")
}

pub fn talent_stacks_key(character_id: &str, talent: &str) -> String {
    format!("talent_stacks_{character_id}_{talent}")
}

pub fn weapon_passive_key(weapon_id: &str) -> String {
    format!("weapon_passive_{weapon_id}")
}

pub fn set_key(set_name: &str) -> String {
    format!("set_{set_name}")
}

/// The user's in-combat selections
///
/// Keys not present read as off / zero stacks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleConditions {
    #[serde(default)]
    pub toggles: BTreeSet<String>,
    #[serde(default)]
    pub stacks: BTreeMap<String, u32>,
}

impl BattleConditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, on: bool) {
        let key = key.into();
        if on {
            self.toggles.insert(key);
        } else {
            self.toggles.remove(&key);
        }
    }

    pub fn is_on(&self, key: &str) -> bool {
        self.toggles.contains(key)
    }

    pub fn set_stacks(&mut self, key: impl Into<String>, stacks: u32) {
        self.stacks.insert(key.into(), stacks);
    }

    pub fn stacks(&self, key: &str) -> u32 {
        self.stacks.get(key).copied().unwrap_or(0)
    }

    /// Builder form of [`set`](Self::set) with `on = true`
    pub fn with_toggle(mut self, key: impl Into<String>) -> Self {
        self.set(key, true);
        self
    }

    pub fn with_stacks(mut self, key: impl Into<String>, stacks: u32) -> Self {
        self.set_stacks(key, stacks);
        self
    }
}
