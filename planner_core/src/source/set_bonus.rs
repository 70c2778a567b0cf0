//! SetBonusSource - The active equipment set's effect

use std::collections::BTreeMap;

use crate::conditions::{set_key, BattleConditions, SET_STACKS_KEY};
use crate::gear::{GearSet, SetConditional};
use crate::source::StatSource;
use crate::stat_block::StatAccumulator;
use crate::types::{trim_number, StatKey};

/// The effect of a set with enough equipped pieces
///
/// Applies once no matter how many pieces beyond the threshold are worn.
pub struct SetBonusSource<'a> {
    pub name: &'a str,
    /// `None` when the set's definition is not loaded
    pub set: Option<&'a GearSet>,
    pub conditions: &'a BattleConditions,
}

impl<'a> SetBonusSource<'a> {
    pub fn new(name: &'a str, set: Option<&'a GearSet>, conditions: &'a BattleConditions) -> Self {
        SetBonusSource { name, set, conditions }
    }

    fn apply_displayed(stats: &mut StatAccumulator, bonuses: &BTreeMap<StatKey, f64>, multiplier: f64, note: &str) {
        for (key, value) in bonuses {
            let total = value * multiplier;
            stats.apply_stat(*key, total);
            let line = key.format_bonus(total);
            stats.conditional_bonuses.push(if note.is_empty() { line } else { format!("{line} {note}") });
        }
    }
}

impl StatSource for SetBonusSource<'_> {
    fn id(&self) -> &str {
        self.name
    }

    fn priority(&self) -> i32 {
        300 // After weapon, before attribute scaling
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        stats.active_set = Some(self.name.to_string());
        let Some(set) = self.set else {
            log::debug!("set {} is active but its effect is not loaded", self.name);
            return;
        };

        stats.apply_bonuses(&set.bonus.base, 1.0);

        match &set.bonus.conditional {
            Some(SetConditional::Stacks { max_stacks, per_stack, at_max }) => {
                let requested = self.conditions.stacks(SET_STACKS_KEY);
                let stacks = requested.min(*max_stacks);
                if stacks == 0 {
                    return;
                }
                let note = format!("({} stacks)", trim_number(f64::from(stacks)));
                Self::apply_displayed(stats, per_stack, f64::from(stacks), &note);
                if stacks >= *max_stacks {
                    Self::apply_displayed(stats, at_max, 1.0, "(max stacks)");
                }
            }
            Some(SetConditional::Toggle { bonus }) => {
                if self.conditions.is_on(&set_key(self.name)) {
                    Self::apply_displayed(stats, bonus, 1.0, "");
                }
            }
            None => {}
        }
    }
}
