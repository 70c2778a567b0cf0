//! TalentSource - Stats from a character's aggregated talents

use crate::conditions::{talent_key, talent_stacks_key, BattleConditions};
use crate::source::StatSource;
use crate::stat_block::StatAccumulator;
use crate::talent::Talent;

/// A non-scaling talent, gated by its toggle and stack counter
///
/// - Stack-bounded talents need their toggle and apply every bonus
///   `min(stacks, max_stacks)` times; zero stacks contributes nothing.
/// - Other talents always apply their base bonuses and apply their
///   conditional bonuses only while toggled on.
pub struct TalentSource<'a> {
    pub character_id: &'a str,
    pub talent: &'a Talent,
    pub conditions: &'a BattleConditions,
}

impl<'a> TalentSource<'a> {
    pub fn new(character_id: &'a str, talent: &'a Talent, conditions: &'a BattleConditions) -> Self {
        TalentSource {
            character_id,
            talent,
            conditions,
        }
    }

    fn toggled(&self) -> bool {
        self.conditions.is_on(&talent_key(self.character_id, &self.talent.name))
    }

    /// Stack multiplier for a stack-bounded talent
    fn stack_count(&self, max_stacks: u32) -> u32 {
        let key = talent_stacks_key(self.character_id, &self.talent.name);
        let stacks = self.conditions.stacks(&key);
        if stacks > max_stacks {
            log::debug!("{key}: {stacks} stacks clamped to {max_stacks}");
        }
        stacks.min(max_stacks)
    }
}

impl StatSource for TalentSource<'_> {
    fn id(&self) -> &str {
        &self.talent.name
    }

    fn priority(&self) -> i32 {
        100 // After gear, before the weapon
    }

    /// A stack-bounded talent contributes nothing until its toggle is on,
    /// even when its description names no trigger.
    fn apply(&self, stats: &mut StatAccumulator) {
        let talent = self.talent;
        if talent.scaling.is_some() {
            return;
        }

        match talent.max_stacks {
            Some(max_stacks) => {
                if !self.toggled() {
                    return;
                }
                let stacks = f64::from(self.stack_count(max_stacks));
                stats.apply_bonuses(&talent.bonuses, stacks);
                stats.apply_bonuses(&talent.conditional_bonuses, stacks);
            }
            None => {
                stats.apply_bonuses(&talent.bonuses, 1.0);
                if self.toggled() {
                    stats.apply_bonuses(&talent.conditional_bonuses, 1.0);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::talent::active_talents;
    use crate::types::{EliteTier, StatKey};
    use std::collections::BTreeMap;

    fn talent(description: &str) -> Talent {
        let raw = BTreeMap::from([(
            "Ember".to_string(),
            BTreeMap::from([("Elite 1".to_string(), description.to_string())]),
        )]);
        active_talents(&raw, EliteTier::new(4)).remove(0)
    }

    fn apply(talent: &Talent, conditions: &BattleConditions) -> StatAccumulator {
        let mut acc = StatAccumulator::new();
        TalentSource::new("op", talent, conditions).apply(&mut acc);
        acc
    }

    #[test]
    fn test_unconditional_always_applies() {
        let talent = talent("Heat DMG Dealt +10%.");
        let acc = apply(&talent, &BattleConditions::new());
        assert!((acc.heat_dmg - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_conditional_part_needs_toggle() {
        let talent = talent("Heat DMG Dealt +10%. After applying Combustion, ATK +15%.");
        let off = apply(&talent, &BattleConditions::new());
        assert!((off.heat_dmg - 10.0).abs() < f64::EPSILON);
        assert!(off.atk_percent.abs() < f64::EPSILON);

        let on = apply(&talent, &BattleConditions::new().with_toggle(talent_key("op", "Ember")));
        assert!((on.atk_percent - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stacks_multiply_and_clamp() {
        let talent = talent("When the operator casts a battle skill, ATK +4%. Can reach 3 stacks.");
        assert_eq!(talent.max_stacks, Some(3));
        let toggle = talent_key("op", "Ember");
        let stacks = talent_stacks_key("op", "Ember");

        let acc = apply(&talent, &BattleConditions::new().with_toggle(toggle.clone()).with_stacks(stacks.clone(), 2));
        assert!((acc.atk_percent - 8.0).abs() < f64::EPSILON);

        let acc = apply(&talent, &BattleConditions::new().with_toggle(toggle.clone()).with_stacks(stacks.clone(), 7));
        assert!((acc.atk_percent - 12.0).abs() < f64::EPSILON);

        // Toggled with zero stacks contributes nothing
        let acc = apply(&talent, &BattleConditions::new().with_toggle(toggle));
        assert!(acc.atk_percent.abs() < f64::EPSILON);

        // Stacks without the toggle contribute nothing
        let acc = apply(&talent, &BattleConditions::new().with_stacks(stacks, 3));
        assert!(acc.get(StatKey::AtkPercent).abs() < f64::EPSILON);
    }
}
