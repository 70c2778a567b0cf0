//! Weapon skill rank resolution

use serde::{Deserialize, Serialize};

use super::essence::{essence_slot_effects, Essence};
use super::skills::{SkillBaseNames, SkillSlot};
use super::{MAX_POTENTIAL, MAX_TUNING_STAGE};

pub const MIN_SKILL_RANK: u8 = 1;
pub const MAX_SKILL_RANK: u8 = 9;

/// Resolved ranks of a weapon's three skills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRanks {
    pub skill1: u8,
    pub skill2: u8,
    pub skill3: u8,
}

impl SkillRanks {
    pub fn get(&self, slot: SkillSlot) -> u8 {
        match slot {
            SkillSlot::One => self.skill1,
            SkillSlot::Two => self.skill2,
            SkillSlot::Three => self.skill3,
        }
    }

    fn add(&mut self, slot: SkillSlot, ranks: u8) {
        let rank = match slot {
            SkillSlot::One => &mut self.skill1,
            SkillSlot::Two => &mut self.skill2,
            SkillSlot::Three => &mut self.skill3,
        };
        *rank = rank.saturating_add(ranks);
    }
}

/// Ranks from tuning stage, potential and matching essence stats
///
/// Tuning stages alternate between skill 1 (stages 1 and 3) and skill 2
/// (stages 2 and 4). Potential raises skill 3. Every rank is capped at 9.
pub fn resolve_ranks(
    tuning_stage: u8,
    potential: u8,
    essence: Option<&Essence>,
    names: &SkillBaseNames,
) -> SkillRanks {
    let tuning = tuning_stage.min(MAX_TUNING_STAGE);
    let mut ranks = SkillRanks {
        skill1: MIN_SKILL_RANK + u8::from(tuning >= 1) + u8::from(tuning >= 3),
        skill2: MIN_SKILL_RANK + u8::from(tuning >= 2) + u8::from(tuning >= 4),
        skill3: MIN_SKILL_RANK + potential.min(MAX_POTENTIAL),
    };

    if let Some(essence) = essence {
        for effect in essence_slot_effects(essence, names) {
            if let (Some(skill), true) = (effect.skill, effect.matches) {
                ranks.add(skill, effect.bonus);
            }
        }
    }

    ranks.skill1 = ranks.skill1.min(MAX_SKILL_RANK);
    ranks.skill2 = ranks.skill2.min(MAX_SKILL_RANK);
    ranks.skill3 = ranks.skill3.min(MAX_SKILL_RANK);
    ranks
}
