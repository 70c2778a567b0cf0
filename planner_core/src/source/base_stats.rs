//! BaseStatsSource - Stats from character level and elite tier

use crate::character::Character;
use crate::config::PlannerConstants;
use crate::source::StatSource;
use crate::stat_block::StatAccumulator;
use crate::types::EliteTier;

/// Base ATK, HP and attributes of a character, plus base crit rate
pub struct BaseStatsSource<'a> {
    pub character: &'a Character,
    pub level: u32,
    pub elite: EliteTier,
    pub constants: &'a PlannerConstants,
}

impl<'a> BaseStatsSource<'a> {
    pub fn new(character: &'a Character, level: u32, elite: EliteTier, constants: &'a PlannerConstants) -> Self {
        BaseStatsSource {
            character,
            level,
            elite,
            constants,
        }
    }
}

impl StatSource for BaseStatsSource<'_> {
    fn id(&self) -> &str {
        "base_stats"
    }

    fn priority(&self) -> i32 {
        -100 // Base stats apply first
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        let base = self.character.base_values(self.level, self.elite, self.constants);

        stats.base_atk += base.atk;
        stats.base_hp += base.hp;
        stats.strength += base.strength;
        stats.agility += base.agility;
        stats.intellect += base.intellect;
        stats.will += base.will;

        stats.crit_rate += self.constants.crit.base_rate;
    }
}
