//! AttributeScalingSource - Talents proportional to live attributes

use crate::conditions::{talent_key, BattleConditions};
use crate::source::StatSource;
use crate::stat_block::StatAccumulator;
use crate::talent::Talent;

/// A live-scaling talent ("Every point of Intellect grants ATK +0.15%")
///
/// Runs after every other source so it reads final attribute totals. The
/// bonus is evaluated fresh on each computation.
pub struct AttributeScalingSource<'a> {
    pub character_id: &'a str,
    pub talent: &'a Talent,
    pub conditions: &'a BattleConditions,
}

impl<'a> AttributeScalingSource<'a> {
    pub fn new(character_id: &'a str, talent: &'a Talent, conditions: &'a BattleConditions) -> Self {
        AttributeScalingSource {
            character_id,
            talent,
            conditions,
        }
    }
}

impl StatSource for AttributeScalingSource<'_> {
    fn id(&self) -> &str {
        &self.talent.name
    }

    fn priority(&self) -> i32 {
        400 // Attributes are final by now
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        let Some(formula) = &self.talent.scaling else {
            return;
        };
        if self.talent.is_conditional()
            && !self.conditions.is_on(&talent_key(self.character_id, &self.talent.name))
        {
            return;
        }

        let bonus = formula.evaluate(|attribute| stats.attribute(attribute));
        stats.apply_stat(formula.target, bonus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::talent::active_talents;
    use crate::types::EliteTier;
    use std::collections::BTreeMap;

    fn talent(description: &str) -> Talent {
        let raw = BTreeMap::from([(
            "Insight".to_string(),
            BTreeMap::from([("Elite 2".to_string(), description.to_string())]),
        )]);
        active_talents(&raw, EliteTier::new(2)).remove(0)
    }

    fn apply(talent: &Talent, stats: &mut StatAccumulator) {
        AttributeScalingSource::new("op", talent, &BattleConditions::new()).apply(stats);
    }

    #[test]
    fn test_atk_from_two_attributes() {
        let talent = talent("Every point of Intellect and Will grants ATK +0.15%.");
        let mut acc = StatAccumulator::new();
        acc.intellect = 100.0;
        acc.will = 60.0;
        apply(&talent, &mut acc);
        // 160 * 0.15 = 24
        assert!((acc.atk_percent - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_element_and_def_formulas() {
        let electric = talent("For every 1 Intellect, Electric DMG +0.1%.");
        let mut acc = StatAccumulator::new();
        acc.intellect = 150.0;
        apply(&electric, &mut acc);
        assert!((acc.electric_dmg - 15.0).abs() < 1e-9);

        let def = talent("For every 10 Will, DEF +1.2.");
        let mut acc = StatAccumulator::new();
        acc.will = 125.0;
        apply(&def, &mut acc);
        assert!((acc.defense - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_recomputed_not_accumulated() {
        let talent = talent("Every point of Intellect grants ATK +0.1%.");
        let mut first = StatAccumulator::new();
        first.intellect = 200.0;
        apply(&talent, &mut first);

        let mut second = StatAccumulator::new();
        second.intellect = 200.0;
        apply(&talent, &mut second);
        assert!((first.atk_percent - second.atk_percent).abs() < f64::EPSILON);
        assert!((first.atk_percent - 20.0).abs() < 1e-9);
    }
}
