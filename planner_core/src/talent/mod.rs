//! Talent aggregation across elite tiers
//!
//! A character's talent table maps each talent name to one description per
//! elite tier. Flat attribute tiers stack; every other tier supersedes the
//! tiers before it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::parser::{parse_description, CombinationPolicy, ConditionKind, ScalingFormula};
use crate::types::{EliteTier, StatKey};

/// Description fragments marking base-building (non-combat) tiers
pub const NON_COMBAT_MARKERS: [&str; 3] = ["Assign to", "Manufacturing", "Reception Room"];

/// Per-tier contribution kept for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TalentBreakdown {
    pub elite: u8,
    pub bonuses: BTreeMap<StatKey, f64>,
    pub description: String,
}

/// A talent folded down to the character's current elite tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Talent {
    pub name: String,
    /// Highest tier that contributed
    pub elite: u8,
    /// Description of the highest contributing tier
    pub description: String,
    /// Policy of the highest contributing tier
    pub policy: CombinationPolicy,
    pub bonuses: BTreeMap<StatKey, f64>,
    pub conditional_bonuses: BTreeMap<StatKey, f64>,
    pub breakdown: Vec<TalentBreakdown>,
    pub condition: Option<ConditionKind>,
    pub max_stacks: Option<u32>,
    pub scaling: Option<ScalingFormula>,
}

impl Talent {
    fn new(name: &str) -> Self {
        Talent {
            name: name.to_string(),
            elite: 0,
            description: String::new(),
            policy: CombinationPolicy::Overriding,
            bonuses: BTreeMap::new(),
            conditional_bonuses: BTreeMap::new(),
            breakdown: Vec::new(),
            condition: None,
            max_stacks: None,
            scaling: None,
        }
    }

    pub fn has_numeric_bonus(&self) -> bool {
        !self.bonuses.is_empty() || !self.conditional_bonuses.is_empty() || self.scaling.is_some()
    }

    pub fn is_conditional(&self) -> bool {
        self.condition.is_some()
    }
}

/// Talent table tier label for a 1-based tier
pub fn tier_label(tier: u8) -> String {
    format!("Elite {tier}")
}

/// Whether a tier description is a base-building effect
pub fn is_non_combat(description: &str) -> bool {
    NON_COMBAT_MARKERS
        .iter()
        .any(|marker| description.contains(marker))
}

/// Fold every talent's unlocked tiers into one record per talent
pub fn active_talents(
    raw: &BTreeMap<String, BTreeMap<String, String>>,
    elite: EliteTier,
) -> Vec<Talent> {
    raw.iter()
        .filter_map(|(name, tiers)| aggregate_talent(name, tiers, elite))
        .collect()
}

fn aggregate_talent(name: &str, tiers: &BTreeMap<String, String>, elite: EliteTier) -> Option<Talent> {
    let mut talent = Talent::new(name);
    let mut contributed = false;

    for tier in 1..=EliteTier::MAX {
        if !elite.unlocks(tier) {
            break;
        }
        let Some(description) = tiers.get(&tier_label(tier)) else {
            continue;
        };
        if is_non_combat(description) {
            continue;
        }

        let parsed = parse_description(description);
        contributed = true;
        talent.elite = tier;
        talent.description = description.clone();
        talent.policy = parsed.policy;
        talent.max_stacks = talent.max_stacks.max(parsed.max_stacks);

        match parsed.policy {
            CombinationPolicy::Additive => {
                for (key, value) in &parsed.bonuses {
                    *talent.bonuses.entry(*key).or_insert(0.0) += value;
                }
                if !parsed.bonuses.is_empty() {
                    talent.breakdown.push(TalentBreakdown {
                        elite: tier,
                        bonuses: parsed.bonuses,
                        description: description.clone(),
                    });
                }
            }
            CombinationPolicy::Overriding => {
                talent.bonuses = parsed.bonuses.clone();
                talent.conditional_bonuses = parsed.conditional_bonuses;
                talent.condition = parsed.condition;
                talent.scaling = None;
                talent.breakdown = vec![TalentBreakdown {
                    elite: tier,
                    bonuses: parsed.bonuses,
                    description: description.clone(),
                }];
            }
            CombinationPolicy::LiveScaling => {
                talent.bonuses.clear();
                talent.conditional_bonuses.clear();
                talent.condition = None;
                talent.breakdown.clear();
                talent.scaling = parsed.scaling;
            }
        }
    }

    contributed.then_some(talent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &[(u8, &str)])]) -> BTreeMap<String, BTreeMap<String, String>> {
        entries
            .iter()
            .map(|(name, tiers)| {
                let tiers = tiers
                    .iter()
                    .map(|(tier, text)| (tier_label(*tier), text.to_string()))
                    .collect();
                (name.to_string(), tiers)
            })
            .collect()
    }

    #[test]
    fn test_attribute_tiers_sum() {
        let raw = table(&[(
            "Keen Eye",
            &[
                (1, "Operator Agility +10"),
                (2, "Operator Agility +15"),
                (3, "Operator Agility +20"),
                (4, "Operator Agility +25"),
            ],
        )]);
        let talents = active_talents(&raw, EliteTier::new(4));
        assert_eq!(talents.len(), 1);
        assert_eq!(talents[0].bonuses.get(&StatKey::Agility), Some(&70.0));
        assert_eq!(talents[0].breakdown.len(), 4);
    }

    #[test]
    fn test_percentage_tiers_override() {
        let raw = table(&[(
            "Blazing",
            &[
                (1, "Heat DMG +10%"),
                (2, "Heat DMG +15%"),
                (3, "Heat DMG +20%"),
                (4, "Heat DMG +25%"),
            ],
        )]);
        let talents = active_talents(&raw, EliteTier::new(4));
        assert_eq!(talents[0].bonuses.get(&StatKey::HeatDmg), Some(&25.0));
        assert_eq!(talents[0].breakdown.len(), 1);
        assert_eq!(talents[0].breakdown[0].elite, 4);
        assert_eq!(talents[0].elite, 4);
    }

    #[test]
    fn test_elite_gates_tiers() {
        let raw = table(&[("Blazing", &[(1, "Heat DMG +10%"), (3, "Heat DMG +20%")])]);
        let talents = active_talents(&raw, EliteTier::new(2));
        assert_eq!(talents[0].bonuses.get(&StatKey::HeatDmg), Some(&10.0));
        assert!(active_talents(&raw, EliteTier::new(0)).is_empty());
    }

    #[test]
    fn test_non_combat_tiers_skipped() {
        let raw = table(&[
            ("Workshop", &[(1, "Assign to the Manufacturing Cabin: output +10%")]),
            (
                "Mixed",
                &[(1, "Reception Room clue rate +5%"), (2, "Critical Rate +6%")],
            ),
        ]);
        let talents = active_talents(&raw, EliteTier::new(4));
        assert_eq!(talents.len(), 1);
        assert_eq!(talents[0].name, "Mixed");
        assert_eq!(talents[0].elite, 2);
    }

    #[test]
    fn test_unparsed_talent_still_listed() {
        let raw = table(&[("Mystery", &[(1, "Grants a strange feeling.")])]);
        let talents = active_talents(&raw, EliteTier::new(1));
        assert_eq!(talents.len(), 1);
        assert!(!talents[0].has_numeric_bonus());
        assert_eq!(talents[0].description, "Grants a strange feeling.");
    }

    #[test]
    fn test_scaling_and_stacks_tracked() {
        let raw = table(&[
            ("Scholar", &[(2, "For every 1 Intellect, Electric DMG +0.1%")]),
            (
                "Momentum",
                &[
                    (1, "After a combo skill, ATK +3%. Can reach 3 stacks."),
                    (2, "After a combo skill, ATK +4%. Can reach 5 stacks."),
                ],
            ),
        ]);
        let talents = active_talents(&raw, EliteTier::new(4));
        let momentum = talents.iter().find(|t| t.name == "Momentum").unwrap();
        assert_eq!(momentum.max_stacks, Some(5));
        assert_eq!(momentum.conditional_bonuses.get(&StatKey::AtkPercent), Some(&4.0));
        assert_eq!(momentum.condition, Some(ConditionKind::ComboSkill));

        let scholar = talents.iter().find(|t| t.name == "Scholar").unwrap();
        assert_eq!(scholar.policy, CombinationPolicy::LiveScaling);
        assert!(scholar.scaling.is_some());
    }

    #[test]
    fn test_scaling_tier_supersedes_earlier_tiers() {
        let raw = table(&[(
            "Focus",
            &[
                (1, "After casting an ultimate, Electric DMG +10%."),
                (2, "For every 1 Intellect, Electric DMG +0.1%"),
            ],
        )]);
        let talents = active_talents(&raw, EliteTier::new(2));
        let focus = &talents[0];
        assert_eq!(focus.policy, CombinationPolicy::LiveScaling);
        assert!(focus.scaling.is_some());
        assert!(!focus.is_conditional());
        assert!(focus.bonuses.is_empty());
        assert!(focus.conditional_bonuses.is_empty());
        assert!(focus.breakdown.is_empty());

        // A later overriding tier drops the formula again
        let raw = table(&[(
            "Focus",
            &[
                (1, "For every 1 Intellect, Electric DMG +0.1%"),
                (2, "Electric DMG +12%"),
            ],
        )]);
        let focus = active_talents(&raw, EliteTier::new(2)).remove(0);
        assert!(focus.scaling.is_none());
        assert_eq!(focus.bonuses.get(&StatKey::ElectricDmg), Some(&12.0));
    }
}
