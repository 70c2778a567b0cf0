//! StatBlock - Derived character stats from all sources

mod aggregator;
mod stat_value;

pub use aggregator::StatAccumulator;
pub use stat_value::StatValue;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::character::Character;
use crate::conditions::BattleConditions;
use crate::config::PlannerConstants;
use crate::curve::arts::ArtsEffects;
use crate::gear::{GearItem, GearSet};
use crate::source::{
    AttributeScalingSource, BaseStatsSource, GearSource, SetBonusSource, StatSource, TalentSource,
    WeaponBreakdown, WeaponSource,
};
use crate::talent::Talent;
use crate::types::{EliteTier, GearSlot, StatKey};
use crate::weapon::{WeaponDef, WeaponInstance};

static NO_SETS: BTreeMap<String, GearSet> = BTreeMap::new();
static NO_UPGRADES: BTreeMap<String, u8> = BTreeMap::new();

/// Complete derived stats for one build
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedStats {
    // === Final values ===
    pub final_atk: i64,
    pub final_hp: i64,
    /// Base ATK after weapon ATK and the weapon skill 2 fold
    pub base_atk: f64,
    pub weapon_atk: f64,
    pub weapon_atk_bonus: f64,
    pub base_hp: f64,
    pub defense: f64,
    /// Defense-derived reduction plus flat DMG Reduction bonuses (percent)
    pub dmg_reduction: f64,

    // === Attributes ===
    pub strength: f64,
    pub agility: f64,
    pub intellect: f64,
    pub will: f64,
    pub main_attribute_value: f64,
    pub sub_attribute_value: f64,
    pub main_atk_bonus: f64,
    pub sub_atk_bonus: f64,
    /// Main + sub attribute contributions + ATK%
    pub total_atk_bonus: f64,

    // === Bonus pools ===
    /// Every non-attribute accumulator
    pub bonuses: BTreeMap<StatKey, f64>,
    pub arts: ArtsEffects,

    // === Bookkeeping ===
    pub active_set: Option<String>,
    pub conditional_bonuses: Vec<String>,
    pub weapon: Option<WeaponBreakdown>,
}

impl DerivedStats {
    /// Accumulated bonus for `key`; zero for keys not in the pool
    pub fn bonus(&self, key: StatKey) -> f64 {
        self.bonuses.get(&key).copied().unwrap_or(0.0)
    }
}

/// One equipped gear piece with its chosen upgrade levels
#[derive(Debug, Clone, Copy)]
pub struct EquippedPiece<'a> {
    pub item: &'a GearItem,
    pub upgrades: &'a BTreeMap<String, u8>,
}

/// Everything a stat computation reads, borrowed from the caller
#[derive(Debug, Clone)]
pub struct BuildInput<'a> {
    pub character: &'a Character,
    pub level: u32,
    pub elite: EliteTier,
    pub gear: BTreeMap<GearSlot, EquippedPiece<'a>>,
    /// Set definitions by set name
    pub gear_sets: &'a BTreeMap<String, GearSet>,
    pub weapon: Option<(&'a WeaponDef, &'a WeaponInstance)>,
    /// Aggregated talents for `elite`
    pub talents: &'a [Talent],
    pub conditions: &'a BattleConditions,
}

impl<'a> BuildInput<'a> {
    pub fn new(character: &'a Character, level: u32, elite: EliteTier, conditions: &'a BattleConditions) -> Self {
        BuildInput {
            character,
            level,
            elite,
            gear: BTreeMap::new(),
            gear_sets: &NO_SETS,
            weapon: None,
            talents: &[],
            conditions,
        }
    }

    /// Equip an item without upgrades
    pub fn with_gear(self, slot: GearSlot, item: &'a GearItem) -> Self {
        self.with_upgraded_gear(slot, item, &NO_UPGRADES)
    }

    pub fn with_upgraded_gear(
        mut self,
        slot: GearSlot,
        item: &'a GearItem,
        upgrades: &'a BTreeMap<String, u8>,
    ) -> Self {
        self.gear.insert(slot, EquippedPiece { item, upgrades });
        self
    }

    pub fn with_gear_sets(mut self, gear_sets: &'a BTreeMap<String, GearSet>) -> Self {
        self.gear_sets = gear_sets;
        self
    }

    pub fn with_weapon(mut self, weapon: &'a WeaponDef, instance: &'a WeaponInstance) -> Self {
        self.weapon = Some((weapon, instance));
        self
    }

    pub fn with_talents(mut self, talents: &'a [Talent]) -> Self {
        self.talents = talents;
        self
    }

    /// The set with at least `threshold` equipped pieces, if any
    pub fn active_set(&self, threshold: usize) -> Option<&'a str> {
        let mut counts: BTreeMap<&'a str, usize> = BTreeMap::new();
        for (slot, piece) in &self.gear {
            if piece.item.kind.fits(*slot) && !piece.item.set.is_empty() {
                *counts.entry(piece.item.set.as_str()).or_insert(0) += 1;
            }
        }
        counts
            .into_iter()
            .find(|(_, count)| *count >= threshold)
            .map(|(name, _)| name)
    }

    /// Stat sources for this build, unsorted
    pub fn sources<'s>(&'s self, constants: &'s PlannerConstants) -> Vec<Box<dyn StatSource + 's>> {
        let character = self.character;
        let mut sources: Vec<Box<dyn StatSource + 's>> = vec![Box::new(BaseStatsSource::new(
            character,
            self.level,
            self.elite,
            constants,
        ))];

        for (slot, piece) in &self.gear {
            sources.push(Box::new(GearSource::new(*slot, piece.item, piece.upgrades)));
        }

        for talent in self.talents {
            if talent.scaling.is_some() {
                sources.push(Box::new(AttributeScalingSource::new(&character.id, talent, self.conditions)));
            } else {
                sources.push(Box::new(TalentSource::new(&character.id, talent, self.conditions)));
            }
        }

        if let Some((weapon, instance)) = self.weapon {
            sources.push(Box::new(WeaponSource::new(
                weapon,
                instance,
                character.main_attribute,
                self.conditions,
            )));
        }

        if let Some(name) = self.active_set(constants.set.piece_threshold) {
            sources.push(Box::new(SetBonusSource::new(
                name,
                self.gear_sets.get(name),
                self.conditions,
            )));
        }

        sources
    }
}

/// Compute derived stats for a build
///
/// Pure: the same input always yields the same output, and nothing is
/// retained between calls.
pub fn compute_stats(input: &BuildInput<'_>, constants: &PlannerConstants) -> DerivedStats {
    let sources = input.sources(constants);

    // Sort sources by priority
    let mut sorted_sources: Vec<_> = sources.iter().collect();
    sorted_sources.sort_by_key(|s| s.priority());

    let mut accumulator = StatAccumulator::new();
    for source in sorted_sources {
        source.apply(&mut accumulator);
    }

    accumulator.finalize(input.character.main_attribute, input.character.sub_attribute, constants)
}
