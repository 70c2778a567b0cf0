//! GearSource - Stats from equipped items

use std::collections::BTreeMap;

use crate::gear::{applied_stats, parse_stat_value, GearItem};
use crate::source::StatSource;
use crate::stat_block::StatAccumulator;
use crate::types::{GearSlot, StatKey};

/// Stats from an equipped item, with its upgrade levels applied
pub struct GearSource<'a> {
    /// Which slot this item is in
    pub slot: GearSlot,
    pub item: &'a GearItem,
    /// Upgrade level per stat name
    pub upgrades: &'a BTreeMap<String, u8>,
}

impl<'a> GearSource<'a> {
    pub fn new(slot: GearSlot, item: &'a GearItem, upgrades: &'a BTreeMap<String, u8>) -> Self {
        GearSource { slot, item, upgrades }
    }
}

impl StatSource for GearSource<'_> {
    fn id(&self) -> &str {
        &self.item.id
    }

    fn priority(&self) -> i32 {
        0 // Gear applies at default priority
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        if !self.item.kind.fits(self.slot) {
            log::warn!("{} ({:?}) does not fit slot {:?}, ignoring", self.item.id, self.item.kind, self.slot);
            return;
        }

        for (name, value) in applied_stats(self.item, self.upgrades) {
            match StatKey::from_gear_name(&name) {
                Some(key) => stats.apply_stat(key, parse_stat_value(&value)),
                None => log::debug!("{}: unknown gear stat {:?}", self.item.id, name),
            }
        }
    }
}
