//! Equipment upgrade resolution

use std::collections::BTreeMap;

use super::{parse_stat_value, GearItem};

pub const MAX_UPGRADE_LEVEL: u8 = 3;

/// Item stats with the chosen per-stat upgrade levels applied
///
/// Levels above 3 clamp to 3. A stat with level 0, no upgrade table, no
/// delta for the level, or no base value passes through unchanged.
pub fn applied_stats(item: &GearItem, levels: &BTreeMap<String, u8>) -> BTreeMap<String, String> {
    let mut stats = item.base_stats.clone();

    for (stat, requested) in levels {
        let level = (*requested).min(MAX_UPGRADE_LEVEL);
        if level != *requested {
            log::warn!("{}: upgrade level {} for {} clamped to {}", item.id, requested, stat, level);
        }
        if level == 0 {
            continue;
        }
        let Some(delta) = item
            .stat_upgrades
            .get(stat)
            .and_then(|table| table.get(&format!("+{level}")))
        else {
            continue;
        };
        let Some(base) = stats.get_mut(stat) else {
            continue;
        };

        let is_percent = base.contains('%');
        let total = parse_stat_value(base) + parse_stat_value(delta);
        *base = format_stat_value(total, is_percent);
    }

    stats
}

/// Percentages keep one decimal and a `%`; flat values round to an integer
pub fn format_stat_value(value: f64, is_percent: bool) -> String {
    if is_percent {
        format!("{value:.1}%")
    } else {
        format!("{}", value.round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GearKind;

    fn item() -> GearItem {
        GearItem::new("gloves_01", "Swift", GearKind::Gloves)
            .with_stat("DEF", "100")
            .with_stat("Agility", "32")
            .with_stat("Critical Rate", "4.5%")
            .with_stat("Heat DMG", "8%")
            .with_upgrades("DEF", &["5", "15", "25"])
            .with_upgrades("Agility", &["3", "6.4", "9"])
            .with_upgrades("Critical Rate", &["0.8%", "1.6%", "2.4%"])
    }

    fn levels(entries: &[(&str, u8)]) -> BTreeMap<String, u8> {
        entries.iter().map(|(s, l)| (s.to_string(), *l)).collect()
    }

    #[test]
    fn test_flat_upgrade() {
        let stats = applied_stats(&item(), &levels(&[("DEF", 2)]));
        assert_eq!(stats["DEF"], "115");
        let stats = applied_stats(&item(), &levels(&[("DEF", 0)]));
        assert_eq!(stats["DEF"], "100");
    }

    #[test]
    fn test_flat_upgrade_rounds() {
        let stats = applied_stats(&item(), &levels(&[("Agility", 2)]));
        assert_eq!(stats["Agility"], "38");
    }

    #[test]
    fn test_percent_upgrade_keeps_format() {
        let stats = applied_stats(&item(), &levels(&[("Critical Rate", 3)]));
        assert_eq!(stats["Critical Rate"], "6.9%");
    }

    #[test]
    fn test_level_above_three_clamps() {
        let stats = applied_stats(&item(), &levels(&[("DEF", 7)]));
        assert_eq!(stats["DEF"], "125");
    }

    #[test]
    fn test_missing_table_passes_through() {
        let stats = applied_stats(&item(), &levels(&[("Heat DMG", 2), ("Will", 1)]));
        assert_eq!(stats["Heat DMG"], "8%");
        assert!(!stats.contains_key("Will"));
    }

    #[test]
    fn test_malformed_delta_counts_as_zero() {
        let item = GearItem::new("kit", "Swift", GearKind::Kit)
            .with_stat("Will", "20")
            .with_upgrades("Will", &["???"]);
        let stats = applied_stats(&item, &levels(&[("Will", 1)]));
        assert_eq!(stats["Will"], "20");
    }
}
