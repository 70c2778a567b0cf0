//! 3-piece set effect parsing

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::parser::{boundary, compile, scan_bonuses, stack_limit};
use crate::types::StatKey;

static EFFECT_PREFIX: Lazy<Option<Regex>> = Lazy::new(|| compile(r"(?i)^\s*3-piece set effect:\s*"));

static AT_MAX_STACKS: Lazy<Option<Regex>> =
    Lazy::new(|| compile(r"(?i)\b(?:at|upon reaching|on reaching)\s+max(?:imum)?\s+stacks?\b"));

/// The in-combat part of a set effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetConditional {
    /// Scales with the set stack counter
    Stacks {
        max_stacks: u32,
        per_stack: BTreeMap<StatKey, f64>,
        /// Extra bonus once the counter reaches `max_stacks`
        at_max: BTreeMap<StatKey, f64>,
    },
    /// All-or-nothing, driven by the set toggle
    Toggle { bonus: BTreeMap<StatKey, f64> },
}

/// A parsed 3-piece set effect
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetBonus {
    /// Active whenever 3 pieces are equipped
    pub base: BTreeMap<StatKey, f64>,
    pub conditional: Option<SetConditional>,
}

/// Split a set effect at its first "When"/"After" into base and conditional parts
pub fn parse_set_effect(text: &str) -> SetBonus {
    let effect = match EFFECT_PREFIX.as_ref() {
        Some(prefix) => prefix.replace(text, ""),
        None => text.into(),
    };

    let (head, tail) = match boundary(&effect) {
        Some(split) => (&effect[..split], effect[split..].trim()),
        None => (&effect[..], ""),
    };

    SetBonus {
        base: scan_bonuses(head),
        conditional: parse_conditional(tail),
    }
}

fn parse_conditional(tail: &str) -> Option<SetConditional> {
    if tail.is_empty() {
        return None;
    }

    let conditional = match stack_limit(tail) {
        Some(max_stacks) => {
            let (per_stack, at_max) = match AT_MAX_STACKS.as_ref().and_then(|re| re.find(tail)) {
                Some(marker) => (scan_bonuses(&tail[..marker.start()]), scan_bonuses(&tail[marker.start()..])),
                None => (scan_bonuses(tail), BTreeMap::new()),
            };
            if per_stack.is_empty() && at_max.is_empty() {
                return None;
            }
            SetConditional::Stacks {
                max_stacks,
                per_stack,
                at_max,
            }
        }
        None => {
            let bonus = scan_bonuses(tail);
            if bonus.is_empty() {
                return None;
            }
            SetConditional::Toggle { bonus }
        }
    };
    Some(conditional)
}
