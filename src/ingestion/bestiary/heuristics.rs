//! Action Text Heuristics
//!
//! Best-effort classification of free-form action prose. The patterns are
//! literal regular expressions over the rendered `action` field; phrasing
//! they do not anticipate simply yields a negative signal.
//!
//! # Example
//!
//! ```ignore
//! use crate::ingestion::bestiary::heuristics::ActionMiner;
//!
//! let miner = ActionMiner::new();
//! assert!(miner.has_ranged_option("{@atk rw} {@hit 4} to hit, range 80/320 ft."));
//! assert_eq!(miner.hit_bonus("{@atk mw} {@hit 5} to hit"), Ok(Some(5)));
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::error::{ExtractError, Result};
use super::normalizer::{is_truthy, render, FieldShape, MonsterRecord};
use super::vocabulary::Ability;

// ============================================================================
// Regex Patterns
// ============================================================================

/// Weapon range: "range 80/320 ft", "range 30 ft"
static RANGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"range [\d/ ]* ft").expect("Failed to compile range regex")
});

/// Shaped area: "a 15-foot cone", "a 60 ft line", "a 20-foot-radius sphere"
static AREA_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"a \d*[\s-](foot|ft)[\s-](cone|line|radius|sphere|cube)")
        .expect("Failed to compile area regex")
});

/// Distant target: "targets one creature it can see within 60 feet of it"
static TARGET_DISTANCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"targets [\s\w]* creature [\s\w]*\d{2,}[\s\w]feet of")
        .expect("Failed to compile target distance regex")
});

/// Inline attack bonus tag: "{@hit 5}", "{@hit -1}"
static HIT_TAG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{@hit ([-+]?\d+)\}").expect("Failed to compile hit tag regex")
});

// ============================================================================
// Types
// ============================================================================

/// Signals mined from a record's actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSignals {
    /// Any action reaches beyond melee.
    pub has_ranged_option: bool,
    /// One attack bonus per action entry carrying a hit tag, in source order.
    pub to_hits: Vec<i64>,
    /// Abilities whose saving throw the actions force.
    pub induced_saves: Vec<Ability>,
}

impl ActionSignals {
    /// Whether the actions force a save of this ability.
    pub fn induces(&self, ability: Ability) -> bool {
        self.induced_saves.contains(&ability)
    }
}

// ============================================================================
// Miner
// ============================================================================

/// Mines action prose for ranged options, attack bonuses and forced saves.
#[derive(Debug, Clone, Default)]
pub struct ActionMiner;

impl ActionMiner {
    /// Create a new action miner.
    pub fn new() -> Self {
        Self
    }

    /// Mine all signals from a record.
    pub fn mine(&self, record: &MonsterRecord) -> Result<ActionSignals> {
        let whole = action_text(record)?;
        let entries = action_entries(record)?;

        Ok(ActionSignals {
            has_ranged_option: self.has_ranged_option(&whole),
            to_hits: entries
                .iter()
                .filter_map(|e| self.hit_bonus(e).transpose())
                .collect::<Result<_>>()?,
            induced_saves: self.induced_saves(&whole),
        })
    }

    /// True when any of the range, area or distant-target patterns match.
    pub fn has_ranged_option(&self, text: &str) -> bool {
        RANGE_PATTERN.is_match(text)
            || AREA_PATTERN.is_match(text)
            || TARGET_DISTANCE_PATTERN.is_match(text)
    }

    /// The attack bonus of one entry. When an entry holds several hit tags
    /// the last one counts. A bonus outside the `i64` range is an error.
    pub fn hit_bonus(&self, entry: &str) -> Result<Option<i64>> {
        let Some(bonus) = HIT_TAG_PATTERN
            .captures_iter(entry)
            .last()
            .and_then(|caps| caps.get(1))
        else {
            return Ok(None);
        };
        bonus
            .as_str()
            .parse()
            .map(Some)
            .map_err(|_| ExtractError::unparseable("to_hits", bonus.as_str()))
    }

    /// Abilities named in a "<ability> saving throw" phrase, ignoring case.
    pub fn induced_saves(&self, text: &str) -> Vec<Ability> {
        let haystack = text.to_lowercase();
        Ability::ALL
            .into_iter()
            .filter(|a| haystack.contains(&format!("{} saving throw", a.full_name())))
            .collect()
    }
}

// ============================================================================
// Action Rendering
// ============================================================================

fn actions(record: &MonsterRecord) -> Result<&[Value]> {
    match FieldShape::field(record, "action") {
        FieldShape::Absent | FieldShape::Null => Ok(&[]),
        FieldShape::List(actions) => Ok(actions),
        _ => Err(ExtractError::malformed("action", "list")),
    }
}

/// The whole `action` field rendered as compact JSON; empty when absent.
pub fn action_text(record: &MonsterRecord) -> Result<String> {
    actions(record)?;
    Ok(record.get("action").map(Value::to_string).unwrap_or_default())
}

/// Every non-empty entry of every action, each rendered as text.
pub fn action_entries(record: &MonsterRecord) -> Result<Vec<String>> {
    let mut rendered = Vec::new();
    for action in actions(record)? {
        let Value::Object(action) = action else {
            return Err(ExtractError::malformed("action[]", "object"));
        };
        let entries = match FieldShape::field(action, "entries") {
            FieldShape::Absent | FieldShape::Null => continue,
            FieldShape::List(entries) => entries,
            _ => return Err(ExtractError::malformed("action[].entries", "list")),
        };
        rendered.extend(entries.iter().filter(|e| is_truthy(e)).map(render));
    }
    Ok(rendered)
}

// ============================================================================
// Tests
// ============================================================================
