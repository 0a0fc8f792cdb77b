//! Damage-Interaction Resolver
//!
//! Unfolds the raw `immune`/`resist`/`vulnerable` lists of a record into flat
//! token sets and rates every damage token with a fixed precedence:
//! vulnerability, then resistance, then immunity (where an absorption trait
//! turns the zero into a heal), then normal damage.

use std::collections::BTreeSet;

use serde_json::Value;

use super::error::{ExtractError, Result};
use super::normalizer::{FieldShape, MonsterRecord};
use super::vocabulary::NONMAGICAL_PREFIX;

/// Trait tag that enables absorption detection.
pub const ABSORPTION_TAG: &str = "Damage Absorption";

const ABSORPTION_SUFFIX: &str = " Absorption";

/// Note text that qualifies a conditional entry as nonmagical-only.
const NONMAGICAL_NOTE: &str = "nonmagical";

// ============================================================================
// Damage Rating
// ============================================================================

/// How much damage of one type a creature takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageRating {
    /// Immune and absorbs the type: heals on hit.
    Absorbs,
    Immune,
    Resistant,
    Normal,
    Vulnerable,
}

impl DamageRating {
    /// Damage multiplier; `-1` is the heal-on-hit sentinel.
    pub fn multiplier(self) -> f64 {
        match self {
            DamageRating::Absorbs => -1.0,
            DamageRating::Immune => 0.0,
            DamageRating::Resistant => 0.5,
            DamageRating::Normal => 1.0,
            DamageRating::Vulnerable => 2.0,
        }
    }
}

// ============================================================================
// Unfolding
// ============================================================================

/// Flatten one damage-interaction list (`immune`, `resist` or `vulnerable`).
///
/// Plain names are kept, nested lists are spliced in, and conditional
/// objects contribute the names listed under the same key: prefixed with
/// `nm_` when their note mentions "nonmagical", dropped otherwise. Lists
/// nested inside a conditional object are spliced in regardless of the note.
pub fn unfold(record: &MonsterRecord, key: &str) -> Result<Vec<String>> {
    let entries = match FieldShape::field(record, key) {
        FieldShape::Absent | FieldShape::Null => return Ok(Vec::new()),
        FieldShape::List(entries) => entries,
        _ => return Err(ExtractError::malformed(key, "list")),
    };

    let mut tokens = Vec::new();
    for entry in entries {
        match entry {
            Value::String(name) => tokens.push(name.clone()),
            Value::Array(nested) => splice(key, nested, &mut tokens)?,
            Value::Object(conditional) => {
                let nonmagical = match conditional.get("note") {
                    Some(Value::String(note)) => note.contains(NONMAGICAL_NOTE),
                    _ => false,
                };
                let inner = match FieldShape::field(conditional, key) {
                    FieldShape::Absent | FieldShape::Null => continue,
                    FieldShape::List(inner) => inner,
                    _ => return Err(ExtractError::malformed(format!("{key}[].{key}"), "list")),
                };
                for item in inner {
                    match item {
                        Value::String(name) if nonmagical => {
                            tokens.push(format!("{NONMAGICAL_PREFIX}{name}"));
                        }
                        Value::String(_) => {}
                        Value::Array(nested) => splice(key, nested, &mut tokens)?,
                        _ => {
                            return Err(ExtractError::malformed(
                                format!("{key}[].{key}[]"),
                                "text or list",
                            ))
                        }
                    }
                }
            }
            _ => return Err(ExtractError::malformed(format!("{key}[]"), "text, list or object")),
        }
    }
    Ok(tokens)
}

fn splice(key: &str, nested: &[Value], tokens: &mut Vec<String>) -> Result<()> {
    for item in nested {
        match item {
            Value::String(name) => tokens.push(name.clone()),
            _ => return Err(ExtractError::malformed(format!("{key}[][]"), "text")),
        }
    }
    Ok(())
}

/// Damage tokens the creature absorbs, i.e. heals from.
///
/// Empty unless the record is tagged with [`ABSORPTION_TAG`]; otherwise every
/// trait named `"<Type> Absorption"` contributes its lowercased type. Entries
/// that are not shaped like traits are passed over.
pub fn absorbed_types(record: &MonsterRecord) -> BTreeSet<String> {
    let tagged = match FieldShape::field(record, "traitTags") {
        FieldShape::List(tags) => tags.iter().any(|t| t.as_str() == Some(ABSORPTION_TAG)),
        _ => false,
    };
    if !tagged {
        return BTreeSet::new();
    }

    let FieldShape::List(traits) = FieldShape::field(record, "trait") else {
        return BTreeSet::new();
    };
    traits
        .iter()
        .filter_map(|t| t.get("name")?.as_str())
        .filter(|name| name.contains(ABSORPTION_SUFFIX.trim_start()))
        .map(|name| {
            name.strip_suffix(ABSORPTION_SUFFIX)
                .unwrap_or(name)
                .to_lowercase()
        })
        .collect()
}

// ============================================================================
// Damage Profile
// ============================================================================

/// The unfolded damage interactions of one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DamageProfile {
    pub immunities: BTreeSet<String>,
    pub resistances: BTreeSet<String>,
    pub vulnerabilities: BTreeSet<String>,
    pub absorbs: BTreeSet<String>,
}

impl DamageProfile {
    /// Unfold all three interaction lists and collect absorption traits.
    pub fn from_record(record: &MonsterRecord) -> Result<Self> {
        Ok(Self {
            immunities: unfold(record, "immune")?.into_iter().collect(),
            resistances: unfold(record, "resist")?.into_iter().collect(),
            vulnerabilities: unfold(record, "vulnerable")?.into_iter().collect(),
            absorbs: absorbed_types(record),
        })
    }

    pub fn is_immune(&self, token: &str) -> bool {
        self.immunities.contains(token)
    }

    pub fn is_resistant(&self, token: &str) -> bool {
        self.resistances.contains(token)
    }

    pub fn is_vulnerable(&self, token: &str) -> bool {
        self.vulnerabilities.contains(token)
    }

    /// Rate one damage token. Order is fixed: vulnerable, resistant,
    /// immune (absorption only checked here), normal.
    pub fn rating(&self, token: &str) -> DamageRating {
        if self.is_vulnerable(token) {
            DamageRating::Vulnerable
        } else if self.is_resistant(token) {
            DamageRating::Resistant
        } else if self.is_immune(token) {
            if self.absorbs.contains(token) {
                DamageRating::Absorbs
            } else {
                DamageRating::Immune
            }
        } else {
            DamageRating::Normal
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
