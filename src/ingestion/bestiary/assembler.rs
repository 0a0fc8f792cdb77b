//! Record Assembler
//!
//! Runs the normalizer, the damage resolver and the action miner over each
//! input record and merges their results into one [`MonsterStats`]. Failures
//! are isolated per record: a bad record is logged and skipped, and the rest
//! of the batch is unaffected.

use rayon::prelude::*;
use serde_json::Value;

use super::damage::DamageProfile;
use super::error::{ExtractError, Result};
use super::heuristics::ActionMiner;
use super::normalizer::{
    armor_class, challenge_rating, creature_type, is_truthy, required_text, save_modifiers,
    skill_values, AbilityScores, FieldShape, MonsterRecord,
};
use super::record::{
    MonsterStats, CONDITION_IMMUNE, DAMAGE_IMMUNE, DAMAGE_RATING, DAMAGE_RESIST,
    DAMAGE_VULNERABLE,
};
use super::vocabulary::{feature_name, Ability, CONDITIONS, DAMAGE_TYPES};

// ============================================================================
// Types
// ============================================================================

/// Batch processing options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlattenOptions {
    /// Flatten records on the rayon thread pool. Output order is unchanged.
    pub parallel: bool,
}

/// A record that could not be flattened.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    /// Position in the input collection.
    pub index: usize,
    /// The record's name, when it has a textual one.
    pub name: Option<String>,
    pub error: ExtractError,
}

/// Outcome of flattening a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenReport {
    /// Flattened records, in input order.
    pub stats: Vec<MonsterStats>,
    /// Skipped records, in input order.
    pub skipped: Vec<SkippedRecord>,
}

impl FlattenReport {
    /// Number of input records seen.
    pub fn total(&self) -> usize {
        self.stats.len() + self.skipped.len()
    }
}

// ============================================================================
// Flattener
// ============================================================================

/// Flattens monster statblocks into fixed-schema feature records.
#[derive(Debug, Clone, Default)]
pub struct BestiaryFlattener {
    miner: ActionMiner,
    options: FlattenOptions,
}

impl BestiaryFlattener {
    /// Create a sequential flattener.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a flattener with explicit options.
    pub fn with_options(options: FlattenOptions) -> Self {
        Self {
            miner: ActionMiner::new(),
            options,
        }
    }

    pub fn options(&self) -> FlattenOptions {
        self.options
    }

    /// Flatten a batch, skipping and logging records that fail.
    pub fn flatten(&self, records: &[Value]) -> FlattenReport {
        let results: Vec<Result<MonsterStats>> = if self.options.parallel {
            records
                .par_iter()
                .enumerate()
                .map(|(index, record)| self.flatten_indexed(index, record))
                .collect()
        } else {
            records
                .iter()
                .enumerate()
                .map(|(index, record)| self.flatten_indexed(index, record))
                .collect()
        };

        let mut report = FlattenReport::default();
        for (index, (record, result)) in records.iter().zip(results).enumerate() {
            match result {
                Ok(stats) => report.stats.push(stats),
                Err(error) => {
                    let name = record.get("name").and_then(Value::as_str).map(str::to_string);
                    log::warn!(
                        "Skipping record {} ({}): {}",
                        index,
                        name.as_deref().unwrap_or("<unnamed>"),
                        error
                    );
                    report.skipped.push(SkippedRecord { index, name, error });
                }
            }
        }

        log::info!(
            "Flattened {} of {} records ({} skipped)",
            report.stats.len(),
            report.total(),
            report.skipped.len()
        );
        report
    }

    fn flatten_indexed(&self, index: usize, record: &Value) -> Result<MonsterStats> {
        log::trace!("Processing record {}: {}", index, record);
        self.flatten_monster(record)
    }

    /// Flatten one record.
    pub fn flatten_monster(&self, record: &Value) -> Result<MonsterStats> {
        let Value::Object(record) = record else {
            return Err(ExtractError::malformed("record", "object"));
        };

        let mut stats = MonsterStats::new();
        stats.insert("name", required_text(record, "name")?);

        let scores = AbilityScores::from_record(record)?;
        for (ability, modifier) in save_modifiers(record, &scores)? {
            stats.insert(ability.save_mod_feature(), modifier);
        }

        let condition_immunities = condition_immunities(record)?;
        for condition in CONDITIONS {
            stats.insert(
                feature_name(CONDITION_IMMUNE, condition),
                condition_immunities.iter().any(|c| *c == condition),
            );
        }

        let damage = DamageProfile::from_record(record)?;
        insert_damage_features(&mut stats, &damage);

        stats.insert("type", creature_type(record)?);
        let cr = challenge_rating(record)?;
        let cr_num = cr.as_f64();
        stats.insert("cr", cr.text);
        stats.insert("cr_num", cr_num);

        stats.insert("source", required_text(record, "source")?);
        stats.insert("named", is_named(record));

        let signals = self.miner.mine(record)?;
        stats.insert("has_ranged_option", signals.has_ranged_option);
        stats.insert(
            "spellcasting",
            record
                .get("spellcasting")
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new())),
        );
        stats.insert("to_hits", signals.to_hits.clone());

        for (skill, value) in skill_values(record, &scores)? {
            stats.insert(skill, value);
        }

        stats.insert("ac", armor_class(record)?);

        for ability in Ability::ALL {
            stats.insert(
                ability.induces_save_feature(),
                i64::from(signals.induces(ability)),
            );
        }

        Ok(stats)
    }
}

/// Flatten a batch sequentially with default options.
pub fn flatten_bestiary(records: &[Value]) -> FlattenReport {
    BestiaryFlattener::new().flatten(records)
}

// ============================================================================
// Helpers
// ============================================================================

fn condition_immunities(record: &MonsterRecord) -> Result<Vec<&str>> {
    match FieldShape::field(record, "conditionImmune") {
        FieldShape::Absent | FieldShape::Null => Ok(Vec::new()),
        FieldShape::List(entries) => Ok(entries.iter().filter_map(Value::as_str).collect()),
        _ => Err(ExtractError::malformed("conditionImmune", "list")),
    }
}

fn insert_damage_features(stats: &mut MonsterStats, damage: &DamageProfile) {
    for token in DAMAGE_TYPES {
        stats.insert(feature_name(DAMAGE_IMMUNE, token), damage.is_immune(token));
    }
    for token in DAMAGE_TYPES {
        stats.insert(feature_name(DAMAGE_RESIST, token), damage.is_resistant(token));
    }
    for token in DAMAGE_TYPES {
        stats.insert(feature_name(DAMAGE_VULNERABLE, token), damage.is_vulnerable(token));
    }
    for token in DAMAGE_TYPES {
        stats.insert(feature_name(DAMAGE_RATING, token), damage.rating(token).multiplier());
    }
}

/// A creature is named when either NPC flag is truthy.
fn is_named(record: &MonsterRecord) -> bool {
    ["isNpc", "isNamedCreature"]
        .iter()
        .any(|key| record.get(*key).is_some_and(is_truthy))
}

// ============================================================================
// Tests
// ============================================================================
