//! Flat output records.
//!
//! A [`MonsterStats`] maps feature names to scalar [`FeatureValue`]s. The set
//! of names is fixed by the vocabularies and enumerated by
//! [`feature_names`].

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::vocabulary::{feature_name, Ability, CONDITIONS, DAMAGE_TYPES, SKILLS};

/// Prefix of the condition-immunity flags.
pub const CONDITION_IMMUNE: &str = "conditionImmune";
/// Prefix of the damage-immunity flags.
pub const DAMAGE_IMMUNE: &str = "damageImmune";
/// Prefix of the damage-resistance flags.
pub const DAMAGE_RESIST: &str = "damageResist";
/// Prefix of the damage-vulnerability flags.
pub const DAMAGE_VULNERABLE: &str = "damageVulnerable";
/// Prefix of the damage multipliers.
pub const DAMAGE_RATING: &str = "damageRating";

/// One feature value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// Ordered attack bonuses.
    IntegerList(Vec<i64>),
    /// Opaque passthrough payload.
    Raw(Value),
}

impl FeatureValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FeatureValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FeatureValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        FeatureValue::Text(value)
    }
}

impl From<i64> for FeatureValue {
    fn from(value: i64) -> Self {
        FeatureValue::Integer(value)
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Float(value)
    }
}

impl From<bool> for FeatureValue {
    fn from(value: bool) -> Self {
        FeatureValue::Boolean(value)
    }
}

impl From<Vec<i64>> for FeatureValue {
    fn from(value: Vec<i64>) -> Self {
        FeatureValue::IntegerList(value)
    }
}

impl From<Value> for FeatureValue {
    fn from(value: Value) -> Self {
        FeatureValue::Raw(value)
    }
}

/// A flattened monster: feature name to value, in assembly order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MonsterStats {
    features: IndexMap<String, FeatureValue>,
}

impl MonsterStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a feature. Each feature is assigned exactly once per record.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FeatureValue>) {
        let name = name.into();
        let previous = self.features.insert(name.clone(), value.into());
        debug_assert!(previous.is_none(), "feature `{name}` assigned twice");
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.features.get(name)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Feature names in assembly order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.features.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// The fixed flat schema, in the order the assembler produces it.
pub fn feature_names() -> Vec<String> {
    let mut names = vec!["name".to_string()];
    names.extend(Ability::ALL.map(Ability::save_mod_feature));
    names.extend(CONDITIONS.iter().map(|c| feature_name(CONDITION_IMMUNE, c)));
    for prefix in [DAMAGE_IMMUNE, DAMAGE_RESIST, DAMAGE_VULNERABLE, DAMAGE_RATING] {
        names.extend(DAMAGE_TYPES.iter().map(|d| feature_name(prefix, d)));
    }
    names.extend(
        [
            "type",
            "cr",
            "cr_num",
            "source",
            "named",
            "has_ranged_option",
            "spellcasting",
            "to_hits",
        ]
        .map(String::from),
    );
    names.extend(SKILLS.iter().map(|(skill, _)| skill.to_string()));
    names.push("ac".to_string());
    names.extend(Ability::ALL.map(Ability::induces_save_feature));
    names
}
