//! Schema Normalizer
//!
//! Resolves the polymorphic statblock fields (creature type, challenge
//! rating, armor class, ability scores, saves and skills) into one canonical
//! scalar each. Every field is first classified into a [`FieldShape`] and then
//! resolved by a dedicated function with its own shape precedence.

use std::fmt;

use serde_json::{Map, Value};

use super::error::{ExtractError, Result};
use super::vocabulary::{Ability, PERCEPTION, SKILLS};

/// A raw monster record as handed over by the loader.
pub type MonsterRecord = Map<String, Value>;

// ============================================================================
// Field Shapes
// ============================================================================

/// The observed shape of a single raw field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldShape<'a> {
    /// Key not present.
    Absent,
    /// Explicit `null`.
    Null,
    Boolean(bool),
    /// A number representable as `i64`.
    Integer(i64),
    /// Any other number.
    Number(f64),
    Text(&'a str),
    List(&'a [Value]),
    Object(&'a Map<String, Value>),
}

impl<'a> FieldShape<'a> {
    /// Classify an optional JSON value.
    pub fn of(value: Option<&'a Value>) -> Self {
        match value {
            None => FieldShape::Absent,
            Some(Value::Null) => FieldShape::Null,
            Some(Value::Bool(b)) => FieldShape::Boolean(*b),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(i) => FieldShape::Integer(i),
                None => FieldShape::Number(n.as_f64().unwrap_or(f64::NAN)),
            },
            Some(Value::String(s)) => FieldShape::Text(s),
            Some(Value::Array(items)) => FieldShape::List(items),
            Some(Value::Object(map)) => FieldShape::Object(map),
        }
    }

    /// Classify the value stored under `key` in an object.
    pub fn field(map: &'a Map<String, Value>, key: &str) -> Self {
        Self::of(map.get(key))
    }
}

/// Parse an integer that may be stored as a number or as signed text
/// (`5`, `"+5"`, `" -1 "`).
pub fn parse_signed_int(value: &Value) -> Option<i64> {
    match FieldShape::of(Some(value)) {
        FieldShape::Integer(i) => Some(i),
        FieldShape::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// JSON truthiness: `false`, `null`, zero and empty text, lists or objects
/// are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Render a value as text: strings verbatim, anything else as JSON.
pub(crate) fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A required text field (`name`, `source`).
pub fn required_text(record: &MonsterRecord, key: &str) -> Result<String> {
    match FieldShape::field(record, key) {
        FieldShape::Text(s) => Ok(s.to_string()),
        FieldShape::Absent => Err(ExtractError::missing(key)),
        _ => Err(ExtractError::malformed(key, "text")),
    }
}

// ============================================================================
// Creature Type
// ============================================================================

/// Resolve the creature type: plain text, an object carrying a text `type`,
/// or an object whose `type` is a `choose` list (first choice wins).
pub fn creature_type(record: &MonsterRecord) -> Result<String> {
    const EXPECTED: &str = "text or an object with a `type`";

    match FieldShape::field(record, "type") {
        FieldShape::Text(s) => Ok(s.to_string()),
        FieldShape::Object(obj) => match FieldShape::field(obj, "type") {
            FieldShape::Text(s) => Ok(s.to_string()),
            FieldShape::Object(choice) => match FieldShape::field(choice, "choose") {
                FieldShape::List(options) => match options.first() {
                    Some(Value::String(first)) => Ok(first.clone()),
                    _ => Err(ExtractError::malformed("type.type.choose", "non-empty list of text")),
                },
                FieldShape::Absent => Err(ExtractError::missing("type.type.choose")),
                _ => Err(ExtractError::malformed("type.type.choose", "list")),
            },
            FieldShape::Absent => Err(ExtractError::missing("type.type")),
            _ => Err(ExtractError::malformed("type.type", "text or a choice object")),
        },
        FieldShape::Absent => Err(ExtractError::missing("type")),
        _ => Err(ExtractError::malformed("type", EXPECTED)),
    }
}

// ============================================================================
// Challenge Rating
// ============================================================================

/// An exact non-negative rational number in lowest terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    numer: u64,
    denom: u64,
}

impl Rational {
    /// Build a reduced rational; `None` for a zero denominator.
    pub fn new(numer: u64, denom: u64) -> Option<Self> {
        if denom == 0 {
            return None;
        }
        let g = gcd(numer, denom);
        Some(Self {
            numer: numer / g,
            denom: denom / g,
        })
    }

    /// Parse `N/M`, `D`, `D.`, `D.D` or `.D`, with optional surrounding
    /// whitespace and an optional leading `+`.
    pub fn parse(text: &str) -> Option<Self> {
        let s = text.trim();
        let s = s.strip_prefix('+').unwrap_or(s);

        if let Some((numer, denom)) = s.split_once('/') {
            let numer = parse_digits(numer.trim_end())?;
            let denom = parse_digits(denom.trim_start())?;
            return Self::new(numer, denom);
        }

        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return None;
        }
        let whole = if whole.is_empty() { 0 } else { parse_digits(whole)? };
        if frac.is_empty() {
            return Self::new(whole, 1);
        }
        let places = u32::try_from(frac.len()).ok()?;
        let denom = 10u64.checked_pow(places)?;
        let numer = whole.checked_mul(denom)?.checked_add(parse_digits(frac)?)?;
        Self::new(numer, denom)
    }

    pub fn numer(&self) -> u64 {
        self.numer
    }

    pub fn denom(&self) -> u64 {
        self.denom
    }

    /// Widen to floating point.
    pub fn to_f64(&self) -> f64 {
        self.numer as f64 / self.denom as f64
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}

/// Challenge rating as written in the record plus its exact value.
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeRating {
    /// The rating text as it appears in the record (`"1/2"`).
    pub text: String,
    /// The exact rating.
    pub value: Rational,
}

impl ChallengeRating {
    /// Parse a rating text.
    pub fn parse(text: &str) -> Result<Self> {
        let value = Rational::parse(text).ok_or_else(|| ExtractError::unparseable("cr", text))?;
        Ok(Self {
            text: text.to_string(),
            value,
        })
    }

    /// The rating as a float (`cr_num`).
    pub fn as_f64(&self) -> f64 {
        self.value.to_f64()
    }
}

/// Resolve the challenge rating: absent means `"0"`, text is used as is and
/// an object contributes its `cr` entry.
pub fn challenge_rating(record: &MonsterRecord) -> Result<ChallengeRating> {
    let text = match FieldShape::field(record, "cr") {
        FieldShape::Absent => "0".to_string(),
        FieldShape::Text(s) => s.to_string(),
        FieldShape::Integer(i) => i.to_string(),
        FieldShape::Object(obj) => match FieldShape::field(obj, "cr") {
            FieldShape::Text(s) => s.to_string(),
            FieldShape::Integer(i) => i.to_string(),
            FieldShape::Absent => return Err(ExtractError::missing("cr.cr")),
            _ => return Err(ExtractError::malformed("cr.cr", "text")),
        },
        _ => return Err(ExtractError::malformed("cr", "text or an object with a `cr`")),
    };
    ChallengeRating::parse(&text)
}

// ============================================================================
// Armor Class
// ============================================================================

/// Resolve the armor class: an integer, the first entry of a list, or the
/// `ac.ac` entry of an object. There is no default.
pub fn armor_class(record: &MonsterRecord) -> Result<i64> {
    match FieldShape::field(record, "ac") {
        FieldShape::Integer(ac) => Ok(ac),
        FieldShape::List(entries) => match FieldShape::of(entries.first()) {
            FieldShape::Integer(ac) => Ok(ac),
            FieldShape::Object(entry) => match FieldShape::field(entry, "ac") {
                FieldShape::Integer(ac) => Ok(ac),
                _ => Err(ExtractError::malformed("ac[0].ac", "integer")),
            },
            _ => Err(ExtractError::malformed("ac[0]", "integer or an object with an `ac`")),
        },
        FieldShape::Object(obj) => match FieldShape::field(obj, "ac") {
            FieldShape::Object(inner) => match FieldShape::field(inner, "ac") {
                FieldShape::Integer(ac) => Ok(ac),
                FieldShape::Absent => Err(ExtractError::missing("ac.ac.ac")),
                _ => Err(ExtractError::malformed("ac.ac.ac", "integer")),
            },
            FieldShape::Absent => Err(ExtractError::missing("ac.ac")),
            _ => Err(ExtractError::malformed("ac.ac", "object")),
        },
        FieldShape::Absent => Err(ExtractError::missing("ac")),
        _ => Err(ExtractError::malformed("ac", "integer, list or object")),
    }
}

// ============================================================================
// Abilities, Saves and Skills
// ============================================================================

/// Largest accepted ability score.
pub const MAX_ABILITY_SCORE: i64 = u16::MAX as i64;

/// The six ability scores of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbilityScores {
    scores: [i64; 6],
}

impl AbilityScores {
    /// Read all six scores; each must be present and an integer in
    /// `0..=MAX_ABILITY_SCORE`.
    pub fn from_record(record: &MonsterRecord) -> Result<Self> {
        const EXPECTED: &str = "integer between 0 and 65535";

        let mut scores = [0; 6];
        for (slot, ability) in scores.iter_mut().zip(Ability::ALL) {
            let key = ability.short_name();
            *slot = match FieldShape::field(record, key) {
                FieldShape::Integer(score) if (0..=MAX_ABILITY_SCORE).contains(&score) => score,
                FieldShape::Absent => return Err(ExtractError::missing(key)),
                _ => return Err(ExtractError::malformed(key, EXPECTED)),
            };
        }
        Ok(Self { scores })
    }

    pub fn new(scores: [i64; 6]) -> Self {
        Self { scores }
    }

    /// Score of one ability.
    pub fn get(&self, ability: Ability) -> i64 {
        let idx = Ability::ALL
            .iter()
            .position(|a| *a == ability)
            .unwrap_or_default();
        self.scores[idx]
    }

    /// Save modifier default: `floor((score - 10) / 2)`.
    pub fn save_modifier(&self, ability: Ability) -> i64 {
        (self.get(ability) - 10).div_euclid(2)
    }

    /// Skill default: `(score - 10) / 2` truncated toward zero.
    pub fn skill_modifier(&self, ability: Ability) -> i64 {
        (self.get(ability) - 10) / 2
    }
}

/// Per-ability save modifiers: the computed default, replaced by any
/// integral override from the `save` map. Non-numeric overrides and keys
/// outside the six abilities are ignored.
pub fn save_modifiers(
    record: &MonsterRecord,
    scores: &AbilityScores,
) -> Result<[(Ability, i64); 6]> {
    let mut mods = Ability::ALL.map(|a| (a, scores.save_modifier(a)));

    let overrides = match FieldShape::field(record, "save") {
        FieldShape::Absent | FieldShape::Null => return Ok(mods),
        FieldShape::Object(obj) => obj,
        _ => return Err(ExtractError::malformed("save", "object")),
    };

    for (ability, modifier) in mods.iter_mut() {
        let Some(raw) = overrides.get(ability.short_name()) else {
            continue;
        };
        match parse_signed_int(raw) {
            Some(value) => *modifier = value,
            None => log::debug!(
                "ignoring non-numeric {} save override {}",
                ability.short_name(),
                raw
            ),
        }
    }
    Ok(mods)
}

fn skill_map(record: &MonsterRecord) -> Result<Option<&Map<String, Value>>> {
    match FieldShape::field(record, "skill") {
        FieldShape::Absent | FieldShape::Null => Ok(None),
        FieldShape::Object(obj) => Ok(Some(obj)),
        _ => Err(ExtractError::malformed("skill", "object")),
    }
}

fn explicit_skill(skills: Option<&Map<String, Value>>, skill: &str) -> Result<Option<i64>> {
    let Some(raw) = skills.and_then(|s| s.get(skill)) else {
        return Ok(None);
    };
    parse_signed_int(raw)
        .map(Some)
        .ok_or_else(|| ExtractError::unparseable(format!("skill.{skill}"), render(raw)))
}

fn skill_value(
    skills: Option<&Map<String, Value>>,
    skill: &str,
    ability: Ability,
    scores: &AbilityScores,
) -> Result<i64> {
    Ok(explicit_skill(skills, skill)?.unwrap_or_else(|| scores.skill_modifier(ability)))
}

/// Perception follows the skill rule: an explicit value wins, zero included;
/// otherwise the truncated wisdom modifier.
pub fn perception(record: &MonsterRecord, scores: &AbilityScores) -> Result<i64> {
    skill_value(skill_map(record)?, PERCEPTION, Ability::Wisdom, scores)
}

/// All 18 skill values, in vocabulary order. Explicit values must parse as
/// integers; missing ones fall back to the governing ability's modifier.
pub fn skill_values(
    record: &MonsterRecord,
    scores: &AbilityScores,
) -> Result<Vec<(&'static str, i64)>> {
    let skills = skill_map(record)?;
    SKILLS
        .iter()
        .map(|&(skill, ability)| Ok((skill, skill_value(skills, skill, ability, scores)?)))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
