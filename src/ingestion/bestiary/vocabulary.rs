//! Fixed Bestiary Vocabulary
//!
//! Compile-time vocabularies that define the flat output schema: abilities,
//! conditions, damage tokens and skills. Nothing here is loaded at runtime,
//! so every flattened record carries exactly the same feature names.

use std::fmt;

// ============================================================================
// ABILITIES
// ============================================================================

/// One of the six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    /// All abilities in statblock order.
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// Three-letter key used by statblock records (`"dex"`).
    pub fn short_name(self) -> &'static str {
        match self {
            Ability::Strength => "str",
            Ability::Dexterity => "dex",
            Ability::Constitution => "con",
            Ability::Intelligence => "int",
            Ability::Wisdom => "wis",
            Ability::Charisma => "cha",
        }
    }

    /// Lowercase full name (`"dexterity"`).
    pub fn full_name(self) -> &'static str {
        match self {
            Ability::Strength => "strength",
            Ability::Dexterity => "dexterity",
            Ability::Constitution => "constitution",
            Ability::Intelligence => "intelligence",
            Ability::Wisdom => "wisdom",
            Ability::Charisma => "charisma",
        }
    }

    /// Look up an ability by its short record key.
    pub fn from_short_name(name: &str) -> Option<Ability> {
        Self::ALL.into_iter().find(|a| a.short_name() == name)
    }

    /// Feature name of the save modifier (`"dexSaveMod"`).
    pub fn save_mod_feature(self) -> String {
        format!("{}SaveMod", self.short_name())
    }

    /// Feature name of the induced-save flag (`"inducesDexteritySave"`).
    pub fn induces_save_feature(self) -> String {
        format!("induces{}Save", title_case(self.full_name()))
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name())
    }
}

// ============================================================================
// CONDITIONS AND DAMAGE TOKENS
// ============================================================================

/// Conditions a creature can be immune to.
pub const CONDITIONS: [&str; 15] = [
    "blinded",
    "charmed",
    "deafened",
    "exhaustion",
    "frightened",
    "grappled",
    "incapacitated",
    "invisible",
    "paralyzed",
    "petrified",
    "poisoned",
    "prone",
    "restrained",
    "stunned",
    "unconscious",
];

/// Prefix marking a damage token that only applies to nonmagical attacks.
pub const NONMAGICAL_PREFIX: &str = "nm_";

/// The 13 standard damage types followed by the 3 nonmagical-only variants.
pub const DAMAGE_TYPES: [&str; 16] = [
    "acid",
    "bludgeoning",
    "cold",
    "fire",
    "force",
    "lightning",
    "necrotic",
    "piercing",
    "poison",
    "psychic",
    "radiant",
    "slashing",
    "thunder",
    "nm_bludgeoning",
    "nm_piercing",
    "nm_slashing",
];

// ============================================================================
// SKILLS
// ============================================================================

/// Skills and their governing ability.
pub const SKILLS: [(&str, Ability); 18] = [
    ("athletics", Ability::Strength),
    ("acrobatics", Ability::Dexterity),
    ("sleight of hand", Ability::Dexterity),
    ("stealth", Ability::Dexterity),
    ("arcana", Ability::Intelligence),
    ("history", Ability::Intelligence),
    ("investigation", Ability::Intelligence),
    ("nature", Ability::Intelligence),
    ("religion", Ability::Intelligence),
    ("animal handling", Ability::Wisdom),
    ("insight", Ability::Wisdom),
    ("medicine", Ability::Wisdom),
    ("perception", Ability::Wisdom),
    ("survival", Ability::Wisdom),
    ("deception", Ability::Charisma),
    ("intimidation", Ability::Charisma),
    ("performance", Ability::Charisma),
    ("persuasion", Ability::Charisma),
];

/// The perception skill, also reported as a standalone feature.
pub const PERCEPTION: &str = "perception";

// ============================================================================
// FEATURE NAMING
// ============================================================================

/// Capitalise the first letter of every alphabetic run and lowercase the
/// rest, so `"nm_slashing"` becomes `"Nm_Slashing"`.
pub fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut at_word_start = true;
    for c in word.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Feature name for a vocabulary term under a camelCase prefix
/// (`feature_name("damageImmune", "fire")` is `"damageImmuneFire"`).
pub fn feature_name(prefix: &str, term: &str) -> String {
    format!("{prefix}{}", title_case(term))
}
