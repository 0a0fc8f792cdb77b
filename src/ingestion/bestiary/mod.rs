//! Bestiary Statblock Flattening Module
//!
//! Converts structured monster statblock records into flat feature records
//! for tabular analysis:
//!
//! - **Schema Normalization**: Resolving polymorphic type, CR, AC, save and skill fields
//! - **Damage Interactions**: Unfolding immunity/resistance/vulnerability lists and rating damage
//! - **Action Heuristics**: Mining action prose for ranged options, hit bonuses and forced saves
//! - **Record Assembly**: Merging the above per record with per-record fault isolation
//!
//! # Example
//!
//! ```ignore
//! use crate::ingestion::bestiary::{BestiaryFlattener, FlattenOptions};
//!
//! let flattener = BestiaryFlattener::with_options(FlattenOptions { parallel: true });
//! let report = flattener.flatten(&records);
//! println!("{} flattened, {} skipped", report.stats.len(), report.skipped.len());
//! ```

pub mod assembler;
pub mod damage;
pub mod error;
pub mod heuristics;
pub mod normalizer;
pub mod record;
pub mod vocabulary;

pub use assembler::{
    flatten_bestiary, BestiaryFlattener, FlattenOptions, FlattenReport, SkippedRecord,
};
pub use damage::{DamageProfile, DamageRating};
pub use error::{ExtractError, Result};
pub use heuristics::{ActionMiner, ActionSignals};
pub use normalizer::{AbilityScores, ChallengeRating, FieldShape, MonsterRecord, Rational};
pub use record::{feature_names, FeatureValue, MonsterStats};
pub use vocabulary::{Ability, CONDITIONS, DAMAGE_TYPES, SKILLS};
