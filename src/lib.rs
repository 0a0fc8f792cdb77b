//! Statblock Features - bestiary flattening for tabular analysis
//!
//! Core library turning tabletop monster statblocks into flat,
//! fixed-schema feature records.

pub mod config;
pub mod core;
pub mod ingestion;


pub use ingestion::bestiary::{
    feature_names, flatten_bestiary, BestiaryFlattener, ExtractError, FeatureValue,
    FlattenOptions, FlattenReport, MonsterStats,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
