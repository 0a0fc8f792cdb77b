//! Bestiary Flattening Unit Tests
//!
//! Whole-record scenarios for the bestiary flattener:
//! - Schema normalization of nested type/CR/AC shapes
//! - Damage precedence, nonmagical unfolding and absorption
//! - Action heuristics on realistic action blocks
//! - Per-record fault isolation in batches

mod flattener_tests;
