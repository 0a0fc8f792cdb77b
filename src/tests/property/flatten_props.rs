//! Property-based tests for bestiary flattening
//!
//! Tests invariants:
//! - A flattened record always carries exactly the fixed feature schema
//! - Save defaults floor and skill defaults truncate, perception included
//! - Any integer ability score either flattens or skips its record
//! - Fractional challenge ratings parse exactly
//! - Damage ratings only take the five multiplier values
//! - Parallel and sequential batches agree
//! - Arbitrary optional-field shapes never panic

use proptest::prelude::*;
use serde_json::{json, Map, Value};

use crate::ingestion::bestiary::{
    feature_names, Ability, BestiaryFlattener, FeatureValue, FlattenOptions, Rational,
    DAMAGE_TYPES,
};
use crate::ingestion::bestiary::normalizer::MAX_ABILITY_SCORE;
use crate::ingestion::bestiary::vocabulary::feature_name;

// ============================================================================
// Strategies
// ============================================================================

fn arb_scores() -> impl Strategy<Value = [i64; 6]> {
    prop::array::uniform6(1i64..=30)
}

fn arb_damage_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(DAMAGE_TYPES.to_vec()), 0..4)
        .prop_map(|tokens| tokens.into_iter().map(str::to_string).collect())
}

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|i| json!(i)),
        "[a-z +/0-9]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn monster(name: &str, scores: [i64; 6]) -> Value {
    let mut record = json!({
        "name": name,
        "source": "PROP",
        "type": "construct",
        "ac": 12
    });
    for (ability, score) in Ability::ALL.into_iter().zip(scores) {
        record[ability.short_name()] = json!(score);
    }
    record
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_schema_is_fixed(
        scores in arb_scores(),
        immune in arb_damage_list(),
        resist in arb_damage_list(),
    ) {
        let mut record = monster("Golem", scores);
        record["immune"] = json!(immune);
        record["resist"] = json!(resist);

        let stats = BestiaryFlattener::new().flatten_monster(&record).unwrap();
        let names: Vec<String> = stats.names().map(str::to_string).collect();
        prop_assert_eq!(names, feature_names());
    }

    #[test]
    fn prop_save_defaults_floor_and_skills_truncate(scores in arb_scores()) {
        let stats = BestiaryFlattener::new().flatten_monster(&monster("Golem", scores)).unwrap();

        for (ability, score) in Ability::ALL.into_iter().zip(scores) {
            let save = stats.get(&ability.save_mod_feature()).and_then(FeatureValue::as_i64);
            prop_assert_eq!(save, Some(((score - 10) as f64 / 2.0).floor() as i64));
        }
        let stealth = stats.get("stealth").and_then(FeatureValue::as_i64);
        prop_assert_eq!(stealth, Some((scores[1] - 10) / 2));
        let perception = stats.get("perception").and_then(FeatureValue::as_i64);
        prop_assert_eq!(perception, Some((scores[4] - 10) / 2));
    }

    #[test]
    fn prop_fractional_cr_is_exact(numer in 0u64..1000, denom in 1u64..1000) {
        let parsed = Rational::parse(&format!("{numer}/{denom}")).unwrap();
        prop_assert_eq!(parsed, Rational::new(numer, denom).unwrap());
        prop_assert_eq!(parsed.numer() * denom, numer * parsed.denom());
    }

    #[test]
    fn prop_damage_ratings_are_multipliers(
        immune in arb_damage_list(),
        resist in arb_damage_list(),
        vulnerable in arb_damage_list(),
    ) {
        let mut record = monster("Shifting Horror", [10; 6]);
        record["immune"] = json!(immune);
        record["resist"] = json!(resist);
        record["vulnerable"] = json!(vulnerable);

        let stats = BestiaryFlattener::new().flatten_monster(&record).unwrap();
        for token in DAMAGE_TYPES {
            let rating = stats
                .get(&feature_name("damageRating", token))
                .and_then(FeatureValue::as_f64)
                .unwrap();
            prop_assert!([-1.0, 0.0, 0.5, 1.0, 2.0].contains(&rating));
            if vulnerable.iter().any(|v| v == token) {
                prop_assert_eq!(rating, 2.0);
            }
        }
    }

    #[test]
    fn prop_parallel_matches_sequential(
        batch in prop::collection::vec((arb_scores(), any::<bool>()), 0..12),
    ) {
        let records: Vec<Value> = batch
            .iter()
            .enumerate()
            .map(|(i, (scores, broken))| {
                let mut record = monster(&format!("Golem {i}"), *scores);
                if *broken {
                    record["ac"] = json!("heavy");
                }
                record
            })
            .collect();

        let sequential = BestiaryFlattener::new().flatten(&records);
        let parallel =
            BestiaryFlattener::with_options(FlattenOptions { parallel: true }).flatten(&records);
        prop_assert_eq!(sequential, parallel);
    }

    #[test]
    fn prop_any_integer_score_is_isolated(scores in prop::array::uniform6(any::<i64>())) {
        let records = vec![monster("Wild Golem", scores), monster("Plain Golem", [10; 6])];
        let report = BestiaryFlattener::new().flatten(&records);

        prop_assert_eq!(report.total(), 2);
        let last = report.stats.last().and_then(|s| s.get("name")).and_then(FeatureValue::as_str);
        prop_assert_eq!(last, Some("Plain Golem"));
        let in_range = scores.iter().all(|s| (0..=MAX_ABILITY_SCORE).contains(s));
        prop_assert_eq!(report.skipped.is_empty(), in_range);
    }

    #[test]
    fn prop_arbitrary_optional_fields_never_panic(
        save in arb_json(),
        skill in arb_json(),
        immune in arb_json(),
        action in arb_json(),
        cr in arb_json(),
    ) {
        let mut record = monster("Chaos Spawn", [10; 6]);
        record["save"] = save;
        record["skill"] = skill;
        record["immune"] = immune;
        record["action"] = action;
        record["cr"] = cr;

        let report = BestiaryFlattener::new().flatten(&[record]);
        prop_assert_eq!(report.total(), 1);
    }
}
