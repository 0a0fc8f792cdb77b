//! Whole-record flattening scenarios.

use crate::ingestion::bestiary::{
    feature_names, BestiaryFlattener, ExtractError, FeatureValue, FlattenOptions, MonsterStats,
};
use crate::tests::common::{melee_brute, minimal_monster, named_npc, young_dragon};
use serde_json::{json, Value};

fn flatten(record: &Value) -> MonsterStats {
    BestiaryFlattener::new()
        .flatten_monster(record)
        .expect("fixture should flatten")
}

fn int(stats: &MonsterStats, name: &str) -> i64 {
    stats
        .get(name)
        .and_then(FeatureValue::as_i64)
        .unwrap_or_else(|| panic!("{name} should be an integer"))
}

fn float(stats: &MonsterStats, name: &str) -> f64 {
    stats
        .get(name)
        .and_then(FeatureValue::as_f64)
        .unwrap_or_else(|| panic!("{name} should be a float"))
}

fn flag(stats: &MonsterStats, name: &str) -> bool {
    stats
        .get(name)
        .and_then(FeatureValue::as_bool)
        .unwrap_or_else(|| panic!("{name} should be a boolean"))
}

// ============================================================================
// Schema normalization
// ============================================================================

#[test]
fn test_dragon_nested_shapes() {
    let stats = flatten(&young_dragon());

    assert_eq!(stats.get("type").and_then(FeatureValue::as_str), Some("dragon"));
    assert_eq!(stats.get("cr").and_then(FeatureValue::as_str), Some("10"));
    assert_eq!(float(&stats, "cr_num"), 10.0);
    assert_eq!(int(&stats, "ac"), 18);
}

#[test]
fn test_dragon_saves_mix_overrides_and_defaults() {
    let stats = flatten(&young_dragon());

    assert_eq!(int(&stats, "strSaveMod"), 5);
    assert_eq!(int(&stats, "dexSaveMod"), 4);
    assert_eq!(int(&stats, "conSaveMod"), 8);
    assert_eq!(int(&stats, "intSaveMod"), 2);
    assert_eq!(int(&stats, "wisSaveMod"), 4);
    assert_eq!(int(&stats, "chaSaveMod"), 8);
}

#[test]
fn test_dragon_skills() {
    let stats = flatten(&young_dragon());

    assert_eq!(int(&stats, "perception"), 8);
    assert_eq!(int(&stats, "stealth"), 4);
    assert_eq!(int(&stats, "athletics"), 5);
    assert_eq!(int(&stats, "arcana"), 2);
    assert_eq!(int(&stats, "insight"), 0);
}

#[test]
fn test_npc_object_ac_and_numeric_save() {
    let stats = flatten(&named_npc());

    assert_eq!(int(&stats, "ac"), 16);
    assert_eq!(stats.get("type").and_then(FeatureValue::as_str), Some("humanoid"));
    assert_eq!(int(&stats, "wisSaveMod"), 3);
    // "see text" is not a number, so the default stands
    assert_eq!(int(&stats, "strSaveMod"), 1);
    assert!(flag(&stats, "named"));
}

#[test]
fn test_npc_explicit_zero_perception_is_kept() {
    let stats = flatten(&named_npc());

    assert_eq!(int(&stats, "perception"), 0);
    assert_eq!(int(&stats, "persuasion"), 7);
}

#[test]
fn test_low_scores_floor_saves_but_truncate_skills() {
    let stats = flatten(&melee_brute());

    assert_eq!(int(&stats, "dexSaveMod"), -1);
    assert_eq!(int(&stats, "acrobatics"), 0);
    assert_eq!(int(&stats, "intSaveMod"), -3);
    assert_eq!(int(&stats, "arcana"), -2);
    assert_eq!(int(&stats, "perception"), -1);
    assert_eq!(int(&stats, "insight"), -1);
    assert_eq!(float(&stats, "cr_num"), 0.5);

    let mut record = melee_brute();
    record["wis"] = json!(7);
    let stats = flatten(&record);
    assert_eq!(int(&stats, "wisSaveMod"), -2);
    assert_eq!(int(&stats, "perception"), -1);
}

// ============================================================================
// Damage interactions
// ============================================================================

#[test]
fn test_dragon_damage_flags() {
    let stats = flatten(&young_dragon());

    assert!(flag(&stats, "damageImmuneLightning"));
    assert!(flag(&stats, "damageImmuneNm_Slashing"));
    assert!(flag(&stats, "damageImmuneNm_Piercing"));
    assert!(!flag(&stats, "damageImmuneSlashing"));
    assert!(flag(&stats, "damageResistThunder"));
    assert!(flag(&stats, "damageVulnerableCold"));
    assert!(flag(&stats, "conditionImmuneFrightened"));
    assert!(!flag(&stats, "conditionImmuneCharmed"));
}

#[test]
fn test_dragon_damage_ratings() {
    let stats = flatten(&young_dragon());

    assert_eq!(float(&stats, "damageRatingLightning"), -1.0);
    assert_eq!(float(&stats, "damageRatingNm_Bludgeoning"), 0.0);
    assert_eq!(float(&stats, "damageRatingThunder"), 0.5);
    assert_eq!(float(&stats, "damageRatingCold"), 2.0);
    assert_eq!(float(&stats, "damageRatingFire"), 1.0);
}

#[test]
fn test_vulnerable_outranks_resistant() {
    let mut record = minimal_monster("Confused Ooze");
    record["resist"] = json!(["acid"]);
    record["vulnerable"] = json!(["acid"]);
    record["immune"] = json!(["acid"]);

    let stats = flatten(&record);
    assert_eq!(float(&stats, "damageRatingAcid"), 2.0);
}

// ============================================================================
// Action heuristics
// ============================================================================

#[test]
fn test_dragon_breath_is_ranged_and_forces_dex_save() {
    let stats = flatten(&young_dragon());

    assert!(flag(&stats, "has_ranged_option"));
    assert_eq!(int(&stats, "inducesDexteritySave"), 1);
    assert_eq!(int(&stats, "inducesWisdomSave"), 0);
    assert_eq!(
        stats.get("to_hits"),
        Some(&FeatureValue::IntegerList(vec![9, 9]))
    );
}

#[test]
fn test_distant_target_counts_as_ranged() {
    let stats = flatten(&named_npc());

    assert!(flag(&stats, "has_ranged_option"));
    assert_eq!(stats.get("to_hits"), Some(&FeatureValue::IntegerList(vec![4])));
}

#[test]
fn test_melee_only_has_no_ranged_option() {
    let stats = flatten(&melee_brute());

    assert!(!flag(&stats, "has_ranged_option"));
    assert_eq!(stats.get("to_hits"), Some(&FeatureValue::IntegerList(vec![6])));
    assert_eq!(
        stats.get("spellcasting"),
        Some(&FeatureValue::Raw(Value::Array(Vec::new())))
    );
}

#[test]
fn test_spellcasting_passes_through() {
    let dragon = young_dragon();
    let stats = flatten(&dragon);

    assert_eq!(
        stats.get("spellcasting"),
        Some(&FeatureValue::Raw(dragon["spellcasting"].clone()))
    );
}

// ============================================================================
// Batches
// ============================================================================

#[test]
fn test_every_fixture_has_the_full_schema() {
    let expected = feature_names();
    for record in [young_dragon(), named_npc(), melee_brute(), minimal_monster("Rat")] {
        let stats = flatten(&record);
        let names: Vec<&str> = stats.names().collect();
        assert_eq!(names, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }
}

#[test]
fn test_batch_skips_bad_records_in_place() {
    let mut no_ac = minimal_monster("Ghost");
    if let Some(fields) = no_ac.as_object_mut() {
        fields.remove("ac");
    }
    let records = vec![young_dragon(), no_ac, json!("not a record"), melee_brute()];

    let report =
        BestiaryFlattener::with_options(FlattenOptions { parallel: true }).flatten(&records);

    assert_eq!(report.total(), 4);
    assert_eq!(report.stats.len(), 2);
    assert_eq!(report.skipped[0].index, 1);
    assert_eq!(report.skipped[0].name.as_deref(), Some("Ghost"));
    assert_eq!(report.skipped[0].error, ExtractError::missing("ac"));
    assert_eq!(report.skipped[1].index, 2);
    assert_eq!(report.skipped[1].name, None);
    assert_eq!(
        report.stats[1].get("name").and_then(FeatureValue::as_str),
        Some("Cave Brute")
    );
}

#[test]
fn test_extreme_ability_score_only_skips_its_record() {
    let mut extreme = minimal_monster("Overflowing Titan");
    extreme["str"] = json!(i64::MIN);
    let records = vec![extreme, melee_brute()];

    for parallel in [false, true] {
        let report = BestiaryFlattener::with_options(FlattenOptions { parallel }).flatten(&records);

        assert_eq!(report.stats.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].error.field(), "str");
        assert_eq!(
            report.stats[0].get("name").and_then(FeatureValue::as_str),
            Some("Cave Brute")
        );
    }
}

#[test]
fn test_oversized_hit_bonus_skips_record() {
    let mut record = melee_brute();
    record["action"] = json!([
        {"name": "Smash", "entries": ["{@atk mw} {@hit 99999999999999999999} to hit"]}
    ]);

    let report = BestiaryFlattener::new().flatten(&[record, minimal_monster("Rat")]);

    assert_eq!(report.stats.len(), 1);
    assert_eq!(
        report.skipped[0].error,
        ExtractError::unparseable("to_hits", "99999999999999999999")
    );
}
