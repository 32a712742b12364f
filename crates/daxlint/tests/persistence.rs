//! Integration test: JSON snapshots and catalog upgrades on restore.

use daxlint::rules::{rule_ids, unused_variables, use_divide, CATALOG_VERSION};
use daxlint::{DaxExpression, PersistError};
use serde_json::Value;

const SOURCE: &str = "VAR x = 1 // note\nRETURN 2 / 3";

fn snapshot(source: &str) -> Value {
    let json = DaxExpression::new(source).to_json().expect("snapshot should encode");
    serde_json::from_str(&json).expect("snapshot should be JSON")
}

/// Rewrites a snapshot as if `rule_id` did not exist when it was taken.
fn without_rule(mut value: Value, rule_id: &str) -> Value {
    value["catalog"]
        .as_array_mut()
        .expect("catalog should be an array")
        .retain(|id| id != rule_id);
    value["outcomes"]
        .as_array_mut()
        .expect("outcomes should be an array")
        .retain(|o| o["rule"]["id"] != rule_id);
    value["catalog_version"] = Value::from(CATALOG_VERSION - 1);
    value
}

// ── Round trip ──

#[test]
fn restore_matches_original() {
    let original = DaxExpression::new(SOURCE);
    let restored = DaxExpression::from_json(&original.to_json().unwrap()).unwrap();

    assert_eq!(restored.source(), original.source());
    assert_eq!(restored.tokens(), original.tokens());
    assert_eq!(restored.comments(), vec!["// note"]);
    assert_eq!(restored.references(), original.references());
    assert_eq!(restored.rule_outcomes(), original.rule_outcomes());
    assert_eq!(restored.total_violations(), 2);
    assert_eq!(restored.to_string(), SOURCE);
}

#[test]
fn snapshot_omits_tokens() {
    let value = snapshot(SOURCE);
    assert!(value.get("tokens").is_none());
    assert_eq!(value["text_without_comments"], "VAR x = 1 \nRETURN 2 / 3");
    assert_eq!(value["catalog"].as_array().map(Vec::len), Some(rule_ids().len()));
}

#[test]
fn stored_outcomes_are_kept() {
    let mut value = snapshot(SOURCE);
    for outcome in value["outcomes"].as_array_mut().unwrap() {
        if outcome["rule"]["id"] == use_divide::ID {
            outcome["violators"] = Value::Array(Vec::new());
        }
    }
    let restored = DaxExpression::from_json(&value.to_string()).unwrap();
    assert_eq!(
        restored.rule(use_divide::ID).map(|o| o.number_of_violations()),
        Some(0)
    );
    assert_eq!(restored.total_violations(), 1);
}

#[test]
fn derived_fields_are_recomputed() {
    let mut value = snapshot(SOURCE);
    value["comments"] = Value::Array(Vec::new());
    value["text_without_comments"] = Value::from("tampered");
    value["canonical_text"] = Value::from("tampered");
    value["variables"] = Value::Array(Vec::new());
    value.as_object_mut().unwrap().remove("references");

    let restored = DaxExpression::from_json(&value.to_string()).unwrap();
    let original = DaxExpression::new(SOURCE);
    assert_eq!(restored.comments(), vec!["// note"]);
    assert_eq!(restored.text_without_comments(), original.text_without_comments());
    assert_eq!(restored.canonical_text(), original.canonical_text());
    assert_eq!(restored.variables(), original.variables());
    assert_eq!(restored.references(), original.references());
}

// ── Upgrades ──

#[test]
fn missing_rule_runs_on_restore() {
    let value = without_rule(snapshot(SOURCE), unused_variables::ID);
    let restored = DaxExpression::from_json(&value.to_string()).unwrap();

    let outcome = restored
        .rule(unused_variables::ID)
        .expect("missing rule should be run");
    assert!(outcome.verified);
    assert_eq!(outcome.violators[0].text, "x");
    assert_eq!(restored.total_violations(), 2);
    assert_eq!(restored.catalog_version(), CATALOG_VERSION);

    let ids: Vec<&str> = restored
        .rule_outcomes()
        .iter()
        .map(|o| o.rule.id.as_str())
        .collect();
    assert_eq!(ids, rule_ids().to_vec());
}

#[test]
fn bare_source_snapshot_runs_every_rule() {
    let restored = DaxExpression::from_json(r#"{"source": "1 / 0"}"#).unwrap();
    assert!(restored.is_verified());
    assert_eq!(restored.rule_outcomes().len(), rule_ids().len());
    assert_eq!(restored.total_violations(), 1);
    assert_eq!(restored.artifact_references().len(), 0);
}

#[test]
fn restored_expression_can_be_reverified() {
    let value = without_rule(snapshot("1 / 0"), use_divide::ID);
    let mut restored = DaxExpression::from_json(&value.to_string()).unwrap();
    restored.verify_best_practices();
    assert_eq!(restored.total_violations(), 1);
}

// ── Errors ──

#[test]
fn malformed_snapshot_is_an_error() {
    let err = DaxExpression::from_json("{\"source\": 3}").unwrap_err();
    assert!(matches!(err, PersistError::Decode(_)));
}

#[test]
fn invalid_utf8_is_analyzed_as_empty() {
    let expr = DaxExpression::from_utf8(b"1 / \xC3\x28");
    assert_eq!(expr.source(), "");
    assert_eq!(expr.total_violations(), 0);
    assert!(expr.comments().is_empty());

    let restored = DaxExpression::from_json(&expr.to_json().unwrap()).unwrap();
    assert_eq!(restored.source(), "");
}
