use std::fs;
use std::path::Path;

use serde_json::json;
use tempfile::TempDir;

use super::*;
use crate::config::{Preset, RerankConfig};
use crate::store::{OutcomeKind, OutcomeValue};

fn write_lines(path: &Path, lines: &[serde_json::Value]) {
    let body: String = lines.iter().map(|l| format!("{l}\n")).collect();
    fs::write(path, body).unwrap();
}

fn patch(instance_id: &str, raw: &str, normalized: &str) -> serde_json::Value {
    json!({
        "instance_id": instance_id,
        "model_patch": raw,
        "normalized_patch": normalized,
    })
}

fn config_for(folders: &[&TempDir], num_samples: usize) -> RerankConfig {
    RerankConfig {
        patch_folders: folders.iter().map(|d| d.path().to_path_buf()).collect(),
        num_samples,
        ..Default::default()
    }
}

#[test]
fn test_attempts_interleave_across_folders() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();

    write_lines(
        &a.path().join("output_0_normalized.jsonl"),
        &[patch("x", "a0", "k-a0")],
    );
    write_lines(
        &a.path().join("output_1_normalized.jsonl"),
        &[patch("x", "a1", "k-a1")],
    );
    write_lines(
        &b.path().join("output_0_normalized.jsonl"),
        &[patch("x", "b0", "k-b0")],
    );
    write_lines(
        &b.path().join("output_1_normalized.jsonl"),
        &[patch("x", "b1", "k-b1")],
    );

    let config = config_for(&[&a, &b], 4);
    let (store, report) = FeedLoader::new(&config).load().unwrap();

    let raw: Vec<_> = store
        .records_for("x")
        .unwrap()
        .iter()
        .map(|r| r.raw_patch.as_str())
        .collect();
    assert_eq!(raw, vec!["a0", "b0", "a1", "b1"]);
    assert_eq!(report.patch_files, 4);
    assert_eq!(report.samples, 4);
}

#[test]
fn test_normalized_key_is_trimmed() {
    let dir = TempDir::new().unwrap();
    write_lines(
        &dir.path().join("output_0_normalized.jsonl"),
        &[patch("x", "raw", "\n  key  \n")],
    );

    let config = config_for(&[&dir], 1);
    let (store, _) = FeedLoader::new(&config).load().unwrap();

    assert_eq!(store.records_for("x").unwrap()[0].normalized_key, "key");
}

#[test]
fn test_deduplicate_disabled_keys_on_raw_patch() {
    let dir = TempDir::new().unwrap();
    write_lines(
        &dir.path().join("output_0_normalized.jsonl"),
        &[json!({"instance_id": "x", "model_patch": " raw diff \n"})],
    );

    let config = RerankConfig {
        deduplicate: false,
        ..config_for(&[&dir], 1)
    };
    let (store, _) = FeedLoader::new(&config).load().unwrap();

    let record = &store.records_for("x").unwrap()[0];
    assert_eq!(record.normalized_key, "raw diff");
    assert_eq!(record.raw_patch, " raw diff \n");
}

#[test]
fn test_missing_normalized_patch_is_an_error_when_deduplicating() {
    let dir = TempDir::new().unwrap();
    write_lines(
        &dir.path().join("output_0_normalized.jsonl"),
        &[
            patch("x", "p", "k"),
            json!({"instance_id": "y", "model_patch": "p"}),
        ],
    );

    let config = config_for(&[&dir], 1);
    let err = FeedLoader::new(&config).load().unwrap_err();

    assert!(matches!(err, FeedError::MissingNormalizedPatch { line: 2, .. }));
}

#[test]
fn test_null_model_patch_loads_as_empty() {
    let dir = TempDir::new().unwrap();
    write_lines(
        &dir.path().join("output_0_normalized.jsonl"),
        &[json!({"instance_id": "x", "model_patch": null, "normalized_patch": ""})],
    );

    let config = config_for(&[&dir], 1);
    let (store, _) = FeedLoader::new(&config).load().unwrap();

    let record = &store.records_for("x").unwrap()[0];
    assert_eq!(record.raw_patch, "");
    assert!(!record.is_valid());
}

#[test]
fn test_missing_patch_file_is_skipped() {
    let dir = TempDir::new().unwrap();
    write_lines(
        &dir.path().join("output_0_normalized.jsonl"),
        &[patch("x", "p", "k")],
    );

    let config = config_for(&[&dir], 3);
    let (store, report) = FeedLoader::new(&config).load().unwrap();

    assert_eq!(store.records_for("x").unwrap().len(), 1);
    assert_eq!(report.missing_patch_files, 2);
    assert_eq!(store.short_instances(3), vec![("x", 1)]);
}

#[test]
fn test_malformed_line_reports_position() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("output_0_normalized.jsonl"),
        "{\"instance_id\": \"x\", \"model_patch\": \"p\", \"normalized_patch\": \"k\"}\n\n{not json\n",
    )
    .unwrap();

    let config = config_for(&[&dir], 1);
    let err = FeedLoader::new(&config).load().unwrap_err();

    assert!(matches!(err, FeedError::Parse { line: 3, .. }));
}

#[test]
fn test_regression_and_reproduction_outcomes() {
    let dir = TempDir::new().unwrap();
    write_lines(
        &dir.path().join("output_0_normalized.jsonl"),
        &[
            patch("a", "pa", "ka"),
            patch("b", "pb", "kb"),
            patch("c", "pc", "kc"),
        ],
    );
    write_lines(
        &dir.path().join("output_0_regression_test_results.jsonl"),
        &[
            json!({"instance_id": "a", "regression": ["test_one", "test_two"]}),
            json!({"instance_id": "b"}),
        ],
    );
    write_lines(
        &dir.path().join("output_0_reproduction_test_results.jsonl"),
        &[json!({"instance_id": "a", "reproduction": true})],
    );

    let config = config_for(&[&dir], 1).with_preset(Preset::Reproduction);
    let (store, report) = FeedLoader::new(&config).load().unwrap();

    let a = &store.records_for("a").unwrap()[0];
    assert_eq!(a.outcome("regression"), Some(OutcomeValue::Count(2)));
    assert_eq!(a.outcome("reproduction"), Some(OutcomeValue::Bool(true)));

    // field missing and record missing both fall back to the sentinel
    let b = &store.records_for("b").unwrap()[0];
    assert_eq!(b.outcome("regression"), Some(OutcomeValue::Count(10_000)));
    assert_eq!(b.outcome("reproduction"), Some(OutcomeValue::Bool(false)));
    let c = &store.records_for("c").unwrap()[0];
    assert_eq!(c.outcome("regression"), Some(OutcomeValue::Count(10_000)));

    assert_eq!(report.defaulted_outcomes, 4);
}

#[test]
fn test_missing_outcome_feed_uses_defaults() {
    let dir = TempDir::new().unwrap();
    write_lines(
        &dir.path().join("output_0_normalized.jsonl"),
        &[patch("a", "pa", "ka")],
    );

    let config = config_for(&[&dir], 1).with_preset(Preset::GroundTruthOverall);
    let (store, report) = FeedLoader::new(&config).load().unwrap();

    let a = &store.records_for("a").unwrap()[0];
    assert_eq!(a.outcome("overall_result"), Some(OutcomeValue::Bool(false)));
    assert_eq!(a.outcome("f2p_result"), Some(OutcomeValue::Bool(false)));
    assert_eq!(report.missing_outcome_files, 1);
}

#[test]
fn test_outcome_index_first_record_wins() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("output_0_ground_truth_results.jsonl");
    write_lines(
        &path,
        &[
            json!({"instance_id": "a", "overall_result": true}),
            json!({"instance_id": "a", "overall_result": false}),
        ],
    );

    let index = OutcomeIndex::load(&path).unwrap();
    assert_eq!(index.len(), 1);

    let spec = crate::config::OutcomeSpec::boolean(
        "overall_result",
        "ground_truth_results",
        "overall_result",
    );
    assert_eq!(index.resolve("a", &spec), (OutcomeValue::Bool(true), false));
    assert_eq!(index.resolve("zz", &spec), (OutcomeValue::Bool(false), true));
}

#[test]
fn test_outcome_index_requires_instance_id() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("output_0_regression_test_results.jsonl");
    write_lines(&path, &[json!({"regression": []})]);

    assert!(matches!(
        OutcomeIndex::load(&path),
        Err(FeedError::MissingInstanceId { line: 1, .. })
    ));
}

#[test]
fn test_decode_outcome() {
    assert_eq!(
        decode_outcome(&json!(["t1", "t2", "t3"]), OutcomeKind::Count),
        Some(OutcomeValue::Count(3))
    );
    assert_eq!(
        decode_outcome(&json!(7), OutcomeKind::Count),
        Some(OutcomeValue::Count(7))
    );
    assert_eq!(decode_outcome(&json!(-1), OutcomeKind::Count), None);
    assert_eq!(decode_outcome(&json!("3"), OutcomeKind::Count), None);
    assert_eq!(
        decode_outcome(&json!(true), OutcomeKind::Bool),
        Some(OutcomeValue::Bool(true))
    );
    assert_eq!(decode_outcome(&json!(1), OutcomeKind::Bool), None);
}

#[test]
fn test_wrong_type_falls_back_to_default() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("output_0_reproduction_test_results.jsonl");
    write_lines(&path, &[json!({"instance_id": "a", "reproduction": "yes"})]);

    let index = OutcomeIndex::load(&path).unwrap();
    let spec = crate::config::OutcomeSpec::reproduction();
    assert_eq!(index.resolve("a", &spec), (OutcomeValue::Bool(false), true));
}

#[test]
fn test_absent_field_in_present_record_uses_default() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("output_0_regression_test_results.jsonl");
    write_lines(&path, &[json!({"instance_id": "a", "status": "done"})]);

    let index = OutcomeIndex::load(&path).unwrap();
    assert_eq!(index.len(), 1);

    let spec = crate::config::OutcomeSpec::regression();
    assert_eq!(
        index.resolve("a", &spec),
        (OutcomeValue::Count(10_000), true)
    );
}
