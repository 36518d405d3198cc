use super::*;

fn sample(instance_id: &str, patch: &str) -> SampleRecord {
    SampleRecord::new(instance_id, patch, patch)
}

#[test]
fn test_push_assigns_sample_index_per_instance() {
    let mut store = ExecutionStore::new();

    assert_eq!(store.push(sample("a", "p0")), 0);
    assert_eq!(store.push(sample("b", "q0")), 0);
    assert_eq!(store.push(sample("a", "p1")), 1);
    assert_eq!(store.push(sample("a", "p2")), 2);

    let a = store.records_for("a").expect("instance a present");
    let indices: Vec<_> = a.iter().map(|r| r.sample_index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(a[1].raw_patch, "p1");
}

#[test]
fn test_iteration_follows_first_seen_order() {
    let mut store = ExecutionStore::new();
    store.push(sample("zeta", "x"));
    store.push(sample("alpha", "x"));
    store.push(sample("zeta", "y"));
    store.push(sample("mid", "x"));

    let ids: Vec<_> = store.iter().map(|(id, _)| id).collect();
    assert_eq!(ids, vec!["zeta", "alpha", "mid"]);

    let counts: Vec<_> = store.iter().map(|(_, s)| s.len()).collect();
    assert_eq!(counts, vec![2, 1, 1]);
}

#[test]
fn test_records_for_unknown_instance() {
    let store = ExecutionStore::new();
    assert!(store.records_for("missing").is_none());
    assert!(store.is_empty());
}

#[test]
fn test_short_instances() {
    let mut store = ExecutionStore::new();
    for _ in 0..3 {
        store.push(sample("full", "p"));
    }
    store.push(sample("short", "p"));

    assert_eq!(store.len(), 2);
    assert_eq!(store.short_instances(3), vec![("short", 1)]);
    assert!(store.short_instances(1).is_empty());
}

#[test]
fn test_sample_validity() {
    assert!(SampleRecord::new("a", "diff", "key").is_valid());
    assert!(!SampleRecord::new("a", "", "key").is_valid());
    assert!(!SampleRecord::new("a", "diff", "").is_valid());
    assert!(!SampleRecord::new("a", "  \n", "key").is_valid());
    assert!(!SampleRecord::new("a", "diff", " \t").is_valid());
}

#[test]
fn test_outcome_value_accessors() {
    let b = OutcomeValue::Bool(true);
    let c = OutcomeValue::Count(4);

    assert_eq!(b.kind(), OutcomeKind::Bool);
    assert_eq!(c.kind(), OutcomeKind::Count);
    assert_eq!(b.as_bool(), Some(true));
    assert_eq!(b.as_count(), None);
    assert_eq!(c.as_count(), Some(4));
    assert_eq!(c.as_bool(), None);
}

#[test]
fn test_outcome_value_serializes_untagged() {
    assert_eq!(
        serde_json::to_string(&OutcomeValue::Bool(false)).unwrap(),
        "false"
    );
    assert_eq!(serde_json::to_string(&OutcomeValue::Count(12)).unwrap(), "12");
}

#[test]
fn test_with_outcome() {
    let record = SampleRecord::new("a", "p", "k")
        .with_outcome("regression", OutcomeValue::Count(2))
        .with_outcome("reproduction", OutcomeValue::Bool(true));

    assert_eq!(record.outcome("regression"), Some(OutcomeValue::Count(2)));
    assert_eq!(record.outcome("reproduction"), Some(OutcomeValue::Bool(true)));
    assert_eq!(record.outcome("overall_result"), None);
}
