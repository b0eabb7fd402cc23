use chrono::{TimeZone, Utc};
use garden_backend::publish_state::{evaluate, needs_publish, Stamp};
use serde_json::json;

fn at(seconds: i64) -> Stamp {
    Stamp::At(Utc.timestamp_opt(seconds, 0).unwrap())
}

#[test]
fn never_published_with_no_edits_is_clean() {
    assert!(!needs_publish(Stamp::Unset, Stamp::Unset, Stamp::Unset));
}

#[test]
fn never_published_with_any_edit_needs_publish() {
    assert!(needs_publish(at(100), Stamp::Unset, Stamp::Unset));
    assert!(needs_publish(Stamp::Unset, at(100), Stamp::Unset));
    assert!(needs_publish(at(100), at(200), Stamp::Unset));
}

#[test]
fn published_after_all_edits_is_clean() {
    assert!(!needs_publish(at(100), at(200), at(300)));
    assert!(!needs_publish(Stamp::Unset, Stamp::Unset, at(300)));
    assert!(!needs_publish(at(300), Stamp::Unset, at(300)));
}

#[test]
fn project_edit_after_publish_needs_publish_regardless_of_settings() {
    assert!(needs_publish(Stamp::Unset, at(400), at(300)));
    assert!(needs_publish(at(100), at(400), at(300)));
    assert!(needs_publish(at(400), at(400), at(300)));
}

#[test]
fn settings_edit_after_publish_needs_publish() {
    assert!(needs_publish(at(400), Stamp::Unset, at(300)));
    assert!(needs_publish(at(400), at(100), at(300)));
}

#[test]
fn equal_timestamps_do_not_need_publish() {
    // Strictly-after comparison: publishing at the same instant as the
    // last edit counts as up to date.
    assert!(!needs_publish(at(300), at(300), at(300)));
}

#[test]
fn normalization_is_format_agnostic() {
    let from_epoch = Stamp::from_wire(&json!({"seconds": 1_700_000_000, "nanoseconds": 0}));
    let from_text = Stamp::from_wire(&json!("2023-11-14T22:13:20Z"));
    assert_eq!(from_epoch, from_text);
    assert!(from_epoch.is_set());

    // Same predicate result either way.
    let published = Stamp::from_wire(&json!({"seconds": 1_600_000_000}));
    assert_eq!(
        needs_publish(from_epoch, Stamp::Unset, published),
        needs_publish(from_text, Stamp::Unset, published),
    );
}

#[test]
fn normalization_is_idempotent() {
    let stamp = Stamp::from_wire(&json!("2023-11-14T22:13:20Z"));
    let reserialized = serde_json::to_value(stamp).unwrap();
    assert_eq!(Stamp::from_wire(&reserialized), stamp);
}

#[test]
fn malformed_input_reads_as_unset() {
    assert_eq!(Stamp::from_wire(&json!("not a date")), Stamp::Unset);
    assert_eq!(Stamp::from_wire(&json!("2023-45-99")), Stamp::Unset);
    assert_eq!(Stamp::from_wire(&json!(null)), Stamp::Unset);
    assert_eq!(Stamp::from_wire(&json!(42)), Stamp::Unset);
    assert_eq!(Stamp::from_wire(&json!({"nanos": 7})), Stamp::Unset);
    assert_eq!(Stamp::from_wire(&json!({"seconds": i64::MAX})), Stamp::Unset);
    assert_eq!(Stamp::from_wire(&json!([1, 2, 3])), Stamp::Unset);
}

#[test]
fn deserialization_never_fails_inside_a_document() {
    #[derive(serde::Deserialize)]
    struct Doc {
        #[serde(default)]
        updated_at: Stamp,
    }

    let doc: Doc = serde_json::from_value(json!({"updated_at": {"bogus": true}})).unwrap();
    assert_eq!(doc.updated_at, Stamp::Unset);

    let doc: Doc = serde_json::from_value(json!({})).unwrap();
    assert_eq!(doc.updated_at, Stamp::Unset);

    let doc: Doc = serde_json::from_value(json!({"updated_at": "garbage"})).unwrap();
    assert_eq!(doc.updated_at, Stamp::Unset);
}

#[test]
fn unset_is_not_epoch_zero() {
    // An unset stamp must not behave like "1970": a published site with no
    // recorded edits is clean, not infinitely stale.
    assert!(!needs_publish(Stamp::Unset, Stamp::Unset, at(0)));
    assert!(!Stamp::Unset.is_after(&at(0)));
    assert!(!at(0).is_after(&Stamp::Unset));
}

#[test]
fn publish_cycle_end_to_end() {
    let t0 = at(1_000);
    let t1 = at(2_000);
    // Edited after the last publish.
    assert!(needs_publish(t1, Stamp::Unset, t0));

    // Publishing at t2 > t1 clears the flag.
    let t2 = at(3_000);
    assert!(!needs_publish(t1, Stamp::Unset, t2));
}

#[test]
fn evaluate_reports_the_inputs_back() {
    let state = evaluate(at(100), at(200), Stamp::Unset);
    assert!(state.needs_publish);
    assert_eq!(state.updated_at, at(100));
    assert_eq!(state.project_updated_at, at(200));
    assert_eq!(state.published_at, Stamp::Unset);
}

#[test]
fn serializes_as_rfc3339_or_null() {
    assert_eq!(
        serde_json::to_value(at(1_700_000_000)).unwrap(),
        json!("2023-11-14T22:13:20.000Z")
    );
    assert_eq!(serde_json::to_value(Stamp::Unset).unwrap(), json!(null));
}
