use apiq_types::prelude::*;

#[test]
fn verdict_serializes_uppercase() {
    assert_eq!(
        serde_json::to_value(Verdict::Pass).unwrap(),
        serde_json::json!("PASS")
    );
    assert_eq!(
        serde_json::to_value(Verdict::Unknown).unwrap(),
        serde_json::json!("UNKNOWN")
    );
}

#[test]
fn verdict_from_token_fails_closed() {
    assert_eq!(Verdict::from_token("  pass \n"), Verdict::Pass);
    assert_eq!(Verdict::from_token("PASS"), Verdict::Pass);
    assert_eq!(Verdict::from_token("pass please"), Verdict::Fail);
    assert_eq!(Verdict::from_token(""), Verdict::Fail);
    assert_eq!(Verdict::from_token("FAIL: x"), Verdict::Fail);
}

#[test]
fn random_ids_are_distinct() {
    assert_ne!(Id::new_random(), Id::new_random());
}

#[test]
fn timestamp_roundtrips_through_chrono() {
    let ts = Timestamp(1_704_448_800_000); // 2024-01-05T10:00:00Z
    let dt = ts.to_datetime().expect("in range");
    assert_eq!(dt.timestamp_millis(), ts.0);
    assert!(ts.to_rfc3339().starts_with("2024-01-05"));
}
