//! License row queries

#[path = "../common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_create_license_defaults() {
    let conn = setup_test_db();
    let license = create_test_license(&conn, "alice", Some(future_timestamp(ONE_MONTH)), true);

    assert_eq!(license.key.len(), linkauth::keygen::KEY_LEN);
    assert_eq!(license.owner, "alice");
    assert_eq!(license.status, LicenseStatus::Active);
    assert!(!license.is_bound(), "new license should be unbound");
    assert!(license.last_ip.is_none());
    assert!(license.last_seen_at.is_none());

    let stored = reload(&conn, &license.key);
    assert_eq!(stored.expires_at, license.expires_at);
    assert!(stored.hwid_locked);
}

#[test]
fn test_features_persist_as_list() {
    let conn = setup_test_db();
    let input = CreateLicense {
        owner: "bob".to_string(),
        expires_at: None,
        hwid_locked: false,
        features: vec!["pro".to_string(), "beta".to_string()],
    };
    let license = queries::create_license(&conn, &input).unwrap();

    let stored = reload(&conn, &license.key);
    assert_eq!(stored.features, vec!["pro", "beta"]);
}

#[test]
fn test_get_unknown_license_is_none() {
    let conn = setup_test_db();
    assert!(queries::get_license_by_key(&conn, "nope").unwrap().is_none());
}

#[test]
fn test_try_bind_hwid_only_once() {
    let conn = setup_test_db();
    let license = create_test_license(&conn, "alice", None, true);

    assert!(queries::try_bind_hwid(&conn, &license.key, "hw1", "10.0.0.1").unwrap());
    assert!(!queries::try_bind_hwid(&conn, &license.key, "hw2", "10.0.0.2").unwrap());

    let stored = reload(&conn, &license.key);
    assert_eq!(stored.bound_hwid, "hw1");
    assert_eq!(stored.last_ip.as_deref(), Some("10.0.0.1"));
}

#[test]
fn test_record_successful_auth_keeps_existing_binding() {
    let conn = setup_test_db();
    let license = create_test_license(&conn, "alice", None, false);

    queries::record_successful_auth(&conn, &license.key, "hw1", "1.1.1.1", 100).unwrap();
    queries::record_successful_auth(&conn, &license.key, "hw2", "2.2.2.2", 200).unwrap();

    let stored = reload(&conn, &license.key);
    assert_eq!(stored.bound_hwid, "hw1", "binding is set once");
    assert_eq!(stored.last_ip.as_deref(), Some("2.2.2.2"));
    assert_eq!(stored.last_seen_at, Some(200));
}

#[test]
fn test_record_successful_auth_with_empty_hwid_does_not_bind() {
    let conn = setup_test_db();
    let license = create_test_license(&conn, "alice", None, true);

    queries::record_successful_auth(&conn, &license.key, "", "1.1.1.1", 100).unwrap();

    assert!(!reload(&conn, &license.key).is_bound());
}

#[test]
fn test_set_status_unknown_key() {
    let conn = setup_test_db();
    assert!(!queries::set_license_status(&conn, "missing", LicenseStatus::Banned).unwrap());
}

#[test]
fn test_list_licenses_newest_first() {
    let conn = setup_test_db();
    let first = create_test_license(&conn, "first", None, false);
    let second = create_test_license(&conn, "second", None, false);
    let third = create_test_license(&conn, "third", None, false);

    let listed = queries::list_licenses(&conn, 10).unwrap();
    let keys: Vec<_> = listed.iter().map(|l| l.key.as_str()).collect();
    assert_eq!(
        keys,
        vec![third.key.as_str(), second.key.as_str(), first.key.as_str()]
    );

    assert_eq!(queries::list_licenses(&conn, 2).unwrap().len(), 2);
}

#[test]
fn test_avg_days_left_ignores_perpetual_and_inactive() {
    let conn = setup_test_db();
    let at = now();
    create_test_license(&conn, "ten", Some(at + 10 * 86400), false);
    create_test_license(&conn, "twenty", Some(at + 20 * 86400), false);
    create_test_license(&conn, "forever", None, false);
    create_test_license(&conn, "lapsed", Some(at - 86400), false);
    let banned = create_test_license(&conn, "banned", Some(at + 1000 * 86400), false);
    queries::set_license_status(&conn, &banned.key, LicenseStatus::Banned).unwrap();

    let avg = queries::avg_days_left(&conn, at).unwrap().unwrap();
    assert!((avg - 15.0).abs() < 1e-9, "expected 15 days, got {}", avg);
}

#[test]
fn test_avg_days_left_none_without_candidates() {
    let conn = setup_test_db();
    create_test_license(&conn, "forever", None, false);
    assert!(queries::avg_days_left(&conn, now()).unwrap().is_none());
}
