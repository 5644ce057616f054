//! Lifecycle manager - issue, initialize, revoke, ban, expire, reset

#[path = "../common/mod.rs"]
mod common;

use common::*;
use std::collections::HashSet;

const IP: &str = "198.51.100.4";

// ============ Issue ============

#[test]
fn test_issue_with_duration() {
    let conn = setup_test_db();
    let before = now();
    let license = issue_test_license(&conn, "alice", Some(ONE_MONTH), true);

    let expires_at = license.expires_at.expect("duration should set expiry");
    assert!(expires_at >= before + ONE_MONTH * 86400);
    assert!(expires_at <= now() + ONE_MONTH * 86400);
    assert_eq!(license.status, LicenseStatus::Active);
    assert!(license.hwid_locked);
    assert!(!license.is_bound());
}

#[test]
fn test_issue_without_duration_never_expires() {
    let mut conn = setup_test_db();
    let license = issue_test_license(&conn, "alice", None, false);
    assert!(license.expires_at.is_none());

    let ok = licensing::validate(&mut conn, &license.key, "", IP).unwrap();
    assert_eq!(ok.days_left, DaysLeft::Unbounded);
}

#[test]
fn test_issue_trims_owner_and_dedupes_features() {
    let conn = setup_test_db();
    let license = licensing::issue(
        &conn,
        &IssueLicense {
            owner: "  alice  ".to_string(),
            duration_days: None,
            hwid_locked: false,
            features: vec![
                "pro".to_string(),
                " pro ".to_string(),
                "".to_string(),
                "beta".to_string(),
            ],
        },
    )
    .unwrap();

    assert_eq!(license.owner, "alice");
    assert_eq!(license.features, vec!["pro", "beta"]);
}

#[test]
fn test_issue_rejects_bad_owner() {
    let conn = setup_test_db();

    let too_long = "x".repeat(licensing::MAX_OWNER_LEN + 1);
    for owner in ["", "   ", too_long.as_str()] {
        let result = licensing::issue(
            &conn,
            &IssueLicense {
                owner: owner.to_string(),
                ..Default::default()
            },
        );
        assert!(
            matches!(result, Err(AppError::BadRequest(_))),
            "owner {:?} should be rejected",
            owner
        );
    }

    // Exactly at the limit is fine
    let owner = "y".repeat(licensing::MAX_OWNER_LEN);
    assert!(issue_test_license(&conn, &owner, None, false).owner == owner);
}

#[test]
fn test_issue_rejects_bad_duration() {
    let conn = setup_test_db();

    for days in [0, -5, licensing::MAX_DURATION_DAYS + 1] {
        let result = licensing::issue(
            &conn,
            &IssueLicense {
                owner: "alice".to_string(),
                duration_days: Some(days),
                ..Default::default()
            },
        );
        assert!(
            matches!(result, Err(AppError::BadRequest(_))),
            "duration {} should be rejected",
            days
        );
    }
}

#[test]
fn test_issued_keys_are_distinct() {
    let conn = setup_test_db();
    conn.execute_batch("BEGIN").unwrap();

    let mut keys = HashSet::new();
    for _ in 0..10_000 {
        let license = issue_test_license(&conn, "bulk", None, false);
        assert!(keys.insert(license.key), "duplicate key issued");
    }

    conn.execute_batch("COMMIT").unwrap();
    assert_eq!(keys.len(), 10_000);
}

// ============ Initialize ============

#[test]
fn test_initialize_succeeds_once() {
    let conn = setup_test_db();
    let license = issue_test_license(&conn, "alice", None, true);

    licensing::initialize(&conn, &license.key, "hw1", IP).unwrap();

    let stored = reload(&conn, &license.key);
    assert_eq!(stored.bound_hwid, "hw1");
    assert_eq!(stored.last_ip.as_deref(), Some(IP));

    for hwid in ["hw1", "hw2"] {
        let result = licensing::initialize(&conn, &license.key, hwid, IP);
        match result {
            Err(AppError::InvalidState(msg)) => {
                assert_eq!(msg, licensing::ALREADY_INITIALIZED_MESSAGE)
            }
            other => panic!("expected InvalidState, got {:?}", other),
        }
    }
    assert_eq!(reload(&conn, &license.key).bound_hwid, "hw1");
}

#[test]
fn test_initialize_unknown_key() {
    let conn = setup_test_db();
    let result = licensing::initialize(&conn, "missing", "hw1", IP);
    assert!(matches!(result, Err(AppError::InvalidState(_))));
}

#[test]
fn test_initialize_requires_hwid() {
    let conn = setup_test_db();
    let license = issue_test_license(&conn, "alice", None, true);

    let result = licensing::initialize(&conn, &license.key, "", IP);
    assert!(matches!(result, Err(AppError::InvalidState(_))));
    assert!(!reload(&conn, &license.key).is_bound());
}

#[test]
fn test_initialize_writes_no_log() {
    let conn = setup_test_db();
    let license = issue_test_license(&conn, "alice", None, true);
    licensing::initialize(&conn, &license.key, "hw1", IP).unwrap();

    let logs = queries::list_logs_for_key(&conn, &license.key, 10).unwrap();
    assert!(logs.is_empty());
}

#[test]
fn test_initialize_after_validation_bound_fails() {
    let mut conn = setup_test_db();
    let license = issue_test_license(&conn, "alice", None, true);
    licensing::validate(&mut conn, &license.key, "hw1", IP).unwrap();

    let result = licensing::initialize(&conn, &license.key, "hw2", IP);
    assert!(matches!(result, Err(AppError::InvalidState(_))));
}

#[test]
fn test_initialized_key_rejects_other_hwid() {
    let mut conn = setup_test_db();
    let license = issue_test_license(&conn, "alice", None, true);
    licensing::initialize(&conn, &license.key, "hw1", IP).unwrap();

    assert!(licensing::validate(&mut conn, &license.key, "hw1", IP).is_ok());
    assert!(matches!(
        licensing::validate(&mut conn, &license.key, "hw2", IP),
        Err(AppError::Unauthorized(_))
    ));
}

// ============ Status transitions ============

#[test]
fn test_status_operations() {
    let conn = setup_test_db();

    let revoked = issue_test_license(&conn, "a", None, false);
    let banned = issue_test_license(&conn, "b", None, false);
    let expired = issue_test_license(&conn, "c", None, false);

    licensing::revoke(&conn, &revoked.key).unwrap();
    licensing::ban(&conn, &banned.key).unwrap();
    licensing::expire(&conn, &expired.key).unwrap();

    assert_eq!(reload(&conn, &revoked.key).status, LicenseStatus::Deleted);
    assert_eq!(reload(&conn, &banned.key).status, LicenseStatus::Banned);
    assert_eq!(reload(&conn, &expired.key).status, LicenseStatus::Expired);
}

#[test]
fn test_revoked_key_is_kept() {
    let mut conn = setup_test_db();
    let license = issue_test_license(&conn, "alice", None, false);
    licensing::revoke(&conn, &license.key).unwrap();

    // Soft delete: the row survives and validation fails
    assert_eq!(reload(&conn, &license.key).owner, "alice");
    assert!(matches!(
        licensing::validate(&mut conn, &license.key, "", IP),
        Err(AppError::Unauthorized(_))
    ));
}

#[test]
fn test_lifecycle_ops_on_unknown_key() {
    let conn = setup_test_db();

    assert!(matches!(licensing::revoke(&conn, "missing"), Err(AppError::NotFound(_))));
    assert!(matches!(licensing::ban(&conn, "missing"), Err(AppError::NotFound(_))));
    assert!(matches!(licensing::expire(&conn, "missing"), Err(AppError::NotFound(_))));
    assert!(matches!(licensing::reset_hwid(&conn, "missing"), Err(AppError::NotFound(_))));
}

// ============ Reset HWID ============

#[test]
fn test_reset_hwid_allows_rebinding() {
    let mut conn = setup_test_db();
    let license = issue_test_license(&conn, "alice", None, true);
    licensing::validate(&mut conn, &license.key, "hw1", IP).unwrap();

    licensing::reset_hwid(&conn, &license.key).unwrap();
    assert!(!reload(&conn, &license.key).is_bound());

    let ok = licensing::validate(&mut conn, &license.key, "hw2", IP).unwrap();
    assert_eq!(ok.hwid, "hw2");

    // And the new binding is enforced
    assert!(matches!(
        licensing::validate(&mut conn, &license.key, "hw1", IP),
        Err(AppError::Unauthorized(_))
    ));
}

#[test]
fn test_reset_hwid_then_initialize() {
    let conn = setup_test_db();
    let license = issue_test_license(&conn, "alice", None, true);
    licensing::initialize(&conn, &license.key, "hw1", IP).unwrap();

    licensing::reset_hwid(&conn, &license.key).unwrap();
    licensing::initialize(&conn, &license.key, "hw2", IP).unwrap();

    assert_eq!(reload(&conn, &license.key).bound_hwid, "hw2");
}
