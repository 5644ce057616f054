//! Attempt log queries

#[path = "../common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_append_log_returns_entry() {
    let conn = setup_test_db();
    let entry = queries::append_log(&conn, "k1", "10.0.0.1", "", LogAction::AuthFailed, 42).unwrap();

    assert!(entry.id.starts_with("la_log_"));
    assert_eq!(entry.action, LogAction::AuthFailed);
    assert_eq!(entry.timestamp, 42);
    assert_eq!(count_actions(&conn, "k1", LogAction::AuthFailed), 1);
}

#[test]
fn test_logs_accept_unknown_keys() {
    // Failed attempts for keys that were never issued are still recorded
    let conn = setup_test_db();
    queries::append_log(&conn, "never-issued", "10.0.0.1", "hw", LogAction::AuthFailed, 1).unwrap();
    assert_eq!(queries::list_logs_for_key(&conn, "never-issued", 10).unwrap().len(), 1);
}

#[test]
fn test_count_logs_between_is_half_open() {
    let conn = setup_test_db();
    for ts in [99, 100, 150, 199, 200] {
        queries::append_log(&conn, "k1", "ip", "", LogAction::AuthSuccess, ts).unwrap();
    }
    queries::append_log(&conn, "k2", "ip", "", LogAction::AuthSuccess, 150).unwrap();

    assert_eq!(queries::count_logs_between(&conn, "k1", 100, 200).unwrap(), 3);
}

#[test]
fn test_list_logs_newest_first_with_limit() {
    let conn = setup_test_db();
    queries::append_log(&conn, "k1", "ip", "", LogAction::AuthFailed, 10).unwrap();
    queries::append_log(&conn, "k1", "ip", "hw", LogAction::AuthSuccess, 30).unwrap();
    queries::append_log(&conn, "k1", "ip", "hw2", LogAction::HwidMismatch, 20).unwrap();

    let logs = queries::list_logs_for_key(&conn, "k1", 10).unwrap();
    let stamps: Vec<_> = logs.iter().map(|l| l.timestamp).collect();
    assert_eq!(stamps, vec![30, 20, 10]);
    assert_eq!(logs[1].action, LogAction::HwidMismatch);

    assert_eq!(queries::list_logs_for_key(&conn, "k1", 1).unwrap().len(), 1);
}
