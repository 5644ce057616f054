use serde::Serialize;

/// Dashboard aggregates over the license store.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Stats {
    /// active + expired + banned (deleted keys are not counted)
    pub total_keys: i64,
    pub active_keys: i64,
    pub expired_keys: i64,
    pub banned_keys: i64,
    pub deleted_keys: i64,
    /// Mean days remaining over active, time-bounded, not-yet-lapsed keys (1 decimal)
    pub avg_days_left: f64,
    /// Share of active keys that are HWID-locked, in percent (1 decimal)
    pub hwid_locked_pct: f64,
}
