use serde::{Deserialize, Serialize, Serializer};
use strum::{AsRefStr, EnumString};

/// Lifecycle state of a license key. Everything except `Active` is terminal.
///
/// `Expired` is only ever set by an administrator; time-based expiry is
/// evaluated from `expires_at` at read time and never written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LicenseStatus {
    Active,
    Expired,
    Banned,
    Deleted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseKey {
    pub key: String,
    /// Display label, fixed at issuance
    pub owner: String,
    /// Unix timestamp (seconds). None = never expires
    pub expires_at: Option<i64>,
    pub hwid_locked: bool,
    /// Empty until the first bind
    pub bound_hwid: String,
    pub last_ip: Option<String>,
    pub last_seen_at: Option<i64>,
    pub features: Vec<String>,
    pub status: LicenseStatus,
    pub created_at: i64,
}

impl LicenseKey {
    pub fn is_bound(&self) -> bool {
        !self.bound_hwid.is_empty()
    }

    /// True when `expires_at` is set and not strictly in the future.
    pub fn is_time_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

/// Request to issue a new key, as accepted by the lifecycle manager.
#[derive(Debug, Clone, Default)]
pub struct IssueLicense {
    pub owner: String,
    /// Days from now until expiry. None = never expires
    pub duration_days: Option<i64>,
    pub hwid_locked: bool,
    pub features: Vec<String>,
}

/// Row to insert. `expires_at` is already resolved to a timestamp.
#[derive(Debug, Clone)]
pub struct CreateLicense {
    pub owner: String,
    pub expires_at: Option<i64>,
    pub hwid_locked: bool,
    pub features: Vec<String>,
}

/// Whole days until expiry, or unbounded for perpetual keys.
///
/// Serializes as a bare number or the string `"unbounded"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaysLeft {
    Days(i64),
    Unbounded,
}

impl Serialize for DaysLeft {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DaysLeft::Days(days) => serializer.serialize_i64(*days),
            DaysLeft::Unbounded => serializer.serialize_str("unbounded"),
        }
    }
}

/// Snapshot returned to a client after a successful validation.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSuccess {
    pub key: String,
    pub owner: String,
    pub days_left: DaysLeft,
    pub hwid_locked: bool,
    pub hwid: String,
    pub ip: String,
    pub features: Vec<String>,
    pub usage_today: i64,
}

/// Row in the administrative key listing.
#[derive(Debug, Clone, Serialize)]
pub struct KeyView {
    pub key: String,
    pub owner: String,
    pub hwid_locked: bool,
    pub hwid: String,
    pub ip: Option<String>,
    pub last_seen_at: Option<i64>,
    /// "unbounded", "N days" or "expired"
    pub days_left: String,
    pub status: LicenseStatus,
    pub created_at: i64,
}
