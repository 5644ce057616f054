use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LogAction {
    AuthFailed,
    HwidMismatch,
    AuthSuccess,
}

/// One validation attempt. Rows are append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub key: String,
    pub ip: String,
    /// Empty when the client sent no HWID
    pub hwid: String,
    pub action: LogAction,
    pub timestamp: i64,
}
