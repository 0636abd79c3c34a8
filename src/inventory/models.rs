use serde::{Deserialize, Serialize};

/// A mirror number that has been handed out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorRecord {
    pub id: i64,
    pub mirror_number: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}

/// Current time in epoch milliseconds, the timestamp unit used by every table.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
