use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time as milliseconds since Unix epoch. A clock set
/// before the epoch reads as zero.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
