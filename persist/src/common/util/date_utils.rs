use chrono::{DateTime, Utc};

/// Milliseconds since the unix epoch, as stored in catalog timestamps.
#[inline]
pub fn get_current_time_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Converts a catalog timestamp back into a [DateTime].
pub fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
}
