use chrono::{DateTime, Utc};

pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Unix timestamps of the three historical horizons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeltaTimestamps {
    pub t24: i64,
    pub t48: i64,
    pub t_week: i64,
}

/// Horizons relative to `now`, aligned to the start of the minute.
///
/// Minute alignment keeps the timestamps (and so the block cache keys)
/// stable across refreshes within the same minute.
pub fn delta_timestamps(now: DateTime<Utc>) -> DeltaTimestamps {
    let minute = now.timestamp().div_euclid(SECONDS_PER_MINUTE) * SECONDS_PER_MINUTE;
    DeltaTimestamps {
        t24: minute - SECONDS_PER_DAY,
        t48: minute - 2 * SECONDS_PER_DAY,
        t_week: minute - 7 * SECONDS_PER_DAY,
    }
}
