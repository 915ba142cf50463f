//! Settlement date helpers

use std::time::{SystemTime, UNIX_EPOCH};

const SECONDS_PER_DAY: u64 = 86_400;

/// Current date as days since the Unix epoch
pub fn today_epoch_day() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| (d.as_secs() / SECONDS_PER_DAY) as i64)
        .unwrap_or_default()
}

/// Roll a date forward off the weekend to the next business day
///
/// Epoch day 0 is a Thursday, so `(day + 4) % 7` yields 0 for Sunday and
/// 6 for Saturday.
pub fn value_date(epoch_day: i64) -> i64 {
    match (epoch_day + 4).rem_euclid(7) {
        6 => epoch_day + 2,
        0 => epoch_day + 1,
        _ => epoch_day,
    }
}
