// src/utils/time.rs

use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

/// Fixed offset of the learners' time zone. Offsets outside ±23h fall back to UTC.
pub fn local_offset(offset_hours: i32) -> FixedOffset {
    FixedOffset::east_opt(offset_hours * 3600).unwrap_or_else(|| Utc.fix())
}

/// Calendar date at `now` in the learners' time zone.
pub fn local_today(now: DateTime<Utc>, offset_hours: i32) -> NaiveDate {
    now.with_timezone(&local_offset(offset_hours)).date_naive()
}

/// Time left until the next `hour:00` local time, strictly after `now`.
pub fn until_next_local_hour(now: DateTime<Utc>, offset_hours: i32, hour: u32) -> Duration {
    let local = now.with_timezone(&local_offset(offset_hours)).naive_local();

    let mut target = local
        .date()
        .and_hms_opt(hour.min(23), 0, 0)
        .unwrap_or(local);
    if target <= local {
        target += chrono::Duration::days(1);
    }

    (target - local).to_std().unwrap_or(Duration::ZERO)
}
