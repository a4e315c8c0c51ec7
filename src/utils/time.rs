//! Time helpers - business timezone conversion
//!
//! Order timestamps (`reception_date`, `end_date`) are recorded in the
//! restaurant's local timezone (Lima, UTC-5, no DST).

use chrono::{DateTime, FixedOffset, Utc};

/// Lima offset in seconds (UTC-5)
const LIMA_OFFSET_SECS: i32 = -5 * 3600;

fn lima_offset() -> FixedOffset {
    // -5h is always a valid offset
    FixedOffset::east_opt(LIMA_OFFSET_SECS).unwrap()
}

/// Current time in the business timezone
pub fn business_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&lima_offset())
}

/// Whole minutes elapsed between two instants, never negative
pub fn minutes_between(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> i64 {
    (end - start).num_minutes().max(0)
}
