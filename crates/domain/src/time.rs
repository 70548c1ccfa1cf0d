//! Time and timestamp helpers.

use chrono::{DateTime, Duration, SubsecRound, Utc};

/// UTC timestamp used for `created_at`, `updated_at` and `uploaded_at`.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time, truncated to microseconds.
///
/// Microseconds is the precision timestamps are persisted with, so a value
/// read back from storage compares equal to the one written.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now().trunc_subsecs(6)
}

/// Return a timestamp strictly later than `previous`.
///
/// Usually the current time; when the clock has not moved past `previous`
/// (coarse clocks, back-to-back writes) it is `previous` plus one microsecond.
#[must_use]
pub fn after(previous: Timestamp) -> Timestamp {
    let current = now();
    if current > previous {
        current
    } else {
        previous + Duration::microseconds(1)
    }
}
