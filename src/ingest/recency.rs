// src/ingest/recency.rs
use chrono::{DateTime, Duration, Utc};

/// Rolling acceptance window, in calendar days.
pub const WINDOW_DAYS: i64 = 7;

/// Accept iff the candidate's UTC calendar day falls in
/// `[today - WINDOW_DAYS, today]`, both ends inclusive, with `today`
/// taken from `now` at evaluation time.
pub fn within_window(published_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    let today = now.date_naive();
    let floor = today - Duration::days(WINDOW_DAYS);
    let day = published_at.date_naive();
    floor <= day && day <= today
}
