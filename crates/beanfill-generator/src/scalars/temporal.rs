//! Date, time, timestamp and duration generators.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rand::Rng;
use std::time::Duration;

/// 2100-01-01T00:00:00Z; default random timestamps fall before it.
const MAX_EPOCH_SECS: i64 = 4_102_444_800;

const SECS_PER_DAY: u32 = 86_400;

/// Generate a random date between 1970 and 2099.
pub fn generate_date<R: Rng + ?Sized>(rng: &mut R) -> NaiveDate {
    generate_date_time(rng).date()
}

/// Generate a random time of day with second precision.
pub fn generate_time<R: Rng + ?Sized>(rng: &mut R) -> NaiveTime {
    let secs = rng.gen_range(0..SECS_PER_DAY);
    NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap_or_default()
}

/// Generate a random date-time between 1970 and 2099.
pub fn generate_date_time<R: Rng + ?Sized>(rng: &mut R) -> NaiveDateTime {
    generate_timestamp(rng).naive_utc()
}

/// Generate a random UTC timestamp between 1970 and 2099.
pub fn generate_timestamp<R: Rng + ?Sized>(rng: &mut R) -> DateTime<Utc> {
    let secs = rng.gen_range(0..MAX_EPOCH_SECS);
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

/// Generate a random duration below one year, with second precision.
pub fn generate_duration<R: Rng + ?Sized>(rng: &mut R) -> Duration {
    Duration::from_secs(rng.gen_range(0..u64::from(SECS_PER_DAY) * 365))
}

/// Generate a random duration in the given range of seconds (inclusive).
pub fn generate_duration_range<R: Rng + ?Sized>(rng: &mut R, min_secs: u64, max_secs: u64) -> Duration {
    if min_secs >= max_secs {
        return Duration::from_secs(min_secs);
    }
    Duration::from_secs(rng.gen_range(min_secs..=max_secs))
}

/// Generate a random timestamp in the given range.
///
/// The start and end are RFC 3339 timestamps or `YYYY-MM-DD` dates.
/// Returns `None` when neither bound parses.
pub fn generate_timestamp_range<R: Rng + ?Sized>(
    rng: &mut R,
    start: &str,
    end: &str,
) -> Option<DateTime<Utc>> {
    match (parse_timestamp(start), parse_timestamp(end)) {
        (Some(start), Some(end)) => {
            let start_ts = start.timestamp();
            let end_ts = end.timestamp();
            if start_ts >= end_ts {
                Some(start)
            } else {
                let random_ts = rng.gen_range(start_ts..=end_ts);
                Some(DateTime::from_timestamp(random_ts, 0).unwrap_or(start))
            }
        }
        (Some(dt), None) | (None, Some(dt)) => Some(dt),
        (None, None) => None,
    }
}

/// Parse a timestamp string in RFC 3339 or date-only form.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}
