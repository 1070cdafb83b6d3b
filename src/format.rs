use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};

/// Default absolute-date pattern, month/day/year without padding.
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Label for an `updated` value that does not parse.
pub const UNKNOWN_DATE: &str = "Unknown date";

const MS_PER_DAY: i64 = 1000 * 60 * 60 * 24;

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339, a date-time without offset (read as local time) and a
/// bare date (read as UTC midnight).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return naive
                .and_local_timezone(Local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// "1 season", "3 seasons", "0 episodes".
pub fn pluralize(count: u32, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Human-relative rendering of `then` against `now`.
///
/// Uses the absolute difference, so future instants read the same as past
/// ones. Whole days are rounded up from the millisecond difference.
pub fn relative_date(then: DateTime<Utc>, now: DateTime<Utc>, date_format: &str) -> String {
    let diff_ms = (now - then).num_milliseconds().unsigned_abs() as i64;
    let days = (diff_ms + MS_PER_DAY - 1) / MS_PER_DAY;

    if days == 1 {
        "Yesterday".to_string()
    } else if days < 7 {
        format!("{days} days ago")
    } else if days < 30 {
        format!("{} weeks ago", (days + 6) / 7)
    } else {
        then.with_timezone(&Local).format(date_format).to_string()
    }
}

/// Like [`relative_date`] but from the raw ISO-8601 string.
pub fn relative_date_str(raw: &str, now: DateTime<Utc>, date_format: &str) -> String {
    match parse_timestamp(raw) {
        Some(then) => relative_date(then, now, date_format),
        None => {
            tracing::warn!(value = raw, "malformed updated timestamp");
            UNKNOWN_DATE.to_string()
        }
    }
}
