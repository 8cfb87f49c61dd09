use chrono::{DateTime, SecondsFormat, Utc};

/// Seconds from the Unix epoch back to 0001-01-01T00:00:00Z
const ZERO_TIME_UNIX_SECS: i64 = -62_135_596_800;

/// Timestamp of a delivery the broker did not stamp: 0001-01-01T00:00:00Z.
pub fn unset_timestamp() -> DateTime<Utc> {
    DateTime::from_timestamp(ZERO_TIME_UNIX_SECS, 0).unwrap_or_default()
}

/// RFC 3339 in UTC with a `Z` suffix. The fraction keeps only its
/// significant digits and is left out for whole seconds, e.g.
/// `2009-11-10T23:00:00Z`, `2009-11-10T23:00:00.5Z`.
pub fn format_rfc3339(ts: &DateTime<Utc>) -> String {
    let full = ts.to_rfc3339_opts(SecondsFormat::Nanos, true);
    let trimmed = full
        .trim_end_matches('Z')
        .trim_end_matches('0')
        .trim_end_matches('.');
    format!("{}Z", trimmed)
}
