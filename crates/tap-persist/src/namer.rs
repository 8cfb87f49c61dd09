use chrono::{DateTime, Utc};

/// Filename fragment for a message received at `ts`.
///
/// ISO-8601 with a full nanosecond fraction and `_` in place of `:`, e.g.
/// `2009-11-10T23_01_02.000000003Z`. Fixed width, so string order is time
/// order for years 0000-9999.
pub fn timestamp_filename(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H_%M_%S%.9fZ").to_string()
}
