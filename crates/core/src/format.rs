//! Display formatting for object metadata
//!
//! Pure functions: none of them read the clock. Relative times take `now`
//! explicitly so the same snapshot renders identically in tests.

use jiff::Timestamp;

/// Rendered size for zero-byte and unknown sizes
pub const EMPTY_SIZE: &str = "0 B";

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
const KIBI: f64 = 1024.0;

/// Humanize a byte count using 1024-based units
///
/// Picks the largest unit (up to TB) in which the value is at least 1 and
/// rounds to two decimals, dropping trailing zeros: `5120` is `5 KB`,
/// `1468000` is `1.4 MB`. Zero and unknown sizes render as [`EMPTY_SIZE`].
pub fn format_bytes(bytes: Option<u64>) -> String {
    let bytes = match bytes {
        Some(b) if b > 0 => b,
        _ => return EMPTY_SIZE.to_string(),
    };

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= KIBI && unit < SIZE_UNITS.len() - 1 {
        value /= KIBI;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", SIZE_UNITS[unit])
}

/// ISO-8601 UTC rendering with millisecond precision, empty when absent
pub fn to_iso(timestamp: Option<Timestamp>) -> String {
    match timestamp {
        Some(ts) => format!(
            "{}.{:03}Z",
            ts.strftime("%Y-%m-%dT%H:%M:%S"),
            ts.subsec_millisecond().unsigned_abs()
        ),
        None => String::new(),
    }
}

/// Humanize how long before `now` the timestamp lies
///
/// Under 45 seconds is "a few seconds ago", then whole minutes (at least
/// one), hours and days. Timestamps after `now` report "in the future".
pub fn format_relative(timestamp: Timestamp, now: Timestamp) -> String {
    let elapsed = now.as_second() - timestamp.as_second();

    if elapsed < 0 {
        return "in the future".to_string();
    }
    if elapsed < 45 {
        return "a few seconds ago".to_string();
    }
    if elapsed < 3_600 {
        return plural((elapsed / 60).max(1), "minute");
    }
    if elapsed < 86_400 {
        return plural(elapsed / 3_600, "hour");
    }
    plural(elapsed / 86_400, "day")
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}
