//! Timestamp formatting and cutoff parsing.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};

/// Format a timestamp for storage.
///
/// Fixed-width RFC3339 with microsecond precision and a `Z` suffix, so the
/// TEXT columns compare lexicographically in timestamp order.
#[must_use]
pub fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp, falling back to the epoch on malformed input.
#[must_use]
pub fn parse_ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(
        |_| DateTime::<Utc>::UNIX_EPOCH,
        |dt| dt.with_timezone(&Utc),
    )
}

/// Parse a cutoff specification into a `DateTime<Utc>`.
///
/// Supports:
/// - RFC3339: `2026-01-15T12:00:00Z`
/// - Simple date: `2026-01-15` (midnight UTC)
/// - Relative duration back from now: `7d`, `24h`, `30m`, `2w`
///
/// Returns `None` if the input cannot be parsed.
#[must_use]
pub fn parse_cutoff(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let midnight = NaiveTime::from_hms_opt(0, 0, 0)?;
        return Utc.from_local_datetime(&date.and_time(midnight)).single();
    }

    // Relative: a bare amount + unit means "that long ago"
    let rest = s.strip_prefix('-').unwrap_or(s);
    let unit_char = rest.chars().last()?;
    let amount: i64 = rest[..rest.len() - 1].parse().ok()?;
    let duration = match unit_char {
        'm' => Duration::minutes(amount),
        'h' => Duration::hours(amount),
        'd' => Duration::days(amount),
        'w' => Duration::weeks(amount),
        _ => return None,
    };
    Some(Utc::now() - duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_cutoff_rfc3339() {
        let result = parse_cutoff("2026-01-15T12:00:00Z").unwrap();
        assert_eq!(result.year(), 2026);
    }

    #[test]
    fn test_parse_cutoff_simple_date() {
        let result = parse_cutoff("2026-06-20").unwrap();
        assert_eq!(result.month(), 6);
        assert_eq!(result.day(), 20);
    }

    #[test]
    fn test_parse_cutoff_relative() {
        let result = parse_cutoff("7d").unwrap();
        assert!(result < Utc::now());

        let leading_minus = parse_cutoff("-24h").unwrap();
        assert!(leading_minus < Utc::now());
    }

    #[test]
    fn test_parse_cutoff_invalid() {
        assert!(parse_cutoff("soon").is_none());
        assert!(parse_cutoff("7x").is_none());
    }

    #[test]
    fn test_format_ts_is_fixed_width_and_ordered() {
        let t1 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let t2 = Utc.timestamp_opt(1_700_000_000, 500_000_000).unwrap();
        let s1 = format_ts(t1);
        let s2 = format_ts(t2);
        assert_eq!(s1.len(), s2.len());
        assert!(s1 < s2);
    }

    #[test]
    fn test_parse_ts_roundtrip_and_fallback() {
        let t = Utc.timestamp_opt(1_700_000_000, 123_456_000).unwrap();
        assert_eq!(parse_ts(&format_ts(t)), t);
        assert_eq!(parse_ts("garbage"), DateTime::<Utc>::UNIX_EPOCH);
    }
}
