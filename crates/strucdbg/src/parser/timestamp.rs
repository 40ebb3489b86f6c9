use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Naive layouts tried after RFC 3339 / RFC 2822; interpreted as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
];

/// Render a UTC instant the way records carry it (`2026-01-30T12:00:00.000Z`).
pub fn format_iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Interpret a record-declared time value.
///
/// Numbers are epoch milliseconds; strings go through general date parsing.
/// Anything else (or an out-of-range value) yields `None`.
pub fn parse_declared(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                    .map(|f| f.trunc() as i64)
            })?;
            DateTime::from_timestamp_millis(millis)
        }
        Value::String(s) => parse_date_str(s),
        _ => None,
    }
}

fn parse_date_str(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_iso_uses_millis_and_z() {
        let ts = DateTime::from_timestamp_millis(1_769_774_400_123).unwrap();
        assert_eq!(format_iso(ts), "2026-01-30T12:00:00.123Z");
    }

    #[test]
    fn test_numbers_are_epoch_millis() {
        let ts = parse_declared(&json!(1_769_774_400_000_i64)).unwrap();
        assert_eq!(format_iso(ts), "2026-01-30T12:00:00.000Z");

        let ts = parse_declared(&json!(1500.9)).unwrap();
        assert_eq!(format_iso(ts), "1970-01-01T00:00:01.500Z");
    }

    #[test]
    fn test_strings() {
        let cases = [
            ("2026-01-30T12:00:00Z", "2026-01-30T12:00:00.000Z"),
            ("2026-01-30T14:00:00.250+02:00", "2026-01-30T12:00:00.250Z"),
            ("Fri, 30 Jan 2026 12:00:00 +0000", "2026-01-30T12:00:00.000Z"),
            ("2026-01-30 12:00:00.5", "2026-01-30T12:00:00.500Z"),
            ("2026-01-30T12:00:00", "2026-01-30T12:00:00.000Z"),
            ("2026-01-30", "2026-01-30T00:00:00.000Z"),
        ];
        for (raw, expected) in cases {
            let ts = parse_declared(&json!(raw)).unwrap_or_else(|| panic!("{raw} should parse"));
            assert_eq!(format_iso(ts), expected);
        }
    }

    #[test]
    fn test_unparsable_values() {
        assert!(parse_declared(&json!("last tuesday")).is_none());
        assert!(parse_declared(&json!("")).is_none());
        assert!(parse_declared(&json!(true)).is_none());
        assert!(parse_declared(&Value::Null).is_none());
        assert!(parse_declared(&json!(1e300)).is_none());
    }
}
