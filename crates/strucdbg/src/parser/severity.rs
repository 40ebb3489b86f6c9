//! Severity normalization across heterogeneous producer conventions.
//!
//! Textual tokens are matched case-insensitively first; anything else is
//! tried as a numeric log level (Python/structlog style: 10, 20, ... 50).
//! Pure functions only.

use serde_json::Value;

use super::model::Severity;

const DEBUG_TOKENS: &[&str] = &["debug", "dbg", "d"];
const INFO_TOKENS: &[&str] = &["info", "information", "i"];
const WARNING_TOKENS: &[&str] = &["warn", "warning", "w"];
const ERROR_TOKENS: &[&str] = &["error", "err", "e"];
const CRITICAL_TOKENS: &[&str] = &["critical", "fatal", "crit", "f"];

/// Normalize a raw JSON severity value. Absent, null and unrecognized input
/// all map to [`Severity::Info`].
pub fn normalize(raw: Option<&Value>) -> Severity {
    match raw {
        Some(Value::String(s)) => normalize_str(s),
        Some(Value::Number(n)) => n.as_f64().and_then(from_level_number).unwrap_or_default(),
        _ => Severity::Info,
    }
}

/// Normalize a textual severity, including numeric strings like `"30"`.
pub fn normalize_str(raw: &str) -> Severity {
    if let Some(severity) = match_token(raw) {
        return severity;
    }
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(from_level_number)
        .unwrap_or_default()
}

/// Exact (case-insensitive) token lookup.
pub(crate) fn match_token(raw: &str) -> Option<Severity> {
    let token = raw.to_ascii_lowercase();
    let token = token.as_str();

    if DEBUG_TOKENS.contains(&token) {
        Some(Severity::Debug)
    } else if INFO_TOKENS.contains(&token) {
        Some(Severity::Info)
    } else if WARNING_TOKENS.contains(&token) {
        Some(Severity::Warning)
    } else if ERROR_TOKENS.contains(&token) {
        Some(Severity::Error)
    } else if CRITICAL_TOKENS.contains(&token) {
        Some(Severity::Critical)
    } else {
        None
    }
}

/// Thresholds are inclusive at the lower bound.
fn from_level_number(level: f64) -> Option<Severity> {
    if !level.is_finite() {
        return None;
    }
    let severity = if level >= 50.0 {
        Severity::Critical
    } else if level >= 40.0 {
        Severity::Error
    } else if level >= 30.0 {
        Severity::Warning
    } else if level >= 20.0 {
        Severity::Info
    } else {
        Severity::Debug
    };
    Some(severity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_textual_tokens() {
        let cases = [
            ("debug", Severity::Debug),
            ("DBG", Severity::Debug),
            ("d", Severity::Debug),
            ("Information", Severity::Info),
            ("I", Severity::Info),
            ("warn", Severity::Warning),
            ("WARNING", Severity::Warning),
            ("w", Severity::Warning),
            ("err", Severity::Error),
            ("E", Severity::Error),
            ("fatal", Severity::Critical),
            ("CRIT", Severity::Critical),
            ("f", Severity::Critical),
        ];
        for (raw, expected) in cases {
            assert_eq!(normalize_str(raw), expected, "token {raw}");
        }
    }

    #[test]
    fn test_numeric_thresholds_are_inclusive() {
        assert_eq!(normalize(Some(&json!(50))), Severity::Critical);
        assert_eq!(normalize(Some(&json!(49))), Severity::Error);
        assert_eq!(normalize(Some(&json!(40))), Severity::Error);
        assert_eq!(normalize(Some(&json!(39.9))), Severity::Warning);
        assert_eq!(normalize(Some(&json!(30))), Severity::Warning);
        assert_eq!(normalize(Some(&json!(20))), Severity::Info);
        assert_eq!(normalize(Some(&json!(19))), Severity::Debug);
        assert_eq!(normalize(Some(&json!(-5))), Severity::Debug);
    }

    #[test]
    fn test_numeric_strings() {
        assert_eq!(normalize(Some(&json!("50"))), Severity::Critical);
        assert_eq!(normalize(Some(&json!(" 30 "))), Severity::Warning);
        assert_eq!(normalize(Some(&json!("10"))), Severity::Debug);
    }

    #[test]
    fn test_unrecognized_defaults_to_info() {
        assert_eq!(normalize(None), Severity::Info);
        assert_eq!(normalize(Some(&Value::Null)), Severity::Info);
        assert_eq!(normalize(Some(&json!(true))), Severity::Info);
        assert_eq!(normalize(Some(&json!(""))), Severity::Info);
        assert_eq!(normalize(Some(&json!("verbose"))), Severity::Info);
        assert_eq!(normalize(Some(&json!("inf"))), Severity::Info);
        assert_eq!(normalize(Some(&json!({"level": "error"}))), Severity::Info);
    }

    #[test]
    fn test_canonical_tokens_are_idempotent() {
        for raw in ["dbg", "information", "w", "err", "fatal", "15", "45"] {
            let once = normalize_str(raw);
            let twice = normalize_str(once.as_str());
            assert_eq!(once, twice, "token {raw}");
        }
    }
}
