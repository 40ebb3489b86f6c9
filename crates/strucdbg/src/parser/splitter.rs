//! Splits one raw output chunk into candidate JSON object strings.
//!
//! Producers routinely write several objects back-to-back without a
//! delimiter (`{"a":1}{"b":2}` or one object per line in the same event).
//! Splitting happens wherever a `}` is followed, modulo whitespace, by a `{`;
//! the braces consumed by the split are restored on both sides.
//!
//! This is a heuristic, not a tokenizer: a string value containing a literal
//! `}{` sequence is split as well, and both halves then fall back to raw text.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

static OBJECT_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\}\s*\{").unwrap());

/// Split `chunk` into candidates. A chunk without a boundary is returned
/// unchanged as the only candidate. Empty candidates are left for the caller
/// to discard.
pub fn split_candidates(chunk: &str) -> Vec<Cow<'_, str>> {
    let parts: Vec<&str> = OBJECT_BOUNDARY.split(chunk).collect();
    if parts.len() < 2 {
        return vec![Cow::Borrowed(chunk)];
    }

    let last = parts.len() - 1;
    parts
        .into_iter()
        .enumerate()
        .map(|(idx, part)| {
            let mut candidate = String::with_capacity(part.len() + 2);
            if idx > 0 {
                candidate.push('{');
            }
            candidate.push_str(part);
            if idx < last {
                candidate.push('}');
            }
            Cow::Owned(candidate)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn split(chunk: &str) -> Vec<String> {
        split_candidates(chunk).into_iter().map(Cow::into_owned).collect()
    }

    #[test]
    fn test_two_adjacent_objects() {
        let parts = split(r#"{"a":1}{"b":2}"#);
        assert_eq!(parts, vec![r#"{"a":1}"#, r#"{"b":2}"#]);
        for part in &parts {
            assert!(serde_json::from_str::<Value>(part).is_ok(), "{part} should be JSON");
        }
    }

    #[test]
    fn test_newline_separated_objects() {
        let parts = split("{\"a\":1}\n{\"b\":2}\r\n  {\"c\":3}\n");
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], r#"{"a":1}"#);
        assert_eq!(parts[1], r#"{"b":2}"#);
        assert_eq!(parts[2], "{\"c\":3}\n");
    }

    #[test]
    fn test_no_boundary_returns_input() {
        let chunk = "plain text without objects\n";
        let parts = split_candidates(chunk);
        assert_eq!(parts.len(), 1);
        assert!(matches!(parts[0], Cow::Borrowed(_)));
        assert_eq!(parts[0], chunk);
    }

    #[test]
    fn test_single_object_is_untouched() {
        assert_eq!(split(r#"{"msg":"x","nested":{"k":1}}"#), vec![r#"{"msg":"x","nested":{"k":1}}"#]);
    }

    #[test]
    fn test_nested_closing_braces_split_at_top_level_boundary() {
        let parts = split(r#"{"a":{"b":1}} {"c":2}"#);
        assert_eq!(parts, vec![r#"{"a":{"b":1}}"#, r#"{"c":2}"#]);
    }

    #[test]
    fn test_string_literal_boundary_is_split() {
        // Known limitation: quoted `}{` is not special-cased.
        let parts = split(r#"{"msg":"a}{b"}"#);
        assert_eq!(parts, vec![r#"{"msg":"a}"#, r#"{b"}"#]);
        assert!(parts.iter().all(|p| serde_json::from_str::<Value>(p).is_err()));
    }

    #[test]
    fn test_text_around_objects_is_kept() {
        let parts = split("prefix {\"a\":1}{\"b\":2} suffix");
        assert_eq!(parts, vec!["prefix {\"a\":1}", "{\"b\":2} suffix"]);
    }
}
