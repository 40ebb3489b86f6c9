//! Python tracebacks, as text or as structlog's structured exception list.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::parser::model::{ExceptionInfo, ParseError, StackFrame};

pub const PYTHON_EXCEPTION_TYPE: &str = "PythonTraceback";
const DEFAULT_FRAME_NAME: &str = "<module>";

/// `  File "/path/to/file.py", line 10, in main`
static FRAME_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*File "(?P<file>[^"]*)", line (?P<line>\d+)(?:, in (?P<name>.+))?\s*$"#).unwrap()
});

/// Separators Python prints between chained tracebacks.
const CHAIN_SEPARATORS: &[&str] = &[
    "The above exception was the direct cause of the following exception:",
    "During handling of the above exception, another exception occurred:",
];

/// Parse a text traceback. Returns `None` for empty text.
///
/// Chained tracebacks yield one exception per segment, in the order printed;
/// every segment but the last is marked as a cause.
pub fn parse_python_traceback(text: &str) -> Option<Vec<ExceptionInfo>> {
    if text.trim().is_empty() {
        return None;
    }

    let mut segments: Vec<Vec<&str>> = vec![Vec::new()];
    for line in text.lines() {
        if CHAIN_SEPARATORS.contains(&line.trim()) {
            segments.push(Vec::new());
        } else if let Some(current) = segments.last_mut() {
            current.push(line);
        }
    }
    segments.retain(|segment| segment.iter().any(|l| !l.trim().is_empty()));
    if segments.is_empty() {
        return None;
    }

    let last = segments.len().saturating_sub(1);
    let chain = segments
        .iter()
        .enumerate()
        .map(|(idx, segment)| parse_segment(segment, idx < last))
        .collect();
    Some(chain)
}

fn parse_segment(lines: &[&str], is_cause: bool) -> ExceptionInfo {
    let mut idx = lines.iter().position(|l| !l.trim().is_empty()).unwrap_or(lines.len());
    if lines.get(idx).is_some_and(|l| l.trim_start().starts_with("Traceback")) {
        idx += 1;
    }

    let mut frames = Vec::new();
    while idx < lines.len() {
        let Some(caps) = FRAME_LINE.captures(lines[idx]) else {
            idx += 1;
            continue;
        };

        let filename = caps.name("file").map_or(StackFrame::UNKNOWN_FILE, |m| m.as_str());
        let lineno = caps.name("line").and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
        let name = caps.name("name").map_or(DEFAULT_FRAME_NAME, |m| m.as_str().trim());
        frames.push(StackFrame::new(filename, lineno, name));
        idx += 1;

        // Optional indented source line
        if lines
            .get(idx)
            .is_some_and(|next| is_indented(next) && !FRAME_LINE.is_match(next))
        {
            idx += 1;
        }
    }

    let exc_value = lines
        .iter()
        .rev()
        .map(|l| l.trim())
        .find(|l| !l.is_empty())
        .unwrap_or_default();

    ExceptionInfo {
        exc_type: PYTHON_EXCEPTION_TYPE.to_string(),
        exc_value: exc_value.to_string(),
        is_cause,
        frames,
    }
}

fn is_indented(line: &str) -> bool {
    line.starts_with(' ') || line.starts_with('\t')
}

/// Validate a producer-supplied exception list (structlog `dict_tracebacks`).
///
/// Missing fields get defaults. A non-object element makes the whole list
/// unusable; an empty list yields `Ok(None)`.
pub fn parse_structured_exceptions(items: &[Value]) -> Result<Option<Vec<ExceptionInfo>>, ParseError> {
    let mut chain = Vec::with_capacity(items.len());
    for item in items {
        let obj = item.as_object().ok_or_else(|| {
            ParseError::Declined("exception list contains a non-object element".to_string())
        })?;
        chain.push(exception_from_object(obj));
    }

    if chain.is_empty() {
        Ok(None)
    } else {
        Ok(Some(chain))
    }
}

fn exception_from_object(obj: &Map<String, Value>) -> ExceptionInfo {
    let frames: Vec<StackFrame> = obj
        .get("frames")
        .and_then(Value::as_array)
        .map(|frames| {
            frames
                .iter()
                .map(|frame| match frame.as_object() {
                    Some(obj) => frame_from_object(obj),
                    None => StackFrame::new(StackFrame::UNKNOWN_FILE, 0, DEFAULT_FRAME_NAME),
                })
                .collect()
        })
        .unwrap_or_default();

    ExceptionInfo {
        exc_type: non_empty_str(obj.get("exc_type"))
            .unwrap_or(ExceptionInfo::UNKNOWN_TYPE)
            .to_string(),
        exc_value: obj
            .get("exc_value")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        is_cause: obj.get("is_cause").and_then(Value::as_bool).unwrap_or(false),
        frames,
    }
}

fn frame_from_object(obj: &Map<String, Value>) -> StackFrame {
    let lineno = obj
        .get("lineno")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0);

    StackFrame {
        filename: non_empty_str(obj.get("filename"))
            .unwrap_or(StackFrame::UNKNOWN_FILE)
            .to_string(),
        lineno,
        name: non_empty_str(obj.get("name")).unwrap_or(DEFAULT_FRAME_NAME).to_string(),
        locals: obj
            .get("locals")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
