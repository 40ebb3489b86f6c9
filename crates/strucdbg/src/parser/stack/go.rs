//! Go runtime stack dumps (`debug.Stack()`, panics, zap `stacktrace`).
//!
//! ```text
//! goroutine 1 [running]:
//! runtime/debug.Stack()
//!         /usr/local/go/src/runtime/debug/stack.go:26 +0x64
//! main.main()
//!         /tmp/main.go:50 +0xf60
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::model::{ExceptionInfo, StackFrame};

pub const GO_EXCEPTION_TYPE: &str = "GoStack";

/// `path:line` with an optional ` +0xOFFSET` suffix.
static FILE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*):(\d+)(?:\s+\+0x[0-9a-fA-F]+)?$").unwrap());

/// Parse a Go stack dump into a single exception. Returns `None` for empty text.
///
/// Each function line is paired with the tab-indented location line below it.
/// A function line without a usable location still yields a frame at
/// `<unknown>:0`.
pub fn parse_go_stack(stack: &str) -> Option<Vec<ExceptionInfo>> {
    if stack.is_empty() {
        return None;
    }

    let lines: Vec<&str> = stack.lines().collect();
    let mut idx = lines.iter().position(|l| !l.trim().is_empty()).unwrap_or(lines.len());

    let header = lines.get(idx).map(|l| l.trim()).unwrap_or("goroutine");
    if header.starts_with("goroutine") {
        idx += 1;
    }

    let mut frames = Vec::new();
    while idx < lines.len() {
        let func = lines[idx].trim();
        if func.is_empty() {
            idx += 1;
            continue;
        }

        let location = lines
            .get(idx + 1)
            .filter(|next| next.starts_with('\t'))
            .and_then(|next| parse_location(next.trim()));

        match location {
            Some((filename, lineno)) => {
                frames.push(StackFrame::new(filename, lineno, func));
                idx += 2;
            }
            None => {
                tracing::trace!(function = func, "go stack: no location line, using placeholder");
                frames.push(StackFrame::unlocated(func));
                idx += 1;
            }
        }
    }

    Some(vec![ExceptionInfo {
        exc_type: GO_EXCEPTION_TYPE.to_string(),
        exc_value: header.to_string(),
        is_cause: false,
        frames,
    }])
}

fn parse_location(line: &str) -> Option<(&str, u32)> {
    let caps = FILE_LINE.captures(line)?;
    let filename = caps.get(1)?.as_str();
    let lineno = caps.get(2)?.as_str().parse().ok()?;
    Some((filename, lineno))
}
