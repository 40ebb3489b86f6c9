//! Source-line lookup for stack frame display.
//!
//! A pass-through file read: the sink asks for `file:line`, gets back the
//! line with leading whitespace removed, or `None`.

use std::path::Path;

use serde_json::Value;

/// Line number from a request, if it is an integer in `1..=u32::MAX`.
pub fn requested_line(line: &Value) -> Option<u32> {
    line.as_u64()
        .filter(|n| *n >= 1)
        .and_then(|n| u32::try_from(n).ok())
}

/// Read line `line` (1-based) of `file`.
///
/// Unreadable files and out-of-range lines yield `None`; I/O errors are
/// logged, never propagated.
pub async fn lookup(file: impl AsRef<Path>, line: u32) -> Option<String> {
    let path = file.as_ref();
    let index = usize::try_from(line).ok()?.checked_sub(1)?;

    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) => {
            tracing::warn!(file = %path.display(), line, error = %e, "code line lookup failed");
            return None;
        }
    };

    contents
        .lines()
        .nth(index)
        .map(|text| text.trim_start().to_string())
}
