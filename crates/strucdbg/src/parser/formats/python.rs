use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{finish_record, reject_degenerate};
use crate::parser::stack::{parse_python_traceback, parse_structured_exceptions};
use crate::parser::traits::*;

const EXCEPTION_KEYS: &[&str] = &["exception"];

/// Parser for Python producers (structlog, python-json-logger).
///
/// `exception` may hold a formatted traceback string or structlog's
/// `dict_tracebacks` list.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonParser;

impl RecordParser for PythonParser {
    fn parse(&self, fields: FieldSet, received_at: DateTime<Utc>) -> Result<StructuredLogRecord, ParseError> {
        reject_degenerate(&fields)?;

        let (raw_exception, fields) = fields.take_first_where(EXCEPTION_KEYS, |v| v.is_string() || v.is_array());
        let exception = match raw_exception.map(|t| t.value) {
            Some(Value::String(text)) => parse_python_traceback(&text),
            Some(Value::Array(items)) => parse_structured_exceptions(&items)?,
            _ => None,
        };

        Ok(finish_record(fields, exception, received_at))
    }

    fn name(&self) -> &'static str {
        "python"
    }
}
