use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{finish_record, reject_degenerate};
use crate::parser::stack::parse_go_stack;
use crate::parser::traits::*;

/// Stack field names used by Go loggers (slog + `debug.Stack()`, zap).
const STACK_KEYS: &[&str] = &["stack", "stacktrace"];

/// Parser for Go producers (slog, zap, zerolog).
#[derive(Debug, Default, Clone, Copy)]
pub struct GoParser;

impl RecordParser for GoParser {
    fn parse(&self, fields: FieldSet, received_at: DateTime<Utc>) -> Result<StructuredLogRecord, ParseError> {
        reject_degenerate(&fields)?;

        let (stack, fields) = fields.take_first_where(STACK_KEYS, Value::is_string);
        let exception = stack
            .as_ref()
            .and_then(|taken| taken.value.as_str())
            .and_then(parse_go_stack);

        Ok(finish_record(fields, exception, received_at))
    }

    fn name(&self) -> &'static str {
        "go"
    }
}
