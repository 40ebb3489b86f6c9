//! Record parsers, one per producer language family.
//!
//! All parsers share one field precedence (see [`crate::parser::fields`]);
//! they differ only in where they look for stack traces.

pub mod default;
pub mod go;
pub mod python;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::parser::fields::{self, FieldSet, MESSAGE_KEYS, OPERATION_KEYS, SEVERITY_KEYS, TIMESTAMP_KEYS};
use crate::parser::model::{ExceptionInfo, ParseError, ProducerLanguage, StructuredLogRecord};
use crate::parser::severity;
use crate::parser::timestamp;
use crate::parser::traits::RecordParser;

pub use default::DefaultParser;
pub use go::GoParser;
pub use python::PythonParser;

static DEFAULT_PARSER: DefaultParser = DefaultParser;
static GO_PARSER: GoParser = GoParser;
static PYTHON_PARSER: PythonParser = PythonParser;

/// Parser for a session's producer language. Languages without a dedicated
/// parser use [`DefaultParser`].
pub fn parser_for(language: ProducerLanguage) -> &'static dyn RecordParser {
    match language {
        ProducerLanguage::Go => &GO_PARSER,
        ProducerLanguage::Python => &PYTHON_PARSER,
        ProducerLanguage::JavaScript
        | ProducerLanguage::Java
        | ProducerLanguage::Rust
        | ProducerLanguage::Unknown => &DEFAULT_PARSER,
    }
}

/// An object with no fields carries nothing to normalize.
pub(crate) fn reject_degenerate(fields: &FieldSet) -> Result<(), ParseError> {
    if fields.is_empty() {
        return Err(ParseError::Declined("empty object".to_string()));
    }
    Ok(())
}

/// Consume severity, message, timestamp and operation id (in that order)
/// and finish the record; whatever is left becomes metadata.
pub(crate) fn finish_record(
    fields: FieldSet,
    exception: Option<Vec<ExceptionInfo>>,
    received_at: DateTime<Utc>,
) -> StructuredLogRecord {
    let (raw_severity, fields) = fields.take_first(SEVERITY_KEYS);
    let severity = severity::normalize(raw_severity.as_ref().map(|t| &t.value));

    let (raw_message, fields) = fields.take_first(MESSAGE_KEYS);
    let message = raw_message
        .map(|t| fields::display_text(&t.value))
        .unwrap_or_default();

    let (raw_time, mut fields) = fields.take_first(TIMESTAMP_KEYS);
    let declared = match raw_time {
        Some(taken) => match timestamp::parse_declared(&taken.value) {
            Some(ts) => Some(ts),
            None => {
                tracing::trace!(key = %taken.key, "unparsable timestamp kept as metadata");
                fields = fields.restore(taken);
                None
            }
        },
        None => None,
    };

    let (raw_operation, fields) = fields.take_first_where(OPERATION_KEYS, is_operation_id);
    let operation_id = raw_operation.map(|t| fields::display_text(&t.value));

    StructuredLogRecord {
        severity,
        message,
        metadata: fields.into_metadata(),
        operation_id,
        exception,
        timestamp: timestamp::format_iso(declared.unwrap_or(received_at)),
    }
}

fn is_operation_id(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.is_empty(),
        Value::Number(_) => true,
        _ => false,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, Utc};
    use serde_json::Value;

    use crate::parser::fields::FieldSet;

    pub fn fields(value: Value) -> FieldSet {
        match value {
            Value::Object(map) => FieldSet::new(map),
            other => panic!("fixture must be an object, got {other}"),
        }
    }

    pub fn received_at() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_769_774_400_000).unwrap()
    }

    pub const RECEIVED_AT_ISO: &str = "2026-01-30T12:00:00.000Z";
}
