use chrono::{DateTime, Utc};

use super::{finish_record, reject_degenerate};
use crate::parser::traits::*;

/// Language-agnostic parser: severity, message, time and operation id only.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultParser;

impl RecordParser for DefaultParser {
    fn parse(&self, fields: FieldSet, received_at: DateTime<Utc>) -> Result<StructuredLogRecord, ParseError> {
        reject_degenerate(&fields)?;
        Ok(finish_record(fields, None, received_at))
    }

    fn name(&self) -> &'static str {
        "default"
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::parser::model::Severity;
    use serde_json::json;

    #[test]
    fn test_text_only_object() {
        let record = DefaultParser.parse(fields(json!({"text": "hello"})), received_at()).unwrap();
        assert_eq!(record.severity, Severity::Info);
        assert_eq!(record.message, "hello");
        assert_eq!(record.timestamp, RECEIVED_AT_ISO);
        assert!(record.metadata.is_empty());
        assert!(record.exception.is_none());
    }

    #[test]
    fn test_message_preference_order() {
        let record = DefaultParser
            .parse(fields(json!({"msgstr": "e", "text": "d", "event": "c", "msg": "b"})), received_at())
            .unwrap();
        assert_eq!(record.message, "b");
        assert_eq!(record.metadata.len(), 3);
        assert!(record.metadata.contains_key("event"));
        assert!(!record.metadata.contains_key("msg"));
    }

    #[test]
    fn test_levelname_and_numeric_levels() {
        let record = DefaultParser
            .parse(fields(json!({"levelname": "CRITICAL", "message": "x"})), received_at())
            .unwrap();
        assert_eq!(record.severity, Severity::Critical);

        let record = DefaultParser.parse(fields(json!({"level": 30, "msg": "x"})), received_at()).unwrap();
        assert_eq!(record.severity, Severity::Warning);
    }

    #[test]
    fn test_stack_fields_are_plain_metadata() {
        let record = DefaultParser
            .parse(fields(json!({"msg": "x", "stack": "goroutine 1 [running]:"})), received_at())
            .unwrap();
        assert!(record.exception.is_none());
        assert_eq!(record.metadata.get("stack"), Some(&json!("goroutine 1 [running]:")));
    }

    #[test]
    fn test_empty_object_declines() {
        let result = DefaultParser.parse(fields(json!({})), received_at());
        assert!(matches!(result, Err(ParseError::Declined(_))));
    }
}
