//! Wire shapes at both boundaries: events from the output-capture side and
//! messages for the display sink. Both travel as one JSON object per line.

pub mod code_line;
pub mod sink;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parser::{IngestedLog, LogKind, StructuredLogRecord};

pub use sink::SinkWriter;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("Invalid inbound event: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Inbound line is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Failed to encode sink message: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Debug adapter output categories that affect raw-text severity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputCategory {
    #[default]
    Stdout,
    Stderr,
    Console,
    Important,
    Telemetry,
    #[serde(untagged)]
    Other(String),
}

/// Events delivered by the output-capture collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InboundEvent {
    #[serde(rename_all = "camelCase")]
    SessionStarted {
        session_id: String,
        session_name: String,
        #[serde(default)]
        debugger_type: Option<String>,
        #[serde(default)]
        program: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Output {
        #[serde(default)]
        session_id: Option<String>,
        output: String,
        #[serde(default)]
        category: Option<OutputCategory>,
    },
    #[serde(rename_all = "camelCase")]
    SessionEnded { session_id: String },
    #[serde(rename_all = "camelCase")]
    GetCodeLine {
        file: String,
        /// Passed through as sent; anything but a positive integer gets `code: null`
        #[serde(default)]
        line: serde_json::Value,
        request_id: serde_json::Value,
    },
    /// The display sink (re)attached and needs the live sessions announced
    SinkAttached,
}

impl InboundEvent {
    pub fn decode(line: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(line)?)
    }
}

/// `content` of a `new-log` message: the record for structured logs, plain
/// text otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LogContent {
    Structured(StructuredLogRecord),
    Text(String),
}

/// Messages for the display sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SinkMessage {
    #[serde(rename_all = "camelCase")]
    NewSession { session_id: String, session_name: String },
    #[serde(rename_all = "camelCase")]
    SessionEnded { session_id: String },
    #[serde(rename_all = "camelCase")]
    NewLog {
        log_type: LogKind,
        content: LogContent,
        session_id: String,
    },
    #[serde(rename_all = "camelCase")]
    CodeLine {
        request_id: serde_json::Value,
        code: Option<String>,
    },
}

impl SinkMessage {
    pub fn new_log(log: IngestedLog, session_id: String) -> Self {
        let content = match log.kind {
            LogKind::Structured => LogContent::Structured(log.record),
            LogKind::Raw | LogKind::Error => LogContent::Text(log.record.message),
        };
        SinkMessage::NewLog {
            log_type: log.kind,
            content,
            session_id,
        }
    }

    pub fn encode(&self) -> Result<String, WireError> {
        serde_json::to_string(self).map_err(|e| WireError::Encode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Severity;
    use serde_json::json;

    #[test]
    fn test_decode_output_event() {
        let event = InboundEvent::decode(
            r#"{"type":"output","sessionId":"s1","output":"{\"msg\":\"hi\"}\n","category":"stderr"}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            InboundEvent::Output {
                session_id: Some("s1".to_string()),
                output: "{\"msg\":\"hi\"}\n".to_string(),
                category: Some(OutputCategory::Stderr),
            }
        );
    }

    #[test]
    fn test_decode_unknown_category_and_missing_session() {
        let event = InboundEvent::decode(r#"{"type":"output","output":"x","category":"custom"}"#).unwrap();
        match event {
            InboundEvent::Output { session_id, category, .. } => {
                assert_eq!(session_id, None);
                assert_eq!(category, Some(OutputCategory::Other("custom".to_string())));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_decode_session_started() {
        let event = InboundEvent::decode(
            r#"{"type":"session-started","sessionId":"s1","sessionName":"Launch","debuggerType":"go"}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            InboundEvent::SessionStarted {
                session_id: "s1".to_string(),
                session_name: "Launch".to_string(),
                debugger_type: Some("go".to_string()),
                program: None,
            }
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(InboundEvent::decode("not json"), Err(WireError::Decode(_))));
        assert!(InboundEvent::decode(r#"{"type":"teleport"}"#).is_err());
    }

    #[test]
    fn test_decode_code_line_and_attach() {
        let event = InboundEvent::decode(
            r#"{"type":"get-code-line","file":"/app/main.go","line":12,"requestId":"r-1"}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            InboundEvent::GetCodeLine {
                file: "/app/main.go".to_string(),
                line: json!(12),
                request_id: json!("r-1"),
            }
        );
        assert_eq!(InboundEvent::decode(r#"{"type":"sink-attached"}"#).unwrap(), InboundEvent::SinkAttached);
    }

    #[test]
    fn test_code_line_request_with_odd_line_still_decodes() {
        for raw in [r#"-1"#, r#"3.5"#, r#""7""#] {
            let line = format!(r#"{{"type":"get-code-line","file":"/x.go","line":{raw},"requestId":5}}"#);
            assert!(
                matches!(InboundEvent::decode(&line), Ok(InboundEvent::GetCodeLine { .. })),
                "line {raw}"
            );
        }
    }

    #[test]
    fn test_structured_new_log_shape() {
        let record = StructuredLogRecord::plain_text("hi", Severity::Error, "2026-01-30T12:00:00.000Z".into());
        let msg = SinkMessage::new_log(IngestedLog::structured(record), "s1".to_string());
        let json: serde_json::Value = serde_json::from_str(&msg.encode().unwrap()).unwrap();

        assert_eq!(json["type"], "new-log");
        assert_eq!(json["logType"], "structured");
        assert_eq!(json["sessionId"], "s1");
        assert_eq!(json["content"]["severity"], "error");
        assert_eq!(json["content"]["message"], "hi");
    }

    #[test]
    fn test_raw_new_log_content_is_text() {
        let record = StructuredLogRecord::plain_text("plain", Severity::Info, String::new());
        let msg = SinkMessage::new_log(IngestedLog::raw(record), "s1".to_string());
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["logType"], "raw");
        assert_eq!(json["content"], "plain");
    }

    #[test]
    fn test_session_and_code_line_shapes() {
        let json = serde_json::to_value(SinkMessage::NewSession {
            session_id: "s1".into(),
            session_name: "Launch".into(),
        })
        .unwrap();
        assert_eq!(json, json!({"type": "new-session", "sessionId": "s1", "sessionName": "Launch"}));

        let json = serde_json::to_value(SinkMessage::CodeLine { request_id: json!(7), code: None }).unwrap();
        assert_eq!(json, json!({"type": "code-line", "requestId": 7, "code": null}));
    }
}
