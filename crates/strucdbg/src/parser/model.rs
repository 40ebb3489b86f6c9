use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Canonical severity scale. Variant order is the escalation order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }

    /// Ordinal rank, 0 (debug) through 4 (critical).
    pub fn rank(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ParseError;

    /// Strict token lookup; use [`super::severity::normalize`] for lenient input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::severity::match_token(s)
            .ok_or_else(|| ParseError::Declined(format!("unrecognized severity token: {}", s)))
    }
}

/// Language of the process whose output is being ingested.
///
/// Resolved once when a session starts and never re-inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProducerLanguage {
    Go,
    Python,
    JavaScript,
    Java,
    Rust,
    Unknown,
}

impl ProducerLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProducerLanguage::Go => "go",
            ProducerLanguage::Python => "python",
            ProducerLanguage::JavaScript => "javascript",
            ProducerLanguage::Java => "java",
            ProducerLanguage::Rust => "rust",
            ProducerLanguage::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProducerLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One frame of a stack trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackFrame {
    pub filename: String,
    pub lineno: u32,
    pub name: String,
    #[serde(default)]
    pub locals: Map<String, Value>,
}

impl StackFrame {
    pub const UNKNOWN_FILE: &'static str = "<unknown>";

    pub fn new(filename: impl Into<String>, lineno: u32, name: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            lineno,
            name: name.into(),
            locals: Map::new(),
        }
    }

    /// Frame for a function whose source location could not be recovered.
    pub fn unlocated(name: impl Into<String>) -> Self {
        Self::new(Self::UNKNOWN_FILE, 0, name)
    }
}

/// One exception in a chain. `is_cause` marks an exception that caused the
/// next one in the sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExceptionInfo {
    pub exc_type: String,
    pub exc_value: String,
    pub is_cause: bool,
    pub frames: Vec<StackFrame>,
}

impl ExceptionInfo {
    pub const UNKNOWN_TYPE: &'static str = "UnknownException";
}

/// Canonical structured log record.
///
/// Immutable once built; raw-text fallbacks use the same shape with empty
/// metadata and no exception.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredLogRecord {
    pub severity: Severity,

    /// Always present, may be empty
    pub message: String,

    /// Leftover producer fields not consumed by a parser
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    /// Outermost-cause-first, as produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<Vec<ExceptionInfo>>,

    /// ISO-8601, always populated
    pub timestamp: String,
}

impl StructuredLogRecord {
    /// Build a plain-text record (no field extraction).
    pub fn plain_text(message: impl Into<String>, severity: Severity, timestamp: String) -> Self {
        Self {
            severity,
            message: message.into(),
            metadata: Map::new(),
            operation_id: None,
            exception: None,
            timestamp,
        }
    }

    /// Operation id if present and non-empty.
    pub fn operation(&self) -> Option<&str> {
        self.operation_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// How a record reached the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    /// Fields extracted by a record parser
    Structured,
    /// Text that could not be normalized
    Raw,
    /// Diagnostic produced by the ingestion side itself
    Error,
}

impl LogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Structured => "structured",
            LogKind::Raw => "raw",
            LogKind::Error => "error",
        }
    }
}

/// A record together with the path it took through ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedLog {
    pub kind: LogKind,
    pub record: StructuredLogRecord,
}

impl IngestedLog {
    pub fn structured(record: StructuredLogRecord) -> Self {
        Self { kind: LogKind::Structured, record }
    }

    pub fn raw(record: StructuredLogRecord) -> Self {
        Self { kind: LogKind::Raw, record }
    }

    pub fn error(record: StructuredLogRecord) -> Self {
        Self { kind: LogKind::Error, record }
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("JSON value is not an object")]
    NotAnObject,

    #[error("Candidate too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Parser declined: {0}")]
    Declined(String),
}
