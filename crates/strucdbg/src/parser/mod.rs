/// Debugger-output parsing and normalization module
///
/// Turns raw output chunks into canonical structured log records.
///
/// # Architecture
///
/// - `splitter.rs`: Splits a chunk into candidate JSON objects
/// - `traits.rs`: Record parser capability
/// - `formats/`: Default, Go and Python record parsers
/// - `stack/`: Go and Python stack trace parsers
/// - `severity.rs`: Severity normalization
/// - `fields.rs`: Consume-and-return-remainder field access
/// - `detector.rs`: Producer language detection per session
/// - `metrics.rs`: Ingestion counters
///
/// # Tolerance
///
/// No input is fatal: anything that cannot be normalized degrades to a raw
/// text record carrying the original text.

pub mod traits;
pub mod model;
pub mod severity;
pub mod splitter;
pub mod fields;
pub mod timestamp;
pub mod detector;
pub mod metrics;
pub mod formats;
pub mod stack;

// Re-export commonly used types
pub use traits::RecordParser;
pub use model::{
    ExceptionInfo, IngestedLog, LogKind, ParseError, ProducerLanguage, Severity, StackFrame,
    StructuredLogRecord,
};
pub use detector::detect_language;
pub use splitter::split_candidates;

// Constants
pub const MAX_CANDIDATE_SIZE: usize = 1_048_576; // 1MB
