use chrono::{DateTime, Utc};

pub use super::fields::FieldSet;
pub use super::model::{ParseError, ProducerLanguage, StructuredLogRecord};

/// Producer-specific normalization of one decoded JSON object.
pub trait RecordParser: Send + Sync {
    /// Build a record from the object's fields, or decline with
    /// [`ParseError::Declined`] when the shape cannot be normalized.
    /// `received_at` stands in for a missing or unparsable declared time.
    fn parse(&self, fields: FieldSet, received_at: DateTime<Utc>) -> Result<StructuredLogRecord, ParseError>;

    fn name(&self) -> &'static str;
}
