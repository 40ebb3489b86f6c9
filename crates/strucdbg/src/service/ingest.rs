//! Ingestion pipeline: one output chunk in, one record per candidate out.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::parser::fields::FieldSet;
use crate::parser::formats;
use crate::parser::metrics::{FallbackReason, IngestMetrics};
use crate::parser::timestamp;
use crate::parser::{
    split_candidates, IngestedLog, ParseError, ProducerLanguage, Severity, StructuredLogRecord,
};
use crate::wire::OutputCategory;

/// Severity for raw text, from the output category the adapter reported.
pub fn category_severity(category: Option<&OutputCategory>) -> Severity {
    match category {
        Some(OutputCategory::Stderr) => Severity::Error,
        Some(OutputCategory::Important) => Severity::Warning,
        Some(OutputCategory::Telemetry) => Severity::Debug,
        _ => Severity::Info,
    }
}

pub struct IngestionPipeline {
    metrics: Arc<IngestMetrics>,
    max_candidate_size: usize,
}

impl IngestionPipeline {
    pub fn new(metrics: Arc<IngestMetrics>, max_candidate_size: usize) -> Self {
        Self { metrics, max_candidate_size }
    }

    /// Normalize every candidate in `output`, in order. Candidates that are
    /// blank after trimming produce nothing; everything else produces exactly
    /// one record (raw text when it cannot be parsed).
    pub fn ingest(
        &self,
        output: &str,
        category: Option<&OutputCategory>,
        language: ProducerLanguage,
        received_at: DateTime<Utc>,
    ) -> Vec<IngestedLog> {
        let split = split_candidates(output);
        let candidates: Vec<&str> = split
            .iter()
            .map(|candidate| candidate.trim())
            .filter(|candidate| !candidate.is_empty())
            .collect();
        self.metrics.record_event(candidates.len());

        candidates
            .into_iter()
            .map(|candidate| match self.parse_candidate(candidate, language, received_at) {
                Ok(record) => {
                    self.metrics.record_structured(language);
                    IngestedLog::structured(record)
                }
                Err(e) => {
                    tracing::trace!(language = %language, error = %e, "candidate kept as raw text");
                    self.metrics.record_fallback(FallbackReason::from(&e));
                    IngestedLog::raw(StructuredLogRecord::plain_text(
                        candidate,
                        category_severity(category),
                        timestamp::format_iso(received_at),
                    ))
                }
            })
            .collect()
    }

    fn parse_candidate(
        &self,
        candidate: &str,
        language: ProducerLanguage,
        received_at: DateTime<Utc>,
    ) -> Result<StructuredLogRecord, ParseError> {
        if candidate.len() > self.max_candidate_size {
            return Err(ParseError::TooLarge(candidate.len(), self.max_candidate_size));
        }

        let value: Value =
            serde_json::from_str(candidate).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
        let Value::Object(map) = value else {
            return Err(ParseError::NotAnObject);
        };

        formats::parser_for(language).parse(FieldSet::from(map), received_at)
    }
}
