use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use super::model::{ParseError, ProducerLanguage};

/// Why a candidate ended up as raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Not valid JSON
    InvalidJson,
    /// Valid JSON, but a primitive or null
    NotAnObject,
    /// Larger than the configured candidate limit
    TooLarge,
    /// A record parser could not normalize the object
    Declined,
}

impl From<&ParseError> for FallbackReason {
    fn from(err: &ParseError) -> Self {
        match err {
            ParseError::InvalidJson(_) => FallbackReason::InvalidJson,
            ParseError::NotAnObject => FallbackReason::NotAnObject,
            ParseError::TooLarge(_, _) => FallbackReason::TooLarge,
            ParseError::Declined(_) => FallbackReason::Declined,
        }
    }
}

/// Per-parser success counters
#[derive(Debug, Default)]
pub struct ParserCounters {
    pub go: AtomicU64,
    pub python: AtomicU64,
    pub default: AtomicU64,
}

/// Raw-fallback counters by reason
#[derive(Debug, Default)]
pub struct FallbackCounters {
    pub invalid_json: AtomicU64,
    pub not_an_object: AtomicU64,
    pub too_large: AtomicU64,
    pub declined: AtomicU64,
}

/// Ingestion counters.
///
/// All operations use `Ordering::Relaxed`; these are observability numbers
/// and `snapshot()` is not atomic across fields.
#[derive(Debug, Default)]
pub struct IngestMetrics {
    pub events: AtomicU64,
    pub candidates: AtomicU64,
    pub structured: AtomicU64,
    pub raw: AtomicU64,
    pub parsers: ParserCounters,
    pub fallbacks: FallbackCounters,
    pub sessions_started: AtomicU64,
    pub sessions_evicted: AtomicU64,
}

impl IngestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_event(&self, candidates: usize) {
        self.events.fetch_add(1, Ordering::Relaxed);
        self.candidates.fetch_add(candidates as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_structured(&self, language: ProducerLanguage) {
        self.structured.fetch_add(1, Ordering::Relaxed);
        match language {
            ProducerLanguage::Go => self.parsers.go.fetch_add(1, Ordering::Relaxed),
            ProducerLanguage::Python => self.parsers.python.fetch_add(1, Ordering::Relaxed),
            _ => self.parsers.default.fetch_add(1, Ordering::Relaxed),
        };
    }

    #[inline]
    pub fn record_fallback(&self, reason: FallbackReason) {
        self.raw.fetch_add(1, Ordering::Relaxed);
        match reason {
            FallbackReason::InvalidJson => self.fallbacks.invalid_json.fetch_add(1, Ordering::Relaxed),
            FallbackReason::NotAnObject => self.fallbacks.not_an_object.fetch_add(1, Ordering::Relaxed),
            FallbackReason::TooLarge => self.fallbacks.too_large.fetch_add(1, Ordering::Relaxed),
            FallbackReason::Declined => self.fallbacks.declined.fetch_add(1, Ordering::Relaxed),
        };
    }

    pub fn record_session_started(&self) {
        self.sessions_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sessions_evicted(&self, count: usize) {
        self.sessions_evicted.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            events: self.events.load(Ordering::Relaxed),
            candidates: self.candidates.load(Ordering::Relaxed),
            structured: self.structured.load(Ordering::Relaxed),
            raw: self.raw.load(Ordering::Relaxed),
            go_records: self.parsers.go.load(Ordering::Relaxed),
            python_records: self.parsers.python.load(Ordering::Relaxed),
            default_records: self.parsers.default.load(Ordering::Relaxed),
            invalid_json: self.fallbacks.invalid_json.load(Ordering::Relaxed),
            not_an_object: self.fallbacks.not_an_object.load(Ordering::Relaxed),
            too_large: self.fallbacks.too_large.load(Ordering::Relaxed),
            declined: self.fallbacks.declined.load(Ordering::Relaxed),
            sessions_started: self.sessions_started.load(Ordering::Relaxed),
            sessions_evicted: self.sessions_evicted.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub events: u64,
    pub candidates: u64,
    pub structured: u64,
    pub raw: u64,
    pub go_records: u64,
    pub python_records: u64,
    pub default_records: u64,
    pub invalid_json: u64,
    pub not_an_object: u64,
    pub too_large: u64,
    pub declined: u64,
    pub sessions_started: u64,
    pub sessions_evicted: u64,
}
