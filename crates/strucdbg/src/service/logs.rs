use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::conf::StrucdbgConfig;
use crate::parser::metrics::IngestMetrics;
use crate::parser::timestamp;
use crate::parser::{detect_language, IngestedLog, Severity, StructuredLogRecord};
use crate::session::SessionRegistry;
use crate::wire::{code_line, InboundEvent, OutputCategory, SinkMessage, WireError};

use super::ingest::IngestionPipeline;

/// Event handler owning all session state.
///
/// Driven by a single loop: one inbound event at a time, each producing the
/// sink messages to forward, in order.
pub struct LogService {
    registry: SessionRegistry,
    pipeline: IngestionPipeline,
    metrics: Arc<IngestMetrics>,
}

impl LogService {
    pub fn new(config: &StrucdbgConfig, metrics: Arc<IngestMetrics>) -> Self {
        Self {
            registry: SessionRegistry::new(
                config.fallback_session_id.clone(),
                config.fallback_session_name.clone(),
                config.retention(),
            ),
            pipeline: IngestionPipeline::new(Arc::clone(&metrics), config.max_candidate_size),
            metrics,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub async fn handle(&mut self, event: InboundEvent) -> Vec<SinkMessage> {
        match event {
            InboundEvent::SessionStarted { session_id, session_name, debugger_type, program } => {
                self.start_session(session_id, session_name, debugger_type.as_deref(), program.as_deref())
            }
            InboundEvent::Output { session_id, output, category } => {
                self.ingest_output(session_id.as_deref(), &output, category.as_ref(), Utc::now())
            }
            InboundEvent::SessionEnded { session_id } => self.end_session(session_id),
            InboundEvent::GetCodeLine { file, line, request_id } => {
                let code = match code_line::requested_line(&line) {
                    Some(line) => code_line::lookup(&file, line).await,
                    None => {
                        tracing::debug!(file = %file, line = %line, "code line request with unusable line number");
                        None
                    }
                };
                vec![SinkMessage::CodeLine { request_id, code }]
            }
            InboundEvent::SinkAttached => self.announce_sessions(),
        }
    }

    pub fn start_session(
        &mut self,
        session_id: String,
        session_name: String,
        debugger_type: Option<&str>,
        program: Option<&str>,
    ) -> Vec<SinkMessage> {
        let language = detect_language(debugger_type, program);
        if !self.registry.start_session(&session_id, &session_name, language) {
            return Vec::new();
        }
        self.metrics.record_session_started();
        vec![SinkMessage::NewSession { session_id, session_name }]
    }

    /// Ingest one output chunk. Every resulting record is stored in the
    /// session it resolves to and forwarded tagged with that session's id.
    pub fn ingest_output(
        &mut self,
        session_id: Option<&str>,
        output: &str,
        category: Option<&OutputCategory>,
        received_at: DateTime<Utc>,
    ) -> Vec<SinkMessage> {
        let language = self.registry.language_of(session_id);
        let logs = self.pipeline.ingest(output, category, language, received_at);
        tracing::debug!(session_id = ?session_id, language = %language, records = logs.len(), "output ingested");

        logs.into_iter()
            .map(|log| {
                let (target, _) = self.registry.append(session_id, log.clone());
                SinkMessage::new_log(log, target)
            })
            .collect()
    }

    /// The sink always hears about the end, even for ids the registry
    /// ignores.
    pub fn end_session(&mut self, session_id: String) -> Vec<SinkMessage> {
        self.registry.end_session(&session_id);
        vec![SinkMessage::SessionEnded { session_id }]
    }

    /// Record an undecodable inbound line as an error entry in the fallback
    /// session.
    pub fn report_decode_error(&mut self, error: &WireError) -> Vec<SinkMessage> {
        tracing::warn!(error = %error, "malformed inbound event");
        let record = StructuredLogRecord::plain_text(
            error.to_string(),
            Severity::Error,
            timestamp::format_iso(Utc::now()),
        );
        let log = IngestedLog::error(record);
        let (target, _) = self.registry.append(None, log.clone());
        vec![SinkMessage::new_log(log, target)]
    }

    /// One `new-session` per live session, in start order.
    pub fn announce_sessions(&self) -> Vec<SinkMessage> {
        self.registry
            .known_sessions()
            .into_iter()
            .map(|(id, name)| SinkMessage::NewSession {
                session_id: id.to_string(),
                session_name: name.to_string(),
            })
            .collect()
    }

    pub fn evict_expired(&mut self) -> Vec<String> {
        let evicted = self.registry.evict_expired();
        if !evicted.is_empty() {
            self.metrics.record_sessions_evicted(evicted.len());
        }
        evicted
    }
}
