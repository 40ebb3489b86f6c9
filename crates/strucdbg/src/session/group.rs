//! Operation groups: records sharing an `operation_id` within one session.
//!
//! The header summary (first/last message and timestamp, worst severity,
//! member count) rolls forward as members arrive; members are kept in full.

use serde::Serialize;

use crate::parser::{IngestedLog, Severity};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationGroup {
    pub operation_id: String,
    /// Worst severity seen so far; never decreases
    pub severity: Severity,
    /// Members beyond the first
    pub count: usize,
    pub first_message: String,
    pub last_message: String,
    pub first_timestamp: String,
    pub last_timestamp: String,
    #[serde(skip)]
    pub members: Vec<IngestedLog>,
}

impl OperationGroup {
    /// Start a group seeded from its first member.
    pub fn new(operation_id: impl Into<String>, first: IngestedLog) -> Self {
        let record = &first.record;
        Self {
            operation_id: operation_id.into(),
            severity: record.severity,
            count: 0,
            first_message: record.message.clone(),
            last_message: record.message.clone(),
            first_timestamp: record.timestamp.clone(),
            last_timestamp: record.timestamp.clone(),
            members: vec![first],
        }
    }

    /// Add a later member and roll the summary forward.
    pub fn push(&mut self, log: IngestedLog) {
        let record = &log.record;
        if record.severity > self.severity {
            tracing::trace!(
                operation_id = %self.operation_id,
                from = %self.severity,
                to = %record.severity,
                "operation severity escalated"
            );
            self.severity = record.severity;
        }
        self.last_message = record.message.clone();
        self.last_timestamp = record.timestamp.clone();
        self.count += 1;
        self.members.push(log);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
