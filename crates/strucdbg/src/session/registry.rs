use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::parser::{IngestedLog, ProducerLanguage};

use super::group::OperationGroup;

/// Lifecycle of a session. Eviction removes the session from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting records
    Active,
    /// End notification received; history retained until the retention window passes
    Ended { at: Instant },
}

/// One top-level entry of a session's history.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEntry {
    /// A record without an operation id
    Record(IngestedLog),
    /// Position of an operation group (placed where its first member arrived)
    Operation(String),
}

/// Where an appended record ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    Standalone,
    NewOperation,
    Operation,
}

#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub language: ProducerLanguage,
    state: SessionState,
    entries: Vec<SessionEntry>,
    groups: HashMap<String, OperationGroup>,
    permanent: bool,
}

impl Session {
    fn new(id: String, name: String, language: ProducerLanguage, permanent: bool) -> Self {
        Self {
            id,
            name,
            language,
            state: SessionState::Active,
            entries: Vec::new(),
            groups: HashMap::new(),
            permanent,
        }
    }

    /// Route a record: grouped by operation id when it has one, standalone otherwise.
    pub fn append(&mut self, log: IngestedLog) -> Routed {
        let Some(operation_id) = log.record.operation().map(str::to_owned) else {
            self.entries.push(SessionEntry::Record(log));
            return Routed::Standalone;
        };

        match self.groups.get_mut(&operation_id) {
            Some(group) => {
                group.push(log);
                Routed::Operation
            }
            None => {
                self.entries.push(SessionEntry::Operation(operation_id.clone()));
                self.groups
                    .insert(operation_id.clone(), OperationGroup::new(operation_id, log));
                Routed::NewOperation
            }
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn is_permanent(&self) -> bool {
        self.permanent
    }

    pub fn entries(&self) -> &[SessionEntry] {
        &self.entries
    }

    pub fn group(&self, operation_id: &str) -> Option<&OperationGroup> {
        self.groups.get(operation_id)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total records held, grouped or not.
    pub fn record_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match entry {
                SessionEntry::Record(_) => 1,
                SessionEntry::Operation(id) => self.groups.get(id).map_or(0, OperationGroup::len),
            })
            .sum()
    }

    fn is_expired(&self, now: Instant, retention: Duration) -> bool {
        match self.state {
            SessionState::Ended { at } => !self.permanent && now.saturating_duration_since(at) >= retention,
            SessionState::Active => false,
        }
    }
}

/// All live sessions plus the permanent fallback session.
///
/// Owned by a single event loop; every mutation comes from an event tagged
/// with the session's id, in arrival order.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: HashMap<String, Session>,
    /// Session ids in start order
    order: Vec<String>,
    fallback_id: String,
    retention: Duration,
}

impl SessionRegistry {
    pub fn new(fallback_id: impl Into<String>, fallback_name: impl Into<String>, retention: Duration) -> Self {
        let fallback_id = fallback_id.into();
        let fallback = Session::new(fallback_id.clone(), fallback_name.into(), ProducerLanguage::Unknown, true);

        let mut sessions = HashMap::new();
        sessions.insert(fallback_id.clone(), fallback);

        Self {
            sessions,
            order: vec![fallback_id.clone()],
            fallback_id,
            retention,
        }
    }

    pub fn fallback_id(&self) -> &str {
        &self.fallback_id
    }

    /// Register a new session. Returns false (and keeps the existing session
    /// and its language) when the id is already known.
    pub fn start_session(&mut self, id: &str, name: &str, language: ProducerLanguage) -> bool {
        if self.sessions.contains_key(id) {
            tracing::warn!(session_id = %id, "session already registered, keeping existing state");
            return false;
        }

        tracing::info!(session_id = %id, session_name = %name, language = %language, "session started");
        self.sessions
            .insert(id.to_string(), Session::new(id.to_string(), name.to_string(), language, false));
        self.order.push(id.to_string());
        true
    }

    pub fn end_session(&mut self, id: &str) -> bool {
        self.end_session_at(id, Instant::now())
    }

    /// Mark a session ended. Unknown ids and the fallback session are ignored.
    pub fn end_session_at(&mut self, id: &str, at: Instant) -> bool {
        match self.sessions.get_mut(id) {
            Some(session) if session.permanent => {
                tracing::debug!(session_id = %id, "ignoring end of permanent session");
                false
            }
            Some(session) => {
                if session.is_active() {
                    session.state = SessionState::Ended { at };
                    tracing::info!(
                        session_id = %id,
                        records = session.record_count(),
                        operations = session.group_count(),
                        "session ended"
                    );
                }
                true
            }
            None => {
                tracing::warn!(session_id = %id, "end notification for unknown session");
                false
            }
        }
    }

    /// Id that records tagged with `id` are routed to.
    pub fn resolve<'a>(&'a self, id: Option<&'a str>) -> &'a str {
        match id {
            Some(id) if self.sessions.contains_key(id) => id,
            _ => &self.fallback_id,
        }
    }

    /// Producer language of the session records tagged with `id` land in.
    pub fn language_of(&self, id: Option<&str>) -> ProducerLanguage {
        self.sessions
            .get(self.resolve(id))
            .map_or(ProducerLanguage::Unknown, |s| s.language)
    }

    /// Append a record, routing unknown or missing ids to the fallback
    /// session. Returns the id of the session that received it.
    pub fn append(&mut self, id: Option<&str>, log: IngestedLog) -> (String, Routed) {
        let target = self.resolve(id).to_string();
        if id != Some(target.as_str()) {
            tracing::debug!(requested = ?id, fallback = %target, "routing record to fallback session");
        }

        let routed = match self.sessions.get_mut(&target) {
            Some(session) => session.append(log),
            // The fallback session is never removed
            None => Routed::Standalone,
        };
        (target, routed)
    }

    pub fn evict_expired(&mut self) -> Vec<String> {
        self.evict_expired_at(Instant::now())
    }

    /// Drop ended sessions whose retention window has passed.
    pub fn evict_expired_at(&mut self, now: Instant) -> Vec<String> {
        let retention = self.retention;
        let expired: Vec<String> = self
            .order
            .iter()
            .filter(|id| self.sessions.get(*id).is_some_and(|s| s.is_expired(now, retention)))
            .cloned()
            .collect();

        for id in &expired {
            self.sessions.remove(id);
            tracing::info!(session_id = %id, "session evicted");
        }
        self.order.retain(|id| !expired.contains(id));
        expired
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn fallback(&self) -> Option<&Session> {
        self.sessions.get(&self.fallback_id)
    }

    /// Sessions not yet evicted, in start order (for announcing to a sink
    /// that attaches late). The fallback session is not included.
    pub fn known_sessions(&self) -> Vec<(&str, &str)> {
        self.order
            .iter()
            .filter_map(|id| self.sessions.get(id))
            .filter(|s| !s.permanent)
            .map(|s| (s.id.as_str(), s.name.as_str()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
