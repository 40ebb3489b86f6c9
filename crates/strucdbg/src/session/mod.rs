//! Session module: per-session history, operation grouping and the
//! ACTIVE → ENDED → EVICTED lifecycle.

pub mod group;
pub mod registry;

pub use group::OperationGroup;
pub use registry::{Routed, Session, SessionEntry, SessionRegistry, SessionState};
