//! Service module: turns inbound events into sink messages.

pub mod ingest;
pub mod logs;

pub use ingest::{category_severity, IngestionPipeline};
pub use logs::LogService;
