// Domain-driven module structure for strucdbg.

// Core infrastructure
pub mod conf;
pub mod parser;
pub mod state;
pub mod wire;

// Domain modules
pub mod runtime;
pub mod service;
pub mod session;
