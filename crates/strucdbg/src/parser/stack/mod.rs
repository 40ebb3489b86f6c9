//! Stack trace parsers: raw trace text (or producer-supplied frame lists)
//! into the canonical exception chain.
//!
//! Malformed lines never fail a parse; they become placeholder frames (Go)
//! or are skipped (Python).

pub mod go;
pub mod python;

pub use go::parse_go_stack;
pub use python::{parse_python_traceback, parse_structured_exceptions};
