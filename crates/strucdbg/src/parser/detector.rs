//! Producer language detection: debugger type → program path → unknown.
//!
//! Runs once when a session starts; the result is fixed for the session.

use super::model::ProducerLanguage;

/// Resolve the producer language for a new debug session.
///
/// Priority chain (highest → lowest):
/// 1. Debugger type (`go`, `delve`, `debugpy`, `pwa-node`, `codelldb`, ...)
/// 2. Program path extension (`.go`, `.py`)
/// 3. [`ProducerLanguage::Unknown`]
pub fn detect_language(debugger_type: Option<&str>, program: Option<&str>) -> ProducerLanguage {
    if let Some(language) = debugger_type.and_then(language_from_debugger_type) {
        return language;
    }
    program
        .and_then(language_from_program)
        .unwrap_or(ProducerLanguage::Unknown)
}

fn language_from_debugger_type(debugger_type: &str) -> Option<ProducerLanguage> {
    let kind = debugger_type.trim().to_ascii_lowercase();
    if kind.is_empty() {
        return None;
    }

    // "javascript" contains "java": check JavaScript first
    if ["go", "delve", "dlv"].iter().any(|t| kind.contains(t)) {
        Some(ProducerLanguage::Go)
    } else if kind.contains("python") || kind == "debugpy" {
        Some(ProducerLanguage::Python)
    } else if ["node", "javascript", "js"].iter().any(|t| kind.contains(t)) {
        Some(ProducerLanguage::JavaScript)
    } else if kind.contains("java") {
        Some(ProducerLanguage::Java)
    } else if ["rust", "codelldb", "lldb"].iter().any(|t| kind.contains(t)) {
        Some(ProducerLanguage::Rust)
    } else {
        None
    }
}

fn language_from_program(program: &str) -> Option<ProducerLanguage> {
    let program = program.trim();
    if program.ends_with(".go") {
        Some(ProducerLanguage::Go)
    } else if program.ends_with(".py") {
        Some(ProducerLanguage::Python)
    } else {
        None
    }
}
