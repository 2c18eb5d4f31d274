//! Structured diagnostic messages with severity, codes and notes.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// A structured log message produced by the placer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The component tag and message id.
    pub code: DiagnosticCode,
    /// The formatted message.
    pub message: String,
    /// Additional detail lines (e.g. the offending cells of a failed check).
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates a diagnostic with an explicit severity.
    pub fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            notes: Vec::new(),
        }
    }

    /// Creates an error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Creates a warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Creates an informational diagnostic.
    pub fn info(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, message)
    }

    /// Creates a debug diagnostic.
    pub fn debug(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Debug, code, message)
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}
