//! Thread-safe diagnostic accumulator with a severity threshold.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// A thread-safe accumulator for diagnostics emitted while optimizing.
///
/// Diagnostics below the sink's threshold are dropped on arrival. Logging is
/// best-effort: emitting never fails, and a poisoned lock is recovered rather
/// than propagated. The error count is tracked atomically.
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    error_count: AtomicUsize,
    threshold: Severity,
}

impl DiagnosticSink {
    /// Creates a new empty sink that keeps everything from `Info` upward.
    pub fn new() -> Self {
        Self::with_threshold(Severity::Info)
    }

    /// Creates a new empty sink that keeps diagnostics at or above `threshold`.
    pub fn with_threshold(threshold: Severity) -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            error_count: AtomicUsize::new(0),
            threshold,
        }
    }

    /// Returns the minimum severity this sink keeps.
    pub fn threshold(&self) -> Severity {
        self.threshold
    }

    /// Emits a diagnostic into the sink.
    ///
    /// Errors are always counted, even when the threshold would drop them.
    pub fn emit(&self, diag: Diagnostic) {
        if diag.severity == Severity::Error {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
        if diag.severity < self.threshold {
            return;
        }
        self.lock().push(diag);
    }

    /// Returns `true` if any error-severity diagnostics have been emitted.
    pub fn has_errors(&self) -> bool {
        self.error_count.load(Ordering::Relaxed) > 0
    }

    /// Returns the number of error-severity diagnostics emitted so far.
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Takes all accumulated diagnostics, leaving the sink empty.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    /// Returns a snapshot of all accumulated diagnostics without draining.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}
