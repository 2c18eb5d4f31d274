//! Diagnostic rendering for human-readable terminal output.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics one header line per message plus indented notes.
///
/// Produces output like:
/// ```text
/// info[DPO-0303]: Pass 1 of global swaps; hpwl is 1.234000e+05
/// error[DPO-0314]: Overlap check failed with 1 violation(s)
///    = note: cells 4 and 9 overlap in segment 12
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, severity: Severity) -> String {
        if !self.color {
            return severity.to_string();
        }
        let ansi = match severity {
            Severity::Debug => "2",
            Severity::Info => "36",
            Severity::Warning => "33",
            Severity::Error => "1;31",
        };
        format!("\x1b[{ansi}m{severity}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = format!(
            "{}[{}]: {}\n",
            self.paint(diag.severity),
            diag.code,
            diag.message
        );
        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        out
    }
}
