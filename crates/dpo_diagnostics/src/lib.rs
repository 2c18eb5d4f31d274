//! Structured logging for the detailed placer.
//!
//! Every message the optimizer produces is a [`Diagnostic`] with a severity, a
//! [`DiagnosticCode`] (component tag plus numeric message id) and a formatted
//! message. The thread-safe [`DiagnosticSink`] accumulates them, dropping
//! anything below its severity threshold, and [`DiagnosticRenderer`]
//! implementations format them for the terminal.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Component, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
