//! Diagnostic codes: a component tag plus a numeric message id.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The subsystem that produced a diagnostic, determining its tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Component {
    /// The detailed placement optimizer, tagged `DPO`.
    Dpo,
    /// Design loading and validation, tagged `DES`.
    Design,
    /// Configuration handling, tagged `CFG`.
    Config,
}

impl Component {
    /// Returns the tag printed in front of the message id.
    pub fn tag(self) -> &'static str {
        match self {
            Component::Dpo => "DPO",
            Component::Design => "DES",
            Component::Config => "CFG",
        }
    }
}

/// A structured diagnostic code combining a component tag and a numeric id.
///
/// Displayed as the tag, a dash and a zero-padded 4-digit number, e.g.
/// `DPO-0303`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The component that emitted this diagnostic.
    pub component: Component,
    /// The numeric message id within the component.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub fn new(component: Component, number: u16) -> Self {
        Self { component, number }
    }

    /// Shorthand for an optimizer message id.
    pub fn dpo(number: u16) -> Self {
        Self::new(Component::Dpo, number)
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:04}", self.component.tag(), self.number)
    }
}
