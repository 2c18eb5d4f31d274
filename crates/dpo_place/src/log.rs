//! Message ids for the optimizer's diagnostics.

use dpo_diagnostics::DiagnosticCode;

/// Generic informational message.
pub const INFO: u16 = 300;
/// A script command is starting.
pub const COMMAND: u16 = 301;
/// A script command was not recognized.
pub const UNKNOWN_COMMAND: u16 = 302;
/// Per-pass progress of an improvement command.
pub const PASS: u16 = 303;
/// Move generator statistics.
pub const STATS: u16 = 304;
/// Scratch cost recomputation after a random improvement pass.
pub const COST_CHECK: u16 = 305;
/// Segment construction summary.
pub const SEGMENTS: u16 = 306;
/// A movable cell could not be put in any segment.
pub const UNASSIGNED: u16 = 307;
/// Region assignment check.
pub const CHECK_REGION: u16 = 311;
/// Row alignment check.
pub const CHECK_ROW: u16 = 312;
/// Site alignment check.
pub const CHECK_SITE: u16 = 313;
/// Overlap check.
pub const CHECK_OVERLAP: u16 = 314;
/// Edge spacing check.
pub const CHECK_SPACING: u16 = 315;
/// Orientation pass summary.
pub const ORIENT: u16 = 320;

/// Builds an optimizer diagnostic code.
pub fn code(number: u16) -> DiagnosticCode {
    DiagnosticCode::dpo(number)
}
