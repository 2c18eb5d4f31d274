//! Detailed placement improvement over legalized rows.
//!
//! A [`PlacementContext`] owns the architecture, the netlist and the row
//! [`segment`]s the cells occupy. Move [`generators`] stage moves through the
//! legality [`manager`], [`objective`]s price them, and the [`commands`]
//! decide what to keep. [`improve`] runs a command script and finishes with
//! the legality [`checks`].

#![warn(missing_docs)]

pub mod assignment;
pub mod checks;
pub mod commands;
pub mod context;
pub mod design;
pub mod generators;
pub mod improve;
pub mod log;
pub mod manager;
pub mod moves;
pub mod objective;
pub mod range;
pub mod segment;

pub use checks::CheckReport;
pub use commands::{CommandArgs, CommandRegistry, DetailedCommand, PassSummary, StopRule};
pub use context::{PlacementContext, PlacementParams};
pub use design::{Design, DesignError};
pub use generators::{DetailedGenerator, GeneratorStats};
pub use improve::{improve, parse_script, CommandOutcome, ImproveReport, ScriptCommand};
pub use moves::{MoveList, MoveRecord};
pub use objective::{DetailedObjective, DisplacementObjective, HpwlObjective};
pub use segment::{Segment, SegmentId, SegmentTable};
