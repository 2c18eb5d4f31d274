//! Script commands and the pass loop they share.
//!
//! Every command parses its own flags from the tokens following its name,
//! runs up to `-p` passes and stops early once the relative change of its
//! cost between two passes falls below `-t`.

pub mod mis;
pub mod orient;
pub mod random_improver;
pub mod reorder;
pub mod swap;

pub use mis::MisCommand;
pub use orient::OrientCommand;
pub use random_improver::RandomImprover;
pub use reorder::{next_permutation, ReorderCommand};
pub use swap::{GlobalSwapCommand, VerticalSwapCommand};

use crate::context::PlacementContext;
use dpo_common::DpoResult;
use dpo_diagnostics::DiagnosticSink;
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;

/// Smallest tolerance a command accepts.
pub const MIN_TOLERANCE: f64 = 0.01;

/// Flags following a command name.
#[derive(Debug, Clone, Copy)]
pub struct CommandArgs<'a> {
    tokens: &'a [String],
}

impl<'a> CommandArgs<'a> {
    /// Wraps the tokens after the command name.
    pub fn new(tokens: &'a [String]) -> Self {
        Self { tokens }
    }

    /// The token following `flag`, if both are present.
    pub fn value(&self, flag: &str) -> Option<&'a str> {
        let at = self.tokens.iter().position(|t| t == flag)?;
        self.tokens.get(at + 1).map(String::as_str)
    }

    /// Returns `true` if `flag` appears.
    pub fn has(&self, flag: &str) -> bool {
        self.tokens.iter().any(|t| t == flag)
    }

    /// The value of `flag` parsed as `T`; unparsable values count as absent.
    pub fn parse<T: FromStr>(&self, flag: &str) -> Option<T> {
        self.value(flag)?.parse().ok()
    }

    /// `-p`, at least 1.
    pub fn passes(&self, default: usize) -> usize {
        self.parse::<i64>("-p").unwrap_or(default as i64).max(1) as usize
    }

    /// `-t`, at least [`MIN_TOLERANCE`].
    pub fn tolerance(&self, default: f64) -> f64 {
        self.parse::<f64>("-t").unwrap_or(default).max(MIN_TOLERANCE)
    }
}

/// Outcome of one command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PassSummary {
    /// Passes actually run.
    pub passes: usize,
    /// Cost before the first pass.
    pub initial: f64,
    /// Cost after the last pass.
    #[serde(rename = "final")]
    pub final_cost: f64,
}

/// When a pass loop considers its relative improvement too small to go on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopRule {
    /// Stop when `|curr - last| / last < tol`.
    Below,
    /// Stop when `|curr - last| / last <= tol`.
    AtOrBelow,
}

impl StopRule {
    fn stops(self, last: f64, curr: f64, tol: f64) -> bool {
        if last == 0.0 {
            return true;
        }
        let ratio = (curr - last).abs() / last;
        match self {
            StopRule::Below => ratio < tol,
            StopRule::AtOrBelow => ratio <= tol,
        }
    }
}

/// Runs `pass` up to `passes` times.
///
/// `pass` receives the 1-based pass number and the cost before the pass and
/// returns the cost after it. The loop stops when the previous cost is zero
/// or `|curr - last| / last < tol`.
pub fn run_passes<F>(passes: usize, tol: f64, initial: f64, pass: F) -> DpoResult<PassSummary>
where
    F: FnMut(usize, f64) -> DpoResult<f64>,
{
    run_passes_with(StopRule::Below, passes, tol, initial, pass)
}

/// [`run_passes`] with an explicit stop rule.
pub fn run_passes_with<F>(
    rule: StopRule,
    passes: usize,
    tol: f64,
    initial: f64,
    mut pass: F,
) -> DpoResult<PassSummary>
where
    F: FnMut(usize, f64) -> DpoResult<f64>,
{
    let mut curr = initial;
    let mut done = 0;
    for p in 1..=passes {
        let last = curr;
        curr = pass(p, last)?;
        done = p;
        if rule.stops(last, curr, tol) {
            break;
        }
    }
    Ok(PassSummary {
        passes: done,
        initial,
        final_cost: curr,
    })
}

/// A script command.
pub trait DetailedCommand {
    /// Name used in scripts.
    fn name(&self) -> &'static str;

    /// Runs the command with its flags.
    fn run(
        &mut self,
        ctx: &mut PlacementContext,
        args: &CommandArgs<'_>,
        sink: &DiagnosticSink,
    ) -> DpoResult<PassSummary>;
}

/// Command instances by name.
pub struct CommandRegistry {
    commands: HashMap<&'static str, Box<dyn DetailedCommand>>,
}

impl CommandRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// The six standard commands: `mis`, `gs`, `vs`, `ro`, `orient`, `default`.
    pub fn standard() -> Self {
        let mut reg = Self::new();
        reg.register(Box::new(MisCommand::new()));
        reg.register(Box::new(GlobalSwapCommand::new()));
        reg.register(Box::new(VerticalSwapCommand::new()));
        reg.register(Box::new(ReorderCommand::new()));
        reg.register(Box::new(OrientCommand::new()));
        reg.register(Box::new(RandomImprover::new()));
        reg
    }

    /// Adds or replaces a command under its own name.
    pub fn register(&mut self, command: Box<dyn DetailedCommand>) {
        self.commands.insert(command.name(), command);
    }

    /// The command registered under `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn DetailedCommand + 'static)> {
        self.commands.get_mut(name).map(|c| c.as_mut())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.commands.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn flags_are_parsed_and_floored() {
        let t = toks("-p 0 -t 0.001 -w 4 -d");
        let a = CommandArgs::new(&t);
        assert_eq!(a.passes(5), 1);
        assert_eq!(a.tolerance(0.5), 0.01);
        assert_eq!(a.parse::<usize>("-w"), Some(4));
        assert!(a.has("-d"));
        assert!(!a.has("-f"));

        let t = toks("-p 7 -t 0.2 -x");
        let a = CommandArgs::new(&t);
        assert_eq!(a.passes(1), 7);
        assert_eq!(a.tolerance(0.01), 0.2);
        assert_eq!(a.value("-x"), None);
    }

    #[test]
    fn defaults_when_absent() {
        let a = CommandArgs::new(&[]);
        assert_eq!(a.passes(3), 3);
        assert_eq!(a.tolerance(0.005), 0.01);
    }

    #[test]
    fn pass_loop_stops_below_tolerance() {
        let costs = [990.0, 985.05, 980.0];
        let summary = run_passes(10, 0.01, 1000.0, |p, _| Ok(costs[p - 1])).unwrap();
        assert_eq!(summary.passes, 2);
        assert_eq!(summary.final_cost, 985.05);
        assert_eq!(summary.initial, 1000.0);
    }

    #[test]
    fn inclusive_rule_stops_on_exact_tolerance() {
        let costs = [900.0, 891.0, 880.0, 879.0];
        let strict = run_passes(10, 0.01, 1000.0, |p, _| Ok(costs[p - 1])).unwrap();
        assert_eq!(strict.passes, 4);
        let inclusive =
            run_passes_with(StopRule::AtOrBelow, 10, 0.01, 1000.0, |p, _| Ok(costs[p - 1]))
                .unwrap();
        assert_eq!(inclusive.passes, 2);
        assert_eq!(inclusive.final_cost, 891.0);
    }

    #[test]
    fn pass_loop_stops_at_zero_and_at_limit() {
        let s = run_passes(10, 0.01, 0.0, |_, _| Ok(0.0)).unwrap();
        assert_eq!(s.passes, 1);
        let s = run_passes(3, 0.01, 1000.0, |_, last| Ok(last * 0.5)).unwrap();
        assert_eq!(s.passes, 3);
        assert_eq!(s.final_cost, 125.0);
    }

    #[test]
    fn pass_errors_propagate() {
        let r = run_passes(3, 0.01, 10.0, |_, _| {
            Err(dpo_common::InternalError::new("broken segment"))
        });
        assert!(r.is_err());
    }

    #[test]
    fn standard_registry() {
        let mut reg = CommandRegistry::standard();
        assert_eq!(reg.names(), vec!["default", "gs", "mis", "orient", "ro", "vs"]);
        assert!(reg.get_mut("gs").is_some());
        assert!(reg.get_mut("abu").is_none());
    }
}
