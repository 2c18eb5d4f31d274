//! The command script runner.
//!
//! A script is a list of commands separated by `;`, each a name followed by
//! its flags, e.g. `mis -p 10 -t 0.005; gs -p 10; vs -p 10; ro -p 10`.

use crate::checks::CheckReport;
use crate::commands::{CommandArgs, CommandRegistry, PassSummary};
use crate::context::PlacementContext;
use crate::log;
use dpo_common::DpoResult;
use dpo_diagnostics::{Diagnostic, DiagnosticSink};
use dpo_network::total_hpwl;
use serde::Serialize;

/// One command of a script with its tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptCommand {
    /// Command name.
    pub name: String,
    /// Flags following the name.
    pub args: Vec<String>,
}

/// Result of one script command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandOutcome {
    /// Command name.
    pub command: String,
    /// Flags it ran with.
    pub args: Vec<String>,
    /// Passes and cost change.
    pub summary: PassSummary,
}

/// Everything `improve` did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImproveReport {
    /// Total HPWL before the script.
    pub initial_hpwl: i64,
    /// Total HPWL after the script and the final orientation pass.
    pub final_hpwl: i64,
    /// Outcome of every recognized command, in order.
    pub commands: Vec<CommandOutcome>,
    /// Final legality checks.
    pub checks: Vec<CheckReport>,
}

impl ImproveReport {
    /// Total violations over all checks.
    pub fn violations(&self) -> usize {
        self.checks.iter().map(|c| c.violations).sum()
    }
}

/// Splits a script into commands; empty commands are dropped.
pub fn parse_script(script: &str) -> Vec<ScriptCommand> {
    let spaced = script.replace(';', " ; ");
    let mut out = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for token in spaced.split_whitespace().chain(std::iter::once(";")) {
        if token != ";" {
            current.push(token.to_string());
            continue;
        }
        let mut tokens = std::mem::take(&mut current).into_iter();
        if let Some(name) = tokens.next() {
            out.push(ScriptCommand {
                name,
                args: tokens.collect(),
            });
        }
    }
    out
}

/// Runs `script` over the context, then normalizes orientations and runs
/// the legality checks.
///
/// Unknown commands are logged and skipped.
pub fn improve(
    ctx: &mut PlacementContext,
    script: &str,
    sink: &DiagnosticSink,
) -> DpoResult<ImproveReport> {
    let mut registry = CommandRegistry::standard();
    let initial_hpwl = total_hpwl(&ctx.network);
    let mut commands = Vec::new();

    for cmd in parse_script(script) {
        let Some(command) = registry.get_mut(&cmd.name) else {
            sink.emit(Diagnostic::warning(
                log::code(log::UNKNOWN_COMMAND),
                format!("Unknown command {}, skipping", cmd.name),
            ));
            continue;
        };
        sink.emit(Diagnostic::info(
            log::code(log::COMMAND),
            format!("Running command {} {}", cmd.name, cmd.args.join(" "))
                .trim_end()
                .to_string(),
        ));
        let summary = command.run(ctx, &CommandArgs::new(&cmd.args), sink)?;
        commands.push(CommandOutcome {
            command: cmd.name,
            args: cmd.args,
            summary,
        });
    }

    let force = ["-f".to_string()];
    if let Some(orient) = registry.get_mut("orient") {
        orient.run(ctx, &CommandArgs::new(&force), sink)?;
    }
    let checks = ctx.run_checks(sink);
    let final_hpwl = total_hpwl(&ctx.network);
    sink.emit(Diagnostic::info(
        log::code(log::INFO),
        format!("Detailed improvement: hpwl {initial_hpwl} -> {final_hpwl}"),
    ));

    Ok(ImproveReport {
        initial_hpwl,
        final_hpwl,
        commands,
        checks,
    })
}
