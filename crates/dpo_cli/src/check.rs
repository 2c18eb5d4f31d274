//! `dpo check`: run the five legality checks on a design as loaded.

use dpo_diagnostics::DiagnosticSink;

use crate::pipeline::{build_context, render_diagnostics, resolve_settings};
use crate::{DesignArg, GlobalArgs};

/// Runs the `dpo check` command. Returns exit code 1 when any check finds
/// violations.
pub fn run(args: &DesignArg, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let settings = resolve_settings(args.design.as_deref(), global)?;
    let sink = DiagnosticSink::with_threshold(settings.threshold);
    let ctx = build_context(&settings, &sink)?;
    let reports = ctx.run_checks(&sink);
    render_diagnostics(&sink, global.color);

    let violations: usize = reports.iter().map(|r| r.violations).sum();
    if !global.quiet {
        for r in &reports {
            eprintln!("   {:<8} {} violation(s)", r.name, r.violations);
        }
    }
    Ok(if violations > 0 { 1 } else { 0 })
}
