//! `dpo improve`: load a design, run a command script, write the result.
//!
//! 1. Resolve settings from flags and `dpo.toml`
//! 2. Load the design and build segments
//! 3. Run the script, the orientation pass and the legality checks
//! 4. Write the optimized design if an output is set
//! 5. Report

use dpo_diagnostics::DiagnosticSink;
use dpo_place::{Design, ImproveReport};

use crate::pipeline::{build_context, render_diagnostics, resolve_settings};
use crate::{GlobalArgs, ImproveArgs, ReportFormat};

/// Runs the `dpo improve` command. Returns exit code 0; legality
/// violations are reported but do not fail the run.
pub fn run(args: &ImproveArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut settings = resolve_settings(args.design.as_deref(), global)?;
    if let Some(ref script) = args.script {
        settings.script = script.clone();
    }
    if let Some(seed) = args.seed {
        settings.params.seed = seed;
    }
    if let Some(ref output) = args.output {
        settings.output = Some(output.into());
    }
    if let Some(format) = args.format {
        settings.format = format;
    }

    if !global.quiet && settings.format == ReportFormat::Text {
        eprintln!("   Optimizing {}", settings.design.display());
    }

    let sink = DiagnosticSink::with_threshold(settings.threshold);
    let mut ctx = build_context(&settings, &sink)?;
    let report = dpo_place::improve(&mut ctx, &settings.script, &sink)?;
    render_diagnostics(&sink, global.color);

    if let Some(ref output) = settings.output {
        let (architecture, network) = ctx.into_parts();
        Design {
            architecture,
            network,
        }
        .save(output)?;
        if !global.quiet && settings.format == ReportFormat::Text {
            eprintln!("      Wrote {}", output.display());
        }
    }

    match settings.format {
        ReportFormat::Text => {
            if !global.quiet {
                print_summary(&report);
            }
        }
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(0)
}

fn print_summary(report: &ImproveReport) {
    for c in &report.commands {
        eprintln!(
            "   {:<8} {} pass(es), {} -> {}",
            c.command, c.summary.passes, c.summary.initial, c.summary.final_cost
        );
    }
    let imp = if report.initial_hpwl > 0 {
        100.0 * (report.initial_hpwl - report.final_hpwl) as f64 / report.initial_hpwl as f64
    } else {
        0.0
    };
    eprintln!(
        "   Result: hpwl {} -> {} ({imp:.2}% better), {} violation(s)",
        report.initial_hpwl,
        report.final_hpwl,
        report.violations()
    );
}
