//! The `default` command: random improvement with a mix of generators.

use super::swap::improvement_percent;
use super::{run_passes, CommandArgs, DetailedCommand, PassSummary};
use crate::context::PlacementContext;
use crate::generators::{generator_by_name, DetailedGenerator};
use crate::log;
use crate::objective::{objective_by_name, DetailedObjective};
use dpo_common::DpoResult;
use dpo_diagnostics::{Diagnostic, DiagnosticSink};
use rand::seq::SliceRandom;
use rand::Rng;

/// Generators used when `-gen` is absent.
pub const DEFAULT_GENERATORS: &str = "rng:disp:gs:vs";

/// Moves attempted per candidate when `-f` is absent.
pub const DEFAULT_MOVES_PER_CANDIDATE: f64 = 3.0;

/// Largest allowed gap between the tracked and the recomputed cost.
const COST_CHECK_TOLERANCE: f64 = 1.0e-3;

/// `default [-p passes] [-t tol] [-f moves] [-gen a:b] [-obj a:b]`.
///
/// Each pass makes `ceil(f * candidates)` attempts, each with a generator
/// picked uniformly at random. A staged move is accepted if the summed cost
/// of all objectives does not increase.
#[derive(Debug, Default)]
pub struct RandomImprover;

impl RandomImprover {
    /// Creates the command.
    pub fn new() -> Self {
        Self
    }
}

impl DetailedCommand for RandomImprover {
    fn name(&self) -> &'static str {
        "default"
    }

    fn run(
        &mut self,
        ctx: &mut PlacementContext,
        args: &CommandArgs<'_>,
        sink: &DiagnosticSink,
    ) -> DpoResult<PassSummary> {
        let passes = args.passes(1);
        let tol = args.tolerance(0.01);
        let moves_per_candidate = args
            .parse::<f64>("-f")
            .filter(|f| *f > 0.0)
            .unwrap_or(DEFAULT_MOVES_PER_CANDIDATE);

        let mut generators: Vec<Box<dyn DetailedGenerator>> = Vec::new();
        for name in args.value("-gen").unwrap_or(DEFAULT_GENERATORS).split(':') {
            match generator_by_name(name) {
                Some(g) => generators.push(g),
                None => warn_unknown(sink, "generator", name),
            }
        }
        let skip = ctx.params().skip_nets_larger_than;
        let mut objectives: Vec<Box<dyn DetailedObjective>> = Vec::new();
        for name in args.value("-obj").unwrap_or("hpwl").split(':') {
            match objective_by_name(name, skip) {
                Some(o) => objectives.push(o),
                None => warn_unknown(sink, "objective", name),
            }
        }
        if objectives.is_empty() {
            objectives.extend(objective_by_name("hpwl", skip));
        }

        let initial = total_cost(&mut objectives, ctx);
        if generators.is_empty() {
            sink.emit(Diagnostic::warning(
                log::code(log::INFO),
                "Random improvement needs at least one generator; skipping",
            ));
            return Ok(PassSummary {
                passes: 0,
                initial,
                final_cost: initial,
            });
        }

        ctx.resort_segments();
        let summary = run_passes(passes, tol, initial, |p, cost| {
            sink.emit(Diagnostic::info(
                log::code(log::PASS),
                format!("Pass {p} of random improvement; cost is {cost}"),
            ));
            improve_pass(ctx, &mut generators, &mut objectives, moves_per_candidate, sink)
        })?;
        ctx.resort_segments();

        sink.emit(Diagnostic::info(
            log::code(log::INFO),
            format!(
                "End of random improvement; cost is {}, total imp is {:.2}%",
                summary.final_cost,
                improvement_percent(summary.initial, summary.final_cost)
            ),
        ));
        Ok(summary)
    }
}

fn warn_unknown(sink: &DiagnosticSink, what: &str, name: &str) {
    sink.emit(Diagnostic::warning(
        log::code(log::UNKNOWN_COMMAND),
        format!("Unknown {what} '{name}' ignored"),
    ));
}

fn total_cost(objectives: &mut [Box<dyn DetailedObjective>], ctx: &PlacementContext) -> f64 {
    objectives.iter_mut().map(|o| o.curr(&ctx.network)).sum()
}

/// One pass; returns the recomputed total cost.
fn improve_pass(
    ctx: &mut PlacementContext,
    generators: &mut [Box<dyn DetailedGenerator>],
    objectives: &mut [Box<dyn DetailedObjective>],
    moves_per_candidate: f64,
    sink: &DiagnosticSink,
) -> DpoResult<f64> {
    let mut candidates = ctx.single_height_cells().to_vec();
    if candidates.is_empty() {
        return Ok(total_cost(objectives, ctx));
    }
    candidates.shuffle(&mut ctx.rng);
    for g in generators.iter_mut() {
        g.init(ctx);
    }

    let mut tracked: Vec<f64> = objectives.iter_mut().map(|o| o.curr(&ctx.network)).collect();
    let mut deltas = vec![0.0; objectives.len()];
    let max_attempts = (moves_per_candidate * candidates.len() as f64).ceil() as usize;
    for _ in 0..max_attempts {
        let g = ctx.rng.gen_range(0..generators.len());
        if !generators[g].generate(ctx, &candidates) {
            continue;
        }
        for (d, o) in deltas.iter_mut().zip(objectives.iter_mut()) {
            *d = o.delta(&ctx.network, ctx.moves().records());
        }
        if deltas.iter().sum::<f64>() >= 0.0 {
            ctx.accept_move()?;
            for (t, d) in tracked.iter_mut().zip(&deltas) {
                *t -= d;
            }
        } else {
            ctx.reject_move();
        }
    }

    for g in generators.iter() {
        g.report_stats(sink);
    }

    let mut total = 0.0;
    for (o, t) in objectives.iter_mut().zip(&tracked) {
        let scratch = o.curr(&ctx.network);
        if (scratch - t).abs() > COST_CHECK_TOLERANCE {
            sink.emit(Diagnostic::warning(
                log::code(log::COST_CHECK),
                format!(
                    "Objective {} mismatch: scratch {scratch:.2}, incremental {t:.2}",
                    o.name()
                ),
            ));
        }
        total += scratch;
    }
    Ok(total)
}
