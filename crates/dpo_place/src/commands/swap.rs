//! The `gs` and `vs` commands.

use super::{run_passes, CommandArgs, DetailedCommand, PassSummary};
use crate::context::PlacementContext;
use crate::generators::{DetailedGenerator, GlobalSwap, VerticalSwap};
use crate::log;
use crate::objective::{DetailedObjective, HpwlObjective};
use dpo_common::DpoResult;
use dpo_diagnostics::{Diagnostic, DiagnosticSink};
use dpo_network::{total_hpwl, NodeId};
use rand::seq::SliceRandom;

/// `gs [-p passes] [-t tol]`: global swap passes.
#[derive(Debug, Default)]
pub struct GlobalSwapCommand {
    generator: GlobalSwap,
}

impl GlobalSwapCommand {
    /// Creates the command.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DetailedCommand for GlobalSwapCommand {
    fn name(&self) -> &'static str {
        "gs"
    }

    fn run(
        &mut self,
        ctx: &mut PlacementContext,
        args: &CommandArgs<'_>,
        sink: &DiagnosticSink,
    ) -> DpoResult<PassSummary> {
        let generator = &mut self.generator;
        let summary = swap_passes(ctx, args, sink, "global swaps", |ctx, node| {
            generator.generate_for(ctx, node)
        })?;
        self.generator.report_stats(sink);
        Ok(summary)
    }
}

/// `vs [-p passes] [-t tol]`: vertical swap passes.
#[derive(Debug, Default)]
pub struct VerticalSwapCommand {
    generator: VerticalSwap,
}

impl VerticalSwapCommand {
    /// Creates the command.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DetailedCommand for VerticalSwapCommand {
    fn name(&self) -> &'static str {
        "vs"
    }

    fn run(
        &mut self,
        ctx: &mut PlacementContext,
        args: &CommandArgs<'_>,
        sink: &DiagnosticSink,
    ) -> DpoResult<PassSummary> {
        let generator = &mut self.generator;
        let summary = swap_passes(ctx, args, sink, "vertical swaps", |ctx, node| {
            generator.generate_for(ctx, node)
        })?;
        self.generator.report_stats(sink);
        Ok(summary)
    }
}

/// Runs greedy passes: every single-height cell, in shuffled order, gets one
/// proposal; a staged move is kept if it does not increase HPWL.
fn swap_passes<G>(
    ctx: &mut PlacementContext,
    args: &CommandArgs<'_>,
    sink: &DiagnosticSink,
    what: &str,
    mut generate: G,
) -> DpoResult<PassSummary>
where
    G: FnMut(&mut PlacementContext, NodeId) -> bool,
{
    let passes = args.passes(1);
    let tol = args.tolerance(0.01);
    let mut objective = HpwlObjective::new(ctx.params().skip_nets_larger_than);
    let mut candidates: Vec<NodeId> = Vec::new();

    ctx.resort_segments();
    let initial = total_hpwl(&ctx.network) as f64;
    let summary = run_passes(passes, tol, initial, |p, hpwl| {
        sink.emit(Diagnostic::info(
            log::code(log::PASS),
            format!("Pass {p} of {what}; hpwl is {hpwl}"),
        ));
        candidates.clear();
        candidates.extend_from_slice(ctx.single_height_cells());
        candidates.shuffle(&mut ctx.rng);
        for &node in &candidates {
            if !generate(ctx, node) {
                continue;
            }
            if objective.delta(&ctx.network, ctx.moves().records()) >= 0.0 {
                ctx.accept_move()?;
            } else {
                ctx.reject_move();
            }
        }
        Ok(total_hpwl(&ctx.network) as f64)
    })?;
    ctx.resort_segments();

    sink.emit(Diagnostic::info(
        log::code(log::INFO),
        format!(
            "End of {what}; hpwl is {}, total imp is {:.2}%",
            summary.final_cost,
            improvement_percent(summary.initial, summary.final_cost)
        ),
    ));
    Ok(summary)
}

/// Relative improvement from `initial` to `current`, in percent.
pub(crate) fn improvement_percent(initial: f64, current: f64) -> f64 {
    if initial == 0.0 {
        0.0
    } else {
        (initial - current) / initial * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PlacementParams;
    use dpo_arch::{Architecture, Orientation, Rect, Row};
    use dpo_network::{Network, Node};

    fn ctx() -> PlacementContext {
        let rows = (0..4)
            .map(|i| Row {
                bottom: i * 10,
                height: 10,
                site_width: 1,
                min_x: 0,
                num_sites: 100,
                orient: Orientation::N,
            })
            .collect();
        let arch = Architecture::new(Rect::new(0, 0, 100, 40), rows);
        let mut nw = Network::new();
        let ids: Vec<_> = [(0, 0), (80, 30), (10, 20), (70, 0), (40, 10)]
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| nw.add_node(Node::new(format!("c{i}"), 8, 10).at(x, y)))
            .collect();
        for w in ids.windows(2) {
            let e = nw.add_edge(format!("n{}", w[0]));
            nw.add_pin(w[0], e, 4, 5);
            nw.add_pin(w[1], e, 4, 5);
        }
        PlacementContext::new(arch, nw, PlacementParams::default(), &DiagnosticSink::new())
    }

    #[test]
    fn global_swap_never_increases_hpwl() {
        let mut c = ctx();
        let before = total_hpwl(&c.network);
        let sink = DiagnosticSink::new();
        let toks: Vec<String> = vec!["-p".into(), "3".into()];
        let s = GlobalSwapCommand::new()
            .run(&mut c, &CommandArgs::new(&toks), &sink)
            .unwrap();
        assert!(s.final_cost <= before as f64);
        assert_eq!(s.final_cost, total_hpwl(&c.network) as f64);
        assert!(s.passes >= 1 && s.passes <= 3);
        let diags = sink.take_all();
        assert!(diags
            .iter()
            .any(|d| d.message.starts_with("Pass 1 of global swaps; hpwl is")));
        assert!(diags.iter().any(|d| d.code.number == log::STATS));
    }

    #[test]
    fn vertical_swap_never_increases_hpwl() {
        let mut c = ctx();
        let before = total_hpwl(&c.network);
        let s = VerticalSwapCommand::new()
            .run(&mut c, &CommandArgs::new(&[]), &DiagnosticSink::new())
            .unwrap();
        assert_eq!(s.passes, 1);
        assert!(s.final_cost <= before as f64);
    }

    #[test]
    fn improvement_percent_handles_zero() {
        assert_eq!(improvement_percent(0.0, 0.0), 0.0);
        assert_eq!(improvement_percent(200.0, 150.0), 25.0);
    }
}
