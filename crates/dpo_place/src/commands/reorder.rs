//! The `ro` command: exhaustive reordering of small windows of cells.

use super::swap::improvement_percent;
use super::{run_passes, CommandArgs, DetailedCommand, PassSummary};
use crate::context::PlacementContext;
use crate::log;
use crate::moves::MoveRecord;
use crate::objective::{DetailedObjective, HpwlObjective};
use crate::segment::SegmentId;
use dpo_common::DpoResult;
use dpo_diagnostics::{Diagnostic, DiagnosticSink};
use dpo_network::{total_hpwl, NodeId};

/// Window size when `-w` is absent.
pub const DEFAULT_WINDOW: usize = 3;

/// Largest window accepted; permutations grow factorially.
pub const MAX_WINDOW: usize = 6;

/// `ro [-p passes] [-t tol] [-w window]`.
///
/// Slides a window over each segment's occupants, tries every order of the
/// cells in it packed from the window's left end and keeps the best order
/// if it strictly reduces HPWL.
#[derive(Debug, Default)]
pub struct ReorderCommand {
    objective: Option<HpwlObjective>,
    records: Vec<MoveRecord>,
    best: Vec<MoveRecord>,
}

impl ReorderCommand {
    /// Creates the command.
    pub fn new() -> Self {
        Self::default()
    }

    fn pass(&mut self, ctx: &mut PlacementContext, window: usize) -> DpoResult<usize> {
        let mut objective = self
            .objective
            .take()
            .unwrap_or_else(|| HpwlObjective::new(ctx.params().skip_nets_larger_than));
        let mut improved = 0;
        let mut cells: Vec<NodeId> = Vec::with_capacity(window);

        for seg in 0..ctx.segments().len() {
            let seg = SegmentId::from_raw(seg as u32);
            let len = ctx.segments().cells_in(seg).len();
            if len < 2 {
                continue;
            }
            let w = window.min(len);
            for start in 0..=len - w {
                cells.clear();
                cells.extend_from_slice(&ctx.segments().cells_in(seg)[start..start + w]);
                if !cells.iter().all(|&c| ctx.is_single_height(c)) {
                    continue;
                }
                if self.best_order(ctx, &mut objective, seg, start, &cells) {
                    ctx.relocate_batch(&self.best)?;
                    improved += 1;
                }
            }
        }
        self.objective = Some(objective);
        Ok(improved)
    }

    /// Finds the best packed order of `cells` (occupants `start..` of `seg`)
    /// and leaves its records in `self.best`. Returns `true` if it strictly
    /// improves HPWL.
    fn best_order(
        &mut self,
        ctx: &PlacementContext,
        objective: &mut HpwlObjective,
        seg: SegmentId,
        start: usize,
        cells: &[NodeId],
    ) -> bool {
        let occupants = ctx.segments().cells_in(seg);
        let before = start.checked_sub(1).map(|i| occupants[i]);
        let after = occupants.get(start + cells.len()).copied();
        let origin = ctx.network.node(cells[0]).left;
        let bottom = ctx.network.node(cells[0]).bottom;

        let mut order: Vec<usize> = (0..cells.len()).collect();
        let mut best_delta = 0.0;
        let mut found = false;
        loop {
            if self.pack(ctx, seg, cells, &order, before, after, origin, bottom) {
                let delta = objective.delta(&ctx.network, &self.records);
                if delta > best_delta {
                    best_delta = delta;
                    found = true;
                    self.best.clear();
                    self.best.extend_from_slice(&self.records);
                }
            }
            if !next_permutation(&mut order) {
                break;
            }
        }
        found
    }

    /// Packs `cells` in `order` from `origin` into `self.records`. Returns
    /// `false` if the order does not fit or breaks a displacement limit.
    #[allow(clippy::too_many_arguments)]
    fn pack(
        &mut self,
        ctx: &PlacementContext,
        seg: SegmentId,
        cells: &[NodeId],
        order: &[usize],
        before: Option<NodeId>,
        after: Option<NodeId>,
        origin: i64,
        bottom: i64,
    ) -> bool {
        self.records.clear();
        let last = cells[order[order.len() - 1]];
        let (_, hi) = ctx.gap_between(last, seg, None, after);
        let mut prev: Option<NodeId> = None;
        let mut x = origin;
        for &i in order {
            let node = cells[i];
            // Packed predecessors have not moved yet, so space from `x`.
            let lo = match prev {
                Some(p) => {
                    let right = ctx.network.node(p).right_edge_type;
                    x + ctx.arch.cell_spacing(right, ctx.network.node(node).left_edge_type)
                }
                None => ctx.gap_between(node, seg, before, None).0.max(x),
            };
            let Some(pos) = ctx.align_pos(node, seg, lo, lo, hi) else {
                return false;
            };
            if !ctx.within_displacement(node, pos, bottom) {
                return false;
            }
            let Some(rec) = ctx.make_record(node, pos, seg) else {
                return false;
            };
            self.records.push(rec);
            x = pos + ctx.network.node(node).width;
            prev = Some(node);
        }
        true
    }
}

impl DetailedCommand for ReorderCommand {
    fn name(&self) -> &'static str {
        "ro"
    }

    fn run(
        &mut self,
        ctx: &mut PlacementContext,
        args: &CommandArgs<'_>,
        sink: &DiagnosticSink,
    ) -> DpoResult<PassSummary> {
        let passes = args.passes(1);
        let tol = args.tolerance(0.01);
        let window = args
            .parse::<usize>("-w")
            .unwrap_or(DEFAULT_WINDOW)
            .clamp(2, MAX_WINDOW);

        ctx.resort_segments();
        let initial = total_hpwl(&ctx.network) as f64;
        let summary = run_passes(passes, tol, initial, |p, hpwl| {
            sink.emit(Diagnostic::info(
                log::code(log::PASS),
                format!("Pass {p} of reordering; hpwl is {hpwl}"),
            ));
            let improved = self.pass(ctx, window)?;
            sink.emit(Diagnostic::debug(
                log::code(log::PASS),
                format!("Reordered {improved} windows of {window} cells"),
            ));
            Ok(total_hpwl(&ctx.network) as f64)
        })?;
        ctx.resort_segments();

        sink.emit(Diagnostic::info(
            log::code(log::INFO),
            format!(
                "End of reordering; hpwl is {}, total imp is {:.2}%",
                summary.final_cost,
                improvement_percent(summary.initial, summary.final_cost)
            ),
        ));
        Ok(summary)
    }
}

/// Rearranges `v` into the next lexicographically greater permutation.
/// Returns `false` (leaving `v` sorted ascending) after the last one.
pub fn next_permutation<T: Ord>(v: &mut [T]) -> bool {
    if v.len() < 2 {
        return false;
    }
    let mut i = v.len() - 1;
    while i > 0 && v[i - 1] >= v[i] {
        i -= 1;
    }
    if i == 0 {
        v.reverse();
        return false;
    }
    let mut j = v.len() - 1;
    while v[j] <= v[i - 1] {
        j -= 1;
    }
    v.swap(i - 1, j);
    v[i..].reverse();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PlacementParams;
    use dpo_arch::{Architecture, Orientation, Rect, Row};
    use dpo_network::{Network, Node};

    #[test]
    fn permutations_in_order() {
        let mut v = vec![1, 2, 3];
        let mut seen = vec![v.clone()];
        while next_permutation(&mut v) {
            seen.push(v.clone());
        }
        assert_eq!(seen.len(), 6);
        assert_eq!(seen[1], vec![1, 3, 2]);
        assert_eq!(seen[5], vec![3, 2, 1]);
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    fn crossed_pair_is_reordered() {
        let rows = vec![Row {
            bottom: 0,
            height: 10,
            site_width: 1,
            min_x: 0,
            num_sites: 100,
            orient: Orientation::N,
        }];
        let arch = Architecture::new(Rect::new(0, 0, 100, 10), rows);
        let mut nw = Network::new();
        let left_pad = nw.add_node(Node::new("pl", 10, 10).at(0, 0));
        let a = nw.add_node(Node::new("a", 10, 10).at(10, 0));
        let b = nw.add_node(Node::new("b", 10, 10).at(20, 0));
        let right_pad = nw.add_node(Node::new("pr", 10, 10).at(30, 0));
        let e = nw.add_edge("b_left");
        nw.add_pin(left_pad, e, 5, 5);
        nw.add_pin(b, e, 5, 5);
        let e = nw.add_edge("a_right");
        nw.add_pin(a, e, 5, 5);
        nw.add_pin(right_pad, e, 5, 5);
        let mut c =
            PlacementContext::new(arch, nw, PlacementParams::default(), &DiagnosticSink::new());
        let before = total_hpwl(&c.network) as f64;

        let t: Vec<String> = vec!["-w".into(), "2".into()];
        let s = ReorderCommand::new()
            .run(&mut c, &CommandArgs::new(&t), &DiagnosticSink::new())
            .unwrap();
        assert!(s.final_cost < before);
        assert_eq!(c.network.node(b).left, 10);
        assert_eq!(c.network.node(a).left, 20);
        let seg = c.segments().segments_of(a)[0];
        assert_eq!(c.segments().cells_in(seg), &[left_pad, b, a, right_pad]);
    }
}
