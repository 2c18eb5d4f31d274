//! Vertical swap: move a cell one or two rows toward its optimal region.

use super::global_swap::target_point;
use super::{stage_move_or_swap, DetailedGenerator, GeneratorStats};
use crate::context::PlacementContext;
use crate::range::OptimalRegion;
use dpo_network::NodeId;
use rand::seq::SliceRandom;

/// Rows tried above or below the current one.
const ROW_REACH: usize = 2;

/// Like [`GlobalSwap`](super::GlobalSwap), but only searches the rows next
/// to the cell's current row, in the direction of its optimal region.
#[derive(Debug, Clone, Default)]
pub struct VerticalSwap {
    region: OptimalRegion,
    stats: GeneratorStats,
}

impl VerticalSwap {
    /// Creates the generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a move or swap of `node` into a neighbouring row.
    pub fn generate_for(&mut self, ctx: &mut PlacementContext, node: NodeId) -> bool {
        self.stats.attempts += 1;
        if !ctx.is_single_height(node) {
            return false;
        }
        let Some((x, y)) = target_point(&mut self.region, ctx, node) else {
            return false;
        };
        let Some(cur_row) = ctx.arch.row_at(ctx.network.node(node).bottom) else {
            return false;
        };
        let Some(target_row) = ctx.arch.find_closest_row(y) else {
            return false;
        };
        if target_row == cur_row {
            return false;
        }

        for step in 1..=ROW_REACH {
            let row = if target_row > cur_row {
                cur_row + step
            } else {
                match cur_row.checked_sub(step) {
                    Some(r) => r,
                    None => break,
                }
            };
            if row.abs_diff(cur_row) > target_row.abs_diff(cur_row) {
                break;
            }
            let r = &ctx.arch.rows[row];
            let (bottom, xj) = (r.bottom, x.clamp(r.min_x, r.max_x()));
            let Some(seg) = ctx.segments().find_in_row(row, xj) else {
                continue;
            };
            if ctx.segments().segment(seg).region != ctx.network.node(node).region {
                continue;
            }
            if stage_move_or_swap(ctx, &mut self.stats, node, xj, bottom, seg, true) {
                return true;
            }
        }
        false
    }
}

impl DetailedGenerator for VerticalSwap {
    fn name(&self) -> &'static str {
        "vs"
    }

    fn generate(&mut self, ctx: &mut PlacementContext, candidates: &[NodeId]) -> bool {
        match candidates.choose(&mut ctx.rng) {
            Some(&node) => self.generate_for(ctx, node),
            None => false,
        }
    }

    fn stats(&self) -> GeneratorStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PlacementParams;
    use dpo_arch::{Architecture, Orientation, Rect, Row};
    use dpo_diagnostics::DiagnosticSink;
    use dpo_network::{Network, Node};

    fn ctx(b_row: i64) -> PlacementContext {
        let rows = (0..6)
            .map(|i| Row {
                bottom: i * 10,
                height: 10,
                site_width: 1,
                min_x: 0,
                num_sites: 100,
                orient: Orientation::N,
            })
            .collect();
        let arch = Architecture::new(Rect::new(0, 0, 100, 60), rows);
        let mut nw = Network::new();
        let a = nw.add_node(Node::new("a", 10, 10).at(20, 0));
        let b = nw.add_node(Node::new("b", 10, 10).at(40, b_row * 10));
        let e = nw.add_edge("ab");
        nw.add_pin(a, e, 0, 0);
        nw.add_pin(b, e, 0, 0);
        PlacementContext::new(arch, nw, PlacementParams::default(), &DiagnosticSink::new())
    }

    #[test]
    fn moves_at_most_two_rows() {
        let mut c = ctx(5);
        let mut vs = VerticalSwap::new();
        assert!(vs.generate_for(&mut c, NodeId::from_raw(0)));
        let rec = c.moves().records()[0];
        assert_eq!((rec.new_left, rec.new_bottom), (40, 10));
    }

    #[test]
    fn same_row_target_is_skipped() {
        let mut c = ctx(0);
        let mut vs = VerticalSwap::new();
        assert!(!vs.generate_for(&mut c, NodeId::from_raw(0)));
        assert!(c.moves().is_empty());
    }
}
