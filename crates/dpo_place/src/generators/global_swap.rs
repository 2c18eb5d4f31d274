//! Global swap: move a cell toward the median of its connections.

use super::{locate, stage_move_or_swap, DetailedGenerator, GeneratorStats};
use crate::context::PlacementContext;
use crate::range::{clip_to_window, OptimalRegion};
use dpo_network::NodeId;
use rand::seq::SliceRandom;

/// Targets the center of a cell's optimal region, anywhere on the die
/// within the displacement window.
#[derive(Debug, Clone, Default)]
pub struct GlobalSwap {
    region: OptimalRegion,
    stats: GeneratorStats,
}

impl GlobalSwap {
    /// Creates the generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a move or swap of `node` toward its optimal region.
    ///
    /// Returns `false` when the node already sits in its region, has no
    /// eligible connections, or no legal destination exists there.
    pub fn generate_for(&mut self, ctx: &mut PlacementContext, node: NodeId) -> bool {
        self.stats.attempts += 1;
        if !ctx.is_single_height(node) {
            return false;
        }
        let Some((x, y)) = target_point(&mut self.region, ctx, node) else {
            return false;
        };
        let Some((bottom, seg)) = locate(ctx, node, x, y) else {
            return false;
        };
        stage_move_or_swap(ctx, &mut self.stats, node, x, bottom, seg, true)
    }
}

impl DetailedGenerator for GlobalSwap {
    fn name(&self) -> &'static str {
        "gs"
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

/// Floored center of `node`'s optimal region clipped to the displacement
/// window, or `None` if the node is already inside its region.
pub(crate) fn target_point(
    region: &mut OptimalRegion,
    ctx: &PlacementContext,
    node: NodeId,
) -> Option<(i64, i64)> {
    let rect = region.compute(ctx, node)?;
    let n = ctx.network.node(node);
    if rect.contains_pt(n.left, n.bottom) {
        return None;
    }
    let (dx, dy) = ctx.max_displacement();
    let clipped = clip_to_window(&rect, n.left, n.bottom, dx, dy);
    Some((clipped.center_x().floor() as i64, clipped.center_y().floor() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PlacementParams;
    use dpo_arch::{Architecture, Orientation, Rect, Row};
    use dpo_diagnostics::DiagnosticSink;
    use dpo_network::{Network, Node};

    fn ctx() -> PlacementContext {
        let rows = (0..3)
            .map(|i| Row {
                bottom: i * 10,
                height: 10,
                site_width: 1,
                min_x: 0,
                num_sites: 100,
                orient: Orientation::N,
            })
            .collect();
        let arch = Architecture::new(Rect::new(0, 0, 100, 30), rows);
        let mut nw = Network::new();
        let a = nw.add_node(Node::new("a", 10, 10).at(0, 0));
        let b = nw.add_node(Node::new("b", 10, 10).at(60, 20));
        let e = nw.add_edge("ab");
        nw.add_pin(a, e, 10, 0);
        nw.add_pin(b, e, 0, 0);
        PlacementContext::new(arch, nw, PlacementParams::default(), &DiagnosticSink::new())
    }

    #[test]
    fn moves_cell_next_to_its_neighbour() {
        let mut c = ctx();
        let mut gs = GlobalSwap::new();
        let a = NodeId::from_raw(0);
        assert!(gs.generate_for(&mut c, a));
        let rec = c.moves().records()[0];
        assert_eq!((rec.new_left, rec.new_bottom), (50, 20));
        assert_eq!(gs.stats().moves, 1);
        c.accept_move().unwrap();
    }

    #[test]
    fn cell_in_its_region_stays() {
        let mut c = ctx();
        let mut gs = GlobalSwap::new();
        let a = NodeId::from_raw(0);
        assert!(gs.generate_for(&mut c, a));
        c.accept_move().unwrap();
        assert!(!gs.generate_for(&mut c, a));
        assert_eq!(gs.stats().attempts, 2);
    }
}
