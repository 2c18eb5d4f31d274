//! Median-based optimal region of a cell.

use crate::context::PlacementContext;
use dpo_arch::Rect;
use dpo_network::{edge_bbox, NodeId};

/// Computes the box a cell's origin should move into to minimize the
/// wirelength of its edges.
///
/// For every pin, the bounding box of the other pins on its edge is shifted
/// by the pin's offset and clamped to the die; its x and y bounds are
/// collected and the lower-median pair on each axis forms the region. The
/// point buffers are reused across calls.
#[derive(Debug, Clone, Default)]
pub struct OptimalRegion {
    xpts: Vec<i64>,
    ypts: Vec<i64>,
}

impl OptimalRegion {
    /// Creates an empty finder.
    pub fn new() -> Self {
        Self::default()
    }

    /// The optimal region for `node`'s origin, or `None` when the node has
    /// no edge within `2..=skip_nets_larger_than` pins.
    pub fn compute(&mut self, ctx: &PlacementContext, node: NodeId) -> Option<Rect> {
        self.xpts.clear();
        self.ypts.clear();
        let network = &ctx.network;
        let die = &ctx.arch.die;
        let skip = ctx.params().skip_nets_larger_than;
        let n = network.node(node);

        for &pin_id in &n.pins {
            let pin = network.pin(pin_id);
            let count = network.edge(pin.edge).pins.len();
            if count <= 1 || count > skip {
                continue;
            }
            let bbox = edge_bbox(network, pin.edge, Some(node));
            if bbox.is_empty() {
                continue;
            }
            let (dx, dy) = n.orient.transform_offset(pin.dx, pin.dy, n.width, n.height);
            self.xpts.push((bbox.xmin - dx).clamp(die.xmin, die.xmax));
            self.xpts.push((bbox.xmax - dx).clamp(die.xmin, die.xmax));
            self.ypts.push((bbox.ymin - dy).clamp(die.ymin, die.ymax));
            self.ypts.push((bbox.ymax - dy).clamp(die.ymin, die.ymax));
        }

        if self.xpts.len() < 2 {
            return None;
        }
        let (xmin, xmax) = lower_median_pair(&mut self.xpts);
        let (ymin, ymax) = lower_median_pair(&mut self.ypts);
        Some(Rect::new(xmin, ymin, xmax, ymax))
    }
}

fn lower_median_pair(pts: &mut [i64]) -> (i64, i64) {
    pts.sort_unstable();
    let mid = pts.len() / 2;
    (pts[mid - 1], pts[mid])
}

/// Clips `region` to the window `[x - dx, x + dx] x [y - dy, y + dy]`.
///
/// An axis with no overlap collapses onto the nearest window edge.
pub fn clip_to_window(region: &Rect, x: i64, y: i64, dx: i64, dy: i64) -> Rect {
    let (xmin, xmax) = clip_axis(region.xmin, region.xmax, x - dx, x + dx);
    let (ymin, ymax) = clip_axis(region.ymin, region.ymax, y - dy, y + dy);
    Rect::new(xmin, ymin, xmax, ymax)
}

fn clip_axis(lo: i64, hi: i64, wlo: i64, whi: i64) -> (i64, i64) {
    if hi < wlo {
        (wlo, wlo)
    } else if lo > whi {
        (whi, whi)
    } else {
        (lo.max(wlo), hi.min(whi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PlacementParams;
    use dpo_arch::{Architecture, Orientation, Row};
    use dpo_diagnostics::DiagnosticSink;
    use dpo_network::{Network, Node};

    fn ctx(nw: Network) -> PlacementContext {
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
        PlacementContext::new(arch, nw, PlacementParams::default(), &DiagnosticSink::new())
    }

    #[test]
    fn region_between_two_neighbours() {
        let mut nw = Network::new();
        let a = nw.add_node(Node::new("a", 10, 10).at(40, 10));
        let b = nw.add_node(Node::new("b", 10, 10).at(0, 0));
        let c = nw.add_node(Node::new("c", 10, 10).at(80, 20));
        let e = nw.add_edge("ab");
        nw.add_pin(a, e, 5, 5);
        nw.add_pin(b, e, 5, 5);
        let e = nw.add_edge("ac");
        nw.add_pin(a, e, 5, 5);
        nw.add_pin(c, e, 5, 5);
        let c = ctx(nw);
        let r = OptimalRegion::new().compute(&c, a).unwrap();
        assert_eq!(r, Rect::new(0, 0, 80, 20));
    }

    #[test]
    fn unconnected_node_has_no_region() {
        let mut nw = Network::new();
        let a = nw.add_node(Node::new("a", 10, 10).at(40, 10));
        let b = nw.add_node(Node::new("b", 10, 10).at(0, 0));
        let e = nw.add_edge("lonely");
        nw.add_pin(a, e, 0, 0);
        let e = nw.add_edge("other");
        nw.add_pin(b, e, 0, 0);
        let c = ctx(nw);
        assert!(OptimalRegion::new().compute(&c, a).is_none());
    }

    #[test]
    fn region_clamped_to_die() {
        let mut nw = Network::new();
        let a = nw.add_node(Node::new("a", 10, 10).at(40, 10));
        let b = nw.add_node(Node::new("b", 10, 10).at(0, 0));
        let e = nw.add_edge("ab");
        nw.add_pin(a, e, 8, 8);
        nw.add_pin(b, e, 0, 0);
        let c = ctx(nw);
        let r = OptimalRegion::new().compute(&c, a).unwrap();
        assert_eq!(r, Rect::new(0, 0, 0, 0));
    }

    #[test]
    fn window_clipping() {
        let r = Rect::new(0, 0, 80, 20);
        assert_eq!(clip_to_window(&r, 50, 10, 10, 5), Rect::new(40, 5, 60, 15));
        assert_eq!(clip_to_window(&r, 200, 100, 10, 5), Rect::new(190, 95, 190, 95));
    }
}
