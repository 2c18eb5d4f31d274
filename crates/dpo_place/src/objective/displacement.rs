//! Total displacement from the original placement.

use super::DetailedObjective;
use crate::moves::MoveRecord;
use dpo_network::Network;

/// Sum of `|left - orig_left| + |bottom - orig_bottom|` over movable nodes.
#[derive(Debug, Clone, Default)]
pub struct DisplacementObjective;

impl DisplacementObjective {
    /// Creates the objective.
    pub fn new() -> Self {
        Self
    }

    fn disp(orig_left: i64, orig_bottom: i64, left: i64, bottom: i64) -> i64 {
        (left - orig_left).abs() + (bottom - orig_bottom).abs()
    }
}

impl DetailedObjective for DisplacementObjective {
    fn name(&self) -> &'static str {
        "disp"
    }

    fn curr(&mut self, network: &Network) -> f64 {
        network
            .nodes
            .iter()
            .filter(|n| n.is_movable())
            .map(|n| Self::disp(n.orig_left, n.orig_bottom, n.left, n.bottom) as f64)
            .sum()
    }

    fn delta(&mut self, network: &Network, records: &[MoveRecord]) -> f64 {
        records
            .iter()
            .map(|r| {
                let n = network.node(r.node);
                let old = Self::disp(n.orig_left, n.orig_bottom, r.old_left, r.old_bottom);
                let new = Self::disp(n.orig_left, n.orig_bottom, r.new_left, r.new_bottom);
                (old - new) as f64
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::SegmentId;
    use dpo_arch::Orientation;
    use dpo_network::{Node, NodeKind};

    #[test]
    fn displacement_tracks_moves() {
        let mut nw = Network::new();
        let a = nw.add_node(Node::new("a", 10, 10).at(10, 0));
        nw.add_node(Node::new("f", 10, 10).at(0, 0).with_kind(NodeKind::Fixed));
        nw.node_mut(a).left = 30;
        let mut obj = DisplacementObjective::new();
        assert_eq!(obj.curr(&nw), 20.0);

        let rec = MoveRecord {
            node: a,
            old_left: 30,
            old_bottom: 0,
            old_orient: Orientation::N,
            old_seg: SegmentId::from_raw(0),
            new_left: 15,
            new_bottom: 10,
            new_orient: Orientation::FS,
            new_seg: SegmentId::from_raw(1),
        };
        assert_eq!(obj.delta(&nw, &[rec]), 5.0);
    }
}
