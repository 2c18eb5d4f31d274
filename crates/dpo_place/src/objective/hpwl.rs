//! Incremental half-perimeter wirelength.

use super::DetailedObjective;
use crate::moves::{find_record, MoveRecord};
use dpo_arch::Rect;
use dpo_network::{EdgeId, Network};

/// HPWL with incremental deltas over the edges a move touches.
///
/// Edges with fewer than two pins contribute nothing. Edges with more than
/// `skip_nets_larger_than` pins are ignored entirely, both here and in
/// [`curr`](DetailedObjective::curr), so incremental tracking stays
/// consistent with a scratch recomputation.
#[derive(Debug, Clone)]
pub struct HpwlObjective {
    skip_nets_larger_than: usize,
    stamps: Vec<u32>,
    traversal: u32,
}

impl HpwlObjective {
    /// Creates an evaluator ignoring edges above the given pin count.
    pub fn new(skip_nets_larger_than: usize) -> Self {
        Self {
            skip_nets_larger_than,
            stamps: Vec::new(),
            traversal: 0,
        }
    }

    /// Returns `true` if the edge takes part in the evaluation.
    pub fn counts(&self, network: &Network, edge: EdgeId) -> bool {
        let n = network.edge(edge).pins.len();
        n >= 2 && n <= self.skip_nets_larger_than
    }

    /// HPWL of one edge with the nodes in `records` at their new positions.
    pub fn edge_hpwl_with(network: &Network, edge: EdgeId, records: &[MoveRecord]) -> i64 {
        let mut bbox = Rect::empty();
        for &pin in &network.edge(edge).pins {
            let node = network.pin(pin).node;
            let (x, y) = match find_record(records, node) {
                Some(rec) => {
                    network.pin_position_at(pin, rec.new_left, rec.new_bottom, rec.new_orient)
                }
                None => network.pin_position(pin),
            };
            bbox.add_pt(x, y);
        }
        if bbox.is_empty() {
            0
        } else {
            bbox.width() + bbox.height()
        }
    }

    /// Starts a new traversal, clearing the stamps when the counter wraps.
    fn next_traversal(&mut self, edge_count: usize) {
        if self.stamps.len() < edge_count {
            self.stamps.resize(edge_count, 0);
        }
        if self.traversal == u32::MAX {
            self.stamps.fill(0);
            self.traversal = 0;
        }
        self.traversal += 1;
    }
}

impl DetailedObjective for HpwlObjective {
    fn name(&self) -> &'static str {
        "hpwl"
    }

    fn curr(&mut self, network: &Network) -> f64 {
        network
            .edges
            .iter()
            .filter(|e| self.counts(network, e.id))
            .map(|e| Self::edge_hpwl_with(network, e.id, &[]) as f64)
            .sum()
    }

    fn delta(&mut self, network: &Network, records: &[MoveRecord]) -> f64 {
        self.next_traversal(network.edge_count());
        let mut old = 0i64;
        let mut new = 0i64;
        for rec in records {
            for &pin in &network.node(rec.node).pins {
                let edge = network.pin(pin).edge;
                if self.stamps[edge.index()] == self.traversal || !self.counts(network, edge) {
                    continue;
                }
                self.stamps[edge.index()] = self.traversal;
                old += Self::edge_hpwl_with(network, edge, &[]);
                new += Self::edge_hpwl_with(network, edge, records);
            }
        }
        (old - new) as f64
    }
}
