//! Half-perimeter wirelength.
//!
//! HPWL of an edge is the width plus height of the bounding box of its pins'
//! absolute positions. Edges with fewer than two pins contribute nothing.

use crate::ids::{EdgeId, NodeId};
use crate::network::Network;
use dpo_arch::Rect;

/// Bounding box of an edge's pins, optionally leaving out one node's pins.
pub fn edge_bbox(network: &Network, edge: EdgeId, skip: Option<NodeId>) -> Rect {
    let mut bbox = Rect::empty();
    for &pin in &network.edge(edge).pins {
        if Some(network.pin(pin).node) == skip {
            continue;
        }
        let (x, y) = network.pin_position(pin);
        bbox.add_pt(x, y);
    }
    bbox
}

/// HPWL of a single edge.
pub fn edge_hpwl(network: &Network, edge: EdgeId) -> i64 {
    if network.edge(edge).pins.len() < 2 {
        return 0;
    }
    let bbox = edge_bbox(network, edge, None);
    bbox.width() + bbox.height()
}

/// Total HPWL over every edge with at least two pins.
pub fn total_hpwl(network: &Network) -> i64 {
    (0..network.edge_count())
        .map(|i| edge_hpwl(network, EdgeId::from_raw(i as u32)))
        .sum()
}
