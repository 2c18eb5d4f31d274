//! The node/edge/pin arena.

use crate::ids::{EdgeId, NodeId, PinId};
use crate::node::Node;
use dpo_arch::Orientation;
use serde::{Deserialize, Serialize};

/// A net: the pins it connects, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Arena index.
    #[serde(skip)]
    pub id: EdgeId,
    /// Net name.
    pub name: String,
    /// Pins on this edge (rebuilt from the pin list).
    #[serde(skip)]
    pub pins: Vec<PinId>,
}

impl Default for EdgeId {
    fn default() -> Self {
        EdgeId::from_raw(0)
    }
}

/// A connection point of a node onto an edge.
///
/// The offset is measured from the node's origin with the node in
/// orientation `N`; it never changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    /// Owning node.
    pub node: NodeId,
    /// Edge this pin connects to.
    pub edge: EdgeId,
    /// Horizontal offset from the node's left edge.
    pub dx: i64,
    /// Vertical offset from the node's bottom edge.
    pub dy: i64,
}

/// The placement netlist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    /// All nodes.
    pub nodes: Vec<Node>,
    /// All edges.
    pub edges: Vec<Edge>,
    /// All pins.
    pub pins: Vec<Pin>,
}

impl Network {
    /// Creates an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its ID.
    pub fn add_node(&mut self, mut node: Node) -> NodeId {
        let id = NodeId::from_raw(self.nodes.len() as u32);
        node.id = id;
        node.pins.clear();
        self.nodes.push(node);
        id
    }

    /// Adds an edge and returns its ID.
    pub fn add_edge(&mut self, name: impl Into<String>) -> EdgeId {
        let id = EdgeId::from_raw(self.edges.len() as u32);
        self.edges.push(Edge {
            id,
            name: name.into(),
            pins: Vec::new(),
        });
        id
    }

    /// Adds a pin joining `node` to `edge` and returns its ID.
    pub fn add_pin(&mut self, node: NodeId, edge: EdgeId, dx: i64, dy: i64) -> PinId {
        let id = PinId::from_raw(self.pins.len() as u32);
        self.pins.push(Pin { node, edge, dx, dy });
        self.nodes[node.index()].pins.push(id);
        self.edges[edge.index()].pins.push(id);
        id
    }

    /// Returns the node with the given ID.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Returns a mutable reference to the node with the given ID.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Returns the edge with the given ID.
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// Returns the pin with the given ID.
    pub fn pin(&self, id: PinId) -> &Pin {
        &self.pins[id.index()]
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the number of pins.
    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    /// Iterates over all node IDs.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| NodeId::from_raw(i as u32))
    }

    /// Absolute position of a pin with its node where it currently is.
    pub fn pin_position(&self, id: PinId) -> (i64, i64) {
        let pin = self.pin(id);
        let node = self.node(pin.node);
        self.pin_position_at(id, node.left, node.bottom, node.orient)
    }

    /// Absolute position of a pin if its node were at `(left, bottom)` with
    /// orientation `orient`.
    pub fn pin_position_at(
        &self,
        id: PinId,
        left: i64,
        bottom: i64,
        orient: Orientation,
    ) -> (i64, i64) {
        let pin = self.pin(id);
        let node = self.node(pin.node);
        let (dx, dy) = orient.transform_offset(pin.dx, pin.dy, node.width, node.height);
        (left + dx, bottom + dy)
    }

    /// Rebuilds IDs and node/edge pin lists after deserialization.
    pub fn rebuild_indices(&mut self) {
        for (i, node) in self.nodes.iter_mut().enumerate() {
            node.id = NodeId::from_raw(i as u32);
            node.pins.clear();
        }
        for (i, edge) in self.edges.iter_mut().enumerate() {
            edge.id = EdgeId::from_raw(i as u32);
            edge.pins.clear();
        }
        for (i, pin) in self.pins.iter().enumerate() {
            let id = PinId::from_raw(i as u32);
            self.nodes[pin.node.index()].pins.push(id);
            self.edges[pin.edge.index()].pins.push(id);
        }
    }

    /// Records every node's current position as its original position.
    pub fn record_original_positions(&mut self) {
        for node in &mut self.nodes {
            node.orig_left = node.left;
            node.orig_bottom = node.bottom;
        }
    }

    /// Returns the first pin that references a missing node or edge, if any.
    pub fn find_dangling_pin(&self) -> Option<PinId> {
        self.pins
            .iter()
            .position(|p| p.node.index() >= self.nodes.len() || p.edge.index() >= self.edges.len())
            .map(|i| PinId::from_raw(i as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_network() -> Network {
        let mut nw = Network::new();
        let a = nw.add_node(Node::new("a", 10, 10).at(0, 0));
        let b = nw.add_node(Node::new("b", 10, 10).at(50, 0));
        let e = nw.add_edge("n1");
        nw.add_pin(a, e, 2, 3);
        nw.add_pin(b, e, 5, 5);
        nw
    }

    #[test]
    fn builder_links_pins() {
        let nw = two_node_network();
        assert_eq!(nw.node_count(), 2);
        assert_eq!(nw.edge_count(), 1);
        assert_eq!(nw.pin_count(), 2);
        assert_eq!(nw.node(NodeId::from_raw(1)).pins, vec![PinId::from_raw(1)]);
        assert_eq!(nw.edge(EdgeId::from_raw(0)).pins.len(), 2);
    }

    #[test]
    fn pin_positions_follow_orientation() {
        let mut nw = two_node_network();
        assert_eq!(nw.pin_position(PinId::from_raw(0)), (2, 3));
        nw.node_mut(NodeId::from_raw(0)).orient = Orientation::FS;
        assert_eq!(nw.pin_position(PinId::from_raw(0)), (2, 7));
        assert_eq!(
            nw.pin_position_at(PinId::from_raw(0), 20, 10, Orientation::FN),
            (28, 13)
        );
    }

    #[test]
    fn rebuild_after_json() {
        let nw = two_node_network();
        let json = serde_json::to_string(&nw).unwrap();
        let mut back: Network = serde_json::from_str(&json).unwrap();
        assert!(back.nodes[0].pins.is_empty());
        back.rebuild_indices();
        back.record_original_positions();
        assert_eq!(back, nw);
    }

    #[test]
    fn dangling_pin_detected() {
        let mut nw = two_node_network();
        assert!(nw.find_dangling_pin().is_none());
        nw.pins.push(Pin {
            node: NodeId::from_raw(9),
            edge: EdgeId::from_raw(0),
            dx: 0,
            dy: 0,
        });
        assert_eq!(nw.find_dangling_pin(), Some(PinId::from_raw(2)));
    }
}
