//! Placeable cells.

use crate::ids::{NodeId, PinId};
use dpo_arch::{Orientation, RegionId};
use serde::{Deserialize, Serialize};

/// How the optimizer may treat a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A standard cell the optimizer may move.
    #[default]
    Movable,
    /// A placed object that never moves and blocks the rows it overlaps.
    Fixed,
    /// An I/O terminal: contributes pins but occupies no row space.
    Terminal,
}

/// A placeable cell.
///
/// Positions are changed only through the segment manager so that segment
/// occupancy stays consistent with node coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Arena index; assigned by [`Network::add_node`](crate::Network::add_node).
    #[serde(skip)]
    pub id: NodeId,
    /// Instance name.
    pub name: String,
    /// Movement class.
    #[serde(default)]
    pub kind: NodeKind,
    /// Width.
    pub width: i64,
    /// Height.
    pub height: i64,
    /// Current left x.
    pub left: i64,
    /// Current bottom y.
    pub bottom: i64,
    /// Left x when optimization started.
    #[serde(skip)]
    pub orig_left: i64,
    /// Bottom y when optimization started.
    #[serde(skip)]
    pub orig_bottom: i64,
    /// Current orientation.
    #[serde(default)]
    pub orient: Orientation,
    /// Fence region the node must stay in.
    #[serde(default)]
    pub region: RegionId,
    /// Edge type of the left boundary, for spacing rules.
    #[serde(default)]
    pub left_edge_type: u32,
    /// Edge type of the right boundary, for spacing rules.
    #[serde(default)]
    pub right_edge_type: u32,
    /// Pins on this node (rebuilt from the pin list).
    #[serde(skip)]
    pub pins: Vec<PinId>,
}

impl Default for NodeId {
    fn default() -> Self {
        NodeId::from_raw(0)
    }
}

impl Node {
    /// Creates a movable node of the given size at the origin.
    pub fn new(name: impl Into<String>, width: i64, height: i64) -> Self {
        Self {
            id: NodeId::default(),
            name: name.into(),
            kind: NodeKind::Movable,
            width,
            height,
            left: 0,
            bottom: 0,
            orig_left: 0,
            orig_bottom: 0,
            orient: Orientation::N,
            region: RegionId::DEFAULT,
            left_edge_type: 0,
            right_edge_type: 0,
            pins: Vec::new(),
        }
    }

    /// Places the node, also recording the position as its original one.
    pub fn at(mut self, left: i64, bottom: i64) -> Self {
        self.left = left;
        self.bottom = bottom;
        self.orig_left = left;
        self.orig_bottom = bottom;
        self
    }

    /// Sets the movement class.
    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the fence region.
    pub fn with_region(mut self, region: RegionId) -> Self {
        self.region = region;
        self
    }

    /// Sets the orientation.
    pub fn with_orient(mut self, orient: Orientation) -> Self {
        self.orient = orient;
        self
    }

    /// Sets the left and right edge types.
    pub fn with_edge_types(mut self, left: u32, right: u32) -> Self {
        self.left_edge_type = left;
        self.right_edge_type = right;
        self
    }

    /// Right x.
    pub fn right(&self) -> i64 {
        self.left + self.width
    }

    /// Top y.
    pub fn top(&self) -> i64 {
        self.bottom + self.height
    }

    /// Returns `true` if the optimizer may move this node.
    pub fn is_movable(&self) -> bool {
        self.kind == NodeKind::Movable
    }
}
