//! Opaque ID newtypes for netlist entities.
//!
//! [`NodeId`], [`EdgeId`] and [`PinId`] are thin `u32` wrappers used as arena
//! indices into the [`Network`](crate::Network).

use dpo_common::define_id;

define_id!(
    /// Opaque, copyable ID for a node (cell) in the network.
    NodeId
);

define_id!(
    /// Opaque, copyable ID for an edge (net) in the network.
    EdgeId
);

define_id!(
    /// Opaque, copyable ID for a pin in the network.
    PinId
);
