//! Netlist model for the detailed placer.
//!
//! A [`Network`] holds the placeable [`Node`]s (cells), the [`Edge`]s (nets)
//! and the [`Pin`]s joining them. Pins carry fixed offsets from their node's
//! origin, so pin positions follow node moves. The [`hpwl`] module computes
//! the half-perimeter wirelength used as the reporting metric.

#![warn(missing_docs)]

pub mod hpwl;
pub mod ids;
pub mod network;
pub mod node;

pub use hpwl::{edge_bbox, edge_hpwl, total_hpwl};
pub use ids::{EdgeId, NodeId, PinId};
pub use network::{Edge, Network, Pin};
pub use node::{Node, NodeKind};
