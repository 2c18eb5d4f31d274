//! Staged moves.
//!
//! `try_move`/`try_swap` never touch node coordinates or segment lists; they
//! stage [`MoveRecord`]s holding both the old and the proposed state. The
//! objective delta is computed from the records, and the move is then either
//! committed (`accept_move`) or dropped (`reject_move`).

use crate::segment::SegmentId;
use dpo_arch::Orientation;
use dpo_network::NodeId;

/// Most nodes a single staged move can touch (a swap touches two).
pub const MOVE_LIMIT: usize = 2;

/// Old and proposed state of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    /// The node being moved.
    pub node: NodeId,
    /// Left x before the move.
    pub old_left: i64,
    /// Bottom y before the move.
    pub old_bottom: i64,
    /// Orientation before the move.
    pub old_orient: Orientation,
    /// Segment before the move.
    pub old_seg: SegmentId,
    /// Proposed left x.
    pub new_left: i64,
    /// Proposed bottom y.
    pub new_bottom: i64,
    /// Proposed orientation.
    pub new_orient: Orientation,
    /// Proposed segment.
    pub new_seg: SegmentId,
}

/// A fixed-capacity stack of staged records.
///
/// The backing buffer is allocated once and reused for every move.
#[derive(Debug, Clone)]
pub struct MoveList {
    records: Vec<MoveRecord>,
}

impl MoveList {
    /// Creates an empty list with room for [`MOVE_LIMIT`] records.
    pub fn new() -> Self {
        Self {
            records: Vec::with_capacity(MOVE_LIMIT),
        }
    }

    /// Stages a record. Returns `false` if the list is full.
    pub fn stage(&mut self, record: MoveRecord) -> bool {
        if self.records.len() >= MOVE_LIMIT {
            return false;
        }
        self.records.push(record);
        true
    }

    /// Drops every staged record.
    pub fn rollback(&mut self) {
        self.records.clear();
    }

    /// The staged records in staging order.
    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    /// Number of staged records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

/// The record for `node` in `records`, if present.
pub fn find_record(records: &[MoveRecord], node: NodeId) -> Option<&MoveRecord> {
    records.iter().find(|r| r.node == node)
}
