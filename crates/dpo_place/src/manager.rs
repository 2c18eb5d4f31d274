//! Segment/legality manager: move staging, commit and rollback.
//!
//! A staged move keeps five invariants once committed: occupants of a segment
//! do not overlap and stay inside it, every cell sits on a row bottom, every
//! left edge is on a site, every cell matches its segment's region, and
//! abutting cells honour the edge spacing rules. A `try_*` call that returns
//! `false` changes nothing.

use crate::context::PlacementContext;
use crate::moves::MoveRecord;
use crate::segment::{SegmentId, SegmentTable};
use dpo_arch::Orientation;
use dpo_common::DpoResult;
use dpo_network::{Network, NodeId};

impl PlacementContext {
    /// Tries to move `node` from `(cur_x, cur_y)` in `cur_seg` to near
    /// `(new_x, new_y)` in `new_seg` without disturbing other cells.
    ///
    /// Searches the gap left of the first occupant at or right of `new_x`,
    /// then the gap right of that occupant. On success the move is staged
    /// and `true` is returned.
    #[allow(clippy::too_many_arguments)]
    pub fn try_move(
        &mut self,
        node: NodeId,
        cur_x: i64,
        cur_y: i64,
        cur_seg: SegmentId,
        new_x: i64,
        new_y: i64,
        new_seg: SegmentId,
    ) -> bool {
        self.moves.rollback();
        match self.plan_move(node, cur_x, cur_y, cur_seg, new_x, new_y, new_seg) {
            Some(record) => self.moves.stage(record),
            None => false,
        }
    }

    /// Tries to swap `node` with the occupant of `new_seg` at or right of
    /// `new_x` (or the last occupant). Both cells must be single-height and
    /// each must be legal in the other's segment.
    #[allow(clippy::too_many_arguments)]
    pub fn try_swap(
        &mut self,
        node: NodeId,
        cur_x: i64,
        cur_y: i64,
        cur_seg: SegmentId,
        new_x: i64,
        new_y: i64,
        new_seg: SegmentId,
    ) -> bool {
        self.moves.rollback();
        match self.plan_swap(node, cur_x, cur_y, cur_seg, new_x, new_y, new_seg) {
            Some((a, b)) => self.moves.stage(a) && self.moves.stage(b),
            None => false,
        }
    }

    /// Commits the staged move: updates segment lists and node coordinates.
    pub fn accept_move(&mut self) -> DpoResult<()> {
        let result = apply(&mut self.segments, &mut self.network, self.moves.records());
        self.moves.rollback();
        result
    }

    /// Drops the staged move.
    pub fn reject_move(&mut self) {
        self.moves.rollback();
    }

    /// Applies a batch of records directly, bypassing the move stack.
    ///
    /// Used for permutations of cells (matching, reordering) whose legality
    /// the caller has already established.
    pub fn relocate_batch(&mut self, records: &[MoveRecord]) -> DpoResult<()> {
        apply(&mut self.segments, &mut self.network, records)
    }

    /// Re-sorts every segment's occupants by x and recomputes utilization.
    pub fn resort_segments(&mut self) {
        self.segments.resort(&self.network);
    }

    /// Changes a node's orientation in place; its footprint is unchanged.
    pub fn set_orientation(&mut self, node: NodeId, orient: Orientation) {
        self.network.node_mut(node).orient = orient;
    }

    /// Snaps a left position for `node` into `[lo, hi - width]` on a site of
    /// `seg`'s row, as close to `x` as possible.
    pub fn align_pos(&self, node: NodeId, seg: SegmentId, x: i64, lo: i64, hi: i64) -> Option<i64> {
        let width = self.network.node(node).width;
        let row = &self.arch.rows[self.segments.segment(seg).row];
        let hi_left = hi - width;
        if hi_left < lo {
            return None;
        }
        let mut xp = row.snap_down(x.clamp(lo, hi_left));
        if xp < lo {
            xp += row.site_width;
        }
        (xp >= lo && xp <= hi_left).then_some(xp)
    }

    /// Builds a record moving `node` from its current spot to `new_left`
    /// on the row of `new_seg`.
    pub fn make_record(
        &self,
        node: NodeId,
        new_left: i64,
        new_seg: SegmentId,
    ) -> Option<MoveRecord> {
        let n = self.network.node(node);
        let old_seg = *self.segments.segments_of(node).first()?;
        let row = self.arch.rows.get(self.segments.segment(new_seg).row)?;
        Some(MoveRecord {
            node,
            old_left: n.left,
            old_bottom: n.bottom,
            old_orient: n.orient,
            old_seg,
            new_left,
            new_bottom: row.bottom,
            new_orient: n.orient.for_row(row.orient),
            new_seg,
        })
    }

    /// Returns `true` if `(x, y)` is within the displacement limit of
    /// `node`'s original position.
    pub fn within_displacement(&self, node: NodeId, x: i64, y: i64) -> bool {
        let n = self.network.node(node);
        (x - n.orig_left).abs() <= self.max_disp_x && (y - n.orig_bottom).abs() <= self.max_disp_y
    }

    /// Free span `[lo, hi)` for `node` between occupants `left` and `right`
    /// of `seg` (segment ends when absent), after edge spacing.
    pub fn gap_between(
        &self,
        node: NodeId,
        seg: SegmentId,
        left: Option<NodeId>,
        right: Option<NodeId>,
    ) -> (i64, i64) {
        let n = self.network.node(node);
        let segment = self.segments.segment(seg);
        let lo = left.map_or(segment.min_x, |l| {
            let l = self.network.node(l);
            l.right() + self.arch.cell_spacing(l.right_edge_type, n.left_edge_type)
        });
        let hi = right.map_or(segment.max_x, |r| {
            let r = self.network.node(r);
            r.left - self.arch.cell_spacing(n.right_edge_type, r.left_edge_type)
        });
        (lo, hi)
    }

    /// Index of the first occupant of `seg` whose left is at or right of `x`,
    /// ignoring `skip`.
    fn first_at_or_right(&self, seg: SegmentId, x: i64, skip: Option<NodeId>) -> Option<usize> {
        let cells = self.segments.cells_in(seg);
        let start = cells.partition_point(|&c| self.network.node(c).left < x);
        (start..cells.len()).find(|&i| Some(cells[i]) != skip)
    }

    /// Last occupant before index `end` (or before the end of the list).
    fn prev_occupant(
        &self,
        seg: SegmentId,
        end: Option<usize>,
        skip: Option<NodeId>,
    ) -> Option<NodeId> {
        let cells = self.segments.cells_in(seg);
        let end = end.unwrap_or(cells.len());
        cells[..end].iter().rev().copied().find(|&c| Some(c) != skip)
    }

    /// First occupant after index `i`.
    fn next_occupant(&self, seg: SegmentId, i: usize, skip: Option<NodeId>) -> Option<NodeId> {
        let cells = self.segments.cells_in(seg);
        cells.get(i + 1..)?.iter().copied().find(|&c| Some(c) != skip)
    }

    /// Common preconditions: `node` is a single-height cell at
    /// `(cur_x, cur_y)` in `cur_seg`, and `new_seg` lies on row bottom `new_y`.
    fn check_endpoints(
        &self,
        node: NodeId,
        cur_x: i64,
        cur_y: i64,
        cur_seg: SegmentId,
        new_y: i64,
        new_seg: SegmentId,
    ) -> bool {
        if node.index() >= self.network.node_count() || new_seg.index() >= self.segments.len() {
            return false;
        }
        if !self.is_single_height(node)
            || !matches!(self.segments.segments_of(node), [s] if *s == cur_seg)
        {
            return false;
        }
        let n = self.network.node(node);
        let seg = self.segments.segment(new_seg);
        n.left == cur_x && n.bottom == cur_y && self.arch.rows[seg.row].bottom == new_y
    }

    #[allow(clippy::too_many_arguments)]
    fn plan_move(
        &self,
        node: NodeId,
        cur_x: i64,
        cur_y: i64,
        cur_seg: SegmentId,
        new_x: i64,
        new_y: i64,
        new_seg: SegmentId,
    ) -> Option<MoveRecord> {
        if !self.check_endpoints(node, cur_x, cur_y, cur_seg, new_y, new_seg) {
            return None;
        }
        if self.network.node(node).region != self.segments.segment(new_seg).region {
            return None;
        }

        let cells = self.segments.cells_in(new_seg);
        let right = self.first_at_or_right(new_seg, new_x, Some(node));
        let left_gap = (self.prev_occupant(new_seg, right, Some(node)), right.map(|i| cells[i]));
        let right_gap =
            right.map(|i| (Some(cells[i]), self.next_occupant(new_seg, i, Some(node))));

        for (l, r) in std::iter::once(left_gap).chain(right_gap) {
            let (lo, hi) = self.gap_between(node, new_seg, l, r);
            let Some(x) = self.align_pos(node, new_seg, new_x, lo, hi) else {
                continue;
            };
            if self.within_displacement(node, x, new_y) {
                return self.make_record(node, x, new_seg);
            }
        }
        None
    }

    #[allow(clippy::too_many_arguments)]
    fn plan_swap(
        &self,
        node: NodeId,
        cur_x: i64,
        cur_y: i64,
        cur_seg: SegmentId,
        new_x: i64,
        new_y: i64,
        new_seg: SegmentId,
    ) -> Option<(MoveRecord, MoveRecord)> {
        if !self.check_endpoints(node, cur_x, cur_y, cur_seg, new_y, new_seg) {
            return None;
        }
        let cells_j = self.segments.cells_in(new_seg);
        let at = cells_j.partition_point(|&c| self.network.node(c).left < new_x);
        let other = *cells_j.get(at).or_else(|| cells_j.last())?;
        if other == node || !self.is_single_height(other) {
            return None;
        }

        let ni = self.network.node(node);
        let nj = self.network.node(other);
        if ni.region != self.segments.segment(new_seg).region
            || nj.region != self.segments.segment(cur_seg).region
        {
            return None;
        }

        let cells_i = self.segments.cells_in(cur_seg);
        let pi = cells_i.iter().position(|&c| c == node)?;
        if cur_seg == new_seg {
            let pj = cells_i.iter().position(|&c| c == other)?;
            if pi.abs_diff(pj) == 1 {
                return self.plan_adjacent_swap(cur_seg, pi.min(pj));
            }
        }
        let pj = cells_j.iter().position(|&c| c == other)?;

        let (lo, hi) = self.gap_between(
            other,
            cur_seg,
            self.prev_occupant(cur_seg, Some(pi), None),
            self.next_occupant(cur_seg, pi, None),
        );
        let xj = self.align_pos(other, cur_seg, ni.left, lo, hi)?;

        let (lo, hi) = self.gap_between(
            node,
            new_seg,
            self.prev_occupant(new_seg, Some(pj), None),
            self.next_occupant(new_seg, pj, None),
        );
        let xi = self.align_pos(node, new_seg, new_x, lo, hi)?;

        if !self.within_displacement(node, xi, new_y)
            || !self.within_displacement(other, xj, cur_y)
        {
            return None;
        }
        Some((
            self.make_record(node, xi, new_seg)?,
            self.make_record(other, xj, cur_seg)?,
        ))
    }

    /// Swaps the occupants at `p` and `p + 1` of `seg`: packed from the
    /// pair's left end first, then against its right end.
    fn plan_adjacent_swap(&self, seg: SegmentId, p: usize) -> Option<(MoveRecord, MoveRecord)> {
        let cells = self.segments.cells_in(seg);
        let (first, second) = (cells[p], cells[p + 1]);
        let before = p.checked_sub(1).map(|i| cells[i]);
        let after = cells.get(p + 2).copied();
        let f = self.network.node(first);
        let s = self.network.node(second);

        let (lo, _) = self.gap_between(second, seg, before, None);
        let (_, hi) = self.gap_between(first, seg, None, after);
        let spacing = self.arch.cell_spacing(s.right_edge_type, f.left_edge_type);

        let packed_left = || {
            let a = self.align_pos(second, seg, f.left, lo, hi)?;
            let b_lo = a + s.width + spacing;
            let b = self.align_pos(first, seg, b_lo, b_lo, hi)?;
            Some((a, b))
        };
        let packed_right = || {
            let b = self.align_pos(first, seg, s.right() - f.width, lo, hi)?;
            let a_hi = b - spacing;
            let a = self.align_pos(second, seg, a_hi - s.width, lo, a_hi)?;
            Some((a, b))
        };
        let fits = |&(a, b): &(i64, i64)| {
            self.within_displacement(second, a, s.bottom)
                && self.within_displacement(first, b, f.bottom)
        };
        let (a, b) = packed_left()
            .filter(fits)
            .or_else(|| packed_right().filter(fits))?;
        Some((self.make_record(second, a, seg)?, self.make_record(first, b, seg)?))
    }
}

/// Moves every record's node out of its old segment, updates coordinates,
/// then inserts it into its new segment.
fn apply(
    segments: &mut SegmentTable,
    network: &mut Network,
    records: &[MoveRecord],
) -> DpoResult<()> {
    for rec in records {
        segments.remove(network, rec.old_seg, rec.node)?;
    }
    for rec in records {
        let n = network.node_mut(rec.node);
        n.left = rec.new_left;
        n.bottom = rec.new_bottom;
        n.orient = rec.new_orient;
    }
    for rec in records {
        segments.insert(network, rec.new_seg, rec.node);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PlacementParams;
    use dpo_arch::{Architecture, EdgeSpacingRule, Rect, RegionId, Region, Row};
    use dpo_diagnostics::DiagnosticSink;
    use dpo_network::{Network, Node};

    fn arch(rows: i64, site: i64) -> Architecture {
        let row_vec = (0..rows)
            .map(|i| Row {
                bottom: i * 10,
                height: 10,
                site_width: site,
                min_x: 0,
                num_sites: 100 / site,
                orient: if i % 2 == 0 { Orientation::N } else { Orientation::FS },
            })
            .collect();
        Architecture::new(Rect::new(0, 0, 100, rows * 10), row_vec)
    }

    fn ctx(arch: Architecture, cells: &[(i64, i64, i64)]) -> PlacementContext {
        let mut nw = Network::new();
        for (i, &(w, x, y)) in cells.iter().enumerate() {
            nw.add_node(Node::new(format!("c{i}"), w, 10).at(x, y));
        }
        PlacementContext::new(arch, nw, PlacementParams::default(), &DiagnosticSink::new())
    }

    fn id(i: u32) -> NodeId {
        NodeId::from_raw(i)
    }

    fn seg_of(ctx: &PlacementContext, n: NodeId) -> SegmentId {
        ctx.segments().segments_of(n)[0]
    }

    fn row_seg(ctx: &PlacementContext, row: usize) -> SegmentId {
        ctx.segments().segments_in_row(row)[0]
    }

    #[test]
    fn align_pos_snaps_into_gap() {
        let c = ctx(arch(1, 4), &[(8, 0, 0)]);
        let s = row_seg(&c, 0);
        assert_eq!(c.align_pos(id(0), s, 13, 0, 100), Some(12));
        assert_eq!(c.align_pos(id(0), s, 13, 14, 100), Some(16));
        assert_eq!(c.align_pos(id(0), s, 95, 0, 100), Some(92));
        assert_eq!(c.align_pos(id(0), s, 0, 14, 23), None);
        assert_eq!(c.align_pos(id(0), s, 0, 13, 24), Some(16));
    }

    #[test]
    fn move_into_gap_is_staged_not_applied() {
        let mut c = ctx(arch(1, 1), &[(10, 0, 0), (10, 50, 0)]);
        let s = row_seg(&c, 0);
        let before = c.segments().occupancy_snapshot();
        assert!(c.try_move(id(0), 0, 0, s, 50, 0, s));
        assert_eq!(c.moves().records()[0].new_left, 40);
        assert_eq!(c.network.node(id(0)).left, 0);
        assert_eq!(c.segments().occupancy_snapshot(), before);
        c.accept_move().unwrap();
        assert_eq!(c.network.node(id(0)).left, 40);
        assert!(c.moves().is_empty());
        assert_eq!(c.segments().cells_in(s), &[id(0), id(1)]);
    }

    #[test]
    fn move_uses_right_gap_when_left_is_full() {
        let mut c = ctx(arch(1, 1), &[(10, 0, 0), (10, 10, 0), (10, 40, 0)]);
        let s = row_seg(&c, 0);
        assert!(c.try_move(id(2), 40, 0, s, 5, 0, s));
        assert_eq!(c.moves().records()[0].new_left, 20);
    }

    #[test]
    fn move_to_other_row_normalizes_orientation() {
        let mut c = ctx(arch(2, 1), &[(10, 0, 0)]);
        let (s0, s1) = (row_seg(&c, 0), row_seg(&c, 1));
        assert!(c.try_move(id(0), 0, 0, s0, 30, 10, s1));
        c.accept_move().unwrap();
        let n = c.network.node(id(0));
        assert_eq!((n.left, n.bottom, n.orient), (30, 10, Orientation::FS));
        assert_eq!(c.segments().cells_in(s1), &[id(0)]);
        assert!(c.segments().cells_in(s0).is_empty());
        assert_eq!(c.segments().segment(s1).util, 10);
    }

    #[test]
    fn move_rejects_wrong_row_bottom_and_stale_position() {
        let mut c = ctx(arch(2, 1), &[(10, 0, 0)]);
        let (s0, s1) = (row_seg(&c, 0), row_seg(&c, 1));
        assert!(!c.try_move(id(0), 0, 0, s0, 30, 12, s1));
        assert!(!c.try_move(id(0), 5, 0, s0, 30, 10, s1));
        assert!(c.moves().is_empty());
    }

    #[test]
    fn move_respects_edge_spacing() {
        let mut a = arch(1, 1);
        a.spacing_rules.push(EdgeSpacingRule {
            first: 1,
            second: 1,
            spacing: 3,
        });
        let mut nw = Network::new();
        nw.add_node(Node::new("a", 10, 10).at(0, 0).with_edge_types(1, 1));
        nw.add_node(Node::new("b", 10, 10).at(50, 0).with_edge_types(1, 1));
        let mut c =
            PlacementContext::new(a, nw, PlacementParams::default(), &DiagnosticSink::new());
        let s = row_seg(&c, 0);
        assert!(c.try_move(id(0), 0, 0, s, 50, 0, s));
        assert_eq!(c.moves().records()[0].new_left, 37);
    }

    #[test]
    fn move_beyond_displacement_limit_fails() {
        let nw = {
            let mut nw = Network::new();
            nw.add_node(Node::new("a", 10, 10).at(0, 0));
            nw
        };
        let params = PlacementParams {
            max_displacement_sites: 5,
            ..PlacementParams::default()
        };
        let mut c = PlacementContext::new(arch(1, 1), nw, params, &DiagnosticSink::new());
        let s = row_seg(&c, 0);
        assert!(!c.try_move(id(0), 0, 0, s, 30, 0, s));
        assert!(c.try_move(id(0), 0, 0, s, 5, 0, s));
    }

    fn placements(ctx: &PlacementContext) -> Vec<(i64, i64, Orientation)> {
        ctx.network.nodes.iter().map(|n| (n.left, n.bottom, n.orient)).collect()
    }

    fn fenced_arch() -> Architecture {
        let mut a = arch(1, 1);
        a.regions.push(Region {
            id: RegionId::from_raw(1),
            rects: vec![Rect::new(50, 0, 100, 10)],
        });
        a
    }

    #[test]
    fn region_mismatch_fails_without_mutation() {
        let mut c = ctx(fenced_arch(), &[(10, 0, 0), (10, 20, 0)]);
        let fence = c.segments().segments_in_row(0)[1];
        let home = seg_of(&c, id(0));
        let occupancy = c.segments().occupancy_snapshot();
        let positions = placements(&c);
        assert!(!c.try_move(id(0), 0, 0, home, 60, 0, fence));
        assert_eq!(c.segments().occupancy_snapshot(), occupancy);
        assert_eq!(placements(&c), positions);
        assert!(c.moves().is_empty());
    }

    #[test]
    fn swap_across_regions_fails_without_mutation() {
        let mut nw = Network::new();
        nw.add_node(Node::new("a", 10, 10).at(0, 0));
        nw.add_node(Node::new("b", 10, 10).at(60, 0).with_region(RegionId::from_raw(1)));
        let sink = DiagnosticSink::new();
        let mut c = PlacementContext::new(fenced_arch(), nw, PlacementParams::default(), &sink);
        let fence = seg_of(&c, id(1));
        let occupancy = c.segments().occupancy_snapshot();
        let positions = placements(&c);
        assert!(!c.try_swap(id(0), 0, 0, seg_of(&c, id(0)), 60, 0, fence));
        assert_eq!(c.segments().occupancy_snapshot(), occupancy);
        assert_eq!(placements(&c), positions);
        assert!(c.moves().is_empty());
    }

    #[test]
    fn non_adjacent_swap_across_rows() {
        let mut c = ctx(arch(2, 1), &[(10, 0, 0), (10, 50, 0), (10, 20, 10)]);
        let (s0, s1) = (row_seg(&c, 0), row_seg(&c, 1));
        assert!(c.try_swap(id(0), 0, 0, s0, 20, 10, s1));
        let recs = c.moves().records().to_vec();
        assert_eq!(recs.len(), 2);
        c.accept_move().unwrap();
        let a = c.network.node(id(0));
        let b = c.network.node(id(2));
        assert_eq!((a.left, a.bottom), (20, 10));
        assert_eq!((b.left, b.bottom), (0, 0));
        assert_eq!(b.orient, Orientation::N);
        assert_eq!(a.orient, Orientation::FS);
    }

    #[test]
    fn adjacent_swap_packs_pair() {
        let mut c = ctx(arch(1, 1), &[(10, 0, 0), (20, 10, 0), (10, 30, 0)]);
        let s = row_seg(&c, 0);
        assert!(c.try_swap(id(0), 0, 0, s, 10, 0, s));
        c.accept_move().unwrap();
        assert_eq!(c.network.node(id(1)).left, 0);
        assert_eq!(c.network.node(id(0)).left, 20);
        assert_eq!(c.segments().cells_in(s), &[id(1), id(0), id(2)]);
    }

    #[test]
    fn swap_with_self_fails() {
        let mut c = ctx(arch(1, 1), &[(10, 0, 0)]);
        let s = row_seg(&c, 0);
        let occupancy = c.segments().occupancy_snapshot();
        let positions = placements(&c);
        assert!(!c.try_swap(id(0), 0, 0, s, 0, 0, s));
        assert_eq!(c.segments().occupancy_snapshot(), occupancy);
        assert_eq!(placements(&c), positions);
        assert!(c.moves().is_empty());
    }

    #[test]
    fn relocate_batch_swaps_equal_cells() {
        let mut c = ctx(arch(1, 1), &[(10, 0, 0), (10, 50, 0)]);
        let s = row_seg(&c, 0);
        let a = c.make_record(id(0), 50, s).unwrap();
        let b = c.make_record(id(1), 0, s).unwrap();
        c.relocate_batch(&[a, b]).unwrap();
        assert_eq!(c.segments().cells_in(s), &[id(1), id(0)]);
    }
}
