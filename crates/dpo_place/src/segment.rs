//! Row segments and their occupancy lists.
//!
//! A segment is a contiguous run of sites inside one row belonging to one
//! region. Each segment keeps the nodes placed in it sorted by left x, plus
//! its utilization (sum of occupant widths). A reverse map records which
//! segments every node occupies; single-height cells occupy exactly one,
//! multi-height cells one per spanned row.

use crate::log;
use dpo_arch::types::merge_intervals;
use dpo_arch::{Architecture, RegionId};
use dpo_common::{define_id, DpoResult, InternalError};
use dpo_diagnostics::{Diagnostic, DiagnosticSink};
use dpo_network::{Network, NodeId, NodeKind};

define_id!(
    /// Opaque, copyable ID for a row segment.
    SegmentId
);

/// A contiguous span of sites within one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Arena index.
    pub id: SegmentId,
    /// Index of the row in [`Architecture::rows`].
    pub row: usize,
    /// Region every occupant must belong to.
    pub region: RegionId,
    /// Left end.
    pub min_x: i64,
    /// Right end.
    pub max_x: i64,
    /// Sum of occupant widths.
    pub util: i64,
}

impl Segment {
    /// Width of the segment.
    pub fn width(&self) -> i64 {
        self.max_x - self.min_x
    }

    /// Returns `true` if `x` lies within the segment's bounds.
    pub fn contains_x(&self, x: i64) -> bool {
        x >= self.min_x && x <= self.max_x
    }
}

/// All segments of a design with their occupancy.
#[derive(Debug, Clone, Default)]
pub struct SegmentTable {
    segments: Vec<Segment>,
    cells: Vec<Vec<NodeId>>,
    segs_in_row: Vec<Vec<SegmentId>>,
    reverse: Vec<Vec<SegmentId>>,
}

impl SegmentTable {
    /// Splits every row into segments.
    ///
    /// A row loses the spans covered by fixed nodes; what remains is divided
    /// between the fence regions whose rectangles span the row's full height
    /// and the default region. Pieces narrower than one site are dropped.
    pub fn build(arch: &Architecture, network: &Network) -> Self {
        let mut table = SegmentTable {
            segs_in_row: vec![Vec::new(); arch.rows.len()],
            reverse: vec![Vec::new(); network.node_count()],
            ..Default::default()
        };

        for (r, row) in arch.rows.iter().enumerate() {
            let mut blocked: Vec<(i64, i64)> = network
                .nodes
                .iter()
                .filter(|n| n.kind == NodeKind::Fixed && n.width > 0)
                .filter(|n| n.bottom < row.top() && n.top() > row.bottom)
                .map(|n| (n.left, n.right()))
                .collect();
            merge_intervals(&mut blocked);
            let free = subtract(&[(row.min_x, row.max_x())], &blocked);

            let mut pieces: Vec<(i64, i64, RegionId)> = Vec::new();
            let mut claimed: Vec<(i64, i64)> = Vec::new();
            for region in &arch.regions {
                let spans = region.row_intervals(row);
                for (lo, hi) in intersect(&free, &spans) {
                    pieces.push((lo, hi, region.id));
                }
                claimed.extend(spans);
            }
            merge_intervals(&mut claimed);
            for (lo, hi) in subtract(&free, &claimed) {
                pieces.push((lo, hi, RegionId::DEFAULT));
            }

            pieces.retain(|&(lo, hi, _)| hi - lo >= row.site_width);
            pieces.sort_by_key(|&(lo, _, _)| lo);
            for (lo, hi, region) in pieces {
                let id = SegmentId::from_raw(table.segments.len() as u32);
                table.segments.push(Segment {
                    id,
                    row: r,
                    region,
                    min_x: lo,
                    max_x: hi,
                    util: 0,
                });
                table.cells.push(Vec::new());
                table.segs_in_row[r].push(id);
            }
        }
        table
    }

    /// Places every movable node into the segments it currently sits in.
    ///
    /// Returns the single-height and multi-height nodes that were assigned.
    /// Nodes that fit no segment are reported and left out; they are never
    /// offered to a move generator.
    pub fn assign(
        &mut self,
        arch: &Architecture,
        network: &Network,
        sink: &DiagnosticSink,
    ) -> (Vec<NodeId>, Vec<NodeId>) {
        let row_height = arch.row_height();
        let mut single = Vec::new();
        let mut multi = Vec::new();

        for node in network.nodes.iter().filter(|n| n.is_movable()) {
            if node.height <= row_height {
                let row = arch
                    .row_at(node.bottom)
                    .or_else(|| arch.find_closest_row(node.bottom));
                let seg = row.and_then(|r| {
                    self.closest_segment(r, node.region, node.left + node.width / 2)
                });
                match seg {
                    Some(seg) => {
                        self.insert(network, seg, node.id);
                        single.push(node.id);
                    }
                    None => report_unassigned(sink, &node.name),
                }
                continue;
            }

            let spanned = if row_height > 0 {
                (node.height + row_height - 1) / row_height
            } else {
                0
            };
            let first = arch.row_at(node.bottom);
            let segs: Option<Vec<SegmentId>> = first.and_then(|r0| {
                (r0..r0 + spanned as usize)
                    .map(|r| {
                        self.segs_in_row.get(r)?.iter().copied().find(|&s| {
                            let seg = &self.segments[s.index()];
                            seg.region == node.region
                                && seg.min_x <= node.left
                                && seg.max_x >= node.right()
                        })
                    })
                    .collect()
            });
            match segs {
                Some(segs) if !segs.is_empty() => {
                    for seg in segs {
                        self.insert(network, seg, node.id);
                    }
                    multi.push(node.id);
                }
                _ => report_unassigned(sink, &node.name),
            }
        }
        (single, multi)
    }

    /// The segment in `row` of `region` containing `x`, or the nearest one.
    fn closest_segment(&self, row: usize, region: RegionId, x: i64) -> Option<SegmentId> {
        self.segs_in_row
            .get(row)?
            .iter()
            .copied()
            .filter(|&s| self.segments[s.index()].region == region)
            .min_by_key(|&s| {
                let seg = &self.segments[s.index()];
                if x < seg.min_x {
                    seg.min_x - x
                } else if x >= seg.max_x {
                    x - seg.max_x + 1
                } else {
                    0
                }
            })
    }

    /// All segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the segment with the given ID.
    pub fn segment(&self, id: SegmentId) -> &Segment {
        &self.segments[id.index()]
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if there are no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Occupants of a segment, sorted by left x.
    pub fn cells_in(&self, id: SegmentId) -> &[NodeId] {
        &self.cells[id.index()]
    }

    /// Segments of a row, sorted by left end.
    pub fn segments_in_row(&self, row: usize) -> &[SegmentId] {
        self.segs_in_row.get(row).map_or(&[], |v| v.as_slice())
    }

    /// Segments a node occupies.
    pub fn segments_of(&self, node: NodeId) -> &[SegmentId] {
        self.reverse.get(node.index()).map_or(&[], |v| v.as_slice())
    }

    /// The first segment in `row` whose span contains `x`.
    ///
    /// Linear in the number of segments in the row.
    pub fn find_in_row(&self, row: usize, x: i64) -> Option<SegmentId> {
        self.segments_in_row(row)
            .iter()
            .copied()
            .find(|&s| self.segments[s.index()].contains_x(x))
    }

    /// Inserts a node into a segment, keeping the list sorted by left x.
    pub fn insert(&mut self, network: &Network, seg: SegmentId, node: NodeId) {
        let left = network.node(node).left;
        let list = &mut self.cells[seg.index()];
        let at = list.partition_point(|&c| network.node(c).left <= left);
        list.insert(at, node);
        self.segments[seg.index()].util += network.node(node).width;
        self.reverse[node.index()].push(seg);
    }

    /// Removes a node from a segment.
    pub fn remove(&mut self, network: &Network, seg: SegmentId, node: NodeId) -> DpoResult<()> {
        let list = &mut self.cells[seg.index()];
        let at = list.iter().position(|&c| c == node).ok_or_else(|| {
            InternalError::new(format!("node {node} is not in segment {seg}"))
        })?;
        list.remove(at);
        self.segments[seg.index()].util -= network.node(node).width;
        self.reverse[node.index()].retain(|&s| s != seg);
        Ok(())
    }

    /// Re-sorts every occupancy list by left x and recomputes utilization.
    pub fn resort(&mut self, network: &Network) {
        for (seg, list) in self.segments.iter_mut().zip(self.cells.iter_mut()) {
            list.sort_by_key(|&c| network.node(c).left);
            seg.util = list.iter().map(|&c| network.node(c).width).sum();
        }
    }

    /// Copy of every occupancy list, indexed by segment.
    pub fn occupancy_snapshot(&self) -> Vec<Vec<NodeId>> {
        self.cells.clone()
    }
}

fn report_unassigned(sink: &DiagnosticSink, name: &str) {
    sink.emit(
        Diagnostic::warning(
            log::code(log::UNASSIGNED),
            format!("Cell {name} does not fit any segment and will not be moved"),
        )
        .with_note("the cell is outside its region or not aligned to a row"),
    );
}

/// `spans` minus `cuts`; both sorted and non-overlapping.
fn subtract(spans: &[(i64, i64)], cuts: &[(i64, i64)]) -> Vec<(i64, i64)> {
    let mut out = Vec::new();
    for &(lo, hi) in spans {
        let mut start = lo;
        for &(clo, chi) in cuts {
            if chi <= start || clo >= hi {
                continue;
            }
            if clo > start {
                out.push((start, clo));
            }
            start = start.max(chi);
        }
        if start < hi {
            out.push((start, hi));
        }
    }
    out
}

/// Pairwise intersection of two sorted interval lists.
fn intersect(a: &[(i64, i64)], b: &[(i64, i64)]) -> Vec<(i64, i64)> {
    let mut out = Vec::new();
    for &(alo, ahi) in a {
        for &(blo, bhi) in b {
            let lo = alo.max(blo);
            let hi = ahi.min(bhi);
            if lo < hi {
                out.push((lo, hi));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpo_arch::{Orientation, Rect, Region, Row};
    use dpo_network::Node;

    fn arch() -> Architecture {
        let rows = (0..2)
            .map(|i| Row {
                bottom: i * 10,
                height: 10,
                site_width: 1,
                min_x: 0,
                num_sites: 100,
                orient: Orientation::N,
            })
            .collect();
        Architecture::new(Rect::new(0, 0, 100, 20), rows)
    }

    #[test]
    fn interval_helpers() {
        assert_eq!(
            subtract(&[(0, 100)], &[(10, 20), (50, 60)]),
            vec![(0, 10), (20, 50), (60, 100)]
        );
        assert!(subtract(&[(0, 10)], &[(0, 10)]).is_empty());
        assert_eq!(intersect(&[(0, 50), (60, 100)], &[(40, 70)]), vec![(40, 50), (60, 70)]);
    }

    #[test]
    fn fixed_cells_split_rows() {
        let mut nw = Network::new();
        nw.add_node(Node::new("blk", 20, 20).at(40, 0).with_kind(NodeKind::Fixed));
        let table = SegmentTable::build(&arch(), &nw);
        assert_eq!(table.len(), 4);
        let spans: Vec<(i64, i64)> = table
            .segments_in_row(1)
            .iter()
            .map(|&s| (table.segment(s).min_x, table.segment(s).max_x))
            .collect();
        assert_eq!(spans, vec![(0, 40), (60, 100)]);
    }

    #[test]
    fn fence_region_claims_span() {
        let mut a = arch();
        a.regions.push(Region {
            id: RegionId::from_raw(1),
            rects: vec![Rect::new(30, 0, 70, 10)],
        });
        let table = SegmentTable::build(&a, &Network::new());
        let row0: Vec<(i64, i64, u32)> = table
            .segments_in_row(0)
            .iter()
            .map(|&s| {
                let seg = table.segment(s);
                (seg.min_x, seg.max_x, seg.region.as_raw())
            })
            .collect();
        assert_eq!(row0, vec![(0, 30, 0), (30, 70, 1), (70, 100, 0)]);
        assert_eq!(table.segments_in_row(1).len(), 1);
        assert_eq!(table.find_in_row(0, 30), Some(table.segments_in_row(0)[0]));
        assert_eq!(table.find_in_row(0, 31), Some(table.segments_in_row(0)[1]));
    }

    #[test]
    fn assign_sorts_and_tracks_util() {
        let a = arch();
        let mut nw = Network::new();
        let b = nw.add_node(Node::new("b", 5, 10).at(40, 0));
        let c = nw.add_node(Node::new("c", 5, 10).at(10, 0));
        let m = nw.add_node(Node::new("m", 4, 20).at(80, 0));
        let t = nw.add_node(Node::new("t", 0, 0).at(0, 0).with_kind(NodeKind::Terminal));
        let mut table = SegmentTable::build(&a, &nw);
        let sink = DiagnosticSink::new();
        let (single, multi) = table.assign(&a, &nw, &sink);
        assert_eq!(single, vec![b, c]);
        assert_eq!(multi, vec![m]);
        assert!(table.segments_of(t).is_empty());
        let s0 = table.segments_in_row(0)[0];
        assert_eq!(table.cells_in(s0), &[c, b, m]);
        assert_eq!(table.segment(s0).util, 14);
        assert_eq!(table.segments_of(m).len(), 2);
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn unplaceable_cell_is_reported() {
        let mut a = arch();
        a.regions.push(Region {
            id: RegionId::from_raw(3),
            rects: vec![Rect::new(200, 0, 300, 20)],
        });
        let mut nw = Network::new();
        nw.add_node(Node::new("lost", 5, 10).at(0, 0).with_region(RegionId::from_raw(3)));
        let mut table = SegmentTable::build(&a, &nw);
        let sink = DiagnosticSink::new();
        let (single, _) = table.assign(&a, &nw, &sink);
        assert!(single.is_empty());
        assert_eq!(sink.diagnostics().len(), 1);
    }

    #[test]
    fn remove_missing_is_internal_error() {
        let a = arch();
        let mut nw = Network::new();
        let n = nw.add_node(Node::new("n", 5, 10).at(0, 0));
        let mut table = SegmentTable::build(&a, &nw);
        let s1 = table.segments_in_row(1)[0];
        assert!(table.remove(&nw, s1, n).is_err());
    }

    #[test]
    fn resort_orders_by_left() {
        let a = arch();
        let mut nw = Network::new();
        let x = nw.add_node(Node::new("x", 5, 10).at(0, 0));
        let y = nw.add_node(Node::new("y", 5, 10).at(20, 0));
        let mut table = SegmentTable::build(&a, &nw);
        table.assign(&a, &nw, &DiagnosticSink::new());
        nw.node_mut(x).left = 50;
        table.resort(&nw);
        let s0 = table.segments_in_row(0)[0];
        assert_eq!(table.cells_in(s0), &[y, x]);
        assert_eq!(table.segment(s0).util, 10);
    }
}
