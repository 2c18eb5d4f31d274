//! Post-optimization legality checks.
//!
//! The checks only report; a failed check never aborts a run.

use crate::context::PlacementContext;
use crate::log;
use dpo_arch::RegionId;
use dpo_diagnostics::{Diagnostic, DiagnosticSink};
use dpo_network::{Node, NodeId};
use serde::Serialize;

/// Most offending cells listed under a failed check.
const MAX_NOTES: usize = 10;

/// Outcome of one legality check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Short check name.
    pub name: &'static str,
    /// Number of violations found.
    pub violations: usize,
}

impl PlacementContext {
    /// Every assigned movable cell lies inside segments of its own region.
    pub fn check_region_assignment(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (id, node) in self.movable() {
            for &s in self.segments.segments_of(id) {
                let seg = self.segments.segment(s);
                if seg.region != node.region {
                    out.push(format!(
                        "{} of region {} sits in a segment of region {}",
                        node.name,
                        region_name(node.region),
                        region_name(seg.region)
                    ));
                } else if node.left < seg.min_x || node.right() > seg.max_x {
                    out.push(format!(
                        "{} spans [{}, {}) outside its segment [{}, {})",
                        node.name,
                        node.left,
                        node.right(),
                        seg.min_x,
                        seg.max_x
                    ));
                }
            }
        }
        out
    }

    /// Every movable cell's bottom is a row bottom.
    pub fn check_row_alignment(&self) -> Vec<String> {
        self.movable()
            .filter(|(_, n)| self.arch.row_at(n.bottom).is_none())
            .map(|(_, n)| format!("{} at y={} is not on a row", n.name, n.bottom))
            .collect()
    }

    /// Every movable cell on a row starts on a site of that row.
    pub fn check_site_alignment(&self) -> Vec<String> {
        self.movable()
            .filter_map(|(_, n)| {
                let row = &self.arch.rows[self.arch.row_at(n.bottom)?];
                (!row.is_site_aligned(n.left))
                    .then(|| format!("{} at x={} is off the site grid", n.name, n.left))
            })
            .collect()
    }

    /// No two occupants of a segment overlap.
    pub fn check_overlap_in_segments(&self) -> Vec<String> {
        self.neighbour_pairs()
            .filter(|(a, b)| a.right() > b.left)
            .map(|(a, b)| format!("{} overlaps {}", a.name, b.name))
            .collect()
    }

    /// Neighbouring occupants keep the spacing their edge types require.
    pub fn check_edge_spacing_in_segments(&self) -> Vec<String> {
        self.neighbour_pairs()
            .filter_map(|(a, b)| {
                let spacing = self.arch.cell_spacing(a.right_edge_type, b.left_edge_type);
                let gap = b.left - a.right();
                (spacing > 0 && gap < spacing).then(|| {
                    format!("{} and {} are {gap} apart, need {spacing}", a.name, b.name)
                })
            })
            .collect()
    }

    /// Runs all five checks, logging each result.
    pub fn run_checks(&self, sink: &DiagnosticSink) -> Vec<CheckReport> {
        let checks: [(&'static str, u16, Vec<String>); 5] = [
            ("region", log::CHECK_REGION, self.check_region_assignment()),
            ("row", log::CHECK_ROW, self.check_row_alignment()),
            ("site", log::CHECK_SITE, self.check_site_alignment()),
            ("overlap", log::CHECK_OVERLAP, self.check_overlap_in_segments()),
            ("spacing", log::CHECK_SPACING, self.check_edge_spacing_in_segments()),
        ];
        checks
            .into_iter()
            .map(|(name, id, violations)| {
                if violations.is_empty() {
                    sink.emit(Diagnostic::info(
                        log::code(id),
                        format!("Check {name} passed"),
                    ));
                } else {
                    let mut diag = Diagnostic::error(
                        log::code(id),
                        format!("Check {name} failed with {} violations", violations.len()),
                    );
                    for v in violations.iter().take(MAX_NOTES) {
                        diag = diag.with_note(v.clone());
                    }
                    sink.emit(diag);
                }
                CheckReport {
                    name,
                    violations: violations.len(),
                }
            })
            .collect()
    }

    fn movable(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.network
            .nodes
            .iter()
            .filter(|n| n.is_movable())
            .map(|n| (n.id, n))
    }

    /// Consecutive occupants of every segment, in x order.
    fn neighbour_pairs(&self) -> impl Iterator<Item = (&Node, &Node)> + '_ {
        self.segments.segments().iter().flat_map(move |seg| {
            let mut cells: Vec<&Node> = self
                .segments
                .cells_in(seg.id)
                .iter()
                .map(|&c| self.network.node(c))
                .collect();
            cells.sort_by_key(|n| n.left);
            let pairs: Vec<(&Node, &Node)> = cells.windows(2).map(|w| (w[0], w[1])).collect();
            pairs
        })
    }
}

fn region_name(id: RegionId) -> String {
    if id.is_default() {
        "default".to_string()
    } else {
        id.to_string()
    }
}
