//! Rows, fence regions and edge spacing rules.

use crate::ids::RegionId;
use crate::orient::Orientation;
use crate::rect::Rect;
use serde::{Deserialize, Serialize};

/// A horizontal placement row: a run of equally spaced sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Bottom y-coordinate shared by every cell placed in the row.
    pub bottom: i64,
    /// Row height; single-height cells are exactly this tall.
    pub height: i64,
    /// Site pitch.
    pub site_width: i64,
    /// X-coordinate of the first site.
    pub min_x: i64,
    /// Number of sites in the row.
    pub num_sites: i64,
    /// Orientation cells must take in this row.
    #[serde(default)]
    pub orient: Orientation,
}

impl Row {
    /// Right end of the last site.
    pub fn max_x(&self) -> i64 {
        self.min_x + self.num_sites * self.site_width
    }

    /// Top y-coordinate.
    pub fn top(&self) -> i64 {
        self.bottom + self.height
    }

    /// Returns `true` if `x` falls exactly on a site boundary of this row.
    pub fn is_site_aligned(&self, x: i64) -> bool {
        self.site_width > 0 && (x - self.min_x).rem_euclid(self.site_width) == 0
    }

    /// Snaps `x` down to the nearest site boundary at or left of it.
    pub fn snap_down(&self, x: i64) -> i64 {
        if self.site_width <= 0 {
            return x;
        }
        self.min_x + (x - self.min_x).div_euclid(self.site_width) * self.site_width
    }
}

/// A fence region: cells assigned to it may only sit inside its rectangles,
/// and no other cell may sit there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Region identifier; never [`RegionId::DEFAULT`].
    pub id: RegionId,
    /// The rectangles making up the region.
    pub rects: Vec<Rect>,
}

impl Region {
    /// Returns the x-intervals of this region that span the full height of
    /// `row`, sorted and merged.
    pub fn row_intervals(&self, row: &Row) -> Vec<(i64, i64)> {
        let mut spans: Vec<(i64, i64)> = self
            .rects
            .iter()
            .filter(|r| r.ymin <= row.bottom && r.ymax >= row.top())
            .map(|r| (r.xmin.max(row.min_x), r.xmax.min(row.max_x())))
            .filter(|(lo, hi)| lo < hi)
            .collect();
        merge_intervals(&mut spans);
        spans
    }
}

/// Minimum spacing between the facing edges of two abutting cells, keyed by
/// the cells' edge types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpacingRule {
    /// Edge type on one side.
    pub first: u32,
    /// Edge type on the other side.
    pub second: u32,
    /// Required gap.
    pub spacing: i64,
}

impl EdgeSpacingRule {
    /// Returns `true` if this rule applies to the two edge types, in either order.
    pub fn matches(&self, a: u32, b: u32) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }
}

/// Sorts half-open intervals and merges any that touch or overlap.
pub fn merge_intervals(spans: &mut Vec<(i64, i64)>) {
    spans.sort_unstable();
    let mut merged: Vec<(i64, i64)> = Vec::with_capacity(spans.len());
    for &(lo, hi) in spans.iter() {
        match merged.last_mut() {
            Some(last) if lo <= last.1 => last.1 = last.1.max(hi),
            _ => merged.push((lo, hi)),
        }
    }
    *spans = merged;
}
