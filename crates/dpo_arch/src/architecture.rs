//! The immutable architecture description.

use crate::ids::RegionId;
use crate::rect::Rect;
use crate::types::{EdgeSpacingRule, Region, Row};
use serde::{Deserialize, Serialize};

/// Die outline, rows, fence regions and spacing rules.
///
/// Rows are kept sorted by bottom coordinate; build through
/// [`Architecture::new`] or call [`sort_rows`](Self::sort_rows) after
/// deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Architecture {
    /// The die outline. Candidate targets are clipped to it.
    pub die: Rect,
    /// Placement rows, sorted by bottom.
    pub rows: Vec<Row>,
    /// Fence regions (the default region is implicit).
    #[serde(default)]
    pub regions: Vec<Region>,
    /// Edge-type spacing rules.
    #[serde(default)]
    pub spacing_rules: Vec<EdgeSpacingRule>,
}

impl Architecture {
    /// Creates an architecture with no fences and no spacing rules.
    pub fn new(die: Rect, rows: Vec<Row>) -> Self {
        let mut arch = Self {
            die,
            rows,
            regions: Vec::new(),
            spacing_rules: Vec::new(),
        };
        arch.sort_rows();
        arch
    }

    /// Sorts rows by bottom coordinate.
    pub fn sort_rows(&mut self) {
        self.rows.sort_by_key(|r| r.bottom);
    }

    /// Height of a single row, or 0 when there are no rows.
    pub fn row_height(&self) -> i64 {
        self.rows.first().map_or(0, |r| r.height)
    }

    /// Site pitch of the first row, or 0 when there are no rows.
    pub fn site_width(&self) -> i64 {
        self.rows.first().map_or(0, |r| r.site_width)
    }

    /// Returns the index of the row whose bottom is closest to `y`.
    pub fn find_closest_row(&self, y: i64) -> Option<usize> {
        if self.rows.is_empty() {
            return None;
        }
        let above = self.rows.partition_point(|r| r.bottom <= y);
        if above == 0 {
            return Some(0);
        }
        if above == self.rows.len() {
            return Some(above - 1);
        }
        let below = above - 1;
        if y - self.rows[below].bottom <= self.rows[above].bottom - y {
            Some(below)
        } else {
            Some(above)
        }
    }

    /// Returns the index of the row whose bottom is exactly `y`.
    pub fn row_at(&self, y: i64) -> Option<usize> {
        self.rows.binary_search_by_key(&y, |r| r.bottom).ok()
    }

    /// Returns the fence region with the given id.
    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// Minimum gap required between a cell whose right edge has type
    /// `left_cell_right_edge` and a cell to its right whose left edge has
    /// type `right_cell_left_edge`.
    pub fn cell_spacing(&self, left_cell_right_edge: u32, right_cell_left_edge: u32) -> i64 {
        self.spacing_rules
            .iter()
            .filter(|rule| rule.matches(left_cell_right_edge, right_cell_left_edge))
            .map(|rule| rule.spacing)
            .max()
            .unwrap_or(0)
    }
}
