//! Axis-aligned integer rectangles.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle with inclusive integer bounds.
///
/// Used for per-edge bounding boxes, the "optimal region" a move searches
/// toward, fence-region shapes and the die outline. [`reset`](Self::reset)
/// puts the rectangle in an inverted state so the first
/// [`add_pt`](Self::add_pt) or [`enlarge`](Self::enlarge) initializes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Left bound.
    pub xmin: i64,
    /// Bottom bound.
    pub ymin: i64,
    /// Right bound.
    pub xmax: i64,
    /// Top bound.
    pub ymax: i64,
}

impl Rect {
    /// Creates a rectangle from its bounds.
    pub fn new(xmin: i64, ymin: i64, xmax: i64, ymax: i64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Creates a rectangle in the inverted "empty" state.
    pub fn empty() -> Self {
        let mut r = Self::new(0, 0, 0, 0);
        r.reset();
        r
    }

    /// Inverts the bounds so any subsequent point initializes the rectangle.
    pub fn reset(&mut self) {
        self.xmin = i64::MAX;
        self.ymin = i64::MAX;
        self.xmax = i64::MIN;
        self.ymax = i64::MIN;
    }

    /// Returns `true` if no point has been added since the last reset.
    pub fn is_empty(&self) -> bool {
        self.xmin > self.xmax || self.ymin > self.ymax
    }

    /// Expands the rectangle to contain the point.
    pub fn add_pt(&mut self, x: i64, y: i64) {
        self.xmin = self.xmin.min(x);
        self.xmax = self.xmax.max(x);
        self.ymin = self.ymin.min(y);
        self.ymax = self.ymax.max(y);
    }

    /// Expands the rectangle to contain `other`.
    pub fn enlarge(&mut self, other: &Rect) {
        self.xmin = self.xmin.min(other.xmin);
        self.xmax = self.xmax.max(other.xmax);
        self.ymin = self.ymin.min(other.ymin);
        self.ymax = self.ymax.max(other.ymax);
    }

    /// Returns `true` if the two rectangles share at least one point.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.xmax < other.xmin
            || other.xmax < self.xmin
            || self.ymax < other.ymin
            || other.ymax < self.ymin)
    }

    /// Returns `true` if `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &Rect) -> bool {
        other.xmin >= self.xmin
            && other.xmax <= self.xmax
            && other.ymin >= self.ymin
            && other.ymax <= self.ymax
    }

    /// Returns `true` if the point lies inside this rectangle.
    pub fn contains_pt(&self, x: i64, y: i64) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }

    /// Clips this rectangle to `bounds`. The result may be empty.
    pub fn clamp_to(&mut self, bounds: &Rect) {
        self.xmin = self.xmin.max(bounds.xmin);
        self.xmax = self.xmax.min(bounds.xmax);
        self.ymin = self.ymin.max(bounds.ymin);
        self.ymax = self.ymax.min(bounds.ymax);
    }

    /// Horizontal extent. Negative for an empty rectangle.
    pub fn width(&self) -> i64 {
        self.xmax.saturating_sub(self.xmin)
    }

    /// Vertical extent. Negative for an empty rectangle.
    pub fn height(&self) -> i64 {
        self.ymax.saturating_sub(self.ymin)
    }

    /// Horizontal center.
    pub fn center_x(&self) -> f64 {
        0.5 * (self.xmin as f64 + self.xmax as f64)
    }

    /// Vertical center.
    pub fn center_y(&self) -> f64 {
        0.5 * (self.ymin as f64 + self.ymax as f64)
    }

    /// Sets the left bound.
    pub fn set_xmin(&mut self, v: i64) {
        self.xmin = v;
    }

    /// Sets the bottom bound.
    pub fn set_ymin(&mut self, v: i64) {
        self.ymin = v;
    }

    /// Sets the right bound.
    pub fn set_xmax(&mut self, v: i64) {
        self.xmax = v;
    }

    /// Sets the top bound.
    pub fn set_ymax(&mut self, v: i64) {
        self.ymax = v;
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_then_first_point_initializes() {
        let mut r = Rect::new(-5, -5, 5, 5);
        r.reset();
        assert!(r.is_empty());
        r.add_pt(3, 7);
        assert_eq!(r, Rect::new(3, 7, 3, 7));
        assert_eq!(r.width(), 0);
        r.add_pt(-1, 10);
        assert_eq!(r, Rect::new(-1, 7, 3, 10));
    }

    #[test]
    fn enlarge_from_empty() {
        let mut r = Rect::empty();
        r.enlarge(&Rect::new(0, 0, 10, 20));
        r.enlarge(&Rect::new(5, -3, 12, 4));
        assert_eq!(r, Rect::new(0, -3, 12, 20));
        assert_eq!(r.height(), 23);
    }

    #[test]
    fn intersects_and_contains() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 10, 20, 20);
        let c = Rect::new(11, 0, 20, 5);
        let d = Rect::new(2, 2, 8, 8);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(a.contains(&d));
        assert!(!d.contains(&a));
        assert!(a.contains_pt(10, 0));
        assert!(!a.contains_pt(11, 0));
    }

    #[test]
    fn clamp_can_empty() {
        let mut r = Rect::new(50, 0, 60, 5);
        r.clamp_to(&Rect::new(0, 0, 40, 40));
        assert!(r.is_empty());

        let mut s = Rect::new(-10, -10, 30, 30);
        s.clamp_to(&Rect::new(0, 0, 20, 20));
        assert_eq!(s, Rect::new(0, 0, 20, 20));
        assert_eq!(s.center_x(), 10.0);
    }

    #[test]
    fn setters() {
        let mut r = Rect::new(0, 0, 1, 1);
        r.set_xmin(-2);
        r.set_ymin(-3);
        r.set_xmax(4);
        r.set_ymax(5);
        assert_eq!(r, Rect::new(-2, -3, 4, 5));
    }
}
