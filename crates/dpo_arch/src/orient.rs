//! Standard-cell orientations.

use serde::{Deserialize, Serialize};

/// Orientation of a standard cell, restricted to the four orientations that
/// keep a cell's height vertical.
///
/// Pin offsets are stored for [`N`](Orientation::N) and mapped through
/// [`transform_offset`](Self::transform_offset) for the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// North (as drawn).
    #[default]
    N,
    /// South (rotated 180 degrees).
    S,
    /// Flipped north (mirrored about the vertical axis).
    FN,
    /// Flipped south (mirrored about the horizontal axis).
    FS,
}

impl Orientation {
    /// Returns `true` if the cell is upside down relative to [`N`](Self::N).
    pub fn is_flipped_vertically(self) -> bool {
        matches!(self, Orientation::S | Orientation::FS)
    }

    /// Returns `true` if the cell is mirrored left-to-right relative to [`N`](Self::N).
    pub fn is_mirrored_horizontally(self) -> bool {
        matches!(self, Orientation::S | Orientation::FN)
    }

    /// Returns the orientation a cell must take in a row of orientation `row`.
    ///
    /// Cells already compatible with the row keep their orientation; others
    /// have their vertical flip toggled and keep their horizontal mirroring.
    pub fn for_row(self, row: Orientation) -> Orientation {
        if self.is_flipped_vertically() == row.is_flipped_vertically() {
            return self;
        }
        match self {
            Orientation::N => Orientation::FS,
            Orientation::FS => Orientation::N,
            Orientation::FN => Orientation::S,
            Orientation::S => Orientation::FN,
        }
    }

    /// The same orientation mirrored left-to-right; row compatibility is kept.
    pub fn flip_horizontal(self) -> Orientation {
        match self {
            Orientation::N => Orientation::FN,
            Orientation::FN => Orientation::N,
            Orientation::S => Orientation::FS,
            Orientation::FS => Orientation::S,
        }
    }

    /// Maps a pin offset given for `N` into this orientation for a cell of
    /// size `width` x `height`.
    pub fn transform_offset(self, dx: i64, dy: i64, width: i64, height: i64) -> (i64, i64) {
        let x = if self.is_mirrored_horizontally() {
            width - dx
        } else {
            dx
        };
        let y = if self.is_flipped_vertically() {
            height - dy
        } else {
            dy
        };
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_flip_keeps_row_fit() {
        for o in [Orientation::N, Orientation::S, Orientation::FN, Orientation::FS] {
            let f = o.flip_horizontal();
            assert_ne!(f, o);
            assert_eq!(f.flip_horizontal(), o);
            assert_eq!(f.is_flipped_vertically(), o.is_flipped_vertically());
        }
    }

    #[test]
    fn row_compatibility() {
        assert_eq!(Orientation::N.for_row(Orientation::N), Orientation::N);
        assert_eq!(Orientation::FN.for_row(Orientation::N), Orientation::FN);
        assert_eq!(Orientation::N.for_row(Orientation::FS), Orientation::FS);
        assert_eq!(Orientation::FN.for_row(Orientation::FS), Orientation::S);
        assert_eq!(Orientation::S.for_row(Orientation::N), Orientation::FN);
    }

    #[test]
    fn offsets() {
        assert_eq!(Orientation::N.transform_offset(2, 3, 10, 12), (2, 3));
        assert_eq!(Orientation::FN.transform_offset(2, 3, 10, 12), (8, 3));
        assert_eq!(Orientation::FS.transform_offset(2, 3, 10, 12), (2, 9));
        assert_eq!(Orientation::S.transform_offset(2, 3, 10, 12), (8, 9));
    }
}
