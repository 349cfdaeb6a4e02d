use crate::types::{Point, Value};

/// One piece of a level curve inside a single grid cell.
///
/// Segments are not stitched across cells. Rendering all of them side by side is what makes
/// the contour look continuous.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// First endpoint, in fractional grid units (`x` = column, `y` = row).
    pub start: Point,
    /// Second endpoint, in fractional grid units.
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Returns `true` when all four coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.start.x.is_finite()
            && self.start.y.is_finite()
            && self.end.x.is_finite()
            && self.end.y.is_finite()
    }

    /// Returns the segment with both endpoints multiplied by `cell_size`.
    ///
    /// Use this to go from grid units to pixels before drawing.
    pub fn scaled(&self, cell_size: Value) -> Self {
        Self {
            start: self.start * cell_size,
            end: self.end * cell_size,
        }
    }
}
