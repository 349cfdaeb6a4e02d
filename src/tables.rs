//! Marching squares lookup tables.
//!
//! Corners and edges of a cell are numbered as follows:
//!
//! ```text
//!   0 ----0---- 1        corners: 0 = TL, 1 = TR, 2 = BR, 3 = BL
//!   |           |        edges:   0 = top, 1 = right, 2 = bottom, 3 = left
//!   3           1
//!   |           |        case bits (MSB first): TL TR BR BL
//!   3 ----2---- 2
//! ```

pub const EDGE_TOP: usize = 0;
pub const EDGE_RIGHT: usize = 1;
pub const EDGE_BOTTOM: usize = 2;
pub const EDGE_LEFT: usize = 3;

/// Bit contributed to the case index by each corner, in corner order TL, TR, BR, BL.
pub const CORNER_BITS: [usize; 4] = [8, 4, 2, 1];

/// Corner indices at the two ends of each edge, in interpolation order.
pub const CORNER_POINT_INDICES: [[usize; 2]; 4] = [
    [0, 1], // top:    TL -> TR
    [1, 2], // right:  TR -> BR
    [3, 2], // bottom: BL -> BR
    [0, 3], // left:   TL -> BL
];

/// 4-bit mask of the edges crossed by the contour for each case.
pub const EDGE_TABLE: [u8; 16] = [
    0b0000, 0b1100, 0b0110, 0b1010, 0b0011, 0b1111, 0b0101, 0b1001, //
    0b1001, 0b0101, 0b1111, 0b0011, 0b1010, 0b0110, 0b1100, 0b0000,
];

/// Edge pairs joined by a segment for each case, terminated by `-1`.
///
/// The saddle cases 5 and 10 use a fixed pairing and do not look at the cell's values.
pub const SEGMENT_TABLE: [[i8; 4]; 16] = [
    [-1, -1, -1, -1],
    [3, 2, -1, -1], // BL: left-bottom
    [2, 1, -1, -1], // BR: bottom-right
    [3, 1, -1, -1], // BL,BR: left-right
    [0, 1, -1, -1], // TR: top-right
    [0, 3, 1, 2],   // TR,BL: top-left, right-bottom
    [0, 2, -1, -1], // TR,BR: top-bottom
    [0, 3, -1, -1], // all but TL: top-left
    [3, 0, -1, -1], // TL: left-top
    [2, 0, -1, -1], // TL,BL: bottom-top
    [3, 2, 0, 1],   // TL,BR: left-bottom, top-right
    [1, 0, -1, -1], // all but TR: right-top
    [1, 3, -1, -1], // TL,TR: right-left
    [1, 2, -1, -1], // all but BR: right-bottom
    [2, 3, -1, -1], // all but BL: bottom-left
    [-1, -1, -1, -1],
];
