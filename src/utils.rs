use crate::{
    interp::{find_t, interpolate_points},
    segment::Segment,
    tables::{CORNER_BITS, SEGMENT_TABLE},
    types::{Point, Value},
};

/// Converts the crossing points for a given marching squares `state` into segments.
///
/// `SEGMENT_TABLE[state]` contains edge indices in pairs, terminated by `-1`:
/// ```text
/// SEGMENT_TABLE[state] = [e0, e1,  e2, e3]
///                         \seg0/   \seg1/
/// ```
/// Each edge index maps into `edge_points` to retrieve the interpolated crossing. Pairs
/// with a missing crossing, or with a non-finite coordinate, are skipped.
#[inline]
pub fn segments_from_state(
    edge_points: &[Option<Point>; 4],
    state: usize,
) -> impl Iterator<Item = Segment> + '_ {
    SEGMENT_TABLE[state]
        .chunks_exact(2)
        .take_while(|pair| pair[0] != -1)
        .filter_map(|pair| {
            let start = edge_points[pair[0] as usize]?;
            let end = edge_points[pair[1] as usize]?;
            Some(Segment::new(start, end))
        })
        .filter(Segment::is_finite)
}

/// Returns the 4 grid-space corner positions of the cell whose top-left sample is `(row, col)`.
///
/// Corners are ordered TL, TR, BR, BL:
/// ```text
///   0----1      +-- col (x)
///   |    |      |
///   3----2      row (y)
/// ```
#[inline]
pub fn get_corner_positions(row: usize, col: usize) -> [Point; 4] {
    let r = row as Value;
    let c = col as Value;

    [
        Point::new(c,       r      ),
        Point::new(c + 1.0, r      ),
        Point::new(c + 1.0, r + 1.0),
        Point::new(c,       r + 1.0),
    ]
}

/// Computes the marching squares case index for a cell.
///
/// Corner values are given in TL, TR, BR, BL order. A corner is "inside" when its value is
/// **at or above** the threshold, and inside corners set their bit:
///
/// ```text
/// state bits:  [TL][TR][BR][BL]
///                8   4   2   1
/// ```
#[inline]
pub fn get_state(corner_values: &[Value; 4], threshold: Value) -> usize {
    corner_values
        .iter()
        .zip(CORNER_BITS)
        .filter(|(v, _)| **v >= threshold)
        .fold(0, |state, (_, bit)| state | bit)
}

/// Interpolates the crossing point along each edge of the cell that the contour passes through.
///
/// `edges_mask` is a 4-bit field from `EDGE_TABLE`. A set bit means that edge is active.
///
/// For each active edge, the crossing is found by linearly interpolating between the two
/// endpoint positions at the iso-value.
#[inline]
pub fn get_edge_crossings(
    edges_mask: u8,
    point_indices: &[[usize; 2]; 4],
    corner_positions: &[Point; 4],
    corner_values: &[Value; 4],
    threshold: Value,
) -> [Option<Point>; 4] {
    let mut edge_points: [Option<Point>; 4] = [None; 4];

    for (i, [a, b]) in point_indices.iter().enumerate() {
        if (edges_mask & (1 << i)) == 0 {
            continue;
        }

        let t = find_t(corner_values[*a], corner_values[*b], threshold);
        edge_points[i] = Some(interpolate_points(corner_positions[*a], corner_positions[*b], t));
    }

    edge_points
}
