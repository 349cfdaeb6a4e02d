use ndarray::ArrayView2;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    segment::Segment,
    tables::{CORNER_POINT_INDICES, EDGE_TABLE},
    types::Value,
    utils::{get_corner_positions, get_edge_crossings, get_state, segments_from_state},
};

/// Runs the marching squares algorithm over the given field.
///
/// Returns the level-curve segments at `threshold`, in fractional grid units
/// (`x` = column, `y` = row). Cells are visited row-major, and a cell's segments follow
/// its case table order. Fields with fewer than two rows or columns have no cells and yield
/// an empty result.
///
/// ```text
/// Per cell:
/// 1. get_corner_positions  →  4 grid-space points
/// 2. values[[r, c]] (×4)   →  4 scalar values
/// 3. get_state             →  16-entry lookup key
/// 4. EDGE_TABLE[state]     →  bitmask of crossed edges
/// 5. get_edge_crossings    →  up to 4 interpolated points
/// 6. segments_from_state   →  0, 1 or 2 segments from SEGMENT_TABLE
/// ```
pub fn extract_contours(values: ArrayView2<'_, Value>, threshold: Value) -> Vec<Segment> {
    let (rows, cols) = values.dim();
    if rows < 2 || cols < 2 {
        return Vec::new();
    }

    let mut segments = Vec::new();
    for row in 0..rows - 1 {
        march_row(&values, row, threshold, &mut segments);
    }

    tracing::trace!(rows, cols, threshold, segments = segments.len(), "extracted contours");
    segments
}

/// Same as [`extract_contours`], with rows of cells processed on the Rayon pool.
///
/// Per-row results are concatenated in row order, so the output is identical to the
/// sequential version.
pub fn extract_contours_par(values: ArrayView2<'_, Value>, threshold: Value) -> Vec<Segment> {
    let (rows, cols) = values.dim();
    if rows < 2 || cols < 2 {
        return Vec::new();
    }

    let per_row: Vec<Vec<Segment>> = (0..rows - 1)
        .into_par_iter()
        .map(|row| {
            let mut local = Vec::new();
            march_row(&values, row, threshold, &mut local);
            local
        })
        .collect();

    // Merge per-row slices into a single buffer
    let total: usize = per_row.iter().map(|v| v.len()).sum();
    let mut segments = Vec::with_capacity(total);
    for mut v in per_row {
        segments.append(&mut v);
    }

    tracing::trace!(rows, cols, threshold, segments = segments.len(), "extracted contours");
    segments
}

/// Marches every cell whose top edge lies on sample row `row`, appending to `out`.
fn march_row(values: &ArrayView2<'_, Value>, row: usize, threshold: Value, out: &mut Vec<Segment>) {
    for col in 0..values.ncols() - 1 {
        let corner_values = [
            values[[row, col]],
            values[[row, col + 1]],
            values[[row + 1, col + 1]],
            values[[row + 1, col]],
        ];

        let state = get_state(&corner_values, threshold);
        let edges_mask = EDGE_TABLE[state];
        if edges_mask == 0 {
            continue;
        }

        let edge_points = get_edge_crossings(
            edges_mask,
            &CORNER_POINT_INDICES,
            &get_corner_positions(row, col),
            &corner_values,
            threshold,
        );

        out.extend(segments_from_state(&edge_points, state));
    }
}
