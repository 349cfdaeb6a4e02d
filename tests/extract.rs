use bevy_marching_squares::{
    extract_contours,
    field::ScalarField,
    segment::Segment,
    types::{Point, Value},
};
use ndarray::{Array2, array};

/// Converts a `(row, col)` pair into a grid point.
fn rc(row: Value, col: Value) -> Point {
    Point::new(col, row)
}

fn close(a: Point, b: Point) -> bool {
    (a - b).norm() < 1e-5
}

/// Contours a single 2×2 cell with corners given as TL, TR, BR, BL.
fn cell(tl: Value, tr: Value, br: Value, bl: Value, threshold: Value) -> Vec<Segment> {
    let field: Array2<Value> = array![[tl, tr], [bl, br]];
    extract_contours(field.view(), threshold)
}

/// Builds a cell whose inside corners are given by the case bits (TL, TR, BR, BL, MSB first).
fn case_cell(case: usize) -> Vec<Segment> {
    let v = |bit: usize| if case & bit != 0 { 10.0 } else { 0.0 };
    cell(v(8), v(4), v(2), v(1), 5.0)
}

// Midpoint crossings of a unit cell for values 0/10 at threshold 5.
fn top() -> Point {
    rc(0.0, 0.5)
}
fn right() -> Point {
    rc(0.5, 1.0)
}
fn bottom() -> Point {
    rc(1.0, 0.5)
}
fn left() -> Point {
    rc(0.5, 0.0)
}

fn assert_segments(case: usize, expected: &[(Point, Point)]) {
    let segments = case_cell(case);
    assert_eq!(segments.len(), expected.len(), "case {case}");
    for (s, (a, b)) in segments.iter().zip(expected) {
        assert!(close(s.start, *a) && close(s.end, *b), "case {case}: {s:?}");
    }
}

#[test]
fn trivial_cases_produce_nothing() {
    assert!(case_cell(0).is_empty());
    assert!(case_cell(15).is_empty());
}

#[test]
fn every_case_follows_the_table() {
    assert_segments(1, &[(left(), bottom())]);
    assert_segments(2, &[(bottom(), right())]);
    assert_segments(3, &[(left(), right())]);
    assert_segments(4, &[(top(), right())]);
    assert_segments(5, &[(top(), left()), (right(), bottom())]);
    assert_segments(6, &[(top(), bottom())]);
    assert_segments(7, &[(top(), left())]);
    assert_segments(8, &[(left(), top())]);
    assert_segments(9, &[(bottom(), top())]);
    assert_segments(10, &[(left(), bottom()), (top(), right())]);
    assert_segments(11, &[(right(), top())]);
    assert_segments(12, &[(right(), left())]);
    assert_segments(13, &[(right(), bottom())]);
    assert_segments(14, &[(bottom(), left())]);
}

#[test]
fn lone_corner_segments_touch_adjacent_edges() {
    // (case, lone corner position)
    let lone = [
        (1, rc(1.0, 0.0)),
        (2, rc(1.0, 1.0)),
        (4, rc(0.0, 1.0)),
        (8, rc(0.0, 0.0)),
        (7, rc(0.0, 0.0)),
        (11, rc(0.0, 1.0)),
        (13, rc(1.0, 1.0)),
        (14, rc(1.0, 0.0)),
    ];
    for (case, corner) in lone {
        let segments = case_cell(case);
        assert_eq!(segments.len(), 1, "case {case}");
        for p in [segments[0].start, segments[0].end] {
            // each endpoint is half a cell from the lone corner, along one of its edges
            assert!((nalgebra::distance(&p, &corner) - 0.5).abs() < 1e-5, "case {case}");
            assert!(p.x == corner.x || p.y == corner.y, "case {case}");
        }
    }
}

#[test]
fn saddles_use_fixed_pairing_regardless_of_centre() {
    // centre average well above the threshold still gives the same pairing
    let high = cell(0.0, 100.0, 0.0, 100.0, 5.0);
    let low = cell(0.0, 6.0, 0.0, 6.0, 5.0);
    assert_eq!(high.len(), 2);
    assert_eq!(low.len(), 2);
    for segments in [high, low] {
        // top-left then right-bottom
        assert_eq!(segments[0].start.y, 0.0);
        assert_eq!(segments[0].end.x, 0.0);
        assert_eq!(segments[1].start.x, 1.0);
        assert_eq!(segments[1].end.y, 1.0);
    }
}

#[test]
fn top_edge_crossing_is_interpolated() {
    // TL = 0, TR = 10, threshold 4: only TR is inside
    let segments = cell(0.0, 10.0, 0.0, 0.0, 4.0);
    assert_eq!(segments.len(), 1);
    assert!(close(segments[0].start, rc(0.0, 0.4)));
}

#[test]
fn narrow_straddling_edges_cross_at_midpoint() {
    // TR is inside but differs from its neighbours by less than the flat-edge epsilon
    let segments = cell(0.0, 5e-7, 0.0, 0.0, 1e-7);
    assert_eq!(segments.len(), 1);
    assert!(close(segments[0].start, top()));
    assert!(close(segments[0].end, right()));
}

#[test]
fn equal_to_threshold_counts_as_inside() {
    // TL and TR sit exactly on the threshold: the top edge has no crossing, and the
    // right-left segment meets the side edges at the top corners
    let segments = cell(5.0, 5.0, 0.0, 0.0, 5.0);
    assert_eq!(segments.len(), 1);
    assert!(close(segments[0].start, rc(0.0, 1.0)));
    assert!(close(segments[0].end, rc(0.0, 0.0)));
}

#[test]
fn single_bright_corner_end_to_end() {
    let rows: Vec<Vec<Value>> = vec![vec![0.0, 0.0], vec![0.0, 10.0]];
    let field = ScalarField::from_rows(&rows).unwrap();
    let segments = field.extract(5.0);
    assert_eq!(segments.len(), 1);
    assert!(close(segments[0].start, rc(1.0, 0.5)));
    assert!(close(segments[0].end, rc(0.5, 1.0)));
}

#[test]
fn single_row_field_is_empty() {
    let rows: Vec<Vec<Value>> = vec![vec![0.0, 100.0, 0.0, 255.0]];
    let field = ScalarField::from_rows(&rows).unwrap();
    for threshold in [-1.0, 0.0, 50.0, 300.0] {
        assert!(field.extract(threshold).is_empty());
    }
}

#[test]
fn extraction_is_repeatable() {
    let field = ScalarField::new(12, 12).fill(&|row, col| ((row * 0.7).sin() + (col * 0.4).cos()) * 100.0);
    let first = field.extract(20.0);
    let second = field.extract(20.0);
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn segments_stay_inside_their_cell() {
    let field = ScalarField::new(9, 7).fill(&|row, col| row * 13.0 - col * 7.0 + (row * col) % 5.0);
    for segment in field.extract(30.0) {
        let min_x = segment.start.x.min(segment.end.x).floor();
        let min_y = segment.start.y.min(segment.end.y).floor();
        assert!(segment.start.x.max(segment.end.x) <= min_x + 1.0);
        assert!(segment.start.y.max(segment.end.y) <= min_y + 1.0);
    }
}
