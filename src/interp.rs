use crate::types::{Point, Value};

/// Corner-value differences below this are treated as flat and cross at the edge midpoint.
pub const DEGENERATE_EPSILON: Value = 1e-6;

// linearly map a number from one range to another
pub fn remap(s: Value, range_in: [Value; 2], range_out: [Value; 2]) -> Value {
    range_out[0] + (s - range_in[0]) * (range_out[1] - range_out[0]) / (range_in[1] - range_in[0])
}

// Return the interpolation factor t corresponding to iso_val, or the midpoint on a flat edge
pub fn find_t(v0: Value, v1: Value, iso_val: Value) -> Value {
    let denom = v1 - v0;
    if denom.abs() < DEGENERATE_EPSILON {
        return 0.5;
    }
    (iso_val - v0) / denom
}

// Linear interpolation
pub fn lerp(a: Value, b: Value, t: Value) -> Value {
    a + (b - a) * t
}

// Linearly interpolate between two points by factor t
pub fn interpolate_points(p0: Point, p1: Point, t: Value) -> Point {
    Point::new(lerp(p0.x, p1.x, t), lerp(p0.y, p1.y, t))
}
