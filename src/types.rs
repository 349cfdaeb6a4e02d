use nalgebra::Point2;
use ndarray::Array2;

/// Scalar field value at a grid point.
pub type Value = f32;

/// A 2D point in fractional grid units.
///
/// `x` is the **column** coordinate and `y` is the **row** coordinate, so the grid point at
/// `(row, col)` is `Point::new(col, row)`.
pub type Point = Point2<Value>;

/// Row-major sample storage, indexed `[[row, col]]`.
///
/// Samples **greater than or equal to** the threshold are considered "inside" the contour.
pub type Grid = Array2<Value>;

/// A scalar field function: maps a `(row, col)` grid position to a [`Value`].
pub type CompiledFunction = dyn Fn(Value, Value) -> Value + Sync;
