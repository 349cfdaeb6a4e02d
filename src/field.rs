use std::sync::Arc;

use bevy::prelude::*;
use ndarray::{Array2, ArrayView2};

use crate::{
    contour::extract_contours,
    error::{MarchingSquaresError, Result},
    segment::Segment,
    types::{CompiledFunction, Grid, Value},
};

/// A rectangular scalar field that produces marching squares contours.
///
/// The field has `rows × cols` samples and `(rows - 1) × (cols - 1)` cells.
///
/// Values are stored row-major as `values[[row, col]]`.
///
/// `values` is wrapped in an [`Arc`] so the async contour task can hold a reference
/// to the field without copying it.
#[derive(Component, Clone)]
#[require(Transform)]
pub struct ScalarField {
    /// Base iso-value. Samples ≥ threshold are "inside".
    pub threshold: Value,
    /// World-space size of one cell edge.
    pub cell_size: Value,
    /// Scalar field samples, indexed `[[row, col]]`.
    pub values: Arc<Grid>,
}

impl Default for ScalarField {
    fn default() -> Self {
        Self {
            threshold: 0.,
            cell_size: 1.,
            values: Arc::new(Array2::zeros((0, 0))),
        }
    }
}

impl ScalarField {
    /// Creates a new field with `rows × cols` samples, all initialised to `0.0`.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            values: Arc::new(Array2::zeros((rows, cols))),
            ..Default::default()
        }
    }

    /// Builds a field from nested rows, top row first.
    ///
    /// Returns [`MarchingSquaresError::RaggedRows`] if the rows differ in length.
    pub fn from_rows<R: AsRef<[Value]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        if let Some((row, samples)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.as_ref().len() != cols)
        {
            return Err(MarchingSquaresError::RaggedRows {
                row,
                expected: cols,
                found: samples.as_ref().len(),
            });
        }

        let values = Array2::from_shape_fn((rows.len(), cols), |(row, col)| rows[row].as_ref()[col]);
        Ok(Self::from_array(values))
    }

    /// Wraps an existing row-major array.
    pub fn from_array(values: Grid) -> Self {
        Self {
            values: Arc::new(values),
            ..Default::default()
        }
    }

    /// Sets the world-space size of each cell edge.
    pub fn with_cell_size(mut self, cell_size: Value) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Sets the base iso-value.
    pub fn with_threshold(mut self, threshold: Value) -> Self {
        self.threshold = threshold;
        self
    }

    /// Replaces the samples with a previously shared [`Arc`].
    ///
    /// Cloning the `Arc` instead of the array lets several entities contour the same data at
    /// different thresholds without copying it.
    pub fn with_values(mut self, values: Arc<Grid>) -> Self {
        self.values = values;
        self
    }

    /// Number of sample rows.
    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of sample columns.
    pub fn cols(&self) -> usize {
        self.values.ncols()
    }

    /// Read-only view of the samples.
    pub fn view(&self) -> ArrayView2<'_, Value> {
        self.values.view()
    }

    /// Returns a mutable reference to the inner samples.
    ///
    /// If the Arc is shared this will clone the data first (copy-on-write).
    fn values_mut(&mut self) -> &mut Grid {
        Arc::make_mut(&mut self.values)
    }

    /// Returns the sample at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<Value> {
        self.values.get([row, col]).copied()
    }

    /// Sets the sample at `(row, col)`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, row: usize, col: usize, v: Value) {
        if let Some(slot) = self.values_mut().get_mut([row, col]) {
            *slot = v;
        }
    }

    /// Calls `f(row, col, &mut value)` for every sample in the field.
    pub fn for_each_sample<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, usize, &mut Value),
    {
        for ((row, col), value) in self.values_mut().indexed_iter_mut() {
            f(row, col, value);
        }
    }

    /// Fills the field by evaluating `function` at every sample.
    ///
    /// Positions passed to `function` are `(row, col)` scaled by [`cell_size`](ScalarField::cell_size).
    pub fn fill(mut self, function: &CompiledFunction) -> Self {
        let cell_size = self.cell_size;
        self.for_each_sample(|row, col, value| {
            *value = function(row as Value * cell_size, col as Value * cell_size);
        });
        self
    }

    /// Classifies every sample against `threshold` using the same rule as the extractor.
    pub fn inside_mask(&self, threshold: Value) -> Array2<bool> {
        self.values.mapv(|v| v >= threshold)
    }

    /// Extracts the contour segments at `threshold`, in grid units.
    pub fn extract(&self, threshold: Value) -> Vec<Segment> {
        extract_contours(self.view(), threshold)
    }
}
