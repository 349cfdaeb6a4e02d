use ndarray::Array2;

use crate::{
    error::{MarchingSquaresError, Result},
    field::ScalarField,
    types::Value,
};

/// Approximate number of pixels sampled per grid cell.
pub const TARGET_SAMPLES_PER_CELL: usize = 64;

/// Averages an RGBA8 frame down to a `grid × grid` brightness field (0..255).
///
/// Each cell averages `(r + g + b) / 3` over a strided subset of the pixels it covers, so
/// roughly [`TARGET_SAMPLES_PER_CELL`] pixels are read per cell. Alpha is ignored.
/// With `mirror` set, columns are read right-to-left like a selfie camera.
///
/// ```text
///  frame (W × H)                 field (grid × grid)
///  +----+----+----+              +----+----+----+
///  |....|....|....|   average    | b00| b01| b02|
///  |....|....|....|  ───────►    | b10| b11| b12|
///  +----+----+----+              +----+----+----+
/// ```
pub fn average_brightness_grid(
    pixels: &[u8],
    width: usize,
    height: usize,
    grid: usize,
    mirror: bool,
) -> Result<ScalarField> {
    if grid == 0 {
        return Err(MarchingSquaresError::EmptyGrid);
    }

    let expected = width * height * 4;
    if pixels.len() != expected {
        return Err(MarchingSquaresError::FrameSizeMismatch {
            expected,
            found: pixels.len(),
        });
    }

    let side = (TARGET_SAMPLES_PER_CELL as f64).sqrt();
    let stride_x = (((width as f64 / grid as f64) / side).floor() as usize).max(1);
    let stride_y = (((height as f64 / grid as f64) / side).floor() as usize).max(1);

    let values = Array2::from_shape_fn((grid, grid), |(gy, gx)| {
        let y0 = gy * height / grid;
        let y1 = (gy + 1) * height / grid;
        let x0 = gx * width / grid;
        let x1 = (gx + 1) * width / grid;

        let mut sum = 0.0_f64;
        let mut count = 0_usize;
        for y in (y0..y1).step_by(stride_y) {
            for x in (x0..x1).step_by(stride_x) {
                let sx = if mirror { width - 1 - x } else { x };
                let idx = (y * width + sx) * 4;
                let [r, g, b] = [pixels[idx], pixels[idx + 1], pixels[idx + 2]];
                sum += (r as f64 + g as f64 + b as f64) / 3.0;
                count += 1;
            }
        }

        if count == 0 { 0.0 } else { (sum / count as f64) as Value }
    });

    tracing::trace!(width, height, grid, stride_x, stride_y, "averaged brightness grid");
    Ok(ScalarField::from_array(values))
}
