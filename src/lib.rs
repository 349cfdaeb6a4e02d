pub mod brightness;
pub mod contour;
pub mod duotone;
pub mod error;
pub mod field;
pub mod interp;
pub mod layers;
pub mod plugin;
pub mod segment;
pub mod tables;
pub mod types;
pub mod utils;

pub use contour::{extract_contours, extract_contours_par};
pub use plugin::MarchingSquaresPlugin;
