use derive_more::Display;

pub type Result<T> = core::result::Result<T, MarchingSquaresError>;

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum MarchingSquaresError {
    /// A row passed to [`ScalarField::from_rows`](crate::field::ScalarField::from_rows)
    /// had a different length than the first row.
    #[display("row {row} has {found} samples, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// An RGBA8 frame buffer did not hold `width * height * 4` bytes.
    #[display("frame buffer holds {found} bytes, expected {expected}")]
    FrameSizeMismatch { expected: usize, found: usize },
    #[display("brightness grid must have at least one cell per axis")]
    EmptyGrid,
}

impl std::error::Error for MarchingSquaresError {}
