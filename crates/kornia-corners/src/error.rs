use kornia_image::{ImageError, ImageSize};
use thiserror::Error;

/// Error types for the corner detectors.
#[derive(Debug, Error, PartialEq)]
pub enum CornersError {
    /// A detector or extraction parameter is out of its valid range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Two maps that must share their dimensions do not.
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Size of the reference map
        expected: ImageSize,
        /// Size of the offending map
        actual: ImageSize,
    },

    /// The quadratic fit of the sub-pixel refinement has a zero leading coefficient.
    #[error("Degenerate quadratic fit at row {row}, col {col}")]
    DegenerateFit {
        /// Row of the corner
        row: usize,
        /// Column of the corner
        col: usize,
    },

    /// Error from the underlying image operations.
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Fails with [`CornersError::ShapeMismatch`] when the two sizes differ.
pub(crate) fn ensure_same_size(expected: ImageSize, actual: ImageSize) -> Result<(), CornersError> {
    if expected != actual {
        return Err(CornersError::ShapeMismatch { expected, actual });
    }
    Ok(())
}
