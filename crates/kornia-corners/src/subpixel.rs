use kornia_image::Image;
use rayon::prelude::*;

use crate::error::{ensure_same_size, CornersError};
use crate::extract::mask_to_coordinates;

/// A 2D point in homogeneous coordinates with `w = 1`.
///
/// `x` is the column and `y` the row, both 0-based.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HomogeneousPoint {
    /// Column coordinate.
    pub x: f32,
    /// Row coordinate.
    pub y: f32,
    /// Homogeneous scale.
    pub w: f32,
}

impl HomogeneousPoint {
    /// Create a point with `w = 1`.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, w: 1.0 }
    }

    /// The point at the integer pixel `[row, col]`.
    pub fn from_pixel([row, col]: [usize; 2]) -> Self {
        Self::new(col as f32, row as f32)
    }

    /// The point as `[x, y, w]`.
    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.w]
    }
}

/// What to do when the quadratic along an axis has no usable vertex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DegenerateFitPolicy {
    /// Keep the integer coordinate on the degenerate axis.
    #[default]
    Fallback,
    /// Fail with [`CornersError::DegenerateFit`].
    Error,
}

/// Vertex offset of the parabola through `(-1, prev)`, `(0, center)` and `(1, next)`.
///
/// The coefficients come from the inverse Vandermonde matrix
/// `[[0.5, -1, 0.5], [-0.5, 0, 0.5], [0, 1, 0]]`. Returns `None` when the
/// parabola is flat or opens upwards, or when the vertex lies more than
/// [`MAX_VERTEX_OFFSET`] pixels away from the center.
#[inline]
pub fn quadratic_vertex(prev: f32, center: f32, next: f32) -> Option<f32> {
    let a = 0.5 * prev - center + 0.5 * next;
    let b = -0.5 * prev + 0.5 * next;
    // only a peak has a vertex worth moving to
    if a.is_nan() || a >= 0.0 {
        return None;
    }
    let offset = -b / (2.0 * a);
    (offset.abs() <= MAX_VERTEX_OFFSET).then_some(offset)
}

/// Largest shift, in pixels, that refinement applies along one axis.
pub const MAX_VERTEX_OFFSET: f32 = 1.0;

/// Refine the corners of a mask to sub-pixel precision.
///
/// Uses [`DegenerateFitPolicy::Fallback`], see [`refine_to_subpixel_with_policy`].
///
/// # Example
///
/// ```
/// use kornia_image::Image;
/// use kornia_corners::subpixel::{refine_to_subpixel, HomogeneousPoint};
///
/// #[rustfmt::skip]
/// let response = Image::<f32, 1>::new([3, 3].into(), vec![
///     0.0, 1.0, 0.0,
///     1.0, 2.0, 1.0,
///     0.0, 1.0, 0.0,
/// ]).unwrap();
/// let mut mask = Image::<bool, 1>::from_size_val(response.size(), false).unwrap();
/// mask.set_pixel(1, 1, 0, true).unwrap();
///
/// let points = refine_to_subpixel(&response, &mask).unwrap();
/// assert_eq!(points, vec![HomogeneousPoint::new(1.0, 1.0)]);
/// ```
pub fn refine_to_subpixel(
    response: &Image<f32, 1>,
    mask: &Image<bool, 1>,
) -> Result<Vec<HomogeneousPoint>, CornersError> {
    refine_to_subpixel_with_policy(response, mask, DegenerateFitPolicy::default())
}

/// Refine the corners of a mask to sub-pixel precision.
///
/// For every corner, in row-major order, a parabola is fitted through the
/// response of the corner and its west/east neighbours, and another through its
/// north/south neighbours. The corner moves to the vertices of both parabolas,
/// so it never moves by more than [`MAX_VERTEX_OFFSET`] along either axis.
/// Corners on the first or last row or column are returned unchanged.
///
/// # Arguments
///
/// * `response` - The response map with shape (H, W).
/// * `mask` - The corner mask with shape (H, W).
/// * `policy` - Handling of fits without a usable vertex.
///
/// # Returns
///
/// One point per corner of the mask.
///
/// # Errors
///
/// Returns [`CornersError::ShapeMismatch`] if the shapes differ, and
/// [`CornersError::DegenerateFit`] for a fit without a usable vertex under
/// [`DegenerateFitPolicy::Error`].
pub fn refine_to_subpixel_with_policy(
    response: &Image<f32, 1>,
    mask: &Image<bool, 1>,
    policy: DegenerateFitPolicy,
) -> Result<Vec<HomogeneousPoint>, CornersError> {
    ensure_same_size(response.size(), mask.size())?;

    let size = response.size();
    let data = response.as_slice();
    let at = |r: usize, c: usize| data[size.index(r, c)];

    mask_to_coordinates(mask)
        .into_par_iter()
        .map(|[row, col]| {
            if size.is_border(row, col) {
                return Ok(HomogeneousPoint::from_pixel([row, col]));
            }

            let center = at(row, col);
            let fits = [
                quadratic_vertex(at(row, col - 1), center, at(row, col + 1)),
                quadratic_vertex(at(row - 1, col), center, at(row + 1, col)),
            ];

            let mut offsets = [0.0; 2];
            for (offset, fit) in offsets.iter_mut().zip(fits) {
                match (fit, policy) {
                    (Some(v), _) => *offset = v,
                    (None, DegenerateFitPolicy::Error) => {
                        return Err(CornersError::DegenerateFit { row, col })
                    }
                    (None, DegenerateFitPolicy::Fallback) => {
                        log::trace!(
                            "degenerate fit at ({row}, {col}), keeping the integer coordinate"
                        );
                    }
                }
            }

            Ok(HomogeneousPoint::new(
                col as f32 + offsets[0],
                row as f32 + offsets[1],
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadratic_vertex() {
        assert_eq!(quadratic_vertex(1.0, 2.0, 1.0), Some(0.0));
        assert_eq!(quadratic_vertex(1.0, 1.0, 1.0), None);
        // a straight line has no vertex either
        assert_eq!(quadratic_vertex(0.0, 1.0, 2.0), None);

        let offset = quadratic_vertex(1.0, 2.0, 1.5).unwrap_or(f32::NAN);
        assert_relative_eq!(offset, 1.0 / 6.0, epsilon = 1e-6);
    }

    #[test]
    fn test_quadratic_vertex_rejects_unusable_fits() {
        // nearly a line: the vertex is thousands of pixels away
        assert_eq!(quadratic_vertex(0.0, 1.0, 2.0001), None);
        // a valley, the vertex is a minimum
        assert_eq!(quadratic_vertex(2.0, 1.0, 2.0), None);
        assert_eq!(quadratic_vertex(3.0, 1.0, 2.0), None);
        // a peak beyond the neighbours
        assert_eq!(quadratic_vertex(0.0, 1.0, 1.9), None);
        assert_eq!(quadratic_vertex(f32::NAN, 1.0, 0.0), None);

        // the vertex of a peak between two neighbours stays within one pixel
        let offset = quadratic_vertex(0.0, 1.0, 1.0).unwrap_or(f32::NAN);
        assert_relative_eq!(offset, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_refine_near_linear_row() -> Result<(), CornersError> {
        #[rustfmt::skip]
        let response = Image::<f32, 1>::new(
            [3, 3].into(),
            vec![
                0.0, 0.0, 0.0,
                0.0, 1.0, 2.0001,
                0.0, 0.0, 0.0,
            ],
        )?;
        let mut mask = Image::<bool, 1>::from_size_val(response.size(), false)?;
        mask.set_pixel(1, 1, 0, true)?;

        // the column fit is rejected, the row fit is a plain peak
        let points = refine_to_subpixel(&response, &mask)?;
        assert_eq!(points, vec![HomogeneousPoint::new(1.0, 1.0)]);

        let res = refine_to_subpixel_with_policy(&response, &mask, DegenerateFitPolicy::Error);
        assert_eq!(res, Err(CornersError::DegenerateFit { row: 1, col: 1 }));
        Ok(())
    }

    #[test]
    fn test_refine_valley_keeps_integer_coordinate() -> Result<(), CornersError> {
        #[rustfmt::skip]
        let response = Image::<f32, 1>::new(
            [3, 3].into(),
            vec![
                0.0, 2.0, 0.0,
                2.0, 1.0, 3.0,
                0.0, 0.5, 0.0,
            ],
        )?;
        let mask = Image::<bool, 1>::from_size_val(response.size(), true)?;

        let points = refine_to_subpixel(&response, &mask)?;
        assert_eq!(points[4], HomogeneousPoint::new(1.0, 1.0));
        Ok(())
    }

    #[test]
    fn test_refine_interior() -> Result<(), CornersError> {
        #[rustfmt::skip]
        let response = Image::<f32, 1>::new(
            [4, 4].into(),
            vec![
                0.0, 0.0, 0.0, 0.0,
                0.0, 1.0, 1.5, 0.0,
                1.0, 2.0, 1.5, 0.0,
                0.0, 1.0, 0.0, 0.0,
            ],
        )?;
        let mut mask = Image::<bool, 1>::from_size_val(response.size(), false)?;
        mask.set_pixel(1, 2, 0, true)?;

        let points = refine_to_subpixel(&response, &mask)?;
        assert_eq!(points.len(), 1);

        // west 1.0, east 1.5: pulled towards the east
        assert_relative_eq!(points[0].x, 1.0 + 1.0 / 6.0, epsilon = 1e-6);
        // north 1.0, south 1.0: symmetric
        assert_relative_eq!(points[0].y, 2.0, epsilon = 1e-6);
        assert_eq!(points[0].w, 1.0);
        Ok(())
    }

    #[test]
    fn test_refine_border_untouched() -> Result<(), CornersError> {
        let mut response = Image::<f32, 1>::from_size_val([4, 3].into(), 0.0)?;
        response.set_pixel(1, 1, 0, 5.0)?;
        let mask = Image::<bool, 1>::from_size_val(response.size(), true)?;

        let points = refine_to_subpixel(&response, &mask)?;
        assert_eq!(points.len(), 12);

        for (i, point) in points.iter().enumerate() {
            let (row, col) = (i / 4, i % 4);
            if response.size().is_border(row, col) {
                assert_eq!(*point, HomogeneousPoint::from_pixel([row, col]));
            }
        }
        Ok(())
    }

    #[test]
    fn test_refine_degenerate() -> Result<(), CornersError> {
        let response = Image::<f32, 1>::from_size_val([3, 3].into(), 1.0)?;
        let mut mask = Image::<bool, 1>::from_size_val(response.size(), false)?;
        mask.set_pixel(1, 1, 0, true)?;

        let points = refine_to_subpixel(&response, &mask)?;
        assert_eq!(points, vec![HomogeneousPoint::new(1.0, 1.0)]);

        let res = refine_to_subpixel_with_policy(&response, &mask, DegenerateFitPolicy::Error);
        assert_eq!(res, Err(CornersError::DegenerateFit { row: 1, col: 1 }));
        Ok(())
    }

    #[test]
    fn test_refine_shape_mismatch() -> Result<(), CornersError> {
        let response = Image::<f32, 1>::from_size_val([3, 3].into(), 1.0)?;
        let mask = Image::<bool, 1>::from_size_val([3, 2].into(), false)?;

        assert!(matches!(
            refine_to_subpixel(&response, &mask),
            Err(CornersError::ShapeMismatch { .. })
        ));
        Ok(())
    }
}
