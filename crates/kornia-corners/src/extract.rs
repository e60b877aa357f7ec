//! Turning a response map into a corner mask.

use kornia_image::Image;
use kornia_imgproc::{core::percentile, features::local_maxima, parallel};

use crate::error::{ensure_same_size, CornersError};

/// Threshold applied to a response map.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Threshold {
    /// Compared directly against the response values.
    Absolute(f32),
    /// Percentile in `[0, 100]` of the response distribution.
    Percentile(f32),
}

impl Threshold {
    /// Resolve the threshold to a scalar for the given response map.
    ///
    /// Percentiles interpolate linearly between the closest ranks. The
    /// percentile of an empty map is zero.
    ///
    /// # Errors
    ///
    /// Returns [`CornersError::InvalidParameter`] for a NaN threshold, a
    /// percentile outside `[0, 100]` or a response map holding NaN values.
    pub fn resolve(&self, response: &Image<f32, 1>) -> Result<f32, CornersError> {
        match *self {
            Threshold::Absolute(value) if value.is_nan() => Err(CornersError::InvalidParameter(
                "absolute threshold is NaN".to_string(),
            )),
            Threshold::Absolute(value) => Ok(value),
            Threshold::Percentile(p) => {
                if !(0.0..=100.0).contains(&p) {
                    return Err(CornersError::InvalidParameter(format!(
                        "percentile must be in [0, 100], got {p}"
                    )));
                }
                let values = response.as_slice();
                if values.iter().any(|v| v.is_nan()) {
                    return Err(CornersError::InvalidParameter(
                        "cannot take the percentile of a response with NaN values".to_string(),
                    ));
                }
                Ok(percentile(values, p)?)
            }
        }
    }
}

/// How corners are selected from a response map.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExtractionPolicy {
    /// Pixels strictly greater than all their 8-connected neighbours.
    #[default]
    LocalMaxima,
    /// Pixels whose response strictly exceeds the resolved threshold.
    Threshold(Threshold),
}

/// Extract the corners of a response map into a boolean mask.
///
/// # Arguments
///
/// * `response` - The response map with shape (H, W).
/// * `policy` - The selection criterion.
/// * `dst` - The corner mask with shape (H, W).
///
/// # Example
///
/// ```
/// use kornia_image::Image;
/// use kornia_corners::extract::{extract_corners, ExtractionPolicy, Threshold};
///
/// let response = Image::<f32, 1>::new([3, 1].into(), vec![0.1, 0.5, 0.9]).unwrap();
/// let mut mask = Image::<bool, 1>::from_size_val(response.size(), false).unwrap();
///
/// let policy = ExtractionPolicy::Threshold(Threshold::Absolute(0.5));
/// extract_corners(&response, &policy, &mut mask).unwrap();
/// assert_eq!(mask.as_slice(), &[false, false, true]);
/// ```
pub fn extract_corners(
    response: &Image<f32, 1>,
    policy: &ExtractionPolicy,
    dst: &mut Image<bool, 1>,
) -> Result<(), CornersError> {
    ensure_same_size(response.size(), dst.size())?;

    match policy {
        ExtractionPolicy::LocalMaxima => {
            dst.as_slice_mut().fill(false);
            let cols = dst.cols();
            let mask = dst.as_slice_mut();
            for [r, c] in local_maxima(response) {
                mask[r * cols + c] = true;
            }
        }
        ExtractionPolicy::Threshold(threshold) => {
            let value = threshold.resolve(response)?;
            log::debug!("extracting corners above {value} ({threshold:?})");
            parallel::par_iter_rows(response, dst, |src, dst| dst[0] = src[0] > value);
        }
    }

    Ok(())
}

/// The `[row, col]` coordinates of the corners of a mask, in row-major order.
pub fn mask_to_coordinates(mask: &Image<bool, 1>) -> Vec<[usize; 2]> {
    let cols = mask.cols();
    mask.as_slice()
        .iter()
        .enumerate()
        .filter(|&(_, &is_corner)| is_corner)
        .map(|(i, _)| [i / cols, i % cols])
        .collect()
}

/// Number of corners in a mask.
pub fn count_corners(mask: &Image<bool, 1>) -> usize {
    mask.as_slice().iter().filter(|&&is_corner| is_corner).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kornia_image::ImageError;

    fn response() -> Result<Image<f32, 1>, ImageError> {
        #[rustfmt::skip]
        let response = Image::new(
            [4, 3].into(),
            vec![
                0.0, 0.1, 0.2, 0.3,
                0.4, 0.9, 0.5, 0.6,
                0.7, 0.8, 1.0, 0.2,
            ],
        )?;
        Ok(response)
    }

    #[test]
    fn test_resolve() -> Result<(), CornersError> {
        let response = response()?;

        assert_eq!(Threshold::Absolute(0.25).resolve(&response)?, 0.25);
        assert_eq!(Threshold::Percentile(0.0).resolve(&response)?, 0.0);
        assert_eq!(Threshold::Percentile(100.0).resolve(&response)?, 1.0);

        let empty = Image::<f32, 1>::new([0, 0].into(), vec![])?;
        assert_eq!(Threshold::Percentile(50.0).resolve(&empty)?, 0.0);
        Ok(())
    }

    #[test]
    fn test_resolve_invalid() -> Result<(), CornersError> {
        let response = response()?;

        for threshold in [
            Threshold::Percentile(-1.0),
            Threshold::Percentile(100.5),
            Threshold::Percentile(f32::NAN),
            Threshold::Absolute(f32::NAN),
        ] {
            assert!(matches!(
                threshold.resolve(&response),
                Err(CornersError::InvalidParameter(_))
            ));
        }

        let with_nan = Image::<f32, 1>::new([2, 1].into(), vec![0.0, f32::NAN])?;
        assert!(matches!(
            Threshold::Percentile(50.0).resolve(&with_nan),
            Err(CornersError::InvalidParameter(_))
        ));
        Ok(())
    }

    #[test]
    fn test_extract_absolute() -> Result<(), CornersError> {
        let response = response()?;
        let mut mask = Image::<bool, 1>::from_size_val(response.size(), false)?;

        let policy = ExtractionPolicy::Threshold(Threshold::Absolute(0.7));
        extract_corners(&response, &policy, &mut mask)?;

        // 0.7 itself is not strictly above the threshold
        assert_eq!(mask_to_coordinates(&mask), vec![[1, 1], [2, 1], [2, 2]]);
        assert_eq!(count_corners(&mask), 3);
        Ok(())
    }

    #[test]
    fn test_extract_percentile_matches_absolute() -> Result<(), CornersError> {
        let response = response()?;
        let mut by_percentile = Image::<bool, 1>::from_size_val(response.size(), false)?;
        let mut by_value = Image::<bool, 1>::from_size_val(response.size(), false)?;

        for p in [0.0, 10.0, 33.3, 50.0, 75.0, 90.0, 100.0] {
            let threshold = Threshold::Percentile(p);
            let value = threshold.resolve(&response)?;

            extract_corners(&response, &ExtractionPolicy::Threshold(threshold), &mut by_percentile)?;
            extract_corners(
                &response,
                &ExtractionPolicy::Threshold(Threshold::Absolute(value)),
                &mut by_value,
            )?;

            assert_eq!(by_percentile, by_value);
            for [r, c] in mask_to_coordinates(&by_percentile) {
                assert!(response.as_slice()[r * response.cols() + c] > value);
            }
        }
        Ok(())
    }

    #[test]
    fn test_extract_local_maxima() -> Result<(), CornersError> {
        let response = response()?;
        let mut mask = Image::<bool, 1>::from_size_val(response.size(), true)?;

        extract_corners(&response, &ExtractionPolicy::default(), &mut mask)?;
        assert_eq!(mask_to_coordinates(&mask), vec![[2, 2]]);
        Ok(())
    }

    #[test]
    fn test_extract_shape_mismatch() -> Result<(), CornersError> {
        let response = response()?;
        let mut mask = Image::<bool, 1>::from_size_val([3, 3].into(), false)?;

        assert!(matches!(
            extract_corners(&response, &ExtractionPolicy::default(), &mut mask),
            Err(CornersError::ShapeMismatch { .. })
        ));
        Ok(())
    }
}
