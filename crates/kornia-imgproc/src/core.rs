use std::cmp::Ordering;

use kornia_image::ImageError;
use num_traits::Float;

/// Compute the p-th percentile of a collection of values.
///
/// The percentile is linearly interpolated between the closest ranks of the
/// sorted values, i.e. with `h = (n - 1) * p / 100` the result is
/// `v[floor(h)] + (h - floor(h)) * (v[floor(h) + 1] - v[floor(h)])`.
///
/// # Arguments
///
/// * `values` - The values, in any order.
/// * `p` - The percentile in `[0, 100]`.
///
/// # Returns
///
/// The percentile value, or zero for an empty collection.
///
/// # Errors
///
/// If `p` is outside `[0, 100]` or any value is NaN, an error is returned.
///
/// # Example
///
/// ```
/// use kornia_imgproc::core::percentile;
///
/// let values = [4.0f32, 1.0, 3.0, 2.0, 5.0];
/// assert_eq!(percentile(&values, 50.0).unwrap(), 3.0);
/// assert_eq!(percentile(&values, 100.0).unwrap(), 5.0);
/// ```
pub fn percentile<T: Float>(values: &[T], p: f32) -> Result<T, ImageError> {
    if !(0.0..=100.0).contains(&p) {
        return Err(ImageError::InvalidPercentile(p));
    }

    if values.iter().any(|v| v.is_nan()) {
        return Err(ImageError::NanValue);
    }

    if values.is_empty() {
        return Ok(T::zero());
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let h = (sorted.len() - 1) as f64 * p as f64 / 100.0;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = T::from(h - lo as f64).unwrap_or_else(T::zero);

    Ok(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}
