use crate::parallel;
use kornia_image::{Image, ImageError};

/// Define the RGB weights for the grayscale conversion.
const RW: f32 = 0.299;
const GW: f32 = 0.587;
const BW: f32 = 0.114;

/// Reduce the channels of one pixel to a single gray value.
///
/// * 1 or 2 channels (gray, gray + alpha): the first channel.
/// * 3 or 4 channels (RGB, RGBA): `0.299 * R + 0.587 * G + 0.114 * B`.
/// * any other count: the mean of the channels.
#[inline]
pub fn luma(pixel: &[f32]) -> f32 {
    match pixel.len() {
        0 => 0.0,
        1 | 2 => pixel[0],
        3 | 4 => RW * pixel[0] + GW * pixel[1] + BW * pixel[2],
        n => pixel.iter().sum::<f32>() / n as f32,
    }
}

/// Reduce a multi-channel image to a single channel with [`luma`].
///
/// # Arguments
///
/// * `src` - The input image with C channels.
/// * `dst` - The output grayscale image.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use kornia_image::{Image, ImageSize};
/// use kornia_imgproc::color::gray_from_channels;
///
/// let image = Image::<f32, 3>::new(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     vec![0f32; 4 * 5 * 3],
/// )
/// .unwrap();
///
/// let mut gray = Image::<f32, 1>::from_size_val(image.size(), 0.0).unwrap();
///
/// gray_from_channels(&image, &mut gray).unwrap();
/// assert_eq!(gray.num_channels(), 1);
/// assert_eq!(gray.size().width, 4);
/// assert_eq!(gray.size().height, 5);
/// ```
pub fn gray_from_channels<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, 1>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    // parallelize the grayscale conversion by rows
    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel[0] = luma(src_pixel);
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gray_from_channels_rgb() -> Result<(), ImageError> {
        let image = Image::<f32, 3>::new([2, 1].into(), vec![1.0, 0.0, 0.0, 0.0, 1.0, 1.0])?;
        let mut gray = Image::<f32, 1>::from_size_val(image.size(), 0.0)?;

        gray_from_channels(&image, &mut gray)?;

        assert_relative_eq!(gray.as_slice()[0], 0.299, epsilon = 1e-6);
        assert_relative_eq!(gray.as_slice()[1], 0.701, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn test_luma_channel_counts() {
        assert_eq!(luma(&[0.3]), 0.3);
        assert_eq!(luma(&[0.3, 1.0]), 0.3);
        assert_relative_eq!(luma(&[1.0, 1.0, 1.0, 0.0]), 1.0, epsilon = 1e-6);
        assert_relative_eq!(luma(&[0.0, 1.0, 2.0, 3.0, 4.0]), 2.0);
    }

    #[test]
    fn test_gray_invalid_size() -> Result<(), ImageError> {
        let image = Image::<f32, 3>::from_size_val([2, 1].into(), 0.0)?;
        let mut gray = Image::<f32, 1>::from_size_val([1, 2].into(), 0.0)?;
        assert!(gray_from_channels(&image, &mut gray).is_err());
        Ok(())
    }
}
