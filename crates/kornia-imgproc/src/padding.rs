use kornia_image::{Image, ImageError};
use rayon::prelude::*;

/// A border type for the spatial padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingMode {
    /// This border type fills the border with a single, constant color value.
    ///
    /// Example: ...d c b a | 0 0 0 0...
    Constant,

    /// This border type takes the outermost row or column of pixels and repeats it into the padded region.
    ///
    /// Example: ...d c b a | a a a a...
    Replicate,
}

impl PaddingMode {
    /// Maps index `i` to a valid index i.e. within `[0, len)` according to the padding mode.
    ///
    /// Returns `None` when the index falls in a constant border.
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> Option<usize> {
        match self {
            PaddingMode::Replicate => Some(i.clamp(0, len as isize - 1) as usize),
            PaddingMode::Constant => (i >= 0 && i < len as isize).then_some(i as usize),
        }
    }
}

/// Represents 2D padding with top, bottom, left, and right values (in pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding2D {
    /// Amount of padding to add on the top side.
    pub top: usize,
    /// Amount of padding to add on the bottom side.
    pub bottom: usize,
    /// Amount of padding to add on the left side.
    pub left: usize,
    /// Amount of padding to add on the right side.
    pub right: usize,
}

impl Padding2D {
    /// Same amount of padding on the four sides.
    pub fn uniform(amount: usize) -> Self {
        Self {
            top: amount,
            bottom: amount,
            left: amount,
            right: amount,
        }
    }
}

/// Pads an image into `dst`, centering the original image and filling the border
/// according to `padding_mode`.
///
/// # Arguments
///
/// * `src` - The source image to pad.
/// * `dst` - The destination image where the padded output will be stored.
/// * `padding` - The amount of padding (in pixels) for all four sides.
/// * `padding_mode` - The type of border handling to use.
/// * `constant_value` - The pixel value used for constant padding, one value per channel.
///
/// # Errors
///
/// Returns an error if the size of `dst` does not match the size of `src` plus the padding.
/// Replicate padding of an empty image is also an error since there is no pixel to replicate.
///
/// # Example
///
/// ```rust
/// use kornia_image::Image;
/// use kornia_imgproc::padding::{spatial_padding, Padding2D, PaddingMode};
///
/// let src = Image::<u8, 1>::new([2, 2].into(), vec![1, 2, 3, 4]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val([4, 4].into(), 0).unwrap();
///
/// spatial_padding(&src, &mut dst, Padding2D::uniform(1), PaddingMode::Constant, [0]).unwrap();
///
/// assert_eq!(dst.as_slice()[5], 1);
/// assert_eq!(dst.as_slice()[0], 0);
/// ```
pub fn spatial_padding<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    padding: Padding2D,
    padding_mode: PaddingMode,
    constant_value: [T; C],
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    let expected_width = src.width() + padding.left + padding.right;
    let expected_height = src.height() + padding.top + padding.bottom;
    if dst.width() != expected_width || dst.height() != expected_height {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            expected_width,
            expected_height,
        ));
    }

    if padding_mode == PaddingMode::Replicate && src.size().num_pixels() == 0 {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            1,
            1,
        ));
    }

    if dst.size().num_pixels() == 0 {
        return Ok(());
    }

    let (old_width, old_height) = (src.width(), src.height());
    let old_data = src.as_slice();
    let new_stride = dst.width() * C;

    dst.as_slice_mut()
        .par_chunks_exact_mut(new_stride)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let src_y = padding_mode.map_index(y as isize - padding.top as isize, old_height);
            for (x, dst_pixel) in dst_row.chunks_exact_mut(C).enumerate() {
                let src_x = padding_mode.map_index(x as isize - padding.left as isize, old_width);
                match (src_y, src_x) {
                    (Some(sy), Some(sx)) => {
                        let idx = (sy * old_width + sx) * C;
                        dst_pixel.copy_from_slice(&old_data[idx..idx + C]);
                    }
                    _ => dst_pixel.copy_from_slice(&constant_value),
                }
            }
        });

    Ok(())
}
