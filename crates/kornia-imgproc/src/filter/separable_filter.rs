use kornia_image::{Image, ImageError};
use rayon::prelude::*;

/// A separable 2D filter that applies horizontal and vertical 1D correlations sequentially.
///
/// This struct caches the kernel data and the precomputed tap offsets.
struct SeparableFilter<'a> {
    kernel_x: &'a [f32],
    kernel_y: &'a [f32],
    offsets_x: Vec<isize>,
    offsets_y: Vec<isize>,
}

impl<'a> SeparableFilter<'a> {
    fn new(kernel_x: &'a [f32], kernel_y: &'a [f32]) -> Self {
        let half_x = (kernel_x.len() / 2) as isize;
        let half_y = (kernel_y.len() / 2) as isize;

        Self {
            kernel_x,
            kernel_y,
            offsets_x: (0..kernel_x.len() as isize).map(|i| i - half_x).collect(),
            offsets_y: (0..kernel_y.len() as isize).map(|i| i - half_y).collect(),
        }
    }

    /// Performs horizontal filtering followed by vertical filtering using a temporary buffer.
    fn apply<const C: usize>(&self, src_data: &[f32], dst_data: &mut [f32], rows: usize, cols: usize) {
        let row_len = cols * C;
        let mut temp = vec![0.0f32; src_data.len()];

        // horizontal
        temp.par_chunks_exact_mut(row_len)
            .zip(src_data.par_chunks_exact(row_len))
            .for_each(|(row_temp, row_src)| {
                for c in 0..cols {
                    let mut acc = [0.0f32; C];
                    for (&k, &off) in self.kernel_x.iter().zip(self.offsets_x.iter()) {
                        let x = (c as isize + off).clamp(0, cols as isize - 1) as usize;
                        let pixel = &row_src[x * C..(x + 1) * C];
                        for (acc_val, &v) in acc.iter_mut().zip(pixel) {
                            *acc_val += v * k;
                        }
                    }
                    row_temp[c * C..(c + 1) * C].copy_from_slice(&acc);
                }
            });

        // vertical
        dst_data
            .par_chunks_exact_mut(row_len)
            .enumerate()
            .for_each(|(r, row_dst)| {
                row_dst.fill(0.0);
                for (&k, &off) in self.kernel_y.iter().zip(self.offsets_y.iter()) {
                    let y = (r as isize + off).clamp(0, rows as isize - 1) as usize;
                    let row_temp = &temp[y * row_len..(y + 1) * row_len];
                    for (dst_val, &v) in row_dst.iter_mut().zip(row_temp) {
                        *dst_val += v * k;
                    }
                }
            });
    }
}

/// Apply a separable filter to an image.
///
/// The image is correlated with `kernel_x` along the rows and then with
/// `kernel_y` along the columns. Out of bounds pixels replicate the border.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_x` - The horizontal kernel.
/// * `kernel_y` - The vertical kernel.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn separable_filter<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    kernel_x: &[f32],
    kernel_y: &[f32],
) -> Result<(), ImageError> {
    if kernel_x.is_empty() || kernel_y.is_empty() {
        return Err(ImageError::InvalidKernelLength(
            kernel_x.len(),
            kernel_y.len(),
        ));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    if src.size().num_pixels() == 0 {
        return Ok(());
    }

    let (rows, cols) = (src.rows(), src.cols());
    SeparableFilter::new(kernel_x, kernel_y).apply::<C>(src.as_slice(), dst.as_slice_mut(), rows, cols);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kornia_image::ImageSize;

    #[test]
    fn test_separable_filter_identity() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 3,
        };
        let data = (0..12).map(|x| x as f32).collect::<Vec<_>>();
        let src = Image::<f32, 1>::new(size, data.clone())?;
        let mut dst = Image::<f32, 1>::from_size_val(size, 0.0)?;

        separable_filter(&src, &mut dst, &[0.0, 1.0, 0.0], &[1.0])?;

        assert_eq!(dst.as_slice(), data.as_slice());
        Ok(())
    }

    #[test]
    fn test_separable_filter_replicate_border() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 5,
            height: 5,
        };

        #[rustfmt::skip]
        let src = Image::<f32, 1>::new(
            size,
            vec![
                9.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 9.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ],
        )?;

        let mut dst = Image::<f32, 1>::from_size_val(size, 0.0)?;
        let kernel = [1.0; 3];
        separable_filter(&src, &mut dst, &kernel, &kernel)?;

        // the corner pixel is replicated four times in its own 3x3 window
        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                36.0, 18.0, 0.0, 0.0, 0.0,
                18.0, 18.0, 9.0, 9.0, 0.0,
                 0.0,  9.0, 9.0, 9.0, 0.0,
                 0.0,  9.0, 9.0, 9.0, 0.0,
                 0.0,  0.0, 0.0, 0.0, 0.0,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_separable_filter_multichannel() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 3,
            height: 1,
        };
        let src = Image::<f32, 2>::new(size, vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0])?;
        let mut dst = Image::<f32, 2>::from_size_val(size, 0.0)?;

        separable_filter(&src, &mut dst, &[-0.5, 0.0, 0.5], &[1.0])?;

        assert_eq!(dst.as_slice(), &[0.5, 5.0, 1.0, 10.0, 0.5, 5.0]);
        Ok(())
    }

    #[test]
    fn test_separable_filter_errors() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::from_size_val([3, 3].into(), 0.0)?;
        let mut dst = Image::<f32, 1>::from_size_val([3, 2].into(), 0.0)?;

        assert_eq!(
            separable_filter(&src, &mut dst, &[1.0], &[1.0]),
            Err(ImageError::InvalidImageSize(3, 3, 3, 2))
        );

        let mut dst = src.clone();
        assert_eq!(
            separable_filter(&src, &mut dst, &[], &[1.0]),
            Err(ImageError::InvalidKernelLength(0, 1))
        );
        Ok(())
    }
}
