use kornia_image::Image;
use rayon::prelude::*;

/// Find the strict local maxima of a single channel map.
///
/// A pixel is a local maximum when its value is strictly greater than the
/// value of every 8-connected neighbour inside the image. Border pixels are
/// compared against their in-bounds neighbours only. NaN values are never maxima.
///
/// # Arguments
///
/// * `src` - The input map with shape (H, W).
///
/// # Returns
///
/// The `[row, col]` coordinates of the maxima in row-major order.
///
/// # Example
///
/// ```
/// use kornia_image::Image;
/// use kornia_imgproc::features::local_maxima;
///
/// let map = Image::<f32, 1>::new([3, 2].into(), vec![0.0, 1.0, 0.0, 0.0, 0.0, 2.0]).unwrap();
/// assert_eq!(local_maxima(&map), vec![[1, 2]]);
/// ```
pub fn local_maxima(src: &Image<f32, 1>) -> Vec<[usize; 2]> {
    let (rows, cols) = (src.rows(), src.cols());
    if rows == 0 || cols == 0 {
        return vec![];
    }

    let data = src.as_slice();

    (0..rows)
        .into_par_iter()
        .flat_map_iter(|r| {
            (0..cols)
                .filter(move |&c| is_strict_maximum(data, rows, cols, r, c))
                .map(move |c| [r, c])
        })
        .collect()
}

#[inline]
fn is_strict_maximum(data: &[f32], rows: usize, cols: usize, r: usize, c: usize) -> bool {
    let center = data[r * cols + c];
    let (r0, r1) = (r.saturating_sub(1), (r + 1).min(rows - 1));
    let (c0, c1) = (c.saturating_sub(1), (c + 1).min(cols - 1));

    for nr in r0..=r1 {
        for nc in c0..=c1 {
            if (nr, nc) == (r, c) {
                continue;
            }
            // written negated so that NaN on either side rejects the pixel
            if !(center > data[nr * cols + nc]) {
                return false;
            }
        }
    }

    !center.is_nan()
}
