use rayon::prelude::*;

use kornia_image::Image;

/// Apply a function to each pixel in the image in parallel.
///
/// The rows of `src` and `dst` are processed in parallel; each call of `f`
/// receives the channels of one source pixel and of the matching destination pixel.
///
/// PRECONDITION: `src` and `dst` must have the same size.
pub fn par_iter_rows<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&[T1], &mut [T2]) + Send + Sync,
) where
    T1: Send + Sync,
    T2: Send + Sync,
{
    if src.size().num_pixels() == 0 {
        return;
    }

    src.as_slice()
        .par_chunks_exact(C1 * src.cols())
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * src.cols()))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .chunks_exact(C1)
                .zip(dst_chunk.chunks_exact_mut(C2))
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each element of two images in parallel.
///
/// PRECONDITION: `src1`, `src2` and `dst` must have the same size.
pub fn par_iter_rows_val_two<T1, T2, T3, const C: usize>(
    src1: &Image<T1, C>,
    src2: &Image<T2, C>,
    dst: &mut Image<T3, C>,
    f: impl Fn(&T1, &T2, &mut T3) + Send + Sync,
) where
    T1: Send + Sync,
    T2: Send + Sync,
    T3: Send + Sync,
{
    if src1.size().num_pixels() == 0 {
        return;
    }

    let row_len = C * src1.cols();
    src1.as_slice()
        .par_chunks_exact(row_len)
        .zip(src2.as_slice().par_chunks_exact(row_len))
        .zip(dst.as_slice_mut().par_chunks_exact_mut(row_len))
        .for_each(|((src1_chunk, src2_chunk), dst_chunk)| {
            src1_chunk
                .iter()
                .zip(src2_chunk.iter())
                .zip(dst_chunk.iter_mut())
                .for_each(|((src1_val, src2_val), dst_val)| {
                    f(src1_val, src2_val, dst_val);
                });
        });
}

/// Apply a function to each element of three images in parallel.
///
/// PRECONDITION: `src1`, `src2`, `src3` and `dst` must have the same size.
pub fn par_iter_rows_val_three<T1, T2, T3, T4, const C: usize>(
    src1: &Image<T1, C>,
    src2: &Image<T2, C>,
    src3: &Image<T3, C>,
    dst: &mut Image<T4, C>,
    f: impl Fn(&T1, &T2, &T3, &mut T4) + Send + Sync,
) where
    T1: Send + Sync,
    T2: Send + Sync,
    T3: Send + Sync,
    T4: Send + Sync,
{
    if src1.size().num_pixels() == 0 {
        return;
    }

    let row_len = C * src1.cols();
    src1.as_slice()
        .par_chunks_exact(row_len)
        .zip(src2.as_slice().par_chunks_exact(row_len))
        .zip(src3.as_slice().par_chunks_exact(row_len))
        .zip(dst.as_slice_mut().par_chunks_exact_mut(row_len))
        .for_each(|(((src1_chunk, src2_chunk), src3_chunk), dst_chunk)| {
            src1_chunk
                .iter()
                .zip(src2_chunk.iter())
                .zip(src3_chunk.iter())
                .zip(dst_chunk.iter_mut())
                .for_each(|(((v1, v2), v3), dst_val)| {
                    f(v1, v2, v3, dst_val);
                });
        });
}
