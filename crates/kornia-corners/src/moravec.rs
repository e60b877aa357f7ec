use kornia_image::{Image, ImageDtype};
use kornia_imgproc::{color::gray_from_channels, parallel};
use rayon::prelude::*;

use crate::covariance::{GradientCovariance, Weighting};
use crate::error::{ensure_same_size, CornersError};

/// The eight unit displacements of the window.
const SHIFTS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Moravec style corner response.
///
/// The field compared is the trace `xx + yy` of the smoothed gradient
/// covariance. For each interior pixel the sum of squared differences between
/// the window centered there and the window displaced by each unit shift is
/// computed, and the response is the minimum over the eight shifts. Pixels
/// whose displaced windows would leave the image get a response of zero.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoravecResponse {
    /// Side of the square comparison window, odd.
    pub window_size: usize,
    /// Covariance operator providing the compared field.
    pub covariance: GradientCovariance,
}

impl Default for MoravecResponse {
    fn default() -> Self {
        Self {
            window_size: 3,
            covariance: GradientCovariance::default(),
        }
    }
}

impl MoravecResponse {
    /// Create a new Moravec response with a 3x3 window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the comparison window size.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the covariance window.
    pub fn with_weighting(mut self, weighting: Weighting) -> Self {
        self.covariance = GradientCovariance::new(weighting);
        self
    }

    /// Checks that the window size is odd and positive.
    pub fn validate(&self) -> Result<(), CornersError> {
        if self.window_size == 0 || self.window_size % 2 == 0 {
            return Err(CornersError::InvalidParameter(format!(
                "moravec window size must be odd and >= 1, got {}",
                self.window_size
            )));
        }
        self.covariance.weighting.validate()
    }

    /// Compute the response of `src` into `dst`.
    ///
    /// PRECONDITION: `src` and `dst` must have the same size.
    pub fn compute<T: ImageDtype, const C: usize>(
        &self,
        src: &Image<T, C>,
        dst: &mut Image<f32, 1>,
    ) -> Result<(), CornersError> {
        self.validate()?;
        ensure_same_size(src.size(), dst.size())?;

        let size = src.size();
        let tensor = self.covariance.compute(&src.to_intensity())?;

        let mut field = Image::<f32, C>::from_size_val(size, 0.0)?;
        parallel::par_iter_rows_val_two(&tensor.xx, &tensor.yy, &mut field, |xx, yy, out| {
            *out = xx + yy
        });

        let mut response = Image::<f32, C>::from_size_val(size, 0.0)?;
        min_shift_ssd(&field, self.window_size / 2, &mut response);

        gray_from_channels(&response, dst)?;

        Ok(())
    }
}

/// Minimum windowed SSD over the unit shifts, per channel.
fn min_shift_ssd<const C: usize>(field: &Image<f32, C>, half: usize, dst: &mut Image<f32, C>) {
    dst.as_slice_mut().fill(0.0);

    let (rows, cols) = (field.rows(), field.cols());
    // the displaced window must stay inside the image
    if rows < 2 * half + 3 || cols < 2 * half + 3 {
        return;
    }

    let data = field.as_slice();
    let at = |r: isize, c: isize, ch: usize| data[(r as usize * cols + c as usize) * C + ch];
    let half = half as isize;

    dst.as_slice_mut()
        .par_chunks_exact_mut(cols * C)
        .enumerate()
        .for_each(|(r, dst_row)| {
            let interior = (half as usize + 1)..=(rows - half as usize - 2);
            if !interior.contains(&r) {
                return;
            }
            for c in (half as usize + 1)..=(cols - half as usize - 2) {
                for ch in 0..C {
                    let mut best = f32::INFINITY;
                    for (dr, dc) in SHIFTS {
                        let mut ssd = 0.0;
                        for i in -half..=half {
                            for j in -half..=half {
                                let (wr, wc) = (r as isize + i, c as isize + j);
                                let diff = at(wr, wc, ch) - at(wr + dr, wc + dc, ch);
                                ssd += diff * diff;
                            }
                        }
                        best = best.min(ssd);
                    }
                    dst_row[c * C + ch] = best;
                }
            }
        });
}
