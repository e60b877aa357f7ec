use kornia_image::{Image, ImageDtype};
use kornia_imgproc::{
    color::gray_from_channels,
    padding::{spatial_padding, Padding2D, PaddingMode},
};
use rayon::prelude::*;

use crate::error::{ensure_same_size, CornersError};

/// Radius of the Bresenham circle.
const RADIUS: usize = 3;

/// Bresenham circle of radius 3 as `(row, col)` offsets, clockwise from 12 o'clock.
const CIRCLE: [(isize, isize); 16] = [
    (-3, 0),
    (-3, 1),
    (-2, 2),
    (-1, 3),
    (0, 3),
    (1, 3),
    (2, 2),
    (3, 1),
    (3, 0),
    (3, -1),
    (2, -2),
    (1, -3),
    (0, -3),
    (-1, -3),
    (-2, -2),
    (-3, -1),
];

/// Circle positions 1, 5, 9 and 13 used for the early rejection.
const COMPASS: [usize; 4] = [0, 4, 8, 12];

/// How the circle reads pixels outside the image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FastBorder {
    /// Pixels outside the image are black.
    #[default]
    Zero,
    /// Pixels outside the image repeat the outermost row or column.
    Replicate,
}

impl From<FastBorder> for PaddingMode {
    fn from(border: FastBorder) -> Self {
        match border {
            FastBorder::Zero => PaddingMode::Constant,
            FastBorder::Replicate => PaddingMode::Replicate,
        }
    }
}

/// Parameters of the FAST segment test.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FastParams {
    /// Number of contiguous circle pixels that must all be brighter or all darker.
    pub arc_length: usize,
    /// Intensity margin, in normalized units.
    pub threshold: f32,
    /// Border handling of the circle.
    pub border: FastBorder,
}

impl Default for FastParams {
    fn default() -> Self {
        Self {
            arc_length: 12,
            threshold: 0.15,
            border: FastBorder::Zero,
        }
    }
}

impl FastParams {
    /// Create the default parameters: `n = 12`, threshold `0.15`, zero border.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the required arc length `n`.
    pub fn with_arc_length(mut self, arc_length: usize) -> Self {
        self.arc_length = arc_length;
        self
    }

    /// Set the intensity threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the border handling.
    pub fn with_border(mut self, border: FastBorder) -> Self {
        self.border = border;
        self
    }

    /// Checks `1 <= n <= 16` and a finite, non negative threshold.
    pub fn validate(&self) -> Result<(), CornersError> {
        if !(1..=CIRCLE.len()).contains(&self.arc_length) {
            return Err(CornersError::InvalidParameter(format!(
                "fast arc length must be in [1, 16], got {}",
                self.arc_length
            )));
        }
        if !(self.threshold.is_finite() && self.threshold >= 0.0) {
            return Err(CornersError::InvalidParameter(format!(
                "fast threshold must be finite and >= 0, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// FAST corner detector.
///
/// A pixel with intensity `c` is a corner when `n` contiguous pixels of its
/// 16 pixel Bresenham circle are all brighter than `c + threshold` or all
/// darker than `c - threshold`. Multi-channel images are reduced to gray first.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `params` - The segment test parameters.
/// * `dst` - The corner mask with shape (H, W).
///
/// # Example
///
/// ```
/// use kornia_image::Image;
/// use kornia_corners::fast::{fast_corners, FastParams};
///
/// let src = Image::<u8, 1>::from_size_val([9, 9].into(), 0).unwrap();
/// let mut mask = Image::<bool, 1>::from_size_val(src.size(), true).unwrap();
///
/// fast_corners(&src, &FastParams::new(), &mut mask).unwrap();
/// assert!(mask.as_slice().iter().all(|&m| !m));
/// ```
pub fn fast_corners<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    params: &FastParams,
    dst: &mut Image<bool, 1>,
) -> Result<(), CornersError> {
    params.validate()?;
    ensure_same_size(src.size(), dst.size())?;

    let size = src.size();
    if size.num_pixels() == 0 {
        return Ok(());
    }

    let mut gray = Image::<f32, 1>::from_size_val(size, 0.0)?;
    gray_from_channels(&src.to_intensity(), &mut gray)?;

    let mut padded = Image::<f32, 1>::from_size_val(
        [size.width + 2 * RADIUS, size.height + 2 * RADIUS].into(),
        0.0,
    )?;
    spatial_padding(
        &gray,
        &mut padded,
        Padding2D::uniform(RADIUS),
        params.border.into(),
        [0.0],
    )?;

    let stride = padded.cols() as isize;
    let offsets = CIRCLE.map(|(dr, dc)| dr * stride + dc);
    let padded = padded.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(size.width)
        .enumerate()
        .for_each(|(r, dst_row)| {
            for (c, is_corner) in dst_row.iter_mut().enumerate() {
                let center = ((r + RADIUS) * stride as usize + c + RADIUS) as isize;
                let circle = offsets.map(|off| padded[(center + off) as usize]);
                *is_corner = segment_test(padded[center as usize], &circle, params);
            }
        });

    Ok(())
}

/// FAST as a response map: `1.0` at corners and `0.0` elsewhere.
pub fn fast_response<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    params: &FastParams,
    dst: &mut Image<f32, 1>,
) -> Result<(), CornersError> {
    ensure_same_size(src.size(), dst.size())?;

    let mut mask = Image::<bool, 1>::from_size_val(src.size(), false)?;
    fast_corners(src, params, &mut mask)?;

    dst.as_slice_mut()
        .iter_mut()
        .zip(mask.as_slice())
        .for_each(|(out, &m)| *out = if m { 1.0 } else { 0.0 });

    Ok(())
}

/// Segment test on the 16 circle values around `center`.
fn segment_test(center: f32, circle: &[f32; 16], params: &FastParams) -> bool {
    let n = params.arc_length;
    let upper = center + params.threshold;
    let lower = center - params.threshold;

    // a run of 12 or more always covers at least 3 of the 4 compass points
    if n >= 12 {
        let bright = COMPASS.iter().filter(|&&i| circle[i] > upper).count();
        let dark = COMPASS.iter().filter(|&&i| circle[i] < lower).count();
        if bright < 3 && dark < 3 {
            return false;
        }
    }

    let mut consecutive_brighter = 0;
    let mut consecutive_darker = 0;

    for i in 0..(CIRCLE.len() - 1 + n) {
        let pixel = circle[i % CIRCLE.len()];
        if pixel > upper {
            consecutive_brighter += 1;
            consecutive_darker = 0;
        } else if pixel < lower {
            consecutive_darker += 1;
            consecutive_brighter = 0;
        } else {
            consecutive_brighter = 0;
            consecutive_darker = 0;
        }

        if consecutive_brighter >= n || consecutive_darker >= n {
            return true;
        }
    }

    false
}
