//! Pointwise corner responses built on the image gradients.
//!
//! Multi-channel images are scored channel by channel and the per-channel
//! responses are then reduced to one value per pixel with
//! [`kornia_imgproc::color::luma`].

use kornia_image::{Image, ImageDtype};
use kornia_imgproc::{color::gray_from_channels, filter::spatial_gradient, parallel};
use rayon::prelude::*;

use crate::covariance::{GradientCovariance, Weighting};
use crate::error::{ensure_same_size, CornersError};

/// Harris score of a structure tensor: `det - k * trace^2`.
#[inline]
pub fn harris_score(xx: f32, xy: f32, yy: f32, k: f32) -> f32 {
    let trace = xx + yy;
    xx * yy - xy * xy - k * trace * trace
}

/// Shi-Tomasi score of a structure tensor, i.e. its smaller eigenvalue.
#[inline]
pub fn shi_tomasi_score(xx: f32, xy: f32, yy: f32) -> f32 {
    let diff = xx - yy;
    ((xx + yy) - (diff * diff + 4.0 * xy * xy).sqrt()) / 2.0
}

/// Kitchen-Rosenfeld score from the first and second order derivatives.
///
/// Flat pixels, where `ix^2 + iy^2 == 0`, score exactly zero.
#[inline]
pub fn kitchen_rosenfeld_score(ix: f32, iy: f32, ixx: f32, ixy: f32, iyy: f32) -> f32 {
    let magnitude = ix * ix + iy * iy;
    if magnitude == 0.0 {
        return 0.0;
    }
    (ixx * iy * iy + iyy * ix * ix - 2.0 * ixy * ix * iy) / magnitude
}

/// Scores every element of a structure tensor and reduces the channels into `dst`.
fn tensor_response<T, const C: usize>(
    covariance: &GradientCovariance,
    src: &Image<T, C>,
    dst: &mut Image<f32, 1>,
    score: impl Fn(f32, f32, f32) -> f32 + Send + Sync,
) -> Result<(), CornersError>
where
    T: ImageDtype,
{
    ensure_same_size(src.size(), dst.size())?;

    let tensor = covariance.compute(&src.to_intensity())?;

    let mut response = Image::<f32, C>::from_size_val(src.size(), 0.0)?;
    parallel::par_iter_rows_val_three(
        &tensor.xx,
        &tensor.xy,
        &tensor.yy,
        &mut response,
        |xx, xy, yy, out| *out = score(*xx, *xy, *yy),
    );

    gray_from_channels(&response, dst)?;

    Ok(())
}

/// Harris corner response.
///
/// `response = xx * yy - xy^2 - k * (xx + yy)^2` over the smoothed gradient covariance.
///
/// # Example
///
/// ```
/// use kornia_image::Image;
/// use kornia_corners::response::HarrisResponse;
///
/// let src = Image::<u8, 1>::from_size_val([8, 8].into(), 128).unwrap();
/// let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0).unwrap();
///
/// HarrisResponse::new().with_k(0.05).compute(&src, &mut dst).unwrap();
/// assert!(dst.as_slice().iter().all(|&v| v == 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HarrisResponse {
    /// Sensitivity factor penalizing edges.
    pub k: f32,
    /// Covariance operator.
    pub covariance: GradientCovariance,
}

impl Default for HarrisResponse {
    fn default() -> Self {
        Self {
            k: 0.04,
            covariance: GradientCovariance::default(),
        }
    }
}

impl HarrisResponse {
    /// Create a new Harris response with `k = 0.04` and a 3x3 mean window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sensitivity factor.
    pub fn with_k(mut self, k: f32) -> Self {
        self.k = k;
        self
    }

    /// Set the covariance window.
    pub fn with_weighting(mut self, weighting: Weighting) -> Self {
        self.covariance = GradientCovariance::new(weighting);
        self
    }

    /// Compute the response of `src` into `dst`.
    ///
    /// PRECONDITION: `src` and `dst` must have the same size.
    pub fn compute<T: ImageDtype, const C: usize>(
        &self,
        src: &Image<T, C>,
        dst: &mut Image<f32, 1>,
    ) -> Result<(), CornersError> {
        if !self.k.is_finite() {
            return Err(CornersError::InvalidParameter(format!(
                "harris k must be finite, got {}",
                self.k
            )));
        }
        let k = self.k;
        tensor_response(&self.covariance, src, dst, move |xx, xy, yy| {
            harris_score(xx, xy, yy, k)
        })
    }
}

/// Shi-Tomasi corner response: the smaller eigenvalue of the structure tensor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShiTomasiResponse {
    /// Covariance operator.
    pub covariance: GradientCovariance,
}

impl ShiTomasiResponse {
    /// Create a new Shi-Tomasi response with a 3x3 mean window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the covariance window.
    pub fn with_weighting(mut self, weighting: Weighting) -> Self {
        self.covariance = GradientCovariance::new(weighting);
        self
    }

    /// Compute the response of `src` into `dst`.
    ///
    /// PRECONDITION: `src` and `dst` must have the same size.
    pub fn compute<T: ImageDtype, const C: usize>(
        &self,
        src: &Image<T, C>,
        dst: &mut Image<f32, 1>,
    ) -> Result<(), CornersError> {
        tensor_response(&self.covariance, src, dst, shi_tomasi_score)
    }
}

/// Kitchen-Rosenfeld corner response.
///
/// Uses the first derivatives `Ix, Iy` and the second derivatives
/// `Ixx = d(Ix)/dx`, `Ixy = d(Ix)/dy`, `Iyy = d(Iy)/dy`, all computed with the
/// normalized sobel operator. No covariance smoothing is involved.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KitchenRosenfeldResponse;

impl KitchenRosenfeldResponse {
    /// Create a new Kitchen-Rosenfeld response.
    pub fn new() -> Self {
        Self
    }

    /// Compute the response of `src` into `dst`.
    ///
    /// PRECONDITION: `src` and `dst` must have the same size.
    pub fn compute<T: ImageDtype, const C: usize>(
        &self,
        src: &Image<T, C>,
        dst: &mut Image<f32, 1>,
    ) -> Result<(), CornersError> {
        ensure_same_size(src.size(), dst.size())?;

        let size = src.size();
        let src = src.to_intensity();

        let mut ix = Image::<f32, C>::from_size_val(size, 0.0)?;
        let mut iy = Image::<f32, C>::from_size_val(size, 0.0)?;
        spatial_gradient(&src, &mut ix, &mut iy)?;

        let mut ixx = Image::<f32, C>::from_size_val(size, 0.0)?;
        let mut ixy = Image::<f32, C>::from_size_val(size, 0.0)?;
        spatial_gradient(&ix, &mut ixx, &mut ixy)?;

        let mut iyx = Image::<f32, C>::from_size_val(size, 0.0)?;
        let mut iyy = Image::<f32, C>::from_size_val(size, 0.0)?;
        spatial_gradient(&iy, &mut iyx, &mut iyy)?;

        let (ix, iy) = (ix.as_slice(), iy.as_slice());
        let (ixx, ixy, iyy) = (ixx.as_slice(), ixy.as_slice(), iyy.as_slice());

        let mut response = Image::<f32, C>::from_size_val(size, 0.0)?;
        response
            .as_slice_mut()
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, out)| {
                *out = kitchen_rosenfeld_score(ix[i], iy[i], ixx[i], ixy[i], iyy[i]);
            });

        gray_from_channels(&response, dst)?;

        Ok(())
    }
}
