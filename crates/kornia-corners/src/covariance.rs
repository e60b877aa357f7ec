//! Gradient covariance, a.k.a. the second moment or structure tensor.
//!
//! For every pixel the products `Ix * Ix`, `Ix * Iy` and `Iy * Iy` of the
//! image gradients are formed and then smoothed independently with a
//! [`Weighting`] window.

use kornia_image::Image;
use kornia_imgproc::filter::{box_blur, gaussian_blur, kernels, spatial_gradient};
use kornia_imgproc::parallel;

use crate::error::CornersError;

/// Window used to smooth the gradient products.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Weighting {
    /// Normalized box filter of `kernel_size x kernel_size` pixels. The size must be odd.
    Mean {
        /// Side of the square window.
        kernel_size: usize,
    },
    /// Gaussian window with standard deviation `gamma`.
    Gamma {
        /// Smoothing scale, must be positive.
        gamma: f32,
    },
}

impl Default for Weighting {
    fn default() -> Self {
        Weighting::Mean { kernel_size: 3 }
    }
}

impl Weighting {
    /// Gaussian weighting with the default scale of 1.4.
    pub fn gamma_default() -> Self {
        Weighting::Gamma { gamma: 1.4 }
    }

    /// Checks the window parameters.
    pub fn validate(&self) -> Result<(), CornersError> {
        match *self {
            Weighting::Mean { kernel_size } if kernel_size == 0 || kernel_size % 2 == 0 => {
                Err(CornersError::InvalidParameter(format!(
                    "mean weighting kernel size must be odd and >= 1, got {kernel_size}"
                )))
            }
            Weighting::Gamma { gamma } if !(gamma.is_finite() && gamma > 0.0) => {
                Err(CornersError::InvalidParameter(format!(
                    "gamma weighting scale must be finite and > 0, got {gamma}"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Smooths `src` into `dst` with the window.
    pub fn smooth<const C: usize>(
        &self,
        src: &Image<f32, C>,
        dst: &mut Image<f32, C>,
    ) -> Result<(), CornersError> {
        self.validate()?;
        match *self {
            Weighting::Mean { kernel_size } => box_blur(src, dst, (kernel_size, kernel_size))?,
            Weighting::Gamma { gamma } => {
                let kernel_size = kernels::gaussian_kernel_size(gamma)?;
                gaussian_blur(src, dst, (kernel_size, kernel_size), (gamma, gamma))?
            }
        }
        Ok(())
    }
}

/// The three distinct entries of the smoothed 2x2 structure tensor, per pixel and channel.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureTensor<const C: usize> {
    /// Smoothed `Ix * Ix`.
    pub xx: Image<f32, C>,
    /// Smoothed `Ix * Iy`.
    pub xy: Image<f32, C>,
    /// Smoothed `Iy * Iy`.
    pub yy: Image<f32, C>,
}

/// Computes the smoothed gradient covariance of an image.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GradientCovariance {
    /// Window used to smooth the gradient products.
    pub weighting: Weighting,
}

impl GradientCovariance {
    /// Create a new covariance operator with the given window.
    pub fn new(weighting: Weighting) -> Self {
        Self { weighting }
    }

    /// Compute the structure tensor of an intensity image.
    ///
    /// Gradients use the normalized sobel operator and replicate the border.
    ///
    /// # Arguments
    ///
    /// * `src` - The intensity image with shape (H, W, C).
    ///
    /// # Returns
    ///
    /// The three smoothed covariance fields, each with the shape of `src`.
    pub fn compute<const C: usize>(
        &self,
        src: &Image<f32, C>,
    ) -> Result<StructureTensor<C>, CornersError> {
        self.weighting.validate()?;

        let size = src.size();
        let mut dx = Image::<f32, C>::from_size_val(size, 0.0)?;
        let mut dy = Image::<f32, C>::from_size_val(size, 0.0)?;
        spatial_gradient(src, &mut dx, &mut dy)?;

        let mut dx2 = Image::<f32, C>::from_size_val(size, 0.0)?;
        let mut dxy = Image::<f32, C>::from_size_val(size, 0.0)?;
        let mut dy2 = Image::<f32, C>::from_size_val(size, 0.0)?;
        parallel::par_iter_rows_val_two(&dx, &dx, &mut dx2, |a, b, out| *out = a * b);
        parallel::par_iter_rows_val_two(&dx, &dy, &mut dxy, |a, b, out| *out = a * b);
        parallel::par_iter_rows_val_two(&dy, &dy, &mut dy2, |a, b, out| *out = a * b);

        let mut tensor = StructureTensor {
            xx: Image::from_size_val(size, 0.0)?,
            xy: Image::from_size_val(size, 0.0)?,
            yy: Image::from_size_val(size, 0.0)?,
        };
        self.weighting.smooth(&dx2, &mut tensor.xx)?;
        self.weighting.smooth(&dxy, &mut tensor.xy)?;
        self.weighting.smooth(&dy2, &mut tensor.yy)?;

        Ok(tensor)
    }
}
