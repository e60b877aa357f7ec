use kornia_image::{Image, ImageDtype};

use crate::error::CornersError;
use crate::extract::{count_corners, extract_corners, mask_to_coordinates, ExtractionPolicy};
use crate::fast::{fast_corners, fast_response, FastParams};
use crate::moravec::MoravecResponse;
use crate::response::{HarrisResponse, KitchenRosenfeldResponse, ShiTomasiResponse};
use crate::subpixel::{refine_to_subpixel, HomogeneousPoint};

/// The available corner detectors with their parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CornerDetector {
    /// Harris response.
    Harris(HarrisResponse),
    /// Shi-Tomasi response.
    ShiTomasi(ShiTomasiResponse),
    /// Kitchen-Rosenfeld response.
    KitchenRosenfeld(KitchenRosenfeldResponse),
    /// FAST segment test. It has no response of its own: its response map is
    /// `1.0` at corners and `0.0` elsewhere, and extraction policies do not apply.
    Fast(FastParams),
    /// Moravec windowed response, zero outside the interior region.
    Moravec(MoravecResponse),
}

impl Default for CornerDetector {
    fn default() -> Self {
        CornerDetector::Harris(HarrisResponse::default())
    }
}

impl CornerDetector {
    /// Short name of the detector.
    pub fn name(&self) -> &'static str {
        match self {
            CornerDetector::Harris(_) => "harris",
            CornerDetector::ShiTomasi(_) => "shi-tomasi",
            CornerDetector::KitchenRosenfeld(_) => "kitchen-rosenfeld",
            CornerDetector::Fast(_) => "fast",
            CornerDetector::Moravec(_) => "moravec",
        }
    }

    /// Compute the response map of `src` into `dst`.
    ///
    /// PRECONDITION: `src` and `dst` must have the same size.
    pub fn compute_response<T: ImageDtype, const C: usize>(
        &self,
        src: &Image<T, C>,
        dst: &mut Image<f32, 1>,
    ) -> Result<(), CornersError> {
        match self {
            CornerDetector::Harris(harris) => harris.compute(src, dst),
            CornerDetector::ShiTomasi(shi_tomasi) => shi_tomasi.compute(src, dst),
            CornerDetector::KitchenRosenfeld(kr) => kr.compute(src, dst),
            CornerDetector::Fast(params) => fast_response(src, params, dst),
            CornerDetector::Moravec(moravec) => moravec.compute(src, dst),
        }
    }
}

/// Response map and corner mask of an image.
fn response_and_mask<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    detector: &CornerDetector,
    policy: &ExtractionPolicy,
) -> Result<(Image<f32, 1>, Image<bool, 1>), CornersError> {
    let mut response = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    let mut mask = Image::<bool, 1>::from_size_val(src.size(), false)?;

    if let CornerDetector::Fast(params) = detector {
        fast_corners(src, params, &mut mask)?;
    } else {
        detector.compute_response(src, &mut response)?;
        extract_corners(&response, policy, &mut mask)?;
    }

    Ok((response, mask))
}

/// Detect the corners of an image.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `detector` - The detector and its parameters.
/// * `policy` - How corners are selected from the response. Ignored by FAST.
///
/// # Returns
///
/// The corner mask with shape (H, W).
///
/// # Example
///
/// ```
/// use kornia_image::Image;
/// use kornia_corners::{detect_corners, CornerDetector, ExtractionPolicy};
///
/// let src = Image::<u8, 1>::from_size_val([16, 16].into(), 0).unwrap();
/// let mask = detect_corners(&src, &CornerDetector::default(), &ExtractionPolicy::default()).unwrap();
///
/// assert_eq!(mask.size(), src.size());
/// ```
pub fn detect_corners<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    detector: &CornerDetector,
    policy: &ExtractionPolicy,
) -> Result<Image<bool, 1>, CornersError> {
    log::debug!(
        "detecting corners with {} on a {} image",
        detector.name(),
        src.size()
    );

    let (_, mask) = response_and_mask(src, detector, policy)?;

    log::debug!("{}: {} corners", detector.name(), count_corners(&mask));

    Ok(mask)
}

/// Detect the corners of an image and refine them to sub-pixel precision.
///
/// FAST corners are returned at their integer locations.
///
/// # Returns
///
/// The corners in row-major order, as points `(x, y, 1)`.
pub fn detect_corners_subpixel<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    detector: &CornerDetector,
    policy: &ExtractionPolicy,
) -> Result<Vec<HomogeneousPoint>, CornersError> {
    log::debug!(
        "detecting sub-pixel corners with {} on a {} image",
        detector.name(),
        src.size()
    );

    let (response, mask) = response_and_mask(src, detector, policy)?;

    let points: Vec<HomogeneousPoint> = match detector {
        CornerDetector::Fast(_) => mask_to_coordinates(&mask)
            .into_iter()
            .map(HomogeneousPoint::from_pixel)
            .collect(),
        _ => refine_to_subpixel(&response, &mask)?,
    };

    log::debug!("{}: {} corners", detector.name(), points.len());

    Ok(points)
}
