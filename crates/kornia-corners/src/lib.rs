#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// gradient covariance module.
pub mod covariance;

/// corner detection entry points.
pub mod detector;

/// error types for the corner detectors.
pub mod error;

/// corner extraction module.
pub mod extract;

/// FAST corner detector module.
pub mod fast;

/// Moravec corner detector module.
pub mod moravec;

/// corner response module.
pub mod response;

/// sub-pixel refinement module.
pub mod subpixel;

pub use crate::covariance::{GradientCovariance, StructureTensor, Weighting};
pub use crate::detector::{detect_corners, detect_corners_subpixel, CornerDetector};
pub use crate::error::CornersError;
pub use crate::extract::{extract_corners, ExtractionPolicy, Threshold};
pub use crate::fast::{fast_corners, FastBorder, FastParams};
pub use crate::moravec::MoravecResponse;
pub use crate::response::{HarrisResponse, KitchenRosenfeldResponse, ShiTomasiResponse};
pub use crate::subpixel::{
    refine_to_subpixel, refine_to_subpixel_with_policy, DegenerateFitPolicy, HomogeneousPoint,
    MAX_VERTEX_OFFSET,
};
