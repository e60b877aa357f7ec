//! Filter operations
//!
//! This module provides filter operations for image processing. All the
//! filters replicate the border pixels, i.e. out of bounds reads are clamped
//! to the closest valid pixel.

/// Filter kernels
pub mod kernels;

/// Filter operations
mod ops;
pub use ops::*;

/// Separable filter operations
mod separable_filter;
pub use separable_filter::*;
