#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color transformations module.
pub mod color;

/// image basic operations module.
pub mod core;

/// feature detection helpers module.
pub mod features;

/// image filtering module.
pub mod filter;

/// image padding module.
pub mod padding;

/// module containing parallization utilities.
pub mod parallel;
