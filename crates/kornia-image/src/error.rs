/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the image size is not valid.
    #[error("Invalid image size ({0}, {1}) mismatch ({2}, {3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel coordinates ({0}, {1}) are out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index ({0}) is out of bounds ({1})")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when the kernel length is not valid.
    #[error("Invalid kernel length ({0}, {1})")]
    InvalidKernelLength(usize, usize),

    /// Error when a sigma value is not valid.
    #[error("Invalid sigma value {0}, must be finite and positive")]
    InvalidSigmaValue(f32),

    /// Error when a percentile is out of the [0, 100] range.
    #[error("Invalid percentile {0}, must be within [0, 100]")]
    InvalidPercentile(f32),

    /// Error when a value cannot be ordered, e.g. NaN.
    #[error("Cannot order NaN values")]
    NanValue,
}
