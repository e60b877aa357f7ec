use kornia_image::ImageError;

/// Create a box blur kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
///
/// # Returns
///
/// A vector of the kernel.
pub fn box_blur_kernel_1d(kernel_size: usize) -> Vec<f32> {
    vec![1.0 / kernel_size as f32; kernel_size]
}

/// Create a gaussian blur kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
/// * `sigma` - The sigma of the gaussian kernel.
///
/// # Returns
///
/// A vector of the kernel.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f32) -> Vec<f32> {
    let mut kernel = Vec::with_capacity(kernel_size);

    let mean = (kernel_size - 1) as f32 / 2.0;
    let sigma_sq = sigma * sigma;

    // compute the kernel
    for i in 0..kernel_size {
        let x = i as f32 - mean;
        kernel.push((-(x * x) / (2.0 * sigma_sq)).exp());
    }

    // normalize the kernel
    let norm = kernel.iter().sum::<f32>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    kernel
}

/// Length of the gaussian kernel used for a given sigma: `4 * ceil(sigma) + 1`.
///
/// # Errors
///
/// Returns [`ImageError::InvalidSigmaValue`] if sigma is not finite and positive,
/// or if the length does not fit in a `usize`.
pub fn gaussian_kernel_size(sigma: f32) -> Result<usize, ImageError> {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(ImageError::InvalidSigmaValue(sigma));
    }
    // the cast saturates, the checked ops catch it
    (sigma.ceil() as usize)
        .checked_mul(4)
        .and_then(|n| n.checked_add(1))
        .ok_or(ImageError::InvalidSigmaValue(sigma))
}

/// Create the separable factors of the normalized 3x3 sobel kernel.
///
/// # Returns
///
/// A tuple with the derivative and the smoothing factor. Their outer product
/// is the sobel kernel scaled by `1/8`.
pub fn normalized_sobel_kernel_1d() -> ([f32; 3], [f32; 3]) {
    ([-0.5, 0.0, 0.5], [0.25, 0.5, 0.25])
}
