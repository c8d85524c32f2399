//! Gaussian blur with an explicit kernel size.

use crate::core::types::Image;

/// Blurs with a separable Gaussian kernel of `kernel = (width, height)` taps.
///
/// Sigma for each direction is derived from its tap count the same way common
/// vision libraries do when no sigma is given:
/// `0.3 * ((size - 1) * 0.5 - 1) + 0.8`. Edges replicate the border pixel.
/// Even sizes are rounded up to the next odd size; a 1×1 kernel is a no-op.
pub fn gaussian_blur(image: &Image, kernel: (u32, u32)) -> Image {
    let (kernel_w, kernel_h) = kernel;
    if kernel_w <= 1 && kernel_h <= 1 {
        return image.clone();
    }
    let h_kernel = gaussian_kernel(kernel_w);
    let v_kernel = gaussian_kernel(kernel_h);
    imageproc::filter::separable_filter(image, &h_kernel, &v_kernel)
}

/// Normalized 1-D Gaussian weights for an odd tap count.
pub fn gaussian_kernel(size: u32) -> Vec<f32> {
    let size = size.max(1) | 1;
    if size == 1 {
        return vec![1.0];
    }

    let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let center = (size / 2) as f32;
    let weights: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - center;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}
