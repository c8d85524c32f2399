//! Built-in transform implementations.
//!
//! Each transform is a stateless function from an image (plus typed
//! parameters) to a new image. Randomized transforms take the generator as an
//! argument so callers control seeding.

mod blur;
mod color;
mod geometric;

pub use blur::{gaussian_blur, gaussian_kernel};
pub use color::{
    adjust_gamma, adjust_value, contrast, gamma_table, hsv_to_rgb, random_brightness, rgb_to_hsv,
};
pub use geometric::{clipped_zoom, flip, random_crop, rotate, shear, shift};
