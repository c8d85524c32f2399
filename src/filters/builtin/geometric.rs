//! Geometric transforms: rotation, flip, shift, shear, clipped zoom, random crop.
//!
//! All of these keep the canvas size except [`random_crop`]. Areas a transform
//! exposes are filled with black.

use crate::core::error::{TransformError, TransformResult};
use crate::core::types::{Image, ImageShape};
use image::imageops::{self, FilterType};
use image::Rgb;
use imageproc::geometric_transformations::{rotate_about_center, warp_with, Interpolation};
use rand::Rng;
use std::cmp::Ordering;

/// Fill used for pixels with no source.
const FILL: Rgb<u8> = Rgb([0, 0, 0]);

/// Rotates about the image center by `angle` degrees counter-clockwise.
///
/// Bilinear interpolation, same dimensions as the input, exposed corners black.
pub fn rotate(image: &Image, angle: f64) -> Image {
    if angle == 0.0 {
        return image.clone();
    }
    // imageproc rotates clockwise in image coordinates (y down).
    let theta = -angle.to_radians() as f32;
    rotate_about_center(image, theta, Interpolation::Bilinear, FILL)
}

/// Flips an image.
///
/// - `flip_code == 0`: about the horizontal axis (upside down)
/// - `flip_code > 0`: about the vertical axis (mirror)
/// - `flip_code < 0`: about both axes
pub fn flip(image: &Image, flip_code: i64) -> Image {
    match flip_code.cmp(&0) {
        Ordering::Equal => imageops::flip_vertical(image),
        Ordering::Greater => imageops::flip_horizontal(image),
        Ordering::Less => imageops::rotate180(image),
    }
}

/// Shifts the image along an array axis, filling vacated positions with zero.
///
/// The amount is `floor(shift_range * extent(axis))`. A positive amount moves
/// content toward index 0 and zeroes the trailing rows/columns/channels; a
/// negative amount moves it the other way and zeroes the leading ones. An axis
/// outside `0..3` leaves the image unchanged.
pub fn shift(image: &Image, axis: usize, shift_range: f64) -> Image {
    let Some(extent) = ImageShape::of(image).dim(axis) else {
        return image.clone();
    };
    let extent = i64::from(extent);
    let amount = (shift_range * extent as f64).floor() as i64;
    if amount == 0 {
        return image.clone();
    }

    let source_index = |i: u32| -> Option<u32> {
        let src = i64::from(i) + amount;
        (0..extent).contains(&src).then_some(src as u32)
    };

    let (width, height) = image.dimensions();
    let mut out = Image::new(width, height);
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        match axis {
            0 => {
                if let Some(src_y) = source_index(y) {
                    *pixel = *image.get_pixel(x, src_y);
                }
            }
            1 => {
                if let Some(src_x) = source_index(x) {
                    *pixel = *image.get_pixel(src_x, y);
                }
            }
            _ => {
                let src = image.get_pixel(x, y);
                for c in 0..3 {
                    if let Some(src_c) = source_index(c) {
                        pixel[c as usize] = src[src_c as usize];
                    }
                }
            }
        }
    }
    out
}

/// Applies a shear of `shear_angle` radians (counter-clockwise).
///
/// Output pixel `(x, y)` samples the input at `(x - sin(a)·y, cos(a)·y)` with
/// bilinear interpolation; samples falling outside the input are black.
pub fn shear(image: &Image, shear_angle: f64) -> Image {
    if shear_angle == 0.0 {
        return image.clone();
    }
    let (sin, cos) = (shear_angle as f32).sin_cos();
    warp_with(
        image,
        move |x, y| (x - sin * y, cos * y),
        Interpolation::Bilinear,
        FILL,
    )
}

/// Zooms around the center while keeping the canvas size.
///
/// Zooming in takes the centered `1/zoom_factor` region and scales it up to the
/// full canvas, which is the centered crop of the enlarged image. Zooming out
/// scales the whole image down and pads it with black; when the padding is
/// odd the extra pixel goes to the bottom/right edge. Factors that are not
/// positive, or exactly 1, return the image unchanged.
pub fn clipped_zoom(image: &Image, zoom_factor: f64) -> Image {
    let (width, height) = image.dimensions();
    if !(zoom_factor > 0.0) || zoom_factor == 1.0 || width == 0 || height == 0 {
        return image.clone();
    }

    if zoom_factor > 1.0 {
        let crop_w = scaled(width, 1.0 / zoom_factor).min(width);
        let crop_h = scaled(height, 1.0 / zoom_factor).min(height);
        let left = (width - crop_w) / 2;
        let top = (height - crop_h) / 2;
        let region = imageops::crop_imm(image, left, top, crop_w, crop_h).to_image();
        imageops::resize(&region, width, height, FilterType::Triangle)
    } else {
        let zoom_w = scaled(width, zoom_factor).min(width);
        let zoom_h = scaled(height, zoom_factor).min(height);
        let shrunk = imageops::resize(image, zoom_w, zoom_h, FilterType::Triangle);
        let mut canvas = Image::new(width, height);
        let left = (width - zoom_w) / 2;
        let top = (height - zoom_h) / 2;
        imageops::replace(&mut canvas, &shrunk, i64::from(left), i64::from(top));
        canvas
    }
}

fn scaled(extent: u32, factor: f64) -> u32 {
    ((f64::from(extent) * factor).round() as u32).max(1)
}

/// Crops a randomly placed window of `floor(H·height_range) × floor(W·width_range)`.
///
/// Unlike every other transform this changes the output dimensions. The
/// window origin is drawn uniformly so the window lies inside the image.
///
/// # Errors
///
/// [`TransformError::Precondition`] when the window is larger than the image
/// or empty.
pub fn random_crop(
    image: &Image,
    height_range: f64,
    width_range: f64,
    rng: &mut impl Rng,
) -> TransformResult<Image> {
    let (width, height) = image.dimensions();
    let crop_h = (f64::from(height) * height_range).floor();
    let crop_w = (f64::from(width) * width_range).floor();

    if !crop_h.is_finite() || !crop_w.is_finite() {
        return Err(TransformError::precondition(
            "random_crop",
            format!("crop ranges ({}, {}) are not finite", height_range, width_range),
        ));
    }
    if crop_h > f64::from(height) || crop_w > f64::from(width) {
        return Err(TransformError::precondition(
            "random_crop",
            format!(
                "crop {}x{} exceeds image {}x{}",
                crop_w, crop_h, width, height
            ),
        ));
    }
    if crop_h < 1.0 || crop_w < 1.0 {
        return Err(TransformError::precondition(
            "random_crop",
            format!("crop {}x{} is empty", crop_w, crop_h),
        ));
    }

    let (crop_w, crop_h) = (crop_w as u32, crop_h as u32);
    let x = rng.random_range(0..=width - crop_w);
    let y = rng.random_range(0..=height - crop_h);
    Ok(imageops::crop_imm(image, x, y, crop_w, crop_h).to_image())
}
