//! Photometric transforms: random brightness, gamma, contrast.
//!
//! These only change sample values, never positions, so they run as flat
//! parallel passes over the interleaved RGB buffer.

use crate::core::types::Image;
use rand::Rng;
use rayon::prelude::*;

/// Adds a random offset drawn from the closed range `[low, high]` to the HSV
/// value channel.
///
/// `low == high` always adds that constant. Bounds given in the wrong order
/// are swapped.
///
/// HSV is continuous (hue in degrees, saturation in `[0, 1]`), not the 8-bit
/// quantized form with hue halved. Outputs can differ from a quantized
/// conversion by a sample or so in saturated colors.
pub fn random_brightness(image: &Image, low: i64, high: i64, rng: &mut impl Rng) -> Image {
    let (low, high) = if low <= high { (low, high) } else { (high, low) };
    let delta = rng.random_range(low..=high);
    adjust_value(image, delta)
}

/// Adds `delta` to the HSV value channel, clamped to `[0, 255]`.
pub fn adjust_value(image: &Image, delta: i64) -> Image {
    if delta == 0 {
        return image.clone();
    }
    let delta = delta.clamp(-255, 255) as f32;

    let mut out = image.clone();
    let samples: &mut [u8] = &mut out;
    samples.par_chunks_exact_mut(3).for_each(|px| {
        let (h, s, v) = rgb_to_hsv([px[0], px[1], px[2]]);
        let rgb = hsv_to_rgb(h, s, (v + delta).clamp(0.0, 255.0));
        px.copy_from_slice(&rgb);
    });
    out
}

/// Applies `((i / 255) ^ (1 / gamma)) * 255` per sample through a lookup table.
pub fn adjust_gamma(image: &Image, gamma: f64) -> Image {
    let table = gamma_table(gamma);
    let mut out = image.clone();
    let samples: &mut [u8] = &mut out;
    samples.par_iter_mut().for_each(|v| *v = table[*v as usize]);
    out
}

/// Builds the 256-entry gamma lookup table. Entries are rounded.
pub fn gamma_table(gamma: f64) -> [u8; 256] {
    let inv_gamma = 1.0 / gamma;
    let mut table = [0u8; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        let mapped = (i as f64 / 255.0).powf(inv_gamma) * 255.0;
        *entry = mapped.round().clamp(0.0, 255.0) as u8;
    }
    table
}

/// Scales every sample by `factor` and clamps to `[0, 255]` (no offset).
pub fn contrast(image: &Image, factor: f64) -> Image {
    let mut out = image.clone();
    let samples: &mut [u8] = &mut out;
    samples
        .par_iter_mut()
        .for_each(|v| *v = (f64::from(*v) * factor).clamp(0.0, 255.0) as u8);
    out
}

/// RGB to HSV with hue in degrees, saturation in `[0, 1]`, value in `[0, 255]`.
pub fn rgb_to_hsv(rgb: [u8; 3]) -> (f32, f32, f32) {
    let [r, g, b] = rgb.map(f32::from);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let chroma = max - min;

    let hue = if chroma == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / chroma).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / chroma + 2.0)
    } else {
        60.0 * ((r - g) / chroma + 4.0)
    };
    let saturation = if max == 0.0 { 0.0 } else { chroma / max };

    (hue, saturation, max)
}

/// Inverse of [`rgb_to_hsv`], rounding to the nearest sample.
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> [u8; 3] {
    let chroma = value * saturation;
    let sector = hue.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = value - chroma;
    [r, g, b].map(|c| (c + m).round().clamp(0.0, 255.0) as u8)
}
