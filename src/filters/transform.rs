//! Typed transform steps.
//!
//! A [`Transform`] is one recognized entry of an operation with its
//! parameters already extracted, so applying it involves no further lookup or
//! validation.

use crate::core::error::TransformResult;
use crate::core::types::{Image, ParamSet, TransformKind};
use crate::filters::builtin;
use crate::filters::params::*;
use rand::Rng;

/// One transform with its resolved parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    Rotation(RotationParams),
    Flip(FlipParams),
    Shift(ShiftParams),
    Shear(ShearParams),
    Zoom(ZoomParams),
    RandomCrop(RandomCropParams),
    RandomBrightness(RandomBrightnessParams),
    AdjustGamma(GammaParams),
    GaussianBlur(GaussianBlurParams),
    Contrast(ContrastParams),
}

impl Transform {
    /// Extract the parameters for `kind` from a raw parameter set.
    ///
    /// `ndim` is the dimensionality of the images the step will run on.
    pub fn from_params(kind: TransformKind, params: &ParamSet, ndim: usize) -> Self {
        match kind {
            TransformKind::Rotation => Transform::Rotation(extract_rotation_params(params)),
            TransformKind::Flip => Transform::Flip(extract_flip_params(params)),
            TransformKind::Shift => Transform::Shift(extract_shift_params(params, ndim)),
            TransformKind::Shear => Transform::Shear(extract_shear_params(params)),
            TransformKind::Zoom => Transform::Zoom(extract_zoom_params(params)),
            TransformKind::RandomCrop => {
                Transform::RandomCrop(extract_random_crop_params(params))
            }
            TransformKind::RandomBrightness => {
                Transform::RandomBrightness(extract_random_brightness_params(params))
            }
            TransformKind::AdjustGamma => {
                Transform::AdjustGamma(extract_adjust_gamma_params(params))
            }
            TransformKind::GaussianBlur => {
                Transform::GaussianBlur(extract_gaussian_blur_params(params))
            }
            TransformKind::Contrast => Transform::Contrast(extract_contrast_params(params)),
        }
    }

    pub fn kind(&self) -> TransformKind {
        match self {
            Transform::Rotation(_) => TransformKind::Rotation,
            Transform::Flip(_) => TransformKind::Flip,
            Transform::Shift(_) => TransformKind::Shift,
            Transform::Shear(_) => TransformKind::Shear,
            Transform::Zoom(_) => TransformKind::Zoom,
            Transform::RandomCrop(_) => TransformKind::RandomCrop,
            Transform::RandomBrightness(_) => TransformKind::RandomBrightness,
            Transform::AdjustGamma(_) => TransformKind::AdjustGamma,
            Transform::GaussianBlur(_) => TransformKind::GaussianBlur,
            Transform::Contrast(_) => TransformKind::Contrast,
        }
    }

    /// Name used in output file names.
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Whether applying the step consumes randomness.
    pub fn is_random(&self) -> bool {
        matches!(
            self,
            Transform::RandomCrop(_) | Transform::RandomBrightness(_)
        )
    }

    /// Apply the step to an image, producing a new image.
    ///
    /// # Errors
    ///
    /// Only `random_crop` can fail, when its window does not fit the image.
    pub fn apply(&self, image: &Image, rng: &mut impl Rng) -> TransformResult<Image> {
        let out = match self {
            Transform::Rotation(p) => builtin::rotate(image, p.angle),
            Transform::Flip(p) => builtin::flip(image, p.flip_code),
            Transform::Shift(p) => match p.axis {
                Some(axis) => builtin::shift(image, axis, p.shift_range),
                None => image.clone(),
            },
            Transform::Shear(p) => builtin::shear(image, p.shear_angle),
            Transform::Zoom(p) => builtin::clipped_zoom(image, p.zoom_factor),
            Transform::RandomCrop(p) => {
                return builtin::random_crop(image, p.height_range, p.width_range, rng)
            }
            Transform::RandomBrightness(p) => builtin::random_brightness(image, p.low, p.high, rng),
            Transform::AdjustGamma(p) => builtin::adjust_gamma(image, p.gamma),
            Transform::GaussianBlur(p) => builtin::gaussian_blur(image, p.kernel),
            Transform::Contrast(p) => builtin::contrast(image, p.contrast_factor),
        };
        Ok(out)
    }
}
