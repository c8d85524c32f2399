//! Parameter extraction: raw parameter sets to typed, range-checked records.
//!
//! Every transform declares its parameters in [`parameter_table`]. The single
//! routine [`resolve`] walks a parameter set in document order and adopts each
//! entry whose name is in the table and whose value passes the type and
//! constraint checks. Everything else is ignored, so extraction never fails:
//! a parameter without an adopted value keeps its documented default.

use crate::core::param::{Constraint, ParamType, ParameterDefinition};
use crate::core::types::{ParamSet, TransformKind, Value};
use indexmap::IndexMap;
use log::debug;

/// Largest accepted `kernel_size` along either axis.
pub const MAX_KERNEL_SIZE: u32 = 255;

/// Declarative parameter table for one transform kind.
///
/// `ndim` bounds the `shift` axis; the other tables ignore it.
pub fn parameter_table(kind: TransformKind, ndim: usize) -> Vec<ParameterDefinition> {
    match kind {
        TransformKind::Rotation => vec![ParameterDefinition::new("angle", ParamType::Number, 0i64)
            .with_description("Counter-clockwise rotation in degrees")],
        TransformKind::Flip => vec![ParameterDefinition::new("flip_code", ParamType::Integer, 0i64)
            .with_description("0 = about the horizontal axis, > 0 = vertical axis, < 0 = both")],
        TransformKind::Shift => vec![
            ParameterDefinition::without_default("axis", ParamType::Integer)
                .with_description("Array axis to shift along (0 = rows, 1 = columns, 2 = channels)")
                .with_constraint(Constraint::NonNegative)
                .with_constraint(Constraint::Below(ndim as f64)),
            ParameterDefinition::new("shift_range", ParamType::Number, 0.0)
                .with_description("Fraction of the axis extent to shift by")
                .with_constraint(Constraint::MaxValue(1.0)),
        ],
        TransformKind::Shear => vec![ParameterDefinition::new("shear_angle", ParamType::Number, 0.0)
            .with_description("Counter-clockwise shear angle in radians")],
        TransformKind::Zoom => vec![ParameterDefinition::new("zoom_factor", ParamType::Number, 0.0)
            .with_description("Scale factor around the center; > 1 zooms in, < 1 zooms out")],
        TransformKind::RandomCrop => vec![
            ParameterDefinition::new("height_range", ParamType::Number, 1i64)
                .with_description("Crop height as a fraction of the image height")
                .with_constraint(Constraint::MaxValue(1.0)),
            ParameterDefinition::new("width_range", ParamType::Number, 1i64)
                .with_description("Crop width as a fraction of the image width")
                .with_constraint(Constraint::MaxValue(1.0)),
        ],
        TransformKind::RandomBrightness => vec![ParameterDefinition::new(
            "brightness_range",
            ParamType::IntegerPair,
            vec![0i64, 0],
        )
        .with_description("Closed [low, high] range of the offset added to the HSV value channel")
        .with_constraint(Constraint::Ascending)],
        TransformKind::AdjustGamma => vec![ParameterDefinition::new("gamma", ParamType::Number, 1.0)
            .with_description("Gamma; values above 1 brighten mid-tones")],
        TransformKind::GaussianBlur => vec![ParameterDefinition::new(
            "kernel_size",
            ParamType::Kernel,
            vec![3i64, 3],
        )
        .with_description("Odd kernel size k, or [width, height]")
        .with_constraint(Constraint::Positive)
        .with_constraint(Constraint::MaxValue(f64::from(MAX_KERNEL_SIZE)))
        .with_constraint(Constraint::Odd)],
        TransformKind::Contrast => vec![ParameterDefinition::new(
            "contrast_factor",
            ParamType::Number,
            1.0,
        )
        .with_description("Multiplier applied to every sample")
        .with_constraint(Constraint::Above(0.0))],
    }
}

/// Parameter values after defaults and adoption.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedParams {
    values: IndexMap<String, Value>,
}

impl ResolvedParams {
    /// Raw resolved value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Resolved value as a number.
    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    /// Resolved value as an integer.
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_integer)
    }

    /// Resolved value as an integer pair.
    pub fn integer_pair(&self, name: &str) -> Option<(i64, i64)> {
        self.get(name).and_then(Value::as_integer_pair)
    }

    /// Resolved kernel size; a scalar `k` means `(k, k)`.
    pub fn kernel(&self, name: &str) -> Option<(u32, u32)> {
        let (w, h) = match self.get(name)? {
            Value::Integer(k) => (*k, *k),
            other => other.as_integer_pair()?,
        };
        Some((u32::try_from(w).ok()?, u32::try_from(h).ok()?))
    }
}

/// Resolve a raw parameter set against a parameter table.
///
/// Entries are visited in order, so when a name repeats the last valid value
/// wins. Unknown names and invalid values are logged and skipped.
pub fn resolve(table: &[ParameterDefinition], params: &ParamSet) -> ResolvedParams {
    let mut values: IndexMap<String, Value> = table
        .iter()
        .filter_map(|def| def.default_value.clone().map(|v| (def.name.clone(), v)))
        .collect();

    for (name, value) in params {
        match table.iter().find(|def| &def.name == name) {
            Some(def) => match def.validate(value) {
                Ok(()) => {
                    values.insert(name.clone(), value.clone());
                }
                Err(reason) => debug!("ignoring parameter '{}' = {}: {}", name, value, reason),
            },
            None => debug!("ignoring unknown parameter '{}'", name),
        }
    }

    ResolvedParams { values }
}

fn resolve_kind(kind: TransformKind, params: &ParamSet, ndim: usize) -> ResolvedParams {
    resolve(&parameter_table(kind, ndim), params)
}

/// Parameters of `rotation`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationParams {
    pub angle: f64,
}

/// Parameters of `flip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlipParams {
    pub flip_code: i64,
}

/// Parameters of `shift`. Without an axis the shift is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShiftParams {
    pub axis: Option<usize>,
    pub shift_range: f64,
}

/// Parameters of `shear`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShearParams {
    pub shear_angle: f64,
}

/// Parameters of `zoom`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoomParams {
    pub zoom_factor: f64,
}

/// Parameters of `random_crop`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomCropParams {
    pub height_range: f64,
    pub width_range: f64,
}

impl Default for RandomCropParams {
    fn default() -> Self {
        Self {
            height_range: 1.0,
            width_range: 1.0,
        }
    }
}

/// Parameters of `random_brightness`: closed range of the value offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RandomBrightnessParams {
    pub low: i64,
    pub high: i64,
}

/// Parameters of `adjust_gamma`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaParams {
    pub gamma: f64,
}

impl Default for GammaParams {
    fn default() -> Self {
        Self { gamma: 1.0 }
    }
}

/// Parameters of `gaussian_blur`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaussianBlurParams {
    pub kernel: (u32, u32),
}

impl Default for GaussianBlurParams {
    fn default() -> Self {
        Self { kernel: (3, 3) }
    }
}

/// Parameters of `contrast`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastParams {
    pub contrast_factor: f64,
}

impl Default for ContrastParams {
    fn default() -> Self {
        Self {
            contrast_factor: 1.0,
        }
    }
}

pub fn extract_rotation_params(params: &ParamSet) -> RotationParams {
    let resolved = resolve_kind(TransformKind::Rotation, params, 0);
    RotationParams {
        angle: resolved.float("angle").unwrap_or_default(),
    }
}

pub fn extract_flip_params(params: &ParamSet) -> FlipParams {
    let resolved = resolve_kind(TransformKind::Flip, params, 0);
    FlipParams {
        flip_code: resolved.integer("flip_code").unwrap_or_default(),
    }
}

/// `ndim` is the dimensionality of the image the shift will be applied to.
pub fn extract_shift_params(params: &ParamSet, ndim: usize) -> ShiftParams {
    let resolved = resolve_kind(TransformKind::Shift, params, ndim);
    ShiftParams {
        axis: resolved
            .integer("axis")
            .and_then(|axis| usize::try_from(axis).ok()),
        shift_range: resolved.float("shift_range").unwrap_or_default(),
    }
}

pub fn extract_shear_params(params: &ParamSet) -> ShearParams {
    let resolved = resolve_kind(TransformKind::Shear, params, 0);
    ShearParams {
        shear_angle: resolved.float("shear_angle").unwrap_or_default(),
    }
}

pub fn extract_zoom_params(params: &ParamSet) -> ZoomParams {
    let resolved = resolve_kind(TransformKind::Zoom, params, 0);
    ZoomParams {
        zoom_factor: resolved.float("zoom_factor").unwrap_or_default(),
    }
}

pub fn extract_random_crop_params(params: &ParamSet) -> RandomCropParams {
    let resolved = resolve_kind(TransformKind::RandomCrop, params, 0);
    let defaults = RandomCropParams::default();
    RandomCropParams {
        height_range: resolved.float("height_range").unwrap_or(defaults.height_range),
        width_range: resolved.float("width_range").unwrap_or(defaults.width_range),
    }
}

pub fn extract_random_brightness_params(params: &ParamSet) -> RandomBrightnessParams {
    let resolved = resolve_kind(TransformKind::RandomBrightness, params, 0);
    let (low, high) = resolved.integer_pair("brightness_range").unwrap_or((0, 0));
    RandomBrightnessParams { low, high }
}

pub fn extract_adjust_gamma_params(params: &ParamSet) -> GammaParams {
    let resolved = resolve_kind(TransformKind::AdjustGamma, params, 0);
    GammaParams {
        gamma: resolved.float("gamma").unwrap_or(GammaParams::default().gamma),
    }
}

pub fn extract_gaussian_blur_params(params: &ParamSet) -> GaussianBlurParams {
    let resolved = resolve_kind(TransformKind::GaussianBlur, params, 0);
    GaussianBlurParams {
        kernel: resolved
            .kernel("kernel_size")
            .unwrap_or(GaussianBlurParams::default().kernel),
    }
}

pub fn extract_contrast_params(params: &ParamSet) -> ContrastParams {
    let resolved = resolve_kind(TransformKind::Contrast, params, 0);
    ContrastParams {
        contrast_factor: resolved
            .float("contrast_factor")
            .unwrap_or(ContrastParams::default().contrast_factor),
    }
}
