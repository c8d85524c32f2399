//! Core value types shared by the extractor, the transforms and the dispatcher.
//!
//! Parameter values arrive loosely typed from the configuration document and
//! are carried as a closed [`Value`] enum. Integer and float literals stay
//! distinct; integer-only parameters rely on it.

use indexmap::IndexMap;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The pixel buffer every transform consumes and produces.
///
/// Shape is `(height, width, 3)` with channels in RGB order for the whole run.
pub type Image = RgbImage;

/// Raw parameters of one transform inside one operation, in document order.
pub type ParamSet = IndexMap<String, Value>;

/// A loosely-typed parameter value as decoded from the configuration document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    /// Boolean literal
    Boolean(bool),
    /// Integer literal (no fractional part or exponent in the source)
    Integer(i64),
    /// Floating point literal
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Array of values
    Array(Vec<Value>),
    /// Nested mapping, order preserved
    Map(IndexMap<String, Value>),
    /// JSON `null`
    None,
}

impl Value {
    /// Short type name used in log messages and the parameter table.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::None => "null",
        }
    }

    /// Try to get this value as an integer. Floats are not coerced.
    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    /// Try to get this value as a number, accepting both integer and float literals.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get this value as a pair of integers (`[a, b]`).
    pub fn as_integer_pair(&self) -> Option<(i64, i64)> {
        match self {
            Value::Array(items) if items.len() == 2 => {
                Some((items[0].as_integer()?, items[1].as_integer()?))
            }
            _ => None,
        }
    }

    /// Try to get this value as a mapping.
    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        if let Value::Map(map) = self {
            Some(map)
        } else {
            None
        }
    }

    /// Check whether this value is a number literal of either kind.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => write!(f, "{{{} entries}}", map.len()),
            Value::None => write!(f, "null"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

/// The closed vocabulary of transform names a document may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    Rotation,
    Flip,
    Shift,
    Shear,
    Zoom,
    RandomCrop,
    RandomBrightness,
    AdjustGamma,
    GaussianBlur,
    Contrast,
}

impl TransformKind {
    /// Every kind, in registry order.
    pub const ALL: [TransformKind; 10] = [
        TransformKind::Rotation,
        TransformKind::Flip,
        TransformKind::Shift,
        TransformKind::Shear,
        TransformKind::Zoom,
        TransformKind::RandomCrop,
        TransformKind::RandomBrightness,
        TransformKind::AdjustGamma,
        TransformKind::GaussianBlur,
        TransformKind::Contrast,
    ];

    /// The name used in configuration documents and output file names.
    pub fn name(self) -> &'static str {
        match self {
            TransformKind::Rotation => "rotation",
            TransformKind::Flip => "flip",
            TransformKind::Shift => "shift",
            TransformKind::Shear => "shear",
            TransformKind::Zoom => "zoom",
            TransformKind::RandomCrop => "random_crop",
            TransformKind::RandomBrightness => "random_brightness",
            TransformKind::AdjustGamma => "adjust_gamma",
            TransformKind::GaussianBlur => "gaussian_blur",
            TransformKind::Contrast => "contrast",
        }
    }

    /// Look up a kind by its document name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Whether this transform moves pixels or changes their values.
    pub fn category(self) -> Category {
        match self {
            TransformKind::Rotation
            | TransformKind::Flip
            | TransformKind::Shift
            | TransformKind::Shear
            | TransformKind::Zoom
            | TransformKind::RandomCrop => Category::Geometric,
            TransformKind::RandomBrightness
            | TransformKind::AdjustGamma
            | TransformKind::Contrast => Category::Photometric,
            TransformKind::GaussianBlur => Category::Blur,
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Transform categories for listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Geometric,
    Photometric,
    Blur,
}

/// Shape information the extractor needs for bound checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageShape {
    pub height: u32,
    pub width: u32,
    pub channels: u32,
}

impl ImageShape {
    /// Number of array dimensions (height, width, channels).
    pub const NDIM: usize = 3;

    /// Shape of an RGB image.
    pub fn of(image: &Image) -> Self {
        let (width, height) = image.dimensions();
        Self {
            height,
            width,
            channels: 3,
        }
    }

    /// Extent along an array axis, if the axis exists.
    pub fn dim(&self, axis: usize) -> Option<u32> {
        match axis {
            0 => Some(self.height),
            1 => Some(self.width),
            2 => Some(self.channels),
            _ => None,
        }
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        Self::NDIM
    }
}
