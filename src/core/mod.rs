//! Core types shared by every stage of the augmentation pipeline:
//! - Value types and the closed transform vocabulary
//! - Parameter definitions and constraints
//! - Error types

pub mod types;
pub mod param;
pub mod error;

// Re-export commonly used types
pub use types::{Category, Image, ImageShape, ParamSet, TransformKind, Value};
pub use param::{Constraint, ParamType, ParameterDefinition};
pub use error::{AugmentError, ConfigError, TransformError};
