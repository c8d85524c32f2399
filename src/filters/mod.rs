//! Transform module.
//!
//! Contains the transform registry, the parameter extractor, the typed
//! transform steps and the built-in image operations.

pub mod builtin;
pub mod params;
pub mod registry;
pub mod transform;

pub use registry::{RegistryEntry, TransformRegistry};
pub use transform::Transform;
