//! # Augmenta - Configuration-driven Image Augmentation
//!
//! Augmenta reads a directory of images and a declarative augmentation
//! document, and writes one augmented image per configured operation.
//!
//! ## Features
//!
//! - **Ten transforms**: rotation, flip, shift, shear, zoom, random crop,
//!   random brightness, gamma, Gaussian blur and contrast
//! - **Single or chained**: an operation with several transforms applies them
//!   in document order, each to the previous result
//! - **Lenient parameters**: missing or invalid parameters fall back to
//!   documented defaults instead of failing
//! - **Reproducible**: random transforms draw from a seedable generator
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use augmenta::prelude::*;
//!
//! let registry = TransformRegistry::with_builtins();
//! let plan = Plan::from_json(
//!     r#"{"op1": {"flip": {"flip_code": 0}, "contrast": {"contrast_factor": 2.0}}}"#,
//!     &registry,
//! )?;
//!
//! let augmenter = Augmenter::new(
//!     FsImageStore::default(),
//!     Dispatcher::new(registry),
//!     RunOptions::new().with_seed(Some(42)),
//! );
//! let report = augmenter.run(Path::new("photos"), &plan)?;
//! // photos_aug/cat_flip_contrast_1.jpg, ...
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: value types, parameter tables and errors
//! - [`filters`]: transform library, parameter extractor and registry
//! - [`execution`]: document compilation, dispatcher and directory runs
//! - [`io`]: image store boundary and output naming
//! - [`config`]: run settings

#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod execution;
pub mod filters;
pub mod io;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use augmenta::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{Category, Image, ImageShape, ParamSet, TransformKind, Value};

    // Parameter tables
    pub use crate::core::param::{Constraint, ParamType, ParameterDefinition};

    // Errors
    pub use crate::core::error::{
        AugmentError, AugmentResult, ConfigError, ConfigResult, TransformError, TransformResult,
    };

    // Transforms
    pub use crate::filters::params::parameter_table;
    pub use crate::filters::registry::{RegistryEntry, TransformMetadata, TransformRegistry};
    pub use crate::filters::transform::Transform;

    // Execution
    pub use crate::execution::dispatcher::{Dispatcher, OperationOutput};
    pub use crate::execution::engine::{Augmenter, RunOptions, RunReport};
    pub use crate::execution::plan::{AugmentationDocument, Operation, Plan};

    // I/O
    pub use crate::io::naming::{output_dir_for, OutputNamer};
    pub use crate::io::store::{FsImageStore, ImageStore};

    // Settings
    pub use crate::config::Settings;
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
