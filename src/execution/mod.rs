//! Execution module.
//!
//! Document compilation, the dispatcher and the directory run engine.

pub mod dispatcher;
pub mod engine;
pub mod plan;

pub use dispatcher::{Dispatcher, OperationOutput};
pub use engine::{Augmenter, ImageFailure, RunOptions, RunReport};
pub use plan::{AugmentationDocument, Operation, OperationEntries, Plan};
