//! Filesystem boundary: image store and output naming.

pub mod naming;
pub mod store;

pub use naming::{output_dir_for, OutputNamer};
pub use store::{FsImageStore, ImageStore, DEFAULT_EXTENSIONS};
