//! Filesystem module.
//!
//! Provides:
//! - Destination path layout
//! - Slug and filename helpers

pub mod naming;
pub mod paths;

pub use naming::{sanitize_filename, slugify, url_basename};
pub use paths::{destination_paths, ensure_dir, source_root, Destination, ALL_FOLDER};
