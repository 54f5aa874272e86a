//! Configuration module for twitter-media-dl.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Download, source and copy modes
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{AccountConfig, Config, CredentialsConfig, OptionsConfig};
pub use modes::{CopyMode, DownloadMode, SourceKind};
pub use validation::validate_config;
