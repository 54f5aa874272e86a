//! Configuration structures and loading logic.

use crate::config::modes::{CopyMode, DownloadMode};
use crate::error::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,

    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// The account whose likes/timeline are crawled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Numeric user ID or screen name.
    #[serde(default)]
    pub user: String,
}

/// App-only API credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Bearer token; used as-is when present.
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// Consumer key, exchanged for a bearer token when no token is given.
    #[serde(default)]
    pub consumer_key: Option<String>,

    /// Consumer secret paired with `consumer_key`.
    #[serde(default)]
    pub consumer_secret: Option<String>,
}

/// Download options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Which collections to crawl.
    #[serde(default)]
    pub mode: DownloadMode,

    /// Base directory for downloads and history files.
    #[serde(default)]
    pub output_directory: Option<PathBuf>,

    /// Work queue capacity.
    #[serde(default = "default_queue_size")]
    pub queue_size: usize,

    /// Posts requested per API page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Stop paging after this many posts have been processed.
    #[serde(default = "default_max_posts")]
    pub max_posts: u64,

    /// Repost/quote recursion bound.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// How the per-author replica is produced.
    #[serde(default)]
    pub copy_mode: CopyMode,

    /// Whether to show the single-line progress spinner.
    #[serde(default)]
    pub show_progress: bool,

    /// Seconds to wait after a timeout or connection failure.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_seconds: u64,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Streaming write chunk size in bytes.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            mode: DownloadMode::default(),
            output_directory: None,
            queue_size: default_queue_size(),
            page_size: default_page_size(),
            max_posts: default_max_posts(),
            max_depth: default_max_depth(),
            copy_mode: CopyMode::default(),
            show_progress: false,
            retry_delay_seconds: default_retry_delay(),
            request_timeout_seconds: default_request_timeout(),
            chunk_size: default_chunk_size(),
        }
    }
}

fn default_queue_size() -> usize {
    100
}

fn default_page_size() -> u32 {
    200
}

fn default_max_posts() -> u64 {
    4000
}

fn default_max_depth() -> usize {
    10
}

fn default_retry_delay() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    600
}

fn default_chunk_size() -> usize {
    5_000_000
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from config.example.toml",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the config file to read: the given path if it exists, otherwise
    /// `config.toml` in the platform config directory if that exists.
    pub fn locate(path: &Path) -> Option<PathBuf> {
        if path.exists() {
            return Some(path.to_path_buf());
        }

        let dirs = ProjectDirs::from("", "", "twitter-media-dl")?;
        let fallback = dirs.config_dir().join("config.toml");
        fallback.exists().then_some(fallback)
    }

    /// Get the effective output directory.
    pub fn output_directory(&self) -> PathBuf {
        self.options
            .output_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("media"))
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.options.retry_delay_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.options.request_timeout_seconds)
    }
}
