//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{Config, CopyMode, DownloadMode};

/// Twitter likes and timeline media downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "twitter-media-dl",
    version,
    about = "Download photos, videos and GIFs from an account's likes and timeline",
    long_about = "A CLI tool to download media from the posts an account liked or published.\n\n\
                  Every file is stored twice: once in a shared __all__ folder and once in a \
                  folder named after the author. Already downloaded URLs are remembered \
                  between runs."
)]
pub struct Args {
    /// Numeric user ID or screen name of the account to crawl.
    #[arg(short, long, env = "TWITTER_ID")]
    pub user: Option<String>,

    /// Which collections to crawl.
    #[arg(short, long, value_enum)]
    pub mode: Option<DownloadModeArg>,

    /// Base directory for downloads and history files.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// App-only bearer token.
    #[arg(long = "bearer-token", env = "BEARER_TOKEN", hide_env_values = true)]
    pub bearer_token: Option<String>,

    /// Consumer key, exchanged for a bearer token.
    #[arg(long = "consumer-key", env = "CONSUMER_KEY", hide_env_values = true)]
    pub consumer_key: Option<String>,

    /// Consumer secret paired with the consumer key.
    #[arg(long = "consumer-secret", env = "CONSUMER_SECRET", hide_env_values = true)]
    pub consumer_secret: Option<String>,

    /// Work queue capacity.
    #[arg(long)]
    pub queue_size: Option<usize>,

    /// Stop paging after this many posts per source.
    #[arg(long)]
    pub max_posts: Option<u64>,

    /// How the per-author copy is produced.
    #[arg(long, value_enum)]
    pub copy_mode: Option<CopyModeArg>,

    /// Show a single-line progress indicator.
    #[arg(long)]
    pub progress: bool,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI download mode argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DownloadModeArg {
    /// Posts the account liked.
    Likes,
    /// Posts on the account's timeline.
    Timeline,
    /// Likes first, then timeline.
    Both,
}

impl From<DownloadModeArg> for DownloadMode {
    fn from(arg: DownloadModeArg) -> Self {
        match arg {
            DownloadModeArg::Likes => DownloadMode::Likes,
            DownloadModeArg::Timeline => DownloadMode::Timeline,
            DownloadModeArg::Both => DownloadMode::Both,
        }
    }
}

/// CLI copy mode argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CopyModeArg {
    /// Write the file twice.
    Copy,
    /// Symlink the author copy to the `__all__` file.
    Symlink,
    /// Hard link the author copy to the `__all__` file.
    Hardlink,
}

impl From<CopyModeArg> for CopyMode {
    fn from(arg: CopyModeArg) -> Self {
        match arg {
            CopyModeArg::Copy => CopyMode::Copy,
            CopyModeArg::Symlink => CopyMode::Symlink,
            CopyModeArg::Hardlink => CopyMode::Hardlink,
        }
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(self, config: &mut Config) {
        if let Some(user) = self.user {
            config.account.user = user;
        }

        // Credentials
        if let Some(token) = self.bearer_token {
            config.credentials.bearer_token = Some(token);
        }

        if let Some(key) = self.consumer_key {
            config.credentials.consumer_key = Some(key);
        }

        if let Some(secret) = self.consumer_secret {
            config.credentials.consumer_secret = Some(secret);
        }

        // Options
        if let Some(mode) = self.mode {
            config.options.mode = mode.into();
        }

        if let Some(dir) = self.output {
            config.options.output_directory = Some(dir);
        }

        if let Some(size) = self.queue_size {
            config.options.queue_size = size;
        }

        if let Some(max) = self.max_posts {
            config.options.max_posts = max;
        }

        if let Some(copy_mode) = self.copy_mode {
            config.options.copy_mode = copy_mode.into();
        }

        if self.progress {
            config.options.show_progress = true;
        }
    }
}
