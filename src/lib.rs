//! twitter-media-dl - download media from an account's likes and timeline.
//!
//! Posts are fetched page by page and every photo, video and animated GIF
//! they carry (reposts and quotes included) is downloaded twice: into a
//! shared `__all__` folder and into a folder named after the author.
//! Downloaded URLs are persisted so later runs only fetch new media.
//!
//! # Features
//!
//! - Likes and timeline sources with `max_id` pagination
//! - Bounded producer/consumer pipeline
//! - Streaming downloads with retries and partial-file cleanup
//! - Copy, symlink or hard link author replicas
//! - Dated history files with automatic backups
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use twitter_media_dl::{Config, Downloader, LikesSource, Pipeline, PipelineOptions, TwitterApi, UserRef};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let api = TwitterApi::connect(&config.credentials, config.request_timeout()).await?;
//!     let downloader = Downloader::new(api.http_client());
//!     let source = LikesSource::new(api, UserRef::parse(&config.account.user));
//!
//!     let summary = Pipeline::new(source, downloader, Path::new("media"), PipelineOptions::from_config(&config))
//!         .run()
//!         .await?;
//!     println!("{} items downloaded", summary.downloaded);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod history;
pub mod media;
pub mod output;
pub mod source;

// Re-exports for convenience
pub use api::{TwitterApi, UserRef};
pub use config::{Config, CopyMode, DownloadMode, SourceKind};
pub use download::{Downloader, GlobalState, Pipeline, PipelineOptions, RunSummary};
pub use error::{Error, Result};
pub use history::{HistoryStore, SharedHistory};
pub use media::{MediaRecord, MediaType};
pub use source::{LikesSource, Page, PostSource, TimelineSource};
