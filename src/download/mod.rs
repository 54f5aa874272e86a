//! Download module.
//!
//! This module provides:
//! - The bounded work queue
//! - Streaming media downloads with retries
//! - The per-source producer/consumer pipeline
//! - Run statistics

pub mod media;
pub mod pipeline;
pub mod queue;
pub mod state;

pub use media::{Downloader, DEFAULT_CHUNK_SIZE, DEFAULT_RETRY_DELAY, MAX_ATTEMPTS};
pub use pipeline::{Pipeline, PipelineOptions};
pub use queue::{work_queue, QueueItem, QueueReceiver, QueueSender, DEFAULT_QUEUE_SIZE};
pub use state::{DownloadState, GlobalState, RunSummary};
