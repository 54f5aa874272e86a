//! Producer/consumer pipeline for one source.
//!
//! The producer walks the source page by page, extracts media records and
//! pushes the ones not already in history onto a bounded [`work_queue`]. The
//! consumer pops records and downloads them. Both halves run concurrently on
//! the calling task, so a full queue suspends the producer and an empty one
//! suspends the consumer.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::download::media::Downloader;
use crate::download::queue::{work_queue, QueueItem, QueueReceiver, QueueSender};
use crate::download::state::{DownloadState, RunSummary};
use crate::error::Result;
use crate::fs::source_root;
use crate::history::{HistoryStore, SharedHistory};
use crate::media::extract_records;
use crate::output::ProgressLine;
use crate::source::PostSource;

/// Tunables for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub queue_size: usize,
    pub page_size: u32,
    pub max_posts: u64,
    pub max_depth: usize,
    pub show_progress: bool,
}

impl PipelineOptions {
    pub fn from_config(config: &Config) -> Self {
        let options = &config.options;
        Self {
            queue_size: options.queue_size,
            page_size: options.page_size,
            max_posts: options.max_posts,
            max_depth: options.max_depth,
            show_progress: options.show_progress,
        }
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Downloads every new media item of one source.
pub struct Pipeline<S> {
    source: S,
    downloader: Downloader,
    history: HistoryStore,
    root: PathBuf,
    options: PipelineOptions,
}

impl<S: PostSource> Pipeline<S> {
    /// History files live in `base_dir`; media goes under `base_dir/{source}`.
    pub fn new(source: S, downloader: Downloader, base_dir: &Path, options: PipelineOptions) -> Self {
        let kind = source.kind();
        Self {
            history: HistoryStore::new(base_dir, kind),
            root: source_root(base_dir, kind),
            source,
            downloader,
            options,
        }
    }

    /// Run to completion and persist the updated history.
    ///
    /// History is saved even when fetching fails part way; the fetch error is
    /// returned afterwards.
    pub async fn run(self) -> Result<RunSummary> {
        let kind = self.source.kind();
        let history = SharedHistory::new(self.history.load()?);
        tracing::info!("Crawling {} with {} known URLs", kind, history.len().await);

        let (sender, receiver) = work_queue(self.options.queue_size);
        let state = DownloadState::default();
        let progress = ProgressLine::new(kind, self.options.show_progress);

        let producer = Producer {
            source: &self.source,
            sender,
            history: history.clone(),
            state: &state,
            progress: progress.clone(),
            options: &self.options,
        };
        let consumer = Consumer {
            downloader: &self.downloader,
            root: &self.root,
            receiver,
            history: history.clone(),
            state: &state,
            progress: progress.clone(),
        };

        let (produced, ()) = tokio::join!(producer.run(), consumer.run());
        progress.finish();

        let saved = self.history.save(&history.snapshot().await);
        if let Err(e) = produced {
            if let Err(save_err) = saved {
                tracing::error!("Could not save {} history: {}", kind, save_err);
            }
            return Err(e);
        }

        let mut summary = state.summary(kind);
        summary.history_path = Some(saved?);
        Ok(summary)
    }
}

struct Producer<'a, S> {
    source: &'a S,
    sender: QueueSender,
    history: SharedHistory,
    state: &'a DownloadState,
    progress: ProgressLine,
    options: &'a PipelineOptions,
}

impl<S: PostSource> Producer<'_, S> {
    async fn run(self) -> Result<()> {
        let result = self.produce().await;

        // The consumer must always see the end marker.
        if self.sender.finish().await.is_err() {
            tracing::debug!("Consumer stopped before end of stream");
        }
        result
    }

    async fn produce(&self) -> Result<()> {
        let kind = self.source.kind();
        let mut cursor = None;

        loop {
            let page = self.source.fetch_page(cursor, self.options.page_size).await?;
            if page.is_empty() {
                tracing::debug!("No more {} posts", kind);
                break;
            }

            for record in extract_records(&page.posts, self.options.max_depth) {
                let record = match record {
                    Ok(record) => record,
                    Err(e) => {
                        tracing::error!("{}", e);
                        self.state.increment_malformed();
                        continue;
                    }
                };

                if self.history.contains(&record.source_url).await {
                    tracing::trace!("Skipping known {}", record.source_url);
                    self.state.increment_duplicate();
                    continue;
                }

                self.sender.push(record).await?;
                self.state.increment_queued();
                self.progress
                    .update(self.sender.len(), self.state.downloaded());
            }

            let processed = self.state.add_posts(page.posts.len() as u64);
            if processed >= self.options.max_posts {
                tracing::info!("Processed {} {} posts, stopping", processed, kind);
                break;
            }

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(())
    }
}

struct Consumer<'a> {
    downloader: &'a Downloader,
    root: &'a Path,
    receiver: QueueReceiver,
    history: SharedHistory,
    state: &'a DownloadState,
    progress: ProgressLine,
}

impl Consumer<'_> {
    async fn run(mut self) {
        while let QueueItem::Media(record) = self.receiver.next().await {
            let filename = record.filename();

            match self
                .downloader
                .download_file(&filename, &record, self.root)
                .await
            {
                Ok(dest) => {
                    tracing::debug!("Downloaded {}", dest.author_path.display());
                    self.history.insert(record.source_url).await;
                    self.state.increment_downloaded();
                }
                Err(e) => {
                    tracing::debug!("Dropping {}: {}", record.source_url, e);
                    self.state.increment_failed();
                }
            }

            self.progress
                .update(self.receiver.len(), self.state.downloaded());
        }
    }
}
