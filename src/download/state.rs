//! Download state tracking.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::SourceKind;

/// Counters for one source run, updated by both pipeline stages.
#[derive(Debug, Default)]
pub struct DownloadState {
    posts_processed: AtomicU64,
    queued: AtomicU64,
    duplicates: AtomicU64,
    malformed: AtomicU64,
    downloaded: AtomicU64,
    failed: AtomicU64,
}

impl DownloadState {
    /// Add a page worth of posts. Returns the new total.
    pub fn add_posts(&self, count: u64) -> u64 {
        self.posts_processed.fetch_add(count, Ordering::Relaxed) + count
    }

    pub fn increment_queued(&self) {
        self.queued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_duplicate(&self) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_malformed(&self) {
        self.malformed.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the new downloaded total.
    pub fn increment_downloaded(&self) -> u64 {
        self.downloaded.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn downloaded(&self) -> u64 {
        self.downloaded.load(Ordering::Relaxed)
    }

    /// Freeze the counters into a summary.
    pub fn summary(&self, source: SourceKind) -> RunSummary {
        RunSummary {
            source,
            posts_processed: self.posts_processed.load(Ordering::Relaxed),
            queued: self.queued.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            downloaded: self.downloaded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            history_path: None,
        }
    }
}

/// Outcome of one source run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub source: SourceKind,
    pub posts_processed: u64,
    pub queued: u64,
    pub duplicates: u64,
    pub malformed: u64,
    pub downloaded: u64,
    pub failed: u64,
    /// History file written at the end of the run.
    pub history_path: Option<PathBuf>,
}

/// Global statistics across all sources.
#[derive(Debug, Default)]
pub struct GlobalState {
    pub queued: u64,
    pub duplicates: u64,
    pub malformed: u64,
    pub downloaded: u64,
    pub failed: u64,
    pub sources_processed: u64,
    pub sources_failed: u64,
}

impl GlobalState {
    /// Add statistics from a finished source run.
    pub fn add_source_stats(&mut self, summary: &RunSummary) {
        self.queued += summary.queued;
        self.duplicates += summary.duplicates;
        self.malformed += summary.malformed;
        self.downloaded += summary.downloaded;
        self.failed += summary.failed;
        self.sources_processed += 1;
    }

    /// Mark a source as failed.
    pub fn mark_source_failed(&mut self) {
        self.sources_failed += 1;
    }
}
