//! Media file downloading.
//!
//! Each file is streamed once and written to the `__all__` folder and the
//! author's folder. Failed attempts are retried up to [`MAX_ATTEMPTS`] times.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::future::try_join_all;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::config::CopyMode;
use crate::error::{Error, Result};
use crate::fs::{destination_paths, ensure_dir, Destination, ALL_FOLDER};
use crate::media::MediaRecord;

/// Attempts per file before giving up.
pub const MAX_ATTEMPTS: u32 = 6;

/// Bytes buffered before each write.
pub const DEFAULT_CHUNK_SIZE: usize = 5_000_000;

/// Pause before retrying a transient failure.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Outcome of a single failed attempt.
#[derive(Debug)]
enum AttemptError {
    /// A destination folder does not exist yet.
    MissingDirectory,
    /// Worth retrying after a pause.
    Transient(Error),
    Fatal(Error),
}

impl From<Error> for AttemptError {
    fn from(err: Error) -> Self {
        match &err {
            Error::Io(e) if e.kind() == io::ErrorKind::NotFound => AttemptError::MissingDirectory,
            Error::Http(e) if e.is_timeout() || e.is_connect() || e.is_body() || e.is_decode() => {
                AttemptError::Transient(err)
            }
            _ => AttemptError::Fatal(err),
        }
    }
}

impl From<io::Error> for AttemptError {
    fn from(err: io::Error) -> Self {
        Error::Io(err).into()
    }
}

impl From<reqwest::Error> for AttemptError {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err).into()
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// Streams media files to disk.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
    copy_mode: CopyMode,
    chunk_size: usize,
    retry_delay: Duration,
}

impl Downloader {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            copy_mode: CopyMode::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_copy_mode(mut self, copy_mode: CopyMode) -> Self {
        self.copy_mode = copy_mode;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Download `record` as `filename` under `root`.
    ///
    /// On success both destination files hold the complete payload. On
    /// failure neither is left behind. Existing files are overwritten.
    pub async fn download_file(
        &self,
        filename: &str,
        record: &MediaRecord,
        root: &Path,
    ) -> Result<Destination> {
        let dest = destination_paths(root, &record.author, filename)?;
        let url = record.source_url.as_str();

        for attempt in 1..=MAX_ATTEMPTS {
            match self.attempt(url, &dest).await {
                Ok(bytes) => {
                    tracing::trace!("Fetched {} bytes from {}", bytes, url);
                    return Ok(dest);
                }
                Err(AttemptError::MissingDirectory) => {
                    tracing::debug!("Creating folders for {}", filename);
                    for dir in dest.dirs() {
                        if let Err(e) = ensure_dir(dir).await {
                            remove_partial(&dest).await;
                            return Err(e);
                        }
                    }
                }
                Err(AttemptError::Transient(e)) => {
                    tracing::debug!(
                        "Attempt {}/{} for {} failed: {}",
                        attempt,
                        MAX_ATTEMPTS,
                        url,
                        e
                    );
                    if attempt < MAX_ATTEMPTS {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
                Err(AttemptError::Fatal(e)) => {
                    remove_partial(&dest).await;
                    return Err(e);
                }
            }
        }

        remove_partial(&dest).await;
        Err(Error::RetriesExhausted {
            url: url.to_string(),
            attempts: MAX_ATTEMPTS,
        })
    }

    async fn attempt(&self, url: &str, dest: &Destination) -> std::result::Result<u64, AttemptError> {
        let mut files = vec![File::create(&dest.all_path).await?];
        if self.copy_mode == CopyMode::Copy {
            files.push(File::create(&dest.author_path).await?);
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let err = Error::Download(format!("HTTP {} for {}", status, url));
            return Err(if is_retryable_status(status) {
                AttemptError::Transient(err)
            } else {
                AttemptError::Fatal(err)
            });
        }

        let mut stream = response.bytes_stream();
        let mut buffer = Vec::with_capacity(self.chunk_size);
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            let mut rest = &chunk[..];
            while !rest.is_empty() {
                let take = (self.chunk_size - buffer.len()).min(rest.len());
                buffer.extend_from_slice(&rest[..take]);
                rest = &rest[take..];

                if buffer.len() == self.chunk_size {
                    write_all(&mut files, &buffer).await?;
                    written += buffer.len() as u64;
                    buffer.clear();
                }
            }
        }

        if !buffer.is_empty() {
            write_all(&mut files, &buffer).await?;
            written += buffer.len() as u64;
        }

        for file in &mut files {
            file.flush().await?;
        }
        drop(files);

        if self.copy_mode != CopyMode::Copy {
            self.link_author_copy(dest).await?;
        }

        Ok(written)
    }

    /// Point the author path at the file in `__all__`.
    async fn link_author_copy(&self, dest: &Destination) -> std::result::Result<(), AttemptError> {
        if let Some(parent) = dest.author_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AttemptError::Fatal(e.into()))?;
        }

        match tokio::fs::remove_file(&dest.author_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(AttemptError::Fatal(e.into())),
        }

        let linked = match self.copy_mode {
            CopyMode::Hardlink => tokio::fs::hard_link(&dest.all_path, &dest.author_path).await,
            CopyMode::Symlink => symlink(&relative_target(dest), &dest.author_path).await,
            CopyMode::Copy => Ok(()),
        };
        linked.map_err(|e| AttemptError::Fatal(e.into()))
    }
}

/// Symlink target relative to the author folder, so the tree can be moved.
fn relative_target(dest: &Destination) -> PathBuf {
    let filename = dest.all_path.file_name().unwrap_or_default();
    Path::new("..").join(ALL_FOLDER).join(filename)
}

#[cfg(unix)]
async fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    tokio::fs::symlink(target, link).await
}

#[cfg(windows)]
async fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    tokio::fs::symlink_file(target, link).await
}

async fn write_all(files: &mut [File], buffer: &[u8]) -> io::Result<()> {
    try_join_all(files.iter_mut().map(|file| file.write_all(buffer))).await?;
    Ok(())
}

async fn remove_partial(dest: &Destination) {
    for path in [&dest.all_path, &dest.author_path] {
        match tokio::fs::remove_file(path).await {
            Ok(()) => tracing::debug!("Removed partial file {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Could not remove {}: {}", path.display(), e),
        }
    }
}
