//! Download mode definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which post collections to crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadMode {
    /// Crawl only the account's likes.
    Likes,
    /// Crawl only the account's own timeline.
    Timeline,
    /// Crawl likes, then timeline (default).
    #[default]
    Both,
}

impl DownloadMode {
    /// The source kinds this mode crawls, in order.
    pub fn sources(&self) -> &'static [SourceKind] {
        match self {
            DownloadMode::Likes => &[SourceKind::Likes],
            DownloadMode::Timeline => &[SourceKind::Timeline],
            DownloadMode::Both => &[SourceKind::Likes, SourceKind::Timeline],
        }
    }
}

impl fmt::Display for DownloadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadMode::Likes => write!(f, "likes"),
            DownloadMode::Timeline => write!(f, "timeline"),
            DownloadMode::Both => write!(f, "both"),
        }
    }
}

impl FromStr for DownloadMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "likes" => Ok(DownloadMode::Likes),
            "timeline" => Ok(DownloadMode::Timeline),
            "both" => Ok(DownloadMode::Both),
            _ => Err(format!("Unknown download mode: {}", s)),
        }
    }
}

/// A single post collection. Also names the destination subfolder and the
/// history file prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Likes,
    Timeline,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Likes => "likes",
            SourceKind::Timeline => "timeline",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the per-author replica of a download is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyMode {
    /// Stream the body into both files (default).
    #[default]
    Copy,
    /// Stream into `__all__` only and symlink the author entry to it.
    Symlink,
    /// Stream into `__all__` only and hard link the author entry to it.
    Hardlink,
}

impl fmt::Display for CopyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyMode::Copy => write!(f, "copy"),
            CopyMode::Symlink => write!(f, "symlink"),
            CopyMode::Hardlink => write!(f, "hardlink"),
        }
    }
}
