//! Media record representation.

use chrono::{DateTime, FixedOffset};
use std::fmt;
use std::str::FromStr;

use crate::fs::naming::url_basename;

/// Kind of attached media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Photo,
    Video,
    /// Looping silent video the platform labels `animated_gif`.
    AnimatedGif,
}

impl MediaType {
    /// Filename prefix for this media type.
    pub fn prefix(&self) -> &'static str {
        match self {
            MediaType::Photo => "img",
            MediaType::Video => "video",
            MediaType::AnimatedGif => "gif",
        }
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "photo" => Ok(MediaType::Photo),
            "video" => Ok(MediaType::Video),
            "animated_gif" => Ok(MediaType::AnimatedGif),
            other => Err(format!("unknown media type '{}'", other)),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Photo => write!(f, "photo"),
            MediaType::Video => write!(f, "video"),
            MediaType::AnimatedGif => write!(f, "animated_gif"),
        }
    }
}

/// One piece of media found on one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRecord {
    /// Slugified handle of the post's author.
    pub author: String,

    /// When the post was created, in the offset the API reported.
    pub posted_at: DateTime<FixedOffset>,

    /// ID of the post the media is attached to.
    pub post_id: u64,

    pub media_type: MediaType,

    /// 0-based position among the post's media.
    pub index_in_post: usize,

    /// Highest-quality URL to fetch. Also the deduplication key.
    pub source_url: String,
}

impl MediaRecord {
    /// Deterministic filename for this record.
    ///
    /// - photo: `img{date}_{author}_{index}_{post_id}_{basename}`
    /// - video: `video{date}_{author}_{post_id}.mp4`
    /// - animated gif: `gif{date}_{author}_{post_id}.mp4`
    pub fn filename(&self) -> String {
        let date = self.format_timestamp();
        let prefix = self.media_type.prefix();

        match self.media_type {
            MediaType::Photo => format!(
                "{}{}_{}_{}_{}_{}",
                prefix,
                date,
                self.author,
                self.index_in_post,
                self.post_id,
                url_basename(&self.source_url)
            ),
            MediaType::Video | MediaType::AnimatedGif => {
                format!("{}{}_{}_{}.mp4", prefix, date, self.author, self.post_id)
            }
        }
    }

    /// `YYYY-MM-DD-HHMMSS` in the post's own offset.
    fn format_timestamp(&self) -> String {
        self.posted_at.format("%Y-%m-%d-%H%M%S").to_string()
    }
}
