//! API response type definitions.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer};

/// Format of `created_at` in v1.1 payloads, e.g. `Sun Mar 21 04:08:55 +0000 2021`.
pub const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// A post (status) as returned with `tweet_mode=extended`.
#[derive(Debug, Clone, Deserialize)]
pub struct Tweet {
    pub id: u64,

    #[serde(deserialize_with = "deserialize_created_at")]
    pub created_at: DateTime<FixedOffset>,

    pub user: User,

    /// Media attachments. Absent on posts without media.
    #[serde(default)]
    pub extended_entities: Option<ExtendedEntities>,

    /// The original post when this one is a repost.
    #[serde(default)]
    pub retweeted_status: Option<Box<Tweet>>,

    /// The quoted post when this one is a quote.
    #[serde(default)]
    pub quoted_status: Option<Box<Tweet>>,
}

/// Author of a post.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub screen_name: String,
}

/// Container for the full media list of a post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtendedEntities {
    #[serde(default)]
    pub media: Vec<Media>,
}

/// A single attached media entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Media {
    /// `photo`, `video` or `animated_gif`.
    #[serde(rename = "type")]
    pub media_type: String,

    pub media_url_https: String,

    #[serde(default)]
    pub video_info: Option<VideoInfo>,
}

/// Encodings available for video and animated media.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub variants: Vec<VideoVariant>,
}

/// One encoding of a video. Playlist variants carry no bitrate.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoVariant {
    pub content_type: String,
    #[serde(default)]
    pub bitrate: Option<u64>,
    pub url: String,
}

/// Response of `POST /oauth2/token`.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token_type: String,
    pub access_token: String,
}

/// Error body returned by the API on failure.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: i64,
    pub message: String,
}

fn deserialize_created_at<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    DateTime::parse_from_str(&raw, CREATED_AT_FORMAT).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_tweet() {
        let json = r#"{
            "id": 1373486756306165763,
            "created_at": "Sun Mar 21 04:08:55 +0000 2021",
            "user": {"screen_name": "Sad_istfied"},
            "quoted_status": {
                "id": 42,
                "created_at": "Sat Mar 20 10:00:00 +0000 2021",
                "user": {"screen_name": "other"},
                "extended_entities": {"media": [{
                    "type": "photo",
                    "media_url_https": "https://pbs.twimg.com/media/ABC123.jpg"
                }]}
            }
        }"#;

        let tweet: Tweet = serde_json::from_str(json).unwrap();
        assert_eq!(tweet.id, 1373486756306165763);
        assert_eq!(tweet.created_at.format("%Y-%m-%d %H:%M:%S").to_string(), "2021-03-21 04:08:55");
        assert!(tweet.extended_entities.is_none());
        assert!(tweet.retweeted_status.is_none());

        let quoted = tweet.quoted_status.unwrap();
        assert_eq!(quoted.extended_entities.unwrap().media[0].media_type, "photo");
    }

    #[test]
    fn test_bad_created_at_rejected() {
        let json = r#"{"id": 1, "created_at": "yesterday", "user": {"screen_name": "a"}}"#;
        assert!(serde_json::from_str::<Tweet>(json).is_err());
    }
}
