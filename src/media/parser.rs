//! Media extraction from posts.

use crate::api::types::{Media, Tweet};
use crate::error::{Error, Result};
use crate::fs::naming::slugify;
use crate::media::item::{MediaRecord, MediaType};

/// Default recursion bound for repost/quote chains.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Suffix requesting the original-resolution rendition of a photo.
const ORIGINAL_QUALITY: &str = ":orig";

/// The only video container that is downloaded directly.
const MP4_CONTENT_TYPE: &str = "video/mp4";

/// A media entry together with the post it is attached to.
#[derive(Debug, Clone, Copy)]
pub struct FoundMedia<'a> {
    pub post: &'a Tweet,
    pub media: &'a Media,
    pub index: usize,
}

/// Collect media attached to `post`, then to its reposted and quoted posts.
///
/// `post` itself is depth 1; links are followed while the depth is below
/// `max_depth`. Replies are not followed. A post reachable through both links
/// is visited twice; duplicates are filtered later by URL.
pub fn extract_media(post: &Tweet, max_depth: usize) -> Vec<FoundMedia<'_>> {
    extract_at_depth(post, 1, max_depth)
}

fn extract_at_depth(post: &Tweet, depth: usize, max_depth: usize) -> Vec<FoundMedia<'_>> {
    let mut found: Vec<FoundMedia<'_>> = post
        .extended_entities
        .iter()
        .flat_map(|entities| entities.media.iter())
        .enumerate()
        .map(|(index, media)| FoundMedia { post, media, index })
        .collect();

    if depth < max_depth {
        for linked in [&post.retweeted_status, &post.quoted_status]
            .into_iter()
            .flatten()
        {
            found.extend(extract_at_depth(linked, depth + 1, max_depth));
        }
    }

    found
}

/// Normalize one found media entry into a record.
pub fn build_record(found: FoundMedia<'_>) -> Result<MediaRecord> {
    let FoundMedia { post, media, index } = found;

    let media_type: MediaType = media
        .media_type
        .parse()
        .map_err(|reason| Error::MalformedMedia {
            post_id: post.id,
            reason,
        })?;

    let source_url = match media_type {
        MediaType::Photo => format!("{}{}", media.media_url_https, ORIGINAL_QUALITY),
        MediaType::Video | MediaType::AnimatedGif => best_mp4_variant(post.id, media)?,
    };

    Ok(MediaRecord {
        author: slugify(&post.user.screen_name),
        posted_at: post.created_at,
        post_id: post.id,
        media_type,
        index_in_post: index,
        source_url,
    })
}

/// Extract and build records for a whole page of posts.
pub fn extract_records(posts: &[Tweet], max_depth: usize) -> Vec<Result<MediaRecord>> {
    posts
        .iter()
        .flat_map(|post| extract_media(post, max_depth))
        .map(build_record)
        .collect()
}

/// URL of the highest-bitrate mp4 variant, the first listed on a tie.
/// Playlist variants are ignored.
fn best_mp4_variant(post_id: u64, media: &Media) -> Result<String> {
    media
        .video_info
        .iter()
        .flat_map(|info| info.variants.iter())
        .filter(|variant| variant.content_type == MP4_CONTENT_TYPE)
        // max_by_key keeps the last maximum; reversed, ties go to the first listed.
        .rev()
        .max_by_key(|variant| variant.bitrate.unwrap_or(0))
        .map(|variant| variant.url.clone())
        .ok_or_else(|| Error::MalformedMedia {
            post_id,
            reason: format!("{} has no {} variant", media.media_type, MP4_CONTENT_TYPE),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn tweet(value: Value) -> Tweet {
        serde_json::from_value(value).unwrap()
    }

    fn photo(name: &str) -> Value {
        json!({
            "type": "photo",
            "media_url_https": format!("https://pbs.twimg.com/media/{}.jpg", name)
        })
    }

    fn post(id: u64, media: Vec<Value>) -> Value {
        json!({
            "id": id,
            "created_at": "Sun Mar 21 04:08:55 +0000 2021",
            "user": {"screen_name": "Sad-istfied"},
            "extended_entities": {"media": media}
        })
    }

    fn video(variants: Value) -> Value {
        json!({
            "type": "video",
            "media_url_https": "https://pbs.twimg.com/ext_tw_video_thumb/1/pu/img/thumb.jpg",
            "video_info": {"variants": variants}
        })
    }

    #[test]
    fn test_top_level_media_indexed() {
        let t = tweet(post(1, vec![photo("a"), photo("b"), photo("c")]));
        let found = extract_media(&t, DEFAULT_MAX_DEPTH);
        let indices: Vec<usize> = found.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_post_without_media_contributes_nothing() {
        let t = tweet(json!({
            "id": 1,
            "created_at": "Sun Mar 21 04:08:55 +0000 2021",
            "user": {"screen_name": "someone"}
        }));
        assert!(extract_media(&t, DEFAULT_MAX_DEPTH).is_empty());
        assert!(extract_records(&[t], DEFAULT_MAX_DEPTH).is_empty());
    }

    #[test]
    fn test_repost_and_quote_followed() {
        let mut outer = post(1, vec![photo("own")]);
        outer["retweeted_status"] = post(2, vec![photo("rt1"), photo("rt2")]);
        outer["quoted_status"] = post(3, vec![photo("quoted")]);
        let t = tweet(outer);

        let found = extract_media(&t, DEFAULT_MAX_DEPTH);
        let posts: Vec<u64> = found.iter().map(|f| f.post.id).collect();
        assert_eq!(posts, vec![1, 2, 2, 3]);
        assert_eq!(found[2].index, 1);
    }

    #[test]
    fn test_depth_bound() {
        // Chain of 12 posts, each quoting the next, one photo each.
        let mut chain = post(12, vec![photo("p12")]);
        for id in (1..12).rev() {
            let mut outer = post(id, vec![photo(&format!("p{}", id))]);
            outer["quoted_status"] = chain;
            chain = outer;
        }
        let t = tweet(chain);

        assert_eq!(extract_media(&t, DEFAULT_MAX_DEPTH).len(), 10);
        assert_eq!(extract_media(&t, 1).len(), 1);
    }

    #[test]
    fn test_photo_record() {
        let t = tweet(post(1373486756306165763, vec![photo("ABC123")]));
        let records = extract_records(std::slice::from_ref(&t), DEFAULT_MAX_DEPTH);
        let record = records.into_iter().next().unwrap().unwrap();

        assert_eq!(record.author, "sad-istfied");
        assert_eq!(record.media_type, MediaType::Photo);
        assert_eq!(record.source_url, "https://pbs.twimg.com/media/ABC123.jpg:orig");
        assert_eq!(
            record.filename(),
            "img2021-03-21-040855_sad-istfied_0_1373486756306165763_ABC123.jpg"
        );
    }

    #[test]
    fn test_video_picks_highest_mp4_bitrate() {
        let t = tweet(post(
            5,
            vec![video(json!([
                {"content_type": "video/mp4", "bitrate": 832000, "url": "https://video.twimg.com/low.mp4"},
                {"content_type": "application/x-mpegURL", "url": "https://video.twimg.com/pl.m3u8"},
                {"content_type": "video/mp4", "bitrate": 2176000, "url": "https://video.twimg.com/high.mp4"}
            ]))],
        ));

        let found = extract_media(&t, DEFAULT_MAX_DEPTH);
        let record = build_record(found[0]).unwrap();
        assert_eq!(record.media_type, MediaType::Video);
        assert_eq!(record.source_url, "https://video.twimg.com/high.mp4");
    }

    #[test]
    fn test_animated_gif_single_variant() {
        let mut gif = video(json!([
            {"content_type": "video/mp4", "bitrate": 0, "url": "https://video.twimg.com/tweet_video/EwoThfmWgAs-FAz.mp4"}
        ]));
        gif["type"] = json!("animated_gif");
        let t = tweet(post(6, vec![gif]));

        let record = build_record(extract_media(&t, DEFAULT_MAX_DEPTH)[0]).unwrap();
        assert_eq!(record.media_type, MediaType::AnimatedGif);
        assert_eq!(
            record.source_url,
            "https://video.twimg.com/tweet_video/EwoThfmWgAs-FAz.mp4"
        );
    }

    #[test]
    fn test_video_without_mp4_is_malformed() {
        let t = tweet(post(
            7,
            vec![video(json!([
                {"content_type": "application/x-mpegURL", "url": "https://video.twimg.com/pl.m3u8"}
            ]))],
        ));

        let result = build_record(extract_media(&t, DEFAULT_MAX_DEPTH)[0]);
        assert!(matches!(result, Err(Error::MalformedMedia { post_id: 7, .. })));
    }

    #[test]
    fn test_unknown_media_type_is_malformed() {
        let t = tweet(post(
            8,
            vec![json!({"type": "audio", "media_url_https": "https://x/y.mp3"})],
        ));
        let records = extract_records(&[t], DEFAULT_MAX_DEPTH);
        assert!(records[0].is_err());
    }

    #[test]
    fn test_bitrate_tie_keeps_first_variant() {
        let t = tweet(post(
            7,
            vec![video(json!([
                {"content_type": "video/mp4", "bitrate": 832000, "url": "https://video.twimg.com/first.mp4"},
                {"content_type": "video/mp4", "bitrate": 832000, "url": "https://video.twimg.com/second.mp4"},
                {"content_type": "video/mp4", "bitrate": 256000, "url": "https://video.twimg.com/low.mp4"}
            ]))],
        ));

        let record = build_record(extract_media(&t, DEFAULT_MAX_DEPTH)[0]).unwrap();
        assert_eq!(record.source_url, "https://video.twimg.com/first.mp4");
    }
}
