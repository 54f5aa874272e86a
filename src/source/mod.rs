//! Paginated post sources.
//!
//! A [`PostSource`] yields pages of posts for one account and one collection
//! (likes or timeline). Pages are walked newest to oldest using a `max_id`
//! cursor.

pub mod likes;
pub mod timeline;

use async_trait::async_trait;

use crate::api::types::Tweet;
use crate::config::SourceKind;
use crate::error::Result;

pub use likes::LikesSource;
pub use timeline::TimelineSource;

/// One page of posts and the cursor for the following page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub posts: Vec<Tweet>,
    /// `None` once the source is exhausted.
    pub next_cursor: Option<u64>,
}

impl Page {
    /// Build a page, deriving the next `max_id` cursor from the oldest post.
    pub fn from_posts(posts: Vec<Tweet>) -> Self {
        let next_cursor = posts
            .iter()
            .map(|post| post.id)
            .min()
            .and_then(|oldest| oldest.checked_sub(1));

        Self { posts, next_cursor }
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Strategy for fetching pages of posts.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Which collection this source walks.
    fn kind(&self) -> SourceKind;

    /// Fetch up to `page_size` posts at or below `cursor` (newest first when
    /// `cursor` is `None`).
    async fn fetch_page(&self, cursor: Option<u64>, page_size: u32) -> Result<Page>;
}

#[async_trait]
impl<'a, T: PostSource + ?Sized> PostSource for &'a T {
    fn kind(&self) -> SourceKind {
        (**self).kind()
    }

    async fn fetch_page(&self, cursor: Option<u64>, page_size: u32) -> Result<Page> {
        (**self).fetch_page(cursor, page_size).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: u64) -> Tweet {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "created_at": "Sun Mar 21 04:08:55 +0000 2021",
            "user": {"screen_name": "a"}
        }))
        .unwrap()
    }

    #[test]
    fn test_cursor_is_oldest_minus_one() {
        let page = Page::from_posts(vec![post(30), post(10), post(20)]);
        assert_eq!(page.next_cursor, Some(9));
    }

    #[test]
    fn test_empty_page_has_no_cursor() {
        let page = Page::from_posts(Vec::new());
        assert!(page.is_empty());
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn test_id_zero_ends_pagination() {
        assert_eq!(Page::from_posts(vec![post(0)]).next_cursor, None);
    }
}
