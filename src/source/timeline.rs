//! Posts on an account's own timeline, reposts included.

use async_trait::async_trait;

use crate::api::{TwitterApi, UserRef};
use crate::config::SourceKind;
use crate::error::Result;
use crate::source::{Page, PostSource};

pub struct TimelineSource {
    api: TwitterApi,
    user: UserRef,
}

impl TimelineSource {
    pub fn new(api: TwitterApi, user: UserRef) -> Self {
        Self { api, user }
    }
}

#[async_trait]
impl PostSource for TimelineSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Timeline
    }

    async fn fetch_page(&self, cursor: Option<u64>, page_size: u32) -> Result<Page> {
        let posts = self
            .api
            .get_user_timeline(&self.user, page_size, cursor)
            .await?;
        Ok(Page::from_posts(posts))
    }
}
