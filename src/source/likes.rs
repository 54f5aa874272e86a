//! Posts liked by an account.

use async_trait::async_trait;

use crate::api::{TwitterApi, UserRef};
use crate::config::SourceKind;
use crate::error::Result;
use crate::source::{Page, PostSource};

pub struct LikesSource {
    api: TwitterApi,
    user: UserRef,
}

impl LikesSource {
    pub fn new(api: TwitterApi, user: UserRef) -> Self {
        Self { api, user }
    }
}

#[async_trait]
impl PostSource for LikesSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Likes
    }

    async fn fetch_page(&self, cursor: Option<u64>, page_size: u32) -> Result<Page> {
        let posts = self.api.get_favorites(&self.user, page_size, cursor).await?;
        Ok(Page::from_posts(posts))
    }
}
