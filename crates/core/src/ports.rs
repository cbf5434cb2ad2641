//! Async boundaries to the outside world. Real backends and test fakes both
//! implement these.

use async_trait::async_trait;

use crate::{
    Result,
    content::ContentType,
    posts::StatusFilter,
    publish::PublishRequest,
    types::{Account, Media, Post},
    youtube::VideoId,
};

#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch_transcript(&self, video_id: &VideoId) -> Result<String>;
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(
        &self,
        transcript: &str,
        content_type: ContentType,
        seo_keywords: Option<&str>,
    ) -> Result<String>;
}

/// Post operations against the CMS of one account.
#[async_trait]
pub trait PostsBackend: Send + Sync {
    async fn list_posts(&self, account: &Account, filter: StatusFilter) -> Result<Vec<Post>>;

    async fn get_post(&self, account: &Account, post_id: &str) -> Result<Post>;

    /// Creates the post, or updates it when `request.post_id` is set.
    async fn publish_post(&self, account: &Account, request: &PublishRequest) -> Result<Post>;

    async fn delete_post(&self, account: &Account, post_id: &str) -> Result<()>;
}

#[async_trait]
pub trait MediaBackend: Send + Sync {
    async fn list_media(&self, account: &Account) -> Result<Vec<Media>>;
}
