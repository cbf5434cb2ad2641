//! Offline backends with deterministic behavior, for demos and tests.

use std::{
    sync::{Mutex, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    Result,
    error::ForgeError,
    media::seed_media,
    ports::{MediaBackend, PostsBackend, TranscriptSource},
    posts::{StatusFilter, filter_posts, seed_posts},
    publish::PublishRequest,
    session::scheduled_for,
    types::{Account, Media, Post},
    youtube::VideoId,
};

async fn simulate(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockTranscriptSource {
    latency: Duration,
    failure: Option<String>,
}

impl MockTranscriptSource {
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            failure: None,
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            latency: Duration::ZERO,
            failure: Some(reason.into()),
        }
    }
}

#[async_trait]
impl TranscriptSource for MockTranscriptSource {
    async fn fetch_transcript(&self, video_id: &VideoId) -> Result<String> {
        simulate(self.latency).await;

        if let Some(reason) = &self.failure {
            return Err(ForgeError::TranscriptFailed {
                video_id: video_id.to_string(),
                reason: reason.clone(),
            });
        }

        Ok(format!(
            "This is a mock transcript for the video with ID: {}. In a real application, this would be fetched from the YouTube API or using a transcript extraction library. The transcript would contain all the spoken words from the video, which could then be processed by AI to generate different types of content.",
            video_id
        ))
    }
}

/// In-memory post store seeded with example posts.
#[derive(Debug)]
pub struct MockPostsBackend {
    posts: Mutex<Vec<Post>>,
    latency: Duration,
}

impl Default for MockPostsBackend {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl MockPostsBackend {
    pub fn new(latency: Duration) -> Self {
        Self {
            posts: Mutex::new(seed_posts(Utc::now())),
            latency,
        }
    }

    fn find(&self, post_id: &str) -> Result<Post> {
        self.posts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|p| p.id == post_id)
            .cloned()
            .ok_or_else(|| ForgeError::NotFound {
                kind: "Post",
                id: post_id.to_string(),
            })
    }
}

#[async_trait]
impl PostsBackend for MockPostsBackend {
    async fn list_posts(&self, _account: &Account, filter: StatusFilter) -> Result<Vec<Post>> {
        simulate(self.latency).await;
        let posts = self.posts.lock().unwrap_or_else(PoisonError::into_inner).clone();
        Ok(filter_posts(posts, filter))
    }

    async fn get_post(&self, _account: &Account, post_id: &str) -> Result<Post> {
        simulate(self.latency).await;
        self.find(post_id)
    }

    async fn publish_post(&self, _account: &Account, request: &PublishRequest) -> Result<Post> {
        simulate(self.latency).await;
        let now = Utc::now();
        let settings = &request.settings;
        let mut posts = self.posts.lock().unwrap_or_else(PoisonError::into_inner);

        let post = match &request.post_id {
            Some(id) => {
                let existing = posts.iter_mut().find(|p| &p.id == id).ok_or_else(|| {
                    ForgeError::NotFound {
                        kind: "Post",
                        id: id.clone(),
                    }
                })?;
                existing.title = settings.title.clone();
                existing.content = request.content.clone();
                existing.status = settings.status;
                existing.date = scheduled_for(settings).unwrap_or(existing.date);
                existing.modified = now;
                existing.featured_image = settings.featured_image_id.clone();
                existing.clone()
            }
            None => {
                let next_id = posts
                    .iter()
                    .filter_map(|p| p.id.parse::<u64>().ok())
                    .max()
                    .unwrap_or(0)
                    + 1;
                let post = Post {
                    id: next_id.to_string(),
                    title: settings.title.clone(),
                    content: request.content.clone(),
                    status: settings.status,
                    date: scheduled_for(settings).unwrap_or(now),
                    modified: now,
                    excerpt: None,
                    featured_image: settings.featured_image_id.clone(),
                    link: None,
                };
                posts.push(post.clone());
                post
            }
        };

        Ok(post)
    }

    async fn delete_post(&self, _account: &Account, post_id: &str) -> Result<()> {
        simulate(self.latency).await;
        let mut posts = self.posts.lock().unwrap_or_else(PoisonError::into_inner);
        let before = posts.len();
        posts.retain(|p| p.id != post_id);
        if posts.len() == before {
            return Err(ForgeError::NotFound {
                kind: "Post",
                id: post_id.to_string(),
            });
        }
        Ok(())
    }
}

/// Serves the seed images belonging to the account.
#[derive(Debug, Clone, Default)]
pub struct MockMediaBackend {
    latency: Duration,
}

impl MockMediaBackend {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl MediaBackend for MockMediaBackend {
    async fn list_media(&self, account: &Account) -> Result<Vec<Media>> {
        simulate(self.latency).await;
        Ok(seed_media()
            .into_iter()
            .filter(|m| m.account_id == account.id)
            .collect())
    }
}
