//! WordPress REST API backend (`/wp-json/wp/v2`), authenticated with the
//! account's username and application password.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    error::ForgeError,
    ports::{MediaBackend, PostsBackend},
    posts::StatusFilter,
    publish::PublishRequest,
    session::scheduled_for,
    types::{Account, Media, Post, PostStatus},
};

const ALL_STATUSES: &str = "publish,future,draft,pending,private";

#[derive(Debug, Deserialize)]
struct Rendered {
    #[serde(default)]
    raw: Option<String>,
    #[serde(default)]
    rendered: String,
}

impl Rendered {
    /// Raw source when the API was asked for `context=edit`.
    fn into_text(self) -> String {
        self.raw.unwrap_or(self.rendered)
    }
}

#[derive(Debug, Deserialize)]
struct WpPost {
    id: u64,
    title: Rendered,
    content: Rendered,
    #[serde(default)]
    excerpt: Option<Rendered>,
    /// Kept as text: WordPress also reports `trash`, `auto-draft` and `inherit`.
    status: String,
    date_gmt: Option<String>,
    modified_gmt: Option<String>,
    #[serde(default)]
    featured_media: u64,
    #[serde(default)]
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WpMedia {
    id: u64,
    title: Rendered,
    source_url: String,
    #[serde(default)]
    alt_text: String,
    date_gmt: Option<String>,
    mime_type: String,
}

/// Body of a create or update request.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct WpPostBody {
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_gmt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_media: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<u64>,
}

fn parse_ids(ids: &[String], what: &str) -> Vec<u64> {
    ids.iter()
        .filter_map(|id| match id.trim().parse() {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::warn!(id = %id, what, "skipping non-numeric id");
                None
            }
        })
        .collect()
}

pub fn post_body(request: &PublishRequest) -> WpPostBody {
    let settings = &request.settings;
    WpPostBody {
        title: settings.title.clone(),
        content: request.content.clone(),
        status: settings.status,
        date_gmt: scheduled_for(settings).map(|d| d.format("%Y-%m-%dT%H:%M:%S").to_string()),
        featured_media: parse_ids(settings.featured_image_id.as_slice(), "featured image").pop(),
        categories: parse_ids(&settings.category_ids, "category"),
        tags: parse_ids(&settings.tag_ids, "tag"),
    }
}

/// WordPress `*_gmt` fields carry no offset.
fn parse_gmt(value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value?;
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|d| d.and_utc())
}

impl WpPost {
    fn into_post(self) -> Result<Post> {
        let status: PostStatus = self.status.parse()?;
        let date = parse_gmt(self.date_gmt.as_deref()).unwrap_or_else(Utc::now);
        Ok(Post {
            id: self.id.to_string(),
            title: self.title.into_text(),
            content: self.content.into_text(),
            status,
            date,
            modified: parse_gmt(self.modified_gmt.as_deref()).unwrap_or(date),
            excerpt: self
                .excerpt
                .map(Rendered::into_text)
                .filter(|e| !e.is_empty()),
            featured_image: (self.featured_media != 0).then(|| self.featured_media.to_string()),
            link: self.link,
        })
    }
}

impl WpMedia {
    fn into_media(self, account_id: &str) -> Media {
        Media {
            id: self.id.to_string(),
            title: self.title.into_text(),
            url: self.source_url,
            alt: Some(self.alt_text).filter(|a| !a.is_empty()),
            date: parse_gmt(self.date_gmt.as_deref()).unwrap_or_else(Utc::now),
            mime_type: self.mime_type,
            account_id: account_id.to_string(),
        }
    }
}

pub fn api_url(site_url: &str, path: &str) -> String {
    format!("{}/wp-json/wp/v2/{}", site_url.trim_end_matches('/'), path)
}

#[derive(Debug, Clone, Default)]
pub struct WordPressClient {
    http: reqwest::Client,
}

impl WordPressClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn request(
        &self,
        method: reqwest::Method,
        account: &Account,
        path: &str,
    ) -> reqwest::RequestBuilder {
        self.http
            .request(method, api_url(&account.site_url, path))
            .basic_auth(&account.username, Some(&account.password))
    }

    async fn send(
        &self,
        account: &Account,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let reason = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v["message"].as_str().map(str::to_string))
            .unwrap_or(body);

        Err(ForgeError::WordPressFailed {
            site_url: account.site_url.clone(),
            status: status.as_u16(),
            reason,
        })
    }
}

#[async_trait]
impl PostsBackend for WordPressClient {
    async fn list_posts(&self, account: &Account, filter: StatusFilter) -> Result<Vec<Post>> {
        let status = match filter {
            StatusFilter::All => ALL_STATUSES.to_string(),
            StatusFilter::Only(status) => status.to_string(),
        };
        let builder = self
            .request(reqwest::Method::GET, account, "posts")
            .query(&[("status", status.as_str()), ("context", "edit"), ("per_page", "100")]);

        let posts: Vec<WpPost> = self.send(account, builder).await?.json().await?;
        tracing::debug!(site = %account.site_url, count = posts.len(), "posts listed");
        posts.into_iter().map(WpPost::into_post).collect()
    }

    async fn get_post(&self, account: &Account, post_id: &str) -> Result<Post> {
        let builder = self
            .request(reqwest::Method::GET, account, &format!("posts/{}", post_id))
            .query(&[("context", "edit")]);
        let post: WpPost = self.send(account, builder).await?.json().await?;
        post.into_post()
    }

    async fn publish_post(&self, account: &Account, request: &PublishRequest) -> Result<Post> {
        let path = match &request.post_id {
            Some(id) => format!("posts/{}", id),
            None => "posts".to_string(),
        };
        let builder = self
            .request(reqwest::Method::POST, account, &path)
            .json(&post_body(request));

        let post: WpPost = self.send(account, builder).await?.json().await?;
        tracing::info!(site = %account.site_url, post_id = post.id, "post published");
        post.into_post()
    }

    async fn delete_post(&self, account: &Account, post_id: &str) -> Result<()> {
        let builder = self.request(
            reqwest::Method::DELETE,
            account,
            &format!("posts/{}", post_id),
        );
        self.send(account, builder).await?;
        tracing::info!(site = %account.site_url, post_id, "post moved to trash");
        Ok(())
    }
}

#[async_trait]
impl MediaBackend for WordPressClient {
    async fn list_media(&self, account: &Account) -> Result<Vec<Media>> {
        let builder = self
            .request(reqwest::Method::GET, account, "media")
            .query(&[("per_page", "100")]);
        let media: Vec<WpMedia> = self.send(account, builder).await?.json().await?;
        Ok(media
            .into_iter()
            .map(|m| m.into_media(&account.id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{session::RequestId, types::PublishSettings};
    use chrono::TimeZone;

    fn request(settings: PublishSettings) -> PublishRequest {
        PublishRequest {
            request_id: RequestId::new(),
            account_id: "1".to_string(),
            post_id: None,
            settings,
            content: "<p>hi</p>".to_string(),
        }
    }

    #[test]
    fn api_url_strips_trailing_slash() {
        assert_eq!(
            api_url("https://blog.example/", "posts/5"),
            "https://blog.example/wp-json/wp/v2/posts/5"
        );
    }

    #[test]
    fn body_for_scheduled_post() {
        let mut settings = PublishSettings::new("Launch");
        settings.status = PostStatus::Future;
        settings.scheduled_date = Some(Utc.with_ymd_and_hms(2030, 1, 2, 12, 0, 0).unwrap());
        settings.featured_image_id = Some("17".to_string());
        settings.category_ids = vec!["3".to_string(), "x".to_string()];

        let body = post_body(&request(settings));
        assert_eq!(body.date_gmt.as_deref(), Some("2030-01-02T12:00:00"));
        assert_eq!(body.featured_media, Some(17));
        assert_eq!(body.categories, vec![3]);

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "future");
        assert!(json.get("tags").is_none());
    }

    #[test]
    fn date_is_only_sent_for_future_posts() {
        let mut settings = PublishSettings::new("Now");
        settings.scheduled_date = Some(Utc::now());
        let body = post_body(&request(settings));
        assert_eq!(body.date_gmt, None);
        assert_eq!(body.featured_media, None);
    }

    #[test]
    fn decodes_edit_context_post() {
        let json = r#"{
            "id": 42,
            "title": {"raw": "Raw title", "rendered": "Rendered title"},
            "content": {"raw": "<p>raw</p>", "rendered": "<p>rendered</p>"},
            "excerpt": {"rendered": ""},
            "status": "future",
            "date_gmt": "2030-01-02T12:00:00",
            "modified_gmt": "2029-12-30T08:00:00",
            "featured_media": 0,
            "link": "https://blog.example/?p=42"
        }"#;
        let post = serde_json::from_str::<WpPost>(json).unwrap().into_post().unwrap();
        assert_eq!(post.id, "42");
        assert_eq!(post.title, "Raw title");
        assert_eq!(post.status, PostStatus::Future);
        assert_eq!(post.date, Utc.with_ymd_and_hms(2030, 1, 2, 12, 0, 0).unwrap());
        assert_eq!(post.excerpt, None);
        assert_eq!(post.featured_image, None);
    }

    #[test]
    fn trashed_post_is_an_unknown_status() {
        let json = r#"{
            "id": 8,
            "title": {"rendered": "Old"},
            "content": {"rendered": ""},
            "status": "trash",
            "date_gmt": "2024-01-01T00:00:00",
            "modified_gmt": null
        }"#;
        let err = serde_json::from_str::<WpPost>(json)
            .unwrap()
            .into_post()
            .unwrap_err();
        assert!(matches!(err, ForgeError::UnknownPostStatus(s) if s == "trash"));
    }

    #[test]
    fn non_numeric_featured_image_is_skipped() {
        let mut settings = PublishSettings::new("Cover");
        settings.featured_image_id = Some("cover.png".to_string());
        assert_eq!(post_body(&request(settings)).featured_media, None);
    }

    #[test]
    fn decodes_media() {
        let json = r#"{
            "id": 9,
            "title": {"rendered": "Cover"},
            "source_url": "https://blog.example/cover.png",
            "alt_text": "",
            "date_gmt": "2024-02-03T04:05:06",
            "mime_type": "image/png"
        }"#;
        let media = serde_json::from_str::<WpMedia>(json).unwrap().into_media("7");
        assert_eq!(media.id, "9");
        assert_eq!(media.title, "Cover");
        assert_eq!(media.alt, None);
        assert_eq!(media.account_id, "7");
    }
}
